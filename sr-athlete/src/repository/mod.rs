//! Persistence seams
//!
//! Repositories store and query raw documents. Lookups return
//! `Result<Option<T>>`: `Ok(None)` is an ordinary miss, `Err` a real storage
//! failure. Normalization, the athlete→team join and reconciliation live in
//! [`crate::services`].

pub mod memory;

pub use memory::MemoryStore;

use crate::models::{Athlete, Certificate, Paging, Team};
use async_trait::async_trait;
use sr_common::{normalize, Result};
use std::sync::Arc;
use uuid::Uuid;

/// Free-text part of a query
///
/// All matching is case-insensitive substring matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextQuery {
    /// No text restriction
    #[default]
    Any,
    /// Name contains the text, or an alias contains the text or its
    /// normalized form
    NameOrAlias(String),
    /// `NameOrAlias` plus first name, last name and the DSV id digits
    Broad(String),
}

impl TextQuery {
    /// Listing filter from a `query` parameter; blank means no restriction
    pub fn listing(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            TextQuery::Any
        } else {
            TextQuery::Broad(query.to_string())
        }
    }

    pub fn name(name: &str) -> Self {
        TextQuery::NameOrAlias(name.trim().to_string())
    }

    /// Raw text and its alias form, lower-cased; `None` for [`TextQuery::Any`]
    pub fn needles(&self) -> Option<(String, String)> {
        match self {
            TextQuery::Any => None,
            TextQuery::NameOrAlias(text) | TextQuery::Broad(text) => {
                Some((text.to_lowercase(), normalize(text)))
            }
        }
    }

    pub fn is_broad(&self) -> bool {
        matches!(self, TextQuery::Broad(_))
    }
}

/// Athlete search; every set field is ANDed with the text clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AthleteQuery {
    pub text: TextQuery,
    pub year: Option<i32>,
    pub meeting: Option<String>,
    pub team_id: Option<Uuid>,
}

/// Team search; every set field is ANDed with the text clause
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamQuery {
    pub text: TextQuery,
    pub meeting: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateQuery {
    pub athlete_id: Option<Uuid>,
    pub meeting: Option<String>,
}

/// Athlete collection; results of `search` are sorted by name ascending
#[async_trait]
pub trait AthleteRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Athlete>>;
    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Athlete>>;
    async fn search(&self, query: &AthleteQuery, paging: &Paging) -> Result<Vec<Athlete>>;
    async fn insert(&self, athlete: &Athlete) -> Result<()>;
    /// Full replace by id; false if no such document
    async fn replace(&self, athlete: &Athlete) -> Result<bool>;
    /// False if no such document
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Team collection; results of `search` are sorted by name ascending
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Team>>;
    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Team>>;
    async fn search(&self, query: &TeamQuery, paging: &Paging) -> Result<Vec<Team>>;
    async fn count(&self, meeting: Option<&str>) -> Result<u64>;
    async fn insert(&self, team: &Team) -> Result<()>;
    async fn replace(&self, team: &Team) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Certificate collection; results of `search` are sorted by ordering ascending
#[async_trait]
pub trait CertificateRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Certificate>>;
    async fn search(&self, query: &CertificateQuery) -> Result<Vec<Certificate>>;
    async fn count(&self, meeting: Option<&str>) -> Result<u64>;
    async fn insert(&self, certificate: &Certificate) -> Result<()>;
    async fn replace(&self, certificate: &Certificate) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Liveness of the backing store
#[async_trait]
pub trait StorageHealth: Send + Sync {
    async fn ping(&self) -> bool;
}

/// Repository handles created at startup and held for the process lifetime
#[derive(Clone)]
pub struct Repositories {
    pub athletes: Arc<dyn AthleteRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub certificates: Arc<dyn CertificateRepository>,
    pub health: Arc<dyn StorageHealth>,
}

impl Repositories {
    /// All handles backed by one store
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: AthleteRepository + TeamRepository + CertificateRepository + StorageHealth + 'static,
    {
        Self {
            athletes: store.clone(),
            teams: store.clone(),
            certificates: store.clone(),
            health: store,
        }
    }
}
