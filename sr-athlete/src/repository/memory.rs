//! In-memory repository
//!
//! Same contract as the SQLite store, held in process memory. Used by tests
//! and for throwaway runs. `set_available(false)` makes every call fail with
//! a storage error.

use super::{
    AthleteQuery, AthleteRepository, CertificateQuery, CertificateRepository, StorageHealth,
    TeamQuery, TeamRepository, TextQuery,
};
use crate::models::{Athlete, Certificate, Paging, Team};
use async_trait::async_trait;
use sr_common::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug)]
pub struct MemoryStore {
    athletes: RwLock<HashMap<Uuid, Athlete>>,
    teams: RwLock<HashMap<Uuid, Team>>,
    certificates: RwLock<HashMap<Uuid, Certificate>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            athletes: RwLock::new(HashMap::new()),
            teams: RwLock::new(HashMap::new()),
            certificates: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backing store going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::Storage("in-memory store unavailable".to_string()))
        }
    }
}

/// Name/alias clause shared by athletes and teams
fn name_or_alias_matches(text: &TextQuery, name: &str, alias: &BTreeSet<String>) -> bool {
    let Some((raw, alias_form)) = text.needles() else {
        return true;
    };

    name.to_lowercase().contains(&raw)
        || alias.iter().any(|a| {
            let a = a.to_lowercase();
            a.contains(&raw) || a.contains(&alias_form)
        })
}

fn athlete_matches(query: &AthleteQuery, athlete: &Athlete) -> bool {
    if query.year.is_some_and(|year| athlete.year != year) {
        return false;
    }
    if let Some(meeting) = &query.meeting {
        if !athlete.participation.contains(meeting) {
            return false;
        }
    }
    if query.team_id.is_some_and(|team_id| athlete.team_id != team_id) {
        return false;
    }

    if name_or_alias_matches(&query.text, &athlete.name, &athlete.alias) {
        return true;
    }

    match (&query.text, query.text.needles()) {
        (TextQuery::Broad(_), Some((raw, _))) => {
            athlete.firstname.to_lowercase().contains(&raw)
                || athlete.lastname.to_lowercase().contains(&raw)
                || athlete.dsv_id.to_string().contains(&raw)
        }
        _ => false,
    }
}

fn team_matches(query: &TeamQuery, team: &Team) -> bool {
    if let Some(meeting) = &query.meeting {
        if !team.participation.contains(meeting) {
            return false;
        }
    }
    name_or_alias_matches(&query.text, &team.name, &team.alias)
}

fn certificate_matches(query: &CertificateQuery, certificate: &Certificate) -> bool {
    query
        .athlete_id
        .map_or(true, |id| certificate.athlete_id == id)
        && query
            .meeting
            .as_ref()
            .map_or(true, |meeting| &certificate.meeting == meeting)
}

#[async_trait]
impl AthleteRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Athlete>> {
        self.check()?;
        Ok(self.athletes.read().await.get(&id).cloned())
    }

    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Athlete>> {
        self.check()?;
        let athletes = self.athletes.read().await;
        let mut found: Vec<&Athlete> = athletes.values().filter(|a| a.dsv_id == dsv_id).collect();
        found.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(found.first().map(|a| (*a).clone()))
    }

    async fn search(&self, query: &AthleteQuery, paging: &Paging) -> Result<Vec<Athlete>> {
        self.check()?;
        let athletes = self.athletes.read().await;
        let mut found: Vec<Athlete> = athletes
            .values()
            .filter(|a| athlete_matches(query, a))
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(paging.apply(found))
    }

    async fn insert(&self, athlete: &Athlete) -> Result<()> {
        self.check()?;
        let mut athletes = self.athletes.write().await;
        if athletes.contains_key(&athlete.id) {
            return Err(Error::Storage(format!("duplicate athlete id {}", athlete.id)));
        }
        athletes.insert(athlete.id, athlete.detached());
        Ok(())
    }

    async fn replace(&self, athlete: &Athlete) -> Result<bool> {
        self.check()?;
        let mut athletes = self.athletes.write().await;
        match athletes.get_mut(&athlete.id) {
            Some(slot) => {
                *slot = athlete.detached();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.athletes.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl TeamRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Team>> {
        self.check()?;
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Team>> {
        self.check()?;
        let teams = self.teams.read().await;
        let mut found: Vec<&Team> = teams.values().filter(|t| t.dsv_id == dsv_id).collect();
        found.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(found.first().map(|t| (*t).clone()))
    }

    async fn search(&self, query: &TeamQuery, paging: &Paging) -> Result<Vec<Team>> {
        self.check()?;
        let teams = self.teams.read().await;
        let mut found: Vec<Team> = teams
            .values()
            .filter(|t| team_matches(query, t))
            .cloned()
            .collect();
        found.sort_by(|a, b| (&a.name, a.id).cmp(&(&b.name, b.id)));
        Ok(paging.apply(found))
    }

    async fn count(&self, meeting: Option<&str>) -> Result<u64> {
        self.check()?;
        let teams = self.teams.read().await;
        let count = teams
            .values()
            .filter(|t| meeting.map_or(true, |m| t.participation.contains(m)))
            .count();
        Ok(count as u64)
    }

    async fn insert(&self, team: &Team) -> Result<()> {
        self.check()?;
        let mut teams = self.teams.write().await;
        if teams.contains_key(&team.id) {
            return Err(Error::Storage(format!("duplicate team id {}", team.id)));
        }
        teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn replace(&self, team: &Team) -> Result<bool> {
        self.check()?;
        let mut teams = self.teams.write().await;
        match teams.get_mut(&team.id) {
            Some(slot) => {
                *slot = team.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.teams.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl CertificateRepository for MemoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<Certificate>> {
        self.check()?;
        Ok(self.certificates.read().await.get(&id).cloned())
    }

    async fn search(&self, query: &CertificateQuery) -> Result<Vec<Certificate>> {
        self.check()?;
        let certificates = self.certificates.read().await;
        let mut found: Vec<Certificate> = certificates
            .values()
            .filter(|c| certificate_matches(query, c))
            .cloned()
            .collect();
        found.sort_by(|a, b| (a.ordering, a.id).cmp(&(b.ordering, b.id)));
        Ok(found)
    }

    async fn count(&self, meeting: Option<&str>) -> Result<u64> {
        self.check()?;
        let certificates = self.certificates.read().await;
        let count = certificates
            .values()
            .filter(|c| meeting.map_or(true, |m| c.meeting == m))
            .count();
        Ok(count as u64)
    }

    async fn insert(&self, certificate: &Certificate) -> Result<()> {
        self.check()?;
        let mut certificates = self.certificates.write().await;
        if certificates.contains_key(&certificate.id) {
            return Err(Error::Storage(format!(
                "duplicate certificate id {}",
                certificate.id
            )));
        }
        certificates.insert(certificate.id, certificate.clone());
        Ok(())
    }

    async fn replace(&self, certificate: &Certificate) -> Result<bool> {
        self.check()?;
        let mut certificates = self.certificates.write().await;
        match certificates.get_mut(&certificate.id) {
            Some(slot) => {
                *slot = certificate.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check()?;
        Ok(self.certificates.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
