//! Athlete document

use super::{is_default, Participant, Team};
use serde::{Deserialize, Serialize};
use sr_common::{normalize, split_name};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Athlete as stored and served
///
/// The stored row keeps only `team_id`; `team` is attached on every read and
/// left empty when the team cannot be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    #[serde(rename = "_id", default, skip_serializing_if = "Uuid::is_nil")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub firstname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lastname: String,
    /// Birth (age-group) year
    #[serde(default, skip_serializing_if = "is_default")]
    pub year: i32,
    /// Federation identifier, 0 when unknown
    #[serde(default, skip_serializing_if = "is_default")]
    pub dsv_id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gender: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub alias: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub team_id: Uuid,
    #[serde(default)]
    pub team: Team,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_meeting: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub participation: BTreeSet<String>,
}

impl Athlete {
    /// Normalize before any create/update
    ///
    /// - `team_id` mirrors the embedded team's identifier when one is given
    /// - a "Last, First" name is split and stored as "First Last"
    /// - the alias set gains the normalized current name
    pub fn prepare_for_write(&mut self) {
        if !self.team.id.is_nil() {
            self.team_id = self.team.id;
        }

        if let Some(split) = split_name(&self.name) {
            self.name = split.display();
            self.firstname = split.first;
            self.lastname = split.last;
        }

        let alias = normalize(&self.name);
        if !alias.is_empty() {
            self.alias.insert(alias);
        }
    }

    /// Copy of the stored document without the embedded team
    pub fn detached(&self) -> Self {
        Self {
            team: Team::default(),
            ..self.clone()
        }
    }
}

impl Participant for Athlete {
    fn id(&self) -> Uuid {
        self.id
    }

    fn participation(&self) -> &BTreeSet<String> {
        &self.participation
    }

    fn participation_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.participation
    }
}
