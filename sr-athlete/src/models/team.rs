//! Team document and its pass-through sub-records

use super::{is_default, Participant};
use serde::{Deserialize, Serialize};
use sr_common::normalize;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "_id", default, skip_serializing_if = "Uuid::is_nil")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub alias: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub dsv_id: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub state_id: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub address: Address,
    #[serde(default, skip_serializing_if = "is_default")]
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub color_set: ColorSet,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_meeting: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub participation: BTreeSet<String>,
}

impl Team {
    /// Normalize before any create/update: the alias set gains the
    /// normalized current name
    pub fn prepare_for_write(&mut self) {
        let alias = normalize(&self.name);
        if !alias.is_empty() {
            self.alias.insert(alias);
        }
    }
}

impl Participant for Team {
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub street: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub e_mail: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fax: String,
}

/// Club colours used by the result frontends
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secondary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contrast: String,
}
