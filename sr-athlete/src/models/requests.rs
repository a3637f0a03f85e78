//! Request bodies of the participation and import endpoints

use super::{Athlete, Team};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /athlete/participation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddParticipationRequest {
    #[serde(default, alias = "athlete_id", alias = "athleteId")]
    pub athlete: Uuid,
    #[serde(default, alias = "meeting_id", alias = "meetingId")]
    pub meeting: String,
}

/// POST /team/participation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTeamParticipationRequest {
    #[serde(default, alias = "team_id", alias = "teamId")]
    pub team: Uuid,
    #[serde(default, alias = "meeting_id", alias = "meetingId")]
    pub meeting: String,
}

/// POST /athlete/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportAthleteRequest {
    #[serde(default)]
    pub meeting: String,
    pub athlete: Athlete,
}

/// POST /team/import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTeamRequest {
    #[serde(default)]
    pub meeting: String,
    pub team: Team,
}
