//! Idempotent meeting participation

use super::AthleteService;
use crate::models::{Athlete, Participant, Team};
use crate::repository::{AthleteRepository, TeamRepository};
use sr_common::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct ParticipationTracker {
    athletes: Arc<dyn AthleteRepository>,
    teams: Arc<dyn TeamRepository>,
    athlete_service: AthleteService,
}

fn require_meeting(meeting: &str) -> Result<()> {
    if meeting.trim().is_empty() {
        return Err(Error::InvalidInput("meeting is required".to_string()));
    }
    Ok(())
}

/// Add `meeting` to `entity`; false when it was already recorded
fn mark<P: Participant>(entity: &mut P, meeting: &str) -> bool {
    let added = entity.record_participation(meeting);
    if !added {
        debug!(id = %entity.id(), meeting, "Participation already recorded");
    }
    added
}

impl ParticipationTracker {
    pub fn new(
        athletes: Arc<dyn AthleteRepository>,
        teams: Arc<dyn TeamRepository>,
        athlete_service: AthleteService,
    ) -> Self {
        Self {
            athletes,
            teams,
            athlete_service,
        }
    }

    /// Record that athlete `id` took part in `meeting`; returns the refreshed
    /// athlete with its team attached
    pub async fn add_athlete_participation(&self, id: Uuid, meeting: &str) -> Result<Athlete> {
        require_meeting(meeting)?;
        let not_found = || Error::NotFound(format!("athlete {}", id));

        let mut athlete = self.athletes.get(id).await?.ok_or_else(not_found)?;
        if mark(&mut athlete, meeting) {
            if !self.athletes.replace(&athlete.detached()).await? {
                return Err(not_found());
            }
            info!(athlete_id = %id, meeting, "Athlete participation added");
        }

        self.athlete_service.get(id).await?.ok_or_else(not_found)
    }

    /// Record that team `id` took part in `meeting`
    pub async fn add_team_participation(&self, id: Uuid, meeting: &str) -> Result<Team> {
        require_meeting(meeting)?;
        let not_found = || Error::NotFound(format!("team {}", id));

        let mut team = self.teams.get(id).await?.ok_or_else(not_found)?;
        if mark(&mut team, meeting) {
            if !self.teams.replace(&team).await? {
                return Err(not_found());
            }
            info!(team_id = %id, meeting, "Team participation added");
        }

        self.teams.get(id).await?.ok_or_else(not_found)
    }
}
