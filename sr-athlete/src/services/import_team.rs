//! Team import reconciler

use super::locks::ImportLocks;
use super::merge::Merge;
use super::{ParticipationTracker, TeamService};
use crate::models::Team;
use sr_common::{Error, Result};
use tracing::info;

/// Create-or-merge of teams arriving from meeting feeds
#[derive(Clone)]
pub struct TeamImporter {
    teams: TeamService,
    tracker: ParticipationTracker,
    locks: ImportLocks,
}

impl TeamImporter {
    pub fn new(teams: TeamService, tracker: ParticipationTracker, locks: ImportLocks) -> Self {
        Self {
            teams,
            tracker,
            locks,
        }
    }

    /// Import `incoming` as seen at `meeting`; returns the stored team and
    /// whether it was created
    ///
    /// **Algorithm:**
    /// 1. Look up an existing team by name or alias
    /// 2. Missing: stamp `first_meeting`, create it
    /// 3. Found: fill `dsv_id`, `state_id`, `country` where the stored value
    ///    is empty, persist only if something changed
    /// 4. Record the participation and return its result
    pub async fn import(&self, mut incoming: Team, meeting: &str) -> Result<(Team, bool)> {
        if meeting.trim().is_empty() {
            return Err(Error::InvalidInput("meeting is required for import".to_string()));
        }
        if incoming.name.trim().is_empty() {
            return Err(Error::InvalidInput("team name is required for import".to_string()));
        }

        let _guard = self.locks.acquire(ImportLocks::team_key(&incoming.name)).await;

        let (id, created) = match self.teams.find_by_name_or_alias(&incoming.name).await? {
            None => {
                incoming.first_meeting = meeting.to_string();
                let team = self.teams.create(incoming).await?;
                (team.id, true)
            }
            Some(mut existing) => {
                let mut merge = Merge::new();
                merge
                    .field("dsv_id", &mut existing.dsv_id, &incoming.dsv_id)
                    .field("state_id", &mut existing.state_id, &incoming.state_id)
                    .field("country", &mut existing.country, &incoming.country);

                if merge.changed() {
                    info!(team_id = %existing.id, fields = ?merge.filled(), "Team merged from import");
                    self.teams.update(existing.clone()).await?;
                }
                (existing.id, false)
            }
        };

        let team = self.tracker.add_team_participation(id, meeting).await?;
        info!(team_id = %team.id, meeting, created, "Team imported");
        Ok((team, created))
    }
}
