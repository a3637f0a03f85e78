//! Athlete import reconciler

use super::locks::ImportLocks;
use super::merge::Merge;
use super::{AthleteService, ParticipationTracker, TeamImporter, TeamService};
use crate::models::{Athlete, Team};
use crate::repository::AthleteRepository;
use sr_common::{split_name, Error, Result};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Create-or-merge of athletes arriving from meeting feeds
#[derive(Clone)]
pub struct AthleteImporter {
    athletes: Arc<dyn AthleteRepository>,
    athlete_service: AthleteService,
    teams: TeamService,
    team_importer: TeamImporter,
    tracker: ParticipationTracker,
    locks: ImportLocks,
}

impl AthleteImporter {
    pub fn new(
        athletes: Arc<dyn AthleteRepository>,
        athlete_service: AthleteService,
        teams: TeamService,
        team_importer: TeamImporter,
        tracker: ParticipationTracker,
        locks: ImportLocks,
    ) -> Self {
        Self {
            athletes,
            athlete_service,
            teams,
            team_importer,
            tracker,
            locks,
        }
    }

    /// Import `incoming` as seen at `meeting`; returns the stored athlete and
    /// whether it was created
    ///
    /// **Algorithm:**
    /// 1. Look up by DSV id when the draft has one
    /// 2. Otherwise, or on a miss, look up by name/alias and exact year
    /// 3. Found: fill first/last name, DSV id, gender where the stored value
    ///    is empty, persist only if something changed
    /// 4. Missing: resolve the team, stamp `first_meeting`, create
    /// 5. Record the participation and return its result
    ///
    /// Lookup misses pick the branch; any other storage error aborts before
    /// a write.
    pub async fn import(&self, mut incoming: Athlete, meeting: &str) -> Result<(Athlete, bool)> {
        if meeting.trim().is_empty() {
            return Err(Error::InvalidInput("meeting is required for import".to_string()));
        }
        if !has_team_reference(&incoming) {
            return Err(Error::InvalidInput("no team set in import".to_string()));
        }

        let split = split_name(&incoming.name);
        let display_name = match &split {
            Some(split) => split.display(),
            None => incoming.name.trim().to_string(),
        };
        if display_name.is_empty() {
            return Err(Error::InvalidInput("athlete name is required for import".to_string()));
        }

        let _guard = self
            .locks
            .acquire(ImportLocks::athlete_key(&display_name, incoming.year))
            .await;

        let (id, created) = match self.find_existing(&incoming, &display_name).await? {
            Some(mut existing) => {
                let (firstname, lastname) = match split {
                    Some(split) => (split.first, split.last),
                    None => (incoming.firstname.clone(), incoming.lastname.clone()),
                };

                let mut merge = Merge::new();
                merge
                    .field("firstname", &mut existing.firstname, &firstname)
                    .field("lastname", &mut existing.lastname, &lastname)
                    .field("dsv_id", &mut existing.dsv_id, &incoming.dsv_id)
                    .field("gender", &mut existing.gender, &incoming.gender);

                if merge.changed() {
                    existing.prepare_for_write();
                    if !self.athletes.replace(&existing.detached()).await? {
                        return Err(Error::NotFound(format!("athlete {}", existing.id)));
                    }
                    info!(athlete_id = %existing.id, fields = ?merge.filled(), "Athlete merged from import");
                }
                (existing.id, false)
            }
            None => {
                let team = self.resolve_team(&incoming.team, incoming.team_id, meeting).await?;
                incoming.id = Uuid::nil();
                incoming.team_id = team.id;
                incoming.team = team;
                incoming.first_meeting = meeting.to_string();

                let athlete = self.athlete_service.create(incoming).await?;
                (athlete.id, true)
            }
        };

        let athlete = self.tracker.add_athlete_participation(id, meeting).await?;
        info!(athlete_id = %athlete.id, team_id = %athlete.team_id, meeting, created, "Athlete imported");
        Ok((athlete, created))
    }

    async fn find_existing(&self, incoming: &Athlete, display_name: &str) -> Result<Option<Athlete>> {
        if incoming.dsv_id != 0 {
            if let Some(found) = self.athletes.get_by_dsv_id(incoming.dsv_id).await? {
                debug!(athlete_id = %found.id, dsv_id = incoming.dsv_id, "Import matched by DSV id");
                return Ok(Some(found));
            }
        }

        let found = self
            .athlete_service
            .find_by_name_and_year(display_name, incoming.year)
            .await?;
        if let Some(found) = &found {
            debug!(athlete_id = %found.id, "Import matched by name and year");
        }
        Ok(found.map(|a| a.detached()))
    }

    /// Owning team of a new athlete: by id, DSV id, then name; a named team
    /// that does not exist yet is imported
    async fn resolve_team(&self, draft: &Team, team_id: Uuid, meeting: &str) -> Result<Team> {
        let id = if draft.id.is_nil() { team_id } else { draft.id };
        if !id.is_nil() {
            return self
                .teams
                .get(id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("team {}", id)));
        }

        if draft.dsv_id != 0 {
            if let Some(team) = self.teams.get_by_dsv_id(draft.dsv_id).await? {
                return Ok(team);
            }
        }

        if draft.name.trim().is_empty() {
            return Err(Error::NotFound(format!("team with DSV id {}", draft.dsv_id)));
        }

        if let Some(team) = self.teams.find_by_name_or_alias(&draft.name).await? {
            return Ok(team);
        }

        let (team, _) = self.team_importer.import(draft.clone(), meeting).await?;
        Ok(team)
    }
}

fn has_team_reference(athlete: &Athlete) -> bool {
    !athlete.team_id.is_nil()
        || !athlete.team.id.is_nil()
        || athlete.team.dsv_id != 0
        || !athlete.team.name.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_reference() {
        let mut athlete = Athlete::default();
        assert!(!has_team_reference(&athlete));

        athlete.team.name = "  ".to_string();
        assert!(!has_team_reference(&athlete));

        athlete.team.dsv_id = 12;
        assert!(has_team_reference(&athlete));

        let by_name = Athlete {
            team: Team {
                name: "Sharks".to_string(),
                ..Team::default()
            },
            ..Athlete::default()
        };
        assert!(has_team_reference(&by_name));
    }
}
