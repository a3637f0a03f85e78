//! Team CRUD

use crate::models::{Paging, Team};
use crate::repository::{TeamQuery, TeamRepository, TextQuery};
use sr_common::{normalize, Error, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Team>> {
        self.teams.get(id).await
    }

    pub async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Team>> {
        self.teams.get_by_dsv_id(dsv_id).await
    }

    /// Team whose name or alias matches `name`, exact alias hits first
    pub async fn find_by_name_or_alias(&self, name: &str) -> Result<Option<Team>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let query = TeamQuery {
            text: TextQuery::name(name),
            ..TeamQuery::default()
        };
        let candidates = self.teams.search(&query, &Paging::all()).await?;

        let wanted = normalize(name);
        let best = candidates
            .iter()
            .position(|t| t.alias.contains(&wanted) || normalize(&t.name) == wanted)
            .unwrap_or(0);

        Ok(candidates.into_iter().nth(best))
    }

    pub async fn list(&self, paging: &Paging) -> Result<Vec<Team>> {
        let query = TeamQuery {
            text: TextQuery::listing(&paging.query),
            ..TeamQuery::default()
        };
        self.teams.search(&query, paging).await
    }

    pub async fn list_by_meeting(&self, meeting: &str, paging: &Paging) -> Result<Vec<Team>> {
        let query = TeamQuery {
            text: TextQuery::listing(&paging.query),
            meeting: Some(meeting.to_string()),
        };
        self.teams.search(&query, paging).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.teams.count(None).await
    }

    pub async fn count_by_meeting(&self, meeting: &str) -> Result<u64> {
        self.teams.count(Some(meeting)).await
    }

    pub async fn create(&self, mut team: Team) -> Result<Team> {
        team.prepare_for_write();
        if team.name.trim().is_empty() {
            return Err(Error::InvalidInput("team name is required".to_string()));
        }
        team.id = Uuid::new_v4();

        self.teams.insert(&team).await?;
        info!(team_id = %team.id, name = %team.name, "Team added");
        Ok(team)
    }

    /// Full replace by id; a stored `first_meeting` is kept
    pub async fn update(&self, mut team: Team) -> Result<Team> {
        if team.id.is_nil() {
            return Err(Error::InvalidInput("team id is required".to_string()));
        }
        team.prepare_for_write();
        if team.name.trim().is_empty() {
            return Err(Error::InvalidInput("team name is required".to_string()));
        }

        let id = team.id;
        let not_found = move || Error::NotFound(format!("team {}", id));
        let stored = self.teams.get(id).await?.ok_or_else(not_found)?;
        if !stored.first_meeting.is_empty() {
            team.first_meeting = stored.first_meeting;
        }

        if !self.teams.replace(&team).await? {
            return Err(not_found());
        }
        info!(team_id = %team.id, "Team updated");
        Ok(team)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.teams.delete(id).await? {
            return Err(Error::NotFound(format!("team {}", id)));
        }
        info!(team_id = %id, "Team deleted");
        Ok(())
    }
}
