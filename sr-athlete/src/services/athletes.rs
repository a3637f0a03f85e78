//! Athlete CRUD with the read-time team join

use crate::models::{Athlete, Paging, Team};
use crate::repository::{AthleteQuery, AthleteRepository, TeamRepository, TextQuery};
use sr_common::{normalize, split_name, Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AthleteService {
    athletes: Arc<dyn AthleteRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl AthleteService {
    pub fn new(athletes: Arc<dyn AthleteRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { athletes, teams }
    }

    /// Attach the stored team; a missing or unreadable team leaves it empty
    async fn attach_team(&self, athlete: &mut Athlete, cache: &mut HashMap<Uuid, Team>) {
        athlete.team = Team::default();
        if athlete.team_id.is_nil() {
            return;
        }

        if let Some(team) = cache.get(&athlete.team_id) {
            athlete.team = team.clone();
            return;
        }

        match self.teams.get(athlete.team_id).await {
            Ok(Some(team)) => {
                cache.insert(athlete.team_id, team.clone());
                athlete.team = team;
            }
            Ok(None) => {
                debug!(athlete_id = %athlete.id, team_id = %athlete.team_id, "Team of athlete not found");
            }
            Err(e) => {
                warn!(athlete_id = %athlete.id, team_id = %athlete.team_id, error = %e, "Team lookup failed");
            }
        }
    }

    async fn join(&self, mut athlete: Athlete) -> Athlete {
        self.attach_team(&mut athlete, &mut HashMap::new()).await;
        athlete
    }

    async fn join_all(&self, mut athletes: Vec<Athlete>) -> Vec<Athlete> {
        let mut cache = HashMap::new();
        for athlete in athletes.iter_mut() {
            self.attach_team(athlete, &mut cache).await;
        }
        athletes
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Athlete>> {
        match self.athletes.get(id).await? {
            Some(athlete) => Ok(Some(self.join(athlete).await)),
            None => Ok(None),
        }
    }

    pub async fn get_by_dsv_id(&self, dsv_id: i64) -> Result<Option<Athlete>> {
        match self.athletes.get_by_dsv_id(dsv_id).await? {
            Some(athlete) => Ok(Some(self.join(athlete).await)),
            None => Ok(None),
        }
    }

    /// Athlete of birth year `year` whose name or alias matches `name`
    ///
    /// "Last, First" is looked up as "First Last". Among several substring
    /// matches an exact alias hit wins, otherwise the first by name.
    pub async fn find_by_name_and_year(&self, name: &str, year: i32) -> Result<Option<Athlete>> {
        let name = match split_name(name) {
            Some(split) => split.display(),
            None => name.trim().to_string(),
        };
        if name.is_empty() {
            return Ok(None);
        }

        let query = AthleteQuery {
            text: TextQuery::name(&name),
            year: Some(year),
            ..AthleteQuery::default()
        };
        let candidates = self.athletes.search(&query, &Paging::all()).await?;

        let wanted = normalize(&name);
        let best = candidates
            .iter()
            .position(|a| a.alias.contains(&wanted) || normalize(&a.name) == wanted)
            .unwrap_or(0);

        match candidates.into_iter().nth(best) {
            Some(athlete) => Ok(Some(self.join(athlete).await)),
            None => Ok(None),
        }
    }

    pub async fn search(&self, query: &AthleteQuery, paging: &Paging) -> Result<Vec<Athlete>> {
        let athletes = self.athletes.search(query, paging).await?;
        Ok(self.join_all(athletes).await)
    }

    /// Listing with the free-text `query` of `paging`
    pub async fn list(&self, paging: &Paging) -> Result<Vec<Athlete>> {
        let query = AthleteQuery {
            text: TextQuery::listing(&paging.query),
            ..AthleteQuery::default()
        };
        self.search(&query, paging).await
    }

    pub async fn list_by_meeting(&self, meeting: &str, paging: &Paging) -> Result<Vec<Athlete>> {
        let query = AthleteQuery {
            text: TextQuery::listing(&paging.query),
            meeting: Some(meeting.to_string()),
            ..AthleteQuery::default()
        };
        self.search(&query, paging).await
    }

    pub async fn list_by_team(&self, team_id: Uuid, paging: &Paging) -> Result<Vec<Athlete>> {
        let query = AthleteQuery {
            text: TextQuery::listing(&paging.query),
            team_id: Some(team_id),
            ..AthleteQuery::default()
        };
        self.search(&query, paging).await
    }

    pub async fn list_by_team_and_meeting(
        &self,
        team_id: Uuid,
        meeting: &str,
        paging: &Paging,
    ) -> Result<Vec<Athlete>> {
        let query = AthleteQuery {
            text: TextQuery::listing(&paging.query),
            meeting: Some(meeting.to_string()),
            team_id: Some(team_id),
            ..AthleteQuery::default()
        };
        self.search(&query, paging).await
    }

    fn validate(athlete: &Athlete) -> Result<()> {
        if athlete.name.trim().is_empty() {
            return Err(Error::InvalidInput("athlete name is required".to_string()));
        }
        if athlete.team_id.is_nil() {
            return Err(Error::InvalidInput("athlete has no team".to_string()));
        }
        Ok(())
    }

    /// Store a new athlete under a fresh id
    pub async fn create(&self, mut athlete: Athlete) -> Result<Athlete> {
        athlete.prepare_for_write();
        Self::validate(&athlete)?;
        athlete.id = Uuid::new_v4();

        self.athletes.insert(&athlete.detached()).await?;
        info!(athlete_id = %athlete.id, team_id = %athlete.team_id, name = %athlete.name, "Athlete added");

        Ok(self.join(athlete).await)
    }

    /// Full replace by id; a stored `first_meeting` is kept
    pub async fn update(&self, mut athlete: Athlete) -> Result<Athlete> {
        if athlete.id.is_nil() {
            return Err(Error::InvalidInput("athlete id is required".to_string()));
        }
        athlete.prepare_for_write();
        Self::validate(&athlete)?;

        let id = athlete.id;
        let not_found = move || Error::NotFound(format!("athlete {}", id));
        let stored = self.athletes.get(id).await?.ok_or_else(not_found)?;
        if !stored.first_meeting.is_empty() {
            athlete.first_meeting = stored.first_meeting;
        }

        if !self.athletes.replace(&athlete.detached()).await? {
            return Err(not_found());
        }
        info!(athlete_id = %athlete.id, "Athlete updated");

        Ok(self.join(athlete).await)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.athletes.delete(id).await? {
            return Err(Error::NotFound(format!("athlete {}", id)));
        }
        info!(athlete_id = %id, "Athlete deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    async fn fixture() -> (Arc<MemoryStore>, AthleteService, Team) {
        let store = Arc::new(MemoryStore::new());
        let team = Team {
            id: Uuid::new_v4(),
            name: "Sharks".to_string(),
            ..Team::default()
        };
        TeamRepository::insert(store.as_ref(), &team).await.unwrap();
        let service = AthleteService::new(store.clone(), store.clone());
        (store, service, team)
    }

    fn athlete(name: &str, year: i32, team: &Team) -> Athlete {
        Athlete {
            name: name.to_string(),
            year,
            team: Team {
                id: team.id,
                ..Team::default()
            },
            ..Athlete::default()
        }
    }

    #[tokio::test]
    async fn test_create_joins_team_and_stores_only_id() {
        let (store, service, team) = fixture().await;

        let created = service.create(athlete("Doe, Jane", 2005, &team)).await.unwrap();
        assert!(!created.id.is_nil());
        assert_eq!(created.name, "Jane Doe");
        assert_eq!(created.team_id, team.id);
        assert_eq!(created.team.name, "Sharks");

        let stored = AthleteRepository::get(store.as_ref(), created.id).await.unwrap().unwrap();
        assert_eq!(stored.team, Team::default());
        assert!(stored.alias.contains("janedoe"));
    }

    #[tokio::test]
    async fn test_create_rejects_missing_name_or_team() {
        let (_store, service, team) = fixture().await;

        let err = service.create(athlete("  ", 2005, &team)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let no_team = Athlete {
            name: "Jane Doe".to_string(),
            ..Athlete::default()
        };
        let err = service.create(no_team).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_team_leaves_empty_embed() {
        let (store, service, team) = fixture().await;
        let created = service.create(athlete("Jane Doe", 2005, &team)).await.unwrap();

        TeamRepository::delete(store.as_ref(), team.id).await.unwrap();

        let fetched = service.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.team, Team::default());
        assert_eq!(fetched.team_id, team.id);
    }

    #[tokio::test]
    async fn test_find_by_name_and_year_prefers_exact_alias() {
        let (_store, service, team) = fixture().await;
        service.create(athlete("Jane Doebler", 2005, &team)).await.unwrap();
        let jane = service.create(athlete("Jane Doe", 2005, &team)).await.unwrap();
        service.create(athlete("Jane Doe", 2006, &team)).await.unwrap();

        let found = service
            .find_by_name_and_year("Doe, Jane", 2005)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, jane.id);

        assert!(service.find_by_name_and_year("Jane Doe", 1999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (_store, service, team) = fixture().await;
        let mut ghost = athlete("Jane Doe", 2005, &team);
        ghost.id = Uuid::new_v4();

        let err = service.update(ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_adds_alias_of_new_name() {
        let (_store, service, team) = fixture().await;
        let mut created = service.create(athlete("Jane Doe", 2005, &team)).await.unwrap();

        created.name = "Jane Smith".to_string();
        let updated = service.update(created).await.unwrap();
        assert!(updated.alias.contains("janedoe"));
        assert!(updated.alias.contains("janesmith"));
    }

    #[tokio::test]
    async fn test_update_keeps_first_meeting() {
        let (_store, service, team) = fixture().await;
        let mut imported = athlete("Doe, Jane", 2005, &team);
        imported.first_meeting = "M1".to_string();
        let mut created = service.create(imported).await.unwrap();

        created.first_meeting = "M9".to_string();
        let updated = service.update(created.clone()).await.unwrap();
        assert_eq!(updated.first_meeting, "M1");

        created.first_meeting = String::new();
        service.update(created.clone()).await.unwrap();
        let stored = service.get(created.id).await.unwrap().unwrap();
        assert_eq!(stored.first_meeting, "M1");
    }

    #[tokio::test]
    async fn test_update_sets_missing_first_meeting() {
        let (_store, service, team) = fixture().await;
        let mut created = service.create(athlete("Jane Doe", 2005, &team)).await.unwrap();
        assert!(created.first_meeting.is_empty());

        created.first_meeting = "M3".to_string();
        let updated = service.update(created).await.unwrap();
        assert_eq!(updated.first_meeting, "M3");
    }

    #[tokio::test]
    async fn test_delete() {
        let (_store, service, team) = fixture().await;
        let created = service.create(athlete("Jane Doe", 2005, &team)).await.unwrap();

        service.delete(created.id).await.unwrap();
        assert!(service.get(created.id).await.unwrap().is_none());
        assert!(service.delete(created.id).await.unwrap_err().is_not_found());
    }
}
