//! Client round trips against a live router on an ephemeral port

use sr_athlete::client::{AthleteClient, ClientError, TeamClient};
use sr_athlete::models::{Athlete, Team};
use sr_athlete::repository::{MemoryStore, Repositories};
use sr_athlete::AppState;
use std::sync::Arc;

/// Test helper: serve the router on 127.0.0.1:0 and return its base URL
async fn spawn_server() -> String {
    let store = Arc::new(MemoryStore::new());
    let app = sr_athlete::build_router(AppState::new(Repositories::from_store(store)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", address)
}

fn jane() -> Athlete {
    Athlete {
        name: "Doe, Jane".to_string(),
        year: 2005,
        team: Team {
            name: "Sharks".to_string(),
            ..Team::default()
        },
        ..Athlete::default()
    }
}

#[tokio::test]
async fn test_import_reports_created_flag() {
    let base_url = spawn_server().await;
    let client = AthleteClient::new(&base_url).unwrap();

    let (athlete, created) = client.import_athlete(jane(), "M1").await.unwrap();
    assert!(created);
    assert_eq!(athlete.name, "Jane Doe");

    let (again, created) = client.import_athlete(jane(), "M2").await.unwrap();
    assert!(!created);
    assert_eq!(again.id, athlete.id);
}

#[tokio::test]
async fn test_lookup_by_name_and_year() {
    let base_url = spawn_server().await;
    let client = AthleteClient::new(&base_url).unwrap();

    assert!(client.athlete_by_name_and_year("Jane Doe", 2005).await.unwrap().is_none());

    client.import_athlete(jane(), "M1").await.unwrap();
    let found = client
        .athlete_by_name_and_year("Jane Doe", 2005)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.firstname, "Jane");
    assert_eq!(found.team.name, "Sharks");
}

#[tokio::test]
async fn test_athletes_by_meeting() {
    let base_url = spawn_server().await;
    let client = AthleteClient::new(&base_url).unwrap();
    client.import_athlete(jane(), "M1").await.unwrap();

    assert_eq!(client.athletes_by_meeting("M1").await.unwrap().len(), 1);
    assert!(client.athletes_by_meeting("M2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_athletes_by_meeting_with_reserved_characters() {
    let base_url = spawn_server().await;
    let client = AthleteClient::new(&base_url).unwrap();
    client.import_athlete(jane(), "2024/Berlin?day=1").await.unwrap();

    let athletes = client.athletes_by_meeting("2024/Berlin?day=1").await.unwrap();
    assert_eq!(athletes.len(), 1);
    assert!(athletes[0].participation.contains("2024/Berlin?day=1"));
    assert!(client.athletes_by_meeting("2024").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_team_import_and_rejection() {
    let base_url = spawn_server().await;
    let client = TeamClient::new(&base_url).unwrap();

    let team = Team {
        name: "Sharks".to_string(),
        ..Team::default()
    };
    let (stored, created) = client.import_team(team, "M1").await.unwrap();
    assert!(created);
    assert!(stored.alias.contains("sharks"));

    let err = client.import_team(Team::default(), "M1").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 400, .. }));
}
