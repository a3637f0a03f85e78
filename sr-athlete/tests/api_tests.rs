//! Router tests against an in-memory SQLite database

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sr_athlete::db::SqliteStore;
use sr_athlete::repository::Repositories;
use sr_athlete::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Test helper: app over a fresh in-memory database
async fn create_test_app() -> Router {
    let pool = sr_common::db::connect_in_memory()
        .await
        .expect("Failed to create in-memory database");
    let store = Arc::new(SqliteStore::new(pool));
    sr_athlete::build_router(AppState::new(Repositories::from_store(store)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create_team(app: &Router, name: &str) -> Value {
    let (status, team) = send(app, Method::POST, "/team", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    team
}

#[tokio::test]
async fn test_actuator_and_health() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/actuator", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OPERATIONAL"));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "sr-athlete");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_import_athlete_created_then_matched() {
    let app = create_test_app().await;
    let request = json!({
        "meeting": "M1",
        "athlete": { "name": "Doe, Jane", "year": 2005, "team": { "name": "Sharks" } }
    });

    let (status, first) = send(&app, Method::POST, "/athlete/import", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["name"], "Jane Doe");
    assert_eq!(first["firstname"], "Jane");
    assert_eq!(first["alias"], json!(["janedoe"]));
    assert_eq!(first["first_meeting"], "M1");
    assert_eq!(first["team"]["name"], "Sharks");
    assert_eq!(first["team"]["alias"], json!(["sharks"]));

    let again = json!({
        "meeting": "M2",
        "athlete": { "name": "Doe, Jane", "year": 2005, "team": { "name": "Sharks" } }
    });
    let (status, second) = send(&app, Method::POST, "/athlete/import", Some(again)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["_id"], first["_id"]);
    assert_eq!(second["participation"], json!(["M1", "M2"]));
    assert_eq!(second["first_meeting"], "M1");
}

#[tokio::test]
async fn test_import_without_team_is_bad_request() {
    let app = create_test_app().await;
    let request = json!({ "meeting": "M1", "athlete": { "name": "Doe, Jane", "year": 2005 } });

    let (status, body) = send(&app, Method::POST, "/athlete/import", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("no team set"));

    let (_, athletes) = send(&app, Method::GET, "/athlete", None).await;
    assert_eq!(athletes, json!([]));
}

#[tokio::test]
async fn test_athlete_crud() {
    let app = create_test_app().await;
    let team = create_team(&app, "Sharks").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/athlete",
        Some(json!({ "name": "Doe, Jane", "year": 2005, "team": { "_id": team["_id"] } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["team_id"], team["_id"]);
    let id = created["_id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/athlete/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["team"]["name"], "Sharks");

    let mut changed = fetched.clone();
    changed["gender"] = json!("F");
    let (status, updated) = send(&app, Method::PUT, "/athlete", Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["gender"], "F");

    let (status, found) = send(&app, Method::GET, "/athlete/name_year?name=jane%20doe&year=2005", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["_id"], json!(id));

    let (status, _) = send(&app, Method::DELETE, &format!("/athlete/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &format!("/athlete/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, &format!("/athlete/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_and_body_are_bad_request() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/athlete/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/athlete")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/athlete/name_year?name=Jane", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_paging_and_query() {
    let app = create_test_app().await;
    for name in ["Charlie Brown", "Alice Smith", "Bob Stone"] {
        let request = json!({ "meeting": "M1", "athlete": { "name": name, "year": 2004, "team": { "name": "Sharks" } } });
        let (status, _) = send(&app, Method::POST, "/athlete/import", Some(request)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, Method::GET, "/athlete", None).await;
    let names: Vec<&str> = all.as_array().unwrap().iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Alice Smith", "Bob Stone", "Charlie Brown"]);

    let (_, page) = send(&app, Method::GET, "/athlete?limit=1&offset=1", None).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["name"], "Bob Stone");

    let (_, hits) = send(&app, Method::GET, "/athlete?query=SMITH", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (_, by_meeting) = send(&app, Method::GET, "/athlete/meet/M1", None).await;
    assert_eq!(by_meeting.as_array().unwrap().len(), 3);

    let (_, none) = send(&app, Method::GET, "/athlete/meet/M9", None).await;
    assert_eq!(none, json!([]));

    let team_id = all[0]["team_id"].as_str().unwrap().to_string();
    let (_, by_team) = send(&app, Method::GET, &format!("/athlete/team/{}/meet/M1", team_id), None).await;
    assert_eq!(by_team.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_participation_endpoint_is_idempotent() {
    let app = create_test_app().await;
    let team = create_team(&app, "Sharks").await;
    let (_, athlete) = send(
        &app,
        Method::POST,
        "/athlete",
        Some(json!({ "name": "Jane Doe", "year": 2005, "team_id": team["_id"] })),
    )
    .await;

    let request = json!({ "athlete": athlete["_id"], "meeting": "M1" });
    send(&app, Method::POST, "/athlete/participation", Some(request.clone())).await;
    let (status, updated) = send(&app, Method::POST, "/athlete/participation", Some(request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["participation"], json!(["M1"]));
}

#[tokio::test]
async fn test_team_endpoints() {
    let app = create_test_app().await;

    let request = json!({ "meeting": "M1", "team": { "name": "SV Sharks", "country": "DE" } });
    let (status, team) = send(&app, Method::POST, "/team/import", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    create_team(&app, "Dolphins").await;

    let merge = json!({ "meeting": "M2", "team": { "name": "sv sharks", "country": "AT", "dsv_id": 88 } });
    let (status, merged) = send(&app, Method::POST, "/team/import", Some(merge)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["_id"], team["_id"]);
    assert_eq!(merged["country"], "DE");
    assert_eq!(merged["dsv_id"], 88);

    let (_, amount) = send(&app, Method::GET, "/team/amount", None).await;
    assert_eq!(amount, json!(2));
    let (_, amount) = send(&app, Method::GET, "/team/meet/M2/amount", None).await;
    assert_eq!(amount, json!(1));

    let (status, by_alias) = send(&app, Method::GET, "/team/alias?alias=SVSharks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_alias["_id"], team["_id"]);

    let (status, _) = send(&app, Method::GET, "/team/name?name=Orcas", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut renamed = merged.clone();
    renamed["name"] = json!("SV Haie");
    renamed["first_meeting"] = json!("M9");
    let (status, updated) = send(&app, Method::PUT, "/team", Some(renamed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "SV Haie");
    assert_eq!(updated["alias"], json!(["svhaie", "svsharks"]));
    assert_eq!(updated["first_meeting"], "M1");
    let (status, by_name) = send(&app, Method::GET, "/team/name?name=sv%20haie", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_name["_id"], team["_id"]);

    let ghost = json!({ "_id": uuid::Uuid::new_v4().to_string(), "name": "Orcas" });
    let (status, _) = send(&app, Method::PUT, "/team", Some(ghost)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = team["_id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/team/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, teams) = send(&app, Method::GET, "/team", None).await;
    assert_eq!(teams.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_certificate_crud() {
    let app = create_test_app().await;
    let athlete_id = uuid::Uuid::new_v4().to_string();

    for (ordering, meeting) in [(2, "M1"), (1, "M2")] {
        let body = json!({ "name": "100m Freestyle", "athlete_id": athlete_id, "meeting": meeting, "ordering": ordering });
        let (status, created) = send(&app, Method::POST, "/certificate", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created["added_at"].is_string());
    }

    let (_, list) = send(&app, Method::GET, &format!("/certificate/athlete/{}", athlete_id), None).await;
    let orderings: Vec<i64> = list.as_array().unwrap().iter().map(|c| c["ordering"].as_i64().unwrap()).collect();
    assert_eq!(orderings, vec![1, 2]);

    let (_, amount) = send(&app, Method::GET, "/certificate/meet/M1/amount", None).await;
    assert_eq!(amount, json!(1));

    let mut hidden = list[0].clone();
    hidden["hidden"] = json!(true);
    let (status, updated) = send(&app, Method::PUT, "/certificate", Some(hidden)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["hidden"], true);
    assert_eq!(updated["added_at"], list[0]["added_at"]);

    let id = updated["_id"].as_str().unwrap();
    let (status, _) = send(&app, Method::DELETE, &format!("/certificate/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, amount) = send(&app, Method::GET, "/certificate/amount", None).await;
    assert_eq!(amount, json!(1));
}
