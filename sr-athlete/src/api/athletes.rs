//! Athlete endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::params::{parse_id, ApiJson, ApiQuery, NameYearQuery};
use crate::error::{ApiError, ApiResult};
use crate::models::{AddParticipationRequest, Athlete, ImportAthleteRequest, Paging};
use crate::AppState;

/// GET /athlete
pub async fn list_athletes(
    State(state): State<AppState>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Athlete>>> {
    Ok(Json(state.services.athletes.list(&paging).await?))
}

/// GET /athlete/:id
pub async fn get_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Athlete>> {
    let id = parse_id(&id)?;
    state
        .services
        .athletes
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("athlete {}", id)))
}

/// GET /athlete/name_year?name=&year=
pub async fn get_athlete_by_name_and_year(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NameYearQuery>,
) -> ApiResult<Json<Athlete>> {
    state
        .services
        .athletes
        .find_by_name_and_year(&params.name, params.year)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("athlete '{}' born {}", params.name, params.year))
        })
}

/// GET /athlete/meet/:meeting
pub async fn list_athletes_by_meeting(
    State(state): State<AppState>,
    Path(meeting): Path<String>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Athlete>>> {
    Ok(Json(state.services.athletes.list_by_meeting(&meeting, &paging).await?))
}

/// GET /athlete/team/:team_id
pub async fn list_athletes_by_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Athlete>>> {
    let team_id = parse_id(&team_id)?;
    Ok(Json(state.services.athletes.list_by_team(team_id, &paging).await?))
}

/// GET /athlete/team/:team_id/meet/:meeting
pub async fn list_athletes_by_team_and_meeting(
    State(state): State<AppState>,
    Path((team_id, meeting)): Path<(String, String)>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Athlete>>> {
    let team_id = parse_id(&team_id)?;
    let athletes = state
        .services
        .athletes
        .list_by_team_and_meeting(team_id, &meeting, &paging)
        .await?;
    Ok(Json(athletes))
}

/// POST /athlete
pub async fn create_athlete(
    State(state): State<AppState>,
    ApiJson(athlete): ApiJson<Athlete>,
) -> ApiResult<(StatusCode, Json<Athlete>)> {
    let created = state.services.athletes.create(athlete).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /athlete
pub async fn update_athlete(
    State(state): State<AppState>,
    ApiJson(athlete): ApiJson<Athlete>,
) -> ApiResult<Json<Athlete>> {
    Ok(Json(state.services.athletes.update(athlete).await?))
}

/// DELETE /athlete/:id
pub async fn delete_athlete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.athletes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /athlete/participation
pub async fn add_athlete_participation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddParticipationRequest>,
) -> ApiResult<Json<Athlete>> {
    let athlete = state
        .services
        .participation
        .add_athlete_participation(request.athlete, &request.meeting)
        .await?;
    Ok(Json(athlete))
}

/// POST /athlete/import
///
/// 201 when the athlete was created, 200 when an existing one was matched.
pub async fn import_athlete(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImportAthleteRequest>,
) -> ApiResult<(StatusCode, Json<Athlete>)> {
    let (athlete, created) = state
        .services
        .athlete_import
        .import(request.athlete, &request.meeting)
        .await?;

    info!(athlete_id = %athlete.id, meeting = %request.meeting, created, "Athlete import handled");

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(athlete)))
}

/// Build athlete routes
pub fn athlete_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/athlete",
            get(list_athletes).post(create_athlete).put(update_athlete),
        )
        .route("/athlete/name_year", get(get_athlete_by_name_and_year))
        .route("/athlete/participation", post(add_athlete_participation))
        .route("/athlete/import", post(import_athlete))
        .route("/athlete/meet/:meeting", get(list_athletes_by_meeting))
        .route("/athlete/team/:team_id", get(list_athletes_by_team))
        .route(
            "/athlete/team/:team_id/meet/:meeting",
            get(list_athletes_by_team_and_meeting),
        )
        .route("/athlete/:id", get(get_athlete).delete(delete_athlete))
}
