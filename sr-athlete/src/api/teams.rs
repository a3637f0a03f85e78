//! Team endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use super::params::{parse_id, AliasQuery, ApiJson, ApiQuery, NameQuery};
use crate::error::{ApiError, ApiResult};
use crate::models::{AddTeamParticipationRequest, ImportTeamRequest, Paging, Team};
use crate::AppState;

/// GET /team
pub async fn list_teams(
    State(state): State<AppState>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.services.teams.list(&paging).await?))
}

/// GET /team/amount
pub async fn count_teams(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(state.services.teams.count().await?))
}

/// GET /team/meet/:meeting
pub async fn list_teams_by_meeting(
    State(state): State<AppState>,
    Path(meeting): Path<String>,
    ApiQuery(paging): ApiQuery<Paging>,
) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.services.teams.list_by_meeting(&meeting, &paging).await?))
}

/// GET /team/meet/:meeting/amount
pub async fn count_teams_by_meeting(
    State(state): State<AppState>,
    Path(meeting): Path<String>,
) -> ApiResult<Json<u64>> {
    Ok(Json(state.services.teams.count_by_meeting(&meeting).await?))
}

async fn find_team(state: &AppState, name: &str) -> ApiResult<Json<Team>> {
    state
        .services
        .teams
        .find_by_name_or_alias(name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("team '{}'", name)))
}

/// GET /team/name?name=
pub async fn get_team_by_name(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<NameQuery>,
) -> ApiResult<Json<Team>> {
    find_team(&state, &params.name).await
}

/// GET /team/alias?alias=
pub async fn get_team_by_alias(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AliasQuery>,
) -> ApiResult<Json<Team>> {
    find_team(&state, &params.alias).await
}

/// GET /team/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Team>> {
    let id = parse_id(&id)?;
    state
        .services
        .teams
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("team {}", id)))
}

/// POST /team
pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(team): ApiJson<Team>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let created = state.services.teams.create(team).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /team
pub async fn update_team(
    State(state): State<AppState>,
    ApiJson(team): ApiJson<Team>,
) -> ApiResult<Json<Team>> {
    Ok(Json(state.services.teams.update(team).await?))
}

/// DELETE /team/:id
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.teams.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /team/participation
pub async fn add_team_participation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddTeamParticipationRequest>,
) -> ApiResult<Json<Team>> {
    let team = state
        .services
        .participation
        .add_team_participation(request.team, &request.meeting)
        .await?;
    Ok(Json(team))
}

/// POST /team/import
///
/// 201 when the team was created, 200 when an existing one was matched.
pub async fn import_team(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ImportTeamRequest>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let (team, created) = state
        .services
        .team_import
        .import(request.team, &request.meeting)
        .await?;

    info!(team_id = %team.id, meeting = %request.meeting, created, "Team import handled");

    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(team)))
}

/// Build team routes
pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/team", get(list_teams).post(create_team).put(update_team))
        .route("/team/amount", get(count_teams))
        .route("/team/name", get(get_team_by_name))
        .route("/team/alias", get(get_team_by_alias))
        .route("/team/participation", post(add_team_participation))
        .route("/team/import", post(import_team))
        .route("/team/meet/:meeting", get(list_teams_by_meeting))
        .route("/team/meet/:meeting/amount", get(count_teams_by_meeting))
        .route("/team/:id", get(get_team).delete(delete_team))
}
