//! Certificate endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::params::{parse_id, ApiJson};
use crate::error::{ApiError, ApiResult};
use crate::models::Certificate;
use crate::AppState;

/// GET /certificate
pub async fn list_certificates(State(state): State<AppState>) -> ApiResult<Json<Vec<Certificate>>> {
    Ok(Json(state.services.certificates.list().await?))
}

/// GET /certificate/amount
pub async fn count_certificates(State(state): State<AppState>) -> ApiResult<Json<u64>> {
    Ok(Json(state.services.certificates.count().await?))
}

/// GET /certificate/meet/:meeting/amount
pub async fn count_certificates_by_meeting(
    State(state): State<AppState>,
    Path(meeting): Path<String>,
) -> ApiResult<Json<u64>> {
    Ok(Json(state.services.certificates.count_by_meeting(&meeting).await?))
}

/// GET /certificate/:id
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Certificate>> {
    let id = parse_id(&id)?;
    state
        .services
        .certificates
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("certificate {}", id)))
}

/// GET /certificate/athlete/:athlete_id
pub async fn list_certificates_by_athlete(
    State(state): State<AppState>,
    Path(athlete_id): Path<String>,
) -> ApiResult<Json<Vec<Certificate>>> {
    let athlete_id = parse_id(&athlete_id)?;
    Ok(Json(state.services.certificates.list_by_athlete(athlete_id).await?))
}

/// GET /certificate/athlete/:athlete_id/meet/:meeting
pub async fn list_certificates_by_athlete_and_meeting(
    State(state): State<AppState>,
    Path((athlete_id, meeting)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Certificate>>> {
    let athlete_id = parse_id(&athlete_id)?;
    let certificates = state
        .services
        .certificates
        .list_by_athlete_and_meeting(athlete_id, &meeting)
        .await?;
    Ok(Json(certificates))
}

/// POST /certificate
pub async fn create_certificate(
    State(state): State<AppState>,
    ApiJson(certificate): ApiJson<Certificate>,
) -> ApiResult<(StatusCode, Json<Certificate>)> {
    let created = state.services.certificates.create(certificate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /certificate
pub async fn update_certificate(
    State(state): State<AppState>,
    ApiJson(certificate): ApiJson<Certificate>,
) -> ApiResult<Json<Certificate>> {
    Ok(Json(state.services.certificates.update(certificate).await?))
}

/// DELETE /certificate/:id
pub async fn delete_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    state.services.certificates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build certificate routes
pub fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/certificate",
            get(list_certificates)
                .post(create_certificate)
                .put(update_certificate),
        )
        .route("/certificate/amount", get(count_certificates))
        .route(
            "/certificate/meet/:meeting/amount",
            get(count_certificates_by_meeting),
        )
        .route(
            "/certificate/athlete/:athlete_id",
            get(list_certificates_by_athlete),
        )
        .route(
            "/certificate/athlete/:athlete_id/meet/:meeting",
            get(list_certificates_by_athlete_and_meeting),
        )
        .route(
            "/certificate/:id",
            get(get_certificate).delete(delete_certificate),
        )
}
