//! Festival CRUD handlers.
//!
//! Each handler does the same three things: take the principal (already
//! resolved by the extractor, so unauthenticated requests never get here),
//! parse the path id and body, and call exactly one service operation.
//! Permission decisions and validation rules belong to the service; its errors
//! are passed through unchanged.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, Span};

use crate::{
    api::response::{ApiAcknowledgement, ApiError},
    auth::Principal,
    festival::{FestivalRequest, FestivalResponse, SharedFestivalService},
};

pub const DELETED_MESSAGE: &str = "페스티벌 삭제 완료";

/// Parse the `{festival_id}` path segment.
///
/// # Errors
/// Returns [`ApiError::InvalidIdentifier`] for anything that is not an `i64`.
pub fn parse_festival_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidIdentifier(raw.to_string()))
}

/// Parse the `{festival_id}` segment, reporting undecodable segments as invalid ids too.
fn path_festival_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    let Path(raw) = path.map_err(|rejection| ApiError::InvalidIdentifier(rejection.body_text()))?;
    let id = parse_festival_id(&raw)?;
    Span::current().record("festival_id", id);
    Ok(id)
}

/// Unwrap a JSON body, reporting malformed payloads as validation failures.
fn festival_body(
    payload: Result<Json<FestivalRequest>, JsonRejection>,
) -> Result<FestivalRequest, ApiError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| ApiError::ValidationFailed(rejection.body_text()))
}

#[must_use]
pub fn created_message(title: &str) -> String {
    format!("{title}를 추가했습니다.")
}

#[utoipa::path(
    post,
    path = "/api/festivals",
    request_body = FestivalRequest,
    responses(
        (status = 201, description = "Festival created.", body = ApiAcknowledgement),
        (status = 400, description = "Invalid festival payload.", body = ApiAcknowledgement),
        (status = 401, description = "Missing or invalid session.", body = ApiAcknowledgement),
        (status = 403, description = "Caller may not register festivals.", body = ApiAcknowledgement),
    ),
    security(("session" = []), ("session_cookie" = [])),
    tag = "festivals"
)]
/// Registers a festival. The acknowledgement echoes the title the service
/// stored, not the submitted one.
#[instrument(skip_all, fields(user_id = %principal.user_id))]
pub async fn create_festival(
    principal: Principal,
    Extension(service): Extension<SharedFestivalService>,
    payload: Result<Json<FestivalRequest>, JsonRejection>,
) -> Result<ApiAcknowledgement, ApiError> {
    let request = festival_body(payload)?;

    let created = service.create(request, &principal).await?;
    info!(festival_id = created.id, "festival created");

    Ok(ApiAcknowledgement::new(
        StatusCode::CREATED,
        created_message(&created.title),
    ))
}

#[utoipa::path(
    get,
    path = "/api/festivals",
    responses(
        (status = 200, description = "All festivals, in service order.", body = [FestivalResponse]),
    ),
    tag = "festivals"
)]
/// Lists every festival. No principal is needed.
pub async fn list_festivals(
    Extension(service): Extension<SharedFestivalService>,
) -> Result<Json<Vec<FestivalResponse>>, ApiError> {
    Ok(Json(service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/festivals/{festival_id}",
    params(("festival_id" = i64, Path, description = "Festival id")),
    responses(
        (status = 200, description = "Festival detail.", body = FestivalResponse),
        (status = 400, description = "Non-numeric festival id.", body = ApiAcknowledgement),
        (status = 401, description = "Missing or invalid session.", body = ApiAcknowledgement),
        (status = 404, description = "Festival not found.", body = ApiAcknowledgement),
    ),
    security(("session" = []), ("session_cookie" = [])),
    tag = "festivals"
)]
#[instrument(skip_all, fields(user_id = %principal.user_id, festival_id = tracing::field::Empty))]
pub async fn get_festival(
    principal: Principal,
    path: Result<Path<String>, PathRejection>,
    Extension(service): Extension<SharedFestivalService>,
) -> Result<Json<FestivalResponse>, ApiError> {
    let id = path_festival_id(path)?;
    Ok(Json(service.get_one(id, &principal).await?))
}

#[utoipa::path(
    put,
    path = "/api/festivals/{festival_id}",
    request_body = FestivalRequest,
    params(("festival_id" = i64, Path, description = "Festival id")),
    responses(
        (status = 200, description = "Festival replaced.", body = FestivalResponse),
        (status = 400, description = "Non-numeric id or invalid payload.", body = ApiAcknowledgement),
        (status = 401, description = "Missing or invalid session.", body = ApiAcknowledgement),
        (status = 403, description = "Caller does not own the festival.", body = ApiAcknowledgement),
        (status = 404, description = "Festival not found.", body = ApiAcknowledgement),
    ),
    security(("session" = []), ("session_cookie" = [])),
    tag = "festivals"
)]
/// Replaces all mutable fields of a festival. The id always comes from the path.
#[instrument(skip_all, fields(user_id = %principal.user_id, festival_id = tracing::field::Empty))]
pub async fn update_festival(
    principal: Principal,
    path: Result<Path<String>, PathRejection>,
    Extension(service): Extension<SharedFestivalService>,
    payload: Result<Json<FestivalRequest>, JsonRejection>,
) -> Result<Json<FestivalResponse>, ApiError> {
    let id = path_festival_id(path)?;
    let request = festival_body(payload)?;

    Ok(Json(service.update(id, request, &principal).await?))
}

#[utoipa::path(
    delete,
    path = "/api/festivals/{festival_id}",
    params(("festival_id" = i64, Path, description = "Festival id")),
    responses(
        (status = 200, description = "Festival deleted.", body = ApiAcknowledgement),
        (status = 400, description = "Non-numeric festival id.", body = ApiAcknowledgement),
        (status = 401, description = "Missing or invalid session.", body = ApiAcknowledgement),
        (status = 403, description = "Caller does not own the festival.", body = ApiAcknowledgement),
        (status = 404, description = "Festival not found.", body = ApiAcknowledgement),
    ),
    security(("session" = []), ("session_cookie" = [])),
    tag = "festivals"
)]
#[instrument(skip_all, fields(user_id = %principal.user_id, festival_id = tracing::field::Empty))]
pub async fn delete_festival(
    principal: Principal,
    path: Result<Path<String>, PathRejection>,
    Extension(service): Extension<SharedFestivalService>,
) -> Result<ApiAcknowledgement, ApiError> {
    let id = path_festival_id(path)?;
    service.delete(id, &principal).await?;
    info!("festival deleted");

    Ok(ApiAcknowledgement::new(StatusCode::OK, DELETED_MESSAGE))
}
