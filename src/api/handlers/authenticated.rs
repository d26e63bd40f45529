//! Endpoints open to any signed-in user.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use super::{internal_error, not_found, rejected, ApiError, ApiResult};
use crate::api::middleware::Authenticated;
use crate::api::AppState;
use crate::models::*;

/// Public tasks whose window has already closed.
pub async fn list_finished_tasks(
    State(state): State<AppState>,
    Authenticated(_): Authenticated,
) -> ApiResult<Json<Vec<Task>>> {
    state
        .db
        .get_public_finished_tasks(Utc::now())
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_consumer(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<Consumer>> {
    state
        .db
        .get_consumer(principal.user_account_id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Consumer"))
}

/// Registers the principal as a consumer.
pub async fn create_consumer(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Json(form): Json<ConsumerForm>,
) -> ApiResult<(StatusCode, Json<Consumer>)> {
    if principal.consumer_id.is_some() {
        return Err(ApiError::Status(
            StatusCode::CONFLICT,
            "Already a consumer".to_string(),
        ));
    }

    form.validate().into_result().map_err(rejected)?;

    let consumer = state
        .db
        .create_consumer(principal.user_account_id, form)
        .map_err(internal_error)?;
    tracing::info!("{} registered as consumer", principal.username);

    Ok((StatusCode::CREATED, Json(consumer)))
}

pub async fn update_consumer(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    Json(form): Json<ConsumerForm>,
) -> ApiResult<Json<Consumer>> {
    if principal.consumer_id.is_none() {
        return Err(not_found("Consumer"));
    }

    form.validate().into_result().map_err(rejected)?;

    state
        .db
        .update_consumer(principal.user_account_id, form)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Consumer"))
}
