//! Public browsing: no principal required, only public entities visible.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{internal_error, not_found, ApiResult};
use crate::api::AppState;
use crate::models::*;

/// Public tasks that have not finished yet.
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    state
        .db
        .get_public_unfinished_tasks(Utc::now())
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    state
        .db
        .get_task(id)
        .map_err(internal_error)?
        .filter(|task| task.privacy == Privacy::Public)
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

pub async fn list_work_plans(State(state): State<AppState>) -> ApiResult<Json<Vec<WorkPlan>>> {
    state
        .db
        .get_public_work_plans()
        .map(Json)
        .map_err(internal_error)
}

/// The public task a public work plan belongs to.
pub async fn list_work_plan_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    let plan = state
        .db
        .get_work_plan(id)
        .map_err(internal_error)?
        .filter(|plan| plan.privacy == Privacy::Public)
        .ok_or_else(|| not_found("Work plan"))?;

    let tasks = state
        .db
        .get_task(plan.task_id)
        .map_err(internal_error)?
        .filter(|task| task.privacy == Privacy::Public)
        .into_iter()
        .collect();

    Ok(Json(tasks))
}
