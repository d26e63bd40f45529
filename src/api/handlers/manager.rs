//! Task and work plan management for the manager role.
//!
//! Creations and updates go through the same two steps: business rules are
//! checked on the raw form, then the form is bound into typed values. Either
//! step rejects the submission with 422 and the full list of violations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use super::{forbidden, internal_error, not_found, rejected, ApiResult};
use crate::api::middleware::{Locale, ManagerPrincipal};
use crate::api::AppState;
use crate::models::*;
use crate::validation::{
    TaskValidator, ValidationContext, Violations, WorkPlanValidator, NOT_BLANK_KEY,
};

// ============================================================
// Tasks
// ============================================================

pub async fn list_tasks(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
) -> ApiResult<Json<Vec<Task>>> {
    state
        .db
        .get_tasks_by_manager(manager.manager_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_task(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskWithWorkPlans>> {
    let task = state
        .db
        .get_task_with_work_plans(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task"))?;

    if task.task.manager_id != manager.manager_id {
        return Err(forbidden("Task"));
    }

    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Locale(locale): Locale,
    Json(form): Json<TaskForm>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let spam = state.db.get_spam_rule().map_err(internal_error)?;
    let ctx = ValidationContext::new(&locale, Utc::now(), &spam)
        .with_policy(state.config.format_errors);

    TaskValidator::default()
        .validate(&form, &[], &ctx)
        .into_result()
        .map_err(rejected)?;
    let draft = form.bind(&locale).map_err(rejected)?;

    let task = state
        .db
        .create_task(manager.manager_id, draft)
        .map_err(internal_error)?;
    tracing::info!("{} created task {}", manager.principal.username, task.id);

    Ok((StatusCode::CREATED, Json(task)))
}

/// Updates a task, re-checking it against the work plans it already owns.
pub async fn update_task(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Locale(locale): Locale,
    Path(id): Path<Uuid>,
    Json(form): Json<TaskForm>,
) -> ApiResult<Json<Task>> {
    let existing = state
        .db
        .get_task_with_work_plans(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task"))?;

    if existing.task.manager_id != manager.manager_id {
        return Err(forbidden("Task"));
    }

    let spam = state.db.get_spam_rule().map_err(internal_error)?;
    let ctx = ValidationContext::new(&locale, Utc::now(), &spam)
        .with_policy(state.config.format_errors);

    TaskValidator::default()
        .validate(&form, &existing.work_plans, &ctx)
        .into_result()
        .map_err(rejected)?;
    let draft = form.bind(&locale).map_err(rejected)?;

    state
        .db
        .update_task(id, draft)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Task"))
}

// ============================================================
// Work plans
// ============================================================

pub async fn list_work_plans(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
) -> ApiResult<Json<Vec<WorkPlan>>> {
    state
        .db
        .get_work_plans_by_manager(manager.manager_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn get_work_plan(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkPlan>> {
    let plan = state
        .db
        .get_work_plan(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Work plan"))?;

    owned_task(&state, &manager, plan.task_id)?;

    Ok(Json(plan))
}

pub async fn create_work_plan(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Locale(locale): Locale,
    Json(form): Json<WorkPlanForm>,
) -> ApiResult<(StatusCode, Json<WorkPlan>)> {
    let Some(task_id) = form.task_id else {
        let mut violations = Violations::new();
        violations.push("task_id", NOT_BLANK_KEY);
        return Err(rejected(violations));
    };

    let task = owned_task(&state, &manager, task_id)?;

    let spam = state.db.get_spam_rule().map_err(internal_error)?;
    let ctx = ValidationContext::new(&locale, Utc::now(), &spam)
        .with_policy(state.config.format_errors);

    WorkPlanValidator::default()
        .validate(&form, &task.window(), &ctx)
        .into_result()
        .map_err(rejected)?;
    let draft = form.bind(&locale).map_err(rejected)?;

    let plan = state
        .db
        .create_work_plan(task_id, draft)
        .map_err(internal_error)?;
    tracing::info!(
        "{} created work plan {} under task {}",
        manager.principal.username,
        plan.id,
        task_id
    );

    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update_work_plan(
    State(state): State<AppState>,
    manager: ManagerPrincipal,
    Locale(locale): Locale,
    Path(id): Path<Uuid>,
    Json(form): Json<WorkPlanForm>,
) -> ApiResult<Json<WorkPlan>> {
    let plan = state
        .db
        .get_work_plan(id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Work plan"))?;

    let task = owned_task(&state, &manager, plan.task_id)?;

    let spam = state.db.get_spam_rule().map_err(internal_error)?;
    let ctx = ValidationContext::new(&locale, Utc::now(), &spam)
        .with_policy(state.config.format_errors);

    WorkPlanValidator::default()
        .validate(&form, &task.window(), &ctx)
        .into_result()
        .map_err(rejected)?;
    let draft = form.bind(&locale).map_err(rejected)?;

    state
        .db
        .update_work_plan(id, draft)
        .map_err(internal_error)?
        .map(Json)
        .ok_or_else(|| not_found("Work plan"))
}

/// Loads a task and checks the manager owns it.
fn owned_task(state: &AppState, manager: &ManagerPrincipal, task_id: Uuid) -> ApiResult<Task> {
    let task = state
        .db
        .get_task(task_id)
        .map_err(internal_error)?
        .ok_or_else(|| not_found("Task"))?;

    if task.manager_id != manager.manager_id {
        tracing::warn!(
            "{} tried to access task {} of another manager",
            manager.principal.username,
            task_id
        );
        return Err(forbidden("Task"));
    }

    Ok(task)
}
