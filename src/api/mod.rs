mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::db::Database;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

pub fn create_router(db: Database) -> Router {
    create_router_with_config(db, AppConfig::default())
}

pub fn create_router_with_config(db: Database, config: AppConfig) -> Router {
    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let api = Router::new()
        // Anonymous
        .route("/anonymous/tasks", get(handlers::anonymous::list_tasks))
        .route("/anonymous/tasks/{id}", get(handlers::anonymous::get_task))
        .route("/anonymous/workplans", get(handlers::anonymous::list_work_plans))
        .route(
            "/anonymous/workplans/{id}/tasks",
            get(handlers::anonymous::list_work_plan_tasks),
        )
        // Authenticated
        .route(
            "/authenticated/tasks/finished",
            get(handlers::authenticated::list_finished_tasks),
        )
        .route(
            "/authenticated/consumer",
            get(handlers::authenticated::get_consumer)
                .post(handlers::authenticated::create_consumer)
                .put(handlers::authenticated::update_consumer),
        )
        // Manager
        .route(
            "/manager/tasks",
            get(handlers::manager::list_tasks).post(handlers::manager::create_task),
        )
        .route(
            "/manager/tasks/{id}",
            get(handlers::manager::get_task).put(handlers::manager::update_task),
        )
        .route(
            "/manager/workplans",
            get(handlers::manager::list_work_plans).post(handlers::manager::create_work_plan),
        )
        .route(
            "/manager/workplans/{id}",
            put(handlers::manager::update_work_plan).get(handlers::manager::get_work_plan),
        )
        // Spam terms
        .route("/spam", get(handlers::list_spam))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
