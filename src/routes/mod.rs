use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::handlers::{service_area, travel};
use crate::middleware::rate_limit::log_request;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Everything is scoped by tenant; authentication happens upstream in the
    // CRM gateway, which forwards only requests for tenants the caller owns.
    let tenant_routes = Router::new()
        // Service area administration
        .route("/service-areas", get(service_area::list_service_areas))
        .route("/service-areas", post(service_area::create_service_area))
        .route("/service-areas/{id}", get(service_area::get_service_area))
        .route("/service-areas/{id}", put(service_area::update_service_area))
        .route("/service-areas/{id}", delete(service_area::delete_service_area))
        // Travel engine operations
        .route("/travel/surcharge", post(travel::calculate_surcharge))
        .route("/travel/route", post(travel::optimize_route));

    Router::new()
        .route("/health", get(health))
        .nest("/api/tenants/{tenant_id}", tenant_routes)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
