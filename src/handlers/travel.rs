use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::boundary::Coordinate;
use crate::engine::route::{self, RouteOptimization, VisitStop};
use crate::engine::surcharge::{self, TravelCalculation};
use crate::error::{AppError, AppResult};
use crate::store;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SurchargeRequest {
    pub destination: Coordinate,
    /// Travel distance from the business location, typically from an
    /// external distance-matrix provider. When absent, `origin` is resolved
    /// through the configured distance source instead.
    pub distance_km: Option<f64>,
    pub origin: Option<Coordinate>,
    pub service_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRouteRequest {
    pub start_location: Coordinate,
    pub stops: Vec<VisitStop>,
    /// Departure reference; defaults to now.
    pub reference_time: Option<DateTime<Utc>>,
}

/// Calculate the travel surcharge for a home-visit destination
pub async fn calculate_surcharge(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<SurchargeRequest>,
) -> AppResult<Json<TravelCalculation>> {
    if !payload.destination.is_valid() {
        return Err(AppError::BadRequest(
            "destination coordinates are out of range".to_string(),
        ));
    }

    let (distance_km, is_estimate) = match payload.distance_km {
        Some(distance) => {
            if !distance.is_finite() || distance < 0.0 {
                return Err(AppError::BadRequest(
                    "distance_km must be a non-negative number".to_string(),
                ));
            }
            (distance, false)
        }
        None => {
            let origin = payload.origin.ok_or_else(|| {
                AppError::BadRequest(
                    "either distance_km or origin must be provided".to_string(),
                )
            })?;
            if !origin.is_valid() {
                return Err(AppError::BadRequest(
                    "origin coordinates are out of range".to_string(),
                ));
            }
            let estimate = state.distance.resolve(origin, payload.destination).await;
            (estimate.distance_km, estimate.is_estimate)
        }
    };

    let areas = store::list_active_areas(&state.db, tenant_id).await?;
    let result = surcharge::calculate_surcharge(
        &areas,
        payload.destination,
        distance_km,
        payload.service_id,
        is_estimate,
    )?;

    tracing::debug!(
        tenant_id = %tenant_id,
        matched = ?result.matched_service_area_id,
        within = result.is_within_service_area,
        "surcharge calculated"
    );
    Ok(Json(result))
}

/// Produce a distance-ordered itinerary for a day's home-visit stops
pub async fn optimize_route(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<OptimizeRouteRequest>,
) -> AppResult<Json<RouteOptimization>> {
    let areas = store::list_active_areas(&state.db, tenant_id).await?;
    let reference_time = payload.reference_time.unwrap_or_else(Utc::now);

    let result = route::optimize_route(
        payload.start_location,
        &payload.stops,
        &areas,
        reference_time,
        state.distance.speed_kmh(),
    )?;

    tracing::debug!(
        tenant_id = %tenant_id,
        stops = result.optimized_route.len(),
        total_km = result.total_distance_km,
        "route optimized"
    );
    Ok(Json(result))
}
