use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::boundary::ServiceAreaBoundary;
use crate::entities::service_area;
use crate::error::{AppError, AppResult};
use crate::store::{self, NewServiceArea, ServiceAreaPatch};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateServiceAreaRequest {
    pub name: String,
    pub description: Option<String>,
    pub boundary: ServiceAreaBoundary,
    pub base_travel_surcharge: Decimal,
    pub per_km_surcharge: Option<Decimal>,
    pub max_travel_distance_km: f64,
    pub estimated_travel_time_minutes: Option<i32>,
    pub available_service_ids: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceAreaRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub boundary: Option<ServiceAreaBoundary>,
    pub base_travel_surcharge: Option<Decimal>,
    pub per_km_surcharge: Option<Decimal>,
    pub max_travel_distance_km: Option<f64>,
    pub estimated_travel_time_minutes: Option<i32>,
    pub available_service_ids: Option<Vec<Uuid>>,
    pub is_active: Option<bool>,
}

fn validate_surcharge(label: &str, value: Decimal) -> AppResult<()> {
    if value < Decimal::ZERO {
        return Err(AppError::BadRequest(format!("{label} must not be negative")));
    }
    Ok(())
}

fn validate_max_distance(value: f64) -> AppResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::BadRequest(
            "max_travel_distance_km must be a positive number".to_string(),
        ));
    }
    Ok(())
}

fn validate_travel_minutes(value: i32) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::BadRequest(
            "estimated_travel_time_minutes must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// List a tenant's service areas, inactive ones included
pub async fn list_service_areas(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> AppResult<Json<Vec<service_area::Model>>> {
    let areas = store::list_areas(&state.db, tenant_id).await?;
    Ok(Json(areas))
}

/// Get a single service area
pub async fn get_service_area(
    State(state): State<AppState>,
    Path((tenant_id, area_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<service_area::Model>> {
    let area = store::get_area(&state.db, tenant_id, area_id).await?;
    Ok(Json(area))
}

/// Create a service area (boundary validated before persisting)
pub async fn create_service_area(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(payload): Json<CreateServiceAreaRequest>,
) -> AppResult<Json<service_area::Model>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }
    payload.boundary.validate()?;
    validate_surcharge("base_travel_surcharge", payload.base_travel_surcharge)?;
    let per_km = payload.per_km_surcharge.unwrap_or(Decimal::ZERO);
    validate_surcharge("per_km_surcharge", per_km)?;
    validate_max_distance(payload.max_travel_distance_km)?;
    let travel_minutes = payload.estimated_travel_time_minutes.unwrap_or(0);
    validate_travel_minutes(travel_minutes)?;

    let area = store::create_area(
        &state.db,
        tenant_id,
        NewServiceArea {
            name: payload.name,
            description: payload.description,
            is_active: payload.is_active.unwrap_or(true),
            boundary: payload.boundary,
            base_travel_surcharge: payload.base_travel_surcharge,
            per_km_surcharge: per_km,
            max_travel_distance_km: payload.max_travel_distance_km,
            estimated_travel_time_minutes: travel_minutes,
            available_service_ids: payload.available_service_ids.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(tenant_id = %tenant_id, area_id = %area.id, "service area created");
    Ok(Json(area))
}

/// Partially update a service area; the boundary is re-validated only when
/// a new one is supplied
pub async fn update_service_area(
    State(state): State<AppState>,
    Path((tenant_id, area_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateServiceAreaRequest>,
) -> AppResult<Json<service_area::Model>> {
    if let Some(name) = &payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
    }
    if let Some(boundary) = &payload.boundary {
        boundary.validate()?;
    }
    if let Some(base) = payload.base_travel_surcharge {
        validate_surcharge("base_travel_surcharge", base)?;
    }
    if let Some(per_km) = payload.per_km_surcharge {
        validate_surcharge("per_km_surcharge", per_km)?;
    }
    if let Some(max_km) = payload.max_travel_distance_km {
        validate_max_distance(max_km)?;
    }
    if let Some(minutes) = payload.estimated_travel_time_minutes {
        validate_travel_minutes(minutes)?;
    }

    let area = store::update_area(
        &state.db,
        tenant_id,
        area_id,
        ServiceAreaPatch {
            name: payload.name,
            description: payload.description.map(Some),
            is_active: payload.is_active,
            boundary: payload.boundary,
            base_travel_surcharge: payload.base_travel_surcharge,
            per_km_surcharge: payload.per_km_surcharge,
            max_travel_distance_km: payload.max_travel_distance_km,
            estimated_travel_time_minutes: payload.estimated_travel_time_minutes,
            available_service_ids: payload.available_service_ids,
        },
    )
    .await?;

    Ok(Json(area))
}

/// Delete a service area
pub async fn delete_service_area(
    State(state): State<AppState>,
    Path((tenant_id, area_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    store::delete_area(&state.db, tenant_id, area_id).await?;
    tracing::info!(tenant_id = %tenant_id, area_id = %area_id, "service area deleted");
    Ok(Json(serde_json::json!({ "message": "Service area deleted" })))
}
