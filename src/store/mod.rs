//! Service-area persistence surface.
//!
//! Thin sea-orm queries scoped by tenant. Matching always reads through
//! `list_active_areas`, which orders by creation time so the surcharge
//! calculator's first-match tie-break is stable across requests.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::engine::boundary::ServiceAreaBoundary;
use crate::entities::service_area::{self, ServiceIdList};
use crate::error::{AppError, AppResult};

pub struct NewServiceArea {
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub boundary: ServiceAreaBoundary,
    pub base_travel_surcharge: Decimal,
    pub per_km_surcharge: Decimal,
    pub max_travel_distance_km: f64,
    pub estimated_travel_time_minutes: i32,
    pub available_service_ids: Vec<Uuid>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Default)]
pub struct ServiceAreaPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub boundary: Option<ServiceAreaBoundary>,
    pub base_travel_surcharge: Option<Decimal>,
    pub per_km_surcharge: Option<Decimal>,
    pub max_travel_distance_km: Option<f64>,
    pub estimated_travel_time_minutes: Option<i32>,
    pub available_service_ids: Option<Vec<Uuid>>,
}

/// All of a tenant's areas, inactive ones included (audit view).
pub async fn list_areas(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> AppResult<Vec<service_area::Model>> {
    let areas = service_area::Entity::find()
        .filter(service_area::Column::TenantId.eq(tenant_id))
        .order_by_asc(service_area::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(areas)
}

/// Active areas for matching, in creation order.
pub async fn list_active_areas(
    db: &DatabaseConnection,
    tenant_id: Uuid,
) -> AppResult<Vec<service_area::Model>> {
    let areas = service_area::Entity::find()
        .filter(service_area::Column::TenantId.eq(tenant_id))
        .filter(service_area::Column::IsActive.eq(true))
        .order_by_asc(service_area::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(areas)
}

pub async fn get_area(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    area_id: Uuid,
) -> AppResult<service_area::Model> {
    service_area::Entity::find()
        .filter(service_area::Column::Id.eq(area_id))
        .filter(service_area::Column::TenantId.eq(tenant_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Service area not found".to_string()))
}

pub async fn create_area(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    data: NewServiceArea,
) -> AppResult<service_area::Model> {
    let now = Utc::now().fixed_offset();
    let area = service_area::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(tenant_id),
        name: Set(data.name),
        description: Set(data.description),
        is_active: Set(data.is_active),
        boundary: Set(data.boundary),
        base_travel_surcharge: Set(data.base_travel_surcharge),
        per_km_surcharge: Set(data.per_km_surcharge),
        max_travel_distance_km: Set(data.max_travel_distance_km),
        estimated_travel_time_minutes: Set(data.estimated_travel_time_minutes),
        available_service_ids: Set(ServiceIdList(data.available_service_ids)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = area.insert(db).await?;
    Ok(created)
}

pub async fn update_area(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    area_id: Uuid,
    patch: ServiceAreaPatch,
) -> AppResult<service_area::Model> {
    let existing = get_area(db, tenant_id, area_id).await?;
    let mut active: service_area::ActiveModel = existing.into();

    if let Some(name) = patch.name {
        active.name = Set(name);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(is_active) = patch.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(boundary) = patch.boundary {
        active.boundary = Set(boundary);
    }
    if let Some(base) = patch.base_travel_surcharge {
        active.base_travel_surcharge = Set(base);
    }
    if let Some(per_km) = patch.per_km_surcharge {
        active.per_km_surcharge = Set(per_km);
    }
    if let Some(max_km) = patch.max_travel_distance_km {
        active.max_travel_distance_km = Set(max_km);
    }
    if let Some(minutes) = patch.estimated_travel_time_minutes {
        active.estimated_travel_time_minutes = Set(minutes);
    }
    if let Some(service_ids) = patch.available_service_ids {
        active.available_service_ids = Set(ServiceIdList(service_ids));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active.update(db).await?;
    Ok(updated)
}

/// Hard delete. The "still referenced by bookings" Conflict policy is
/// enforced by the booking store that owns the referencing records.
pub async fn delete_area(db: &DatabaseConnection, tenant_id: Uuid, area_id: Uuid) -> AppResult<()> {
    let result = service_area::Entity::delete_many()
        .filter(service_area::Column::Id.eq(area_id))
        .filter(service_area::Column::TenantId.eq(tenant_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Service area not found".to_string()));
    }

    Ok(())
}
