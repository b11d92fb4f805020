use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::engine::boundary::ServiceAreaBoundary;

/// Service identifiers a zone is restricted to. Empty means the zone serves
/// every service the tenant offers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ServiceIdList(pub Vec<Uuid>);

impl ServiceIdList {
    pub fn allows(&self, service_id: Uuid) -> bool {
        self.0.is_empty() || self.0.contains(&service_id)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_area")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    #[sea_orm(column_type = "Json")]
    pub boundary: ServiceAreaBoundary,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_travel_surcharge: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub per_km_surcharge: Decimal,
    pub max_travel_distance_km: f64,
    pub estimated_travel_time_minutes: i32,
    #[sea_orm(column_type = "Json")]
    pub available_service_ids: ServiceIdList,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
