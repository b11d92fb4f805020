use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::boundary::Coordinate;
use crate::engine::matcher::find_matching_areas;
use crate::entities::service_area;
use crate::error::{AppError, AppResult};

/// Surcharge fields are kept at two decimal places internally; the
/// presentation layer rounds to whole currency units where the currency has
/// no minor unit.
const SURCHARGE_SCALE: u32 = 2;

/// Outcome of a travel surcharge calculation.
///
/// "No matching zone" and "beyond the zone's travel limit" are business
/// outcomes carried in the data, never errors: the booking flow decides
/// whether to block or warn.
#[derive(Clone, Debug, Serialize)]
pub struct TravelCalculation {
    pub distance_km: f64,
    pub travel_time_minutes: f64,
    pub surcharge: Decimal,
    pub matched_service_area_id: Option<Uuid>,
    pub is_within_service_area: bool,
    pub is_estimate: bool,
}

impl TravelCalculation {
    fn outside_all_zones(distance_km: f64, is_estimate: bool) -> Self {
        Self {
            distance_km,
            travel_time_minutes: 0.0,
            surcharge: Decimal::ZERO,
            matched_service_area_id: None,
            is_within_service_area: false,
            is_estimate,
        }
    }
}

/// Calculate the travel surcharge for a home-visit destination.
///
/// Matches the destination against the tenant's active zones and applies
/// `base + per_km * distance` from the first matching zone in store order.
/// A distance beyond the zone's `max_travel_distance_km` still yields the
/// computed surcharge, flagged with `is_within_service_area = false` so the
/// caller can block the booking.
pub fn calculate_surcharge(
    areas: &[service_area::Model],
    destination: Coordinate,
    distance_km: f64,
    service_id: Option<Uuid>,
    is_estimate: bool,
) -> AppResult<TravelCalculation> {
    if !destination.is_valid() {
        return Err(AppError::BadRequest(
            "destination coordinates are out of range".to_string(),
        ));
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(AppError::BadRequest(
            "distance_km must be a non-negative number".to_string(),
        ));
    }

    let matches = find_matching_areas(areas, destination, service_id);
    let Some(area) = matches.first() else {
        return Ok(TravelCalculation::outside_all_zones(distance_km, is_estimate));
    };

    let distance = Decimal::from_f64(distance_km).ok_or_else(|| {
        AppError::BadRequest("distance_km is outside the representable range".to_string())
    })?;
    let surcharge = (area.base_travel_surcharge + area.per_km_surcharge * distance)
        .round_dp(SURCHARGE_SCALE);

    Ok(TravelCalculation {
        distance_km,
        travel_time_minutes: f64::from(area.estimated_travel_time_minutes),
        surcharge,
        matched_service_area_id: Some(area.id),
        is_within_service_area: distance_km <= area.max_travel_distance_km,
        is_estimate,
    })
}
