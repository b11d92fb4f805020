//! Daily visit route optimization.
//!
//! Greedy nearest-unvisited ordering with a fixed start. Not tour-optimal,
//! but deterministic and O(n²), which is plenty for realistic daily stop
//! counts. Distance and travel time both come from haversine plus the
//! configured average speed so the two never disagree.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::boundary::Coordinate;
use crate::engine::geometry::haversine_distance_km;
use crate::engine::surcharge::calculate_surcharge;
use crate::entities::service_area;
use crate::error::{AppError, AppResult};

/// Distances closer than this are treated as ties and resolved by schedule.
const DISTANCE_TIE_EPSILON_KM: f64 = 1e-9;

/// A home-visit booking to be routed. Stops without a resolvable coordinate
/// are filtered out by the caller; this engine does not geocode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisitStop {
    pub booking_id: Uuid,
    pub address: String,
    pub coordinate: Coordinate,
    pub service_duration_minutes: i32,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteStep {
    pub booking_id: Uuid,
    pub address: String,
    pub order: usize,
    pub estimated_arrival: DateTime<Utc>,
    pub travel_time_from_previous_minutes: f64,
    pub service_duration_minutes: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteOptimization {
    pub optimized_route: Vec<RouteStep>,
    pub total_distance_km: f64,
    pub total_duration_minutes: f64,
    pub total_surcharge: Decimal,
}

/// Order the day's home-visit stops by repeatedly taking the nearest
/// unvisited stop, accumulating estimated arrival times from
/// `reference_time`.
///
/// Exact-distance ties go to the stop with the earliest `scheduled_at`,
/// then to input order, so identical inputs always produce identical
/// routes. Per-stop surcharges follow the same policy as the surcharge
/// calculator: a stop outside every zone contributes zero.
pub fn optimize_route(
    start_location: Coordinate,
    stops: &[VisitStop],
    areas: &[service_area::Model],
    reference_time: DateTime<Utc>,
    speed_kmh: f64,
) -> AppResult<RouteOptimization> {
    if stops.is_empty() {
        return Err(AppError::BadRequest(
            "route optimization needs at least one stop".to_string(),
        ));
    }
    if !start_location.is_valid() {
        return Err(AppError::BadRequest(
            "start location coordinates are out of range".to_string(),
        ));
    }
    if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return Err(AppError::BadRequest(
            "average speed must be a positive number".to_string(),
        ));
    }
    for stop in stops {
        if !stop.coordinate.is_valid() {
            return Err(AppError::BadRequest(format!(
                "stop {} has out-of-range coordinates",
                stop.booking_id
            )));
        }
        if stop.service_duration_minutes < 0 {
            return Err(AppError::BadRequest(format!(
                "stop {} has a negative service duration",
                stop.booking_id
            )));
        }
    }

    let mut unvisited: Vec<usize> = (0..stops.len()).collect();
    let mut route = Vec::with_capacity(stops.len());
    let mut current = start_location;
    let mut clock = reference_time;
    let mut total_distance_km = 0.0;
    let mut total_travel_minutes = 0.0;
    let mut total_service_minutes = 0.0;

    while !unvisited.is_empty() {
        let mut best_pos = 0;
        let mut best_distance = haversine_distance_km(current, stops[unvisited[0]].coordinate);

        for (pos, &idx) in unvisited.iter().enumerate().skip(1) {
            let distance = haversine_distance_km(current, stops[idx].coordinate);
            if distance < best_distance - DISTANCE_TIE_EPSILON_KM {
                best_pos = pos;
                best_distance = distance;
            } else if (distance - best_distance).abs() <= DISTANCE_TIE_EPSILON_KM
                && stops[idx].scheduled_at < stops[unvisited[best_pos]].scheduled_at
            {
                best_pos = pos;
                best_distance = distance;
            }
        }

        let next = &stops[unvisited.remove(best_pos)];
        let travel_minutes = best_distance / speed_kmh * 60.0;
        clock += minutes_to_duration(travel_minutes);

        route.push(RouteStep {
            booking_id: next.booking_id,
            address: next.address.clone(),
            order: route.len(),
            estimated_arrival: clock,
            travel_time_from_previous_minutes: travel_minutes,
            service_duration_minutes: next.service_duration_minutes,
        });

        clock += Duration::minutes(i64::from(next.service_duration_minutes));
        total_distance_km += best_distance;
        total_travel_minutes += travel_minutes;
        total_service_minutes += f64::from(next.service_duration_minutes);
        current = next.coordinate;
    }

    let mut total_surcharge = Decimal::ZERO;
    for stop in stops {
        let distance_km = haversine_distance_km(start_location, stop.coordinate);
        let calculation = calculate_surcharge(areas, stop.coordinate, distance_km, None, true)?;
        total_surcharge += calculation.surcharge;
    }

    Ok(RouteOptimization {
        optimized_route: route,
        total_distance_km,
        total_duration_minutes: total_travel_minutes + total_service_minutes,
        total_surcharge,
    })
}

fn minutes_to_duration(minutes: f64) -> Duration {
    Duration::seconds((minutes * 60.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::engine::boundary::ServiceAreaBoundary;
    use crate::entities::service_area::ServiceIdList;

    fn stop(lat: f64, lng: f64, duration: i32, scheduled_hour: u32) -> VisitStop {
        VisitStop {
            booking_id: Uuid::new_v4(),
            address: format!("({lat}, {lng})"),
            coordinate: Coordinate::new(lat, lng),
            service_duration_minutes: duration,
            scheduled_at: Utc
                .with_ymd_and_hms(2025, 3, 10, scheduled_hour, 0, 0)
                .unwrap(),
        }
    }

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    fn jakarta_zone(base: i64, per_km: i64) -> service_area::Model {
        service_area::Model {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            name: "jakarta".to_string(),
            description: None,
            is_active: true,
            boundary: ServiceAreaBoundary::Circle {
                center: Coordinate::new(-6.2000, 106.8160),
                radius_km: 20.0,
            },
            base_travel_surcharge: Decimal::from(base),
            per_km_surcharge: Decimal::from(per_km),
            max_travel_distance_km: 30.0,
            estimated_travel_time_minutes: 30,
            available_service_ids: ServiceIdList(Vec::new()),
            created_at: Utc::now().fixed_offset(),
            updated_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn test_empty_stops_is_rejected() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let result = optimize_route(start, &[], &[], reference_time(), 40.0);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_nearest_stop_is_visited_first() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let near = stop(-6.1950, 106.8170, 30, 9);
        let far = stop(-6.2500, 106.8000, 45, 9);
        let stops = vec![far.clone(), near.clone()];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        assert_eq!(result.optimized_route[0].booking_id, near.booking_id);
        assert_eq!(result.optimized_route[1].booking_id, far.booking_id);
    }

    #[test]
    fn test_every_stop_visited_exactly_once() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let stops = vec![
            stop(-6.1950, 106.8170, 30, 9),
            stop(-6.2500, 106.8000, 45, 10),
            stop(-6.2200, 106.8300, 20, 11),
            stop(-6.1800, 106.8400, 60, 12),
        ];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        assert_eq!(result.optimized_route.len(), stops.len());
        let mut seen: Vec<Uuid> = result
            .optimized_route
            .iter()
            .map(|s| s.booking_id)
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), stops.len());
        for (i, step) in result.optimized_route.iter().enumerate() {
            assert_eq!(step.order, i);
        }
    }

    #[test]
    fn test_route_is_deterministic() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let stops = vec![
            stop(-6.1950, 106.8170, 30, 9),
            stop(-6.2500, 106.8000, 45, 10),
            stop(-6.2200, 106.8300, 20, 11),
        ];

        let a = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();
        let b = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        let order_a: Vec<Uuid> = a.optimized_route.iter().map(|s| s.booking_id).collect();
        let order_b: Vec<Uuid> = b.optimized_route.iter().map(|s| s.booking_id).collect();
        assert_eq!(order_a, order_b);
        assert_eq!(a.total_distance_km, b.total_distance_km);
    }

    #[test]
    fn test_distance_tie_broken_by_earliest_schedule() {
        let start = Coordinate::new(-6.2000, 106.8160);
        // Same coordinates, so both are exactly equidistant
        let later = stop(-6.2100, 106.8200, 30, 14);
        let earlier = stop(-6.2100, 106.8200, 30, 9);
        let stops = vec![later.clone(), earlier.clone()];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();
        assert_eq!(result.optimized_route[0].booking_id, earlier.booking_id);
    }

    #[test]
    fn test_arrival_clock_is_monotonic() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let stops = vec![
            stop(-6.1950, 106.8170, 30, 9),
            stop(-6.2500, 106.8000, 45, 10),
            stop(-6.2200, 106.8300, 20, 11),
        ];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        assert!(result.optimized_route[0].estimated_arrival >= reference_time());
        for pair in result.optimized_route.windows(2) {
            let earliest_next = pair[0].estimated_arrival
                + Duration::minutes(i64::from(pair[0].service_duration_minutes));
            assert!(pair[1].estimated_arrival >= earliest_next);
        }
    }

    #[test]
    fn test_total_distance_matches_leg_sum() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let a = Coordinate::new(-6.1950, 106.8170);
        let b = Coordinate::new(-6.2500, 106.8000);
        let stops = vec![stop(a.lat, a.lng, 30, 9), stop(b.lat, b.lng, 45, 10)];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        let expected = haversine_distance_km(start, a) + haversine_distance_km(a, b);
        let relative_error = (result.total_distance_km - expected).abs() / expected;
        assert!(relative_error < 0.01);
    }

    #[test]
    fn test_total_duration_sums_travel_and_service() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let stops = vec![stop(-6.1950, 106.8170, 30, 9), stop(-6.2500, 106.8000, 45, 10)];

        let result = optimize_route(start, &stops, &[], reference_time(), 40.0).unwrap();

        let travel: f64 = result
            .optimized_route
            .iter()
            .map(|s| s.travel_time_from_previous_minutes)
            .sum();
        assert!((result.total_duration_minutes - (travel + 75.0)).abs() < 1e-6);
    }

    #[test]
    fn test_per_stop_surcharges_are_aggregated() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let stops = vec![stop(-6.1950, 106.8170, 30, 9), stop(-6.2500, 106.8000, 45, 10)];
        let areas = vec![jakarta_zone(10000, 0)];

        let result = optimize_route(start, &stops, &areas, reference_time(), 40.0).unwrap();
        assert_eq!(result.total_surcharge, Decimal::from(20000));
    }

    #[test]
    fn test_stop_outside_all_zones_contributes_zero_surcharge() {
        let start = Coordinate::new(-6.2000, 106.8160);
        let in_zone = stop(-6.1950, 106.8170, 30, 9);
        let medan = stop(3.5952, 98.6722, 30, 10);
        let areas = vec![jakarta_zone(10000, 0)];

        let result =
            optimize_route(start, &[in_zone, medan], &areas, reference_time(), 40.0).unwrap();
        assert_eq!(result.total_surcharge, Decimal::from(10000));
    }
}
