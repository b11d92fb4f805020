use uuid::Uuid;

use crate::engine::boundary::Coordinate;
use crate::entities::service_area;

/// Return the service areas whose boundary contains `point`, preserving
/// store order.
///
/// When `service_id` is given, areas restricted to other services are
/// skipped; an empty restriction list allows every service. Zero matches is
/// a normal outcome, not an error. Ranking between overlapping zones is the
/// surcharge calculator's concern.
pub fn find_matching_areas<'a>(
    areas: &'a [service_area::Model],
    point: Coordinate,
    service_id: Option<Uuid>,
) -> Vec<&'a service_area::Model> {
    areas
        .iter()
        .filter(|area| area.is_active)
        .filter(|area| match service_id {
            Some(id) => area.available_service_ids.allows(id),
            None => true,
        })
        .filter(|area| area.boundary.contains(point))
        .collect()
}
