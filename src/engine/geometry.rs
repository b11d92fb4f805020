use crate::engine::boundary::Coordinate;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate great-circle distance between two coordinates using the
/// Haversine formula. Returns distance in kilometers.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Check whether a point lies within `radius_km` of `center`.
/// A point exactly on the boundary counts as inside.
pub fn point_in_circle(point: Coordinate, center: Coordinate, radius_km: f64) -> bool {
    haversine_distance_km(point, center) <= radius_km
}

/// Ray-casting containment test over the lat/lng plane.
///
/// Treats coordinates as planar, which is adequate at city scale but not
/// geodesically exact. Polygons with fewer than three vertices never
/// contain anything; degenerate shapes are rejected earlier by boundary
/// validation.
pub fn point_in_polygon(point: Coordinate, vertices: &[Coordinate]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let vi = vertices[i];
        let vj = vertices[j];

        let crosses = (vi.lat > point.lat) != (vj.lat > point.lat)
            && point.lng < (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}
