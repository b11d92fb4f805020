use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::engine::geometry::{point_in_circle, point_in_polygon};
use crate::error::{AppError, AppResult};

/// A WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Shape of a tenant-defined service zone.
///
/// Stored as a JSON column with a `type` discriminator; the enum makes a
/// boundary with both or neither shape unrepresentable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServiceAreaBoundary {
    Circle { center: Coordinate, radius_km: f64 },
    Polygon { vertices: Vec<Coordinate> },
}

impl ServiceAreaBoundary {
    /// Validate the boundary definition before it is persisted.
    ///
    /// Runs on create, and on update whenever a new boundary is supplied.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Circle { center, radius_km } => {
                if !center.is_valid() {
                    return Err(AppError::InvalidBoundary(
                        "circle center coordinates are out of range".to_string(),
                    ));
                }
                if !radius_km.is_finite() || *radius_km <= 0.0 {
                    return Err(AppError::InvalidBoundary(
                        "circle radius must be a positive number of kilometers".to_string(),
                    ));
                }
            }
            Self::Polygon { vertices } => {
                if vertices.len() < 3 {
                    return Err(AppError::InvalidBoundary(format!(
                        "polygon needs at least 3 vertices, got {}",
                        vertices.len()
                    )));
                }
                if let Some(bad) = vertices.iter().find(|v| !v.is_valid()) {
                    return Err(AppError::InvalidBoundary(format!(
                        "polygon vertex ({}, {}) is out of range",
                        bad.lat, bad.lng
                    )));
                }
            }
        }
        Ok(())
    }

    /// Containment test for a point against this boundary.
    pub fn contains(&self, point: Coordinate) -> bool {
        match self {
            Self::Circle { center, radius_km } => point_in_circle(point, *center, *radius_km),
            Self::Polygon { vertices } => point_in_polygon(point, vertices),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_circle_passes() {
        let boundary = ServiceAreaBoundary::Circle {
            center: Coordinate::new(-6.2088, 106.8456),
            radius_km: 10.0,
        };
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_circle_rejects_nonpositive_radius() {
        let boundary = ServiceAreaBoundary::Circle {
            center: Coordinate::new(-6.2088, 106.8456),
            radius_km: 0.0,
        };
        assert!(matches!(
            boundary.validate(),
            Err(AppError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_circle_rejects_out_of_range_center() {
        let boundary = ServiceAreaBoundary::Circle {
            center: Coordinate::new(91.0, 106.8456),
            radius_km: 5.0,
        };
        assert!(matches!(
            boundary.validate(),
            Err(AppError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_polygon_rejects_two_vertices() {
        let boundary = ServiceAreaBoundary::Polygon {
            vertices: vec![Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
        };
        assert!(matches!(
            boundary.validate(),
            Err(AppError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_polygon_rejects_out_of_range_vertex() {
        let boundary = ServiceAreaBoundary::Polygon {
            vertices: vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 181.0),
                Coordinate::new(1.0, 1.0),
            ],
        };
        assert!(matches!(
            boundary.validate(),
            Err(AppError::InvalidBoundary(_))
        ));
    }

    #[test]
    fn test_valid_polygon_passes() {
        let boundary = ServiceAreaBoundary::Polygon {
            vertices: vec![
                Coordinate::new(-6.18, 106.80),
                Coordinate::new(-6.18, 106.85),
                Coordinate::new(-6.23, 106.85),
                Coordinate::new(-6.23, 106.80),
            ],
        };
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_boundary_json_roundtrip_keeps_discriminator() {
        let boundary = ServiceAreaBoundary::Circle {
            center: Coordinate::new(-6.2, 106.8),
            radius_km: 7.5,
        };

        let json = serde_json::to_value(&boundary).unwrap();
        assert_eq!(json["type"], "circle");

        let back: ServiceAreaBoundary = serde_json::from_value(json).unwrap();
        assert_eq!(back, boundary);
    }
}
