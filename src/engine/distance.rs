//! Travel distance/duration sources.
//!
//! The engine prefers an external routing provider (road distances) and
//! falls back to a haversine estimate when none is configured or the
//! provider fails. A provider outage must never fail a booking flow, so the
//! resolver is infallible and flags estimated results instead.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::engine::boundary::Coordinate;
use crate::engine::geometry::haversine_distance_km;

/// Average driving speed assumed when estimating travel time from
/// straight-line distance.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Distance and travel time for a single origin/destination pair.
#[derive(Clone, Copy, Debug)]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// True when the value came from the haversine fallback rather than a
    /// road-network provider.
    pub is_estimate: bool,
}

#[derive(Debug, Error)]
#[error("distance source unavailable: {0}")]
pub struct DistanceSourceUnavailable(pub String);

/// External distance/duration oracle.
#[async_trait]
pub trait DistanceSource: Send + Sync {
    async fn distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<TravelEstimate, DistanceSourceUnavailable>;
}

/// Haversine-based estimator, always available.
///
/// Under-estimates real road distance; results are flagged as estimates.
#[derive(Clone, Copy, Debug)]
pub struct HaversineEstimator {
    pub speed_kmh: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn km_to_minutes(&self, km: f64) -> f64 {
        km / self.speed_kmh * 60.0
    }

    pub fn estimate(&self, origin: Coordinate, destination: Coordinate) -> TravelEstimate {
        let distance_km = haversine_distance_km(origin, destination);
        TravelEstimate {
            distance_km,
            duration_minutes: self.km_to_minutes(distance_km),
            is_estimate: true,
        }
    }
}

#[async_trait]
impl DistanceSource for HaversineEstimator {
    async fn distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<TravelEstimate, DistanceSourceUnavailable> {
        Ok(self.estimate(origin, destination))
    }
}

/// HTTP client for an OSRM-compatible `/route/v1` endpoint.
#[derive(Clone, Debug)]
pub struct OsrmRouteClient {
    base_url: String,
    profile: String,
    client: reqwest::Client,
}

impl OsrmRouteClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            profile: "car".to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

#[async_trait]
impl DistanceSource for OsrmRouteClient {
    async fn distance(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<TravelEstimate, DistanceSourceUnavailable> {
        let url = format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.base_url, self.profile, origin.lng, origin.lat, destination.lng, destination.lat
        );

        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| DistanceSourceUnavailable(e.to_string()))?
            .json::<OsrmRouteResponse>()
            .await
            .map_err(|e| DistanceSourceUnavailable(e.to_string()))?;

        let route = body
            .routes
            .first()
            .ok_or_else(|| DistanceSourceUnavailable("no route in response".to_string()))?;

        Ok(TravelEstimate {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            is_estimate: false,
        })
    }
}

/// Resolves distances through the configured provider, falling back to a
/// haversine estimate on any provider error.
pub struct DistanceResolver {
    primary: Option<Box<dyn DistanceSource>>,
    fallback: HaversineEstimator,
}

impl DistanceResolver {
    pub fn new(primary: Box<dyn DistanceSource>, speed_kmh: f64) -> Self {
        Self {
            primary: Some(primary),
            fallback: HaversineEstimator::new(speed_kmh),
        }
    }

    pub fn haversine_only(speed_kmh: f64) -> Self {
        Self {
            primary: None,
            fallback: HaversineEstimator::new(speed_kmh),
        }
    }

    pub fn speed_kmh(&self) -> f64 {
        self.fallback.speed_kmh
    }

    pub async fn resolve(&self, origin: Coordinate, destination: Coordinate) -> TravelEstimate {
        if let Some(primary) = &self.primary {
            match primary.distance(origin, destination).await {
                Ok(estimate) => return estimate,
                Err(err) => {
                    tracing::warn!(%err, "distance provider failed, using haversine estimate");
                }
            }
        }

        self.fallback.estimate(origin, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    #[async_trait]
    impl DistanceSource for FailingSource {
        async fn distance(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
        ) -> Result<TravelEstimate, DistanceSourceUnavailable> {
            Err(DistanceSourceUnavailable("connection refused".to_string()))
        }
    }

    #[test]
    fn test_km_to_minutes() {
        let estimator = HaversineEstimator::new(40.0);
        // 10 km at 40 km/h = 15 minutes
        assert!((estimator.km_to_minutes(10.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_estimator_flags_estimate() {
        let estimator = HaversineEstimator::default();
        let estimate = estimator.estimate(
            Coordinate::new(-6.2088, 106.8456),
            Coordinate::new(-6.9175, 107.6191),
        );

        assert!(estimate.is_estimate);
        assert!(estimate.distance_km > 100.0);
        assert!(estimate.duration_minutes > 0.0);
    }

    #[tokio::test]
    async fn test_resolver_falls_back_when_provider_fails() {
        let resolver = DistanceResolver::new(Box::new(FailingSource), 40.0);
        let origin = Coordinate::new(-6.2000, 106.8160);
        let destination = Coordinate::new(-6.2500, 106.8000);

        let estimate = resolver.resolve(origin, destination).await;
        assert!(estimate.is_estimate);
        assert!(estimate.distance_km > 0.0);
    }

    #[tokio::test]
    async fn test_resolver_without_provider_uses_haversine() {
        let resolver = DistanceResolver::haversine_only(40.0);
        let origin = Coordinate::new(-6.2000, 106.8160);

        let estimate = resolver.resolve(origin, origin).await;
        assert!(estimate.is_estimate);
        assert_eq!(estimate.distance_km, 0.0);
    }
}
