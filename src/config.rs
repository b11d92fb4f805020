use std::env;

use crate::engine::distance::DEFAULT_SPEED_KMH;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Base URL of an OSRM-compatible routing service. When unset, all
    /// distances fall back to haversine estimates.
    pub distance_api_url: Option<String>,
    pub distance_api_timeout_secs: u64,
    /// Average driving speed assumed by the haversine travel-time estimate.
    pub average_speed_kmh: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            distance_api_url: env::var("DISTANCE_API_URL").ok(),
            distance_api_timeout_secs: env::var("DISTANCE_API_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("DISTANCE_API_TIMEOUT_SECS must be a number"),
            average_speed_kmh: env::var("AVERAGE_SPEED_KMH")
                .unwrap_or_else(|_| DEFAULT_SPEED_KMH.to_string())
                .parse()
                .expect("AVERAGE_SPEED_KMH must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
