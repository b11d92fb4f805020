pub mod config;
pub mod db;
pub mod engine;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod store;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::engine::distance::DistanceResolver;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub distance: Arc<DistanceResolver>,
}
