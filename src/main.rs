use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visit_logistics_backend::{
    config::Config,
    db,
    engine::distance::{DistanceResolver, OsrmRouteClient},
    middleware::rate_limit::create_global_governor,
    routes, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visit_logistics_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // Run migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Migrations complete");

    // Wire up the distance source
    let distance = match &config.distance_api_url {
        Some(url) => {
            tracing::info!("Using distance provider at {}", url);
            let client = OsrmRouteClient::new(url.clone(), config.distance_api_timeout_secs)
                .expect("Failed to build distance provider client");
            DistanceResolver::new(Box::new(client), config.average_speed_kmh)
        }
        None => {
            tracing::info!("No distance provider configured, using haversine estimates");
            DistanceResolver::haversine_only(config.average_speed_kmh)
        }
    };

    // Create app state
    let state = AppState {
        db,
        config: config.clone(),
        distance: Arc::new(distance),
    };

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(create_global_governor());

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
