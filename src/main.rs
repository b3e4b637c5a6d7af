//! Carshare Service
//!
//! REST API for vehicle reservations. Reads configuration from a TOML
//! file (~/.config/carshare/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

use carshare::application::{CarService, ReservationService, UserService};
use carshare::config::AppConfig;
use carshare::domain::RepositoryProvider;
use carshare::infrastructure::crypto::jwt::JwtConfig;
use carshare::infrastructure::database::migrator::Migrator;
use carshare::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("CARSHARE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Carshare Service...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "carshare-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // Initialize repository provider
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db));

    // Initialize services
    let identity = Arc::new(UserService::new(repos.clone(), jwt_config.clone()));
    let fleet = Arc::new(CarService::new(repos.clone()));
    let reservations = Arc::new(ReservationService::new(repos));

    // Create REST API router
    let app = create_api_router(reservations, fleet, identity, jwt_config);

    // ── Start server with graceful shutdown ────────────────────
    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
