use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rh_api::app::{create_app, AppState};
use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};
use rh_core::services::{Clock, SystemClock, UserServiceConfig};
use rh_infra::database::{MySqlAgreementRepository, MySqlPropertyRepository, MySqlUserRepository};
use rh_infra::InMemoryStore;
use rh_shared::config::{AppConfig, LogFormat, LoggingConfig, StorageBackend};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        storage = ?config.storage,
        "Starting RentalHub API server"
    );

    if config.auth.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            error!("JWT_SECRET must be set in production");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "JWT_SECRET is not set"));
        }
        warn!("Using the default JWT secret; set JWT_SECRET outside development");
    }

    let user_config = UserServiceConfig::new(config.auth.lockout.clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match config.storage {
        StorageBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            let state = AppState::new(
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                &config.auth.jwt,
                user_config,
                clock,
            );
            serve(state, &config).await
        }
        StorageBackend::MySql => {
            let pool = rh_infra::initialize(config.database.clone())
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to initialize the database");
                    io::Error::new(io::ErrorKind::Other, e)
                })?;

            info!(stats = %pool.get_statistics(), "Database pool ready");

            let mysql = pool.get_pool().clone();
            let state = AppState::new(
                Arc::new(MySqlAgreementRepository::new(mysql.clone())),
                Arc::new(MySqlPropertyRepository::new(mysql.clone())),
                Arc::new(MySqlUserRepository::new(mysql)),
                &config.auth.jwt,
                user_config,
                clock,
            )
            .with_database(pool);
            serve(state, &config).await
        }
    }
}

/// Run the HTTP server until shutdown
async fn serve<A, P, U>(state: AppState<A, P, U>, config: &AppConfig) -> io::Result<()>
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    let state = web::Data::new(
        state
            .with_cors(config.cors.clone())
            .with_max_payload_size(config.server.max_payload_size),
    );

    let bind_address = config.server.bind_address();
    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    info!(address = %bind_address, "Server listening");
    server.bind(&bind_address)?.run().await
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
///
/// actix-web's `Logger` emits `log` records, which the subscriber picks up
/// through its `tracing-log` bridge.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
