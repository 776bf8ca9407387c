use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tupy_service::config::Config;
use tupy_service::inbound::http::router::cors_layer;
use tupy_service::inbound::http::router::create_router;
use tupy_service::inbound::http::router::AppState;
use tupy_service::outbound::database::PostgresDatabase;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::load()?;

    let default_filter = if config.server.debug {
        "tupy_service=debug,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = %config.service.title,
        version = %config.service.version,
        "Service starting"
    );
    tracing::info!(
        address = %config.server.address(),
        debug = config.server.debug,
        jwt_algorithm = %config.jwt.algorithm,
        cors_origins = ?config.cors.origins,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let state = AppState::new(&config, PostgresDatabase::new(pg_pool))?;
    let application = create_router(state, cors_layer(&config.cors.origins)?);

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, protocol = "http", "Http server listening");

    axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
