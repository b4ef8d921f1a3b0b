use std::sync::Arc;

use invitation_service::config::Config;
use invitation_service::config::StorageBackend;
use invitation_service::inbound::http::router::create_router;
use invitation_service::inbound::http::router::AppState;
use invitation_service::outbound::notifications::LoggingNotifier;
use invitation_service::outbound::repositories::InMemoryStore;
use invitation_service::outbound::repositories::PostgresCredentialStore;
use invitation_service::outbound::repositories::PostgresEventRepository;
use invitation_service::outbound::repositories::PostgresGuestRepository;
use invitation_service::outbound::repositories::PostgresSessionStore;
use invitation_service::outbound::repositories::StoragePolicy;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invitation_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "invitation-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        session_ttl_hours = config.session.ttl_hours,
        public_base_url = %config.invitations.public_base_url,
        "Configuration loaded"
    );

    let notifier = Arc::new(LoggingNotifier::new(
        config.invitations.public_base_url.clone(),
    ));

    let state = match config.storage.backend {
        StorageBackend::Postgres => {
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

            let policy = StoragePolicy::new(
                config.database.query_timeout(),
                config.database.retry_backoff(),
            );

            AppState::new(
                Arc::new(PostgresCredentialStore::new(pg_pool.clone(), policy)),
                Arc::new(PostgresSessionStore::new(pg_pool.clone(), policy)),
                Arc::new(PostgresEventRepository::new(pg_pool.clone(), policy)),
                Arc::new(PostgresGuestRepository::new(pg_pool, policy)),
                notifier,
                config.session.ttl(),
                &config.invitations.public_base_url,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let store = Arc::new(InMemoryStore::new());

            AppState::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                notifier,
                config.session.ttl(),
                &config.invitations.public_base_url,
            )
        }
    };

    let auth_service = Arc::clone(&state.auth_service);
    let purge_interval = config.session.purge_interval();
    let session_purger = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            match auth_service.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Purged expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session purge failed"),
            }
        }
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state);
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    tokio::select! {
        result = http_server => match result {
            Ok(Ok(())) => tracing::info!("Server exited successfully"),
            Ok(Err(e)) => tracing::error!(error = %e, "Server error"),
            Err(e) => tracing::error!(error = %e, "Server task failed"),
        },
        result = session_purger => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Session purge task failed");
            }
        }
    }

    Ok(())
}
