use contactdb::config::{Config, ConfigError};
use contactdb::{api, db::init_db, ContactStore, Repository};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to open contact database at {path}: {source}")]
    Database { path: String, source: sqlx::Error },
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let pool = init_db(&config.database_path, config.database_max_connections)
        .await
        .map_err(|source| StartupError::Database {
            path: config.database_path.clone(),
            source,
        })?;
    let store: Arc<dyn ContactStore> = Arc::new(Repository::new(pool));
    let app = api::create_router(api::AppState::new(store));

    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    tracing::info!(%addr, database = %config.database_path, "Contact service listening");
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Contact service stopped");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
