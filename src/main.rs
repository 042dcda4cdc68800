use std::net::SocketAddr;
use std::sync::Arc;

use recruitment_portal::{
    config::{Config, LogFormat},
    database::{open_store, FsBlobStore},
    routes, AppState,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let store = open_store(&config).await?;
    let blobs = FsBlobStore::new(&config.uploads_dir);
    tokio::fs::create_dir_all(blobs.root()).await?;
    info!("Storing resumes in: {}", blobs.root().display());

    let app_state = AppState::new(store, Arc::new(blobs));
    let app = routes::router(app_state, &config);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
