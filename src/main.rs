mod artifact;
mod config;
mod download;
mod error;
mod pages;
mod router;
mod runner;
mod validate;

use clap::Parser;
use router::{AppState, create_router};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    color_eyre::install()?;

    let config = config::Config::parse();
    tracing::info!(
        downloader = %config.downloader_bin,
        timeout_secs = config.download_timeout,
        max_downloads = config.max_downloads,
        "starting vidgrab"
    );

    let host = config.host.clone();
    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(host).await?;
    tracing::info!("Listening on: {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
