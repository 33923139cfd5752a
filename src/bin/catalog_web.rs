//! Catalog web client - HTML pages backed by the catalog service

use std::net::SocketAddr;

use clap::Parser;

use library_catalog::{config::WebConfig, telemetry, web};

#[derive(Parser)]
#[command(name = "catalog-web")]
#[command(about = "Library catalog web client", long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    Cli::parse();

    let config = WebConfig::load()?;

    telemetry::init_tracing(&config.logging);
    telemetry::warn_on_default_secret(&config.secret_key);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!(
        "Starting catalog web client v{} (API at {}, timeout {}s)",
        env!("CARGO_PKG_VERSION"),
        config.api.base_url,
        config.api.request_timeout_secs
    );

    let app = web::router(web::WebState::new(&config)?);

    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
