//! Catalog service - REST API over the `books` table

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use sqlx::sqlite::SqlitePoolOptions;

use library_catalog::{api, config::ServiceConfig, repository::Repository, telemetry, AppState};

#[derive(Parser)]
#[command(name = "catalog-service")]
#[command(about = "Library catalog REST service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema if needed and serve the API (default)
    Serve,
    /// Drop and recreate the books table with demo records
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServiceConfig::load()?;

    telemetry::init_tracing(&config.logging);
    telemetry::warn_on_default_secret(&config.secret_key);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!("Connected to database");

    let repository = Repository::new(pool);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::InitDb => {
            let seeded = repository.reset_with_demo_data().await?;
            tracing::info!("Database initialised with {} demo books", seeded);
            Ok(())
        }
        Commands::Serve => serve(config, repository).await,
    }
}

async fn serve(config: ServiceConfig, repository: Repository) -> anyhow::Result<()> {
    repository.ensure_schema().await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting catalog service v{}", env!("CARGO_PKG_VERSION"));

    let app = api::router(AppState::new(config, repository));

    tracing::info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
