use std::error::Error;

use clap::Parser;
mod cli;
use http::HeaderValue;
use modelhub_core::Core;
use modelhub_storage::HubStorage;
use modelhub_upstream::Upstream;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("modelhub failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let dsn = resolve_dsn(&cli.dsn)?;
    let storage = HubStorage::connect(&dsn).await?;
    info!(dsn = %dsn, "db connected");
    storage.sync().await?;

    let upstream = Upstream::new();
    let core = Core::new(storage, upstream);
    let app = core
        .router()
        .layer(cors_layer(&cli.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let bind = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("modelhub=info,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cors_layer(origins: &str) -> Result<CorsLayer, Box<dyn Error + Send + Sync>> {
    let origins = origins.trim();
    if origins.is_empty() || origins == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let list = origins
        .split(',')
        .map(|origin| origin.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    // Wildcards cannot be combined with credentials, so mirror instead.
    Ok(CorsLayer::new()
        .allow_origin(list)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

fn resolve_dsn(input: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    if !input.trim().is_empty() {
        return Ok(input.to_string());
    }

    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or("failed to resolve executable directory")?;
    let db_path = dir.join("modelhub.db");
    let db_path = db_path.to_string_lossy();
    let dsn = if db_path.starts_with('/') {
        let trimmed = db_path.trim_start_matches('/');
        format!("sqlite:///{}?mode=rwc", trimmed)
    } else {
        format!("sqlite://{}?mode=rwc", db_path)
    };
    Ok(dsn)
}
