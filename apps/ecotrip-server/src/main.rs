mod config;
mod cors;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use trip_emissions::api::rest::routes::register_routes;
use trip_emissions::domain::service::{EmissionsService, ServiceLimits};
use trip_emissions::infra::{InMemoryCalcRepository, OrsClient, PdfReceiptRenderer};

use crate::config::AppConfig;
use crate::cors::build_cors_layer;

/// EcoTrip Server - trip CO2 calculation and receipts
#[derive(Parser)]
#[command(name = "ecotrip-server")]
#[command(about = "EcoTrip Server - trip CO2 calculation and receipts")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
        }
    }

    init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check_config(config: &AppConfig) -> Result<()> {
    config.emissions.calculation.factors.validate()?;
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("EcoTrip Server starting");

    let factors = config.emissions.calculation.factors.clone();
    factors.validate()?;

    if config.emissions.ors.api_key.is_none() {
        tracing::warn!(
            "no ORS API key configured; routed calculations will fail until \
             ORS_API_KEY (or emissions.ors.api_key) is set"
        );
    }

    let resolver = Arc::new(OrsClient::new(&config.emissions.ors)?);
    let repo = Arc::new(InMemoryCalcRepository::new());
    let renderer = Arc::new(PdfReceiptRenderer);
    let limits = ServiceLimits {
        max_route_km: config.emissions.calculation.max_route_km,
        suggest_limit: config.emissions.calculation.suggest_limit,
        default_profile: config.emissions.calculation.default_profile.clone(),
    };
    let service = Arc::new(EmissionsService::new(
        resolver, repo, renderer, factors, limits,
    ));

    let router = register_routes(Router::new(), service)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors));

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "EcoTrip server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("EcoTrip server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
