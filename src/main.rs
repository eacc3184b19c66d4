use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flipfinder::config::Config;
use flipfinder::crawler::SoldListingsPipeline;
use flipfinder::server::ApiServer;

#[derive(Parser)]
#[command(
    name = "flipfinder",
    version,
    about = "eBay sold-listing scraper for resale price checks",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search sold listings and print the result envelope
    Search {
        /// Free-text search query
        query: String,

        /// Retries after the first attempt
        #[arg(long)]
        max_retries: Option<u32>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Serve the sold-listings HTTP API
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind (overrides config and PORT)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Search { config, .. } | Commands::Serve { config, .. } => config.clone(),
    };
    let config = Config::load(config_path.as_deref())?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Search {
            query, max_retries, ..
        } => {
            tracing::info!(
                query = %query,
                max_retries = ?max_retries,
                "Starting search command"
            );
            search(config, query, max_retries).await?;
        }

        Commands::Serve { bind, .. } => {
            tracing::info!(bind = ?bind, "Starting serve command");
            serve(config, bind).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("flipfinder=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("flipfinder={level},warn"))
            .context("Invalid log level")?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn search(config: Config, query: String, max_retries: Option<u32>) -> Result<()> {
    let pipeline = SoldListingsPipeline::from_config(&config)?;
    let max_retries = max_retries.unwrap_or(pipeline.policy().max_retries);

    let envelope = pipeline.get_sold_listings_with(&query, max_retries).await;

    let rendered =
        serde_json::to_string_pretty(&envelope).context("Failed to serialize result envelope")?;
    println!("{rendered}");

    if !envelope.success {
        tracing::warn!(
            query = %query,
            error = envelope.error.as_deref().unwrap_or(""),
            "Search returned no listings"
        );
    }

    Ok(())
}

async fn serve(mut config: Config, bind: Option<SocketAddr>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }

    let pipeline = SoldListingsPipeline::from_config(&config)?;
    let server = ApiServer::new(config.server.clone(), pipeline);

    server
        .start_with_shutdown(shutdown_signal())
        .await
        .context("Sold listings API failed")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
