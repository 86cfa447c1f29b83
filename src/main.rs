//! placeseek: Command-line interface for the place search API

use anyhow::Result;
use clap::{Parser, Subcommand};
use placeseek::config::{self, AppConfig};
use placeseek::search::SearchOrchestrator;
use placeseek::server;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// CLI Implementation
// ============================================================================

/// placeseek: natural-language place search backed by an LLM and Google Places
#[derive(Parser)]
#[command(name = "placeseek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (default: $XDG_CONFIG_HOME/placeseek/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize placeseek configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Run one search and print the locations
    Search {
        /// Natural-language location query
        query: String,

        /// Print the response envelope as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Load, override and validate the configuration
fn load_config(path: Option<&str>, bind: Option<&str>) -> Result<AppConfig> {
    let mut config = config::load(path)?;
    if let Some(addr) = bind {
        config = config.with_bind_addr(addr);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional; real environment variables win over it
    dotenvy::dotenv().ok();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Init { force } => {
            let config_dir = config::config_dir();
            let config_path = config::default_config_path();

            eprintln!("Initializing placeseek configuration...");
            eprintln!("Config directory: {}", config_dir.display());

            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)?;
                eprintln!("Created config directory");
            }

            if config_path.exists() && !force {
                eprintln!("Configuration file already exists: {}", config_path.display());
                eprintln!("Use --force to overwrite");
                return Ok(());
            }

            let default_config = AppConfig::default();
            let toml_content = default_config.to_toml()?;
            std::fs::write(&config_path, &toml_content)?;

            eprintln!("Created configuration file: {}", config_path.display());
            eprintln!("\nSet google_maps_api_key and anthropic_api_key (or the");
            eprintln!("GOOGLE_MAPS_API_KEY / ANTHROPIC_API_KEY environment variables).");

            Ok(())
        }
        Commands::Serve { bind } => {
            let config = load_config(cli.config.as_deref(), bind.as_deref())?;
            tracing::info!("Places endpoint: {}", config.places_base_url());
            tracing::info!("Rewrite model: {}", config.anthropic_model());

            let orchestrator = Arc::new(SearchOrchestrator::from_config(&config)?);
            let router = server::create_router(orchestrator, config.cors_permissive());
            server::serve(config.bind_addr(), router).await
        }
        Commands::Search { query, json } => {
            let config = load_config(cli.config.as_deref(), None)?;
            let orchestrator = SearchOrchestrator::from_config(&config)?;
            let response = orchestrator.search_query(&query).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            println!("{}\n", response.message);
            for (i, location) in response.locations.iter().enumerate() {
                println!("{}. {}", i + 1, location.name());
                println!("   Address: {}", location.formatted_address());
                println!(
                    "   Coordinates: {:.6}, {:.6}",
                    location.latitude(),
                    location.longitude()
                );
                if let Some(rating) = location.rating() {
                    println!("   Rating: {:.1}", rating);
                }
                if !location.types().is_empty() {
                    println!("   Types: {}", location.types().join(", "));
                }
                println!("   Place ID: {}", location.place_id());
                println!();
            }
            Ok(())
        }
    }
}
