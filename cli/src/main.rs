//! Fuel Track - API server
//!
//! ```sh
//! # Run with default config (~/.config/fuel-track/config.toml)
//! fuel-track
//!
//! # Custom config path, in-memory storage, demo data
//! fuel-track --config ./dev.toml --database-url memory:// --seed
//!
//! # Validate config without starting
//! fuel-track --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use fuel_track::config::AppConfig;
use fuel_track::server::{init_tracing, ServerHandle, ServerOptions};

/// Fuel Track - REST API for fuel delivery trips.
#[derive(Parser, Debug)]
#[command(
    name = "fuel-track",
    version,
    about = "REST API for scheduling and tracking fuel delivery trips",
    long_about = "Fuel Track - JWT-protected REST API with paginated, fuzzy \
                  bilingual trip search.\n\n\
                  Default config: ~/.config/fuel-track/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "FUEL_TRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database URL (`memory://` for the in-process store).
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Insert demo users and trips when the store is empty.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(fuel_track::default_config_path);

    let mut config = AppConfig::load(&config_path)?;
    config.apply_env_overrides()?;

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Environment : {}", config.server.environment);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ───────────────────────────────────────────
    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed: cli.seed,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    };

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;
    Ok(())
}
