//! Promo Code Factory server
//!
//! ```sh
//! # Run with default config (~/.config/promo-code-factory/config.toml)
//! promo-code-factory
//!
//! # Custom config path and port
//! promo-code-factory --config /etc/promo-code-factory/config.toml --port 8081
//!
//! # Validate config without starting
//! promo-code-factory --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use promo_code_factory::config::{default_config_path, AppConfig};
use promo_code_factory::server::{init_tracing, ServerHandle, ServerOptions};

/// Partner promo code limit service.
#[derive(Parser, Debug)]
#[command(
    name = "promo-code-factory",
    version,
    about = "REST service for managing partner promo code limits",
    long_about = "Promo Code Factory: assigns promo code limits to partners and keeps \
                  their limit history.\n\n\
                  Default config: ~/.config/promo-code-factory/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "PROMO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.listen_address());
        println!("   Storage     : {}", config.database.backend);
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   Demo seed   : {}", config.seed.demo_partners);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
