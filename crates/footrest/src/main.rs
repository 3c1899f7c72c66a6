//! FootREST CLI: `serve` (default) runs the HTTP server; `generate`
//! writes the default config file and exits. Grounded on
//! `crates/oxide-migrate/src/main.rs`'s clap + tracing setup and
//! `examples/original_source/cmd/footrest/main.go`'s `globalCmd`/`genCmd`
//! split.

mod config_io;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use footrest_driver::Engine;
use footrest_http::{CorsMiddleware, LoggingMiddleware, Middleware};

const DEFAULT_CONFIG_FILE: &str = "footrest.config";

/// Exposes database tables as a REST API.
#[derive(Parser)]
#[command(name = "footrest", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Starts the HTTP server (the default when no subcommand is given).
    Serve {
        /// Config file to load (merged onto the built-in defaults).
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Writes the default config to a file and exits.
    #[command(alias = "gen")]
    Generate {
        /// Where to write the generated config.
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve {
        config: PathBuf::from(DEFAULT_CONFIG_FILE),
    });

    match command {
        Command::Generate { config } => {
            config_io::save_config(&config, &footrest_http::Config::default())?;
            println!("wrote {}", config.display());
            Ok(())
        }
        Command::Serve { config } => serve(&config).await,
    }
}

async fn serve(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = match config_io::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            footrest_http::Config::default()
        }
    };

    init_tracing(config.debug);

    tracing::debug!(
        db_type = %config.db_type,
        connection = %config.connection,
        addr = %config.addr,
        root = %config.root,
        "starting"
    );

    let dialect = Arc::new(footrest_dialects::by_name(&config.db_type));
    let engine = Engine::connect(&config.connection, dialect, config.use_schema).await?;
    let engine = Arc::new(engine);

    let middleware: Arc<Vec<Box<dyn Middleware>>> = Arc::new(vec![
        Box::new(CorsMiddleware::permissive()),
        Box::new(LoggingMiddleware),
    ]);
    let config = Arc::new(config);

    tokio::select! {
        result = footrest_http::serve(engine, config, middleware) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }

    Ok(())
}

/// Level comes from `RUST_LOG` when set; otherwise `info`, raised to
/// `debug` when the config's `debug` flag is set (SPEC_FULL.md §6).
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
