// SPDX-FileCopyrightText: 2026 Tessera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tessera - plugin capability and slot registry for the ERP frontend.
//!
//! This is the administrative CLI: it validates manifests and reports what
//! the registry would render from a directory of installed plugins.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod inspect;
mod loader;
mod policy;
mod validate;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tessera_config::TesseraConfig;
use tessera_core::TesseraError;

/// Tessera - plugin capability and slot registry.
#[derive(Parser, Debug)]
#[command(name = "tessera", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and validate one manifest file.
    Validate {
        /// Path to the manifest JSON.
        file: PathBuf,
    },
    /// Print the components bound to a slot, in render order.
    Resolve {
        slot: String,
        /// Resolve for this organization (global plugins plus its own).
        #[arg(long = "org")]
        organization: Option<String>,
    },
    /// Print the custom fields plugins add to a model.
    Fields {
        model: String,
        #[arg(long = "org")]
        organization: Option<String>,
    },
    /// List installed plugins with their status and validation errors.
    Plugins,
    /// Print the capability whitelist of each trust level.
    Trust,
    /// List or search the built-in module catalog.
    Modules {
        query: Option<String>,
    },
}

fn load_config(path: Option<&PathBuf>) -> TesseraConfig {
    let result = match path {
        Some(path) => tessera_config::load_and_validate_path(path),
        None => tessera_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            tessera_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tessera={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: TesseraConfig) -> Result<bool, TesseraError> {
    let use_color = !cli.plain && std::io::stdout().is_terminal();

    match cli.command {
        Some(Commands::Validate { file }) => {
            return validate::run_validate(&config, &file, cli.json, use_color).await;
        }
        Some(Commands::Resolve { slot, organization }) => {
            let loaded = loader::load_registry(&config).await?;
            inspect::run_resolve(&loaded, &slot, organization.as_deref(), cli.json)?;
        }
        Some(Commands::Fields {
            model,
            organization,
        }) => {
            let loaded = loader::load_registry(&config).await?;
            inspect::run_fields(&loaded, &model, organization.as_deref(), cli.json)?;
        }
        Some(Commands::Plugins) => {
            let loaded = loader::load_registry(&config).await?;
            inspect::run_plugins(&loaded, cli.json, use_color)?;
        }
        Some(Commands::Trust) => policy::run_trust(&config, cli.json)?,
        Some(Commands::Modules { query }) => policy::run_modules(&config, query.as_deref())?,
        None => println!("tessera: use --help for available commands"),
    }
    Ok(true)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.logging.level);

    match run(cli, config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
