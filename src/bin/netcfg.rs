//! netcfg - apply interface intents
//!
//! # Usage
//!
//! ```bash
//! # Write interfaces.d, dhcpcd and netplan config, then restart networking
//! sudo netcfg apply intents.json --restart
//!
//! # Only the netplan backend
//! sudo netcfg apply intents.json --backend netplan
//!
//! # Print the interfaces.d stanzas without writing anything
//! netcfg render intents.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use libnetcfg::{prepare, render, BackendId, Configurator, IntentSet, NetcfgConfig, ServiceReconciler};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Default configuration file
const DEFAULT_CONFIG: &str = "/etc/netcfg/netcfg.toml";

/// Network interface configuration tool
#[derive(Parser, Debug)]
#[command(name = "netcfg")]
#[command(version)]
#[command(about = "Render interface intents into interfaces.d, dhcpcd and netplan config", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate intents and write every enabled backend's config
    Apply {
        /// JSON file with one intent or a list of intents
        file: PathBuf,

        /// Backend to write (repeatable; defaults to the configured set)
        #[arg(short, long = "backend")]
        backends: Vec<BackendId>,

        /// Reconcile the running network stack afterwards
        #[arg(long)]
        restart: bool,
    },
    /// Validate intents and print their interfaces.d stanzas
    Render {
        /// JSON file with one intent or a list of intents
        file: PathBuf,
    },
    /// Reconcile the running network stack only
    Restart,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Apply { file, backends, restart } => {
            warn_if_not_root();

            let intents = read_intents(&file)?;
            let enabled = if backends.is_empty() {
                config.backends.enabled.clone()
            } else {
                backends
            };

            let configurator = Configurator::new(&config);
            configurator.configure(intents, &enabled).await
                .context("Failed to configure interfaces")?;
            info!("Configuration written");

            if restart {
                ServiceReconciler::new(config.reconcile.clone())
                    .restart_service()
                    .await
                    .context("Configuration written but the network service could not be reconciled")?;
                info!("Network service reconciled");
            }
        }
        Commands::Render { file } => {
            let ordered = prepare(read_intents(&file)?)?;
            let stanzas: Vec<String> = ordered.iter().map(render).collect();
            println!("{}", stanzas.join("\n\n"));
        }
        Commands::Restart => {
            warn_if_not_root();
            ServiceReconciler::new(config.reconcile.clone())
                .restart_service()
                .await
                .context("Failed to reconcile network service")?;
            info!("Network service reconciled");
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<NetcfgConfig> {
    match path {
        Some(path) => NetcfgConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => NetcfgConfig::load(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load {}", DEFAULT_CONFIG)),
        None => Ok(NetcfgConfig::default()),
    }
}

fn read_intents(path: &Path) -> anyhow::Result<IntentSet> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    IntentSet::from_json(&json)
        .with_context(|| format!("Failed to parse intents in {}", path.display()))
}

fn warn_if_not_root() {
    #[cfg(target_os = "linux")]
    {
        let uid = unsafe { libc::getuid() };
        if uid != 0 {
            warn!("Not running as root - writing system config may fail");
        }
    }
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.verbose {
        "debug"
    } else {
        &cli.log_level
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new(format!("netcfg={},libnetcfg={}", log_level, log_level))
        });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}
