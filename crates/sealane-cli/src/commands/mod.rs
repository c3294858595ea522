//! Handlers for the CLI subcommands.
//!
//! `main.rs` parses arguments and dispatches here; each module owns one
//! subcommand. Engine construction from the shared data options lives in this
//! module so every command loads data the same way.

pub mod nearest;
pub mod ports;
pub mod route;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use sealane_lib::{EngineConfig, PortCatalog, RouteEngine, SeaNetwork};

/// Data sources and tunables shared by all subcommands.
#[derive(Debug, Clone, Default)]
pub struct EngineArgs {
    /// Sea-lane network JSON; the embedded network when `None`.
    pub network: Option<PathBuf>,
    /// Port catalog CSV; the embedded catalog when `None`.
    pub ports: Option<PathBuf>,
    /// Engine configuration JSON.
    pub config: Option<PathBuf>,
    /// Disable the route cache.
    pub no_cache: bool,
}

/// Load the port catalog selected by `args`.
pub fn load_ports(args: &EngineArgs) -> Result<PortCatalog> {
    match &args.ports {
        Some(path) => PortCatalog::from_path(path)
            .with_context(|| format!("failed to load port catalog from {}", path.display())),
        None => PortCatalog::embedded().context("failed to load the embedded port catalog"),
    }
}

/// Build a route engine from the selected data sources.
pub fn build_engine(args: &EngineArgs) -> Result<RouteEngine> {
    let network = match &args.network {
        Some(path) => SeaNetwork::from_path(path)
            .with_context(|| format!("failed to load sea-lane network from {}", path.display()))?,
        None => SeaNetwork::embedded().context("failed to load the embedded sea-lane network")?,
    };
    let ports = load_ports(args)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load engine configuration from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.no_cache {
        config.cache_capacity = 0;
    }
    debug!(?config, "engine configuration");

    RouteEngine::new(network, ports, config).context("failed to initialise the route engine")
}
