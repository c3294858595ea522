//! Ports command handler for listing and searching the port catalog.

use anyhow::{Context, Result};

use sealane_lib::Port;

use crate::commands::{load_ports, EngineArgs};
use crate::output::{render_ports, OutputFormat};

/// Handle the ports subcommand.
///
/// Without a query every port is listed; otherwise ports whose name, country
/// or region contains the query are shown.
pub fn handle_ports_command(
    engine_args: &EngineArgs,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    let catalog = load_ports(engine_args)?;
    let ports: Vec<&Port> = match query {
        Some(query) => catalog.search(query),
        None => catalog.iter().collect(),
    };

    if ports.is_empty() {
        if let Some(query) = query {
            let suggestions = catalog.fuzzy_matches(query, 3);
            if suggestions.is_empty() {
                eprintln!("No ports match '{query}'.");
            } else {
                eprintln!(
                    "No ports match '{query}'. Did you mean: {}?",
                    suggestions.join(", ")
                );
            }
        }
    }

    render_ports(&ports, format).context("failed to write port listing")
}
