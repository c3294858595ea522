//! Nearest command handler: show how a coordinate resolves before routing.

use anyhow::{Context, Result};

use sealane_lib::Coordinate;

use crate::commands::{build_engine, EngineArgs};
use crate::output::{render_resolution, OutputFormat};

pub fn handle_nearest_command(
    engine_args: &EngineArgs,
    format: OutputFormat,
    coordinate: Coordinate,
) -> Result<()> {
    let engine = build_engine(engine_args)?;
    let resolution = engine.resolve_endpoint(coordinate);
    render_resolution(&resolution, format).context("failed to write resolution")
}
