//! Route command handler for planning voyages between coordinates or ports.

use anyhow::{bail, Context, Result};

use sealane_lib::{Coordinate, RouteEngine, RouteOptions, RouteSummary};

use crate::commands::{build_engine, EngineArgs};
use crate::output::{render_summary, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone, Default)]
pub struct RouteCommandArgs {
    /// Origin coordinate.
    pub from: Option<Coordinate>,
    /// Destination coordinate.
    pub to: Option<Coordinate>,
    /// Origin port name.
    pub from_port: Option<String>,
    /// Destination port name.
    pub to_port: Option<String>,
    /// Steer the safest route away from high-risk chokepoints.
    pub avoid_high_risk: bool,
    /// Weather penalty applied to the fastest route.
    pub weather_penalty: f64,
}

impl RouteCommandArgs {
    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            avoid_high_risk: self.avoid_high_risk,
            weather_penalty: self.weather_penalty,
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    engine_args: &EngineArgs,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let engine = build_engine(engine_args)?;
    let summary = plan_summary(&engine, args)?;
    render_summary(&summary, format).context("failed to write route output")
}

/// Resolve the endpoints in `args` and plan the routes.
pub fn plan_summary(engine: &RouteEngine, args: &RouteCommandArgs) -> Result<RouteSummary> {
    let origin = endpoint(engine, args.from, args.from_port.as_deref(), "origin")?;
    let destination = endpoint(engine, args.to, args.to_port.as_deref(), "destination")?;

    let routes = engine.try_calculate_routes(origin, destination, &args.options())?;
    let (origin_port, destination_port) = engine.resolve_ports(&origin, &destination);
    Ok(RouteSummary::new(origin_port, destination_port, routes)?)
}

fn endpoint(
    engine: &RouteEngine,
    coordinate: Option<Coordinate>,
    port: Option<&str>,
    label: &str,
) -> Result<Coordinate> {
    match (coordinate, port) {
        (Some(coordinate), None) => Ok(coordinate),
        (None, Some(name)) => Ok(engine.ports().resolve_name(name)?.coordinate),
        (Some(_), Some(_)) => bail!("give the {label} either as a coordinate or as a port, not both"),
        (None, None) => bail!("missing {label}: pass a coordinate or a port name"),
    }
}

/// Parse `"lon,lat"` into a coordinate.
pub fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT but got '{value}'"))?;
    let parse = |part: &str, axis: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid {axis} '{}': {err}", part.trim()))
    };
    let coordinate = Coordinate::new(parse(lon, "longitude")?, parse(lat, "latitude")?);
    if !coordinate.is_valid() {
        return Err(format!(
            "coordinate {coordinate} is out of range (longitude -180..180, latitude -90..90)"
        ));
    }
    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lon_lat_pairs() {
        assert_eq!(
            parse_coordinate("121.49,31.23"),
            Ok(Coordinate::new(121.49, 31.23))
        );
        assert_eq!(
            parse_coordinate(" -74.04 , 40.67 "),
            Ok(Coordinate::new(-74.04, 40.67))
        );
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coordinate("121.49").is_err());
        assert!(parse_coordinate("east,31").unwrap_err().contains("longitude"));
        assert!(parse_coordinate("10,95").unwrap_err().contains("out of range"));
    }

    #[test]
    fn options_follow_flags() {
        let args = RouteCommandArgs {
            avoid_high_risk: true,
            weather_penalty: 0.25,
            ..RouteCommandArgs::default()
        };
        let options = args.options();
        assert!(options.avoid_high_risk);
        assert_eq!(options.weather_penalty, 0.25);
    }
}
