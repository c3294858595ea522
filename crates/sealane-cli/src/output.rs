//! Output formatting for route, port and resolution rendering.
//!
//! Every renderer writes to a caller-supplied [`Write`] so the formats can be
//! exercised in tests; the `render_*` wrappers target stdout.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};

use sealane_lib::{EndpointResolution, Port, RiskLevel, Route, RouteRenderMode, RouteSummary};

use crate::terminal::{format_with_separators, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text summary.
    #[default]
    Text,
    /// Markdown table and stop lists.
    Rich,
    /// Compact one line per route.
    Note,
    /// Colored terminal view with risk badges.
    Enhanced,
    /// Pretty-printed JSON.
    Json,
    /// GeoJSON FeatureCollection.
    Geojson,
}

/// Render a route summary to stdout.
pub fn render_summary(summary: &RouteSummary, format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_summary(&mut stdout, summary, format, ColorPalette::detect())
}

/// Write a route summary in `format`.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &RouteSummary,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write!(out, "{}", summary.render(RouteRenderMode::PlainText)),
        OutputFormat::Rich => write!(out, "{}", summary.render(RouteRenderMode::RichText)),
        OutputFormat::Note => write!(out, "{}", summary.render(RouteRenderMode::Note)),
        OutputFormat::Enhanced => EnhancedRenderer::new(palette).write(out, summary),
        OutputFormat::Json => write_json(out, summary),
        OutputFormat::Geojson => write_json(out, &summary.to_geojson()),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

/// Colored multi-line route view.
#[derive(Debug, Clone, Copy)]
pub struct EnhancedRenderer {
    palette: ColorPalette,
}

impl EnhancedRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn write<W: Write>(&self, out: &mut W, summary: &RouteSummary) -> io::Result<()> {
        let p = &self.palette;
        writeln!(
            out,
            "Routes from {}{}{} to {}{}{}:",
            p.white_bold, summary.origin.name, p.reset, p.white_bold, summary.destination.name, p.reset
        )?;

        for route in &summary.routes {
            writeln!(out)?;
            self.write_route(out, route)?;
        }
        Ok(())
    }

    fn write_route<W: Write>(&self, out: &mut W, route: &Route) -> io::Result<()> {
        let p = &self.palette;
        let (badge, label) = self.risk_badge(route.risk);
        writeln!(
            out,
            "{badge} {label} {reset} {}{}{} {}{} nm{} {}~{:.1} days{}",
            p.white_bold,
            route.name,
            p.reset,
            p.cyan,
            format_with_separators(route.distance_nm.round() as u64),
            p.reset,
            p.gray,
            route.estimated_days,
            p.reset,
            reset = p.reset,
        )?;

        let stops: Vec<&str> = route.named_stops().collect();
        let len = stops.len();
        for (index, stop) in stops.iter().enumerate() {
            let branch = if index + 1 == len { "└─" } else { "├─" };
            writeln!(out, "  {}{}{} {}", p.gray, branch, p.reset, stop)?;
        }
        Ok(())
    }

    fn risk_badge(&self, risk: RiskLevel) -> (&'static str, &'static str) {
        let p = &self.palette;
        match risk {
            RiskLevel::High => (p.tag_high, "HIGH"),
            RiskLevel::Medium => (p.tag_medium, " MED"),
            RiskLevel::Low => (p.tag_low, " LOW"),
        }
    }
}

#[derive(Serialize)]
struct PortListing<'a> {
    count: usize,
    ports: &'a [&'a Port],
}

/// Render a port listing to stdout.
pub fn render_ports(ports: &[&Port], format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_ports(&mut stdout, ports, format)
}

/// Write a port listing in `format`.
pub fn write_ports<W: Write>(out: &mut W, ports: &[&Port], format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(
            out,
            &PortListing {
                count: ports.len(),
                ports,
            },
        ),
        OutputFormat::Geojson => {
            let features: Vec<Value> = ports
                .iter()
                .map(|port| point_feature(port.coordinate.into(), json!(port)))
                .collect();
            write_json(out, &json!({"type": "FeatureCollection", "features": features}))
        }
        OutputFormat::Rich => {
            writeln!(out, "| Port | Country | Region | Lon | Lat |")?;
            writeln!(out, "|---|---|---|---:|---:|")?;
            for port in ports {
                writeln!(
                    out,
                    "| **{}** | {} | {} | {:.2} | {:.2} |",
                    port.name, port.country, port.region, port.coordinate.lon, port.coordinate.lat
                )?;
            }
            Ok(())
        }
        OutputFormat::Note => {
            let names: Vec<&str> = ports.iter().map(|port| port.name.as_str()).collect();
            writeln!(out, "{}", names.join(", "))
        }
        OutputFormat::Text | OutputFormat::Enhanced => {
            let width = ports.iter().map(|port| port.name.len()).max().unwrap_or(4);
            for port in ports {
                writeln!(
                    out,
                    "{:<width$}  {:<20}  {:<16}  {:>8.2} {:>7.2}",
                    port.name,
                    port.country,
                    port.region,
                    port.coordinate.lon,
                    port.coordinate.lat,
                )?;
            }
            writeln!(out, "{} port{}", ports.len(), if ports.len() == 1 { "" } else { "s" })
        }
    }
}

/// Render an endpoint resolution to stdout.
pub fn render_resolution(resolution: &EndpointResolution, format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_resolution(&mut stdout, resolution, format)
}

/// Write an endpoint resolution in `format`.
pub fn write_resolution<W: Write>(
    out: &mut W,
    resolution: &EndpointResolution,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, resolution),
        OutputFormat::Geojson => {
            let mut features = vec![point_feature(
                resolution.port.coordinate.into(),
                json!({"kind": "port", "name": resolution.port.name, "distance_nm": resolution.port_distance_nm}),
            )];
            if let Some(node) = &resolution.node {
                features.push(point_feature(
                    node.coordinate.into(),
                    json!({"kind": "sea_node", "id": node.id, "name": node.name, "distance_nm": node.distance_nm}),
                ));
            }
            write_json(out, &json!({"type": "FeatureCollection", "features": features}))
        }
        _ => {
            writeln!(out, "Coordinate: {}", resolution.coordinate)?;
            writeln!(
                out,
                "Nearest port: {} ({:.1} nm)",
                resolution.port.name, resolution.port_distance_nm
            )?;
            match &resolution.node {
                Some(node) => {
                    writeln!(
                        out,
                        "Nearest sea node: {} [{}] ({:.1} nm)",
                        node.name, node.id, node.distance_nm
                    )?;
                    if node.beyond_coverage {
                        writeln!(
                            out,
                            "Warning: the nearest sea node is beyond the coverage threshold; routes will start far from this point"
                        )?;
                    }
                    Ok(())
                }
                None => writeln!(out, "Nearest sea node: none (network is empty)"),
            }
        }
    }
}

fn point_feature(coordinate: [f64; 2], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": coordinate},
        "properties": properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealane_lib::{direct_route, Coordinate};

    fn summary() -> RouteSummary {
        let a = Port::new("Alpha", "A", "North", Coordinate::new(0.0, 0.0));
        let b = Port::new("Bravo", "B", "North", Coordinate::new(0.0, 10.0));
        let routes = vec![direct_route(&a, &b, 16.0)];
        RouteSummary::new(&a, &b, routes).expect("summary")
    }

    fn written(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        write_summary(&mut buffer, &summary(), format, ColorPalette::plain()).expect("write");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn enhanced_plain_palette_has_no_escape_codes() {
        let text = written(OutputFormat::Enhanced);
        assert!(!text.contains('\x1b'));
        assert!(text.contains(" MED"));
        assert!(text.contains("Direct Route"));
        assert!(text.contains("└─ Bravo"));
    }

    #[test]
    fn json_output_is_parseable() {
        let value: Value = serde_json::from_str(&written(OutputFormat::Json)).expect("json");
        assert_eq!(value["routes"][0]["risk"], "medium");
        assert_eq!(value["origin"]["name"], "Alpha");
    }

    #[test]
    fn port_listing_counts_entries() {
        let alpha = Port::new("Alpha", "A", "North", Coordinate::new(0.0, 0.0));
        let mut buffer = Vec::new();
        write_ports(&mut buffer, &[&alpha], OutputFormat::Text).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.starts_with("Alpha"));
        assert!(text.trim_end().ends_with("1 port"));
    }
}
