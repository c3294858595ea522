use std::fmt::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::assemble::Route;
use crate::error::{Error, Result};
use crate::geo::{split_at_antimeridian, Coordinate};
use crate::ports::Port;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    Note,
}

/// Requested port at either end of a planned voyage.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    pub coordinate: Coordinate,
}

impl From<&Port> for RouteEndpoint {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            country: port.country.clone(),
            coordinate: port.coordinate,
        }
    }
}

impl RouteEndpoint {
    fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Structured set of route alternatives that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub routes: Vec<Route>,
}

impl RouteSummary {
    pub fn new(origin: &Port, destination: &Port, routes: Vec<Route>) -> Result<Self> {
        if routes.is_empty() {
            return Err(Error::EmptyRouteList);
        }
        Ok(Self {
            origin: origin.into(),
            destination: destination.into(),
            routes,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Routes: {} -> {} ({} option{})",
            self.origin.display_name(),
            self.destination.display_name(),
            self.routes.len(),
            if self.routes.len() == 1 { "" } else { "s" }
        );

        for route in &self.routes {
            let _ = writeln!(
                buffer,
                "  {:<11} {:>9.1} nm  {:>5.1} days  risk: {}",
                route.id, route.distance_nm, route.estimated_days, route.risk
            );
            let _ = writeln!(
                buffer,
                "    via: {}",
                route.named_stops().collect::<Vec<_>>().join(" -> ")
            );
        }

        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Routes**: _{} to {}_",
            self.origin.display_name(),
            self.destination.display_name()
        );
        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "| Route | Distance (nm) | Days | Risk |");
        let _ = writeln!(buffer, "|---|---:|---:|---|");
        for route in &self.routes {
            let _ = writeln!(
                buffer,
                "| **{}** (`{}`) | {:.1} | {:.1} | {} |",
                route.name, route.id, route.distance_nm, route.estimated_days, route.risk
            );
        }
        for route in &self.routes {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "* **{}**: {}", route.name, route.description);
            for (index, stop) in route.named_stops().enumerate() {
                let _ = writeln!(buffer, "  {:>2}. {}", index + 1, stop);
            }
        }
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "{} -> {}:",
            self.origin.name, self.destination.name
        );
        for route in &self.routes {
            let _ = writeln!(
                buffer,
                "{} {:.0}nm {:.1}d {}",
                route.id, route.distance_nm, route.estimated_days, route.risk
            );
        }
        buffer
    }

    /// GeoJSON `FeatureCollection` with one feature per route.
    ///
    /// Routes crossing the antimeridian become a `MultiLineString` split on
    /// the `±180` meridian; all others are a single `LineString`.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .routes
            .iter()
            .map(|route| {
                let mut parts = split_at_antimeridian(&route.waypoints);
                let geometry = if parts.len() > 1 {
                    json!({"type": "MultiLineString", "coordinates": parts})
                } else {
                    json!({"type": "LineString", "coordinates": parts.pop().unwrap_or_default()})
                };
                json!({
                    "type": "Feature",
                    "geometry": geometry,
                    "properties": {
                        "id": route.id,
                        "name": route.name,
                        "risk": route.risk,
                        "color": route.color,
                        "distance_nm": route.distance_nm,
                        "estimated_days": route.estimated_days,
                        "waypoint_names": route.waypoint_names,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "properties": {
                "origin": self.origin,
                "destination": self.destination,
            },
            "features": features,
        })
    }
}
