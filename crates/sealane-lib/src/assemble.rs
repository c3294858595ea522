//! Turning a node path into a renderable [`Route`].
//!
//! The assembler stitches edge geometry together in travel order, attaches the
//! true origin and destination ports when they sit away from the snapped graph
//! nodes, and derives distance, transit time and risk class from the result.
//! Distance is always recomputed from the final waypoint list so it matches the
//! rendered polyline exactly. Longitudes are unwrapped so the polyline never
//! jumps across the antimeridian; waypoints past `±180` are continuations of
//! the line, not new positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::{polyline_length_nm, unwrap_longitudes, Coordinate};
use crate::graph::SeaGraph;
use crate::network::NodeIndex;
use crate::path::SearchPath;
use crate::policy::CostPolicy;
use crate::ports::Port;

/// Origin or destination closer than this to its graph node is not drawn separately.
pub const DEFAULT_ENDPOINT_DEDUP_NM: f64 = 30.0;

/// Assumed average service speed for transit estimates.
pub const DEFAULT_CRUISE_SPEED_KNOTS: f64 = 20.0;

/// Slower speed used for the synthetic direct route.
pub const DEFAULT_FALLBACK_SPEED_KNOTS: f64 = 16.0;

const DIRECT_ROUTE_COLOR: &str = "#6b7280";

/// Coarse hazard classification of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled route ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    /// Policy that produced the route; `None` for the direct fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<CostPolicy>,
    pub risk: RiskLevel,
    pub color: String,
    pub waypoints: Vec<Coordinate>,
    /// Parallel to `waypoints`; `None` for intermediate geometry points.
    pub waypoint_names: Vec<Option<String>>,
    /// Identifiers of the graph nodes traversed, in order.
    #[serde(default)]
    pub nodes: Vec<String>,
    pub distance_nm: f64,
    pub estimated_days: f64,
    pub description: String,
}

impl Route {
    /// Names of the named stops along the route, in travel order.
    pub fn named_stops(&self) -> impl Iterator<Item = &str> {
        self.waypoint_names.iter().filter_map(|name| name.as_deref())
    }

    /// `true` when the route traverses the graph node with identifier `node_id`.
    pub fn passes_through(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|id| id == node_id)
    }

    /// `true` for the synthetic great-circle fallback.
    pub fn is_direct(&self) -> bool {
        self.policy.is_none()
    }
}

/// Tunables for route assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyConfig {
    pub endpoint_dedup_nm: f64,
    pub cruise_speed_knots: f64,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            endpoint_dedup_nm: DEFAULT_ENDPOINT_DEDUP_NM,
            cruise_speed_knots: DEFAULT_CRUISE_SPEED_KNOTS,
        }
    }
}

/// Build a [`Route`] from a path found under `policy`.
///
/// Each hop draws the edge the search travelled. Returns `None` for an empty path.
pub fn assemble_route(
    graph: &SeaGraph,
    path: &SearchPath,
    origin: &Port,
    destination: &Port,
    policy: CostPolicy,
    config: &AssemblyConfig,
) -> Option<Route> {
    let (&first, &last) = (path.nodes.first()?, path.nodes.last()?);

    let mut waypoints = Vec::new();
    let mut names = Vec::new();

    let first_node = graph.node(first);
    if origin.coordinate.distance_nm(&first_node.coordinate) > config.endpoint_dedup_nm {
        waypoints.push(origin.coordinate);
        names.push(Some(origin.name.clone()));
    }
    waypoints.push(first_node.coordinate);
    names.push(Some(first_node.name.clone()));

    for (hop, pair) in path.nodes.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        let next = graph.node(to);
        let edge = match path.edges.get(hop) {
            Some(&index) => Some(graph.edge(index)),
            None => graph.edge_between(from, to),
        };
        let geometry = edge.and_then(|edge| edge.geometry_from(from));

        match geometry {
            Some(points) if points.len() > 1 => {
                let interior = points.len() - 2;
                // The first point duplicates the node already emitted.
                waypoints.extend(points.iter().skip(1).take(interior));
                names.extend(std::iter::repeat(None).take(interior));
                waypoints.push(next.coordinate);
            }
            _ => waypoints.push(next.coordinate),
        }
        names.push(Some(next.name.clone()));
    }

    let last_node = graph.node(last);
    if destination.coordinate.distance_nm(&last_node.coordinate) > config.endpoint_dedup_nm
        || waypoints.len() < 2
    {
        waypoints.push(destination.coordinate);
        names.push(Some(destination.name.clone()));
    }

    unwrap_longitudes(&mut waypoints);
    let distance_nm = polyline_length_nm(&waypoints);
    Some(Route {
        id: policy.id().to_string(),
        name: policy.display_name().to_string(),
        policy: Some(policy),
        risk: classify_risk(graph, &path.nodes),
        color: policy.color().to_string(),
        waypoints,
        waypoint_names: names,
        nodes: path
            .nodes
            .iter()
            .map(|&node| graph.node(node).id.clone())
            .collect(),
        distance_nm,
        estimated_days: estimate_days(distance_nm, config.cruise_speed_knots),
        description: policy.description().to_string(),
    })
}

/// Risk class of a path from the hazard tiers of the nodes it touches.
pub fn classify_risk(graph: &SeaGraph, path: &[NodeIndex]) -> RiskLevel {
    if path.iter().any(|&node| graph.is_high_risk(node)) {
        RiskLevel::High
    } else if path.iter().any(|&node| graph.is_medium_risk(node)) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Transit time in days at `speed_knots`, rounded to one decimal place.
pub fn estimate_days(distance_nm: f64, speed_knots: f64) -> f64 {
    if speed_knots <= 0.0 || !speed_knots.is_finite() {
        return 0.0;
    }
    let days = distance_nm / (speed_knots * 24.0);
    (days * 10.0).round() / 10.0
}

/// Two-point great-circle route between the ports, classified as medium risk.
pub fn direct_route(origin: &Port, destination: &Port, speed_knots: f64) -> Route {
    let mut waypoints = vec![origin.coordinate, destination.coordinate];
    unwrap_longitudes(&mut waypoints);
    let distance_nm = polyline_length_nm(&waypoints);
    Route {
        id: "direct".to_string(),
        name: "Direct Route".to_string(),
        policy: None,
        risk: RiskLevel::Medium,
        color: DIRECT_ROUTE_COLOR.to_string(),
        waypoints,
        waypoint_names: vec![Some(origin.name.clone()), Some(destination.name.clone())],
        nodes: Vec::new(),
        distance_nm,
        estimated_days: estimate_days(distance_nm, speed_knots),
        description: "Great-circle line between the ports; no sea-lane path was available."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::network::SeaNetwork;

    fn bent_graph() -> SeaGraph {
        let network = SeaNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"id": "west", "name": "West", "coordinate": [0.0, 0.0]},
                    {"id": "cape", "name": "Cape", "coordinate": [2.0, 0.0]},
                    {"id": "east", "name": "East", "coordinate": [4.0, 0.0]}
                ],
                "edges": [
                    {"from": "west", "to": "cape", "distance_nm": 130.0,
                     "geometry": [[0.0, 0.0], [1.0, 0.5], [2.0, 0.0]]},
                    {"from": "east", "to": "cape", "distance_nm": 125.0}
                ],
                "risk_tiers": {"medium": ["cape"]}
            }"#,
        )
        .expect("valid network");
        build_graph(network)
    }

    fn path(graph: &SeaGraph, nodes: &[NodeIndex]) -> SearchPath {
        SearchPath::from_nodes(graph, nodes).expect("adjacent nodes")
    }

    fn port(name: &str, lon: f64, lat: f64) -> Port {
        Port::new(name, "", "", Coordinate::new(lon, lat))
    }

    #[test]
    fn geometry_is_spliced_without_duplicate_joins() {
        let graph = bent_graph();
        let route = assemble_route(
            &graph,
            &path(&graph, &[0, 1, 2]),
            &port("Here", 0.0, 0.1),
            &port("There", 4.0, 0.1),
            CostPolicy::Fastest,
            &AssemblyConfig::default(),
        )
        .expect("route");

        assert_eq!(
            route.waypoints,
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.5),
                Coordinate::new(2.0, 0.0),
                Coordinate::new(4.0, 0.0),
            ]
        );
        assert_eq!(route.waypoint_names.len(), route.waypoints.len());
        assert_eq!(route.waypoint_names[1], None);
        assert_eq!(route.named_stops().collect::<Vec<_>>(), vec!["West", "Cape", "East"]);
        assert_eq!(route.risk, RiskLevel::Medium);
    }

    #[test]
    fn distant_endpoints_are_attached() {
        let graph = bent_graph();
        let route = assemble_route(
            &graph,
            &path(&graph, &[2, 1]),
            &port("Far East", 6.0, 0.0),
            &port("Near Cape", 2.0, 0.1),
            CostPolicy::Safest,
            &AssemblyConfig::default(),
        )
        .expect("route");

        assert_eq!(route.waypoints.first(), Some(&Coordinate::new(6.0, 0.0)));
        assert_eq!(route.waypoints.last(), Some(&Coordinate::new(2.0, 0.0)));
        assert_eq!(route.waypoint_names[0].as_deref(), Some("Far East"));
    }

    #[test]
    fn single_node_path_still_has_two_waypoints() {
        let graph = bent_graph();
        let route = assemble_route(
            &graph,
            &path(&graph, &[1]),
            &port("A", 2.0, 0.1),
            &port("B", 2.1, 0.0),
            CostPolicy::Economical,
            &AssemblyConfig::default(),
        )
        .expect("route");
        assert_eq!(route.waypoints.len(), 2);
    }

    #[test]
    fn empty_path_is_not_assembled() {
        let graph = bent_graph();
        let here = port("A", 0.0, 0.0);
        assert!(assemble_route(
            &graph,
            &SearchPath::default(),
            &here,
            &here,
            CostPolicy::Fastest,
            &AssemblyConfig::default()
        )
        .is_none());
    }

    #[test]
    fn days_round_to_one_decimal() {
        assert_eq!(estimate_days(4_800.0, 20.0), 10.0);
        assert_eq!(estimate_days(1_000.0, 20.0), 2.1);
        assert_eq!(estimate_days(1_000.0, 0.0), 0.0);
    }

    #[test]
    fn direct_route_is_medium_risk_two_point_line() {
        let route = direct_route(&port("A", 0.0, 0.0), &port("B", 0.0, 1.0), 16.0);
        assert_eq!(route.waypoints.len(), 2);
        assert_eq!(route.risk, RiskLevel::Medium);
        assert!(route.is_direct());
        assert!((route.distance_nm - 60.04).abs() < 0.1);
    }

    #[test]
    fn direct_route_across_antimeridian_is_continuous() {
        let route = direct_route(&port("Fiji", 178.0, -18.0), &port("Samoa", -171.0, -14.0), 16.0);
        assert_eq!(route.waypoints[0], Coordinate::new(178.0, -18.0));
        assert!((route.waypoints[1].lon - 189.0).abs() < 1e-9);
        assert!(route.distance_nm < 700.0, "got {}", route.distance_nm);
    }

    #[test]
    fn parallel_lanes_draw_the_travelled_edge() {
        let network = SeaNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "name": "A", "coordinate": [0.0, 0.0]},
                    {"id": "b", "name": "B", "coordinate": [2.0, 0.0]}
                ],
                "edges": [
                    {"from": "a", "to": "b", "distance_nm": 125.0, "risk": 3.0,
                     "geometry": [[0.0, 0.0], [1.0, 0.5], [2.0, 0.0]]},
                    {"from": "a", "to": "b", "distance_nm": 140.0,
                     "geometry": [[0.0, 0.0], [1.0, -0.8], [2.0, 0.0]]}
                ]
            }"#,
        )
        .expect("valid network");
        let graph = build_graph(network);
        let travelled = SearchPath {
            nodes: vec![0, 1],
            edges: vec![1],
        };

        let route = assemble_route(
            &graph,
            &travelled,
            &port("A", 0.0, 0.0),
            &port("B", 2.0, 0.0),
            CostPolicy::Safest,
            &AssemblyConfig::default(),
        )
        .expect("route");
        assert_eq!(route.waypoints[1], Coordinate::new(1.0, -0.8));
    }
}
