//! Request-level orchestration: port resolution, cache, search and assembly.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assemble::{
    assemble_route, direct_route, AssemblyConfig, Route, DEFAULT_CRUISE_SPEED_KNOTS,
    DEFAULT_ENDPOINT_DEDUP_NM, DEFAULT_FALLBACK_SPEED_KNOTS,
};
use crate::cache::{CacheKey, CacheStats, RouteCache};
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{build_graph, SeaGraph};
use crate::network::{NodeIndex, SeaNetwork};
use crate::path::{find_route_a_star, SearchLimits};
use crate::policy::{CostPolicy, RouteOptions};
use crate::ports::{Port, PortCatalog};

/// Snapping distance above which the nearest graph node is reported as a coverage gap.
pub const DEFAULT_COVERAGE_WARNING_NM: f64 = 3_000.0;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

pub const DEFAULT_MAX_EXPANSIONS: usize = 10_000;

/// Engine tunables, loadable from JSON.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub endpoint_dedup_nm: f64,
    pub coverage_warning_nm: f64,
    pub cruise_speed_knots: f64,
    pub fallback_speed_knots: f64,
    /// Maximum cached requests; 0 disables caching.
    pub cache_capacity: usize,
    pub max_expansions: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint_dedup_nm: DEFAULT_ENDPOINT_DEDUP_NM,
            coverage_warning_nm: DEFAULT_COVERAGE_WARNING_NM,
            cruise_speed_knots: DEFAULT_CRUISE_SPEED_KNOTS,
            fallback_speed_knots: DEFAULT_FALLBACK_SPEED_KNOTS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_expansions: Some(DEFAULT_MAX_EXPANSIONS),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject values that would make distances or transit times meaningless.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("endpoint_dedup_nm", self.endpoint_dedup_nm),
            ("coverage_warning_nm", self.coverage_warning_nm),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be a non-negative number, got {value}"),
                });
            }
        }

        let positive = [
            ("cruise_speed_knots", self.cruise_speed_knots),
            ("fallback_speed_knots", self.fallback_speed_knots),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be positive, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn assembly(&self) -> AssemblyConfig {
        AssemblyConfig {
            endpoint_dedup_nm: self.endpoint_dedup_nm,
            cruise_speed_knots: self.cruise_speed_knots,
        }
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.max_expansions,
        }
    }
}

/// The graph node a coordinate snaps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedNode {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub distance_nm: f64,
    /// Snapping distance exceeded the coverage warning threshold.
    pub beyond_coverage: bool,
}

/// How a free-form coordinate is resolved before searching.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointResolution {
    pub coordinate: Coordinate,
    pub port: Port,
    pub port_distance_nm: f64,
    pub node: Option<SnappedNode>,
}

/// Maritime route planner over a fixed sea-lane graph and port catalog.
///
/// The graph and catalog are immutable and shared; the cache is the only
/// mutable state and is internally synchronized, so an engine can be shared
/// across threads behind an `Arc`.
#[derive(Debug)]
pub struct RouteEngine {
    graph: Arc<SeaGraph>,
    ports: Arc<PortCatalog>,
    config: EngineConfig,
    cache: RouteCache,
    searches: AtomicUsize,
}

impl RouteEngine {
    pub fn new(network: SeaNetwork, ports: PortCatalog, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if ports.is_empty() {
            return Err(Error::EmptyPortCatalog);
        }
        if network.is_empty() {
            warn!("sea-lane network has no nodes; every request will use the direct route");
        }

        let graph = build_graph(network);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            ports = ports.len(),
            cache_capacity = config.cache_capacity,
            "route engine ready"
        );

        Ok(Self {
            graph: Arc::new(graph),
            ports: Arc::new(ports),
            cache: RouteCache::new(config.cache_capacity),
            config,
            searches: AtomicUsize::new(0),
        })
    }

    /// Engine over the embedded network and port catalog with default tunables.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            SeaNetwork::embedded()?,
            PortCatalog::embedded()?,
            EngineConfig::default(),
        )
    }

    pub fn graph(&self) -> &SeaGraph {
        &self.graph
    }

    pub fn ports(&self) -> &PortCatalog {
        &self.ports
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of A* runs performed since construction.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::Relaxed)
    }

    /// Plan routes between two coordinates, rejecting invalid input.
    pub fn try_calculate_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        options: &RouteOptions,
    ) -> Result<Vec<Route>> {
        for coordinate in [origin, destination] {
            if !coordinate.is_valid() {
                return Err(Error::InvalidCoordinate {
                    lon: coordinate.lon,
                    lat: coordinate.lat,
                });
            }
        }
        Ok(self.calculate_routes(origin, destination, options))
    }

    /// Plan up to three distinct routes between two coordinates.
    ///
    /// Never returns an empty list: when the graph cannot connect the
    /// endpoints a direct great-circle route is returned instead. Out-of-range
    /// coordinates are wrapped and clamped rather than rejected.
    pub fn calculate_routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        options: &RouteOptions,
    ) -> Vec<Route> {
        let origin = origin.normalized();
        let destination = destination.normalized();
        let options = options.normalized();

        let key = CacheKey::new(&origin, &destination, &options);
        if let Some(routes) = self.cache.get(&key) {
            return routes.to_vec();
        }

        let (origin_port, destination_port) = self.resolve_ports(&origin, &destination);
        let routes = self.plan_between(origin_port, destination_port, &options);
        self.cache.put(key, routes).to_vec()
    }

    /// Plan routes between two catalog ports given by name.
    pub fn routes_between_ports(
        &self,
        origin: &str,
        destination: &str,
        options: &RouteOptions,
    ) -> Result<Vec<Route>> {
        let origin = self.ports.resolve_name(origin)?.coordinate;
        let destination = self.ports.resolve_name(destination)?.coordinate;
        Ok(self.calculate_routes(origin, destination, options))
    }

    /// Nearest ports for a request; the destination never resolves to the origin's port
    /// unless the catalog has only one entry.
    pub fn resolve_ports(&self, origin: &Coordinate, destination: &Coordinate) -> (&Port, &Port) {
        let origin_port = self.ports.nearest(origin, &[]);
        let destination_port = self
            .ports
            .nearest(destination, &[origin_port.name.as_str()]);
        (origin_port, destination_port)
    }

    /// Describe how `coordinate` would be resolved to a port and graph node.
    pub fn resolve_endpoint(&self, coordinate: Coordinate) -> EndpointResolution {
        let coordinate = coordinate.normalized();
        let port = self.ports.nearest(&coordinate, &[]);
        let node = self
            .graph
            .nearest_node(&coordinate, self.config.coverage_warning_nm)
            .map(|(index, distance_nm)| {
                let node = self.graph.node(index);
                SnappedNode {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    coordinate: node.coordinate,
                    distance_nm,
                    beyond_coverage: distance_nm > self.config.coverage_warning_nm,
                }
            });

        EndpointResolution {
            coordinate,
            port: port.clone(),
            port_distance_nm: port.coordinate.distance_nm(&coordinate),
            node,
        }
    }

    fn snap(&self, port: &Port) -> Option<NodeIndex> {
        self.graph
            .nearest_node(&port.coordinate, self.config.coverage_warning_nm)
            .map(|(index, _)| index)
    }

    fn plan_between(&self, origin: &Port, destination: &Port, options: &RouteOptions) -> Vec<Route> {
        let (Some(start), Some(goal)) = (self.snap(origin), self.snap(destination)) else {
            warn!(
                origin = %origin.name,
                destination = %destination.name,
                "could not snap ports to the sea-lane network; using direct route"
            );
            return vec![direct_route(origin, destination, self.config.fallback_speed_knots)];
        };

        let graph = self.graph.as_ref();
        let limits = self.config.search_limits();
        let assembly = self.config.assembly();
        let mut paths: Vec<Vec<NodeIndex>> = Vec::new();
        let mut routes = Vec::new();

        for policy in CostPolicy::ALL {
            self.searches.fetch_add(1, Ordering::Relaxed);
            let found = find_route_a_star(
                graph,
                start,
                goal,
                |edge| policy.edge_cost(edge, options),
                |node| policy.heuristic(graph, node, goal),
                &limits,
            );

            let Some(path) = found else {
                debug!(policy = %policy, "no path under policy");
                continue;
            };
            if paths.contains(&path.nodes) {
                debug!(policy = %policy, "policy converged on an existing route");
                continue;
            }

            if let Some(route) =
                assemble_route(graph, &path, origin, destination, policy, &assembly)
            {
                debug!(
                    policy = %policy,
                    distance_nm = route.distance_nm,
                    risk = %route.risk,
                    "assembled route"
                );
                routes.push(route);
            }
            paths.push(path.nodes);
        }

        if routes.is_empty() {
            warn!(
                origin = %origin.name,
                destination = %destination.name,
                "no sea-lane path under any policy; using direct route"
            );
            routes.push(direct_route(
                origin,
                destination,
                self.config.fallback_speed_knots,
            ));
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: EngineConfig) -> RouteEngine {
        let network = SeaNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "name": "A", "coordinate": [0.0, 0.0]},
                    {"id": "b", "name": "B", "coordinate": [1.0, 0.0]},
                    {"id": "far", "name": "Far", "coordinate": [40.0, 40.0]}
                ],
                "edges": [
                    {"from": "a", "to": "b", "distance_nm": 61.0}
                ]
            }"#,
        )
        .expect("valid network");
        let ports = PortCatalog::new(vec![
            Port::new("Port A", "", "", Coordinate::new(0.0, 0.1)),
            Port::new("Port B", "", "", Coordinate::new(1.0, 0.1)),
            Port::new("Port Far", "", "", Coordinate::new(40.0, 40.1)),
        ])
        .expect("ports");
        RouteEngine::new(network, ports, config).expect("engine")
    }

    #[test]
    fn converging_policies_emit_one_route() {
        let engine = engine(EngineConfig::default());
        let routes = engine.calculate_routes(
            Coordinate::new(0.0, 0.1),
            Coordinate::new(1.0, 0.1),
            &RouteOptions::default(),
        );
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].id, "fastest");
        assert_eq!(engine.search_count(), 3);
    }

    #[test]
    fn disconnected_endpoints_fall_back_to_direct_route() {
        let engine = engine(EngineConfig::default());
        let routes = engine.calculate_routes(
            Coordinate::new(0.0, 0.1),
            Coordinate::new(40.0, 40.1),
            &RouteOptions::default(),
        );
        assert_eq!(routes.len(), 1);
        assert!(routes[0].is_direct());
        assert_eq!(routes[0].waypoint_names[1].as_deref(), Some("Port Far"));
    }

    #[test]
    fn invalid_coordinates_are_rejected_by_checked_entry() {
        let engine = engine(EngineConfig::default());
        let err = engine
            .try_calculate_routes(
                Coordinate::new(200.0, 0.0),
                Coordinate::new(0.0, 0.0),
                &RouteOptions::default(),
            )
            .expect_err("out of range");
        assert!(matches!(err, Error::InvalidCoordinate { lon, .. } if lon == 200.0));
    }

    #[test]
    fn destination_never_resolves_to_origin_port() {
        let engine = engine(EngineConfig::default());
        let here = Coordinate::new(0.0, 0.1);
        let (origin, destination) = engine.resolve_ports(&here, &here);
        assert_eq!(origin.name, "Port A");
        assert_eq!(destination.name, "Port B");
    }

    #[test]
    fn disabled_cache_searches_every_time() {
        let engine = engine(EngineConfig {
            cache_capacity: 0,
            ..EngineConfig::default()
        });
        let options = RouteOptions::default();
        let a = Coordinate::new(0.0, 0.1);
        let b = Coordinate::new(1.0, 0.1);
        engine.calculate_routes(a, b, &options);
        engine.calculate_routes(a, b, &options);
        assert_eq!(engine.search_count(), 6);
        assert_eq!(engine.cache_stats().entries, 0);
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = EngineConfig::from_json_str(r#"{"cache_capacity": 8}"#).expect("config");
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.endpoint_dedup_nm, 30.0);
        assert_eq!(config.max_expansions, Some(10_000));
    }

    #[test]
    fn config_rejects_non_positive_speed() {
        let err = EngineConfig::from_json_str(r#"{"cruise_speed_knots": 0}"#)
            .expect_err("zero speed");
        assert!(err.to_string().contains("cruise_speed_knots"));
    }

    #[test]
    fn resolve_endpoint_flags_coverage_gaps() {
        let engine = engine(EngineConfig {
            coverage_warning_nm: 100.0,
            ..EngineConfig::default()
        });
        let resolution = engine.resolve_endpoint(Coordinate::new(20.0, 20.0));
        let node = resolution.node.expect("non-empty graph");
        assert!(node.beyond_coverage);
    }
}
