//! Shared fixtures for integration tests.

use sealane_lib::{Coordinate, EngineConfig, Port, PortCatalog, RouteEngine, SeaNetwork};

/// Four nodes with two candidate paths between `west` and `east`.
///
/// The northern path is shorter but crosses a hazardous lane; the southern
/// path is longer and clear.
#[allow(dead_code)]
pub const DIAMOND_JSON: &str = r#"{
    "nodes": [
        {"id": "west", "name": "West Point", "coordinate": [0.0, 0.0]},
        {"id": "north", "name": "North Passage", "coordinate": [1.0, 0.5]},
        {"id": "south", "name": "South Passage", "coordinate": [1.0, -0.5]},
        {"id": "east", "name": "East Point", "coordinate": [2.0, 0.0]}
    ],
    "edges": [
        {"from": "west", "to": "north", "distance_nm": 70.0, "risk": 3.0},
        {"from": "north", "to": "east", "distance_nm": 70.0},
        {"from": "west", "to": "south", "distance_nm": 80.0},
        {"from": "east", "to": "south", "distance_nm": 80.0,
         "geometry": [[2.0, 0.0], [1.6, -0.45], [1.0, -0.5]]}
    ],
    "risk_tiers": {"high": ["north"]}
}"#;

#[allow(dead_code)]
pub fn diamond_network() -> SeaNetwork {
    SeaNetwork::from_json_str(DIAMOND_JSON).expect("diamond network is valid")
}

#[allow(dead_code)]
pub fn diamond_ports() -> PortCatalog {
    PortCatalog::new(vec![
        Port::new("Westport", "", "", Coordinate::new(-1.0, 0.0)),
        Port::new("Eastport", "", "", Coordinate::new(2.0, 0.1)),
    ])
    .expect("ports are valid")
}

#[allow(dead_code)]
pub fn diamond_engine() -> RouteEngine {
    RouteEngine::new(diamond_network(), diamond_ports(), EngineConfig::default())
        .expect("engine builds")
}

#[allow(dead_code)]
pub fn default_engine() -> RouteEngine {
    RouteEngine::with_defaults().expect("embedded data loads")
}
