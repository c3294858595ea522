//! Sea-lane route planning library.
//!
//! This crate loads a sea-lane network and port catalog, builds the adjacency
//! index, and plans fastest, safest and economical shipping routes between
//! arbitrary coordinates. Higher-level consumers (the CLI, map front ends)
//! should only depend on the items exported here instead of reimplementing
//! behavior.
//!
//! ```no_run
//! use sealane_lib::{Coordinate, RouteEngine, RouteOptions};
//!
//! let engine = RouteEngine::with_defaults()?;
//! let routes = engine.calculate_routes(
//!     Coordinate::new(121.49, 31.23),
//!     Coordinate::new(4.05, 51.95),
//!     &RouteOptions::default().avoiding_high_risk(),
//! );
//! for route in &routes {
//!     println!("{}: {:.0} nm, {} risk", route.name, route.distance_nm, route.risk);
//! }
//! # Ok::<(), sealane_lib::Error>(())
//! ```

pub mod assemble;
pub mod cache;
pub mod engine;
pub mod error;
pub mod geo;
pub mod graph;
pub mod heap;
pub mod network;
pub mod output;
pub mod path;
pub mod policy;
pub mod ports;

pub use assemble::{assemble_route, classify_risk, direct_route, estimate_days, Route, RiskLevel};
pub use cache::{CacheKey, CacheStats, RouteCache};
pub use engine::{EndpointResolution, EngineConfig, RouteEngine, SnappedNode};
pub use error::{Error, Result};
pub use geo::{polyline_length_nm, split_at_antimeridian, unwrap_longitudes, Coordinate};
pub use graph::{build_graph, SeaGraph};
pub use heap::MinHeap;
pub use network::{NetworkDocument, NodeIndex, SeaEdge, SeaNetwork, SeaNode};
pub use output::{RouteEndpoint, RouteRenderMode, RouteSummary};
pub use path::{find_route, find_route_a_star, SearchLimits, SearchPath};
pub use policy::{CostPolicy, RouteOptions};
pub use ports::{Port, PortCatalog};
