use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the sea-lane library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The port catalog contained no entries. Routing cannot snap endpoints without ports.
    #[error("port catalog is empty; at least one port is required")]
    EmptyPortCatalog,

    /// Raised when two nodes in the sea-lane network share an identifier.
    #[error("duplicate sea node identifier: {id}")]
    DuplicateNode { id: String },

    /// Raised when an edge references a node that is not part of the network.
    #[error("edge {from} -> {to} references unknown node {missing}")]
    UnknownEdgeEndpoint {
        from: String,
        to: String,
        missing: String,
    },

    /// Raised when an edge carries values that cannot be routed over.
    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from: String,
        to: String,
        reason: String,
    },

    /// Raised when a risk tier lists a node that does not exist.
    #[error("risk tier {tier} references unknown node {id}")]
    UnknownRiskNode { tier: &'static str, id: String },

    /// Raised when a coordinate is not a finite longitude/latitude pair.
    #[error("invalid coordinate ({lon}, {lat}); expected longitude in [-180, 180] and latitude in [-90, 90]")]
    InvalidCoordinate { lon: f64, lat: f64 },

    /// Raised when a port name could not be found in the catalog.
    #[error("unknown port name: {name}{}", format_suggestions(.suggestions))]
    UnknownPort {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the port catalog CSV is structurally invalid.
    #[error("invalid port catalog: {message}")]
    PortCatalog { message: String },

    /// Raised when engine tunables are out of range.
    #[error("invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a summary is requested for an empty route list.
    #[error("route list is empty")]
    EmptyRouteList,

    /// Raised when a network file could not be read.
    #[error("failed to load sea-lane network from {path}: {source}")]
    NetworkLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON decoding errors in the network or engine configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
