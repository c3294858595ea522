//! Sea-lane network model and loader.
//!
//! The network is described externally as JSON (nodes, edges, risk tiers) and
//! parsed once into contiguous node and edge arrays. Edges refer to nodes by
//! [`NodeIndex`] after loading, so the string identifiers are only consulted
//! at the boundary. The loader rejects dangling edge endpoints and other
//! structurally invalid records so that nothing downstream has to re-check
//! them.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Index of a node inside [`SeaNetwork::nodes`].
pub type NodeIndex = usize;

/// Index of an edge inside [`SeaNetwork::edges`].
pub type EdgeIndex = usize;

const EMBEDDED_NETWORK_JSON: &str = include_str!("../data/sea_lanes.json");

static EMBEDDED_NETWORK: OnceCell<SeaNetwork> = OnceCell::new();

/// Serialized form of a network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Serialized form of a network edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub distance_nm: f64,
    #[serde(default = "default_risk")]
    pub risk: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Vec<Coordinate>>,
}

fn default_risk() -> f64 {
    1.0
}

/// Node identifiers whose presence in a path drives route risk classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskTiers {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
}

/// Top-level JSON document describing a sea-lane network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub risk_tiers: RiskTiers,
}

/// Immutable waypoint of the shipping-lane graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SeaNode {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Undirected connection between two nodes.
///
/// `geometry`, when present, always starts at the `from` node's coordinate and
/// ends at the `to` node's coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct SeaEdge {
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub distance_nm: f64,
    pub risk: f64,
    pub geometry: Option<Vec<Coordinate>>,
}

impl SeaEdge {
    /// The endpoint opposite to `node`, or `None` if `node` does not touch this edge.
    pub fn opposite(&self, node: NodeIndex) -> Option<NodeIndex> {
        if node == self.from {
            Some(self.to)
        } else if node == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    /// Geometry ordered for travel starting at `departure`.
    ///
    /// Returns `None` when the edge has no detailed geometry.
    pub fn geometry_from(&self, departure: NodeIndex) -> Option<Vec<Coordinate>> {
        let geometry = self.geometry.as_ref()?;
        if departure == self.to && self.to != self.from {
            Some(geometry.iter().rev().copied().collect())
        } else {
            Some(geometry.clone())
        }
    }
}

/// In-memory sea-lane network.
#[derive(Debug, Clone, Default)]
pub struct SeaNetwork {
    nodes: Vec<SeaNode>,
    edges: Vec<SeaEdge>,
    index_by_id: HashMap<String, NodeIndex>,
    high_risk: HashSet<NodeIndex>,
    medium_risk: HashSet<NodeIndex>,
}

impl SeaNetwork {
    /// Parse and validate a network from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: NetworkDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Parse and validate a network from any reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: NetworkDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Load a network JSON file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::NetworkLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let network = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            nodes = network.node_count(),
            edges = network.edge_count(),
            "loaded sea-lane network"
        );
        Ok(network)
    }

    /// The network compiled into the library.
    ///
    /// Parsed on first use and cloned for each caller afterwards.
    pub fn embedded() -> Result<Self> {
        EMBEDDED_NETWORK
            .get_or_try_init(|| Self::from_json_str(EMBEDDED_NETWORK_JSON))
            .cloned()
    }

    /// Validate a decoded document and resolve identifiers to indices.
    pub fn from_document(document: NetworkDocument) -> Result<Self> {
        let mut nodes = Vec::with_capacity(document.nodes.len());
        let mut index_by_id = HashMap::with_capacity(document.nodes.len());

        for record in document.nodes {
            if !record.coordinate.is_valid() {
                return Err(Error::InvalidCoordinate {
                    lon: record.coordinate.lon,
                    lat: record.coordinate.lat,
                });
            }
            if index_by_id.contains_key(&record.id) {
                return Err(Error::DuplicateNode { id: record.id });
            }
            index_by_id.insert(record.id.clone(), nodes.len());
            nodes.push(SeaNode {
                id: record.id,
                name: record.name,
                coordinate: record.coordinate,
            });
        }

        let mut edges = Vec::with_capacity(document.edges.len());
        for record in document.edges {
            edges.push(resolve_edge(&nodes, &index_by_id, record)?);
        }

        let high_risk = resolve_tier(&index_by_id, "high", &document.risk_tiers.high)?;
        let medium_risk = resolve_tier(&index_by_id, "medium", &document.risk_tiers.medium)?;

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            high_risk = high_risk.len(),
            medium_risk = medium_risk.len(),
            "validated sea-lane network"
        );

        Ok(Self {
            nodes,
            edges,
            index_by_id,
            high_risk,
            medium_risk,
        })
    }

    pub fn nodes(&self) -> &[SeaNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SeaEdge] {
        &self.edges
    }

    pub fn node(&self, index: NodeIndex) -> &SeaNode {
        &self.nodes[index]
    }

    pub fn edge(&self, index: EdgeIndex) -> &SeaEdge {
        &self.edges[index]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Lookup a node index by its identifier.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index_by_id.get(id).copied()
    }

    pub fn is_high_risk(&self, node: NodeIndex) -> bool {
        self.high_risk.contains(&node)
    }

    pub fn is_medium_risk(&self, node: NodeIndex) -> bool {
        self.medium_risk.contains(&node)
    }

    /// Nearest node to `coordinate` by great-circle distance.
    ///
    /// Emits a warning when the closest node is farther than
    /// `coverage_warning_nm`; the node is still returned. `None` only when the
    /// network has no nodes.
    pub fn nearest_node(
        &self,
        coordinate: &Coordinate,
        coverage_warning_nm: f64,
    ) -> Option<(NodeIndex, f64)> {
        let nearest = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (index, node.coordinate.distance_nm(coordinate)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        if nearest.1 > coverage_warning_nm {
            warn!(
                coordinate = %coordinate,
                node = %self.nodes[nearest.0].id,
                distance_nm = nearest.1,
                threshold_nm = coverage_warning_nm,
                "nearest sea node is beyond the coverage threshold; the network may have a gap here"
            );
        }

        Some(nearest)
    }
}

fn resolve_edge(
    nodes: &[SeaNode],
    index_by_id: &HashMap<String, NodeIndex>,
    record: EdgeRecord,
) -> Result<SeaEdge> {
    let lookup = |id: &str| {
        index_by_id
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownEdgeEndpoint {
                from: record.from.clone(),
                to: record.to.clone(),
                missing: id.to_string(),
            })
    };
    let from = lookup(&record.from)?;
    let to = lookup(&record.to)?;

    let invalid = |reason: String| Error::InvalidEdge {
        from: record.from.clone(),
        to: record.to.clone(),
        reason,
    };

    if from == to {
        return Err(invalid("edge connects a node to itself".to_string()));
    }
    if !record.distance_nm.is_finite() || record.distance_nm <= 0.0 {
        return Err(invalid(format!(
            "distance must be positive, got {}",
            record.distance_nm
        )));
    }
    if !record.risk.is_finite() || record.risk < 1.0 {
        return Err(invalid(format!(
            "risk multiplier must be at least 1.0, got {}",
            record.risk
        )));
    }

    let start = nodes[from].coordinate;
    let end = nodes[to].coordinate;

    let chord = start.distance_nm(&end);
    if record.distance_nm < chord * 0.99 {
        warn!(
            from = %record.from,
            to = %record.to,
            distance_nm = record.distance_nm,
            great_circle_nm = chord,
            "edge distance is shorter than the great-circle chord; distance heuristic may overestimate"
        );
    }

    let geometry = match record.geometry {
        Some(points) => {
            if points.len() < 2 {
                return Err(invalid(format!(
                    "geometry needs at least 2 points, got {}",
                    points.len()
                )));
            }
            if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
                return Err(Error::InvalidCoordinate {
                    lon: bad.lon,
                    lat: bad.lat,
                });
            }
            Some(anchor_geometry(points, start, end))
        }
        None => None,
    };

    Ok(SeaEdge {
        from,
        to,
        distance_nm: record.distance_nm,
        risk: record.risk,
        geometry,
    })
}

/// Make geometry begin and end exactly on the edge's node coordinates.
fn anchor_geometry(mut points: Vec<Coordinate>, start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
    if points.first().is_some_and(|first| !first.approx_eq(&start)) {
        points.insert(0, start);
    }
    if points.last().is_some_and(|last| !last.approx_eq(&end)) {
        points.push(end);
    }
    points
}

fn resolve_tier(
    index_by_id: &HashMap<String, NodeIndex>,
    tier: &'static str,
    ids: &[String],
) -> Result<HashSet<NodeIndex>> {
    ids.iter()
        .map(|id| {
            index_by_id
                .get(id)
                .copied()
                .ok_or_else(|| Error::UnknownRiskNode {
                    tier,
                    id: id.clone(),
                })
        })
        .collect()
}
