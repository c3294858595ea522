use std::ops::Deref;

use crate::network::{EdgeIndex, NodeIndex, SeaEdge, SeaNetwork};

/// Entry in a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacent {
    pub neighbor: NodeIndex,
    pub edge: EdgeIndex,
}

/// Sea-lane network together with its precomputed adjacency index.
///
/// The index is derived by replaying the edge table once; each undirected
/// edge appears in the lists of both of its endpoints. The graph is read-only
/// after construction and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SeaGraph {
    network: SeaNetwork,
    adjacency: Vec<Vec<Adjacent>>,
}

impl SeaGraph {
    pub fn network(&self) -> &SeaNetwork {
        &self.network
    }

    /// Neighbours of `node` together with the owning edge.
    pub fn neighbours(&self, node: NodeIndex) -> &[Adjacent] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest edge connecting `a` and `b`, looked up through the adjacency index.
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&SeaEdge> {
        self.edge_index_between(a, b)
            .map(|index| self.network.edge(index))
    }

    /// Index of the shortest edge connecting `a` and `b`.
    pub fn edge_index_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.neighbours(a)
            .iter()
            .filter(|adjacent| adjacent.neighbor == b)
            .min_by(|x, y| {
                let x = self.network.edge(x.edge).distance_nm;
                let y = self.network.edge(y.edge).distance_nm;
                x.total_cmp(&y)
            })
            .map(|adjacent| adjacent.edge)
    }
}

impl Deref for SeaGraph {
    type Target = SeaNetwork;

    fn deref(&self) -> &Self::Target {
        &self.network
    }
}

/// Build the routing graph for a network.
pub fn build_graph(network: SeaNetwork) -> SeaGraph {
    let adjacency = build_adjacency(&network);
    SeaGraph { network, adjacency }
}

fn build_adjacency(network: &SeaNetwork) -> Vec<Vec<Adjacent>> {
    let mut adjacency: Vec<Vec<Adjacent>> = vec![Vec::new(); network.node_count()];
    for (edge_index, edge) in network.edges().iter().enumerate() {
        adjacency[edge.from].push(Adjacent {
            neighbor: edge.to,
            edge: edge_index,
        });
        adjacency[edge.to].push(Adjacent {
            neighbor: edge.from,
            edge: edge_index,
        });
    }
    adjacency
}
