use tracing::{debug, warn};

use crate::graph::SeaGraph;
use crate::heap::MinHeap;
use crate::network::{EdgeIndex, NodeIndex, SeaEdge};

/// Bounds applied to a single search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchLimits {
    /// Stop with "no path" after expanding this many nodes.
    pub max_expansions: Option<usize>,
}

/// Nodes visited by a search and the edges it travelled between them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPath {
    pub nodes: Vec<NodeIndex>,
    /// `edges[i]` joins `nodes[i]` and `nodes[i + 1]`.
    pub edges: Vec<EdgeIndex>,
}

impl SearchPath {
    /// Rebuild a path from a bare node sequence.
    ///
    /// Each hop takes the shortest edge between its nodes; returns `None` when
    /// two consecutive nodes are not adjacent.
    pub fn from_nodes(graph: &SeaGraph, nodes: &[NodeIndex]) -> Option<Self> {
        let edges = nodes
            .windows(2)
            .map(|pair| graph.edge_index_between(pair[0], pair[1]))
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            nodes: nodes.to_vec(),
            edges,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Find a minimum-distance route between `start` and `goal`.
pub fn find_route(graph: &SeaGraph, start: NodeIndex, goal: NodeIndex) -> Option<SearchPath> {
    if goal >= graph.node_count() {
        return None;
    }
    find_route_a_star(
        graph,
        start,
        goal,
        |edge| edge.distance_nm,
        distance_heuristic(graph, goal),
        &SearchLimits::default(),
    )
}

/// Great-circle distance from a node to `goal`, in nautical miles.
///
/// Indices outside the network estimate zero.
pub fn distance_heuristic(graph: &SeaGraph, goal: NodeIndex) -> impl Fn(NodeIndex) -> f64 + '_ {
    let target = graph.nodes().get(goal).map(|node| node.coordinate);
    move |node| match (target, graph.nodes().get(node)) {
        (Some(target), Some(node)) => node.coordinate.distance_nm(&target),
        _ => 0.0,
    }
}

/// Run A* with caller-supplied edge costs and heuristic.
///
/// Returns the path from `start` to `goal` inclusive, or `None` when the goal
/// is unreachable (or the expansion limit was hit). Edges whose cost is not a
/// finite non-negative number are treated as impassable.
pub fn find_route_a_star<C, H>(
    graph: &SeaGraph,
    start: NodeIndex,
    goal: NodeIndex,
    cost: C,
    heuristic: H,
    limits: &SearchLimits,
) -> Option<SearchPath>
where
    C: Fn(&SeaEdge) -> f64,
    H: Fn(NodeIndex) -> f64,
{
    let node_count = graph.node_count();
    if start >= node_count || goal >= node_count {
        return None;
    }
    if start == goal {
        return Some(SearchPath {
            nodes: vec![start],
            edges: Vec::new(),
        });
    }

    let mut g_score = vec![f64::INFINITY; node_count];
    // Predecessor node and the edge relaxed to reach each node.
    let mut parents: Vec<Option<(NodeIndex, EdgeIndex)>> = vec![None; node_count];
    let mut queue = MinHeap::with_capacity(node_count);
    let mut expansions = 0usize;

    g_score[start] = 0.0;
    queue.push((start, 0.0), heuristic(start));

    while let Some(((current, queued_g), _)) = queue.pop() {
        // Skip entries superseded by a later improvement.
        if queued_g > g_score[current] {
            continue;
        }
        if current == goal {
            break;
        }

        expansions += 1;
        if let Some(limit) = limits.max_expansions {
            if expansions > limit {
                warn!(
                    start = %graph.node(start).id,
                    goal = %graph.node(goal).id,
                    limit,
                    "search expansion limit reached; treating goal as unreachable"
                );
                return None;
            }
        }

        for adjacent in graph.neighbours(current) {
            let step = cost(graph.edge(adjacent.edge));
            if !step.is_finite() || step < 0.0 {
                continue;
            }
            let tentative = g_score[current] + step;
            if tentative < g_score[adjacent.neighbor] {
                g_score[adjacent.neighbor] = tentative;
                parents[adjacent.neighbor] = Some((current, adjacent.edge));
                queue.push(
                    (adjacent.neighbor, tentative),
                    tentative + heuristic(adjacent.neighbor),
                );
            }
        }
    }

    if g_score[goal].is_infinite() {
        debug!(
            start = %graph.node(start).id,
            goal = %graph.node(goal).id,
            "goal unreachable from start"
        );
        return None;
    }

    debug!(expansions, cost = g_score[goal], "search complete");
    Some(reconstruct_path(&parents, start, goal))
}

fn reconstruct_path(
    parents: &[Option<(NodeIndex, EdgeIndex)>],
    start: NodeIndex,
    goal: NodeIndex,
) -> SearchPath {
    let mut nodes = vec![goal];
    let mut edges = Vec::new();
    let mut current = goal;
    while current != start {
        let Some((parent, edge)) = parents[current] else {
            break;
        };
        nodes.push(parent);
        edges.push(edge);
        current = parent;
    }
    nodes.reverse();
    edges.reverse();
    SearchPath { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::network::SeaNetwork;

    fn line_graph() -> SeaGraph {
        let network = SeaNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "name": "A", "coordinate": [0.0, 0.0]},
                    {"id": "b", "name": "B", "coordinate": [1.0, 0.0]},
                    {"id": "c", "name": "C", "coordinate": [2.0, 0.0]},
                    {"id": "island", "name": "Island", "coordinate": [10.0, 10.0]}
                ],
                "edges": [
                    {"from": "a", "to": "b", "distance_nm": 61.0},
                    {"from": "b", "to": "c", "distance_nm": 61.0}
                ]
            }"#,
        )
        .expect("valid network");
        build_graph(network)
    }

    #[test]
    fn start_equals_goal_is_single_node_path() {
        let graph = line_graph();
        assert_eq!(find_route(&graph, 1, 1).map(|p| p.nodes), Some(vec![1]));
    }

    #[test]
    fn traverses_edges_against_declared_direction() {
        let graph = line_graph();
        let path = find_route(&graph, 2, 0).expect("connected");
        assert_eq!(path.nodes, vec![2, 1, 0]);
        assert_eq!(path.edges, vec![1, 0]);
    }

    #[test]
    fn disconnected_goal_is_no_path() {
        let graph = line_graph();
        assert_eq!(find_route(&graph, 0, 3), None);
    }

    #[test]
    fn out_of_range_indices_are_no_path() {
        let graph = line_graph();
        assert_eq!(find_route(&graph, 0, 42), None);
        assert_eq!(find_route(&graph, 42, 0), None);
        assert_eq!(distance_heuristic(&graph, 42)(0), 0.0);
    }

    #[test]
    fn records_the_parallel_edge_that_was_relaxed() {
        let network = SeaNetwork::from_json_str(
            r#"{
                "nodes": [
                    {"id": "a", "name": "A", "coordinate": [0.0, 0.0]},
                    {"id": "b", "name": "B", "coordinate": [1.0, 0.0]}
                ],
                "edges": [
                    {"from": "a", "to": "b", "distance_nm": 61.0, "risk": 4.0},
                    {"from": "a", "to": "b", "distance_nm": 90.0}
                ]
            }"#,
        )
        .expect("valid network");
        let graph = build_graph(network);

        let shortest = find_route(&graph, 0, 1).expect("connected");
        assert_eq!(shortest.edges, vec![0]);

        let clear = find_route_a_star(
            &graph,
            0,
            1,
            |edge| edge.distance_nm * edge.risk,
            |_| 0.0,
            &SearchLimits::default(),
        )
        .expect("connected");
        assert_eq!(clear.nodes, vec![0, 1]);
        assert_eq!(clear.edges, vec![1]);
    }

    #[test]
    fn path_from_nodes_requires_adjacency() {
        let graph = line_graph();
        let path = SearchPath::from_nodes(&graph, &[0, 1, 2]).expect("adjacent");
        assert_eq!(path.edges, vec![0, 1]);
        assert!(SearchPath::from_nodes(&graph, &[0, 2]).is_none());
    }

    #[test]
    fn expansion_limit_stops_search() {
        let graph = line_graph();
        let limits = SearchLimits {
            max_expansions: Some(1),
        };
        let path = find_route_a_star(
            &graph,
            0,
            2,
            |edge| edge.distance_nm,
            distance_heuristic(&graph, 2),
            &limits,
        );
        assert_eq!(path, None);
    }

    #[test]
    fn impassable_costs_block_edges() {
        let graph = line_graph();
        let path = find_route_a_star(
            &graph,
            0,
            2,
            |edge| if edge.from == 1 { f64::INFINITY } else { edge.distance_nm },
            |_| 0.0,
            &SearchLimits::default(),
        );
        assert_eq!(path, None);
    }
}
