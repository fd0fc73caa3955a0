//! Directed weighted graph with incrementally maintained next-hop routes.

use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace};

use crate::domain::error::DomainError;

/// Handle of a node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Index);

/// Handle of an edge in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (idx, generation) = self.0.into_raw_parts();
        write!(f, "node#{}.{}", idx, generation)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (idx, generation) = self.0.into_raw_parts();
        write!(f, "edge#{}.{}", idx, generation)
    }
}

/// Directed edge `a -> b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: u32,
}

/// Shortest known way from `start` to `end`, leaving through `next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub start: NodeId,
    pub end: NodeId,
    pub next: NodeId,
    pub length: u32,
}

/// Graph node: its incident edges (both directions) and routing table.
#[derive(Debug, Default)]
pub struct Node {
    pub edges: Vec<EdgeId>,
    pub routes: HashMap<NodeId, Route>,
}

/// Arena-backed directed graph.
///
/// Every edge is registered on both endpoints. Each node keeps a routing
/// table keyed by destination, rebuilt backwards from the tail of every
/// newly inserted edge.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Arena<Node>,
    edges: Arena<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_node(&mut self) -> NodeId {
        NodeId(self.nodes.insert(Node::default()))
    }

    /// Creates the directed edge `a -> b` and refreshes routes of `a` and
    /// everything that can reach it.
    #[instrument(level = "debug", skip(self))]
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: u32) -> Result<EdgeId, DomainError> {
        for id in [a, b] {
            if !self.nodes.contains(id.0) {
                return Err(DomainError::UnknownNode(id.to_string()));
            }
        }

        let id = EdgeId(self.edges.insert(Edge { a, b, weight }));
        if let Some(node) = self.nodes.get_mut(a.0) {
            node.edges.push(id);
        }
        if a != b {
            if let Some(node) = self.nodes.get_mut(b.0) {
                node.edges.push(id);
            }
        }

        let mut traversed = HashSet::new();
        self.build(a, &mut traversed);

        Ok(id)
    }

    /// Creates edges `a -> b` and `b -> a`.
    pub fn add_edge_bidir(
        &mut self,
        a: NodeId,
        b: NodeId,
        weight: u32,
    ) -> Result<(EdgeId, EdgeId), DomainError> {
        let forward = self.add_edge(a, b, weight)?;
        let backward = self.add_edge(b, a, weight)?;
        Ok((forward, backward))
    }

    pub fn count_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn count_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Edges leaving `id`, in insertion order.
    pub fn outgoing(&self, id: NodeId) -> Vec<(EdgeId, Edge)> {
        self.incident(id, |edge| edge.a == id)
    }

    /// Edges entering `id`, in insertion order.
    pub fn incoming(&self, id: NodeId) -> Vec<(EdgeId, Edge)> {
        self.incident(id, |edge| edge.b == id)
    }

    fn incident(&self, id: NodeId, keep: impl Fn(&Edge) -> bool) -> Vec<(EdgeId, Edge)> {
        self.node(id)
            .map(|node| {
                node.edges
                    .iter()
                    .filter_map(|&eid| self.edge(eid).map(|edge| (eid, *edge)))
                    .filter(|(_, edge)| keep(edge))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Next node on the way from `a` to `b`, `None` if `b` is unreachable.
    #[instrument(level = "trace", skip(self))]
    pub fn route(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.node(a)?.routes.get(&b).map(|route| route.next)
    }

    /// Full hop sequence from `a` to `b`, both inclusive.
    pub fn path(&self, a: NodeId, b: NodeId) -> Option<Vec<NodeId>> {
        if a == b {
            return self.node(a).map(|_| vec![a]);
        }
        let mut path = vec![a];
        let mut current = a;
        while current != b {
            let next = self.route(current, b)?;
            if path.len() > self.count_nodes() {
                return None;
            }
            path.push(next);
            current = next;
        }
        Some(path)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    fn build(&mut self, a: NodeId, traversed: &mut HashSet<NodeId>) {
        if !traversed.insert(a) {
            return;
        }

        // forward: direct routes plus everything reachable through each successor
        for (_, edge) in self.outgoing(a) {
            let mut candidates = vec![Route {
                start: a,
                end: edge.b,
                next: edge.b,
                length: edge.weight,
            }];
            if let Some(succ) = self.node(edge.b) {
                candidates.extend(succ.routes.values().map(|route| Route {
                    start: a,
                    end: route.end,
                    next: edge.b,
                    length: route.length.saturating_add(edge.weight),
                }));
            }

            if let Some(node) = self.nodes.get_mut(a.0) {
                for candidate in candidates {
                    match node.routes.get(&candidate.end) {
                        Some(existing) if existing.length < candidate.length => {}
                        _ => {
                            trace!(
                                "route {} -> {} via {} ({})",
                                a,
                                candidate.end,
                                candidate.next,
                                candidate.length
                            );
                            node.routes.insert(candidate.end, candidate);
                        }
                    }
                }
            }
        }

        // backward: predecessors may now reach further
        for (_, edge) in self.incoming(a) {
            self.build(edge.a, traversed);
        }
    }
}
