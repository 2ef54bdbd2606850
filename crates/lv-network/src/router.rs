//! Routing trait and default Dijkstra implementation.
//!
//! # Cost functions
//!
//! The caller supplies the link cost.  A cost function returns `None` for a
//! link that must not be traversed, which is how mode restrictions are
//! expressed.  [`free_flow_cost`] is the cost the baseline estimator uses:
//! `length / freespeed` on links that allow the mode.
//!
//! Costs are `f64` seconds (or whatever unit the cost function yields);
//! [`Route::total_cost`] is their sum along the path.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use lv_core::{EdgeId, NodeId, TransportMode};

use crate::network::RoadNetwork;
use crate::NetworkError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered list of links and the accumulated cost.
#[derive(Debug, Clone)]
pub struct Route {
    pub edges:      Vec<EdgeId>,
    pub total_cost: f64,
}

impl Route {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Summed link lengths in metres.
    pub fn length_m(&self, network: &RoadNetwork) -> f64 {
        self.edges.iter().map(|e| network.edge_length_m[e.index()]).sum()
    }
}

/// Link cost callback.  `None` = not traversable.
pub type CostFn<'a> = dyn Fn(&RoadNetwork, EdgeId) -> Option<f64> + 'a;

/// Free-flow travel time for `mode`: `length / freespeed` on links whose
/// allowed-mode set contains `mode`, impassable elsewhere.
pub fn free_flow_cost(mode: TransportMode) -> impl Fn(&RoadNetwork, EdgeId) -> Option<f64> {
    move |net, edge| {
        if net.edge_modes[edge.index()].contains(mode) {
            Some(net.free_flow_secs(edge))
        } else {
            None
        }
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync`: the `parallel` feature of the
/// baseline crate shares one router across Rayon workers.
pub trait Router: Send + Sync {
    /// Least-cost path from `from` to `to`.
    ///
    /// `from == to` yields an empty route, not an error.
    fn shortest_path(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cost:    &CostFn<'_>,
    ) -> Result<Route, NetworkError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        cost:    &CostFn<'_>,
    ) -> Result<Route, NetworkError> {
        dijkstra(network, from, to, cost)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap key: non-negative finite costs ordered by `total_cmp`.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra(
    network: &RoadNetwork,
    from:    NodeId,
    to:      NodeId,
    cost:    &CostFn<'_>,
) -> Result<Route, NetworkError> {
    let n = network.node_count();
    if from.index() >= n || to.index() >= n {
        return Err(NetworkError::NoRoute { from, to });
    }
    if from == to {
        return Ok(Route { edges: vec![], total_cost: 0.0 });
    }

    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(d), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, to, d));
        }
        if d > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let Some(c) = cost(network, edge) else { continue };
            if !c.is_finite() || c < 0.0 {
                continue;
            }
            let neighbor = network.edge_to[edge.index()];
            let next = d + c;
            if next < dist[neighbor.index()] {
                dist[neighbor.index()] = next;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(next), neighbor)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], to: NodeId, total_cost: f64) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, total_cost }
}
