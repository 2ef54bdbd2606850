//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing links.
//! Given a `NodeId n`, its outgoing links occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All link arrays are sorted by source node and indexed by `EdgeId`, so a
//! node's outgoing links are a contiguous scan in Dijkstra's inner loop.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps projected `(x, y)` coordinates to the nearest
//! `NodeId`.  The baseline estimator snaps every leg's start and end point
//! through it.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use lv_core::{Coord, EdgeId, NodeId, TransportMode};

// ── ModeSet ───────────────────────────────────────────────────────────────────

/// Set of [`TransportMode`]s allowed on a link, packed into one byte.
///
/// Labels outside the closed mode set (e.g. `bus`, `rail`) are dropped on
/// insert; none of them is ever routed on the road graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSet(u8);

impl ModeSet {
    pub const EMPTY: ModeSet = ModeSet(0);

    #[inline]
    fn bit(mode: TransportMode) -> u8 {
        1 << (mode as u8)
    }

    pub fn of(modes: &[TransportMode]) -> Self {
        modes.iter().fold(Self::EMPTY, |s, &m| s.with(m))
    }

    /// Parse a `modes` attribute such as `"car,ride,freight"` or `"car|bus"`.
    pub fn parse(labels: &str) -> Self {
        labels
            .split([',', '|'])
            .filter_map(TransportMode::from_label)
            .fold(Self::EMPTY, |s, m| s.with(m))
    }

    #[must_use]
    pub fn with(self, mode: TransportMode) -> Self {
        ModeSet(self.0 | Self::bit(mode))
    }

    #[inline]
    pub fn contains(self, mode: TransportMode) -> bool {
        self.0 & Self::bit(mode) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = TransportMode> {
        TransportMode::ALL.into_iter().filter(move |&m| self.contains(m))
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared euclidean distance in projected metres.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// Do not construct directly; use [`RoadNetworkBuilder`] or
/// [`load_network_csv`](crate::load_network_csv).
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Projected position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coord>,

    /// External node identifier (as written in the network file).
    pub node_label: Vec<String>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing links of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Link data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,

    pub edge_to: Vec<NodeId>,

    /// Length in metres.
    pub edge_length_m: Vec<f64>,

    /// Free-flow speed in m/s.
    pub edge_freespeed_mps: Vec<f64>,

    pub edge_modes: Vec<ModeSet>,

    /// External link identifier.
    pub edge_label: Vec<String>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes.  Every network-routed baseline falls back.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Free-flow traversal time of `edge` in seconds.
    #[inline]
    pub fn free_flow_secs(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()] / self.edge_freespeed_mps[edge.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `pos`.  `None` only for an empty network.
    pub fn nearest_node(&self, pos: Coord) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&[pos.x, pos.y]).map(|e| e.id)
    }

    /// Up to `k` nearest nodes, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Coord, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// `build()` sorts links by source node, constructs the CSR arrays, and
/// bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use lv_core::{Coord, TransportMode};
/// use lv_network::{ModeSet, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("a", Coord::new(0.0, 0.0));
/// let c = b.add_node("c", Coord::new(1_000.0, 0.0));
/// b.add_road("ac", a, c, 1_000.0, 13.89, ModeSet::of(&[TransportMode::Car]));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2);
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<Coord>,
    labels:    Vec<String>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    label:     String,
    from:      NodeId,
    to:        NodeId,
    length_m:  f64,
    speed_mps: f64,
    modes:     ModeSet,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), labels: Vec::new(), raw_edges: Vec::new() }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            labels:    Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, label: impl Into<String>, pos: Coord) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.labels.push(label.into());
        id
    }

    /// Add a **directed** link.
    ///
    /// Links with a non-positive speed can never be traversed and are kept
    /// out of the graph.
    pub fn add_directed_edge(
        &mut self,
        label:     impl Into<String>,
        from:      NodeId,
        to:        NodeId,
        length_m:  f64,
        speed_mps: f64,
        modes:     ModeSet,
    ) {
        if speed_mps.is_nan() || speed_mps <= 0.0 {
            return;
        }
        self.raw_edges.push(RawEdge {
            label: label.into(),
            from,
            to,
            length_m: length_m.max(0.0),
            speed_mps,
            modes,
        });
    }

    /// Add links in both directions sharing one label.
    pub fn add_road(
        &mut self,
        label:     &str,
        a:         NodeId,
        b:         NodeId,
        length_m:  f64,
        speed_mps: f64,
        modes:     ModeSet,
    ) {
        self.add_directed_edge(label, a, b, length_m, speed_mps, modes);
        self.add_directed_edge(label, b, a, length_m, speed_mps, modes);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:          Vec<NodeId>  = raw.iter().map(|e| e.from).collect();
        let edge_to:            Vec<NodeId>  = raw.iter().map(|e| e.to).collect();
        let edge_length_m:      Vec<f64>     = raw.iter().map(|e| e.length_m).collect();
        let edge_freespeed_mps: Vec<f64>     = raw.iter().map(|e| e.speed_mps).collect();
        let edge_modes:         Vec<ModeSet> = raw.iter().map(|e| e.modes).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let edge_label: Vec<String> = raw.into_iter().map(|e| e.label).collect();

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.x, pos.y], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_label: self.labels,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_freespeed_mps,
            edge_modes,
            edge_label,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
