//! CSV network loader.
//!
//! A plain-text stand-in for the simulation's network file, one CSV per
//! entity.  Links are directed; a two-way street is two rows.
//!
//! ```csv
//! id,x,y
//! n1,4480000.0,5330000.0
//! n2,4480500.0,5330000.0
//! ```
//!
//! ```csv
//! id,from,to,length,freespeed,modes
//! l1,n1,n2,500.0,13.89,"car,ride,freight"
//! l2,n2,n1,500.0,13.89,car|ride
//! ```
//!
//! `modes` may separate labels with `,` (quoted field) or `|`.  Labels
//! outside the known mode set are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lv_core::{Coord, NodeId};

use crate::network::{ModeSet, RoadNetwork, RoadNetworkBuilder};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id: String,
    x:  f64,
    y:  f64,
}

#[derive(Deserialize)]
struct LinkRecord {
    id:        String,
    from:      String,
    to:        String,
    length:    f64,
    freespeed: f64,
    modes:     String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from `nodes.csv` and `links.csv`.
pub fn load_network_csv(nodes: &Path, links: &Path) -> NetworkResult<RoadNetwork> {
    let nodes_file = std::fs::File::open(nodes)?;
    let links_file = std::fs::File::open(links)?;
    let net = load_network_readers(nodes_file, links_file)?;
    log::info!(
        "loaded network: {} nodes, {} links ({})",
        net.node_count(),
        net.edge_count(),
        links.display()
    );
    Ok(net)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_readers<N: Read, L: Read>(nodes: N, links: L) -> NetworkResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::new();
    let mut by_label: HashMap<String, NodeId> = HashMap::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(nodes);
    for result in rdr.deserialize::<NodeRecord>() {
        let row = result?;
        let pos = Coord::new(row.x, row.y);
        if !pos.is_finite() {
            return Err(NetworkError::Parse(format!("node `{}` has non-finite coordinates", row.id)));
        }
        if by_label.contains_key(&row.id) {
            return Err(NetworkError::DuplicateNode(row.id));
        }
        let id = b.add_node(row.id.clone(), pos);
        by_label.insert(row.id, id);
    }

    // ── Links ─────────────────────────────────────────────────────────────
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(links);
    let mut impassable = 0usize;
    for result in rdr.deserialize::<LinkRecord>() {
        let row = result?;
        let lookup = |label: &str| {
            by_label.get(label).copied().ok_or_else(|| NetworkError::UnknownNode {
                link: row.id.clone(),
                node: label.to_owned(),
            })
        };
        let from = lookup(&row.from)?;
        let to   = lookup(&row.to)?;
        if row.freespeed <= 0.0 || !row.freespeed.is_finite() {
            impassable += 1;
        }
        b.add_directed_edge(row.id, from, to, row.length, row.freespeed, ModeSet::parse(&row.modes));
    }
    if impassable > 0 {
        log::warn!("{impassable} links without a positive freespeed were left out of the graph");
    }

    Ok(b.build())
}
