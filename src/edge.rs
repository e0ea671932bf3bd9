//! Edge derivation: graph links become at most one undirected renderable
//! edge per unordered pair, with per-space visibility policies.

use crate::graph::NodeGraph;
use crate::satellite::Satellite;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Coordinate space an edge list is derived for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeSpace {
    /// Satellites on the sphere; edges render as arcs. An edge is visible
    /// only when both endpoints are globe-visible.
    Globe,
    /// Force-layout space; edges render as straight segments and are
    /// always visible. Links between satellites at the same physical
    /// location are excluded here outright.
    Graph,
}

/// Undirected renderable connection between two satellites
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub source: Satellite,
    pub target: Satellite,
    pub visible: bool,
}

/// Derive the edge list for one coordinate space.
///
/// Links whose endpoints do not resolve to a satellite are skipped (the
/// node may have been dropped for missing coordinates); that is expected
/// sparse-data behavior, not an error. Output preserves first-seen order.
pub fn resolve_edges(graph: &NodeGraph, satellites: &[Satellite], space: EdgeSpace) -> Vec<Edge> {
    let by_ip: HashMap<u32, &Satellite> = satellites.iter().map(|s| (s.node.ip, s)).collect();

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut edges = Vec::new();

    for (a, b) in graph.links() {
        if a == b {
            continue;
        }
        // Canonical order so (a,b) and (b,a) map to the same edge.
        if !seen.insert((a.min(b), a.max(b))) {
            continue;
        }

        let (Some(&source), Some(&target)) = (by_ip.get(&a), by_ip.get(&b)) else {
            debug!(a, b, "link endpoint has no satellite, skipping");
            continue;
        };

        let same_location = source.node.coordinates() == target.node.coordinates();

        let visible = match space {
            EdgeSpace::Globe => source.globe.visible && target.globe.visible,
            EdgeSpace::Graph => {
                if same_location {
                    continue;
                }
                true
            }
        };

        edges.push(Edge {
            source: source.clone(),
            target: target.clone(),
            visible,
        });
    }

    edges
}
