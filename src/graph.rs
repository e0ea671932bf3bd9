//! Connectivity graph and force-directed layout.
//!
//! The current adjacency rule links every node to every other node (a
//! full mesh minus self-loops) rather than reflecting a real peer
//! topology. The layout is a replaceable strategy: graph in, one 3D
//! position per node out after a bounded number of refinement steps.

use crate::node::Node;
use glam::Vec3;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use tracing::warn;

// Layout tuning. Internal to the strategy, not part of its contract.
const LINK_DISTANCE: f32 = 4.0;
const REPULSION: f32 = 6.0;
const SPRING_K: f32 = 0.6;
const DAMPING: f32 = 0.85;
const MAX_STEP: f32 = 2.0;
const DT: f32 = 0.35;

/// Undirected connectivity graph keyed by node ip
pub struct NodeGraph {
    graph: UnGraph<u32, ()>,
}

impl NodeGraph {
    /// Build the full-mesh graph over the given nodes. Duplicate ips are
    /// ignored after the first occurrence; an empty list yields an empty
    /// graph.
    pub fn full_mesh(nodes: &[Node]) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut seen = HashSet::new();
        let mut indices: Vec<NodeIndex> = Vec::with_capacity(nodes.len());

        for node in nodes {
            if !seen.insert(node.ip) {
                warn!(ip = %node.addr(), "duplicate node ip in input, ignoring");
                continue;
            }
            indices.push(graph.add_node(node.ip));
        }

        for i in 0..indices.len() {
            for j in (i + 1)..indices.len() {
                graph.add_edge(indices[i], indices[j], ());
            }
        }

        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Links as (ip, ip) pairs, in insertion order
    pub fn links(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()]))
    }

    /// Node ips in insertion order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.graph.node_indices().map(|i| self.graph[i])
    }
}

/// Run the force-directed layout: pairwise repulsion plus springs along
/// links, integrated for a fixed number of steps from a deterministic
/// ring seed. Same graph in, same positions out.
pub fn layout(graph: &NodeGraph, iterations: usize) -> HashMap<u32, Vec3> {
    let ids: Vec<u32> = graph.ids().collect();
    let n = ids.len();
    let mut positions: HashMap<u32, Vec3> = HashMap::with_capacity(n);
    if n == 0 {
        return positions;
    }

    // Ring seed: spread nodes around a circle with a small vertical
    // offset so the integrator starts from distinct, reproducible spots.
    for (i, &ip) in ids.iter().enumerate() {
        let angle = i as f32 * std::f32::consts::TAU / n as f32;
        let y = (i as f32 / n as f32 - 0.5) * LINK_DISTANCE;
        positions.insert(
            ip,
            Vec3::new(angle.cos() * LINK_DISTANCE, y, angle.sin() * LINK_DISTANCE),
        );
    }

    let mut velocities: HashMap<u32, Vec3> = ids.iter().map(|&ip| (ip, Vec3::ZERO)).collect();

    for _ in 0..iterations {
        let mut forces: HashMap<u32, Vec3> = ids.iter().map(|&ip| (ip, Vec3::ZERO)).collect();

        for i in 0..n {
            for j in (i + 1)..n {
                let pa = positions[&ids[i]];
                let pb = positions[&ids[j]];
                let dir = pa - pb;
                let dist2 = dir.length_squared().max(0.01);
                let f = (REPULSION / dist2) * dir.normalize_or_zero();
                *forces.get_mut(&ids[i]).unwrap() += f;
                *forces.get_mut(&ids[j]).unwrap() -= f;
            }
        }

        for (a, b) in graph.links() {
            let pa = positions[&a];
            let pb = positions[&b];
            let d = pb - pa;
            let len = d.length().max(0.001);
            let stretch = len - LINK_DISTANCE;
            let f = SPRING_K * stretch * (d / len);
            *forces.get_mut(&a).unwrap() += f;
            *forces.get_mut(&b).unwrap() -= f;
        }

        for &ip in &ids {
            let v = velocities.get_mut(&ip).unwrap();
            *v = (*v + forces[&ip] * DT) * DAMPING;

            let mut step = *v * DT;
            if step.length() > MAX_STEP {
                step = step.normalize_or_zero() * MAX_STEP;
            }
            *positions.get_mut(&ip).unwrap() += step;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::{layout, NodeGraph};
    use crate::node::{Host, Node};
    use std::collections::HashSet;

    fn node(ip: u32) -> Node {
        Node {
            ip,
            state: "alive".into(),
            host: Host {
                latitude: Some(0.0),
                longitude: Some(0.0),
                ..Default::default()
            },
        }
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let graph = NodeGraph::full_mesh(&[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.link_count(), 0);
        assert!(layout(&graph, 3).is_empty());
    }

    #[test]
    fn full_mesh_links_every_pair_once() {
        let nodes: Vec<Node> = (1..=5).map(node).collect();
        let graph = NodeGraph::full_mesh(&nodes);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.link_count(), 5 * 4 / 2);

        let mut pairs = HashSet::new();
        for (a, b) in graph.links() {
            assert_ne!(a, b, "self-link in mesh");
            assert!(pairs.insert((a.min(b), a.max(b))), "duplicate link {a}-{b}");
        }
    }

    #[test]
    fn duplicate_ips_are_ignored() {
        let nodes = vec![node(1), node(2), node(1)];
        let graph = NodeGraph::full_mesh(&nodes);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.link_count(), 1);
    }

    #[test]
    fn layout_assigns_every_node_a_finite_position() {
        let nodes: Vec<Node> = (1..=8).map(node).collect();
        let graph = NodeGraph::full_mesh(&nodes);
        let positions = layout(&graph, 3);
        assert_eq!(positions.len(), 8);
        for (ip, p) in &positions {
            assert!(p.is_finite(), "non-finite position for {ip}");
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let nodes: Vec<Node> = (1..=6).map(node).collect();
        let graph = NodeGraph::full_mesh(&nodes);
        let a = layout(&graph, 3);
        let b = layout(&graph, 3);
        assert_eq!(a.len(), b.len());
        for (ip, p) in &a {
            assert_eq!(b[ip], *p);
        }
    }

    #[test]
    fn single_node_layout_is_trivial() {
        let nodes = vec![node(42)];
        let graph = NodeGraph::full_mesh(&nodes);
        let positions = layout(&graph, 3);
        assert_eq!(positions.len(), 1);
        assert!(positions[&42].is_finite());
    }
}
