//! Batch orchestration: one node-list snapshot in, satellites and edge
//! lists out. Each invocation computes from scratch and returns its
//! outputs by value; nothing is shared between concurrent runs.

use crate::config::PipelineConfig;
use crate::edge::{resolve_edges, Edge, EdgeSpace};
use crate::error::Result;
use crate::graph::{layout, NodeGraph};
use crate::node::Node;
use crate::palette::{ColorSource, Rgb};
use crate::satellite::{resolve_satellites, Satellite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Everything the rendering layer consumes from one batch
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub satellites: Vec<Satellite>,
    /// Globe-space edges (arcs); visibility follows globe visibility
    pub satellite_edges: Vec<Edge>,
    /// Layout-space edges (straight segments); always visible
    pub graph_edges: Vec<Edge>,
}

/// Run the full batch: graph + layout, satellite resolution, edge
/// derivation for both coordinate spaces.
pub fn run_pipeline(nodes: Vec<Node>, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let graph = NodeGraph::full_mesh(&nodes);
    info!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        "graph built"
    );
    let positions = layout(&graph, config.layout_iterations);

    let mut colors = ColorSource::new(config.color_seed);
    let satellites = resolve_satellites(&nodes, &positions, config, &mut colors);

    let satellite_edges = resolve_edges(&graph, &satellites, EdgeSpace::Globe);
    let graph_edges = resolve_edges(&graph, &satellites, EdgeSpace::Graph);

    info!(
        nodes = nodes.len(),
        satellites = satellites.len(),
        satellite_edges = satellite_edges.len(),
        graph_edges = graph_edges.len(),
        "pipeline batch complete"
    );

    Ok(PipelineOutput {
        satellites,
        satellite_edges,
        graph_edges,
    })
}

/// Assign fresh palette colors to every satellite and propagate them to
/// the edge endpoints, so only the color buffer needs regenerating.
pub fn recolor(output: &mut PipelineOutput, palette: &[Rgb], colors: &mut ColorSource) {
    let mut assigned: HashMap<u32, Rgb> = HashMap::with_capacity(output.satellites.len());
    for sat in &mut output.satellites {
        let color = colors.pick(palette);
        sat.color = Some(color);
        assigned.insert(sat.node.ip, color);
    }

    for edge in output
        .satellite_edges
        .iter_mut()
        .chain(output.graph_edges.iter_mut())
    {
        if let Some(&c) = assigned.get(&edge.source.node.ip) {
            edge.source.color = Some(c);
        }
        if let Some(&c) = assigned.get(&edge.target.node.ip) {
            edge.target.color = Some(c);
        }
    }
}
