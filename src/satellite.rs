//! Satellite resolution: one renderable entity per input node, placed in
//! both globe space (from lat/long) and graph space (from the force
//! layout), with proximity-based visibility collapse on the globe.

use crate::config::PipelineConfig;
use crate::geo;
use crate::node::Node;
use crate::palette::{ColorSource, Rgb};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Position and visibility of a satellite in one coordinate space
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpacePosition {
    pub vector: Vec3,
    pub visible: bool,
}

/// Renderable entity for one cluster node
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Satellite {
    pub node: Node,
    /// Missing only for records that arrive from outside without a color;
    /// the resolver always assigns one.
    #[serde(default)]
    pub color: Option<Rgb>,
    pub globe: SpacePosition,
    pub graph: SpacePosition,
}

/// Resolve nodes to satellites in input order.
///
/// Globe visibility is order-sensitive: a satellite within
/// `satellite_proximity` (Cartesian distance) of an already-visible one
/// is created invisible, so the first node at a location stays the
/// visible representative. Graph-space visibility is unconditionally
/// true; no deduplication is performed there.
pub fn resolve_satellites(
    nodes: &[Node],
    positions: &HashMap<u32, Vec3>,
    config: &PipelineConfig,
    colors: &mut ColorSource,
) -> Vec<Satellite> {
    let mut satellites: Vec<Satellite> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let Some((lat, lng)) = node.coordinates() else {
            warn!(ip = %node.addr(), "node has no usable coordinates, skipping");
            continue;
        };

        let globe_vector = geo::to_vector(lat, lng, config.globe_radius);
        let graph_vector =
            positions.get(&node.ip).copied().unwrap_or(Vec3::ZERO) * config.graph_scale;

        let collapsed = satellites.iter().any(|s| {
            s.globe.visible && s.globe.vector.distance(globe_vector) < config.satellite_proximity
        });

        satellites.push(Satellite {
            node: node.clone(),
            color: Some(colors.pick(&config.palette)),
            globe: SpacePosition {
                vector: globe_vector,
                visible: !collapsed,
            },
            graph: SpacePosition {
                vector: graph_vector,
                visible: true,
            },
        });
    }

    satellites
}
