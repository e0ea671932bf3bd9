//! Geometry buffer generation: an edge list becomes flat position/index/
//! color buffers for a line-segment mesh.
//!
//! Edges are stable-partitioned visible-first so a renderer can draw the
//! visible prefix with a partial draw range; `visible_count` records the
//! prefix length.

use crate::edge::Edge;
use crate::error::{PipelineError, Result};
use crate::geo::SphereArc;
use crate::palette::Rgb;
use serde::{Deserialize, Serialize};

/// How edge endpoints are interpolated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeShape {
    /// Great-circle arc between the endpoints' globe positions; the arc
    /// radius is carried by the positions themselves
    Arc,
    /// Straight segment between the endpoints' graph positions
    Line,
}

/// Flat buffers consumable as a renderable line-segment mesh
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeometryBuffers {
    /// x,y,z triples, (edges) * (points + 1) vertices
    pub points: Vec<f32>,
    /// Paired segment indices into `points`, (edges) * points * 2 entries
    pub indices: Vec<u32>,
    /// r,g,b triples, one per vertex
    pub colors: Vec<f32>,
    /// Number of leading edges (after the visibility sort) that are visible
    pub visible_count: usize,
}

/// Stable partition: visible edges first, relative order preserved on
/// both sides. Returns the reordered borrow plus the visible prefix length.
fn partition_visible(edges: &[Edge]) -> (Vec<&Edge>, usize) {
    let mut ordered: Vec<&Edge> = edges.iter().filter(|e| e.visible).collect();
    let visible_count = ordered.len();
    ordered.extend(edges.iter().filter(|e| !e.visible));
    (ordered, visible_count)
}

fn endpoint_colors(edge: &Edge) -> (Rgb, Rgb) {
    match (edge.source.color, edge.target.color) {
        (Some(a), Some(b)) => (a, b),
        // Color missing on either end: render the whole edge in the error
        // color instead of failing the batch.
        _ => (Rgb::BLACK, Rgb::BLACK),
    }
}

fn push_edge_colors(edge: &Edge, point_count: usize, out: &mut Vec<f32>) {
    let (src, dst) = endpoint_colors(edge);
    for i in 0..=point_count {
        let t = i as f32 / point_count as f32;
        let c = src.lerp(dst, t);
        out.extend_from_slice(&[c.r, c.g, c.b]);
    }
}

/// Build position, index, and color buffers for the given edges.
///
/// Each edge contributes `point_count + 1` vertices and `point_count`
/// line segments.
pub fn build_geometry(
    edges: &[Edge],
    shape: EdgeShape,
    point_count: usize,
) -> Result<GeometryBuffers> {
    if point_count == 0 {
        return Err(PipelineError::InvalidConfig(
            "edge point count must be at least 1".into(),
        ));
    }

    let (ordered, visible_count) = partition_visible(edges);
    let vertices_per_edge = point_count + 1;

    let mut points = Vec::with_capacity(ordered.len() * vertices_per_edge * 3);
    let mut indices = Vec::with_capacity(ordered.len() * point_count * 2);
    let mut colors = Vec::with_capacity(ordered.len() * vertices_per_edge * 3);

    for (edge_idx, edge) in ordered.iter().enumerate() {
        match shape {
            EdgeShape::Arc => {
                let arc = SphereArc::between(edge.source.globe.vector, edge.target.globe.vector);
                for i in 0..=point_count {
                    let p = arc.point(i as f32 / point_count as f32);
                    points.extend_from_slice(&[p.x, p.y, p.z]);
                }
            }
            EdgeShape::Line => {
                let a = edge.source.graph.vector;
                let b = edge.target.graph.vector;
                for i in 0..=point_count {
                    let p = a.lerp(b, i as f32 / point_count as f32);
                    points.extend_from_slice(&[p.x, p.y, p.z]);
                }
            }
        }

        let base = (edge_idx * vertices_per_edge) as u32;
        for i in 0..point_count as u32 {
            indices.push(base + i);
            indices.push(base + i + 1);
        }

        push_edge_colors(edge, point_count, &mut colors);
    }

    Ok(GeometryBuffers {
        points,
        indices,
        colors,
        visible_count,
    })
}

/// Regenerate only the color buffer for an edge list whose geometry is
/// unchanged. Uses the same visibility partition as [`build_geometry`],
/// so the result aligns with a previously built position buffer.
pub fn rebuild_colors(edges: &[Edge], point_count: usize) -> Result<Vec<f32>> {
    if point_count == 0 {
        return Err(PipelineError::InvalidConfig(
            "edge point count must be at least 1".into(),
        ));
    }

    let (ordered, _) = partition_visible(edges);
    let mut colors = Vec::with_capacity(ordered.len() * (point_count + 1) * 3);
    for edge in ordered {
        push_edge_colors(edge, point_count, &mut colors);
    }
    Ok(colors)
}
