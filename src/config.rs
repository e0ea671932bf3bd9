//! Pipeline configuration.
//!
//! Every knob the pipeline recognizes lives here and is passed explicitly
//! into each invocation; there is no shared mutable settings state between
//! concurrent runs.

use crate::error::{PipelineError, Result};
use crate::palette::{default_palette, Rgb};

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Radius of the globe sphere, in world units
    pub globe_radius: f32,
    /// Cartesian distance below which a new satellite collapses into an
    /// already-visible one
    pub satellite_proximity: f32,
    /// Scale factor applied to force-layout positions
    pub graph_scale: f32,
    /// Interpolated segments per rendered edge (tessellation density)
    pub edge_point_count: usize,
    /// Force layout refinement steps
    pub layout_iterations: usize,
    /// Colors satellites are drawn from
    pub palette: Vec<Rgb>,
    /// Seed for the color source; None picks from entropy
    pub color_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            globe_radius: 100.0,
            satellite_proximity: 3.0,
            graph_scale: 20.0,
            edge_point_count: 30,
            layout_iterations: 3,
            palette: default_palette(),
            color_seed: None,
        }
    }
}

impl PipelineConfig {
    /// Fail fast on malformed configuration, before any computation runs.
    pub fn validate(&self) -> Result<()> {
        if self.edge_point_count == 0 {
            return Err(PipelineError::InvalidConfig(
                "edge point count must be at least 1".into(),
            ));
        }
        if !(self.globe_radius > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "globe radius must be positive, got {}",
                self.globe_radius
            )));
        }
        if !(self.graph_scale > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "graph scale must be positive, got {}",
                self.graph_scale
            )));
        }
        if !(self.satellite_proximity >= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "satellite proximity must be non-negative, got {}",
                self.satellite_proximity
            )));
        }
        if self.palette.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "palette must not be empty".into(),
            ));
        }
        Ok(())
    }
}
