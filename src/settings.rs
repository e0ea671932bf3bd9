use crate::config::PipelineConfig;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

/// Optional overrides for pipeline defaults, read from config.toml.
/// CLI flags still win over everything here.
#[derive(Debug, Default, Deserialize)]
pub struct PipelineSettings {
    pub globe_radius: Option<f32>,
    pub satellite_proximity: Option<f32>,
    pub graph_scale: Option<f32>,
    pub edge_point_count: Option<usize>,
    pub layout_iterations: Option<usize>,
    pub color_seed: Option<u64>,
    /// Default membership endpoint for `fetch` and friends
    pub nodes_url: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("globemesh")
            .join("config.toml")
    }

    /// Overlay file settings onto a config built from defaults
    pub fn apply(&self, config: &mut PipelineConfig) {
        let p = &self.pipeline;
        if let Some(v) = p.globe_radius {
            config.globe_radius = v;
        }
        if let Some(v) = p.satellite_proximity {
            config.satellite_proximity = v;
        }
        if let Some(v) = p.graph_scale {
            config.graph_scale = v;
        }
        if let Some(v) = p.edge_point_count {
            config.edge_point_count = v;
        }
        if let Some(v) = p.layout_iterations {
            config.layout_iterations = v;
        }
        if let Some(v) = p.color_seed {
            config.color_seed = Some(v);
        }
    }
}
