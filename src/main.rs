mod config;
mod edge;
mod error;
mod geo;
mod geometry;
mod graph;
mod node;
mod palette;
mod pipeline;
mod satellite;
mod settings;
mod worker;

use clap::{Args, Parser, Subcommand};
use config::PipelineConfig;
use error::{PipelineError, Result};
use geometry::EdgeShape;
use settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "globemesh")]
#[command(version)]
#[command(about = "Cluster node globe/graph geometry pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct InputArgs {
    /// Node list JSON file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Fetch the node list from an HTTP endpoint
    #[arg(short, long)]
    url: Option<String>,
}

#[derive(Args, Clone)]
struct PipelineArgs {
    /// Globe sphere radius in world units (default 100)
    #[arg(long)]
    globe_radius: Option<f32>,

    /// Cartesian distance below which satellites collapse (default 3)
    #[arg(long)]
    proximity: Option<f32>,

    /// Scale factor applied to force-layout positions (default 20)
    #[arg(long)]
    graph_scale: Option<f32>,

    /// Interpolated segments per rendered edge (default 30)
    #[arg(short = 'p', long)]
    points: Option<usize>,

    /// Force layout refinement steps (default 3)
    #[arg(long)]
    iterations: Option<usize>,

    /// Random seed for reproducible satellite colors
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker deadline in seconds
    #[arg(long, default_value = "30.0")]
    timeout: f32,
}

impl PipelineArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(v) = self.globe_radius {
            config.globe_radius = v;
        }
        if let Some(v) = self.proximity {
            config.satellite_proximity = v;
        }
        if let Some(v) = self.graph_scale {
            config.graph_scale = v;
        }
        if let Some(v) = self.points {
            config.edge_point_count = v;
        }
        if let Some(v) = self.iterations {
            config.layout_iterations = v;
        }
        if let Some(v) = self.seed {
            config.color_seed = Some(v);
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and emit satellites plus both edge lists
    Build {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        opts: PipelineArgs,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the pipeline and emit geometry buffers for one edge mode
    Geometry {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        opts: PipelineArgs,

        /// Edge interpolation mode: arc (globe space) or line (graph space)
        #[arg(short, long, default_value = "arc")]
        mode: String,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reassign satellite colors in a saved pipeline output and emit only
    /// the regenerated color buffer
    Recolor {
        /// Pipeline output JSON (from `build`)
        #[arg(short, long)]
        input: PathBuf,

        /// Which edge list to recolor: globe or graph
        #[arg(long, default_value = "globe")]
        space: String,

        /// Interpolated segments per rendered edge (default 30)
        #[arg(short = 'p', long)]
        points: Option<usize>,

        /// Random seed for reproducible colors
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch a node list from the membership endpoint and dump it as JSON
    Fetch {
        /// Endpoint URL; falls back to pipeline.nodes_url from config.toml
        url: Option<String>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();

    match cli.command {
        Commands::Build {
            input,
            opts,
            output,
        } => {
            let config = build_config(&opts, &settings)?;
            let nodes = resolve_nodes(&input, &settings)?;
            let deadline = Duration::from_secs_f32(opts.timeout);
            let cancel = worker::CancelToken::new();
            let job_config = config.clone();
            let result = worker::run_job(
                move || pipeline::run_pipeline(nodes, &job_config),
                deadline,
                &cancel,
            )?;
            write_output(&result, output.as_deref())
        }

        Commands::Geometry {
            input,
            opts,
            mode,
            output,
        } => {
            let config = build_config(&opts, &settings)?;
            let shape = parse_shape(&mode)?;
            let nodes = resolve_nodes(&input, &settings)?;
            let deadline = Duration::from_secs_f32(opts.timeout);
            let cancel = worker::CancelToken::new();
            let job_config = config.clone();
            let buffers = worker::run_job(
                move || {
                    let out = pipeline::run_pipeline(nodes, &job_config)?;
                    let edges = match shape {
                        EdgeShape::Arc => &out.satellite_edges,
                        EdgeShape::Line => &out.graph_edges,
                    };
                    geometry::build_geometry(edges, shape, job_config.edge_point_count)
                },
                deadline,
                &cancel,
            )?;
            write_output(&buffers, output.as_deref())
        }

        Commands::Recolor {
            input,
            space,
            points,
            seed,
            output,
        } => {
            let mut config = PipelineConfig::default();
            settings.apply(&mut config);
            if let Some(p) = points {
                config.edge_point_count = p;
            }
            config.color_seed = seed.or(config.color_seed);
            config.validate()?;

            let content = fs::read_to_string(&input)?;
            let mut batch: pipeline::PipelineOutput = serde_json::from_str(&content)?;

            let mut colors = palette::ColorSource::new(config.color_seed);
            pipeline::recolor(&mut batch, &config.palette, &mut colors);

            let edges = match space.to_lowercase().as_str() {
                "globe" | "arc" => &batch.satellite_edges,
                "graph" | "line" => &batch.graph_edges,
                other => {
                    return Err(PipelineError::InvalidConfig(format!(
                        "unknown edge space: {other} (expected globe or graph)"
                    )))
                }
            };
            let color_buffer = geometry::rebuild_colors(edges, config.edge_point_count)?;
            write_output(
                &serde_json::json!({ "colors": color_buffer }),
                output.as_deref(),
            )
        }

        Commands::Fetch { url, output } => {
            let url = url
                .or_else(|| settings.pipeline.nodes_url.clone())
                .ok_or_else(|| {
                    PipelineError::InvalidConfig(
                        "no endpoint: pass a URL or set pipeline.nodes_url in config.toml".into(),
                    )
                })?;
            let nodes = node::fetch_nodes(&url)?;
            write_output(&nodes, output.as_deref())
        }
    }
}

/// Defaults, overlaid by config.toml, overlaid by CLI flags
fn build_config(args: &PipelineArgs, settings: &Settings) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();
    settings.apply(&mut config);
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn resolve_nodes(input: &InputArgs, settings: &Settings) -> Result<Vec<node::Node>> {
    if let Some(path) = &input.input {
        return node::load_nodes(path);
    }
    if let Some(url) = &input.url {
        return node::fetch_nodes(url);
    }
    if let Some(url) = &settings.pipeline.nodes_url {
        return node::fetch_nodes(url);
    }
    Err(PipelineError::InvalidConfig(
        "no node list source: pass --input or --url, or set pipeline.nodes_url in config.toml"
            .into(),
    ))
}

fn parse_shape(mode: &str) -> Result<EdgeShape> {
    match mode.to_lowercase().as_str() {
        "arc" | "globe" => Ok(EdgeShape::Arc),
        "line" | "graph" => Ok(EdgeShape::Line),
        other => Err(PipelineError::InvalidConfig(format!(
            "unknown geometry mode: {other} (expected arc or line)"
        ))),
    }
}

fn write_output<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}
