use crate::config::load_config;
use crate::layout::{compute_layout, LayoutOptions};
use crate::redact::redact_scene;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::scene::SceneGraph;
use crate::scene_dump::write_scene_dump;
use crate::spec::{DiagramSpec, PrecomputedLayout, RecommendedSize};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tmr", version, about = "Thinking-map layout and rendering engine")]
pub struct Args {
    /// Input spec JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme name, themeVariables, layout overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Minimum canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Normalized concept positions JSON (concept maps only)
    #[arg(long = "positions")]
    pub positions: Option<PathBuf>,

    /// Shrink the canvas to the drawn content after layout
    #[arg(long = "tight", default_value_t = false)]
    pub tight: bool,

    /// Hide this fraction of labels and append an answer key
    #[arg(long = "redact")]
    pub redact: Option<f32>,

    /// Seed for choosing which labels to hide
    #[arg(long = "seed", default_value_t = 0)]
    pub seed: u64,

    /// Write the scene graph as JSON alongside the image
    #[arg(long = "dumpScene")]
    pub dump_scene: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let spec = DiagramSpec::from_json(&input)?;

    let recommended = match (args.width, args.height) {
        (None, None) => None,
        (width, height) => Some(RecommendedSize {
            width: width.unwrap_or(config.render.width),
            height: height.unwrap_or(config.render.height),
            padding: config.layout.canvas.padding,
        }),
    };
    let precomputed = match args.positions.as_deref() {
        Some(path) => Some(read_positions(path)?),
        None => None,
    };
    let options = LayoutOptions {
        recommended,
        precomputed,
    };

    let layout = compute_layout(&spec, &config.theme, &config.layout, &options)?;
    for degradation in &layout.degradations {
        log::warn!("degraded: {degradation}");
    }

    let mut scene = SceneGraph::build(&layout, &config.theme, &config.layout);
    if args.tight {
        scene.tighten(config.layout.canvas.padding);
    }
    if let Some(fraction) = args.redact {
        let hidden = redact_scene(
            &mut scene,
            fraction,
            args.seed,
            &config.layout.redaction,
            &config.theme,
        );
        log::info!("redacted {hidden} labels (seed {})", args.seed);
    }

    if let Some(path) = args.dump_scene.as_deref() {
        write_scene_dump(path, &layout, &scene)?;
    }

    let svg = render_svg(&scene, &config.theme, &config.layout);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Accepts either a bare `{name: [x, y]}` map or the wrapped
/// `{"positions": {...}}` form emitted by upstream pipelines.
fn read_positions(path: &Path) -> Result<PrecomputedLayout> {
    let contents = std::fs::read_to_string(path)?;
    if let Ok(layout) = serde_json::from_str::<PrecomputedLayout>(&contents) {
        return Ok(layout);
    }
    let positions = serde_json::from_str(&contents)?;
    Ok(PrecomputedLayout { positions })
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
