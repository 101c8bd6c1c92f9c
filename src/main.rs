// src/main.rs

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use crystal_scene::config::Config;
use crystal_scene::io;
use crystal_scene::rendering::Viewport;
use crystal_scene::state::ViewState;
use crystal_scene::utils::logger;

#[derive(Parser, Debug)]
#[command(name = "crystal-scene")]
#[command(about = "Build a renderable scene from a crystal structure")]
#[command(version)]
struct Cli {
    /// Structure source (JSON)
    input: PathBuf,

    /// Viewport size used for camera framing
    #[arg(long, value_name = "WxH", default_value = "800x600", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Replicate the cell before building the scene
    #[arg(long, value_name = "NxMxK", value_parser = parse_supercell)]
    supercell: Option<[u32; 3]>,

    /// Write the scene here instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Persist the effective settings after the run
    #[arg(long)]
    save_config: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// "800x600" -> [800, 600]. Every component must parse.
fn parse_dims<T: std::str::FromStr, const N: usize>(text: &str) -> Option<[T; N]> {
    let parts: Vec<T> = text
        .split(['x', 'X'])
        .map(|p| p.trim().parse().ok())
        .collect::<Option<Vec<T>>>()?;
    parts.try_into().ok()
}

fn parse_viewport(text: &str) -> Result<Viewport, String> {
    parse_dims::<f64, 2>(text)
        .filter(|[w, h]| *w > 0.0 && *h > 0.0 && w.is_finite() && h.is_finite())
        .map(|[w, h]| Viewport::new(w, h))
        .ok_or_else(|| format!("invalid viewport '{}', expected WxH", text))
}

fn parse_supercell(text: &str) -> Result<[u32; 3], String> {
    parse_dims::<u32, 3>(text)
        .filter(|dims| dims.iter().all(|&n| n > 0))
        .ok_or_else(|| format!("invalid supercell '{}', expected NxMxK with N, M, K >= 1", text))
}

fn run(cli: Cli) -> Result<(), String> {
    let (config, msg) = Config::load();
    log::info!("{}", msg);

    let mut structure =
        io::load_structure(&cli.input).map_err(|e| format!("{:?}: {}", cli.input, e))?;
    if let Some([nx, ny, nz]) = cli.supercell {
        structure = structure.supercell(nx, ny, nz).map_err(|e| e.to_string())?;
    }

    let mut state = ViewState::new(config);
    state.viewport = cli.viewport;
    let scene = state.load_structure(structure);
    log::info!(
        "{} primitives, {} bonds, {} polyhedra",
        scene.primitives.len(),
        scene.bonds.len(),
        scene.polyhedra.len()
    );

    match &cli.out {
        Some(path) => {
            io::save_scene(path, &scene)
                .map_err(|e| format!("Could not write {:?}: {}", path, e))?;
            log::info!("Scene written to {:?}", path);
        }
        None => io::write_scene(std::io::stdout().lock(), &scene).map_err(|e| e.to_string())?,
    }

    if cli.save_config {
        log::info!("{}", state.config.save());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = logger::init(level);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
