// seating-chart: Randomly seat students by group and render a seating chart

mod assign;
mod canvas;
mod config;
mod error;
mod layout;
mod render;
mod roster;

use chrono::Local;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::canvas::{CanvasGeometry, Placement};
use crate::config::ChartConfig;
use crate::error::AppError;
use crate::layout::LayoutGrid;
use crate::render::RasterSurface;
use crate::roster::Roster;

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Randomly seat students by group and render a seating chart")]
struct Args {
    /// Config file (YAML)
    #[arg(short = 'f', long = "config", default_value = "config/config.yaml")]
    config: PathBuf,

    /// Random seed (overrides the config; omit both for a fresh shuffle)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Roster file (CSV, or JSON array), overrides names_path
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Layout grid CSV, overrides layout_path
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Output image, overrides output_path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the seat assignment as JSON instead of rendering an image
    #[arg(long)]
    dump_assignment: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// One line of the `--dump-assignment` output
#[derive(Debug, Serialize)]
struct AssignmentEntry<'a> {
    number: Option<u32>,
    name: &'a str,
    kana: &'a str,
    group: &'a str,
    group_shuffle: u32,
    x_idx: u32,
    y_idx: u32,
    px_x: i64,
    px_y: i64,
}

impl<'a> From<&'a Placement> for AssignmentEntry<'a> {
    fn from(p: &'a Placement) -> Self {
        Self {
            number: p.record.number,
            name: &p.record.name,
            kana: &p.record.kana,
            group: &p.record.group,
            group_shuffle: p.record.group_shuffle,
            x_idx: p.record.x_idx,
            y_idx: p.record.y_idx,
            px_x: p.left,
            px_y: p.top,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), AppError> {
    // Load config and apply CLI overrides
    let mut config = ChartConfig::from_file(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(roster) = args.roster {
        config.names_path = roster;
    }
    if let Some(layout) = args.layout {
        config.layout_path = layout;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }

    // Read inputs
    let roster = Roster::from_path(&config.names_path)?;
    let grid = LayoutGrid::from_csv_path(&config.layout_path)?;
    for (group, count) in grid.group_counts() {
        debug!(group = %group, count, "layout cells");
    }
    info!(
        students = roster.len(),
        groups = roster.groups().len(),
        rows = grid.rows(),
        cols = grid.cols(),
        "loaded roster and layout"
    );

    // Assign seats
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let seated = assign::assign_seats(roster, &grid, &mut rng)?;

    // Geometry
    let geometry = CanvasGeometry::compute(&config, grid.rows(), grid.cols())?;
    debug!(?geometry, "computed canvas geometry");
    let placements = geometry.place(seated);

    if args.dump_assignment {
        let entries: Vec<AssignmentEntry> = placements.iter().map(AssignmentEntry::from).collect();
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::IoError(e.into()))?;
        println!("{}", json);
        return Ok(());
    }

    // Render and save
    let font = render::load_font(&config.font_path)?;
    let mut surface = RasterSurface::new(geometry.width, geometry.height, config.back_clr.0, font);
    render::render_chart(
        &mut surface,
        &config,
        &geometry,
        &placements,
        Local::now().date_naive(),
    );
    save_image(surface, &config.output_path)?;

    println!("✓ Generated: {}", config.output_path.display());
    println!("  Desks: {} x {}", grid.cols(), grid.rows());
    println!("  Seated: {}", placements.iter().filter(|p| !p.record.is_empty_desk()).count());
    match config.seed {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (random)"),
    }

    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn save_image(surface: RasterSurface, output_path: &Path) -> Result<(), AppError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    surface.into_image().save(output_path)?;
    info!(path = %output_path.display(), "saved seating chart");
    Ok(())
}
