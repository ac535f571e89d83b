//! Shademesh CLI - smooth vertex normals for binary STL files.
//!
//! Usage: shademesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `shademesh --help` for available commands.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use shademesh::algo::expand::FacetNormalSource;
use shademesh::algo::incidence::{ExactIndex, MatchStrategy};
use shademesh::algo::{
    expand, synthesize_normals_with_progress, Progress, Stage, SynthesisOptions,
};
use shademesh::io;
use shademesh::render::GpuVertex;

#[derive(Parser)]
#[command(name = "shademesh")]
#[command(author, version, long_about = None)]
#[command(about = "Smooth vertex normals for binary STL meshes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input STL file
        input: PathBuf,
    },

    /// Compute smooth vertex normals and write the interleaved vertex buffer
    Normals {
        /// Input STL file
        input: PathBuf,

        /// Output buffer file (little-endian f32: px py pz nx ny nz per vertex)
        output: PathBuf,

        /// Incidence matcher
        #[arg(short, long, value_enum, default_value = "indexed")]
        matcher: Matcher,

        /// Match vertices within this distance instead of exactly
        #[arg(short, long)]
        tolerance: Option<f32>,

        /// Which normal each facet contributes
        #[arg(short, long, value_enum, default_value = "stored")]
        facet_normals: FacetNormals,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Matcher {
    /// Compare every vertex against every facet
    Scan,
    /// Hash (or grid, with a tolerance) index
    Indexed,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FacetNormals {
    /// Normals stored in the file
    Stored,
    /// Normals recomputed from vertex winding
    Geometric,
    /// Stored normals, recomputed where missing
    Auto,
}

impl From<Matcher> for MatchStrategy {
    fn from(m: Matcher) -> Self {
        match m {
            Matcher::Scan => MatchStrategy::Scan,
            Matcher::Indexed => MatchStrategy::Indexed,
        }
    }
}

impl From<FacetNormals> for FacetNormalSource {
    fn from(f: FacetNormals) -> Self {
        match f {
            FacetNormals::Stored => FacetNormalSource::Stored,
            FacetNormals::Geometric => FacetNormalSource::Geometric,
            FacetNormals::Auto => FacetNormalSource::StoredOrGeometric,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Normals {
            input,
            output,
            matcher,
            tolerance,
            facet_normals,
            sequential,
        } => {
            let mut options = SynthesisOptions::default()
                .with_strategy(matcher.into())
                .with_facet_normals(facet_normals.into())
                .with_parallel(!sequential);
            if let Some(tol) = tolerance {
                options = options.with_tolerance(tol);
            }
            cmd_normals(&input, &output, &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, stage| {
        // only the averaging pass drives the bar
        if total == 0 || stage != Stage::Averaging {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        let old = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= old && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, raw_percent, stage);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Facets: {}", mesh.num_facets());
    println!("Vertices: {}", mesh.num_vertices());

    let soup = expand::expand(&mesh);
    let index = ExactIndex::new(&soup.positions);
    println!("Distinct positions: {}", index.num_positions());

    let degenerate = mesh.degenerate_facets().count();
    println!("Degenerate facets: {}", degenerate);
    println!("Surface area: {:.6}", mesh.surface_area());

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    Ok(())
}

fn cmd_normals(
    input: &PathBuf,
    output: &PathBuf,
    options: &SynthesisOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("Loaded: {} facets, {} vertices", mesh.num_facets(), mesh.num_vertices());

    let mode = if options.parallel { "parallel" } else { "sequential" };
    let matching = match options.tolerance {
        Some(tol) => format!("tolerance={}", tol),
        None => "exact".to_string(),
    };
    println!(
        "Synthesizing normals ({:?} matcher, {}, {})...",
        options.strategy, matching, mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let shaded = synthesize_normals_with_progress(&mesh, options, &progress)?;
    let elapsed = start.elapsed();

    let diag = shaded.diagnostics;
    if !diag.is_clean() {
        println!(
            "Warnings: {} degenerate facets, {} unmatched vertices, {} non-finite normals",
            diag.degenerate_facets, diag.unmatched_vertices, diag.non_finite_normals
        );
    }

    let mut writer = BufWriter::new(File::create(output)?);
    for vertex in shaded.gpu_vertices() {
        write_vertex(&mut writer, &vertex)?;
    }
    writer.flush()?;

    println!(
        "Saved: {} ({} bytes, {:.2?})",
        output.display(),
        shaded.len() * GpuVertex::STRIDE,
        elapsed
    );

    Ok(())
}

fn write_vertex<W: Write>(writer: &mut W, vertex: &GpuVertex) -> std::io::Result<()> {
    for c in vertex.position.iter().chain(&vertex.normal) {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}
