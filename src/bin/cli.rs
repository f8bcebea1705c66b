// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! T3D brush exporter CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use t3dbrush::cli::{discover_inputs, export_batch, rename_scene_materials, Reporter};
use t3dbrush::geometry::{Material, Primitive, SceneObject, WorldTransform};
use t3dbrush::io::{self, FileSink, GeometryExporter, Sink, StdoutSink};
use t3dbrush::materials::{collect_texture_names, RenameRule};
use t3dbrush::{export_file, ExportSettings};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "t3dbrush")]
#[command(about = "Export meshes as T3D brush actors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ./t3dbrush.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one object of a scene (.json or .obj) as a T3D brush
    Export {
        /// Input scene file
        input: String,

        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Export scale for positions and UVs
        #[arg(short, long)]
        scale: Option<f64>,

        /// Object to export instead of the scene's active object
        #[arg(long)]
        object: Option<String>,

        /// Export polygons as they are instead of triangulating first
        #[arg(long)]
        no_triangulate: bool,
    },

    /// Export every scene found in the given files or directories
    Batch {
        /// Scene files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for .t3d files
        #[arg(long, default_value = "t3d")]
        out: PathBuf,

        /// Export scale for positions and UVs
        #[arg(short, long)]
        scale: Option<f64>,

        /// Export polygons as they are instead of triangulating first
        #[arg(long)]
        no_triangulate: bool,
    },

    /// List the image textures used by an object's materials
    Textures {
        /// Input scene file
        input: String,

        /// Object to inspect instead of the scene's active object
        #[arg(long)]
        object: Option<String>,
    },

    /// Rewrite picnum material names of a scene, saved as JSON
    RenameMaterials {
        /// Input scene file
        input: String,

        /// Rename rule (picnum, dn3d)
        #[arg(short, long, default_value = "picnum")]
        rule: RenameRule,

        /// Output .json scene, overwrites the input when omitted (JSON input only)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Export a built-in primitive
    Primitive {
        /// Shape (triangle, quad, cube)
        shape: String,

        /// Edge length
        #[arg(long, default_value = "1.0")]
        size: f64,

        /// Material name for every face
        #[arg(long)]
        material: Option<String>,

        /// Export scale for positions and UVs
        #[arg(short, long)]
        scale: Option<f64>,

        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        Reporter::report_error(&format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Export {
            input,
            output,
            scale,
            object,
            no_triangulate,
        } => {
            let settings = load_settings(cli.config.as_deref(), *scale)?;
            export_command(
                input,
                output.as_deref(),
                object.as_deref(),
                &settings,
                !no_triangulate,
                cli.verbose,
            )
        }
        Commands::Batch {
            inputs,
            out,
            scale,
            no_triangulate,
        } => {
            let settings = load_settings(cli.config.as_deref(), *scale)?;
            batch_command(inputs, out, &settings, !no_triangulate, cli.verbose)
        }
        Commands::Textures { input, object } => textures_command(input, object.as_deref()),
        Commands::RenameMaterials {
            input,
            rule,
            output,
        } => rename_command(input, *rule, output.as_deref()),
        Commands::Primitive {
            shape,
            size,
            material,
            scale,
            output,
        } => {
            let settings = load_settings(cli.config.as_deref(), *scale)?;
            primitive_command(shape, *size, material.as_deref(), &settings, output.as_deref())
        }
        Commands::Version => {
            println!("t3dbrush v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Settings file, then environment, then the command line
fn load_settings(config: Option<&Path>, scale: Option<f64>) -> Result<ExportSettings> {
    let mut settings = match config {
        Some(path) => ExportSettings::from_file(path)?,
        None => ExportSettings::load()?,
    };
    if let Some(scale) = scale {
        let clamped = ExportSettings::with_scale(scale);
        if clamped.scale != scale {
            Reporter::report_warning(&format!(
                "Scale {} clamped to {}",
                scale, clamped.scale
            ));
        }
        settings = clamped;
    }
    Ok(settings)
}

fn deliver(document: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => FileSink::new(path).write(document)?,
        None => StdoutSink.write(document)?,
    }
    Ok(())
}

fn export_command(
    input: &str,
    output: Option<&str>,
    object: Option<&str>,
    settings: &ExportSettings,
    triangulate: bool,
    verbose: bool,
) -> Result<()> {
    if !Path::new(input).exists() {
        anyhow::bail!("Input file not found: {}", input);
    }

    let start = std::time::Instant::now();
    let document = export_file(input, object, settings, triangulate)?;
    deliver(&document, output)?;

    if let Some(output) = output {
        let polygons = document.matches("Begin Polygon").count();
        if verbose {
            Reporter::report_export(input, output, polygons, settings.scale, start.elapsed());
        } else {
            Reporter::success(&format!("Exported {} -> {}", input, output));
        }
    }

    Ok(())
}

fn batch_command(
    inputs: &[PathBuf],
    out: &Path,
    settings: &ExportSettings,
    triangulate: bool,
    verbose: bool,
) -> Result<()> {
    let scenes = discover_inputs(inputs);
    if scenes.is_empty() {
        anyhow::bail!("No .json or .obj scenes found");
    }

    if verbose {
        Reporter::report_info(&format!("Exporting {} scenes to {}", scenes.len(), out.display()));
    }

    let summary = export_batch(&scenes, out, settings, triangulate, true)?;
    Reporter::report_batch(&summary);

    if !summary.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn textures_command(input: &str, object: Option<&str>) -> Result<()> {
    let scene = io::load_scene(input).with_context(|| format!("Failed to load scene: {}", input))?;
    let mesh = scene
        .select(object)
        .and_then(SceneObject::as_mesh)
        .context("No active mesh object is selected")?;

    let names = collect_texture_names(&mesh.materials);
    if names.is_empty() {
        Reporter::report_info("No textures found on the selected object");
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

fn rename_command(input: &str, rule: RenameRule, output: Option<&str>) -> Result<()> {
    let (renamed, target) = rename_scene_materials(input, rule, output)?;
    Reporter::success(&format!("Renamed {} materials -> {}", renamed, target));
    Ok(())
}

fn primitive_command(
    shape: &str,
    size: f64,
    material: Option<&str>,
    settings: &ExportSettings,
    output: Option<&str>,
) -> Result<()> {
    let primitive = Primitive::from_name(shape, size)
        .with_context(|| format!("Unsupported shape: {} (expected triangle, quad, cube)", shape))?;

    let mut mesh = primitive.to_mesh();
    if let Some(name) = material {
        mesh.materials = vec![Some(Material::new(name))];
    }

    let object = SceneObject::mesh(shape, mesh, WorldTransform::identity());
    let document = GeometryExporter::new(*settings).export_object(Some(&object))?;
    deliver(&document, output)
}
