use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use npatch::export::obj::{ObjTexturedWriter, ObjUntexturedWriter};
use npatch::export::ExportMesh;
use npatch::{Terrain, TerrainConfig};

/// Tessellate bezier patch terrain and print it as Wavefront OBJ.
#[derive(Parser, Debug)]
#[command(name = "npatch", version)]
struct Cli {
    /// Terrain file (TOML); the built-in maze floor is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the subdivision depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// One flat normal per leaf patch instead of one per corner
    #[arg(long)]
    flat: bool,

    /// Negate all normals
    #[arg(long)]
    flipped: bool,

    /// Leave texture coordinates out of the output
    #[arg(long)]
    no_texture: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn write_obj<E: ExportMesh>(mut writer: E, config: &TerrainConfig, terrain: &Terrain) {
    for (i, (patch, range)) in config.patches.iter().zip(terrain.ranges.iter()).enumerate() {
        writer.add_group(&patch.label(i), &terrain.mesh, *range);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TerrainConfig::from_path(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(depth) = cli.depth {
        config.options.depth = depth;
    }
    if cli.flat {
        config.options.smooth = false;
    }
    if cli.flipped {
        config.options.flipped = true;
    }

    let terrain = config.tessellate()?;
    info!(
        "{} patches, {} triangles",
        terrain.ranges.len(),
        terrain.mesh.triangle_count()
    );

    let mut obj = String::new();
    if cli.no_texture {
        write_obj(ObjUntexturedWriter::from(&mut obj), &config, &terrain);
    } else {
        write_obj(ObjTexturedWriter::from(&mut obj), &config, &terrain);
    }

    match &cli.output {
        Some(path) => fs::write(path, obj)?,
        None => print!("{}", obj),
    }
    Ok(())
}
