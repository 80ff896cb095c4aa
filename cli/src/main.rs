use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use isosurface_engine::{regenerate, GridConfig, Mesh, NoiseMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "isosurface_cli", about = "Generate a scalar field and extract its isosurface")]
struct Cli {
    /// Grid configuration (.ron or .json). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    #[arg(long)]
    seed: Option<i32>,

    /// Interpolate vertices along crossed edges instead of using midpoints.
    #[arg(long)]
    smooth: bool,

    #[arg(long)]
    surface_level: Option<f32>,

    /// Write the mesh as Wavefront OBJ.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Random,
    #[value(name = "opensimplex2")]
    OpenSimplex2,
    #[value(name = "opensimplex2s")]
    OpenSimplex2S,
    Cellular,
    Perlin,
    Value,
    ValueCubic,
}

impl From<ModeArg> for NoiseMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Random => NoiseMode::Random,
            ModeArg::OpenSimplex2 => NoiseMode::OpenSimplex2,
            ModeArg::OpenSimplex2S => NoiseMode::OpenSimplex2S,
            ModeArg::Cellular => NoiseMode::Cellular,
            ModeArg::Perlin => NoiseMode::Perlin,
            ModeArg::Value => NoiseMode::Value,
            ModeArg::ValueCubic => NoiseMode::ValueCubic,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GridConfig::default(),
    };
    if let Some(mode) = cli.mode {
        config.mode = mode.into();
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if cli.smooth {
        config.smooth = true;
    }
    if let Some(level) = cli.surface_level {
        config.surface_level = level;
    }

    let surface = regenerate(&config).context("failed to regenerate surface")?;
    let (lo, hi) = surface.field.min_max();
    info!(
        "{:?} field {}x{}x{} spans [{lo:.3}, {hi:.3}]; surface at {} has {} triangles",
        config.mode,
        config.height,
        config.width,
        config.depth,
        config.surface_level,
        surface.mesh.triangle_count()
    );

    if let Some(path) = &cli.output {
        write_obj(path, &surface.mesh).with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<GridConfig> {
    let src = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => GridConfig::from_ron_str(&src)?,
        Some("json") => GridConfig::from_json_str(&src)?,
        _ => bail!("unsupported config format: {}", path.display()),
    };
    Ok(config)
}

fn write_obj(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count())?;
    for p in &mesh.positions {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for n in &mesh.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    // OBJ indices are 1-based
    for tri in mesh.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    out.flush()?;
    Ok(())
}
