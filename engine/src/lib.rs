//! Scalar-field generation and marching cubes surface extraction.
//!
//! A [`FieldGenerator`] fills a [`ScalarField`] from uniform randomness or
//! FastNoiseLite, and [`MarchingCubes`] turns it into a triangle [`Mesh`].
//! Corners strictly above the surface level count as solid; the emitted
//! triangles face from solid towards empty space.
//!
//! ```ignore
//! use isosurface_engine::{regenerate, GridConfig, NoiseMode};
//!
//! let config = GridConfig { mode: NoiseMode::Perlin, surface_level: 5.0, smooth: true, ..Default::default() };
//! let surface = regenerate(&config)?;
//! println!("{} triangles", surface.mesh.triangle_count());
//! ```

pub mod api;
pub mod config;
pub mod field;
pub mod marching;
pub mod mesh;
pub mod sampling;
pub mod tables;

pub use api::{Dimensions, EngineError, EngineResult, FieldParams, NoiseMode, NoiseSampler};
pub use config::GridConfig;
pub use field::{SampleMarker, ScalarField};
pub use marching::{cube_index, edge_vertex, extract, CellSample, MarchingCubes};
pub use mesh::{Mesh, MeshBuilder};
pub use sampling::{generate, FieldGenerator, FnlSampler};

/// A generated field together with the surface extracted from it.
#[derive(Debug, Clone)]
pub struct Surface {
    pub field: ScalarField,
    pub mesh: Mesh,
}

/// Validates `config`, generates its field and extracts the surface.
///
/// Nothing is generated when validation fails.
pub fn regenerate(config: &GridConfig) -> EngineResult<Surface> {
    config.validate()?;
    let field = config.generator().generate(config.dims())?;
    let mesh = config.extractor().extract(&field)?;
    Ok(Surface { field, mesh })
}
