//! Marching cubes isosurface extraction over a [`ScalarField`].
//!
//! Cells are visited in `(x, y, z)` row-major order. The parallel path
//! shards the walk into x-slabs and concatenates them in slab order, so it
//! produces exactly the same mesh as the sequential path.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{EngineError, EngineResult};
use crate::field::ScalarField;
use crate::mesh::{Mesh, MeshBuilder};
use crate::tables::{self, CORNER_OFFSETS, EDGE_CORNERS, EDGE_MASKS};

/// Below this corner-value difference an edge is treated as flat and the
/// interpolated vertex falls back to the edge midpoint.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// The eight corner samples of one lattice cell, in table corner order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub positions: [Vec3; 8],
    pub values: [f32; 8],
}

impl CellSample {
    /// Reads the cell whose minimum corner is `(x, y, z)`. The caller keeps
    /// `x + 1`, `y + 1` and `z + 1` inside the field.
    pub fn gather(field: &ScalarField, x: usize, y: usize, z: usize) -> Self {
        let mut positions = [Vec3::ZERO; 8];
        let mut values = [0.0; 8];
        for (i, [dx, dy, dz]) in CORNER_OFFSETS.iter().copied().enumerate() {
            let (cx, cy, cz) = (x + dx as usize, y + dy as usize, z + dz as usize);
            positions[i] = Vec3::new(cx as f32, cy as f32, cz as f32);
            values[i] = field.get(cx, cy, cz);
        }
        Self { positions, values }
    }

    pub fn configuration(&self, threshold: f32) -> u8 {
        cube_index(&self.values, threshold)
    }
}

/// Bit `i` is set iff corner `i` lies strictly above `threshold`.
#[inline]
pub fn cube_index(values: &[f32; 8], threshold: f32) -> u8 {
    values
        .iter()
        .enumerate()
        .fold(0u8, |index, (i, &v)| if v > threshold { index | (1 << i) } else { index })
}

/// Places the vertex for a crossed edge.
///
/// Without `smooth` this is the edge midpoint. With `smooth` the vertex is
/// interpolated to where the edge's linear profile meets `threshold`, with
/// the parameter clamped to `[0, 1]`.
#[inline]
pub fn edge_vertex(a: Vec3, b: Vec3, value_a: f32, value_b: f32, threshold: f32, smooth: bool) -> Vec3 {
    if !smooth {
        return (a + b) * 0.5;
    }
    let denom = value_b - value_a;
    if denom.abs() < DEGENERATE_EPSILON {
        return (a + b) * 0.5;
    }
    let t = ((threshold - value_a) / denom).clamp(0.0, 1.0);
    a + (b - a) * t
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarchingCubes {
    pub threshold: f32,
    pub smooth: bool,
    /// Shard the walk across the rayon pool.
    pub parallel: bool,
}

impl Default for MarchingCubes {
    fn default() -> Self {
        Self { threshold: 0.5, smooth: false, parallel: true }
    }
}

impl MarchingCubes {
    pub fn new(threshold: f32, smooth: bool) -> Self {
        Self { threshold, smooth, ..Default::default() }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn extract(&self, field: &ScalarField) -> EngineResult<Mesh> {
        let mut mesh = Mesh::default();
        self.extract_into(field, &mut mesh)?;
        Ok(mesh)
    }

    /// Rebuilds `mesh` from scratch. On error `mesh` is left untouched.
    pub fn extract_into(&self, field: &ScalarField, mesh: &mut Mesh) -> EngineResult<()> {
        if !self.threshold.is_finite() {
            return Err(EngineError::InvalidThreshold(self.threshold));
        }
        let dims = field.dims();
        dims.validate()?;

        let mut builder = MeshBuilder::from_mesh(std::mem::take(mesh));
        let slabs = dims.height - 1;
        if self.parallel {
            let parts: Vec<MeshBuilder> = (0..slabs)
                .into_par_iter()
                .map(|x| {
                    let mut part = MeshBuilder::new();
                    self.march_slab(field, x, &mut part);
                    part
                })
                .collect();
            for part in parts {
                builder.append(part);
            }
        } else {
            for x in 0..slabs {
                self.march_slab(field, x, &mut builder);
            }
        }
        *mesh = builder.build();

        info!(
            "Extracted {} triangles ({} vertices) from {} cells",
            mesh.triangle_count(),
            mesh.vertex_count(),
            dims.cell_count()
        );
        Ok(())
    }

    fn march_slab(&self, field: &ScalarField, x: usize, out: &mut MeshBuilder) {
        let dims = field.dims();
        for y in 0..dims.width - 1 {
            for z in 0..dims.depth - 1 {
                self.march_cell(&CellSample::gather(field, x, y, z), out);
            }
        }
    }

    /// Appends the triangles of one cell to `out`.
    pub fn march_cell(&self, cell: &CellSample, out: &mut MeshBuilder) {
        let index = cell.configuration(self.threshold);
        let crossed = EDGE_MASKS[index as usize];
        if crossed == 0 {
            return;
        }

        let mut edge_vertices = [Vec3::ZERO; 12];
        for (edge, &(a, b)) in EDGE_CORNERS.iter().enumerate() {
            if crossed & (1 << edge) != 0 {
                edge_vertices[edge] = edge_vertex(
                    cell.positions[a],
                    cell.positions[b],
                    cell.values[a],
                    cell.values[b],
                    self.threshold,
                    self.smooth,
                );
            }
        }

        for tri in tables::configuration(index).chunks_exact(3) {
            out.push_triangle([
                edge_vertices[tri[0] as usize],
                edge_vertices[tri[1] as usize],
                edge_vertices[tri[2] as usize],
            ]);
        }
    }
}

/// Extracts the `threshold` isosurface of `field` using the parallel walk.
pub fn extract(field: &ScalarField, threshold: f32, smooth: bool) -> EngineResult<Mesh> {
    MarchingCubes::new(threshold, smooth).extract(field)
}
