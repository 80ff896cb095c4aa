use glam::Vec3;
use ndarray::Array3;

use crate::api::{Dimensions, EngineError, EngineResult};

/// Dense scalar samples over an integer lattice, indexed `[x, y, z]`.
///
/// Every axis holds at least two samples and every sample is finite; both
/// are checked on construction and the field is read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    data: Array3<f32>,
}

/// One lattice sample classified against a threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMarker {
    pub position: Vec3,
    pub value: f32,
    /// `value > threshold`, the same rule cell classification uses.
    pub solid: bool,
}

impl ScalarField {
    pub fn new(data: Array3<f32>) -> EngineResult<Self> {
        let (height, width, depth) = data.dim();
        Dimensions::new(height, width, depth).validate()?;
        if let Some(((x, y, z), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonFiniteSample { x, y, z });
        }
        Ok(Self { data })
    }

    /// Builds a field from a flat buffer in x-major order (z varies fastest).
    pub fn from_vec(dims: Dimensions, values: Vec<f32>) -> EngineResult<Self> {
        dims.validate()?;
        let expected = dims.sample_count();
        if values.len() != expected {
            return Err(EngineError::ShapeMismatch { expected, actual: values.len() });
        }
        let data = Array3::from_shape_vec(dims.shape(), values)
            .map_err(|_| EngineError::ShapeMismatch { expected, actual: expected })?;
        Self::new(data)
    }

    pub fn from_fn(dims: Dimensions, mut f: impl FnMut(usize, usize, usize) -> f32) -> EngineResult<Self> {
        dims.validate()?;
        Self::new(Array3::from_shape_fn(dims.shape(), |(x, y, z)| f(x, y, z)))
    }

    pub fn dims(&self) -> Dimensions {
        let (height, width, depth) = self.data.dim();
        Dimensions::new(height, width, depth)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[[x, y, z]]
    }

    pub fn as_array(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn into_array(self) -> Array3<f32> {
        self.data
    }

    pub fn cell_count(&self) -> usize {
        self.dims().cell_count()
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Per-sample classification for debug visualisation.
    pub fn markers(&self, threshold: f32) -> impl Iterator<Item = SampleMarker> + '_ {
        self.data.indexed_iter().map(move |((x, y, z), &value)| SampleMarker {
            position: Vec3::new(x as f32, y as f32, z as f32),
            value,
            solid: value > threshold,
        })
    }

    /// The twelve edges of the lattice's bounding box.
    pub fn bounds_outline(&self) -> [[Vec3; 2]; 12] {
        let dims = self.dims();
        let hx = (dims.height - 1) as f32;
        let hy = (dims.width - 1) as f32;
        let hz = (dims.depth - 1) as f32;
        let corner = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        [
            // bottom ring
            [corner(0.0, 0.0, 0.0), corner(hx, 0.0, 0.0)],
            [corner(hx, 0.0, 0.0), corner(hx, 0.0, hz)],
            [corner(hx, 0.0, hz), corner(0.0, 0.0, hz)],
            [corner(0.0, 0.0, hz), corner(0.0, 0.0, 0.0)],
            // top ring
            [corner(0.0, hy, 0.0), corner(hx, hy, 0.0)],
            [corner(hx, hy, 0.0), corner(hx, hy, hz)],
            [corner(hx, hy, hz), corner(0.0, hy, hz)],
            [corner(0.0, hy, hz), corner(0.0, hy, 0.0)],
            // verticals
            [corner(0.0, 0.0, 0.0), corner(0.0, hy, 0.0)],
            [corner(hx, 0.0, 0.0), corner(hx, hy, 0.0)],
            [corner(hx, 0.0, hz), corner(hx, hy, hz)],
            [corner(0.0, 0.0, hz), corner(0.0, hy, hz)],
        ]
    }
}
