use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid grid dimensions {height}x{width}x{depth}: every axis needs at least 2 samples")]
    InvalidDimensions { height: usize, width: usize, depth: usize },
    #[error("noise scale must be finite and positive, got {0}")]
    InvalidScale(f32),
    #[error("noise frequency must be finite and positive, got {0}")]
    InvalidFrequency(f32),
    #[error("surface level must be finite, got {0}")]
    InvalidThreshold(f32),
    #[error("non-finite sample at ({x}, {y}, {z})")]
    NonFiniteSample { x: usize, y: usize, z: usize },
    #[error("buffer holds {actual} samples but the dimensions need {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("RON config error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON encode error: {0}")]
    RonEncode(#[from] ron::error::Error),
    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Lattice size in samples. `height` runs along x, `width` along y and
/// `depth` along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
    pub depth: usize,
}

impl Dimensions {
    /// Smallest axis length that still forms one cell.
    pub const MIN_AXIS: usize = 2;

    pub fn new(height: usize, width: usize, depth: usize) -> Self {
        Self { height, width, depth }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.height < Self::MIN_AXIS || self.width < Self::MIN_AXIS || self.depth < Self::MIN_AXIS {
            return Err(EngineError::InvalidDimensions {
                height: self.height,
                width: self.width,
                depth: self.depth,
            });
        }
        Ok(())
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.depth)
    }

    pub fn sample_count(&self) -> usize {
        self.height * self.width * self.depth
    }

    pub fn cell_count(&self) -> usize {
        self.height.saturating_sub(1) * self.width.saturating_sub(1) * self.depth.saturating_sub(1)
    }

    /// True when any axis is exactly [`Self::MIN_AXIS`] long. Boundary
    /// suppression is skipped for such lattices since every sample lies on a face.
    pub fn has_minimal_axis(&self) -> bool {
        self.height == Self::MIN_AXIS || self.width == Self::MIN_AXIS || self.depth == Self::MIN_AXIS
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(10, 10, 10)
    }
}

impl From<(usize, usize, usize)> for Dimensions {
    fn from((height, width, depth): (usize, usize, usize)) -> Self {
        Self::new(height, width, depth)
    }
}

/// Source of the scalar samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NoiseMode {
    /// Independent uniform samples in `[0, 1]`.
    #[default]
    Random,
    OpenSimplex2,
    OpenSimplex2S,
    Cellular,
    Perlin,
    Value,
    ValueCubic,
}

impl NoiseMode {
    pub const ALL: [NoiseMode; 7] = [
        NoiseMode::Random,
        NoiseMode::OpenSimplex2,
        NoiseMode::OpenSimplex2S,
        NoiseMode::Cellular,
        NoiseMode::Perlin,
        NoiseMode::Value,
        NoiseMode::ValueCubic,
    ];

    pub fn is_noise(&self) -> bool {
        !matches!(self, NoiseMode::Random)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    pub seed: i32,
    /// Lattice-to-noise-space multiplier, applied before `center` is added.
    pub scale: f32,
    pub center: Vec3,
    /// `None` keeps the noise library's own default frequency.
    pub frequency: Option<f32>,
    /// Force every sample on the six lattice faces to zero.
    pub remove_bounds: bool,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self { seed: 0, scale: 1.0, center: Vec3::ZERO, frequency: None, remove_bounds: true }
    }
}

impl FieldParams {
    pub fn validate(&self) -> EngineResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(EngineError::InvalidScale(self.scale));
        }
        if let Some(freq) = self.frequency {
            if !freq.is_finite() || freq <= 0.0 {
                return Err(EngineError::InvalidFrequency(freq));
            }
        }
        Ok(())
    }
}

/// Coherent noise capability. Implementations are seeded at construction
/// and return values in `[-1, 1]`.
pub trait NoiseSampler: Send + Sync {
    fn sample(&self, p: Vec3) -> f32;
}
