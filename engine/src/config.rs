use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::*;
use crate::marching::MarchingCubes;
use crate::sampling::FieldGenerator;

/// Every input needed to regenerate a field and rebuild its surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub height: usize,
    pub width: usize,
    pub depth: usize,
    /// Isosurface threshold. Noise fields span `[0, 10]`, random ones `[0, 1]`.
    pub surface_level: f32,
    pub smooth: bool,
    pub remove_bounds: bool,
    pub mode: NoiseMode,
    pub seed: i32,
    pub center: Vec3,
    pub scale: f32,
    pub frequency: Option<f32>,
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            height: 10,
            width: 10,
            depth: 10,
            surface_level: 0.5,
            smooth: false,
            remove_bounds: true,
            mode: NoiseMode::Random,
            seed: 0,
            center: Vec3::ZERO,
            scale: 1.0,
            frequency: None,
            parallel: true,
        }
    }
}

impl GridConfig {
    pub fn from_ron_str(src: &str) -> EngineResult<Self> {
        Ok(ron::from_str(src)?)
    }

    pub fn from_json_str(src: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn to_ron_string(&self) -> EngineResult<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn dims(&self) -> Dimensions {
        Dimensions::new(self.height, self.width, self.depth)
    }

    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            seed: self.seed,
            scale: self.scale,
            center: self.center,
            frequency: self.frequency,
            remove_bounds: self.remove_bounds,
        }
    }

    pub fn generator(&self) -> FieldGenerator {
        FieldGenerator::new(self.mode, self.field_params())
    }

    pub fn extractor(&self) -> MarchingCubes {
        MarchingCubes::new(self.surface_level, self.smooth).with_parallel(self.parallel)
    }

    /// Rejects any configuration the pipeline cannot run.
    pub fn validate(&self) -> EngineResult<()> {
        self.dims().validate()?;
        self.field_params().validate()?;
        if !self.surface_level.is_finite() {
            return Err(EngineError::InvalidThreshold(self.surface_level));
        }
        Ok(())
    }
}
