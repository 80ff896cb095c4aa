use fastnoise_lite::{FastNoiseLite, NoiseType};
use glam::Vec3;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::api::*;
use crate::field::ScalarField;

/// Upper end of the remapped noise range: `[-1, 1]` maps onto `[0, NOISE_RANGE]`.
pub const NOISE_RANGE: f32 = 10.0;

/// [`NoiseSampler`] backed by FastNoiseLite.
pub struct FnlSampler {
    noise: FastNoiseLite,
}

impl FnlSampler {
    pub fn new(noise_type: NoiseType, seed: i32, frequency: Option<f32>) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(noise_type));
        if frequency.is_some() {
            noise.set_frequency(frequency);
        }
        Self { noise }
    }

    /// Returns `None` for [`NoiseMode::Random`], which has no coherent sampler.
    pub fn for_mode(mode: NoiseMode, params: &FieldParams) -> Option<Self> {
        noise_type(mode).map(|t| Self::new(t, params.seed, params.frequency))
    }
}

impl NoiseSampler for FnlSampler {
    fn sample(&self, p: Vec3) -> f32 {
        self.noise.get_noise_3d(p.x, p.y, p.z)
    }
}

fn noise_type(mode: NoiseMode) -> Option<NoiseType> {
    match mode {
        NoiseMode::Random => None,
        NoiseMode::OpenSimplex2 => Some(NoiseType::OpenSimplex2),
        NoiseMode::OpenSimplex2S => Some(NoiseType::OpenSimplex2S),
        NoiseMode::Cellular => Some(NoiseType::Cellular),
        NoiseMode::Perlin => Some(NoiseType::Perlin),
        NoiseMode::Value => Some(NoiseType::Value),
        NoiseMode::ValueCubic => Some(NoiseType::ValueCubic),
    }
}

/// Maps a noise sample from `[-1, 1]` onto `[0, NOISE_RANGE]`.
#[inline]
pub fn remap_noise(n: f32) -> f32 {
    (n + 1.0) * NOISE_RANGE / 2.0
}

/// Produces scalar fields for one mode and parameter set.
///
/// Each call to [`FieldGenerator::generate`] seeds a fresh noise instance, so
/// generators with different seeds never share sampler state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGenerator {
    pub mode: NoiseMode,
    pub params: FieldParams,
}

impl FieldGenerator {
    pub fn new(mode: NoiseMode, params: FieldParams) -> Self {
        Self { mode, params }
    }

    pub fn generate(&self, dims: Dimensions) -> EngineResult<ScalarField> {
        dims.validate()?;
        self.params.validate()?;
        debug!(
            "Generating {:?} field {}x{}x{} (seed {}, scale {}, remove_bounds {})",
            self.mode, dims.height, dims.width, dims.depth, self.params.seed, self.params.scale, self.params.remove_bounds
        );

        let data = match FnlSampler::for_mode(self.mode, &self.params) {
            Some(sampler) => sample_noise(dims, &sampler, &self.params),
            None => sample_uniform(dims, self.params.seed),
        };
        finish(data, dims, &self.params)
    }

    /// Like [`FieldGenerator::generate`] but drives a caller-supplied sampler;
    /// `mode` is ignored.
    pub fn generate_with<S: NoiseSampler + ?Sized>(&self, dims: Dimensions, sampler: &S) -> EngineResult<ScalarField> {
        dims.validate()?;
        self.params.validate()?;
        finish(sample_noise(dims, sampler, &self.params), dims, &self.params)
    }
}

/// Generates a `height x width x depth` field in one call.
pub fn generate(height: usize, width: usize, depth: usize, mode: NoiseMode, params: &FieldParams) -> EngineResult<ScalarField> {
    FieldGenerator::new(mode, *params).generate(Dimensions::new(height, width, depth))
}

fn finish(mut data: Array3<f32>, dims: Dimensions, params: &FieldParams) -> EngineResult<ScalarField> {
    if params.remove_bounds {
        suppress_bounds(&mut data);
    }
    debug_assert_eq!(data.dim(), dims.shape());
    ScalarField::new(data)
}

fn sample_uniform(dims: Dimensions, seed: i32) -> Array3<f32> {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    Array3::from_shape_simple_fn(dims.shape(), || rng.gen_range(0.0..=1.0))
}

fn sample_noise<S: NoiseSampler + ?Sized>(dims: Dimensions, sampler: &S, params: &FieldParams) -> Array3<f32> {
    Array3::from_shape_fn(dims.shape(), |(x, y, z)| {
        let p = Vec3::new(x as f32, y as f32, z as f32) * params.scale + params.center;
        remap_noise(sampler.sample(p))
    })
}

/// Zeroes every sample on the six lattice faces. Lattices with any axis of
/// length 2 are left untouched, since suppression would erase them entirely.
pub fn suppress_bounds(data: &mut Array3<f32>) {
    let (h, w, d) = data.dim();
    if h == Dimensions::MIN_AXIS || w == Dimensions::MIN_AXIS || d == Dimensions::MIN_AXIS {
        return;
    }
    for ((x, y, z), v) in data.indexed_iter_mut() {
        if x == 0 || x == h - 1 || y == 0 || y == w - 1 || z == 0 || z == d - 1 {
            *v = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(f32);

    impl NoiseSampler for Constant {
        fn sample(&self, _p: Vec3) -> f32 {
            self.0
        }
    }

    /// Echoes the sampled x coordinate back, shrunk into `[-1, 1]`.
    struct Probe;

    impl NoiseSampler for Probe {
        fn sample(&self, p: Vec3) -> f32 {
            (p.x / 100.0).clamp(-1.0, 1.0)
        }
    }

    fn interior(dims: Dimensions) -> impl Iterator<Item = (usize, usize, usize)> {
        (1..dims.height - 1)
            .flat_map(move |x| (1..dims.width - 1).flat_map(move |y| (1..dims.depth - 1).map(move |z| (x, y, z))))
    }

    #[test]
    fn remap_covers_zero_to_ten() {
        assert_eq!(remap_noise(-1.0), 0.0);
        assert_eq!(remap_noise(0.0), 5.0);
        assert_eq!(remap_noise(1.0), 10.0);
    }

    #[test]
    fn random_samples_are_unit_range() {
        let params = FieldParams { remove_bounds: false, ..Default::default() };
        let field = generate(6, 5, 4, NoiseMode::Random, &params).unwrap();
        let (lo, hi) = field.min_max();
        assert!(lo >= 0.0 && hi <= 1.0);
        assert!(hi > lo, "uniform samples should not all be equal");
    }

    #[test]
    fn random_is_seeded() {
        let params = FieldParams { seed: 7, ..Default::default() };
        let a = generate(5, 5, 5, NoiseMode::Random, &params).unwrap();
        let b = generate(5, 5, 5, NoiseMode::Random, &params).unwrap();
        let c = generate(5, 5, 5, NoiseMode::Random, &FieldParams { seed: 8, ..params }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn noise_values_are_remapped() {
        let generator = FieldGenerator::new(NoiseMode::Perlin, FieldParams { remove_bounds: false, ..Default::default() });
        let field = generator.generate_with(Dimensions::new(3, 3, 3), &Constant(0.5)).unwrap();
        assert!(field.as_array().iter().all(|&v| v == 7.5));
    }

    #[test]
    fn noise_is_sampled_at_scaled_offset_positions() {
        let params = FieldParams {
            scale: 2.0,
            center: Vec3::new(10.0, 0.0, 0.0),
            remove_bounds: false,
            ..Default::default()
        };
        let field = FieldGenerator::new(NoiseMode::Value, params)
            .generate_with(Dimensions::new(4, 2, 2), &Probe)
            .unwrap();
        for x in 0..4 {
            let expected = remap_noise((x as f32 * 2.0 + 10.0) / 100.0);
            assert!((field.get(x, 1, 1) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn bounds_are_zeroed() {
        let dims = Dimensions::new(5, 4, 6);
        let generator = FieldGenerator::new(NoiseMode::Perlin, FieldParams::default());
        let field = generator.generate_with(dims, &Constant(1.0)).unwrap();
        for ((x, y, z), &v) in field.as_array().indexed_iter() {
            let on_face = x == 0 || x == 4 || y == 0 || y == 3 || z == 0 || z == 5;
            if on_face {
                assert_eq!(v, 0.0, "({x}, {y}, {z})");
            }
        }
        assert!(interior(dims).all(|(x, y, z)| field.get(x, y, z) == NOISE_RANGE));
    }

    #[test]
    fn bounds_kept_when_an_axis_is_two() {
        let generator = FieldGenerator::new(NoiseMode::Perlin, FieldParams::default());
        let field = generator.generate_with(Dimensions::new(2, 7, 7), &Constant(1.0)).unwrap();
        assert!(field.as_array().iter().all(|&v| v == NOISE_RANGE));
    }

    #[test]
    fn invalid_config_is_rejected_before_sampling() {
        assert!(matches!(
            generate(1, 4, 4, NoiseMode::Perlin, &FieldParams::default()),
            Err(EngineError::InvalidDimensions { .. })
        ));
        let params = FieldParams { scale: -1.0, ..Default::default() };
        assert!(matches!(
            generate(4, 4, 4, NoiseMode::Perlin, &params),
            Err(EngineError::InvalidScale(_))
        ));
    }

    #[test]
    fn every_noise_mode_has_a_sampler() {
        let params = FieldParams::default();
        for mode in NoiseMode::ALL {
            assert_eq!(FnlSampler::for_mode(mode, &params).is_some(), mode.is_noise());
        }
    }
}
