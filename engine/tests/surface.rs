//! End-to-end tests: generated and hand-built fields through extraction.

use approx::assert_relative_eq;
use glam::Vec3;
use isosurface_engine::{
    extract, generate, regenerate, Dimensions, EngineError, FieldParams, GridConfig, MarchingCubes, Mesh, NoiseMode,
    ScalarField,
};

/// Positive inside a sphere of `radius` around the lattice centre.
fn sphere(n: usize, radius: f32) -> ScalarField {
    let c = (n - 1) as f32 / 2.0;
    ScalarField::from_fn(Dimensions::new(n, n, n), |x, y, z| {
        radius - Vec3::new(x as f32 - c, y as f32 - c, z as f32 - c).length()
    })
    .unwrap()
}

fn signed_volume(mesh: &Mesh) -> f32 {
    mesh.triangles().map(|[a, b, c]| a.dot(b.cross(c)) / 6.0).sum()
}

fn assert_well_formed(mesh: &Mesh) {
    assert_eq!(mesh.vertex_count(), 3 * mesh.triangle_count());
    assert_eq!(mesh.normals.len(), mesh.vertex_count());
    for (i, &index) in mesh.indices.iter().enumerate() {
        assert_eq!(index as usize, i);
    }
    for n in &mesh.normals {
        let len = n.length();
        assert!(len == 0.0 || (len - 1.0).abs() < 1e-4, "normal {n:?}");
    }
}

#[test]
fn uniform_fields_have_no_surface() {
    let dims = Dimensions::new(5, 6, 7);
    let low = ScalarField::from_fn(dims, |_, _, _| 0.2).unwrap();
    let high = ScalarField::from_fn(dims, |_, _, _| 0.8).unwrap();
    for smooth in [false, true] {
        assert!(extract(&low, 0.5, smooth).unwrap().is_empty());
        assert!(extract(&high, 0.5, smooth).unwrap().is_empty());
    }
}

#[test]
fn samples_at_threshold_count_as_empty() {
    let field = ScalarField::from_fn(Dimensions::new(3, 3, 3), |_, _, _| 0.5).unwrap();
    assert!(extract(&field, 0.5, false).unwrap().is_empty());
}

#[test]
fn linear_ramp_gives_a_plane() {
    let field = ScalarField::from_fn(Dimensions::new(4, 3, 3), |x, _, _| x as f32).unwrap();

    let blocky = extract(&field, 1.3, false).unwrap();
    assert!(!blocky.is_empty());
    assert!(blocky.positions.iter().all(|p| p.x == 1.5));

    let smooth = extract(&field, 1.3, true).unwrap();
    assert_eq!(smooth.triangle_count(), blocky.triangle_count());
    for p in &smooth.positions {
        assert_relative_eq!(p.x, 1.3, epsilon = 1e-5);
    }
    // solid lies towards +x, so the surface faces -x
    for n in &smooth.normals {
        assert_relative_eq!(n.x, -1.0, epsilon = 1e-5);
    }
    assert_well_formed(&smooth);
}

#[test]
fn sphere_surface_faces_outward() {
    let radius = 3.5;
    let mesh = extract(&sphere(12, radius), 0.0, true).unwrap();
    assert_well_formed(&mesh);

    let volume = signed_volume(&mesh);
    let exact = 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3);
    assert!(volume > 0.0, "surface is inside out: {volume}");
    assert!((volume - exact).abs() / exact < 0.1, "volume {volume} vs {exact}");
}

#[test]
fn parallel_matches_sequential() {
    let field = generate(16, 12, 9, NoiseMode::OpenSimplex2, &FieldParams { seed: 3, ..Default::default() }).unwrap();
    for smooth in [false, true] {
        let par = MarchingCubes::new(5.0, smooth).with_parallel(true).extract(&field).unwrap();
        let seq = MarchingCubes::new(5.0, smooth).with_parallel(false).extract(&field).unwrap();
        assert_eq!(par, seq);
    }
}

#[test]
fn extract_into_replaces_previous_mesh() {
    let mut mesh = extract(&sphere(8, 2.5), 0.0, false).unwrap();
    assert!(!mesh.is_empty());

    let flat = ScalarField::from_fn(Dimensions::new(8, 8, 8), |_, _, _| -1.0).unwrap();
    MarchingCubes::new(0.0, false).extract_into(&flat, &mut mesh).unwrap();
    assert!(mesh.is_empty());
    assert!(mesh.positions.is_empty());
    assert!(mesh.normals.is_empty());
}

#[test]
fn noise_generation_is_deterministic() {
    let params = FieldParams { seed: 1337, ..Default::default() };
    for mode in NoiseMode::ALL {
        let a = generate(9, 8, 7, mode, &params).unwrap();
        let b = generate(9, 8, 7, mode, &params).unwrap();
        assert_eq!(a, b, "{mode:?}");
    }
}

#[test]
fn seed_changes_noise() {
    let a = generate(10, 10, 10, NoiseMode::Perlin, &FieldParams { seed: 1, ..Default::default() }).unwrap();
    let b = generate(10, 10, 10, NoiseMode::Perlin, &FieldParams { seed: 2, ..Default::default() }).unwrap();
    assert_ne!(a, b);
}

#[test]
fn generated_fields_have_zero_faces() {
    for mode in NoiseMode::ALL {
        let field = generate(6, 7, 8, mode, &FieldParams::default()).unwrap();
        let dims = field.dims();
        for ((x, y, z), &v) in field.as_array().indexed_iter() {
            if x == 0 || y == 0 || z == 0 || x == dims.height - 1 || y == dims.width - 1 || z == dims.depth - 1 {
                assert_eq!(v, 0.0, "{mode:?} at ({x}, {y}, {z})");
            }
        }
    }
}

#[test]
fn suppressed_bounds_close_the_surface() {
    // every face sample is zero, so no vertex can sit on the outer faces
    let field = generate(10, 10, 10, NoiseMode::Random, &FieldParams { seed: 5, ..Default::default() }).unwrap();
    let mesh = extract(&field, 0.5, false).unwrap();
    assert!(!mesh.is_empty());
    for p in &mesh.positions {
        assert!(p.min_element() > 0.0 && p.max_element() < 9.0, "{p:?}");
    }
}

#[test]
fn regenerate_default_config() {
    let surface = regenerate(&GridConfig::default()).unwrap();
    assert_eq!(surface.field.dims(), Dimensions::new(10, 10, 10));
    assert!(!surface.mesh.is_empty());
    assert_well_formed(&surface.mesh);
}

#[test]
fn regenerate_noise_config() {
    let config = GridConfig {
        height: 20,
        width: 16,
        depth: 12,
        mode: NoiseMode::Perlin,
        surface_level: 5.0,
        smooth: true,
        frequency: Some(0.1),
        ..Default::default()
    };
    let surface = regenerate(&config).unwrap();
    assert_well_formed(&surface.mesh);
    let max = Vec3::new(19.0, 15.0, 11.0);
    for p in &surface.mesh.positions {
        assert!(p.cmpge(Vec3::ZERO).all() && p.cmple(max).all(), "{p:?}");
    }
}

#[test]
fn regenerate_rejects_bad_config() {
    let config = GridConfig { width: 1, ..Default::default() };
    assert!(matches!(regenerate(&config), Err(EngineError::InvalidDimensions { .. })));

    let config = GridConfig { surface_level: f32::NAN, ..Default::default() };
    assert!(matches!(regenerate(&config), Err(EngineError::InvalidThreshold(_))));

    let config = GridConfig { mode: NoiseMode::Cellular, frequency: Some(0.0), ..Default::default() };
    assert!(matches!(regenerate(&config), Err(EngineError::InvalidFrequency(_))));
}
