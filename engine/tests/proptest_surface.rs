//! Property-based tests over random scalar fields.

use glam::Vec3;
use isosurface_engine::{Dimensions, MarchingCubes, Mesh, ScalarField};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_dims() -> impl Strategy<Value = Dimensions> {
    (2usize..6, 2usize..6, 2usize..6).prop_map(|(h, w, d)| Dimensions::new(h, w, d))
}

/// A field of the given shape with samples in `[0, 1]`.
fn arb_field() -> impl Strategy<Value = ScalarField> {
    arb_dims().prop_flat_map(|dims| {
        prop::collection::vec(0.0f32..=1.0, dims.sample_count())
            .prop_map(move |values| ScalarField::from_vec(dims, values).unwrap())
    })
}

fn is_integral(v: f32) -> bool {
    v.fract() == 0.0
}

fn inside_lattice(p: Vec3, dims: Dimensions) -> bool {
    let max = Vec3::new((dims.height - 1) as f32, (dims.width - 1) as f32, (dims.depth - 1) as f32);
    p.cmpge(Vec3::ZERO).all() && p.cmple(max).all()
}

fn extract(field: &ScalarField, threshold: f32, smooth: bool, parallel: bool) -> Mesh {
    MarchingCubes::new(threshold, smooth)
        .with_parallel(parallel)
        .extract(field)
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn blocky_vertices_sit_on_edge_midpoints(field in arb_field(), threshold in 0.05f32..0.95) {
        let mesh = extract(&field, threshold, false, true);
        for p in &mesh.positions {
            let halves = p.to_array().iter().filter(|v| v.fract() == 0.5).count();
            let whole = p.to_array().iter().filter(|v| is_integral(**v)).count();
            prop_assert_eq!((halves, whole), (1, 2), "vertex {:?}", p);
            prop_assert!(inside_lattice(*p, field.dims()));
        }
    }

    #[test]
    fn smooth_vertices_stay_on_lattice_edges(field in arb_field(), threshold in 0.05f32..0.95) {
        let mesh = extract(&field, threshold, true, true);
        for p in &mesh.positions {
            let whole = p.to_array().iter().filter(|v| is_integral(**v)).count();
            prop_assert!(whole >= 2, "vertex {:?} is off the lattice edges", p);
            prop_assert!(inside_lattice(*p, field.dims()), "vertex {:?} escaped", p);
        }
    }

    #[test]
    fn mesh_layout_is_unwelded(field in arb_field(), threshold in 0.05f32..0.95, smooth in any::<bool>()) {
        let mesh = extract(&field, threshold, smooth, true);
        prop_assert_eq!(mesh.vertex_count(), mesh.triangle_count() * 3);
        prop_assert_eq!(mesh.normals.len(), mesh.vertex_count());
        prop_assert!(mesh.indices.iter().enumerate().all(|(i, &index)| index as usize == i));
        for n in &mesh.normals {
            let len = n.length();
            prop_assert!(len == 0.0 || (len - 1.0).abs() < 1e-4, "normal {:?}", n);
        }
    }

    #[test]
    fn parallel_walk_is_deterministic(field in arb_field(), threshold in 0.05f32..0.95, smooth in any::<bool>()) {
        prop_assert_eq!(
            extract(&field, threshold, smooth, true),
            extract(&field, threshold, smooth, false)
        );
    }

    #[test]
    fn thresholds_outside_the_range_are_empty(field in arb_field(), smooth in any::<bool>()) {
        prop_assert!(extract(&field, 1.0, smooth, true).is_empty());
        prop_assert!(extract(&field, -0.01, smooth, true).is_empty());
    }

    #[test]
    fn triangle_count_matches_configurations(field in arb_field(), threshold in 0.05f32..0.95) {
        let dims = field.dims();
        let mut expected = 0;
        for x in 0..dims.height - 1 {
            for y in 0..dims.width - 1 {
                for z in 0..dims.depth - 1 {
                    let cell = isosurface_engine::CellSample::gather(&field, x, y, z);
                    expected += isosurface_engine::tables::triangle_count(cell.configuration(threshold));
                }
            }
        }
        prop_assert_eq!(extract(&field, threshold, false, true).triangle_count(), expected);
    }
}
