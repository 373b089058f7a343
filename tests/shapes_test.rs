use phong_desk::shapes::{self, ShapeData};

mod common;

fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn default_shapes_are_well_formed() {
    let generated: Vec<ShapeData> = vec![
        shapes::make_plane(shapes::DEFAULT_PLANE_DIMENSIONS).unwrap(),
        shapes::make_sphere(shapes::DEFAULT_SPHERE_TESSELATION).unwrap(),
        shapes::make_cylinder(1.0, 1.0, shapes::DEFAULT_CYLINDER_SLICES).unwrap(),
        shapes::make_box([-1.0; 3], [1.0; 3]).unwrap(),
    ];
    for shape in &generated {
        common::assert_well_formed(shape);
    }
}

#[test]
fn counts_follow_the_parameters() {
    let plane = shapes::make_plane(10).unwrap();
    assert_eq!(plane.vertices.len(), 100);
    assert_eq!(plane.num_indices(), 9 * 9 * 6);

    let sphere = shapes::make_sphere(20).unwrap();
    assert_eq!(sphere.vertices.len(), 21 * 21);
    assert_eq!(sphere.num_indices(), 6 * 20 * 19);

    let cylinder = shapes::make_cylinder(1.0, 3.0, 500).unwrap();
    assert_eq!(cylinder.vertices.len(), 4 * 500 + 6);
    assert_eq!(cylinder.num_indices(), 12 * 500);

    let cube = shapes::make_box([0.0; 3], [1.0; 3]).unwrap();
    assert_eq!((cube.vertices.len(), cube.indices.len()), (24, 36));
}

#[test]
fn buffer_sizes_match_the_upload() {
    let shape = shapes::make_box([0.0; 3], [1.0; 3]).unwrap();
    assert_eq!(shape.vertex_buffer_size(), 24 * 32);
    assert_eq!(shape.index_buffer_size(), 36 * 2);
}

#[test]
fn shapes_span_the_requested_extent() {
    let (min, max) = common::bounds(&shapes::make_plane(5).unwrap());
    assert!(approx(min, [-2.0, 0.0, -2.0]));
    assert!(approx(max, [2.0, 0.0, 2.0]));

    let (min, max) = common::bounds(&shapes::make_cylinder(0.6, 2.25, 200).unwrap());
    assert!(approx(min, [-0.6, -1.125, -0.6]));
    assert!(approx(max, [0.6, 1.125, 0.6]));

    let (min, max) = common::bounds(&shapes::make_box([-1.8, 0.0, -0.7], [1.8, 0.45, 0.7]).unwrap());
    assert!(approx(min, [-1.8, 0.0, -0.7]));
    assert!(approx(max, [1.8, 0.45, 0.7]));

    let (min, max) = common::bounds(&shapes::make_sphere(4).unwrap());
    assert!(approx(min, [-1.0; 3]));
    assert!(approx(max, [1.0; 3]));
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(shapes::make_plane(1).is_err());
    assert!(shapes::make_sphere(2).is_err());
    assert!(shapes::make_cylinder(1.0, 1.0, 2).is_err());
    assert!(shapes::make_cylinder(0.0, 1.0, 8).is_err());
    assert!(shapes::make_cylinder(1.0, f32::NAN, 8).is_err());
    assert!(shapes::make_box([0.0; 3], [1.0, 0.0, 1.0]).is_err());

    let err = shapes::make_plane(300).unwrap_err().to_string();
    assert!(err.contains("16-bit"), "unexpected message: {err}");
}
