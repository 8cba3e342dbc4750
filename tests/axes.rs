use kira_gradients::error::GradientError;
use kira_gradients::geometry::axes::{solve_axes, solve_axes_from_points};
use kira_gradients::geometry::cloud::VoxelCloud;
use kira_gradients::geometry::eigen::dot;

fn box_cloud(nx: usize, ny: usize, nz: usize) -> VoxelCloud {
    let mut points = Vec::new();
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                points.push([x, y, z]);
            }
        }
    }
    let values = vec![1.0; points.len()];
    VoxelCloud::new(points, values).unwrap()
}

#[test]
fn elongated_box_axes_follow_extent() {
    let frame = solve_axes(&box_cloud(12, 6, 3)).unwrap();
    assert!(frame.axes[0][0].abs() > 0.999);
    assert!(frame.axes[1][1].abs() > 0.999);
    assert!(frame.axes[2][2].abs() > 0.999);
    assert_eq!(frame.centroid, [5.5, 2.5, 1.0]);
    assert_eq!(frame.signs, [1, 1, 1]);
}

#[test]
fn axes_orthonormal_and_ranked() {
    let mut points = Vec::new();
    for i in 0..40 {
        let t = i as f64;
        points.push([t, 0.5 * t + (i % 3) as f64, (i % 5) as f64]);
    }
    let frame = solve_axes_from_points(&points).unwrap();
    for i in 0..3 {
        assert!((dot(&frame.axes[i], &frame.axes[i]) - 1.0).abs() < 1e-10);
        for j in (i + 1)..3 {
            assert!(dot(&frame.axes[i], &frame.axes[j]).abs() < 1e-10);
        }
    }
    assert!(frame.eigenvalues[0] >= frame.eigenvalues[1]);
    assert!(frame.eigenvalues[1] >= frame.eigenvalues[2]);
}

#[test]
fn two_voxels_are_degenerate() {
    let cloud = VoxelCloud::new(vec![[0, 0, 0], [1, 0, 0]], vec![1.0, 1.0]).unwrap();
    let err = solve_axes(&cloud).unwrap_err();
    assert!(matches!(err, GradientError::DegenerateRegion { voxels: 2, .. }));
    assert!(err.is_recoverable());
}

#[test]
fn planar_cloud_is_degenerate() {
    let cloud = box_cloud(5, 5, 1);
    let err = solve_axes(&cloud).unwrap_err();
    assert!(matches!(err, GradientError::DegenerateRegion { voxels: 25, .. }));
}

#[test]
fn projection_and_flip() {
    let mut frame = solve_axes(&box_cloud(12, 6, 3)).unwrap();
    let p = [frame.centroid[0] + 2.0, frame.centroid[1], frame.centroid[2]];
    let before = frame.project(0, p);
    frame.flip(0);
    assert_eq!(frame.project(0, p), -before);
    assert_eq!(frame.signs[0], -1);

    let moved = frame.recentered([0.0, 0.0, 0.0]);
    assert_eq!(moved.axes, frame.axes);
    assert_eq!(moved.centroid, [0.0, 0.0, 0.0]);
}
