use kira_gradients::geometry::segment::{SegmentPolicy, segment};

#[test]
fn equidistance_edges() {
    let p: Vec<f64> = (0..=10).map(|i| i as f64).collect();
    let a = segment(&p, 5, SegmentPolicy::Equidistance);
    assert_eq!(a.labels, vec![1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 5]);
    assert_eq!(a.proj_min, 0.0);
    assert_eq!(a.proj_max, 10.0);
    assert_eq!(a.counts(), vec![2, 2, 2, 2, 3]);
}

#[test]
fn equidistance_keeps_empty_segments() {
    let p = vec![0.0, 0.1, 9.9, 10.0];
    let a = segment(&p, 5, SegmentPolicy::Equidistance);
    assert_eq!(a.counts(), vec![2, 0, 0, 0, 2]);
}

#[test]
fn equidistance_zero_range() {
    let a = segment(&[3.0, 3.0, 3.0], 4, SegmentPolicy::Equidistance);
    assert_eq!(a.labels, vec![1, 1, 1]);
}

#[test]
fn equivolume_balanced_with_trailing_remainder() {
    let p: Vec<f64> = (0..23).rev().map(|i| i as f64).collect();
    let a = segment(&p, 5, SegmentPolicy::Equivolume);
    let counts = a.counts();
    assert_eq!(counts, vec![4, 4, 5, 5, 5]);
    let max = *counts.iter().max().unwrap();
    let min = *counts.iter().min().unwrap();
    assert!(max - min <= 1);
    // Lowest projection lands in the first segment.
    assert_eq!(a.labels[22], 1);
    assert_eq!(a.labels[0], 5);
}

#[test]
fn equivolume_fewer_voxels_than_segments() {
    let a = segment(&[2.0, 1.0], 4, SegmentPolicy::Equivolume);
    assert_eq!(a.counts(), vec![0, 0, 1, 1]);
    assert_eq!(a.labels, vec![4, 3]);
}

#[test]
fn empty_cloud() {
    let a = segment(&[], 7, SegmentPolicy::Equivolume);
    assert!(a.is_empty());
    assert_eq!(a.counts(), vec![0; 7]);
    assert!(a.proj_min.is_nan());
}
