use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentPolicy {
    /// Equal spatial width per segment.
    Equidistance,
    /// Equal voxel count per segment.
    Equivolume,
}

/// Segment index (1..=N) per voxel, in the voxel order of the cloud that
/// was projected.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAssignment {
    pub n_segments: usize,
    pub labels: Vec<usize>,
    pub proj_min: f64,
    pub proj_max: f64,
}

impl SegmentAssignment {
    /// No voxels to assign; every segment of the resulting profile is NaN.
    pub fn empty(n_segments: usize) -> Self {
        Self {
            n_segments,
            labels: Vec::new(),
            proj_min: f64::NAN,
            proj_max: f64::NAN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_segments];
        for &l in &self.labels {
            counts[l - 1] += 1;
        }
        counts
    }
}

pub fn segment(projections: &[f64], n_segments: usize, policy: SegmentPolicy) -> SegmentAssignment {
    let n_segments = n_segments.max(1);
    if projections.is_empty() {
        return SegmentAssignment::empty(n_segments);
    }
    let (proj_min, proj_max) = projections
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });

    let labels = match policy {
        SegmentPolicy::Equidistance => equidistance(projections, n_segments, proj_min, proj_max),
        SegmentPolicy::Equivolume => equivolume(projections, n_segments),
    };
    SegmentAssignment {
        n_segments,
        labels,
        proj_min,
        proj_max,
    }
}

/// Half-open bins `[lo, hi)` except the last, which also takes the maximum.
fn equidistance(projections: &[f64], n: usize, lo: f64, hi: f64) -> Vec<usize> {
    let range = hi - lo;
    if !(range > 0.0) {
        return vec![1; projections.len()];
    }
    projections
        .iter()
        .map(|&p| {
            let bin = ((p - lo) / range * n as f64).floor() as usize;
            bin.min(n - 1) + 1
        })
        .collect()
}

/// Contiguous blocks of the sorted projections; the `len % n` leftover
/// voxels go one each to the trailing blocks.
fn equivolume(projections: &[f64], n: usize) -> Vec<usize> {
    let len = projections.len();
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| projections[a].total_cmp(&projections[b]));

    let base = len / n;
    let rem = len % n;
    let mut labels = vec![0usize; len];
    let mut pos = 0usize;
    for block in 0..n {
        let size = if block >= n - rem { base + 1 } else { base };
        for &voxel in &order[pos..pos + size] {
            labels[voxel] = block + 1;
        }
        pos += size;
    }
    labels
}
