use serde::{Deserialize, Serialize};

use crate::geometry::segment::SegmentAssignment;
use crate::math::stats::{mean, median};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Median,
    Mean,
}

impl Statistic {
    /// NaN for an empty slice. May reorder `values`.
    pub fn apply(self, values: &mut [f64]) -> f64 {
        match self {
            Self::Median => median(values),
            Self::Mean => mean(values),
        }
    }
}

/// Background and masked-out voxels carry zero or non-finite values.
pub fn is_valid(v: f32) -> bool {
    v.is_finite() && v != 0.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentProfile {
    /// One statistic per segment, segment 1 first. NaN iff the segment had
    /// no valid voxel.
    pub values: Vec<f64>,
    /// Valid voxels per segment.
    pub counts: Vec<usize>,
    /// Region-wide statistic that was subtracted, when baseline removal is on.
    pub baseline: Option<f64>,
}

pub fn aggregate_segments(
    assignment: &SegmentAssignment,
    values: &[f32],
    statistic: Statistic,
    subtract_baseline: bool,
) -> SegmentProfile {
    let n = assignment.n_segments;
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); n];
    for (&label, &v) in assignment.labels.iter().zip(values.iter()) {
        if is_valid(v) {
            buckets[label - 1].push(v as f64);
        }
    }
    let counts: Vec<usize> = buckets.iter().map(Vec::len).collect();

    let mut out: Vec<f64> = buckets
        .iter_mut()
        .map(|b| statistic.apply(b.as_mut_slice()))
        .collect();

    let baseline = if subtract_baseline {
        let mut all: Vec<f64> = buckets.into_iter().flatten().collect();
        let base = statistic.apply(&mut all);
        for v in out.iter_mut() {
            *v -= base;
        }
        Some(base)
    } else {
        None
    };

    SegmentProfile {
        values: out,
        counts,
        baseline,
    }
}
