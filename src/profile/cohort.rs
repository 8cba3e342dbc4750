use serde::Serialize;

use crate::math::stats::ValidAccumulator;

/// Record of a presentational flip applied after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFlip {
    pub rule: String,
    pub from_label: String,
}

/// Cohort view of one (group, region, axis).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortProfile {
    /// 1-based axis rank.
    pub axis: usize,
    pub label: String,
    pub n_segments: usize,
    /// Normalized segment centers in (0, 1].
    pub coords: Vec<f64>,
    /// `matrix[segment][subject]`; a missing subject is an all-NaN column.
    pub matrix: Vec<Vec<f64>>,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub sem: Vec<f64>,
    pub n_valid: Vec<usize>,
    pub flip: Option<AppliedFlip>,
}

pub fn segment_coords(n_segments: usize) -> Vec<f64> {
    (0..n_segments)
        .map(|i| (i as f64 + 0.5) / n_segments as f64)
        .collect()
}

/// Stack per-subject profiles (`None` for a missing subject) and compute
/// NaN-aware mean, std and SEM per segment.
pub fn combine_profiles(
    axis: usize,
    label: &str,
    n_segments: usize,
    profiles: &[Option<&[f64]>],
) -> CohortProfile {
    let mut matrix = vec![vec![f64::NAN; profiles.len()]; n_segments];
    for (subject, profile) in profiles.iter().enumerate() {
        if let Some(values) = profile {
            for (segment, row) in matrix.iter_mut().enumerate() {
                row[subject] = values.get(segment).copied().unwrap_or(f64::NAN);
            }
        }
    }

    let mut mean = Vec::with_capacity(n_segments);
    let mut std = Vec::with_capacity(n_segments);
    let mut sem = Vec::with_capacity(n_segments);
    let mut n_valid = Vec::with_capacity(n_segments);
    for row in &matrix {
        let mut acc = ValidAccumulator::new();
        for &v in row {
            acc.push(v);
        }
        mean.push(acc.mean());
        std.push(acc.std());
        sem.push(acc.sem());
        n_valid.push(acc.n_valid());
    }

    CohortProfile {
        axis,
        label: label.to_string(),
        n_segments,
        coords: segment_coords(n_segments),
        matrix,
        mean,
        std,
        sem,
        n_valid,
        flip: None,
    }
}

impl CohortProfile {
    /// Reverse segment order end to end. Values, statistics and counts move
    /// together; coordinates keep their ascending positions.
    pub fn reverse(&mut self, rule: &str, new_label: &str) {
        self.matrix.reverse();
        self.mean.reverse();
        self.std.reverse();
        self.sem.reverse();
        self.n_valid.reverse();
        let from_label = std::mem::replace(&mut self.label, new_label.to_string());
        self.flip = Some(AppliedFlip {
            rule: rule.to_string(),
            from_label,
        });
    }

    pub fn subject_column(&self, subject: usize) -> Vec<f64> {
        self.matrix.iter().map(|row| row[subject]).collect()
    }
}
