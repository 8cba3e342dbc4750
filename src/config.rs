use serde::Serialize;

use crate::error::GradientError;
use crate::geometry::orient::{DirectionTargets, ImageAxis};
use crate::geometry::segment::SegmentPolicy;
use crate::profile::aggregate::Statistic;

pub const DEFAULT_SEGMENTS: usize = 7;

/// Immutable analysis settings handed to every subject task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Requested axis ranks, 1-based, ascending and unique.
    pub axes: Vec<usize>,
    /// Segment count per axis rank (index 0 is axis 1).
    pub n_segments: [usize; 3],
    pub policy: SegmentPolicy,
    pub statistic: Statistic,
    pub erode: bool,
    pub invert: bool,
    pub baseline: bool,
    /// Caller-supplied target image axis per computed axis.
    pub direction: Option<DirectionTargets>,
    /// Label whose voxels define the axes instead of the target region.
    pub alt_roi: Option<u32>,
    /// Abort the batch on the first subject failure.
    pub strict: bool,
    pub posthoc_flips: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            axes: vec![1, 2, 3],
            n_segments: [DEFAULT_SEGMENTS; 3],
            policy: SegmentPolicy::Equidistance,
            statistic: Statistic::Median,
            erode: false,
            invert: false,
            baseline: false,
            direction: None,
            alt_roi: None,
            strict: false,
            posthoc_flips: true,
        }
    }
}

impl AnalysisConfig {
    pub fn segments_for(&self, axis: usize) -> usize {
        self.n_segments[axis - 1]
    }

    /// Select axes, dropping duplicates.
    pub fn set_axes(&mut self, axes: &[usize]) -> Result<(), GradientError> {
        if axes.is_empty() {
            return Err(GradientError::InvalidConfig(
                "at least one axis must be selected".to_string(),
            ));
        }
        let mut sorted = axes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        if let Some(bad) = sorted.iter().find(|a| !(1..=3).contains(*a)) {
            return Err(GradientError::InvalidConfig(format!(
                "axis {} out of range (1-3)",
                bad
            )));
        }
        self.axes = sorted;
        Ok(())
    }

    /// One value applies to every axis; otherwise one value per selected
    /// axis, in the order of `axes`.
    pub fn set_segments(&mut self, values: &[usize]) -> Result<(), GradientError> {
        if values.iter().any(|&n| n == 0) {
            return Err(GradientError::InvalidConfig(
                "segment counts must be positive".to_string(),
            ));
        }
        match values.len() {
            0 => {}
            1 => self.n_segments = [values[0]; 3],
            n if n == self.axes.len() => {
                for (axis, &count) in self.axes.iter().zip(values) {
                    self.n_segments[axis - 1] = count;
                }
            }
            n => {
                return Err(GradientError::InvalidConfig(format!(
                    "got {} segment counts for {} selected axes",
                    n,
                    self.axes.len()
                )));
            }
        }
        Ok(())
    }

    pub fn uses_alternative_axes(&self) -> bool {
        self.alt_roi.is_some()
    }
}

/// Three distinct image axes, one per computed axis, e.g. `["y", "z", "x"]`.
pub fn parse_direction(tokens: &[String]) -> Result<DirectionTargets, GradientError> {
    if tokens.len() != 3 {
        return Err(GradientError::InvalidConfig(format!(
            "direction needs 3 image axes, got {}",
            tokens.len()
        )));
    }
    let mut targets = [ImageAxis::X; 3];
    for (slot, token) in targets.iter_mut().zip(tokens) {
        *slot = ImageAxis::parse(token).ok_or_else(|| {
            GradientError::InvalidConfig(format!("unknown image axis '{}'", token))
        })?;
    }
    if targets[0] == targets[1] || targets[0] == targets[2] || targets[1] == targets[2] {
        return Err(GradientError::InvalidConfig(format!(
            "direction axes must be distinct: {}",
            tokens.join(",")
        )));
    }
    Ok(targets)
}
