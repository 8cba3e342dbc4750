//! Per-subject pipeline: axes → harmonization → segmentation → profile.
//!
//! Everything here is a pure function of the subject's volumes and the
//! analysis configuration, so subjects can run on any worker in any order.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::GradientError;
use crate::geometry::axes::{AxisFrame, solve_axes};
use crate::geometry::cloud::VoxelCloud;
use crate::geometry::orient::{Confidence, DirectionalityPolicy, harmonize};
use crate::geometry::segment::segment;
use crate::io::design::SubjectSpec;
use crate::io::volume::{Orientation, Volume, VolumeLoader};
use crate::profile::aggregate::aggregate_segments;

#[derive(Debug, Clone)]
pub struct SubjectVolumes {
    pub map: Volume,
    pub seg: Volume,
    pub alt_seg: Option<Volume>,
}

/// Load and pair a subject's volumes. Shape disagreement after orientation
/// normalization is a pairing bug upstream and is reported as such.
pub fn load_subject(
    subject: &SubjectSpec,
    loader: &dyn VolumeLoader,
) -> Result<SubjectVolumes, GradientError> {
    let map = loader
        .load(&subject.map)
        .map_err(|e| e.for_subject(&subject.id))?;
    let seg = loader
        .load(&subject.seg)
        .map_err(|e| e.for_subject(&subject.id))?;
    let alt_seg = match &subject.alt_seg {
        Some(path) => Some(loader.load(path).map_err(|e| e.for_subject(&subject.id))?),
        None => None,
    };

    for other in std::iter::once(&map).chain(alt_seg.as_ref()) {
        if other.dims != seg.dims {
            return Err(GradientError::DimensionMismatch {
                subject: subject.id.clone(),
                map: other.dims,
                seg: seg.dims,
            });
        }
    }
    Ok(SubjectVolumes { map, seg, alt_seg })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisProfile {
    /// 1-based axis rank.
    pub axis: usize,
    pub label: String,
    pub values: Vec<f64>,
    pub counts: Vec<usize>,
    pub baseline: Option<f64>,
    pub vector: [f64; 3],
    pub sign: i8,
    pub eigenvalue: f64,
    pub proj_min: f64,
    pub proj_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionProfiles {
    pub region: u32,
    pub n_voxels: usize,
    /// Inclusive canonical voxel bounds of the region.
    pub bbox: Option<([usize; 3], [usize; 3])>,
    /// Stored-to-canonical mapping of the parameter map.
    pub orientation: Orientation,
    pub policy: DirectionalityPolicy,
    pub confidence: Confidence,
    pub alternative_axes: bool,
    pub axes: Vec<AxisProfile>,
    pub notes: Vec<String>,
}

pub fn profile_region(
    volumes: &SubjectVolumes,
    region: u32,
    config: &AnalysisConfig,
    policy: &DirectionalityPolicy,
) -> Result<RegionProfiles, GradientError> {
    let mut target = VoxelCloud::from_label(&volumes.seg, Some(&volumes.map), region, config.erode);
    if config.invert {
        target.invert_values();
    }

    let frame = fit_frame(volumes, &target, region, config)?;
    let harmonized = harmonize(&frame, policy);
    let frame = harmonized.frame;

    let mut axes = Vec::with_capacity(config.axes.len());
    for &axis in &config.axes {
        let rank = axis - 1;
        let projections = frame.project_cloud(rank, &target);
        let assignment = segment(&projections, config.segments_for(axis), config.policy);
        let profile = aggregate_segments(
            &assignment,
            target.values(),
            config.statistic,
            config.baseline,
        );
        axes.push(AxisProfile {
            axis,
            label: policy.axis_label(rank),
            values: profile.values,
            counts: profile.counts,
            baseline: profile.baseline,
            vector: frame.axes[rank],
            sign: frame.signs[rank],
            eigenvalue: frame.eigenvalues[rank],
            proj_min: assignment.proj_min,
            proj_max: assignment.proj_max,
        });
    }

    Ok(RegionProfiles {
        region,
        n_voxels: target.len(),
        bbox: target.bounding_box(),
        orientation: volumes.map.orientation,
        policy: *policy,
        confidence: harmonized.confidence,
        alternative_axes: config.uses_alternative_axes() || volumes.alt_seg.is_some(),
        axes,
        notes: harmonized.issues.iter().map(ToString::to_string).collect(),
    })
}

/// Axes come from the target region, or from the alternative label (in the
/// alternative segmentation when one is paired) re-centred on the target.
fn fit_frame(
    volumes: &SubjectVolumes,
    target: &VoxelCloud,
    region: u32,
    config: &AnalysisConfig,
) -> Result<AxisFrame, GradientError> {
    if config.alt_roi.is_none() && volumes.alt_seg.is_none() {
        return solve_axes(target);
    }
    let source = volumes.alt_seg.as_ref().unwrap_or(&volumes.seg);
    let label = config.alt_roi.unwrap_or(region);
    let alt = VoxelCloud::from_label(source, None, label, config.erode);
    let frame = solve_axes(&alt)?;
    Ok(match target.centroid() {
        Some(c) => frame.recentered(c),
        None => frame,
    })
}
