use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::geometry::orient::Confidence;
use crate::io::design::GroupSpec;
use crate::io::labels::Region;
use crate::priors::FlipRules;
use crate::profile::cohort::{CohortProfile, combine_profiles};
use crate::profile::subject::RegionProfiles;

#[derive(Debug, Clone, PartialEq)]
pub enum SubjectOutcome {
    Profiled(RegionProfiles),
    Missing { reason: String },
}

impl SubjectOutcome {
    pub fn profiles(&self) -> Option<&RegionProfiles> {
        match self {
            Self::Profiled(p) => Some(p),
            Self::Missing { .. } => None,
        }
    }
}

/// One subject × region result, indexed into the design.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    pub group: usize,
    pub subject: usize,
    pub region: u32,
    pub outcome: SubjectOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubjectStatus {
    Ok {
        n_voxels: usize,
        confidence: Confidence,
    },
    Missing {
        reason: String,
    },
}

/// Everything known about one (group, region) after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionResult {
    pub group: String,
    pub region: u32,
    pub region_name: Option<String>,
    pub subjects: Vec<String>,
    pub covariate_names: Vec<String>,
    /// `covariates[subject]`, verbatim from the design.
    pub covariates: Vec<Vec<String>>,
    pub status: Vec<SubjectStatus>,
    pub axes: Vec<CohortProfile>,
    /// Per-subject details (axis vectors, counts), `None` when missing.
    pub details: Vec<Option<RegionProfiles>>,
}

impl RegionResult {
    pub fn n_missing(&self) -> usize {
        self.status
            .iter()
            .filter(|s| matches!(s, SubjectStatus::Missing { .. }))
            .count()
    }

    pub fn n_degraded(&self) -> usize {
        self.status
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    SubjectStatus::Ok {
                        confidence: Confidence::Degraded,
                        ..
                    }
                )
            })
            .count()
    }
}

/// Merge the outcomes of every subject of `group` for `region`.
/// `outcomes[i]` belongs to `group.subjects[i]`; `None` is treated as
/// missing.
pub fn combine_region(
    group: &GroupSpec,
    covariate_names: &[String],
    region: &Region,
    outcomes: &[Option<&SubjectOutcome>],
    config: &AnalysisConfig,
    flips: &FlipRules,
) -> RegionResult {
    let details: Vec<Option<RegionProfiles>> = outcomes
        .iter()
        .map(|o| o.and_then(SubjectOutcome::profiles).cloned())
        .collect();

    let status = outcomes
        .iter()
        .map(|o| match o {
            Some(SubjectOutcome::Profiled(p)) => SubjectStatus::Ok {
                n_voxels: p.n_voxels,
                confidence: p.confidence,
            },
            Some(SubjectOutcome::Missing { reason }) => SubjectStatus::Missing {
                reason: reason.clone(),
            },
            None => SubjectStatus::Missing {
                reason: "no result recorded".to_string(),
            },
        })
        .collect();

    let mut axes = Vec::with_capacity(config.axes.len());
    for &axis in &config.axes {
        let n_segments = config.segments_for(axis);
        let columns: Vec<Option<&[f64]>> = details
            .iter()
            .map(|d| {
                d.as_ref()
                    .and_then(|p| p.axes.iter().find(|a| a.axis == axis))
                    .map(|a| a.values.as_slice())
            })
            .collect();
        let label = details
            .iter()
            .flatten()
            .flat_map(|p| p.axes.iter())
            .find(|a| a.axis == axis)
            .map(|a| a.label.clone())
            .unwrap_or_else(|| format!("PC{}", axis));

        let mut cohort = combine_profiles(axis, &label, n_segments, &columns);
        if config.posthoc_flips {
            if let Some(rule) = flips.matching(region.code, axis) {
                if cohort.label == rule.from {
                    debug!(rule = %rule.rule, region = region.code, axis, "posthoc flip");
                    cohort.reverse(&rule.rule, &rule.label);
                } else {
                    warn!(
                        rule = %rule.rule,
                        region = region.code,
                        axis,
                        expected = %rule.from,
                        found = %cohort.label,
                        "posthoc flip skipped: axis orientation differs from rule"
                    );
                }
            }
        }
        axes.push(cohort);
    }

    RegionResult {
        group: group.name.clone(),
        region: region.code,
        region_name: region.name.clone(),
        subjects: group.subjects.iter().map(|s| s.id.clone()).collect(),
        covariate_names: covariate_names.to_vec(),
        covariates: group.subjects.iter().map(|s| s.covariates.clone()).collect(),
        status,
        axes,
        details,
    }
}
