//! Sign harmonization of principal axes.
//!
//! Eigenvectors come out of the solver with an arbitrary sign. Before
//! profiles from different subjects can be stacked, every axis must point
//! the same anatomical way. The sign is a pure function of the frame and
//! the directionality policy, so repeated application is a no-op.

use serde::{Deserialize, Serialize};

use crate::error::GradientError;
use crate::geometry::axes::AxisFrame;

/// Below this loading on its target image axis a computed axis is treated
/// as unrelated to that image axis.
pub const MIN_TARGET_LOADING: f64 = 0.25;

/// Canonical image axes after orientation normalization
/// (X: left→right, Y: posterior→anterior, Z: inferior→superior).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAxis {
    X,
    Y,
    Z,
}

impl ImageAxis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Accepts `1|2|3`, `x|y|z`, and the anatomical spellings `lr|ap|pa|si|is`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "1" | "x" | "lr" | "rl" => Some(Self::X),
            "2" | "y" | "ap" | "pa" => Some(Self::Y),
            "3" | "z" | "is" | "si" => Some(Self::Z),
            _ => None,
        }
    }

    /// Direction of increasing segment index once the axis is harmonized.
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "LR",
            Self::Y => "PA",
            Self::Z => "IS",
        }
    }
}

/// Target image axis for each computed axis, in rank order.
pub type DirectionTargets = [ImageAxis; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "targets", rename_all = "snake_case")]
pub enum DirectionalityPolicy {
    /// Supplied by the caller for every region.
    Explicit(DirectionTargets),
    /// Taken from the region prior table.
    Prior(DirectionTargets),
    /// No prior: the dominant loading of each axis is made positive.
    Fallback,
}

impl DirectionalityPolicy {
    pub fn targets(&self) -> Option<&DirectionTargets> {
        match self {
            Self::Explicit(t) | Self::Prior(t) => Some(t),
            Self::Fallback => None,
        }
    }

    pub fn axis_label(&self, axis: usize) -> String {
        match self.targets() {
            Some(t) => t[axis].label().to_string(),
            None => format!("PC{}", axis + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Full,
    /// Cross-subject sign agreement is not guaranteed.
    Degraded,
}

#[derive(Debug)]
pub struct Harmonized {
    pub frame: AxisFrame,
    pub confidence: Confidence,
    /// One `AmbiguousDirectionality` per axis that fell back to the default
    /// convention. Informational only.
    pub issues: Vec<GradientError>,
}

pub fn harmonize(frame: &AxisFrame, policy: &DirectionalityPolicy) -> Harmonized {
    let mut out = *frame;
    let mut issues = Vec::new();

    for axis in 0..3 {
        match policy.targets() {
            Some(targets) => {
                let t = targets[axis].index();
                let loading = out.axes[axis][t];
                if loading.abs() < MIN_TARGET_LOADING {
                    issues.push(GradientError::AmbiguousDirectionality {
                        axis: axis + 1,
                        reason: format!(
                            "loading {:.3} on image axis {:?} is below {}",
                            loading, targets[axis], MIN_TARGET_LOADING
                        ),
                    });
                    orient_dominant(&mut out, axis);
                } else if loading < 0.0 {
                    out.flip(axis);
                }
            }
            None => orient_dominant(&mut out, axis),
        }
    }

    if matches!(policy, DirectionalityPolicy::Fallback) {
        issues.push(GradientError::AmbiguousDirectionality {
            axis: 0,
            reason: "no directionality prior for region; using dominant-loading convention"
                .to_string(),
        });
    }

    let confidence = if issues.is_empty() {
        Confidence::Full
    } else {
        Confidence::Degraded
    };
    Harmonized {
        frame: out,
        confidence,
        issues,
    }
}

/// Largest-magnitude component positive; ties go to the lower image axis.
fn orient_dominant(frame: &mut AxisFrame, axis: usize) {
    let v = frame.axes[axis];
    let mut dominant = 0;
    for d in 1..3 {
        if v[d].abs() > v[dominant].abs() {
            dominant = d;
        }
    }
    if v[dominant] < 0.0 {
        frame.flip(axis);
    }
}
