use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradientError {
    #[error("missing input {path} for subject '{subject}': {reason}")]
    MissingInput {
        subject: String,
        path: PathBuf,
        reason: String,
    },
    #[error("shape mismatch for subject '{subject}': map {map:?} vs segmentation {seg:?}")]
    DimensionMismatch {
        subject: String,
        map: [usize; 3],
        seg: [usize; 3],
    },
    #[error("region has a degenerate voxel cloud ({voxels} voxels): {reason}")]
    DegenerateRegion { voxels: usize, reason: String },
    #[error("directionality for axis {axis} is ambiguous: {reason}")]
    AmbiguousDirectionality { axis: usize, reason: String },
    #[error("failed to write results to {path}: {source}")]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid orientation in {path}: {reason}")]
    Orientation { path: PathBuf, reason: String },
    #[error("{what}: expected {expected} values, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GradientError {
    /// Subject-level problems that are absorbed into a missing profile
    /// unless strict mode is on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::DegenerateRegion { .. } | Self::Orientation { .. }
        )
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistenceFailure {
            path: path.into(),
            source,
        }
    }
}

impl GradientError {
    /// Attach the subject identifier to errors raised by collaborators that
    /// only know about paths.
    pub fn for_subject(self, id: &str) -> Self {
        match self {
            Self::MissingInput { path, reason, .. } => Self::MissingInput {
                subject: id.to_string(),
                path,
                reason,
            },
            Self::DimensionMismatch { map, seg, .. } => Self::DimensionMismatch {
                subject: id.to_string(),
                map,
                seg,
            },
            other => other,
        }
    }
}
