use serde::{Deserialize, Serialize};

use crate::error::GradientError;
use crate::geometry::cloud::VoxelCloud;
use crate::geometry::eigen::{dot, symmetric_eigen3};

pub const MIN_VOXELS: usize = 4;
const RANK_TOLERANCE: f64 = 1e-10;

/// Orthonormal frame ranked by explained variance: `axes[0]` spans the
/// largest spatial extent of the region, `axes[2]` the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisFrame {
    pub centroid: [f64; 3],
    pub axes: [[f64; 3]; 3],
    pub eigenvalues: [f64; 3],
    /// Cumulative sign applied to each raw eigenvector by harmonization.
    pub signs: [i8; 3],
}

impl AxisFrame {
    /// Signed distance of `p` from the centroid along `axes[axis]`.
    pub fn project(&self, axis: usize, p: [f64; 3]) -> f64 {
        let d = [
            p[0] - self.centroid[0],
            p[1] - self.centroid[1],
            p[2] - self.centroid[2],
        ];
        dot(&d, &self.axes[axis])
    }

    pub fn project_cloud(&self, axis: usize, cloud: &VoxelCloud) -> Vec<f64> {
        cloud
            .positions()
            .into_iter()
            .map(|p| self.project(axis, p))
            .collect()
    }

    pub fn flip(&mut self, axis: usize) {
        for c in self.axes[axis].iter_mut() {
            *c = -*c;
        }
        self.signs[axis] = -self.signs[axis];
    }

    /// Same axes, centred on another cloud. Used when the frame is fitted
    /// on an alternative region and applied to the target region.
    pub fn recentered(&self, centroid: [f64; 3]) -> Self {
        Self { centroid, ..*self }
    }
}

pub fn solve_axes(cloud: &VoxelCloud) -> Result<AxisFrame, GradientError> {
    solve_axes_from_points(&cloud.positions())
}

pub fn solve_axes_from_points(points: &[[f64; 3]]) -> Result<AxisFrame, GradientError> {
    let n = points.len();
    if n < MIN_VOXELS {
        return Err(GradientError::DegenerateRegion {
            voxels: n,
            reason: format!("at least {} voxels are required", MIN_VOXELS),
        });
    }

    let mut centroid = [0.0f64; 3];
    for p in points {
        for d in 0..3 {
            centroid[d] += p[d];
        }
    }
    for c in centroid.iter_mut() {
        *c /= n as f64;
    }

    let mut cov = [[0.0f64; 3]; 3];
    for p in points {
        let d = [p[0] - centroid[0], p[1] - centroid[1], p[2] - centroid[2]];
        for i in 0..3 {
            for j in i..3 {
                cov[i][j] += d[i] * d[j];
            }
        }
    }
    let denom = (n - 1) as f64;
    for i in 0..3 {
        for j in i..3 {
            cov[i][j] /= denom;
            cov[j][i] = cov[i][j];
        }
    }

    let eig = symmetric_eigen3(&cov);
    if !(eig.values[0] > 0.0) || eig.values[2] <= RANK_TOLERANCE * eig.values[0] {
        return Err(GradientError::DegenerateRegion {
            voxels: n,
            reason: format!(
                "covariance rank < 3 (eigenvalues {:.3e}, {:.3e}, {:.3e})",
                eig.values[0], eig.values[1], eig.values[2]
            ),
        });
    }

    Ok(AxisFrame {
        centroid,
        axes: eig.vectors,
        eigenvalues: eig.values,
        signs: [1, 1, 1],
    })
}
