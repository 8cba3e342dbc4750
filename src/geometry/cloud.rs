use crate::error::GradientError;
use crate::io::volume::Volume;

/// Voxels of one region together with the parameter value at each voxel.
///
/// Coordinates are canonical (RAS+) voxel indices of the source volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoxelCloud {
    points: Vec<[usize; 3]>,
    values: Vec<f32>,
}

impl VoxelCloud {
    pub fn new(points: Vec<[usize; 3]>, values: Vec<f32>) -> Result<Self, GradientError> {
        if points.len() != values.len() {
            return Err(GradientError::LengthMismatch {
                what: "voxel values",
                expected: points.len(),
                found: values.len(),
            });
        }
        Ok(Self { points, values })
    }

    /// Collect the voxels of `seg` carrying `label`, reading values from
    /// `map` when given (zero otherwise). Shapes are expected to agree.
    pub fn from_label(seg: &Volume, map: Option<&Volume>, label: u32, erode: bool) -> Self {
        let mut mask = label_mask(seg, label);
        if erode {
            mask = erode_mask(&mask, seg.dims);
        }
        let [nx, ny, _] = seg.dims;
        let mut points = Vec::new();
        let mut values = Vec::new();
        for (idx, _) in mask.iter().enumerate().filter(|(_, m)| **m) {
            let x = idx % nx;
            let y = (idx / nx) % ny;
            let z = idx / (nx * ny);
            points.push([x, y, z]);
            values.push(map.and_then(|m| m.data.get(idx).copied()).unwrap_or(0.0));
        }
        Self { points, values }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[[usize; 3]] {
        &self.points
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.points
            .iter()
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
            .collect()
    }

    pub fn centroid(&self) -> Option<[f64; 3]> {
        if self.points.is_empty() {
            return None;
        }
        let mut sum = [0.0f64; 3];
        for p in &self.points {
            for d in 0..3 {
                sum[d] += p[d] as f64;
            }
        }
        let n = self.points.len() as f64;
        Some([sum[0] / n, sum[1] / n, sum[2] / n])
    }

    /// Inclusive min/max voxel coordinates per canonical axis.
    pub fn bounding_box(&self) -> Option<([usize; 3], [usize; 3])> {
        let first = *self.points.first()?;
        let mut lo = first;
        let mut hi = first;
        for p in &self.points[1..] {
            for d in 0..3 {
                lo[d] = lo[d].min(p[d]);
                hi[d] = hi[d].max(p[d]);
            }
        }
        Some((lo, hi))
    }

    /// Replace every non-zero value by its reciprocal. Zeros stay zero and
    /// are later treated as invalid.
    pub fn invert_values(&mut self) {
        for v in self.values.iter_mut() {
            if *v != 0.0 {
                *v = 1.0 / *v;
            }
        }
    }
}

pub fn label_mask(seg: &Volume, label: u32) -> Vec<bool> {
    seg.data
        .iter()
        .map(|v| v.is_finite() && v.round() as i64 == label as i64)
        .collect()
}

/// Keep only voxels whose six face neighbours are all inside the mask.
/// Voxels on the volume border are always removed.
pub fn erode_mask(mask: &[bool], dims: [usize; 3]) -> Vec<bool> {
    let [nx, ny, nz] = dims;
    let idx = |x: usize, y: usize, z: usize| x + y * nx + z * nx * ny;
    let mut out = vec![false; mask.len()];
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let i = idx(x, y, z);
                if !mask[i] {
                    continue;
                }
                if x == 0 || y == 0 || z == 0 || x + 1 == nx || y + 1 == ny || z + 1 == nz {
                    continue;
                }
                out[i] = mask[idx(x - 1, y, z)]
                    && mask[idx(x + 1, y, z)]
                    && mask[idx(x, y - 1, z)]
                    && mask[idx(x, y + 1, z)]
                    && mask[idx(x, y, z - 1)]
                    && mask[idx(x, y, z + 1)];
            }
        }
    }
    out
}
