//! Volumetric image access.
//!
//! Every volume handed to the geometry code is in canonical RAS+ order:
//! array axis 0 runs left→right, 1 posterior→anterior, 2
//! inferior→superior, all with positive stride, x varying fastest
//! (`index = x + y*nx + z*nx*ny`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GradientError;

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub dims: [usize; 3],
    pub data: Vec<f32>,
    /// How the stored array axes were mapped onto canonical axes.
    pub orientation: Orientation,
}

impl Volume {
    /// A volume already in canonical order.
    pub fn new(dims: [usize; 3], data: Vec<f32>) -> Result<Self, GradientError> {
        let expected = dims[0] * dims[1] * dims[2];
        if data.len() != expected {
            return Err(GradientError::LengthMismatch {
                what: "volume data",
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            dims,
            data,
            orientation: Orientation::CANONICAL,
        })
    }

    pub fn filled(dims: [usize; 3], value: f32) -> Self {
        Self {
            dims,
            data: vec![value; dims[0] * dims[1] * dims[2]],
            orientation: Orientation::CANONICAL,
        }
    }

    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims[0] + z * self.dims[0] * self.dims[1]
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        self.data[self.index(x, y, z)]
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: f32) {
        let i = self.index(x, y, z);
        self.data[i] = value;
    }
}

/// `permutation[c]` is the stored array axis feeding canonical axis `c`;
/// `flipped[c]` is set when that stored axis ran in the negative direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    pub permutation: [usize; 3],
    pub flipped: [bool; 3],
}

impl Orientation {
    pub const CANONICAL: Self = Self {
        permutation: [0, 1, 2],
        flipped: [false, false, false],
    };

    pub fn is_canonical(&self) -> bool {
        *self == Self::CANONICAL
    }

    /// Derive the axis mapping from the rotation/scale block of a
    /// voxel-to-world affine (`m[world][array]`). The largest remaining
    /// entry is matched first, which handles mildly oblique acquisitions.
    pub fn from_affine(m: &[[f64; 3]; 3]) -> Option<Self> {
        let mut used_world = [false; 3];
        let mut used_array = [false; 3];
        let mut permutation = [usize::MAX; 3];
        let mut flipped = [false; 3];
        for _ in 0..3 {
            let mut best: Option<(usize, usize, f64)> = None;
            for (w, row) in m.iter().enumerate() {
                if used_world[w] {
                    continue;
                }
                for (a, &v) in row.iter().enumerate() {
                    if used_array[a] {
                        continue;
                    }
                    if best.is_none_or(|(_, _, b)| v.abs() > b) {
                        best = Some((w, a, v.abs()));
                    }
                }
            }
            let (w, a, mag) = best?;
            if !(mag > 0.0) {
                return None;
            }
            used_world[w] = true;
            used_array[a] = true;
            permutation[w] = a;
            flipped[w] = m[w][a] < 0.0;
        }
        Some(Self {
            permutation,
            flipped,
        })
    }
}

/// Reorder raw array data (x fastest, `dims` in stored order) into
/// canonical positive-stride order.
pub fn to_canonical(dims: [usize; 3], data: &[f32], orientation: Orientation) -> Volume {
    let perm = orientation.permutation;
    let out_dims = [dims[perm[0]], dims[perm[1]], dims[perm[2]]];
    let mut out = Vec::with_capacity(data.len());
    let mut src = [0usize; 3];
    for z in 0..out_dims[2] {
        for y in 0..out_dims[1] {
            for x in 0..out_dims[0] {
                for (c, &v) in [x, y, z].iter().enumerate() {
                    src[perm[c]] = if orientation.flipped[c] {
                        out_dims[c] - 1 - v
                    } else {
                        v
                    };
                }
                out.push(data[src[0] + src[1] * dims[0] + src[2] * dims[0] * dims[1]]);
            }
        }
    }
    Volume {
        dims: out_dims,
        data: out,
        orientation,
    }
}

/// Rotation/scale block of a NIfTI qform. `quatern` holds the b, c, d
/// quaternion terms; `pixdim[0]` is qfac, whose sign mirrors the third
/// array axis.
pub fn qform_rotation(quatern: [f64; 3], pixdim: [f64; 4]) -> [[f64; 3]; 3] {
    let [b, c, d] = quatern;
    let a = (1.0 - b * b - c * c - d * d).max(0.0).sqrt();
    let qfac = if pixdim[0] < 0.0 { -1.0 } else { 1.0 };
    let spacing = |v: f64| if v > 0.0 { v } else { 1.0 };
    let [i, j, k] = [spacing(pixdim[1]), spacing(pixdim[2]), spacing(pixdim[3]) * qfac];
    [
        [
            (a * a + b * b - c * c - d * d) * i,
            2.0 * (b * c - a * d) * j,
            2.0 * (b * d + a * c) * k,
        ],
        [
            2.0 * (b * c + a * d) * i,
            (a * a - b * b + c * c - d * d) * j,
            2.0 * (c * d - a * b) * k,
        ],
        [
            2.0 * (b * d - a * c) * i,
            2.0 * (c * d + a * b) * j,
            (a * a - b * b - c * c + d * d) * k,
        ],
    ]
}

/// Source of canonical volumes. Implementations must be shareable across
/// subject workers.
pub trait VolumeLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Volume, GradientError>;
}

/// Serves volumes registered up front, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLoader {
    volumes: HashMap<PathBuf, Volume>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, volume: Volume) {
        self.volumes.insert(path.into(), volume);
    }
}

impl VolumeLoader for InMemoryLoader {
    fn load(&self, path: &Path) -> Result<Volume, GradientError> {
        self.volumes
            .get(path)
            .cloned()
            .ok_or_else(|| GradientError::MissingInput {
                subject: String::new(),
                path: path.to_path_buf(),
                reason: "no volume registered for path".to_string(),
            })
    }
}

#[cfg(feature = "nifti")]
pub use self::nifti_loader::{NiftiLoader, rotation_block};

#[cfg(feature = "nifti")]
mod nifti_loader {
    use std::path::Path;

    use nifti::{NiftiHeader, NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};

    use super::{Orientation, Volume, VolumeLoader, qform_rotation, to_canonical};
    use crate::error::GradientError;

    /// `.nii` / `.nii.gz` reader. 4-D inputs contribute their first volume.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct NiftiLoader;

    impl VolumeLoader for NiftiLoader {
        fn load(&self, path: &Path) -> Result<Volume, GradientError> {
            let missing = |reason: String| GradientError::MissingInput {
                subject: String::new(),
                path: path.to_path_buf(),
                reason,
            };
            if !path.exists() {
                return Err(missing("file not found".to_string()));
            }
            let obj = ReaderOptions::new()
                .read_file(path)
                .map_err(|e| missing(format!("failed to read NIfTI: {}", e)))?;
            let rotation = rotation_block(obj.header());
            let volume = obj.into_volume();

            let dim = volume.dim().to_vec();
            if dim.len() < 3 {
                return Err(missing(format!("expected at least 3-D volume, got {}-D", dim.len())));
            }
            let dims = [dim[0] as usize, dim[1] as usize, dim[2] as usize];

            let mut coords = vec![0u16; volume.dimensionality()];
            let mut data = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
            for z in 0..dim[2] {
                for y in 0..dim[1] {
                    for x in 0..dim[0] {
                        coords[0] = x;
                        coords[1] = y;
                        coords[2] = z;
                        let v = volume
                            .get_f32(&coords)
                            .map_err(|e| missing(format!("failed to read voxel: {}", e)))?;
                        data.push(v);
                    }
                }
            }

            let orientation =
                Orientation::from_affine(&rotation).ok_or_else(|| GradientError::Orientation {
                    path: path.to_path_buf(),
                    reason: "affine does not map array axes onto distinct world axes".to_string(),
                })?;
            Ok(to_canonical(dims, &data, orientation))
        }
    }

    /// sform when present, then qform, then the pixdim diagonal.
    pub fn rotation_block(header: &NiftiHeader) -> [[f64; 3]; 3] {
        if header.sform_code > 0 {
            let rows = [&header.srow_x, &header.srow_y, &header.srow_z];
            let mut m = [[0.0; 3]; 3];
            for (w, row) in rows.iter().enumerate() {
                for a in 0..3 {
                    m[w][a] = row[a] as f64;
                }
            }
            m
        } else if header.qform_code > 0 {
            let p = &header.pixdim;
            qform_rotation(
                [
                    header.quatern_b as f64,
                    header.quatern_c as f64,
                    header.quatern_d as f64,
                ],
                [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64],
            )
        } else {
            let spacing = |v: f32| if v > 0.0 { v as f64 } else { 1.0 };
            let p = &header.pixdim;
            [
                [spacing(p[1]), 0.0, 0.0],
                [0.0, spacing(p[2]), 0.0],
                [0.0, 0.0, spacing(p[3])],
            ]
        }
    }
}

#[cfg(not(feature = "nifti"))]
pub use self::nifti_stub::NiftiLoader;

#[cfg(not(feature = "nifti"))]
mod nifti_stub {
    use std::path::Path;

    use super::{Volume, VolumeLoader};
    use crate::error::GradientError;

    #[derive(Debug, Default, Clone, Copy)]
    pub struct NiftiLoader;

    impl VolumeLoader for NiftiLoader {
        fn load(&self, path: &Path) -> Result<Volume, GradientError> {
            Err(GradientError::MissingInput {
                subject: String::new(),
                path: path.to_path_buf(),
                reason: "NIfTI support not enabled. Rebuild with --features nifti".to_string(),
            })
        }
    }
}
