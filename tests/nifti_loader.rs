#![cfg(feature = "nifti")]

use std::path::Path;

use kira_gradients::error::GradientError;
use kira_gradients::io::volume::{NiftiLoader, VolumeLoader};
use tempfile::TempDir;

const FLOAT32: i16 = 16;

struct Header {
    dims: [u16; 3],
    pixdim: [f32; 4],
    qform_code: i16,
    quatern: [f32; 3],
    sform_code: i16,
    srow: [[f32; 4]; 3],
}

impl Default for Header {
    fn default() -> Self {
        Self {
            dims: [1, 1, 1],
            pixdim: [1.0, 1.0, 1.0, 1.0],
            qform_code: 0,
            quatern: [0.0; 3],
            sform_code: 0,
            srow: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }
}

fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    buf[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Single-file NIfTI-1, float32, little endian.
fn write_nii(path: &Path, h: &Header, data: &[f32]) {
    let mut buf = vec![0u8; 352];
    put(&mut buf, 0, &348i32.to_le_bytes());
    put(&mut buf, 40, &3u16.to_le_bytes());
    for (i, d) in h.dims.iter().enumerate() {
        put(&mut buf, 42 + 2 * i, &d.to_le_bytes());
    }
    for i in 3..7 {
        put(&mut buf, 42 + 2 * i, &1u16.to_le_bytes());
    }
    put(&mut buf, 70, &FLOAT32.to_le_bytes());
    put(&mut buf, 72, &32i16.to_le_bytes());
    for (i, p) in h.pixdim.iter().enumerate() {
        put(&mut buf, 76 + 4 * i, &p.to_le_bytes());
    }
    put(&mut buf, 108, &352f32.to_le_bytes());
    put(&mut buf, 252, &h.qform_code.to_le_bytes());
    put(&mut buf, 254, &h.sform_code.to_le_bytes());
    for (i, q) in h.quatern.iter().enumerate() {
        put(&mut buf, 256 + 4 * i, &q.to_le_bytes());
    }
    for (r, row) in h.srow.iter().enumerate() {
        for (i, v) in row.iter().enumerate() {
            put(&mut buf, 280 + 16 * r + 4 * i, &v.to_le_bytes());
        }
    }
    put(&mut buf, 344, b"n+1\0");
    for v in data {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    std::fs::write(path, buf).unwrap();
}

const STORED: [f32; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

#[test]
fn qform_only_file_is_mirrored_to_ras() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("las.nii");
    let header = Header {
        dims: [3, 2, 1],
        pixdim: [-1.0, 2.0, 2.0, 2.0],
        qform_code: 1,
        quatern: [0.0, 1.0, 0.0],
        ..Header::default()
    };
    write_nii(&path, &header, &STORED);

    let volume = NiftiLoader.load(&path).unwrap();
    assert_eq!(volume.dims, [3, 2, 1]);
    assert_eq!(volume.orientation.flipped, [true, false, false]);
    assert_eq!(volume.data, vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
}

#[test]
fn sform_takes_precedence_over_qform() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("ras.nii");
    let header = Header {
        dims: [3, 2, 1],
        pixdim: [-1.0, 1.0, 1.0, 1.0],
        qform_code: 1,
        quatern: [0.0, 1.0, 0.0],
        sform_code: 2,
        ..Header::default()
    };
    write_nii(&path, &header, &STORED);

    let volume = NiftiLoader.load(&path).unwrap();
    assert!(volume.orientation.is_canonical());
    assert_eq!(volume.data, STORED.to_vec());
    assert_eq!(volume.get(2, 1, 0), 6.0);
}

#[test]
fn absent_file_is_missing_input() {
    let tmp = TempDir::new().unwrap();
    let err = NiftiLoader.load(&tmp.path().join("nope.nii")).unwrap_err();
    assert!(matches!(err, GradientError::MissingInput { .. }));
}
