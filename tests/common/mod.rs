#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use kira_gradients::config::AnalysisConfig;
use kira_gradients::ctx::Ctx;
use kira_gradients::io::volume::{InMemoryLoader, Volume};

pub const DIMS: [usize; 3] = [25, 25, 25];
pub const RADIUS: i64 = 10;
pub const REGION: u32 = 99;

/// Labels a ball of `RADIUS` around `center` with `REGION`.
pub fn sphere_seg(center: [i64; 3]) -> Volume {
    let mut seg = Volume::filled(DIMS, 0.0);
    for z in 0..DIMS[2] {
        for y in 0..DIMS[1] {
            for x in 0..DIMS[0] {
                let d = [
                    x as i64 - center[0],
                    y as i64 - center[1],
                    z as i64 - center[2],
                ];
                if d[0] * d[0] + d[1] * d[1] + d[2] * d[2] <= RADIUS * RADIUS {
                    seg.set(x, y, z, REGION as f32);
                }
            }
        }
    }
    seg
}

/// Value rises linearly along x across the ball: 0.0 at its left pole,
/// 1.0 at its right pole. The left pole voxel reads 0 and counts as invalid.
pub fn ramp_map(center: [i64; 3]) -> Volume {
    let mut map = Volume::filled(DIMS, 0.0);
    for z in 0..DIMS[2] {
        for y in 0..DIMS[1] {
            for x in 0..DIMS[0] {
                let p = (x as i64 - center[0]) as f32;
                map.set(x, y, z, (p + RADIUS as f32) / (2.0 * RADIUS as f32));
            }
        }
    }
    map
}

/// Seg volume with only two labelled voxels.
pub fn tiny_seg() -> Volume {
    let mut seg = Volume::filled(DIMS, 0.0);
    seg.set(5, 5, 5, REGION as f32);
    seg.set(6, 5, 5, REGION as f32);
    seg
}

pub struct Subject<'a> {
    pub group: &'a str,
    pub id: &'a str,
    pub seg: Option<Volume>,
    pub map: Option<Volume>,
    pub age: &'a str,
}

/// Writes the design TSV under `dir` and registers every provided volume
/// at the path the design points to.
pub fn write_design(dir: &Path, subjects: Vec<Subject<'_>>) -> (std::path::PathBuf, InMemoryLoader) {
    let mut loader = InMemoryLoader::new();
    let mut tsv = String::from("group\tsubject\tmap\tseg\tage\n");
    for s in subjects {
        let map_name = format!("{}_map.nii.gz", s.id);
        let seg_name = format!("{}_seg.nii.gz", s.id);
        tsv.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\n",
            s.group, s.id, map_name, seg_name, s.age
        ));
        if let Some(map) = s.map {
            loader.insert(dir.join(&map_name), map);
        }
        if let Some(seg) = s.seg {
            loader.insert(dir.join(&seg_name), seg);
        }
    }
    let path = dir.join("design.tsv");
    fs::write(&path, tsv).unwrap();
    (path, loader)
}

pub fn sphere_subject<'a>(group: &'a str, id: &'a str, center: [i64; 3]) -> Subject<'a> {
    Subject {
        group,
        id,
        seg: Some(sphere_seg(center)),
        map: Some(ramp_map(center)),
        age: "40",
    }
}

/// Five segments along axis 1 only, explicit x,y,z direction.
pub fn ramp_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.set_axes(&[1]).unwrap();
    config.set_segments(&[5]).unwrap();
    config.direction = Some(kira_gradients::config::parse_direction(&[
        "x".to_string(),
        "y".to_string(),
        "z".to_string(),
    ])
    .unwrap());
    config
}

pub fn make_ctx(
    design: std::path::PathBuf,
    out: std::path::PathBuf,
    config: AnalysisConfig,
    loader: InMemoryLoader,
) -> Ctx {
    Ctx::new(
        design,
        out,
        vec![REGION.to_string()],
        config,
        true,
        true,
        "0.0.0-test",
    )
    .with_loader(Arc::new(loader))
}
