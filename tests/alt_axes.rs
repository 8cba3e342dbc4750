mod common;

use kira_gradients::config::parse_direction;
use kira_gradients::geometry::orient::{Confidence, DirectionalityPolicy};
use kira_gradients::io::volume::Volume;
use kira_gradients::pipeline::Pipeline;
use kira_gradients::profile::{SubjectVolumes, profile_region};
use tempfile::TempDir;

use common::{REGION, Subject, make_ctx, ramp_config, ramp_map, sphere_seg, write_design};

const ROD: u32 = 98;

/// 3x5 voxel rod running along z from slice 2 to 22, clear of the ball.
/// Its spread ranks z, then y, then x.
fn add_rod(seg: &mut Volume, label: u32) {
    for z in 2..=22 {
        for y in 0..5 {
            for x in 0..3 {
                seg.set(x, y, z, label as f32);
            }
        }
    }
}

fn z_first_config() -> kira_gradients::config::AnalysisConfig {
    let mut config = ramp_config();
    config.direction = Some(
        parse_direction(&["z".to_string(), "y".to_string(), "x".to_string()]).unwrap(),
    );
    config
}

fn assert_flat_along_z(values: &[f64], vector: [f64; 3]) {
    assert!((vector[2] - 1.0).abs() < 1e-9, "vector {:?}", vector);
    assert!(vector[0].abs() < 1e-9 && vector[1].abs() < 1e-9);
    // Slabs across z see the whole x ramp, so every median sits mid-ramp.
    for (s, v) in values.iter().enumerate() {
        assert!((v - 0.5).abs() < 1e-6, "segment {} value {}", s + 1, v);
    }
}

#[test]
fn alternative_region_defines_target_axes() {
    let tmp = TempDir::new().unwrap();
    let mut seg = sphere_seg([12, 12, 12]);
    add_rod(&mut seg, ROD);
    let (design, loader) = write_design(
        tmp.path(),
        vec![Subject {
            group: "ctrl",
            id: "s1",
            seg: Some(seg),
            map: Some(ramp_map([12, 12, 12])),
            age: "40",
        }],
    );
    let mut ctx = make_ctx(design, tmp.path().join("out"), z_first_config(), loader);
    ctx.alt_roi_token = Some(ROD.to_string());
    Pipeline::standard().run(&mut ctx).unwrap();

    assert_eq!(ctx.config.alt_roi, Some(ROD));
    let result = &ctx.results[0];
    assert_eq!(result.n_missing(), 0);
    let details = result.details[0].as_ref().unwrap();
    assert!(details.alternative_axes);
    assert_eq!(details.confidence, Confidence::Full);
    assert_eq!(details.region, REGION);

    let axis = &details.axes[0];
    assert_eq!(axis.label, "IS");
    assert_flat_along_z(&axis.values, axis.vector);
    assert!(axis.counts.iter().all(|&c| c > 0));
}

#[test]
fn alternative_segmentation_uses_target_label() {
    let mut alt = Volume::filled(common::DIMS, 0.0);
    add_rod(&mut alt, REGION);
    let volumes = SubjectVolumes {
        map: ramp_map([12, 12, 12]),
        seg: sphere_seg([12, 12, 12]),
        alt_seg: Some(alt),
    };
    let config = z_first_config();
    let policy = DirectionalityPolicy::Explicit(config.direction.unwrap());
    let profiles = profile_region(&volumes, REGION, &config, &policy).unwrap();

    assert!(profiles.alternative_axes);
    // Voxel count and bounds still describe the target ball.
    assert_eq!(profiles.bbox, Some(([2, 2, 2], [22, 22, 22])));
    let axis = &profiles.axes[0];
    assert_flat_along_z(&axis.values, axis.vector);
}
