mod common;

use kira_gradients::pipeline::Pipeline;
use serde_json::Value;
use tempfile::TempDir;

use common::{Subject, make_ctx, ramp_config, sphere_subject, write_design};

#[test]
fn json_report_populated() {
    let tmp = TempDir::new().unwrap();
    let (design, loader) = write_design(
        tmp.path(),
        vec![
            sphere_subject("ctrl", "s1", [12, 12, 12]),
            Subject {
                group: "ctrl",
                id: "gone",
                seg: None,
                map: None,
                age: "60",
            },
        ],
    );
    let out = tmp.path().join("out");
    let mut ctx = make_ctx(design, out.clone(), ramp_config(), loader);
    Pipeline::standard().run(&mut ctx).unwrap();

    let text = std::fs::read_to_string(out.join("gradients.json")).unwrap();
    let json: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["tool"], "kira-gradients");
    assert_eq!(json["schema_version"], "v1");
    assert_eq!(json["version"], "0.0.0-test");
    assert_eq!(json["input"]["n_subjects"], 2);
    assert_eq!(json["input"]["regions"][0]["code"], 99);
    assert_eq!(json["config"]["policy"], "equidistance");
    assert_eq!(json["config"]["statistic"], "median");
    assert_eq!(json["config"]["direction"][0], "x");

    let result = &json["results"][0];
    assert_eq!(result["group"], "ctrl");
    assert_eq!(result["covariate_names"][0], "age");
    assert_eq!(result["covariates"][1][0], "60");
    assert_eq!(result["status"][0]["status"], "ok");
    assert_eq!(result["status"][1]["status"], "missing");
    assert!(result["details"][1].is_null());
    assert_eq!(result["details"][0]["policy"]["source"], "explicit");

    let axis = &result["axes"][0];
    assert_eq!(axis["label"], "LR");
    assert_eq!(axis["coords"].as_array().unwrap().len(), 5);
    // A missing subject column serializes as nulls.
    assert!(axis["matrix"][0][1].is_null());
    assert!(axis["matrix"][0][0].is_number());
    // One valid subject: std is zero, not null.
    assert_eq!(axis["std"][0], 0.0);
    assert!(json["warnings"].as_array().unwrap().len() >= 1);
}
