use kira_gradients::geometry::axes::AxisFrame;
use kira_gradients::geometry::orient::{
    Confidence, DirectionalityPolicy, ImageAxis, harmonize,
};

fn frame(axes: [[f64; 3]; 3]) -> AxisFrame {
    AxisFrame {
        centroid: [0.0; 3],
        axes,
        eigenvalues: [3.0, 2.0, 1.0],
        signs: [1, 1, 1],
    }
}

const YZX: [ImageAxis; 3] = [ImageAxis::Y, ImageAxis::Z, ImageAxis::X];

#[test]
fn explicit_targets_flip_negative_loadings() {
    let f = frame([[0.0, -1.0, 0.0], [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0]]);
    let out = harmonize(&f, &DirectionalityPolicy::Explicit(YZX));
    assert_eq!(out.confidence, Confidence::Full);
    assert!(out.issues.is_empty());
    assert_eq!(out.frame.axes[0], [0.0, 1.0, 0.0]);
    assert_eq!(out.frame.axes[1], [0.0, 0.0, 1.0]);
    assert_eq!(out.frame.axes[2], [1.0, 0.0, 0.0]);
    assert_eq!(out.frame.signs, [-1, 1, -1]);
}

#[test]
fn harmonize_is_idempotent() {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let f = frame([[-s, -s, 0.0], [s, -s, 0.0], [0.0, 0.0, -1.0]]);
    for policy in [
        DirectionalityPolicy::Prior([ImageAxis::X, ImageAxis::Y, ImageAxis::Z]),
        DirectionalityPolicy::Fallback,
    ] {
        let once = harmonize(&f, &policy);
        let twice = harmonize(&once.frame, &policy);
        assert_eq!(once.frame.axes, twice.frame.axes);
    }
}

#[test]
fn sign_agrees_regardless_of_solver_sign() {
    let a = frame([[0.1, 0.99, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
    let b = frame([[-0.1, -0.99, 0.0], [0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]]);
    let policy = DirectionalityPolicy::Prior(YZX);
    let ha = harmonize(&a, &policy);
    let hb = harmonize(&b, &policy);
    assert_eq!(ha.frame.axes, hb.frame.axes);
}

#[test]
fn weak_loading_is_degraded() {
    // Axis 1 lies almost entirely along x while its target is y.
    let f = frame([[-0.98, 0.2, 0.0], [0.0, 0.0, 1.0], [0.2, 0.98, 0.0]]);
    let out = harmonize(&f, &DirectionalityPolicy::Explicit(YZX));
    assert_eq!(out.confidence, Confidence::Degraded);
    assert_eq!(out.issues.len(), 2);
    // Dominant component made positive.
    assert!(out.frame.axes[0][0] > 0.0);
}

#[test]
fn fallback_policy_is_degraded_with_pc_labels() {
    let f = frame([[0.0, -1.0, 0.0], [0.0, 0.0, -1.0], [1.0, 0.0, 0.0]]);
    let policy = DirectionalityPolicy::Fallback;
    let out = harmonize(&f, &policy);
    assert_eq!(out.confidence, Confidence::Degraded);
    assert_eq!(out.frame.axes[0], [0.0, 1.0, 0.0]);
    assert_eq!(out.frame.axes[1], [0.0, 0.0, 1.0]);
    assert_eq!(policy.axis_label(0), "PC1");
    assert_eq!(DirectionalityPolicy::Prior(YZX).axis_label(0), "PA");
}

#[test]
fn image_axis_tokens() {
    assert_eq!(ImageAxis::parse("AP"), Some(ImageAxis::Y));
    assert_eq!(ImageAxis::parse("3"), Some(ImageAxis::Z));
    assert_eq!(ImageAxis::parse(" x "), Some(ImageAxis::X));
    assert_eq!(ImageAxis::parse("w"), None);
}
