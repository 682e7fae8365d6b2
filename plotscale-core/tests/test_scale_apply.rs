use rstest::rstest;
use serde_json::json;

use plotscale_common::ScalarValue;
use plotscale_core::spec::plot::PlotOptionsSpec;
use plotscale_core::{apply, compile_scales, invert, Channel, ScaleDescriptor};

fn channel(name: &str, values: Vec<ScalarValue>) -> Channel {
    Channel::new(name, values)
}

fn numbers(values: &[f64]) -> Vec<ScalarValue> {
    values.iter().map(|v| ScalarValue::number(*v)).collect()
}

fn strings(values: &[&str]) -> Vec<ScalarValue> {
    values.iter().map(|v| ScalarValue::string(*v)).collect()
}

fn plot_options(value: serde_json::Value) -> PlotOptionsSpec {
    serde_json::from_value(value).unwrap()
}

fn compiled(channels: Vec<Channel>, options: serde_json::Value, name: &str) -> ScaleDescriptor {
    let options = plot_options(options);
    let scales = compile_scales(&channels, &options).unwrap();
    scales.scale(name).unwrap().unwrap().clone()
}

fn apply_number(descriptor: &ScaleDescriptor, x: f64) -> f64 {
    apply(descriptor, &ScalarValue::number(x))
        .unwrap()
        .as_f64()
        .unwrap()
}

fn apply_color(descriptor: &ScaleDescriptor, x: f64) -> String {
    match apply(descriptor, &ScalarValue::number(x)).unwrap() {
        ScalarValue::String(s) => s,
        other => panic!("expected a color string, got {other:?}"),
    }
}

#[rstest]
#[case(100.0, 620.0)]
#[case(0.0, 20.0)]
#[case(-100.0, -580.0)]
fn test_symlog_default_range(#[case] x: f64, #[case] expected: f64) {
    let scale = compiled(vec![], json!({"x": {"type": "symlog", "domain": [0, 100]}}), "x");
    assert!((apply_number(&scale, x) - expected).abs() < 1e-9);
}

#[test]
fn test_symlog_invert_round_trip() {
    let scale = compiled(vec![], json!({"x": {"type": "symlog", "domain": [0, 100]}}), "x");
    for x in [-100.0, 0.0, 37.5, 100.0] {
        let y = apply(&scale, &ScalarValue::number(x)).unwrap();
        let back = invert(&scale, &y).unwrap().as_f64().unwrap();
        assert!((back - x).abs() < 1e-9, "{x} round-tripped to {back}");
    }
}

#[test]
fn test_sqrt_apply() {
    let scale = compiled(
        vec![],
        json!({"x": {"type": "sqrt", "domain": [0, 100], "range": [0, 10]}}),
        "x",
    );
    assert!((apply_number(&scale, 25.0) - 5.0).abs() < 1e-9);
}

#[test]
fn test_log_apply() {
    let scale = compiled(
        vec![],
        json!({"x": {"type": "log", "domain": [1, 100], "range": [0, 2]}}),
        "x",
    );
    assert!((apply_number(&scale, 10.0) - 1.0).abs() < 1e-9);
}

#[test]
fn test_clamp_pins_out_of_domain_values() {
    let scale = compiled(
        vec![],
        json!({"x": {"domain": [0, 100], "clamp": true}}),
        "x",
    );
    assert!((apply_number(&scale, 150.0) - 620.0).abs() < 1e-9);
    assert!((apply_number(&scale, -50.0) - 20.0).abs() < 1e-9);
}

#[test]
fn test_round_interpolator() {
    let scale = compiled(vec![], json!({"x": {"domain": [0, 7], "round": true}}), "x");
    assert_eq!(apply_number(&scale, 1.0), 106.0);
}

#[test]
fn test_percent_multiplies_inputs() {
    let channels = vec![channel("x", numbers(&[0.0, 1.0]))];
    let scale = compiled(channels, json!({"x": {"percent": true}}), "x");
    assert!((apply_number(&scale, 0.5) - 320.0).abs() < 1e-9);
}

#[test]
fn test_polylinear_color_midpoint() {
    let scale = compiled(
        vec![],
        json!({"color": {"domain": [0, 100, 200], "range": ["red", "blue"]}}),
        "color",
    );
    assert_eq!(apply_color(&scale, 100.0), "rgb(128, 0, 128)");
    assert_eq!(apply_color(&scale, 0.0), "rgb(255, 0, 0)");
    assert_eq!(apply_color(&scale, 200.0), "rgb(0, 0, 255)");
}

#[test]
fn test_reverse_flips_color_interpolator() {
    let scale = compiled(
        vec![],
        json!({"color": {"domain": [0, 100], "range": ["red", "blue"], "reverse": true}}),
        "color",
    );
    assert_eq!(apply_color(&scale, 0.0), "rgb(0, 0, 255)");
    assert_eq!(apply_color(&scale, 100.0), "rgb(255, 0, 0)");
}

#[test]
fn test_numeric_range_confines_scheme_gradient() {
    let scale = compiled(
        vec![],
        json!({"color": {"domain": [0, 1], "scheme": "blues", "range": [0, 0.5]}}),
        "color",
    );
    // The top of the domain lands halfway into the gradient.
    assert_eq!(apply_color(&scale, 1.0), "rgb(107, 174, 214)");
    assert_eq!(apply_color(&scale, 0.0), "rgb(247, 251, 255)");
}

#[test]
fn test_diverging_pivot_maps_to_scheme_center() {
    let scale = compiled(
        vec![],
        json!({"color": {"type": "diverging", "domain": [-1, 1]}}),
        "color",
    );
    assert_eq!(apply_color(&scale, 0.0), "rgb(247, 247, 247)");
}

#[test]
fn test_quantile_apply() {
    let channels = vec![channel(
        "fill",
        numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
    )];
    let scale = compiled(channels, json!({"color": {"type": "quantile"}}), "color");
    assert_eq!(apply_color(&scale, 1.0), "#d7191c");
    assert_eq!(apply_color(&scale, 5.0), "#ffffbf");
    assert_eq!(apply_color(&scale, 10.0), "#2c7bb6");
}

#[test]
fn test_point_positions() {
    let channels = vec![channel("x", strings(&["a", "b", "c"]))];
    let scale = compiled(channels, json!({}), "x");
    assert_eq!(
        apply(&scale, &ScalarValue::string("b")).unwrap(),
        ScalarValue::number(320.0)
    );
    assert_eq!(
        apply(&scale, &ScalarValue::string("a")).unwrap(),
        ScalarValue::number(120.0)
    );
}

#[test]
fn test_band_positions() {
    let values: Vec<ScalarValue> = (0..18)
        .map(|i| ScalarValue::string(format!("s{i}")))
        .collect();
    let channels = vec![channel("x", values)];
    let scale = compiled(
        channels,
        json!({"x": {"type": "band", "range": [40, 620]}}),
        "x",
    );
    assert_eq!(
        apply(&scale, &ScalarValue::string("s0")).unwrap(),
        ScalarValue::number(44.0)
    );
    assert_eq!(
        apply(&scale, &ScalarValue::string("s1")).unwrap(),
        ScalarValue::number(76.0)
    );
}

#[test]
fn test_utc_invert_returns_dates() {
    let channels = vec![channel(
        "x",
        vec![
            ScalarValue::date_from_millis(0),
            ScalarValue::date_from_millis(86_400_000),
        ],
    )];
    let scale = compiled(channels, json!({}), "x");
    let y = apply(&scale, &ScalarValue::date_from_millis(43_200_000)).unwrap();
    assert_eq!(y, ScalarValue::number(320.0));
    assert_eq!(
        invert(&scale, &y).unwrap(),
        ScalarValue::date_from_millis(43_200_000)
    );
}

#[test]
fn test_unknown_value_substitution() {
    let channels = vec![channel("fill", strings(&["a", "b"]))];
    let scale = compiled(channels, json!({"color": {"unknown": "gray"}}), "color");
    assert_eq!(
        apply(&scale, &ScalarValue::string("zzz")).unwrap(),
        ScalarValue::string("gray")
    );
    assert_eq!(
        apply(&scale, &ScalarValue::string("a")).unwrap(),
        ScalarValue::string("#4c78a8")
    );
}
