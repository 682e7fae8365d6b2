//! Feeding a materialized descriptor back in as scale options must rebuild
//! the identical descriptor without re-running inference.

use rstest::rstest;
use serde_json::json;

use plotscale_common::ScalarValue;
use plotscale_core::spec::plot::PlotOptionsSpec;
use plotscale_core::{compile_scales, scale, Channel, ScaleDescriptor};

fn channel(name: &str, values: Vec<ScalarValue>) -> Channel {
    Channel::new(name, values)
}

fn numbers(values: &[f64]) -> Vec<ScalarValue> {
    values.iter().map(|v| ScalarValue::number(*v)).collect()
}

fn compiled(channels: Vec<Channel>, options: serde_json::Value, name: &str) -> ScaleDescriptor {
    let options: PlotOptionsSpec = serde_json::from_value(options).unwrap();
    let scales = compile_scales(&channels, &options).unwrap();
    scales.scale(name).unwrap().unwrap().clone()
}

/// Serializes a descriptor, reparses it as options for `name`, and rebuilds.
fn rebuild(name: &str, descriptor: &ScaleDescriptor) -> ScaleDescriptor {
    let serialized = serde_json::to_value(descriptor).unwrap();
    let options: PlotOptionsSpec =
        serde_json::from_value(json!({ name: serialized })).unwrap();
    scale(&options).unwrap()
}

#[rstest]
#[case::linear_nice(json!({"x": {"nice": true}}))]
#[case::symlog(json!({"x": {"type": "symlog", "domain": [0, 100]}}))]
#[case::percent(json!({"x": {"percent": true}}))]
#[case::round(json!({"x": {"round": true}}))]
#[case::interval(json!({"x": {"interval": 0.05}}))]
fn test_continuous_reuse(#[case] options: serde_json::Value) {
    let channels = vec![channel("x", numbers(&[0.27, 0.5, 0.63]))];
    let first = compiled(channels, options, "x");
    assert_eq!(rebuild("x", &first), first);
}

#[test]
fn test_utc_reuse() {
    let channels = vec![channel(
        "x",
        vec![
            ScalarValue::date_from_millis(0),
            ScalarValue::date_from_millis(86_400_000),
        ],
    )];
    let first = compiled(channels, json!({}), "x");
    assert_eq!(first.type_name(), "utc");
    assert_eq!(rebuild("x", &first), first);
}

#[test]
fn test_band_reuse() {
    let values: Vec<ScalarValue> = (0..18)
        .map(|i| ScalarValue::string(format!("s{i}")))
        .collect();
    let channels = vec![channel("x", values)];
    let first = compiled(channels, json!({"x": {"type": "band"}}), "x");
    assert_eq!(rebuild("x", &first), first);
}

#[test]
fn test_ordinal_color_reuse() {
    let channels = vec![channel(
        "fill",
        vec![
            ScalarValue::string("a"),
            ScalarValue::string("b"),
            ScalarValue::string("c"),
        ],
    )];
    let first = compiled(channels, json!({}), "color");
    assert_eq!(rebuild("color", &first), first);
}

#[test]
fn test_quantile_reuse() {
    let channels = vec![channel(
        "fill",
        numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]),
    )];
    let first = compiled(channels, json!({"color": {"type": "quantile"}}), "color");
    assert_eq!(rebuild("color", &first), first);
}

#[test]
fn test_diverging_reuse() {
    let first = compiled(
        vec![],
        json!({"color": {"type": "diverging", "domain": [-0.78, 1.35]}}),
        "color",
    );
    let second = rebuild("color", &first);
    assert_eq!(second, first);
    // The widened domain is concrete on reuse, not re-widened.
    assert_eq!(
        second.domain(),
        &[ScalarValue::number(-1.35), ScalarValue::number(1.35)]
    );
}

#[test]
fn test_continuous_color_scheme_reuse() {
    let channels = vec![channel("fill", numbers(&[0.0, 50.0, 100.0]))];
    let first = compiled(channels, json!({"color": {"scheme": "viridis"}}), "color");
    assert_eq!(rebuild("color", &first), first);
}

#[test]
fn test_identity_reuse() {
    let first = compiled(vec![], json!({"color": {"type": "identity"}}), "color");
    assert_eq!(rebuild("color", &first), first);
}
