//! Value application and inversion for materialized descriptors.
//!
//! Descriptors store no closures; this module synthesizes the forward
//! (`apply`) and inverse (`invert`) mappings from descriptor data on demand.

use plotscale_common::{PlotScaleError, Result, ScalarValue};

use crate::scales::color::{format_rgb, lerp_rgb, parse_color, sample_stops, Rgb};
use crate::scales::descriptor::{
    ContinuousDescriptor, ContinuousType, DiscreteDescriptor, DiscreteType, DivergingDescriptor,
    DivergingType, Interpolate, ScaleDescriptor, ThresholdDescriptor,
};
use crate::scales::schemes::scheme_stops;

/// Maps a channel value through a finalized scale.
pub fn apply(descriptor: &ScaleDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    match descriptor {
        ScaleDescriptor::Identity(_) => Ok(value.clone()),
        ScaleDescriptor::Continuous(d) => apply_continuous(d, value),
        ScaleDescriptor::Diverging(d) => apply_diverging(d, value),
        ScaleDescriptor::Threshold(d) => apply_threshold(d, value),
        ScaleDescriptor::Discrete(d) => apply_discrete(d, value),
    }
}

/// Maps an output value back to the input domain. Defined for the identity
/// scale and for continuous scales with numeric ranges only.
pub fn invert(descriptor: &ScaleDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    match descriptor {
        ScaleDescriptor::Identity(_) => Ok(value.clone()),
        ScaleDescriptor::Continuous(d) => invert_continuous(d, value),
        other => Err(PlotScaleError::invalid_definition(format!(
            "invert is not defined for {} scales",
            other.type_name()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Continuous transforms

pub(crate) enum Transformer {
    Linear,
    Pow { exponent: f64 },
    Log,
    Symlog { constant: f64 },
}

impl Transformer {
    fn for_continuous(descriptor: &ContinuousDescriptor) -> Self {
        match descriptor.scale_type {
            ContinuousType::Linear | ContinuousType::Utc | ContinuousType::Time => Self::Linear,
            ContinuousType::Pow => Self::Pow {
                exponent: descriptor.exponent.unwrap_or(1.0),
            },
            ContinuousType::Log => Self::Log,
            ContinuousType::Symlog => Self::Symlog {
                constant: descriptor.constant.unwrap_or(1.0),
            },
        }
    }

    fn for_diverging(descriptor: &DivergingDescriptor) -> Self {
        Self::for_diverging_type(
            descriptor.scale_type,
            descriptor.exponent,
            descriptor.constant,
        )
    }

    pub(crate) fn for_diverging_type(
        scale_type: DivergingType,
        exponent: Option<f64>,
        constant: Option<f64>,
    ) -> Self {
        match scale_type {
            DivergingType::Diverging => Self::Linear,
            DivergingType::DivergingPow => Self::Pow {
                exponent: exponent.unwrap_or(1.0),
            },
            DivergingType::DivergingLog => Self::Log,
            DivergingType::DivergingSymlog => Self::Symlog {
                constant: constant.unwrap_or(1.0),
            },
        }
    }

    pub(crate) fn forward(&self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Pow { exponent } => x.signum() * x.abs().powf(*exponent),
            Self::Log => {
                if x < 0.0 {
                    -(-x).ln()
                } else {
                    x.ln()
                }
            }
            Self::Symlog { constant } => x.signum() * (x.abs() / constant).ln_1p(),
        }
    }

    pub(crate) fn inverse(&self, y: f64) -> f64 {
        match self {
            Self::Linear => y,
            Self::Pow { exponent } => y.signum() * y.abs().powf(1.0 / exponent),
            Self::Log => {
                if y < 0.0 {
                    -(-y).exp()
                } else {
                    y.exp()
                }
            }
            Self::Symlog { constant } => y.signum() * constant * (y.abs().exp_m1()),
        }
    }
}

/// Piecewise-linear map from ascending-or-descending `domain` stops to
/// `range` stops of the same length. Values beyond the domain extrapolate
/// along the terminal segment.
fn piecewise_map(domain: &[f64], range: &[f64], x: f64) -> f64 {
    debug_assert!(domain.len() >= 2 && domain.len() == range.len());
    let descending = domain[0] > domain[domain.len() - 1];
    let (d, r): (Vec<f64>, Vec<f64>) = if descending {
        (
            domain.iter().rev().copied().collect(),
            range.iter().rev().copied().collect(),
        )
    } else {
        (domain.to_vec(), range.to_vec())
    };
    let last = d.len() - 1;
    let i = d[1..last].partition_point(|stop| *stop <= x);
    let span = d[i + 1] - d[i];
    let t = if span == 0.0 { 0.5 } else { (x - d[i]) / span };
    r[i] + t * (r[i + 1] - r[i])
}

fn transformed_domain(transformer: &Transformer, domain: &[ScalarValue]) -> Result<Vec<f64>> {
    domain
        .iter()
        .map(|v| Ok(transformer.forward(v.to_numeric()?)))
        .collect()
}

fn input_value(
    value: &ScalarValue,
    percent: Option<bool>,
    transform: Option<&crate::scales::descriptor::TransformSpec>,
) -> Option<f64> {
    let x = value.as_f64()?;
    if let Some(t) = transform {
        Some(t.apply(x))
    } else if percent == Some(true) {
        Some(x * 100.0)
    } else {
        Some(x)
    }
}

fn apply_continuous(descriptor: &ContinuousDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    let x = match input_value(value, descriptor.percent, descriptor.transform.as_ref()) {
        Some(x) => x,
        None => return Ok(descriptor.unknown.clone().unwrap_or(ScalarValue::Null)),
    };
    let transformer = Transformer::for_continuous(descriptor);
    let mut sx = transformer.forward(x);
    let mut domain = transformed_domain(&transformer, &descriptor.domain)?;
    if domain.len() < 2 {
        return Err(PlotScaleError::internal(
            "continuous descriptor with fewer than two domain stops",
        ));
    }
    if descriptor.clamp == Some(true) {
        let (lo, hi) = domain_bounds(&domain);
        sx = sx.clamp(lo, hi);
    }

    match color_interpolate(descriptor.interpolate.as_ref()) {
        Some(interpolate) => {
            // Color output: normalize into [0, 1] over the reported range
            // fractions, then evaluate the interpolator.
            let anchors = numeric_range(&descriptor.range).unwrap_or_else(|| unit_anchors(domain.len()));
            let t = piecewise_map(&domain, &anchors, sx);
            Ok(ScalarValue::string(evaluate_interpolate(interpolate, t)?))
        }
        None => {
            let range = numeric_range(&descriptor.range).ok_or_else(|| {
                PlotScaleError::internal("continuous descriptor with non-numeric range")
            })?;
            if range.len() != domain.len() {
                // Extra domain stops beyond range coverage keep their
                // reported positions but add no segments.
                domain.truncate(range.len());
            }
            let mut y = piecewise_map(&domain, &range, sx);
            if matches!(descriptor.interpolate, Some(Interpolate::Round)) {
                y = y.round();
            }
            Ok(ScalarValue::number(y))
        }
    }
}

fn invert_continuous(descriptor: &ContinuousDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    let range = numeric_range(&descriptor.range).ok_or_else(|| {
        PlotScaleError::invalid_definition(format!(
            "invert is not defined for {} scales with a non-numeric range",
            descriptor_type_name(descriptor)
        ))
    })?;
    let y = value.to_numeric()?;
    let transformer = Transformer::for_continuous(descriptor);
    let mut domain = transformed_domain(&transformer, &descriptor.domain)?;
    domain.truncate(range.len());
    let sx = piecewise_map(&range, &domain, y);
    let mut x = transformer.inverse(sx);
    if descriptor.percent == Some(true) {
        x /= 100.0;
    }
    match descriptor.scale_type {
        ContinuousType::Utc | ContinuousType::Time => {
            Ok(ScalarValue::date_from_millis(x.round() as i64))
        }
        _ => Ok(ScalarValue::number(x)),
    }
}

fn descriptor_type_name(descriptor: &ContinuousDescriptor) -> &'static str {
    match descriptor.scale_type {
        ContinuousType::Linear => "linear",
        ContinuousType::Pow => "pow",
        ContinuousType::Log => "log",
        ContinuousType::Symlog => "symlog",
        ContinuousType::Utc => "utc",
        ContinuousType::Time => "time",
    }
}

fn domain_bounds(domain: &[f64]) -> (f64, f64) {
    let first = domain[0];
    let last = domain[domain.len() - 1];
    if first <= last {
        (first, last)
    } else {
        (last, first)
    }
}

fn unit_anchors(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| i as f64 / (count - 1).max(1) as f64)
        .collect()
}

fn numeric_range(range: &[ScalarValue]) -> Option<Vec<f64>> {
    if range.len() < 2 {
        return None;
    }
    range
        .iter()
        .map(|v| match v {
            ScalarValue::Number(n) => Some(n.into_inner()),
            _ => None,
        })
        .collect()
}

fn color_interpolate(interpolate: Option<&Interpolate>) -> Option<&Interpolate> {
    match interpolate {
        Some(i @ (Interpolate::Rgb { .. } | Interpolate::Scheme { .. })) => Some(i),
        _ => None,
    }
}

/// Evaluates a color interpolator at normalized position `t`.
pub(crate) fn evaluate_interpolate(interpolate: &Interpolate, t: f64) -> Result<String> {
    match interpolate {
        Interpolate::Number | Interpolate::Round => Err(PlotScaleError::internal(
            "numeric interpolator evaluated as a color",
        )),
        Interpolate::Rgb {
            colors,
            anchors,
            flipped,
        } => {
            let t = if *flipped { 1.0 - t } else { t };
            let stops: Vec<Rgb> = colors
                .iter()
                .map(|c| {
                    parse_color(c).ok_or_else(|| {
                        PlotScaleError::invalid_definition(format!("unsupported color: {c}"))
                    })
                })
                .collect::<Result<_>>()?;
            let color = match anchors {
                Some(anchors) if anchors.len() == stops.len() && stops.len() >= 2 => {
                    sample_anchored(&stops, anchors, t)
                }
                _ => sample_stops(&stops, t),
            };
            color.map(format_rgb).ok_or_else(|| {
                PlotScaleError::invalid_definition("interpolator has no color stops")
            })
        }
        Interpolate::Scheme {
            scheme,
            flipped,
            extent,
        } => {
            let mut t = if *flipped { 1.0 - t } else { t };
            if let Some([lo, hi]) = extent {
                t = lo + t.clamp(0.0, 1.0) * (hi - lo);
            }
            let stops = scheme_stops(scheme).ok_or_else(|| {
                PlotScaleError::invalid_definition(format!("unknown scheme: {scheme}"))
            })?;
            sample_stops(&stops, t).map(format_rgb).ok_or_else(|| {
                PlotScaleError::invalid_definition(format!("scheme {scheme} has no color stops"))
            })
        }
    }
}

fn sample_anchored(stops: &[Rgb], anchors: &[f64], t: f64) -> Option<Rgb> {
    let t = t.clamp(anchors[0], anchors[anchors.len() - 1]);
    let last = anchors.len() - 1;
    let i = anchors[1..last].partition_point(|a| *a <= t);
    let span = anchors[i + 1] - anchors[i];
    let local = if span == 0.0 {
        0.5
    } else {
        (t - anchors[i]) / span
    };
    Some(lerp_rgb(stops[i], stops[i + 1], local))
}

// ---------------------------------------------------------------------------
// Diverging

fn apply_diverging(descriptor: &DivergingDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    let x = match input_value(value, descriptor.percent, None) {
        Some(x) => x,
        None => return Ok(ScalarValue::Null),
    };
    let transformer = Transformer::for_diverging(descriptor);
    if descriptor.domain.len() != 2 {
        return Err(PlotScaleError::internal(
            "diverging descriptor requires a two-element domain",
        ));
    }
    let lo = transformer.forward(descriptor.domain[0].to_numeric()?);
    let hi = transformer.forward(descriptor.domain[1].to_numeric()?);
    let pivot = transformer.forward(descriptor.pivot);
    let mut sx = transformer.forward(x);
    if descriptor.clamp == Some(true) {
        sx = sx.clamp(lo.min(hi), lo.max(hi));
    }
    let t = piecewise_map(&[lo, pivot, hi], &[0.0, 0.5, 1.0], sx);
    Ok(ScalarValue::string(evaluate_interpolate(
        &descriptor.interpolate,
        t,
    )?))
}

// ---------------------------------------------------------------------------
// Threshold / quantile / quantize

fn apply_threshold(descriptor: &ThresholdDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    let x = match input_value(value, descriptor.percent, None) {
        Some(x) => x,
        None => return Ok(descriptor.unknown.clone().unwrap_or(ScalarValue::Null)),
    };
    let mut bucket = 0usize;
    for cut in &descriptor.domain {
        if x >= cut.to_numeric()? {
            bucket += 1;
        } else {
            break;
        }
    }
    descriptor
        .range
        .get(bucket)
        .cloned()
        .ok_or_else(|| PlotScaleError::internal("threshold range shorter than domain + 1"))
}

// ---------------------------------------------------------------------------
// Ordinal / point / band

/// Positional layout of a point or band scale.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BandLayout {
    pub positions: Vec<f64>,
    pub bandwidth: f64,
    pub step: f64,
}

/// Computes band start positions, bandwidth, and step from the positional
/// extent. `round: true` floors the step and rounds the offsets.
pub(crate) fn band_layout(
    count: usize,
    r0: f64,
    r1: f64,
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
) -> BandLayout {
    let reverse = r1 < r0;
    let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
    let n = count as f64;
    let mut step = (stop - start) / 1f64.max(n - padding_inner + padding_outer * 2.0);
    if round {
        step = step.floor();
    }
    let mut offset = start + (stop - start - step * (n - padding_inner)) * align;
    let mut bandwidth = step * (1.0 - padding_inner);
    if round {
        offset = offset.round();
        bandwidth = bandwidth.round();
    }
    let mut positions: Vec<f64> = (0..count).map(|i| offset + step * i as f64).collect();
    if reverse {
        positions.reverse();
    }
    BandLayout {
        positions,
        bandwidth,
        step,
    }
}

fn apply_discrete(descriptor: &DiscreteDescriptor, value: &ScalarValue) -> Result<ScalarValue> {
    let index = descriptor.domain.iter().position(|v| v == value);
    let index = match index {
        Some(i) => i,
        None => return Ok(descriptor.unknown.clone().unwrap_or(ScalarValue::Null)),
    };
    match descriptor.scale_type {
        DiscreteType::Ordinal => {
            if descriptor.range.is_empty() {
                return Err(PlotScaleError::internal("ordinal descriptor with empty range"));
            }
            Ok(descriptor.range[index % descriptor.range.len()].clone())
        }
        DiscreteType::Point | DiscreteType::Band => {
            let range = numeric_range(&descriptor.range).ok_or_else(|| {
                PlotScaleError::internal("positional descriptor with non-numeric range")
            })?;
            let point = descriptor.scale_type == DiscreteType::Point;
            let layout = band_layout(
                descriptor.domain.len(),
                range[0],
                range[1],
                descriptor.padding_inner.unwrap_or(if point { 1.0 } else { 0.1 }),
                descriptor.padding_outer.unwrap_or(if point { 0.5 } else { 0.1 }),
                descriptor.align.unwrap_or(0.5),
                descriptor.round.unwrap_or(true),
            );
            Ok(ScalarValue::number(layout.positions[index]))
        }
    }
}
