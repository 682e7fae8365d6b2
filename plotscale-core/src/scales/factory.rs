//! Descriptor assembly.
//!
//! Drives one scale through inference, domain construction, and range
//! resolution, and records the consumed options on the resulting descriptor.
//! A finalized descriptor fed back as options short-circuits the whole chain
//! and deserializes directly, which makes compilation idempotent.

use plotscale_common::{PlotScaleError, Result, ResultWithContext, ScalarValue};

use crate::channel::Channel;
use crate::scales::apply::band_layout;
use crate::scales::descriptor::{
    ContinuousDescriptor, ContinuousType, DiscreteDescriptor, DiscreteType, DivergingDescriptor,
    IdentityDescriptor, Interpolate, ScaleDescriptor, ThresholdDescriptor, ThresholdType,
};
use crate::scales::domain::{
    continuous_domain, diverging_domain, ordinal_domain, quantile_cuts, quantize_cuts,
    threshold_domain, DEFAULT_QUANTILE_BUCKETS,
};
use crate::scales::infer::{default_exponent, infer, InferredKind};
use crate::scales::range::{bucket_output, continuous_output, ordinal_output, position_extent};
use crate::scales::registry::ScaleName;
use crate::spec::plot::PlotDimensions;
use crate::spec::scale::ScaleOptionsSpec;

pub(crate) fn build_scale(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    dims: &PlotDimensions,
    limit: usize,
) -> Result<ScaleDescriptor> {
    build_scale_inner(name, options, channels, dims, limit)
        .with_context(|| format!("in the {name} scale"))
}

fn build_scale_inner(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    dims: &PlotDimensions,
    limit: usize,
) -> Result<ScaleDescriptor> {
    if options.is_finalized() {
        if let Some(descriptor) = reuse_descriptor(options) {
            return Ok(descriptor);
        }
    }

    let inference = infer(name, options, channels)?;

    if matches!(inference.kind, InferredKind::Discrete(_)) && is_implicit_unknown(options) {
        return Err(PlotScaleError::implicit_unknown(name.as_str()));
    }

    match inference.kind {
        InferredKind::Identity => Ok(ScaleDescriptor::Identity(IdentityDescriptor::default())),
        InferredKind::Continuous(scale_type) => {
            build_continuous(name, options, channels, dims, scale_type, &inference)
        }
        InferredKind::Diverging(scale_type) => {
            build_diverging(name, options, channels, scale_type, &inference)
        }
        InferredKind::Threshold(scale_type) => {
            build_threshold(name, options, channels, scale_type)
        }
        InferredKind::Discrete(scale_type) => {
            build_discrete(name, options, channels, dims, scale_type, &inference, limit)
        }
    }
}

/// A finalized options object is a descriptor in options clothing; convert
/// it structurally instead of rebuilding.
fn reuse_descriptor(options: &ScaleOptionsSpec) -> Option<ScaleDescriptor> {
    let value = serde_json::to_value(options).ok()?;
    serde_json::from_value(value).ok()
}

fn is_implicit_unknown(options: &ScaleOptionsSpec) -> bool {
    matches!(&options.unknown, Some(ScalarValue::String(s)) if s == "implicit")
}

fn build_continuous(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    dims: &PlotDimensions,
    scale_type: ContinuousType,
    inference: &crate::scales::infer::Inference,
) -> Result<ScaleDescriptor> {
    let color_output = name.is_color();
    let reverse = options.reverse == Some(true);
    let domain = continuous_domain(options, channels, scale_type, reverse && !color_output)?;

    let (range, interpolate) = if name.is_position() {
        let extent = position_extent(name, dims, options)?;
        let interpolate = options.round.and_then(|round| round.then_some(Interpolate::Round));
        (
            extent.into_iter().map(ScalarValue::number).collect(),
            interpolate,
        )
    } else {
        let data_max = domain
            .iter()
            .filter_map(|v| v.as_f64())
            .fold(None, |max: Option<f64>, v| {
                Some(max.map_or(v, |m| m.max(v)))
            });
        let output = continuous_output(
            name,
            options,
            inference,
            domain.len(),
            data_max,
            reverse && color_output,
            false,
        )?;
        (output.range, output.interpolate)
    };

    Ok(ScaleDescriptor::Continuous(ContinuousDescriptor {
        scale_type,
        domain,
        range,
        interpolate,
        clamp: options.clamp,
        exponent: inference
            .exponent
            .or(options.exponent)
            .or_else(|| default_exponent(name, inference)),
        base: options.base,
        constant: options.constant,
        percent: options.percent,
        interval: options.interval.map(|i| i.resolve()).transpose()?,
        transform: options.transform,
        unknown: options.unknown.clone(),
    }))
}

fn build_diverging(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    scale_type: crate::scales::descriptor::DivergingType,
    inference: &crate::scales::infer::Inference,
) -> Result<ScaleDescriptor> {
    let (lo, hi, pivot, input_flipped) = diverging_domain(name, options, channels, scale_type)?;
    let flip = input_flipped != (options.reverse == Some(true));
    let output = continuous_output(name, options, inference, 2, None, flip, true)?;
    let interpolate = output.interpolate.ok_or_else(|| {
        PlotScaleError::invalid_definition(format!(
            "the {name} diverging scale needs a scheme or a color range"
        ))
    })?;
    Ok(ScaleDescriptor::Diverging(DivergingDescriptor {
        scale_type,
        domain: vec![ScalarValue::number(lo), ScalarValue::number(hi)],
        pivot,
        symmetric: false,
        interpolate,
        range: (!output.range.is_empty()).then_some(output.range),
        clamp: options.clamp,
        exponent: inference.exponent.or(options.exponent),
        base: options.base,
        constant: options.constant,
        percent: options.percent,
    }))
}

fn build_threshold(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    scale_type: ThresholdType,
) -> Result<ScaleDescriptor> {
    let buckets_requested = options.n.unwrap_or(DEFAULT_QUANTILE_BUCKETS);
    let (cuts, descending) = match scale_type {
        ThresholdType::Threshold => threshold_domain(name, options)?,
        ThresholdType::Quantile => (
            quantile_cuts(name, options, channels, buckets_requested)?,
            false,
        ),
        ThresholdType::Quantize => quantize_cuts(name, options, channels, buckets_requested)?,
    };
    let range = bucket_output(name, options, cuts.len() + 1, descending)?;
    // Quantile and quantize are construction recipes, not families of their
    // own; the finalized descriptor is always a plain threshold scale.
    Ok(ScaleDescriptor::Threshold(ThresholdDescriptor {
        scale_type: ThresholdType::Threshold,
        domain: cuts.into_iter().map(ScalarValue::number).collect(),
        range,
        percent: options.percent,
        unknown: options.unknown.clone(),
    }))
}

fn build_discrete(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    dims: &PlotDimensions,
    scale_type: DiscreteType,
    inference: &crate::scales::infer::Inference,
    limit: usize,
) -> Result<ScaleDescriptor> {
    // The safety bound guards position and facet scales, where every domain
    // value gets its own slot of the band layout. Encoding scales recycle
    // their range, so a huge inferred color domain is allowed.
    let limit = if name.is_position() { limit } else { usize::MAX };
    let domain = ordinal_domain(name, options, channels, limit)?;

    if matches!(scale_type, DiscreteType::Point | DiscreteType::Band) {
        let point = scale_type == DiscreteType::Point;
        let extent = position_extent(name, dims, options)?;
        let padding_inner = if point {
            1.0
        } else {
            options.padding_inner.or(options.padding).unwrap_or(0.1)
        };
        let padding_outer = if point {
            options.padding_outer.or(options.padding).unwrap_or(0.5)
        } else {
            options.padding_outer.or(options.padding).unwrap_or(0.1)
        };
        let align = options.align.unwrap_or(0.5);
        let round = options.round.unwrap_or(true);
        let layout = band_layout(
            domain.len(),
            extent[0],
            extent[1],
            padding_inner,
            padding_outer,
            align,
            round,
        );
        return Ok(ScaleDescriptor::Discrete(DiscreteDescriptor {
            scale_type,
            domain,
            range: extent.into_iter().map(ScalarValue::number).collect(),
            padding_inner: Some(padding_inner),
            padding_outer: Some(padding_outer),
            align: Some(align),
            round: Some(round),
            bandwidth: Some(layout.bandwidth),
            step: Some(layout.step),
            interval: options.interval.map(|i| i.resolve()).transpose()?,
            unknown: options.unknown.clone(),
        }));
    }

    let range = ordinal_output(name, options, inference, domain.len())?;
    Ok(ScaleDescriptor::Discrete(DiscreteDescriptor {
        scale_type,
        domain,
        range,
        padding_inner: None,
        padding_outer: None,
        align: None,
        round: None,
        bandwidth: None,
        step: None,
        interval: options.interval.map(|i| i.resolve()).transpose()?,
        unknown: options.unknown.clone(),
    }))
}
