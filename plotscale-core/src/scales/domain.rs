//! Domain construction.
//!
//! Builds each scale's input domain from explicit options or pooled channel
//! data, then applies the consumed construction options in order: interval
//! snapping, extent, zero extension, nicing, reversal.

use ahash::HashSet;
use itertools::{Itertools, MinMaxResult};
use log::warn;

use plotscale_common::{PlotScaleError, Result, ScalarValue};

use crate::channel::Channel;
use crate::scales::apply::Transformer;
use crate::scales::descriptor::{ContinuousType, DivergingType, TransformSpec};
use crate::scales::interval::NumberInterval;
use crate::scales::registry::ScaleName;
use crate::scales::ticks::{nice, ticks};
use crate::spec::scale::ScaleOptionsSpec;

pub(crate) const DEFAULT_QUANTILE_BUCKETS: usize = 5;

/// The value transform in effect: an explicit named transform, or the
/// percent shorthand.
pub(crate) fn effective_transform(options: &ScaleOptionsSpec) -> Option<TransformSpec> {
    options
        .transform
        .or_else(|| (options.percent == Some(true)).then_some(TransformSpec::Percent))
}

fn transformed(value: f64, transform: Option<TransformSpec>) -> f64 {
    match transform {
        Some(t) => t.apply(value),
        None => value,
    }
}

/// Pools numeric channel values, transformed and interval-floored.
fn numeric_values(
    channels: &[&Channel],
    transform: Option<TransformSpec>,
    interval: Option<NumberInterval>,
) -> Vec<f64> {
    channels
        .iter()
        .flat_map(|c| c.values.iter())
        .filter_map(|v| v.as_f64())
        .map(|v| transformed(v, transform))
        .map(|v| match interval {
            Some(interval) => interval.floor(v),
            None => v,
        })
        .collect()
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    match values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .minmax_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

/// Moves the domain stop nearest zero to zero, unless the domain already
/// spans (or touches) zero.
fn extend_to_zero(stops: &mut [f64]) {
    let has_non_positive = stops.iter().any(|v| *v <= 0.0);
    let has_non_negative = stops.iter().any(|v| *v >= 0.0);
    if has_non_positive && has_non_negative {
        return;
    }
    if let Some(nearest) = (0..stops.len()).min_by(|a, b| {
        stops[*a]
            .abs()
            .partial_cmp(&stops[*b].abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        stops[nearest] = 0.0;
    }
}

/// Builds the domain of a continuous scale as numeric stops (or dates for
/// time scales). `reverse` is applied here for numeric outputs; color scales
/// consume reversal in the interpolator instead, and pass `false`.
pub(crate) fn continuous_domain(
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    scale_type: ContinuousType,
    reverse: bool,
) -> Result<Vec<ScalarValue>> {
    if matches!(scale_type, ContinuousType::Utc | ContinuousType::Time) {
        return temporal_domain(options, channels, reverse);
    }

    let transform = effective_transform(options);
    let interval = options.interval.map(|i| i.resolve()).transpose()?;

    let mut stops: Vec<f64> = match &options.domain {
        Some(domain) => domain
            .iter()
            .map(|v| Ok(transformed(v.to_numeric()?, transform)))
            .collect::<Result<_>>()?,
        None => {
            let values = numeric_values(channels, transform, interval);
            match extent(&values) {
                Some((lo, hi)) => vec![lo, hi],
                None => vec![0.0, 1.0],
            }
        }
    };
    if stops.len() < 2 {
        return Err(PlotScaleError::invalid_definition(
            "a continuous domain needs at least two elements",
        ));
    }

    if options.zero == Some(true) {
        extend_to_zero(&mut stops);
    }
    if let Some(count) = options.nice.and_then(|n| n.count()) {
        let (lo, hi) = nice(stops[0], stops[stops.len() - 1], count);
        stops[0] = lo;
        let last = stops.len() - 1;
        stops[last] = hi;
    }
    if reverse {
        stops.reverse();
    }

    Ok(stops.into_iter().map(ScalarValue::number).collect())
}

fn temporal_domain(
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    reverse: bool,
) -> Result<Vec<ScalarValue>> {
    let mut stops: Vec<ScalarValue> = match &options.domain {
        Some(domain) => domain.to_vec(),
        None => {
            let mut dates: Vec<&ScalarValue> = channels
                .iter()
                .flat_map(|c| c.values.iter())
                .filter(|v| matches!(v, ScalarValue::Date(_)))
                .collect();
            dates.sort_by(|a, b| a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(std::cmp::Ordering::Equal));
            match (dates.first(), dates.last()) {
                (Some(first), Some(last)) => vec![(*first).clone(), (*last).clone()],
                _ => {
                    return Err(PlotScaleError::invalid_definition(
                        "a time scale needs dates or an explicit domain",
                    ))
                }
            }
        }
    };
    if stops.len() < 2 {
        return Err(PlotScaleError::invalid_definition(
            "a continuous domain needs at least two elements",
        ));
    }
    if reverse {
        stops.reverse();
    }
    Ok(stops)
}

/// Builds an ordinal domain: explicit, interval-expanded, or the deduplicated
/// union of channel values in first-occurrence order. Implicit domains over
/// `limit` distinct values fail.
pub(crate) fn ordinal_domain(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    limit: usize,
) -> Result<Vec<ScalarValue>> {
    let mut domain: Vec<ScalarValue> = if let Some(domain) = &options.domain {
        domain.to_vec()
    } else if let Some(interval) = options.interval {
        let interval = interval.resolve()?;
        let values: Vec<f64> = channels
            .iter()
            .flat_map(|c| c.values.iter())
            .filter_map(|v| v.as_f64())
            .collect();
        let (lo, hi) = extent(&values).ok_or_else(|| {
            PlotScaleError::invalid_definition(format!(
                "the {name} scale has an interval but no data to cover"
            ))
        })?;
        interval
            .range(lo, hi)
            .into_iter()
            .map(ScalarValue::number)
            .collect()
    } else {
        let mut seen: HashSet<&ScalarValue> = HashSet::default();
        let mut domain = Vec::new();
        for value in channels.iter().flat_map(|c| c.values.iter()) {
            if value.is_null() {
                continue;
            }
            if seen.insert(value) {
                if domain.len() == limit {
                    return Err(PlotScaleError::implicit_domain_overflow(
                        name.as_str(),
                        limit + 1,
                        limit,
                    ));
                }
                domain.push(value.clone());
            }
        }
        domain
    };

    if options.reverse == Some(true) {
        domain.reverse();
    }
    Ok(domain)
}

/// Validates and normalizes a threshold domain. Returns the ascending cut
/// points and whether a descending input was flipped (the range must then be
/// reversed to match).
pub(crate) fn threshold_domain(
    name: ScaleName,
    options: &ScaleOptionsSpec,
) -> Result<(Vec<f64>, bool)> {
    let cuts: Vec<f64> = match &options.domain {
        Some(domain) => domain
            .iter()
            .map(|v| v.to_numeric())
            .collect::<Result<_>>()?,
        None => vec![0.0],
    };
    if cuts.windows(2).all(|w| w[0] < w[1]) {
        Ok((cuts, false))
    } else if cuts.windows(2).all(|w| w[0] > w[1]) {
        Ok((cuts.into_iter().rev().collect(), true))
    } else {
        Err(PlotScaleError::non_monotonic_domain(name.as_str()))
    }
}

/// R-7 quantile of a sorted sample.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Quantile cut points: `buckets - 1` R-7 quantiles over the sorted sample.
/// An explicit domain provides the sample in place of channel data.
pub(crate) fn quantile_cuts(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    buckets: usize,
) -> Result<Vec<f64>> {
    let transform = effective_transform(options);
    let mut sample: Vec<f64> = match &options.domain {
        Some(domain) => domain
            .iter()
            .map(|v| Ok(transformed(v.to_numeric()?, transform)))
            .collect::<Result<_>>()?,
        None => numeric_values(channels, transform, None),
    };
    if sample.is_empty() {
        return Err(PlotScaleError::invalid_definition(format!(
            "the {name} scale needs data or a domain to compute quantiles"
        )));
    }
    sample.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok((1..buckets)
        .map(|i| quantile_sorted(&sample, i as f64 / buckets as f64))
        .collect())
}

/// Quantize cut points: nice tick values inside the data extent. The bucket
/// count becomes `cuts + 1`, which may differ from the requested count.
/// Returns the cuts and whether a descending explicit domain was flipped.
pub(crate) fn quantize_cuts(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    buckets: usize,
) -> Result<(Vec<f64>, bool)> {
    let transform = effective_transform(options);
    let (lo, hi, flipped) = match &options.domain {
        Some(domain) => {
            let stops: Vec<f64> = domain
                .iter()
                .map(|v| Ok(transformed(v.to_numeric()?, transform)))
                .collect::<Result<_>>()?;
            match (stops.first(), stops.last()) {
                (Some(first), Some(last)) if first <= last => (*first, *last, false),
                (Some(first), Some(last)) => (*last, *first, true),
                _ => {
                    return Err(PlotScaleError::invalid_definition(format!(
                        "the {name} scale has an empty domain"
                    )))
                }
            }
        }
        None => {
            let values = numeric_values(channels, transform, None);
            let (lo, hi) = extent(&values).ok_or_else(|| {
                PlotScaleError::invalid_definition(format!(
                    "the {name} scale needs data or a domain to quantize"
                ))
            })?;
            (lo, hi, false)
        }
    };
    Ok((ticks(lo, hi, buckets), flipped))
}

/// Builds a diverging domain: two ascending stops around the pivot, widened
/// symmetrically in transform space unless `symmetric: false`. Returns the
/// stops, the pivot, and whether the input direction was descending (the
/// interpolator is flipped to compensate).
pub(crate) fn diverging_domain(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
    scale_type: DivergingType,
) -> Result<(f64, f64, f64, bool)> {
    let transform = effective_transform(options);
    let mut stops: Vec<f64> = match &options.domain {
        Some(domain) => domain
            .iter()
            .map(|v| Ok(transformed(v.to_numeric()?, transform)))
            .collect::<Result<_>>()?,
        None => {
            let values = numeric_values(channels, transform, None);
            match extent(&values) {
                Some((lo, hi)) => vec![lo, hi],
                None => vec![0.0, 1.0],
            }
        }
    };
    if stops.len() > 2 {
        warn!(
            "the {name} scale domain contains extra elements; a diverging domain has exactly two",
        );
        stops.truncate(2);
    }
    if stops.len() < 2 {
        return Err(PlotScaleError::invalid_definition(format!(
            "the {name} scale needs a two-element domain"
        )));
    }

    let flipped = stops[0] > stops[1];
    let (mut lo, mut hi) = if flipped {
        (stops[1], stops[0])
    } else {
        (stops[0], stops[1])
    };

    if let Some(count) = options.nice.and_then(|n| n.count()) {
        let niced = nice(lo, hi, count);
        lo = niced.0;
        hi = niced.1;
    }

    let pivot = options.pivot.unwrap_or(0.0);
    if options.symmetric != Some(false) {
        let transformer =
            Transformer::for_diverging_type(scale_type, options.exponent, options.constant);
        let s_pivot = transformer.forward(pivot);
        let below = (transformer.forward(lo) - s_pivot).abs();
        let above = (transformer.forward(hi) - s_pivot).abs();
        let half = below.max(above);
        lo = transformer.inverse(s_pivot - half);
        hi = transformer.inverse(s_pivot + half);
    }

    Ok((lo, hi, pivot, flipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelScale;
    use crate::spec::scale::NiceSpec;

    fn channel(values: &[f64]) -> Channel {
        Channel {
            name: "x".to_string(),
            values: values.iter().map(|v| ScalarValue::number(*v)).collect(),
            scale: ChannelScale::Auto,
        }
    }

    fn stops(domain: &[ScalarValue]) -> Vec<f64> {
        domain.iter().map(|v| v.as_f64().unwrap()).collect()
    }

    #[test]
    fn test_zero_extension() {
        let mut ascending = [2700.0, 6300.0];
        extend_to_zero(&mut ascending);
        assert_eq!(ascending, [0.0, 6300.0]);

        let mut descending = [4000.0, 2000.0];
        extend_to_zero(&mut descending);
        assert_eq!(descending, [4000.0, 0.0]);

        let mut polylinear = [1000.0, 2000.0, 4000.0];
        extend_to_zero(&mut polylinear);
        assert_eq!(polylinear, [0.0, 2000.0, 4000.0]);

        let mut spanning = [-10.0, 10.0];
        extend_to_zero(&mut spanning);
        assert_eq!(spanning, [-10.0, 10.0]);
    }

    #[test]
    fn test_extent_with_nice() {
        let data = channel(&[2700.0, 4100.0, 6300.0]);
        let refs = [&data];
        let options = ScaleOptionsSpec {
            nice: Some(NiceSpec::Enabled(true)),
            ..Default::default()
        };
        let domain =
            continuous_domain(&options, &refs, ContinuousType::Linear, false).unwrap();
        assert_eq!(stops(&domain), vec![2500.0, 6500.0]);
    }

    #[test]
    fn test_nice_applies_to_explicit_domain() {
        let options = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(1701.0), ScalarValue::number(7299.0)]),
            nice: Some(NiceSpec::Count(5)),
            ..Default::default()
        };
        let domain = continuous_domain(&options, &[], ContinuousType::Linear, false).unwrap();
        assert_eq!(stops(&domain), vec![1000.0, 8000.0]);
    }

    #[test]
    fn test_implicit_domain_limit() {
        let values: Vec<ScalarValue> = (0..=3).map(|i| ScalarValue::string(format!("v{i}"))).collect();
        let data = Channel {
            name: "x".to_string(),
            values,
            scale: ChannelScale::Auto,
        };
        let refs = [&data];
        assert!(ordinal_domain(ScaleName::X, &ScaleOptionsSpec::default(), &refs, 4).is_ok());
        let err =
            ordinal_domain(ScaleName::X, &ScaleOptionsSpec::default(), &refs, 3).unwrap_err();
        assert!(err.to_string().contains("implicit ordinal domain of x scale"));
    }

    #[test]
    fn test_threshold_monotonicity() {
        let ascending = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(0.0), ScalarValue::number(10.0)]),
            ..Default::default()
        };
        assert_eq!(
            threshold_domain(ScaleName::Color, &ascending).unwrap(),
            (vec![0.0, 10.0], false)
        );

        let descending = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(10.0), ScalarValue::number(0.0)]),
            ..Default::default()
        };
        assert_eq!(
            threshold_domain(ScaleName::Color, &descending).unwrap(),
            (vec![0.0, 10.0], true)
        );

        let jumbled = ScaleOptionsSpec {
            domain: Some(vec![
                ScalarValue::number(0.0),
                ScalarValue::number(10.0),
                ScalarValue::number(5.0),
            ]),
            ..Default::default()
        };
        let err = threshold_domain(ScaleName::Color, &jumbled).unwrap_err();
        assert_eq!(
            err.to_string().lines().next().unwrap(),
            "the color scale has a non-monotonic domain"
        );
    }

    #[test]
    fn test_quantile_cuts_r7() {
        let data = channel(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let refs = [&data];
        let cuts =
            quantile_cuts(ScaleName::Color, &ScaleOptionsSpec::default(), &refs, 4).unwrap();
        assert_eq!(cuts, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_quantize_cuts_are_ticks() {
        let options = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(2700.0), ScalarValue::number(6300.0)]),
            ..Default::default()
        };
        let (cuts, flipped) = quantize_cuts(ScaleName::Color, &options, &[], 5).unwrap();
        assert_eq!(cuts, vec![3000.0, 4000.0, 5000.0, 6000.0]);
        assert!(!flipped);
    }

    #[test]
    fn test_diverging_symmetric_widening() {
        let options = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(-0.78), ScalarValue::number(1.35)]),
            ..Default::default()
        };
        let (lo, hi, pivot, flipped) =
            diverging_domain(ScaleName::Color, &options, &[], DivergingType::Diverging).unwrap();
        assert_eq!((lo, hi), (-1.35, 1.35));
        assert_eq!(pivot, 0.0);
        assert!(!flipped);
    }

    #[test]
    fn test_diverging_descending_input_flips() {
        let options = ScaleOptionsSpec {
            domain: Some(vec![ScalarValue::number(1.0), ScalarValue::number(-1.0)]),
            ..Default::default()
        };
        let (lo, hi, _, flipped) =
            diverging_domain(ScaleName::Color, &options, &[], DivergingType::Diverging).unwrap();
        assert_eq!((lo, hi), (-1.0, 1.0));
        assert!(flipped);
    }
}
