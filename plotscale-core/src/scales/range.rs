//! Range construction.
//!
//! Positional ranges derive from frame geometry (width, height, margins,
//! insets); encoding ranges resolve in priority order: explicit range, named
//! scheme, explicit interpolator, then the family default for the scale name.

use plotscale_common::{PlotScaleError, Result, ScalarValue};

use crate::scales::descriptor::Interpolate;
use crate::scales::infer::Inference;
use crate::scales::registry::ScaleName;
use crate::scales::schemes::{lookup_scheme, scheme_colors, SYMBOL_RANGE};
use crate::spec::plot::PlotDimensions;
use crate::spec::scale::{InterpolateSpec, ScaleOptionsSpec};

pub(crate) const DEFAULT_LENGTH_RANGE: (f64, f64) = (0.0, 12.0);

/// Positional extent for a scale name. Vertical scales run top-down. Insets
/// shrink the extent from both ends; when they cross, both endpoints
/// collapse to the midpoint.
pub(crate) fn position_extent(
    name: ScaleName,
    dims: &PlotDimensions,
    options: &ScaleOptionsSpec,
) -> Result<Vec<f64>> {
    let (lo, hi) = match &options.range {
        Some(range) => {
            let stops: Vec<f64> = range
                .iter()
                .map(|v| v.to_numeric())
                .collect::<Result<_>>()?;
            match (stops.first(), stops.last()) {
                (Some(first), Some(last)) if stops.len() >= 2 => (*first, *last),
                _ => {
                    return Err(PlotScaleError::invalid_definition(format!(
                        "the {name} scale needs a two-element range"
                    )))
                }
            }
        }
        None if name.is_vertical() => (dims.height - dims.margin_bottom, dims.margin_top),
        None => (dims.margin_left, dims.width - dims.margin_right),
    };

    let inset = options.inset.unwrap_or(dims.inset);
    let direction = if hi >= lo { 1.0 } else { -1.0 };
    let lo_inset = lo + direction * inset;
    let hi_inset = hi - direction * inset;
    if (hi_inset - lo_inset) * direction < 0.0 {
        let mid = (lo + hi) / 2.0;
        Ok(vec![mid, mid])
    } else {
        Ok(vec![lo_inset, hi_inset])
    }
}

/// Resolved output of a continuous or diverging scale: the reported range
/// plus the interpolator for color outputs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ContinuousOutput {
    pub range: Vec<ScalarValue>,
    pub interpolate: Option<Interpolate>,
}

pub(crate) fn continuous_output(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    inference: &Inference,
    domain_len: usize,
    data_max: Option<f64>,
    flip: bool,
    diverging: bool,
) -> Result<ContinuousOutput> {
    if let Some(range) = &options.range {
        return explicit_output(name, options, range, domain_len, flip, diverging);
    }

    if let Some(scheme) = &options.scheme {
        return Ok(ContinuousOutput {
            range: Vec::new(),
            interpolate: Some(scheme_interpolate(scheme, flip, None)?),
        });
    }

    if let Some(interpolate) = &options.interpolate {
        let resolved = match interpolate {
            InterpolateSpec::Full(full) => {
                let full = full.clone();
                if flip {
                    full.flip()
                } else {
                    full
                }
            }
            InterpolateSpec::Name(spec_name) => named_interpolate(name, spec_name)?,
        };
        return Ok(ContinuousOutput {
            range: Vec::new(),
            interpolate: Some(resolved),
        });
    }

    // Family defaults.
    if name.is_color() {
        let scheme = inference
            .default_scheme
            .unwrap_or(if diverging { "rdbu" } else { "turbo" });
        return Ok(ContinuousOutput {
            range: Vec::new(),
            interpolate: Some(scheme_interpolate(scheme, flip, None)?),
        });
    }
    let (lo, hi) = match name {
        ScaleName::Opacity => (0.0, 1.0),
        ScaleName::Length => DEFAULT_LENGTH_RANGE,
        ScaleName::R => (0.0, (4.5 * data_max.unwrap_or(1.0).max(0.0)).sqrt()),
        _ => {
            return Err(PlotScaleError::invalid_definition(format!(
                "the {name} scale needs an explicit range"
            )))
        }
    };
    Ok(ContinuousOutput {
        range: vec![ScalarValue::number(lo), ScalarValue::number(hi)],
        interpolate: round_interpolate(options),
    })
}

fn explicit_output(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    range: &[ScalarValue],
    domain_len: usize,
    flip: bool,
    diverging: bool,
) -> Result<ContinuousOutput> {
    if range.len() < 2 {
        return Err(PlotScaleError::invalid_definition(format!(
            "the {name} scale needs at least two range values"
        )));
    }
    let numeric: Option<Vec<f64>> = range
        .iter()
        .map(|v| match v {
            ScalarValue::Number(n) => Some(n.into_inner()),
            _ => None,
        })
        .collect();

    match numeric {
        Some(stops) => {
            // Numeric range. With a scheme, the stops confine the gradient
            // to a sub-interval of the unit range.
            if let Some(scheme) = &options.scheme {
                let extent = diverging.then(|| [stops[0], stops[stops.len() - 1]]);
                let interpolate = Some(scheme_interpolate(scheme, flip, extent)?);
                return Ok(ContinuousOutput {
                    range: range.to_vec(),
                    interpolate,
                });
            }
            Ok(ContinuousOutput {
                range: range.to_vec(),
                interpolate: round_interpolate(options),
            })
        }
        None => {
            // Color stops. A polylinear domain longer than the color list
            // keeps its reported stop positions but adds no interpolator
            // segments; the reported range becomes the stop fractions.
            let colors: Vec<String> = range
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        PlotScaleError::invalid_definition(format!(
                            "the {name} scale has a mixed range; expected colors"
                        ))
                    })
                })
                .collect::<Result<_>>()?;
            let reported = if domain_len != colors.len() {
                (0..domain_len)
                    .map(|i| {
                        ScalarValue::number(i as f64 / (domain_len - 1).max(1) as f64)
                    })
                    .collect()
            } else {
                range.to_vec()
            };
            Ok(ContinuousOutput {
                range: reported,
                interpolate: Some(Interpolate::Rgb {
                    colors,
                    anchors: None,
                    flipped: flip,
                }),
            })
        }
    }
}

fn scheme_interpolate(scheme: &str, flip: bool, extent: Option<[f64; 2]>) -> Result<Interpolate> {
    if lookup_scheme(scheme).is_none() {
        return Err(PlotScaleError::invalid_definition(format!(
            "unknown scheme: {scheme}"
        )));
    }
    Ok(Interpolate::Scheme {
        scheme: scheme.to_ascii_lowercase(),
        flipped: flip,
        extent,
    })
}

fn named_interpolate(name: ScaleName, spec_name: &str) -> Result<Interpolate> {
    match spec_name {
        "number" => Ok(Interpolate::Number),
        "round" => Ok(Interpolate::Round),
        other => Err(PlotScaleError::invalid_definition(format!(
            "unsupported interpolate {other} on the {name} scale"
        ))),
    }
}

fn round_interpolate(options: &ScaleOptionsSpec) -> Option<Interpolate> {
    match (&options.interpolate, options.round) {
        (Some(InterpolateSpec::Name(name)), _) if name == "round" => Some(Interpolate::Round),
        (Some(InterpolateSpec::Name(name)), _) if name == "number" => Some(Interpolate::Number),
        (_, Some(true)) => Some(Interpolate::Round),
        _ => None,
    }
}

/// Output values of an ordinal encoding scale, one per domain value
/// (recycled at application time when shorter).
pub(crate) fn ordinal_output(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    inference: &Inference,
    count: usize,
) -> Result<Vec<ScalarValue>> {
    if let Some(range) = &options.range {
        return Ok(range.to_vec());
    }
    if let Some(scheme) = &options.scheme {
        let colors = scheme_colors(scheme, count).ok_or_else(|| {
            PlotScaleError::invalid_definition(format!("unknown scheme: {scheme}"))
        })?;
        return Ok(colors.into_iter().map(ScalarValue::String).collect());
    }
    if name.is_color() {
        // Categorical data gets the categorical default; a declared ordinal
        // color scale quantizes the continuous default instead.
        let colors = if inference.categorical {
            scheme_colors("tableau10", count)
        } else {
            scheme_colors("turbo", count)
        };
        return Ok(colors
            .unwrap_or_default()
            .into_iter()
            .map(ScalarValue::String)
            .collect());
    }
    if name.is_symbol() {
        return Ok(SYMBOL_RANGE
            .iter()
            .map(|s| ScalarValue::string(*s))
            .collect());
    }
    if name == ScaleName::Opacity {
        return Ok((0..count)
            .map(|i| ScalarValue::number(i as f64 / (count - 1).max(1) as f64))
            .collect());
    }
    Err(PlotScaleError::invalid_definition(format!(
        "the {name} scale needs an explicit range"
    )))
}

/// Output values of a threshold-family scale: one per bucket. Descending
/// explicit domains reverse the assembled outputs.
pub(crate) fn bucket_output(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    buckets: usize,
    reversed: bool,
) -> Result<Vec<ScalarValue>> {
    let mut output: Vec<ScalarValue> = if let Some(range) = &options.range {
        if range.len() != buckets {
            return Err(PlotScaleError::invalid_definition(format!(
                "the {name} scale needs {buckets} range values, received {}",
                range.len()
            )));
        }
        range.to_vec()
    } else if name.is_color() {
        let scheme = options.scheme.as_deref().unwrap_or("rdylbu");
        scheme_colors(scheme, buckets)
            .ok_or_else(|| {
                PlotScaleError::invalid_definition(format!("unknown scheme: {scheme}"))
            })?
            .into_iter()
            .map(ScalarValue::String)
            .collect()
    } else {
        return Err(PlotScaleError::invalid_definition(format!(
            "the {name} scale needs an explicit range"
        )));
    };
    if reversed != (options.reverse == Some(true)) {
        output.reverse();
    }
    Ok(output)
}
