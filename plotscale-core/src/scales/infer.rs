//! Scale type inference.
//!
//! Resolves each scale's declared type, normalizing aliases (`sqrt`,
//! `categorical`, `sequential`, `cyclical`) and, when no type is declared,
//! inferring one from the explicit domain or the first non-null channel
//! value. Positional discrete scales become `point` (or `band` for facets);
//! everything else discrete becomes `ordinal`.

use plotscale_common::{PlotScaleError, Result, ScalarValue};

use crate::channel::Channel;
use crate::scales::descriptor::{ContinuousType, DiscreteType, DivergingType, ThresholdType};
use crate::scales::registry::ScaleName;
use crate::spec::scale::{ScaleOptionsSpec, ScaleTypeSpec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum InferredKind {
    Identity,
    Continuous(ContinuousType),
    Diverging(DivergingType),
    Threshold(ThresholdType),
    Discrete(DiscreteType),
}

/// Inference result: the normalized scale kind plus alias side effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Inference {
    pub kind: InferredKind,
    /// `Some(0.5)` for the `sqrt` alias.
    pub exponent: Option<f64>,
    /// The `categorical` alias selects the categorical default scheme.
    pub categorical: bool,
    /// Default interpolator selected by an alias (`cyclical`, `sequential`).
    pub default_scheme: Option<&'static str>,
}

impl Inference {
    fn plain(kind: InferredKind) -> Self {
        Self {
            kind,
            exponent: None,
            categorical: false,
            default_scheme: None,
        }
    }
}

pub(crate) fn infer(
    name: ScaleName,
    options: &ScaleOptionsSpec,
    channels: &[&Channel],
) -> Result<Inference> {
    if let Some(declared) = options.scale_type {
        return declared_inference(name, declared);
    }

    if name.is_facet() {
        return Ok(Inference::plain(InferredKind::Discrete(DiscreteType::Band)));
    }

    match first_sample(options, channels) {
        Some(ScalarValue::Date(_)) => Ok(Inference::plain(InferredKind::Continuous(
            ContinuousType::Utc,
        ))),
        Some(sample) if sample.is_discrete() => Ok(Inference {
            // Implicitly discrete color data is categorical; a declared
            // `ordinal` type quantizes the continuous default instead.
            categorical: name.is_color(),
            ..Inference::plain(InferredKind::Discrete(discrete_kind(name)))
        }),
        Some(_) => Ok(Inference::plain(default_quantitative(name))),
        None => {
            let has_output =
                options.range.is_some() || options.scheme.is_some() || options.interpolate.is_some();
            if name.is_position() || has_output {
                Ok(Inference::plain(default_quantitative(name)))
            } else {
                Err(PlotScaleError::invalid_definition(format!(
                    "the {name} scale needs a type, a domain, or a range"
                )))
            }
        }
    }
}

fn declared_inference(name: ScaleName, declared: ScaleTypeSpec) -> Result<Inference> {
    use InferredKind::*;
    let inference = match declared {
        ScaleTypeSpec::Identity => Inference::plain(Identity),
        ScaleTypeSpec::Linear => Inference::plain(Continuous(ContinuousType::Linear)),
        ScaleTypeSpec::Pow => Inference::plain(Continuous(ContinuousType::Pow)),
        ScaleTypeSpec::Sqrt => Inference {
            exponent: Some(0.5),
            ..Inference::plain(Continuous(ContinuousType::Pow))
        },
        ScaleTypeSpec::Log => Inference::plain(Continuous(ContinuousType::Log)),
        ScaleTypeSpec::Symlog => Inference::plain(Continuous(ContinuousType::Symlog)),
        ScaleTypeSpec::Utc => Inference::plain(Continuous(ContinuousType::Utc)),
        ScaleTypeSpec::Time => Inference::plain(Continuous(ContinuousType::Time)),
        ScaleTypeSpec::Sequential => Inference {
            default_scheme: Some("turbo"),
            ..Inference::plain(Continuous(ContinuousType::Linear))
        },
        ScaleTypeSpec::Cyclical => Inference {
            default_scheme: Some("rainbow"),
            ..Inference::plain(Continuous(ContinuousType::Linear))
        },
        ScaleTypeSpec::Ordinal => Inference::plain(Discrete(discrete_kind(name))),
        ScaleTypeSpec::Categorical => Inference {
            categorical: true,
            ..Inference::plain(Discrete(discrete_kind(name)))
        },
        ScaleTypeSpec::Point => Inference::plain(Discrete(DiscreteType::Point)),
        ScaleTypeSpec::Band => Inference::plain(Discrete(DiscreteType::Band)),
        ScaleTypeSpec::Threshold => Inference::plain(Threshold(ThresholdType::Threshold)),
        ScaleTypeSpec::Quantile => Inference::plain(Threshold(ThresholdType::Quantile)),
        ScaleTypeSpec::Quantize => Inference::plain(Threshold(ThresholdType::Quantize)),
        ScaleTypeSpec::Diverging => Inference::plain(Diverging(DivergingType::Diverging)),
        ScaleTypeSpec::DivergingPow => Inference::plain(Diverging(DivergingType::DivergingPow)),
        ScaleTypeSpec::DivergingLog => Inference::plain(Diverging(DivergingType::DivergingLog)),
        ScaleTypeSpec::DivergingSymlog => {
            Inference::plain(Diverging(DivergingType::DivergingSymlog))
        }
    };
    Ok(inference)
}

/// Discrete kind for a scale name: point on positions, band on facets,
/// ordinal elsewhere.
fn discrete_kind(name: ScaleName) -> DiscreteType {
    if name.is_facet() {
        DiscreteType::Band
    } else if name.is_position() {
        DiscreteType::Point
    } else {
        DiscreteType::Ordinal
    }
}

fn default_quantitative(name: ScaleName) -> InferredKind {
    match name {
        ScaleName::R => InferredKind::Continuous(ContinuousType::Pow),
        _ => InferredKind::Continuous(ContinuousType::Linear),
    }
}

/// First non-null value, preferring the explicit domain over channel data.
fn first_sample<'a>(
    options: &'a ScaleOptionsSpec,
    channels: &[&'a Channel],
) -> Option<&'a ScalarValue> {
    if let Some(domain) = &options.domain {
        if let Some(value) = domain.iter().find(|v| !v.is_null()) {
            return Some(value);
        }
    }
    channels
        .iter()
        .flat_map(|c| c.values.iter())
        .find(|v| !v.is_null())
}

/// The default radius exponent: radius scales are square-root scales.
pub(crate) fn default_exponent(name: ScaleName, inference: &Inference) -> Option<f64> {
    if inference.exponent.is_some() {
        return inference.exponent;
    }
    if name == ScaleName::R && inference.kind == InferredKind::Continuous(ContinuousType::Pow) {
        return Some(0.5);
    }
    None
}
