//! Per-scale options as declared by the user.
//!
//! Everything is optional; the engine fills the gaps by inference. Unknown
//! keys are collected into `extra` and ignored, so option objects originating
//! from other layers (marks, axes) pass through untouched. A finalized
//! descriptor serializes to a shape this schema accepts, which is what makes
//! descriptors reusable as options.

use ahash::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use plotscale_common::ScalarValue;

use crate::scales::descriptor::{Interpolate, TransformSpec};
use crate::scales::interval::NumberInterval;

/// Declared scale type, including aliases that normalize away during
/// inference (`sqrt`, `categorical`, `sequential`, `cyclical`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleTypeSpec {
    Linear,
    Pow,
    Sqrt,
    Log,
    Symlog,
    Utc,
    Time,
    Ordinal,
    Point,
    Band,
    Threshold,
    Quantile,
    Quantize,
    Diverging,
    DivergingPow,
    DivergingLog,
    DivergingSymlog,
    Categorical,
    Sequential,
    Cyclical,
    Identity,
}

impl ScaleTypeSpec {
    pub fn is_diverging(&self) -> bool {
        matches!(
            self,
            Self::Diverging | Self::DivergingPow | Self::DivergingLog | Self::DivergingSymlog
        )
    }

    pub fn is_ordinal_family(&self) -> bool {
        matches!(
            self,
            Self::Ordinal | Self::Point | Self::Band | Self::Categorical
        )
    }
}

/// `nice` accepts a boolean or an explicit tick count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NiceSpec {
    Enabled(bool),
    Count(usize),
}

impl NiceSpec {
    /// The tick count to nice with, or `None` when nicing is off.
    pub fn count(&self) -> Option<usize> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(crate::scales::ticks::DEFAULT_TICK_COUNT),
            Self::Count(n) => Some(*n),
        }
    }
}

/// `interval` accepts a bare step width or the descriptor's `{step}` form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalSpec {
    Step(f64),
    Interval(NumberInterval),
}

impl IntervalSpec {
    pub fn resolve(&self) -> plotscale_common::Result<NumberInterval> {
        match self {
            Self::Step(step) => NumberInterval::new(*step),
            Self::Interval(interval) => NumberInterval::new(interval.step),
        }
    }
}

/// `interpolate` accepts a short name or the descriptor's structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InterpolateSpec {
    Full(Interpolate),
    Name(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleOptionsSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<ScaleTypeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<ScalarValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<ScalarValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<InterpolateSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symmetric: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nice: Option<NiceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<f64>,
    /// Bucket count for quantile and quantize promotion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_inner: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_outer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<ScalarValue>,
    // Computed fields a reused descriptor carries; accepted and ignored as
    // inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ScaleOptionsSpec {
    /// True when no recognized option is present (unrecognized keys do not
    /// count as configuration).
    pub fn is_empty(&self) -> bool {
        let probe = Self {
            extra: self.extra.clone(),
            ..Default::default()
        };
        *self == probe
    }

    /// True when this options object is a finalized descriptor fed back in:
    /// explicit type, concrete domain, a concrete output (range, structured
    /// interpolator, or the identity type), and no pending construction
    /// options.
    pub fn is_finalized(&self) -> bool {
        if self.scale_type == Some(ScaleTypeSpec::Identity) {
            return true;
        }
        let concrete_output = self.range.is_some()
            || matches!(self.interpolate, Some(InterpolateSpec::Full(_)));
        self.scale_type.is_some()
            && self.domain.is_some()
            && concrete_output
            && self.nice.is_none()
            && self.zero.is_none()
            && self.reverse.is_none()
            && self.scheme.is_none()
            && self.n.is_none()
    }
}
