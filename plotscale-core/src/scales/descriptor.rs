//! Materialized scale descriptors.
//!
//! A descriptor is the fully resolved, serializable form of one scale:
//! concrete domain and range, the consumed construction options recorded as
//! plain data, and no closures. The JSON shape a descriptor serializes to is
//! accepted back by the options schema, so a finalized descriptor can be fed
//! into a later compilation and reproduces itself.

use serde::{Deserialize, Serialize};

use plotscale_common::ScalarValue;

use crate::scales::interval::NumberInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuousType {
    Linear,
    Pow,
    Log,
    Symlog,
    Utc,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DivergingType {
    Diverging,
    DivergingPow,
    DivergingLog,
    DivergingSymlog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdType {
    Threshold,
    Quantile,
    Quantize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscreteType {
    Ordinal,
    Point,
    Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    Identity,
}

/// A named pure value transform applied before scaling. Closed set; the
/// descriptor stays serializable because transforms are data, not closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformSpec {
    Percent,
}

impl TransformSpec {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Percent => value * 100.0,
        }
    }
}

/// Output interpolator for a continuous or diverging scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Interpolate {
    /// Plain numeric interpolation over the numeric range.
    Number,
    /// Numeric interpolation with rounding to integers.
    Round,
    /// Piecewise RGB interpolation over explicit colors. `anchors` holds the
    /// normalized position of each color; evenly spaced when absent.
    /// `flipped` mirrors the interpolator (`t` becomes `1 - t`).
    Rgb {
        colors: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchors: Option<Vec<f64>>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        flipped: bool,
    },
    /// A named scheme gradient, optionally confined to a sub-interval of the
    /// unit range.
    Scheme {
        scheme: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        flipped: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extent: Option<[f64; 2]>,
    },
}

impl Interpolate {
    pub fn flip(self) -> Self {
        match self {
            Self::Number => Self::Number,
            Self::Round => Self::Round,
            Self::Rgb {
                colors,
                anchors,
                flipped,
            } => Self::Rgb {
                colors,
                anchors,
                flipped: !flipped,
            },
            Self::Scheme {
                scheme,
                flipped,
                extent,
            } => Self::Scheme {
                scheme,
                flipped: !flipped,
                extent,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinuousDescriptor {
    #[serde(rename = "type")]
    pub scale_type: ContinuousType,
    pub domain: Vec<ScalarValue>,
    /// Numeric output stops, or reported interpolation anchors for color
    /// scales with an explicit polylinear range. Empty when the output is a
    /// scheme gradient with no reported anchors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub range: Vec<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolate: Option<Interpolate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<NumberInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<ScalarValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergingDescriptor {
    #[serde(rename = "type")]
    pub scale_type: DivergingType,
    /// Two-element ascending domain around the pivot.
    pub domain: Vec<ScalarValue>,
    pub pivot: f64,
    /// Always reported `false`: the symmetry adjustment is baked into the
    /// domain during construction.
    pub symmetric: bool,
    pub interpolate: Interpolate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<ScalarValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clamp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdDescriptor {
    #[serde(rename = "type")]
    pub scale_type: ThresholdType,
    /// Strictly increasing cut points; `range` has one more element.
    pub domain: Vec<ScalarValue>,
    pub range: Vec<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<ScalarValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscreteDescriptor {
    #[serde(rename = "type")]
    pub scale_type: DiscreteType,
    pub domain: Vec<ScalarValue>,
    /// For `ordinal`: one output per domain value (recycled when shorter).
    /// For `point`/`band`: the two-element positional extent.
    pub range: Vec<ScalarValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_inner: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_outer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<NumberInterval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<ScalarValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityDescriptor {
    #[serde(rename = "type")]
    pub scale_type: IdentityType,
}

impl Default for IdentityDescriptor {
    fn default() -> Self {
        Self {
            scale_type: IdentityType::Identity,
        }
    }
}

/// One fully resolved scale. Untagged: each variant is discriminated by its
/// own `type` tag during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleDescriptor {
    Identity(IdentityDescriptor),
    Diverging(DivergingDescriptor),
    Threshold(ThresholdDescriptor),
    Discrete(DiscreteDescriptor),
    Continuous(ContinuousDescriptor),
}

impl ScaleDescriptor {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Identity(_) => "identity",
            Self::Diverging(d) => match d.scale_type {
                DivergingType::Diverging => "diverging",
                DivergingType::DivergingPow => "diverging-pow",
                DivergingType::DivergingLog => "diverging-log",
                DivergingType::DivergingSymlog => "diverging-symlog",
            },
            Self::Threshold(d) => match d.scale_type {
                ThresholdType::Threshold => "threshold",
                ThresholdType::Quantile => "quantile",
                ThresholdType::Quantize => "quantize",
            },
            Self::Discrete(d) => match d.scale_type {
                DiscreteType::Ordinal => "ordinal",
                DiscreteType::Point => "point",
                DiscreteType::Band => "band",
            },
            Self::Continuous(d) => match d.scale_type {
                ContinuousType::Linear => "linear",
                ContinuousType::Pow => "pow",
                ContinuousType::Log => "log",
                ContinuousType::Symlog => "symlog",
                ContinuousType::Utc => "utc",
                ContinuousType::Time => "time",
            },
        }
    }

    pub fn domain(&self) -> &[ScalarValue] {
        match self {
            Self::Identity(_) => &[],
            Self::Diverging(d) => &d.domain,
            Self::Threshold(d) => &d.domain,
            Self::Discrete(d) => &d.domain,
            Self::Continuous(d) => &d.domain,
        }
    }

    pub fn range(&self) -> &[ScalarValue] {
        match self {
            Self::Identity(_) => &[],
            Self::Diverging(d) => d.range.as_deref().unwrap_or(&[]),
            Self::Threshold(d) => &d.range,
            Self::Discrete(d) => &d.range,
            Self::Continuous(d) => &d.range,
        }
    }

    /// Bandwidth of a band or point scale; zero for point, absent otherwise.
    pub fn bandwidth(&self) -> Option<f64> {
        match self {
            Self::Discrete(d) => d.bandwidth,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_discrimination() {
        let identity: ScaleDescriptor = serde_json::from_value(json!({"type": "identity"})).unwrap();
        assert!(matches!(identity, ScaleDescriptor::Identity(_)));

        let band: ScaleDescriptor = serde_json::from_value(json!({
            "type": "band",
            "domain": ["a", "b"],
            "range": [40.0, 620.0]
        }))
        .unwrap();
        assert!(matches!(band, ScaleDescriptor::Discrete(_)));
        assert_eq!(band.type_name(), "band");

        let linear: ScaleDescriptor = serde_json::from_value(json!({
            "type": "linear",
            "domain": [0.0, 1.0],
            "range": [20.0, 620.0]
        }))
        .unwrap();
        assert_eq!(linear.type_name(), "linear");
    }

    #[test]
    fn test_round_trip_preserves_descriptor() {
        let descriptor = ScaleDescriptor::Continuous(ContinuousDescriptor {
            scale_type: ContinuousType::Symlog,
            domain: vec![ScalarValue::number(0.0), ScalarValue::number(100.0)],
            range: vec![ScalarValue::number(20.0), ScalarValue::number(620.0)],
            interpolate: None,
            clamp: None,
            exponent: None,
            base: None,
            constant: Some(1.0),
            percent: None,
            interval: None,
            transform: None,
            unknown: None,
        });
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["type"], "symlog");
        assert!(json.get("clamp").is_none());
        let back: ScaleDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_interpolate_flip_round_trips() {
        let interpolate = Interpolate::Rgb {
            colors: vec!["red".to_string(), "blue".to_string()],
            anchors: None,
            flipped: false,
        };
        let flipped = interpolate.clone().flip();
        assert_ne!(flipped, interpolate);
        assert_eq!(flipped.flip(), interpolate);
    }
}
