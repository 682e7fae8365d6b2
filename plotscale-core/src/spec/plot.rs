//! Top-level plot options: frame dimensions plus one options object per
//! scale name.

use ahash::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::spec::scale::ScaleOptionsSpec;

pub const DEFAULT_WIDTH: f64 = 640.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;
pub const DEFAULT_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotOptionsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    /// Frame-level inset applied to both position scales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<ScaleOptionsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<ScaleOptionsSpec>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Resolved frame geometry with margin fallbacks applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotDimensions {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub inset: f64,
}

impl Default for PlotDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin_top: DEFAULT_MARGIN,
            margin_right: DEFAULT_MARGIN,
            margin_bottom: DEFAULT_MARGIN,
            margin_left: DEFAULT_MARGIN,
            inset: 0.0,
        }
    }
}

impl PlotOptionsSpec {
    pub fn dimensions(&self) -> PlotDimensions {
        let margin = self.margin.unwrap_or(DEFAULT_MARGIN);
        PlotDimensions {
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            margin_top: self.margin_top.unwrap_or(margin),
            margin_right: self.margin_right.unwrap_or(margin),
            margin_bottom: self.margin_bottom.unwrap_or(margin),
            margin_left: self.margin_left.unwrap_or(margin),
            inset: self.inset.unwrap_or(0.0),
        }
    }

    /// Options declared for a scale name, if any.
    pub fn options_for(&self, name: &str) -> Option<&ScaleOptionsSpec> {
        match name {
            "x" => self.x.as_ref(),
            "y" => self.y.as_ref(),
            "fx" => self.fx.as_ref(),
            "fy" => self.fy.as_ref(),
            "r" => self.r.as_ref(),
            "color" => self.color.as_ref(),
            "opacity" => self.opacity.as_ref(),
            "symbol" => self.symbol.as_ref(),
            "length" => self.length.as_ref(),
            _ => None,
        }
    }

    /// The scale names with declared options, in registry order.
    pub fn declared_scales(&self) -> Vec<&'static str> {
        [
            ("x", self.x.is_some()),
            ("y", self.y.is_some()),
            ("fx", self.fx.is_some()),
            ("fy", self.fy.is_some()),
            ("r", self.r.is_some()),
            ("color", self.color.is_some()),
            ("opacity", self.opacity.is_some()),
            ("symbol", self.symbol.is_some()),
            ("length", self.length.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, declared)| declared.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_dimensions() {
        let options = PlotOptionsSpec::default();
        let dims = options.dimensions();
        assert_eq!(dims.width, 640.0);
        assert_eq!(dims.height, 400.0);
        assert_eq!(dims.margin_left, 20.0);
    }

    #[test]
    fn test_margin_fallback() {
        let options: PlotOptionsSpec = serde_json::from_value(json!({
            "margin": 30,
            "marginLeft": 50
        }))
        .unwrap();
        let dims = options.dimensions();
        assert_eq!(dims.margin_left, 50.0);
        assert_eq!(dims.margin_right, 30.0);
        assert_eq!(dims.margin_top, 30.0);
    }

    #[test]
    fn test_declared_scales_in_registry_order() {
        let options: PlotOptionsSpec = serde_json::from_value(json!({
            "color": {"scheme": "blues"},
            "x": {"type": "linear"}
        }))
        .unwrap();
        assert_eq!(options.declared_scales(), vec!["x", "color"]);
    }
}
