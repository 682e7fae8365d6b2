//! Channel inputs.
//!
//! Marks deliver their data as named channels; each channel may opt out of
//! scaling, bind to a scale explicitly by name, or defer to the default
//! binding for its channel name (`x2` binds to `x`, `fill` to `color`, and
//! so on).

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use plotscale_common::{Result, ScalarValue};

use crate::scales::registry::ScaleName;

/// How a channel attaches to a scale. In the JSON form `null`/`false` is
/// unscaled, `true`/`"auto"` is the default binding, and any other string
/// names a scale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelScale {
    Unscaled,
    #[default]
    Auto,
    Named(String),
}

impl Serialize for ChannelScale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Unscaled => serializer.serialize_none(),
            Self::Auto => serializer.serialize_bool(true),
            Self::Named(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for ChannelScale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null | Value::Bool(false) => Ok(Self::Unscaled),
            Value::Bool(true) => Ok(Self::Auto),
            Value::String(s) if s == "auto" => Ok(Self::Auto),
            Value::String(s) => Ok(Self::Named(s)),
            other => Err(D::Error::custom(format!(
                "invalid channel scale: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub values: Vec<ScalarValue>,
    #[serde(default)]
    pub scale: ChannelScale,
}

impl Channel {
    pub fn new<S: Into<String>>(name: S, values: Vec<ScalarValue>) -> Self {
        Self {
            name: name.into(),
            values,
            scale: ChannelScale::Auto,
        }
    }

    pub fn with_scale(mut self, scale: ChannelScale) -> Self {
        self.scale = scale;
        self
    }

    /// The scale this channel contributes to, or `None` when unscaled.
    /// Explicit bindings to unregistered names fail; auto bindings for
    /// channel names with no default stay unscaled.
    pub fn resolved_scale(&self) -> Result<Option<ScaleName>> {
        match &self.scale {
            ChannelScale::Unscaled => Ok(None),
            ChannelScale::Auto => Ok(default_scale_for_channel(&self.name)),
            ChannelScale::Named(name) => ScaleName::parse(name).map(Some),
        }
    }
}

/// Default channel-name to scale-name binding.
pub fn default_scale_for_channel(channel: &str) -> Option<ScaleName> {
    match channel {
        "x" | "x1" | "x2" => Some(ScaleName::X),
        "y" | "y1" | "y2" => Some(ScaleName::Y),
        "fx" => Some(ScaleName::Fx),
        "fy" => Some(ScaleName::Fy),
        "r" => Some(ScaleName::R),
        "color" | "fill" | "stroke" => Some(ScaleName::Color),
        "opacity" | "fillOpacity" | "strokeOpacity" => Some(ScaleName::Opacity),
        "symbol" => Some(ScaleName::Symbol),
        "length" => Some(ScaleName::Length),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        assert_eq!(default_scale_for_channel("x2"), Some(ScaleName::X));
        assert_eq!(default_scale_for_channel("fill"), Some(ScaleName::Color));
        assert_eq!(default_scale_for_channel("title"), None);
    }

    #[test]
    fn test_named_binding_validation() {
        let channel =
            Channel::new("fill", vec![]).with_scale(ChannelScale::Named("color".to_string()));
        assert_eq!(channel.resolved_scale().unwrap(), Some(ScaleName::Color));

        let bad = Channel::new("fill", vec![]).with_scale(ChannelScale::Named("hue".to_string()));
        assert!(bad.resolved_scale().is_err());
    }

    #[test]
    fn test_scale_attachment_serde_forms() {
        let forms = [
            ("null", ChannelScale::Unscaled),
            ("false", ChannelScale::Unscaled),
            ("true", ChannelScale::Auto),
            ("\"auto\"", ChannelScale::Auto),
            ("\"y\"", ChannelScale::Named("y".to_string())),
        ];
        for (json, expected) in forms {
            let parsed: ChannelScale = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected, "{json}");
        }
    }
}
