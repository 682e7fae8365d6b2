//! The scale name registry.
//!
//! Nine scale names exist; `x`/`y` and the facet scales `fx`/`fy` are
//! positional, the rest are output encodings. Channels reference scales by
//! name, and any other name is rejected with `unknown scale: {name}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use plotscale_common::{PlotScaleError, Result};

/// Hard bound on the number of distinct values an implicit ordinal domain
/// may accumulate before compilation fails. Guards against accidentally
/// pointing a position scale at high-cardinality data.
pub const IMPLICIT_DOMAIN_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleName {
    X,
    Y,
    Fx,
    Fy,
    R,
    Color,
    Opacity,
    Symbol,
    Length,
}

impl ScaleName {
    pub const ALL: [ScaleName; 9] = [
        Self::X,
        Self::Y,
        Self::Fx,
        Self::Fy,
        Self::R,
        Self::Color,
        Self::Opacity,
        Self::Symbol,
        Self::Length,
    ];

    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "fx" => Ok(Self::Fx),
            "fy" => Ok(Self::Fy),
            "r" => Ok(Self::R),
            "color" => Ok(Self::Color),
            "opacity" => Ok(Self::Opacity),
            "symbol" => Ok(Self::Symbol),
            "length" => Ok(Self::Length),
            other => Err(PlotScaleError::unknown_scale(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Fx => "fx",
            Self::Fy => "fy",
            Self::R => "r",
            Self::Color => "color",
            Self::Opacity => "opacity",
            Self::Symbol => "symbol",
            Self::Length => "length",
        }
    }

    /// Position scales map into frame coordinates.
    pub fn is_position(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Fx | Self::Fy)
    }

    /// Facet scales are always discrete band scales.
    pub fn is_facet(&self) -> bool {
        matches!(self, Self::Fx | Self::Fy)
    }

    pub fn is_color(&self) -> bool {
        matches!(self, Self::Color)
    }

    /// Vertical position scales run top-down, so their ranges descend.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Y | Self::Fy)
    }

    /// Scales whose outputs are inherently discrete (symbols).
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol)
    }
}

impl fmt::Display for ScaleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
