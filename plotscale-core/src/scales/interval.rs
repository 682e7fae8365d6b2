//! Numeric intervals for domain snapping.
//!
//! A scale's `interval` option snaps continuous values to multiples of a step
//! before the extent is taken, or expands an ordinal domain to the full
//! boundary sequence covering the data extent.

use serde::{Deserialize, Serialize};

use plotscale_common::{PlotScaleError, Result};

/// A uniform numeric interval with step width `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberInterval {
    pub step: f64,
}

impl NumberInterval {
    pub fn new(step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(PlotScaleError::invalid_definition(format!(
                "invalid interval step: {step}"
            )));
        }
        Ok(Self { step })
    }

    /// Rounds `value` down to the nearest interval boundary.
    pub fn floor(&self, value: f64) -> f64 {
        (value / self.step).floor() * self.step
    }

    /// Advances `value` by `count` interval steps.
    pub fn offset(&self, value: f64, count: f64) -> f64 {
        value + count * self.step
    }

    /// All interval boundaries in `[start, stop]`, both floored first. Used
    /// to expand ordinal domains over a data extent.
    pub fn range(&self, start: f64, stop: f64) -> Vec<f64> {
        let lo = self.floor(start);
        let hi = self.floor(stop);
        if hi < lo {
            return Vec::new();
        }
        let n = ((hi - lo) / self.step).round() as usize;
        (0..=n).map(|i| self.offset(lo, i as f64)).collect()
    }
}
