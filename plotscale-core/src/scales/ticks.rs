//! Tick increment and domain-nicing math for continuous scales.
//!
//! The step ladder (1/2/5 times a power of ten, with square-root breakpoints)
//! and the two-pass `nice` loop follow the d3-array reference behavior the
//! original engine relied on, e.g. `[2700, 6300]` nices to `[2500, 6500]` at
//! the default tick count and `[2000, 7000]` at count 5.

const E10: f64 = 7.071067811865476; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Default candidate tick count used when `nice: true` is requested.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Returns the tick step for the span `[start, stop]` and candidate `count`.
///
/// Positive results are the step itself; negative results encode the
/// reciprocal of the step (for steps below one), matching the convention the
/// nice loop expects.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / (count.max(1) as f64);
    if !step.is_finite() || step <= 0.0 {
        return f64::NAN;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -(10_f64.powf(-power)) / factor
    }
}

/// Expands `[start, stop]` outward to nice step boundaries.
///
/// Descending inputs are niced over the ascending span and returned in the
/// original orientation. Runs at most two refinement passes, like the
/// reference implementation.
pub fn nice(start: f64, stop: f64, count: usize) -> (f64, f64) {
    if start == stop || !start.is_finite() || !stop.is_finite() {
        return (start, stop);
    }
    let descending = start > stop;
    let (mut lo, mut hi) = if descending {
        (stop, start)
    } else {
        (start, stop)
    };

    let mut prestep = f64::NAN;
    for _ in 0..2 {
        let step = tick_increment(lo, hi, count);
        if step == prestep || step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        } else {
            lo = (lo * -step).floor() / -step;
            hi = (hi * -step).ceil() / -step;
        }
        prestep = step;
    }

    if descending {
        (hi, lo)
    } else {
        (lo, hi)
    }
}

/// Returns the tick values strictly inside `[start, stop]` for the candidate
/// `count` (ascending inputs only). Used for quantize breakpoints.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || start == stop || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    let step = tick_increment(start, stop, count);
    if !step.is_finite() || step == 0.0 {
        return Vec::new();
    }
    if step > 0.0 {
        let i0 = (start / step).ceil();
        let i1 = (stop / step).floor();
        let n = (i1 - i0 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (i0 + i as f64) * step).collect()
    } else {
        let inv = -step;
        let i0 = (start * inv).ceil();
        let i1 = (stop * inv).floor();
        let n = (i1 - i0 + 1.0).max(0.0) as usize;
        (0..n).map(|i| (i0 + i as f64) / inv).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_default_count() {
        assert_eq!(nice(2700.0, 6300.0, 10), (2500.0, 6500.0));
        assert_eq!(nice(1701.0, 7299.0, 10), (1500.0, 7500.0));
    }

    #[test]
    fn test_nice_coarse_count() {
        assert_eq!(nice(2700.0, 6300.0, 5), (2000.0, 7000.0));
        assert_eq!(nice(1701.0, 7299.0, 5), (1000.0, 8000.0));
    }

    #[test]
    fn test_nice_descending_preserves_orientation() {
        assert_eq!(nice(6300.0, 2700.0, 10), (6500.0, 2500.0));
    }

    #[test]
    fn test_ticks_inside_extent() {
        assert_eq!(
            ticks(2700.0, 6300.0, 5),
            vec![3000.0, 4000.0, 5000.0, 6000.0]
        );
        assert_eq!(
            ticks(2700.0, 6300.0, 10),
            vec![3000.0, 3500.0, 4000.0, 4500.0, 5000.0, 5500.0, 6000.0]
        );
    }

    #[test]
    fn test_nice_fractional_step() {
        assert_eq!(nice(0.27, 0.63, 10), (0.25, 0.65));
    }

    #[test]
    fn test_fractional_ticks() {
        let t = ticks(0.0, 1.0, 5);
        assert_eq!(t, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }
}
