//! Minimal RGB color support for scheme ranges and piecewise interpolation.
//!
//! Parses the color forms the options schema accepts (`#rgb`, `#rrggbb`,
//! `rgb(r, g, b)`, and a table of common CSS names) and formats interpolated
//! colors the way downstream renderers expect: `rgb(r, g, b)` with rounded,
//! clamped channels.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

/// CSS named colors recognized by the options schema. Schemes use hex
/// notation, so this table only needs to cover common hand-written ranges.
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0.0, 0.0, 0.0)),
    ("blue", Rgb::new(0.0, 0.0, 255.0)),
    ("brown", Rgb::new(165.0, 42.0, 42.0)),
    ("cyan", Rgb::new(0.0, 255.0, 255.0)),
    ("gray", Rgb::new(128.0, 128.0, 128.0)),
    ("green", Rgb::new(0.0, 128.0, 0.0)),
    ("grey", Rgb::new(128.0, 128.0, 128.0)),
    ("lime", Rgb::new(0.0, 255.0, 0.0)),
    ("magenta", Rgb::new(255.0, 0.0, 255.0)),
    ("orange", Rgb::new(255.0, 165.0, 0.0)),
    ("pink", Rgb::new(255.0, 192.0, 203.0)),
    ("purple", Rgb::new(128.0, 0.0, 128.0)),
    ("red", Rgb::new(255.0, 0.0, 0.0)),
    ("steelblue", Rgb::new(70.0, 130.0, 180.0)),
    ("white", Rgb::new(255.0, 255.0, 255.0)),
    ("yellow", Rgb::new(255.0, 255.0, 0.0)),
];

pub fn parse_color(input: &str) -> Option<Rgb> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut channels = body.split(',').map(|c| c.trim().parse::<f64>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        if channels.next().is_some() {
            return None;
        }
        return Some(Rgb::new(r, g, b));
    }
    let lowered = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, rgb)| *rgb)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    match hex.len() {
        3 => {
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .ok()
                    .map(|v| (v * 16 + v) as f64)
            };
            Some(Rgb::new(channel(0)?, channel(1)?, channel(2)?))
        }
        6 => {
            let channel =
                |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(f64::from);
            Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

/// Formats a color as `rgb(r, g, b)` with channels rounded half-up and
/// clamped to `[0, 255]`.
pub fn format_rgb(color: Rgb) -> String {
    let channel = |v: f64| v.clamp(0.0, 255.0).round() as u8;
    format!(
        "rgb({}, {}, {})",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// Linear per-channel RGB interpolation.
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    Rgb::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
    )
}

/// Samples a piecewise-linear gradient defined by `stops` at `t` in `[0, 1]`.
///
/// `t` outside the unit interval is clamped; a single stop yields that stop.
pub fn sample_stops(stops: &[Rgb], t: f64) -> Option<Rgb> {
    match stops.len() {
        0 => None,
        1 => Some(stops[0]),
        n => {
            let t = t.clamp(0.0, 1.0);
            let scaled = t * (n - 1) as f64;
            let i = (scaled.floor() as usize).min(n - 2);
            Some(lerp_rgb(stops[i], stops[i + 1], scaled - i as f64))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_color("red"), Some(Rgb::new(255.0, 0.0, 0.0)));
        assert_eq!(parse_color("#ff0000"), Some(Rgb::new(255.0, 0.0, 0.0)));
        assert_eq!(parse_color("#f00"), Some(Rgb::new(255.0, 0.0, 0.0)));
        assert_eq!(
            parse_color("rgb(128, 0, 128)"),
            Some(Rgb::new(128.0, 0.0, 128.0))
        );
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn test_midpoint_interpolation_rounds_half_up() {
        let red = parse_color("red").unwrap();
        let blue = parse_color("blue").unwrap();
        let mid = lerp_rgb(red, blue, 0.5);
        assert_eq!(format_rgb(mid), "rgb(128, 0, 128)");
    }

    #[test]
    fn test_sample_stops_endpoints() {
        let stops = [
            parse_color("red").unwrap(),
            parse_color("blue").unwrap(),
            parse_color("green").unwrap(),
        ];
        assert_eq!(format_rgb(sample_stops(&stops, 0.0).unwrap()), "rgb(255, 0, 0)");
        assert_eq!(format_rgb(sample_stops(&stops, 0.5).unwrap()), "rgb(0, 0, 255)");
        assert_eq!(format_rgb(sample_stops(&stops, 1.0).unwrap()), "rgb(0, 128, 0)");
    }
}
