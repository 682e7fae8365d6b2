//! Static color scheme registry.
//!
//! Discrete categorical schemes are stored as `#rrggbb` lists. Ordered
//! (ColorBrewer-style) families keep one packed hex string per cardinality,
//! starting at three colors. Continuous gradients are packed hex stop strings
//! decoded in six-character chunks and sampled piecewise-linearly.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::scales::color::{format_rgb, parse_color, sample_stops, Rgb};

/// Default symbol list used by the `symbol` scale when no explicit range is
/// given.
pub(crate) const SYMBOL_RANGE: &[&str] = &[
    "circle", "cross", "diamond", "square", "star", "triangle", "wye",
];

const TABLEAU10: &[&str] = &[
    "#4c78a8", "#f58518", "#e45756", "#72b7b2", "#54a24b", "#eeca3b", "#b279a2", "#ff9da6",
    "#9d755d", "#bab0ac",
];

const CATEGORY10: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const ACCENT: &[&str] = &[
    "#7fc97f", "#beaed4", "#fdc086", "#ffff99", "#386cb0", "#f0027f", "#bf5b17", "#666666",
];

const DARK2: &[&str] = &[
    "#1b9e77", "#d95f02", "#7570b3", "#e7298a", "#66a61e", "#e6ab02", "#a6761d", "#666666",
];

// Ordered families, one packed string per cardinality from 3 up.
const RDYLBU: &[&str] = &[
    "fc8d59ffffbf91bfdb",
    "d7191cfdae61abd9e92c7bb6",
    "d7191cfdae61ffffbfabd9e92c7bb6",
    "d73027fc8d59fee090e0f3f891bfdb4575b4",
    "d73027fc8d59fee090ffffbfe0f3f891bfdb4575b4",
    "d73027f46d43fdae61fee090e0f3f8abd9e974add14575b4",
    "d73027f46d43fdae61fee090ffffbfe0f3f8abd9e974add14575b4",
    "a50026d73027f46d43fdae61fee090e0f3f8abd9e974add14575b4313695",
    "a50026d73027f46d43fdae61fee090ffffbfe0f3f8abd9e974add14575b4313695",
];

const BLUES_K: &[&str] = &[
    "deebf79ecae13182bd",
    "eff3ffbdd7e76baed62171b5",
    "eff3ffbdd7e76baed63182bd08519c",
    "eff3ffc6dbef9ecae16baed63182bd08519c",
    "eff3ffc6dbef9ecae16baed64292c62171b5084594",
    "f7fbffdeebf7c6dbef9ecae16baed64292c62171b5084594",
    "f7fbffdeebf7c6dbef9ecae16baed64292c62171b508519c08306b",
];

const TURBO: &str = concat!(
    "23171b4a58dd2f9df527d7c44df88495fb51dedd32ffa423f65f18ba2208900c00"
);

const RDBU: &str = concat!(
    "67001fb2182bd6604df4a582fddbc7f7f7f7d1e5f092c5de4393c32166ac053061"
);

const PIYG: &str = concat!(
    "8e0152c51b7dde77aef1b6dafde0eff7f7f7e6f5d0b8e1867fbc414d9221276419"
);

const BRBG: &str = concat!(
    "5430058c510abf812ddfc27df6e8c3f5f5f5c7eae580cdc135978f01665e003c30"
);

const WARM: &str = concat!(
    "6e40aa9d3db3c83dacee4395ff5e63ff7847f59f30dfc027aff05b"
);

const COOL: &str = concat!(
    "6e40aa5854c84a77dc3a9bd02cbdbf27d7a23dec7565f65eaff05b"
);

const RAINBOW: &str = concat!(
    "6e40aabe3caffe4b83ff7847e2b72faff05b52f6671ddfa323abd84c6edb6e40aa"
);

const VIRIDIS: &str = concat!(
    "440154470e61481a6c482575472f7d443a834144873d4e8a39568c35608d31688e2d708e",
    "2a788e27818e23888e21918d1f988b1fa08822a8842ab07f35b77943bf7154c56866cc5d",
    "7ad1518fd744a5db36bcdf27d2e21be9e51afde725"
);

const INFERNO: &str = concat!(
    "0000040403130c0826170c3b240c4f330a5f420a68500d6c5d126e6b176e781c6d86",
    "216b932667a12b62ae305cbb3755c73e4cd24644dd513ae65c30ed6925f3771af8850f",
    "fb9506fca50afcb519fac62df6d645f2e661f3f484fcffa4"
);

const MAGMA: &str = concat!(
    "0000040404130b0924150e3720114b2c11603b0f704a107957157e651a80721f817f24",
    "828c29819a2e80a8327db6377ac43c75d1426fde4968e95462f1605df76f5cfa7f5efc",
    "8f65fe9f6dfeaf78febf84fece91fddea0fcedaffcfdbf"
);

const PLASMA: &str = concat!(
    "0d088723069033059742039d5002a25d01a66a00a87801a88405a7900da49c179ea721",
    "98b12a90ba3488c33d80cb4779d35171da5a69e16462e76e5bed7953f2834cf68f44fa",
    "9a3dfca636fdb32ffec029fcce25f9dc24f5ea27f0f921"
);

const CIVIDIS: &str = concat!(
    "00205100235800265d002961012b65042e670831690d346b11366c16396d1c3c6e213f6e",
    "26426e2c456e31476e374a6e3c4d6e42506e47536d4c566d51586e555b6e5a5e6e5e616e",
    "62646f66676f6a6a706e6d717270717573727976737c79747f7c75827f75868276898577",
    "8c8877908b78938e789691789a94789e9778a19b78a59e77a9a177aea575b2a874b6ab73",
    "bbaf71c0b26fc5b66dc9b96acebd68d3c065d8c462ddc85fe2cb5ce7cf58ebd355f0d652",
    "f3da4ff7de4cfae249fce647"
);

const YLGNBU: &str =
    "eff9bddbf1b4bde5b594d5b969c5be45b4c22c9ec02182b82163aa23479c1c3185";

#[derive(Clone, Copy)]
pub(crate) enum SchemePalette {
    /// Fixed categorical list.
    Discrete(&'static [&'static str]),
    /// Ordered family with one packed array per cardinality, smallest first
    /// (three colors). The largest array doubles as the gradient stops.
    Indexed(&'static [&'static str]),
    /// Packed gradient stops.
    Continuous(&'static str),
}

lazy_static! {
    static ref SCHEME_REGISTRY: HashMap<&'static str, SchemePalette> = {
        use SchemePalette::*;
        HashMap::from([
            ("tableau10", Discrete(TABLEAU10)),
            ("category10", Discrete(CATEGORY10)),
            ("accent", Discrete(ACCENT)),
            ("dark2", Discrete(DARK2)),
            ("rdylbu", Indexed(RDYLBU)),
            ("blues", Indexed(BLUES_K)),
            ("turbo", Continuous(TURBO)),
            ("rdbu", Continuous(RDBU)),
            ("piyg", Continuous(PIYG)),
            ("brbg", Continuous(BRBG)),
            ("warm", Continuous(WARM)),
            ("cool", Continuous(COOL)),
            ("rainbow", Continuous(RAINBOW)),
            ("viridis", Continuous(VIRIDIS)),
            ("inferno", Continuous(INFERNO)),
            ("magma", Continuous(MAGMA)),
            ("plasma", Continuous(PLASMA)),
            ("cividis", Continuous(CIVIDIS)),
            ("ylgnbu", Continuous(YLGNBU)),
            ("yellowgreenblue", Continuous(YLGNBU)),
        ])
    };
}

pub(crate) fn lookup_scheme(name: &str) -> Option<SchemePalette> {
    let lowered = name.to_ascii_lowercase();
    SCHEME_REGISTRY.get(lowered.as_str()).copied()
}

/// Splits a packed hex string into `#rrggbb` entries.
pub(crate) fn decode_scheme(hex: &str) -> Vec<String> {
    hex.as_bytes()
        .chunks_exact(6)
        .map(|chunk| {
            let color = std::str::from_utf8(chunk).unwrap_or_default();
            format!("#{color}")
        })
        .collect()
}

/// Decodes a packed hex string to RGB gradient stops.
pub(crate) fn decode_stops(hex: &str) -> Vec<Rgb> {
    decode_scheme(hex)
        .iter()
        .filter_map(|c| parse_color(c))
        .collect()
}

/// Gradient stops for a scheme, for use as a continuous interpolator. For
/// indexed families the largest array supplies the stops.
pub(crate) fn scheme_stops(name: &str) -> Option<Vec<Rgb>> {
    match lookup_scheme(name)? {
        SchemePalette::Continuous(packed) => Some(decode_stops(packed)),
        SchemePalette::Indexed(arrays) => arrays.last().map(|packed| decode_stops(packed)),
        SchemePalette::Discrete(list) => {
            Some(list.iter().filter_map(|c| parse_color(c)).collect())
        }
    }
}

/// Resolves `count` discrete colors from a scheme.
///
/// Discrete lists are truncated; indexed families select the array of the
/// requested cardinality (falling back to quantizing the largest array when
/// the count exceeds the family); continuous gradients are quantized at
/// evenly spaced positions.
pub(crate) fn scheme_colors(name: &str, count: usize) -> Option<Vec<String>> {
    if count == 0 {
        return Some(Vec::new());
    }
    match lookup_scheme(name)? {
        SchemePalette::Discrete(list) => Some(
            list.iter()
                .take(count)
                .map(|c| c.to_string())
                .collect(),
        ),
        SchemePalette::Indexed(arrays) => {
            if count <= 2 {
                let mut colors = decode_scheme(arrays[0]);
                colors.truncate(count);
                Some(colors)
            } else if count - 3 < arrays.len() {
                Some(decode_scheme(arrays[count - 3]))
            } else {
                let stops = decode_stops(arrays[arrays.len() - 1]);
                Some(quantize_stops(&stops, count))
            }
        }
        SchemePalette::Continuous(packed) => {
            let stops = decode_stops(packed);
            Some(quantize_stops(&stops, count))
        }
    }
}

fn quantize_stops(stops: &[Rgb], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let t = if count == 1 {
                0.5
            } else {
                i as f64 / (count - 1) as f64
            };
            sample_stops(stops, t)
                .map(format_rgb)
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_family_by_cardinality() {
        assert_eq!(
            scheme_colors("rdylbu", 5).unwrap(),
            vec!["#d7191c", "#fdae61", "#ffffbf", "#abd9e9", "#2c7bb6"]
        );
        assert_eq!(
            scheme_colors("blues", 8).unwrap(),
            vec![
                "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
                "#084594"
            ]
        );
    }

    #[test]
    fn test_discrete_truncation() {
        let colors = scheme_colors("tableau10", 3).unwrap();
        assert_eq!(colors, vec!["#4c78a8", "#f58518", "#e45756"]);
    }

    #[test]
    fn test_continuous_quantization_endpoints() {
        let colors = scheme_colors("turbo", 3).unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], "rgb(35, 23, 27)");
        assert_eq!(colors[2], "rgb(144, 12, 0)");
    }

    #[test]
    fn test_decode_chunking() {
        let stops = decode_scheme(RDBU);
        assert_eq!(stops.len(), 11);
        assert_eq!(stops[0], "#67001f");
        assert_eq!(stops[5], "#f7f7f7");
    }

    #[test]
    fn test_unknown_scheme() {
        assert!(lookup_scheme("no-such-scheme").is_none());
    }
}
