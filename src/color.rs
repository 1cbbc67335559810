//! Diverging color scale for edge weights.
//!
//! Weights are normalized with two slopes around zero: `min..0` onto `0.0..0.5`
//! and `0..max` onto `0.5..1.0`. The normalized value is looked up on the
//! red-yellow-green scale, so disfavored edges are red and preferred ones green.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::graph::{Coord, EdgeSnapshot};

/// Anchor colors of the red-yellow-green scale, evenly spaced over `0.0..=1.0`.
const RD_YL_GN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

/// Where the map opens when there is nothing to center on (Kreuzberg/Friedrichshain).
pub const DEFAULT_MAP_CENTER: Coord = Coord {
    lat: 52.50306,
    lon: 13.42470,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NEUTRAL: Color = Color::from_rgb(RD_YL_GN[5]);
    pub const WORST: Color = Color::from_rgb(RD_YL_GN[0]);
    pub const BEST: Color = Color::from_rgb(RD_YL_GN[10]);

    const fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Maps `weight` to a color given the observed weight range.
///
/// A side of the range with no extent (`min >= 0` or `max <= 0`) maps to the
/// neutral color instead of dividing by zero.
pub fn color_for(weight: f64, min_weight: f64, max_weight: f64) -> Color {
    sample(normalize(weight, min_weight, max_weight))
}

fn normalize(weight: f64, min_weight: f64, max_weight: f64) -> f64 {
    let t = if weight < 0.0 && min_weight < 0.0 {
        0.5 - 0.5 * (weight / min_weight)
    } else if weight > 0.0 && max_weight > 0.0 {
        0.5 + 0.5 * (weight / max_weight)
    } else {
        0.5
    };

    if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) }
}

fn sample(t: f64) -> Color {
    let scaled = t * (RD_YL_GN.len() - 1) as f64;
    let index = (scaled.floor() as usize).min(RD_YL_GN.len() - 2);
    let frac = scaled - index as f64;

    let [r0, g0, b0] = RD_YL_GN[index];
    let [r1, g1, b1] = RD_YL_GN[index + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;

    Color {
        r: lerp(r0, r1),
        g: lerp(g0, g1),
        b: lerp(b0, b1),
    }
}

/// Smallest and largest weight over a set of edges; `0..0` when there are none.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl WeightRange {
    pub fn of(edges: &[EdgeSnapshot]) -> Self {
        let mut weights = edges.iter().map(|e| e.weight);

        let Some(first) = weights.next() else {
            return Self::default();
        };

        weights.fold(Self { min: first, max: first }, |range, w| Self {
            min: range.min.min(w),
            max: range.max.max(w),
        })
    }

    pub fn color_for(&self, weight: f64) -> Color {
        color_for(weight, self.min, self.max)
    }
}

/// Mean of all edge endpoints, or [`DEFAULT_MAP_CENTER`] for an empty graph.
pub fn map_center(edges: &[EdgeSnapshot]) -> Coord {
    if edges.is_empty() {
        return DEFAULT_MAP_CENTER;
    }

    let (lat, lon) = edges.iter().fold((0.0, 0.0), |(lat, lon), e| {
        (lat + e.start_lat + e.end_lat, lon + e.start_lon + e.end_lon)
    });
    let points = (edges.len() * 2) as f64;

    Coord::new(lat / points, lon / points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(weight: f64) -> EdgeSnapshot {
        EdgeSnapshot {
            start_lat: 52.5,
            start_lon: 13.40,
            end_lat: 52.5,
            end_lon: 13.42,
            weight,
            usage_count: 1,
        }
    }

    #[test]
    fn zero_is_neutral() {
        assert_eq!(color_for(0.0, -5.0, 5.0), Color::NEUTRAL);
        assert_eq!(Color::NEUTRAL.to_string(), "#ffffbf");
    }

    #[test]
    fn extremes_hit_the_ends_of_the_scale() {
        assert_eq!(color_for(-5.0, -5.0, 5.0), Color::WORST);
        assert_eq!(color_for(5.0, -5.0, 5.0), Color::BEST);
        assert_eq!(Color::WORST.to_string(), "#a50026");
        assert_eq!(Color::BEST.to_string(), "#006837");
    }

    #[test]
    fn sides_scale_independently() {
        assert_eq!(color_for(-1.0, -1.0, 100.0), Color::WORST);
        assert_eq!(color_for(100.0, -1.0, 100.0), Color::BEST);
        assert_eq!(color_for(-2.5, -5.0, 5.0), Color { r: 249, g: 142, b: 82 });
    }

    #[test]
    fn degenerate_ranges_are_neutral() {
        assert_eq!(color_for(0.0, 0.0, 0.0), Color::NEUTRAL);
        assert_eq!(color_for(3.0, 3.0, 3.0), Color::BEST);
        assert_eq!(color_for(-3.0, 0.0, 0.0), Color::NEUTRAL);
        assert_eq!(color_for(f64::NAN, -1.0, 1.0), Color::NEUTRAL);
    }

    #[test]
    fn range_over_snapshot() {
        assert_eq!(WeightRange::of(&[]), WeightRange { min: 0.0, max: 0.0 });

        let range = WeightRange::of(&[edge(2.0), edge(-4.0), edge(1.0)]);
        assert_eq!(range, WeightRange { min: -4.0, max: 2.0 });
        assert_eq!(range.color_for(-4.0), Color::WORST);
        assert_eq!(range.color_for(2.0), Color::BEST);
    }

    #[test]
    fn center_defaults_to_berlin() {
        assert_eq!(map_center(&[]), DEFAULT_MAP_CENTER);

        let center = map_center(&[edge(1.0)]);
        assert_eq!(center.lat, 52.5);
        assert!((center.lon - 13.41).abs() < 1e-9);
    }

    #[test]
    fn serializes_as_hex() {
        assert_eq!(serde_json::to_string(&Color::BEST).unwrap(), "\"#006837\"");
    }
}
