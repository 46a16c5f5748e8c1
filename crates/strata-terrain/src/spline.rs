//! Piecewise-linear remapping of raw noise into a target height curve.

use serde::{Deserialize, Serialize};

/// One control point: raw noise `value` maps to `height`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SplinePoint {
    /// Raw noise input.
    pub value: f32,
    /// Output height at that input.
    pub height: f32,
}

impl SplinePoint {
    /// Create a control point.
    pub const fn new(value: f32, height: f32) -> Self {
        Self { value, height }
    }
}

/// Returns `true` if `points` has enough entries to define a segment.
pub fn is_usable(points: &[SplinePoint]) -> bool {
    points.len() >= 2
}

/// Remap `v` through the control points.
///
/// The bracket is found by scanning in list order: the first point whose
/// `value` exceeds `v` ends the scan and the point before it is the lower
/// bracket. If no point exceeds `v` the scan runs off the end and the last
/// two points are used. Interpolation is clamped to the bracket, so inputs
/// outside the list take the boundary height instead of extrapolating.
///
/// Fewer than two points returns `v` unchanged.
pub fn remap(v: f32, points: &[SplinePoint]) -> f32 {
    if !is_usable(points) {
        return v;
    }

    let mut lower = points[0];
    let mut upper = points[1];
    for pair in points.windows(2) {
        lower = pair[0];
        upper = pair[1];
        if upper.value > v {
            break;
        }
    }

    let span = upper.value - lower.value;
    if span == 0.0 {
        return lower.height;
    }
    let t = ((v - lower.value) / span).clamp(0.0, 1.0);
    lower.height + t * (upper.height - lower.height)
}
