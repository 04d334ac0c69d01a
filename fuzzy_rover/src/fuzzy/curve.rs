//! Chart curves derived from shape descriptors.
//!
//! A curve is a list of Hermite keyframes whose tangents equal the slope of
//! the segment on each side, so the cubic pieces collapse to the original
//! straight lines. Keys are extended flat to the chart window.

use crate::fuzzy::group::VariableGroup;
use crate::fuzzy::shape::{Point, ShapeDescriptor};

/// Relative tolerance used when comparing a point to the chart edge.
pub const CURVE_EPSILON: f64 = 1e-6;

/// A curve key with separate incoming and outgoing slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Position on the chart's x axis
    pub time: f64,
    /// Membership degree at `time`
    pub value: f64,
    /// Slope of the segment arriving at this key
    pub in_slope: f64,
    /// Slope of the segment leaving this key
    pub out_slope: f64,
}

impl Keyframe {
    #[must_use]
    pub const fn flat(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            in_slope: 0.0,
            out_slope: 0.0,
        }
    }
}

fn approximately(a: f64, b: f64) -> bool {
    (a - b).abs() <= CURVE_EPSILON * a.abs().max(b.abs()).max(1.0)
}

fn slope(from: &Keyframe, to: Point) -> f64 {
    let dx = to.x - from.time;
    if dx > 0.0 {
        (to.y - from.value) / dx
    } else {
        0.0
    }
}

/// Keyframes reproducing `shape` on `[chart_min, chart_max]`.
///
/// A flat key is added at each chart edge the shape does not already reach.
#[must_use]
pub fn derive_curve(shape: &ShapeDescriptor, chart_min: f64, chart_max: f64) -> Vec<Keyframe> {
    let points = shape.points();
    let mut frames = Vec::with_capacity(points.len() + 2);

    let first = shape.first();
    if chart_min < first.x && !approximately(first.x, chart_min) {
        frames.push(Keyframe::flat(chart_min, first.y));
    }

    for &p in points {
        let mut in_slope = 0.0;
        if let Some(prev) = frames.last_mut() {
            in_slope = slope(prev, p);
            prev.out_slope = in_slope;
        }
        frames.push(Keyframe {
            time: p.x,
            value: p.y,
            in_slope,
            out_slope: 0.0,
        });
    }

    let last = shape.last();
    if chart_max > last.x && !approximately(last.x, chart_max) {
        frames.push(Keyframe::flat(chart_max, last.y));
    }

    frames
}

/// Evaluates the Hermite curve at `x`, flat outside the first and last key.
/// `None` for an empty curve.
#[must_use]
pub fn sample_curve(frames: &[Keyframe], x: f64) -> Option<f64> {
    let first = frames.first()?;
    let last = frames.last()?;
    if x <= first.time {
        return Some(first.value);
    }
    if x >= last.time {
        return Some(last.value);
    }

    for pair in frames.windows(2) {
        let (k0, k1) = (pair[0], pair[1]);
        if x >= k0.time && x < k1.time {
            let dt = k1.time - k0.time;
            let t = (x - k0.time) / dt;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            return Some(
                h00 * k0.value + h10 * dt * k0.out_slope + h01 * k1.value + h11 * dt * k1.in_slope,
            );
        }
    }

    Some(last.value)
}

/// The chart of one label.
#[derive(Debug, Clone, PartialEq)]
pub struct SetChart {
    /// Label name
    pub name: String,
    /// Curve keys in ascending `time`
    pub keyframes: Vec<Keyframe>,
}

impl SetChart {
    /// `samples` evenly spaced `(x, y)` pairs over `[from, to]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, from: f64, to: f64, samples: usize) -> Vec<(f64, f64)> {
        if samples < 2 {
            return Vec::new();
        }
        let step = (to - from) / (samples - 1) as f64;
        (0..samples)
            .filter_map(|i| {
                let x = from + step * i as f64;
                sample_curve(&self.keyframes, x).map(|y| (x, y))
            })
            .collect()
    }
}

/// Charts for every label of a group, sharing the group's chart window.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupChart {
    /// Group name
    pub name: String,
    /// Chart window as `(min, max)`
    pub bounds: (f64, f64),
    /// One chart per label, in insertion order
    pub charts: Vec<SetChart>,
}

impl GroupChart {
    /// Snapshot of `group` for display. `None` for an empty group.
    #[must_use]
    pub fn from_group(group: &VariableGroup) -> Option<Self> {
        let (chart_min, chart_max) = group.chart_bounds()?;
        let charts = group
            .shapes()
            .iter()
            .map(|shape| SetChart {
                name: shape.name().to_owned(),
                keyframes: derive_curve(shape, chart_min, chart_max),
            })
            .collect();
        Some(Self {
            name: group.name().to_owned(),
            bounds: (chart_min, chart_max),
            charts,
        })
    }
}
