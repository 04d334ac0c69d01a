//! Piecewise-linear shape descriptors.
//!
//! A descriptor is the single source of truth for one label of a linguistic
//! variable: the inference path interpolates its points and the chart path
//! derives curve keyframes from the same points.

use crate::fuzzy::error::FuzzyError;

/// A control point of a piecewise-linear membership function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Position on the variable's domain
    pub x: f64,
    /// Membership degree in `[0, 1]`
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The three supported shape families and their parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Full membership up to `start`, falling to zero at `end`.
    LeftShoulder { start: f64, end: f64 },
    /// Trapezoid: zero at `start`, one on `[peak_left, peak_right]`, zero at `end`.
    Mid {
        start: f64,
        peak_left: f64,
        peak_right: f64,
        end: f64,
    },
    /// Zero up to `start`, rising to full membership at `end`.
    RightShoulder { start: f64, end: f64 },
}

impl ShapeKind {
    /// Control points for this shape, ordered by x.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        match *self {
            Self::LeftShoulder { start, end } => vec![Point::new(start, 1.0), Point::new(end, 0.0)],
            Self::Mid {
                start,
                peak_left,
                peak_right,
                end,
            } => vec![
                Point::new(start, 0.0),
                Point::new(peak_left, 1.0),
                Point::new(peak_right, 1.0),
                Point::new(end, 0.0),
            ],
            Self::RightShoulder { start, end } => {
                vec![Point::new(start, 0.0), Point::new(end, 1.0)]
            }
        }
    }

    const fn expected_len(&self) -> usize {
        match self {
            Self::LeftShoulder { .. } | Self::RightShoulder { .. } => 2,
            Self::Mid { .. } => 4,
        }
    }
}

/// A named shape together with its derived control points.
///
/// Construction validates the points, so every descriptor that exists has
/// finite, x-sorted points with y in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    name: String,
    kind: ShapeKind,
    points: Vec<Point>,
}

impl ShapeDescriptor {
    /// Builds a descriptor from a shape kind.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidShape`] if a parameter is not finite or the
    /// parameters are not in non-decreasing order.
    pub fn new(name: impl Into<String>, kind: ShapeKind) -> Result<Self, FuzzyError> {
        let name = name.into();
        let points = kind.points();
        validate_points(&name, &points, kind.expected_len())?;
        Ok(Self { name, kind, points })
    }

    /// Left shoulder over `[start, end]`.
    ///
    /// # Errors
    ///
    /// See [`ShapeDescriptor::new`].
    pub fn left(name: impl Into<String>, start: f64, end: f64) -> Result<Self, FuzzyError> {
        Self::new(name, ShapeKind::LeftShoulder { start, end })
    }

    /// Trapezoid over `[start, end]` with a plateau on `[peak_left, peak_right]`.
    ///
    /// # Errors
    ///
    /// See [`ShapeDescriptor::new`].
    pub fn mid(
        name: impl Into<String>,
        start: f64,
        peak_left: f64,
        peak_right: f64,
        end: f64,
    ) -> Result<Self, FuzzyError> {
        Self::new(
            name,
            ShapeKind::Mid {
                start,
                peak_left,
                peak_right,
                end,
            },
        )
    }

    /// Right shoulder over `[start, end]`.
    ///
    /// # Errors
    ///
    /// See [`ShapeDescriptor::new`].
    pub fn right(name: impl Into<String>, start: f64, end: f64) -> Result<Self, FuzzyError> {
        Self::new(name, ShapeKind::RightShoulder { start, end })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Leftmost control point. Descriptors always have at least two points.
    #[must_use]
    pub fn first(&self) -> Point {
        self.points[0]
    }

    /// Rightmost control point.
    #[must_use]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

fn validate_points(name: &str, points: &[Point], expected_len: usize) -> Result<(), FuzzyError> {
    let invalid = |reason: String| FuzzyError::InvalidShape {
        name: name.to_owned(),
        reason,
    };

    if points.len() != expected_len {
        return Err(invalid(format!(
            "expected {expected_len} points, got {}",
            points.len()
        )));
    }

    for p in points {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(invalid(format!("non-finite point ({}, {})", p.x, p.y)));
        }
        if !(0.0..=1.0).contains(&p.y) {
            return Err(invalid(format!("membership {} outside [0, 1]", p.y)));
        }
    }

    if let Some(pair) = points.windows(2).find(|w| w[1].x < w[0].x) {
        return Err(invalid(format!(
            "points must be sorted by x, but {} follows {}",
            pair[1].x, pair[0].x
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_shoulder_points() {
        let near = ShapeDescriptor::left("Near", 0.75, 2.5).unwrap();
        assert_eq!(
            near.points(),
            &[Point::new(0.75, 1.0), Point::new(2.5, 0.0)]
        );
        assert_eq!(near.name(), "Near");
    }

    #[test]
    fn test_mid_points() {
        let medium = ShapeDescriptor::mid("Medium", 0.75, 2.5, 3.0, 10.0).unwrap();
        let ys: Vec<f64> = medium.points().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(medium.first().x, 0.75);
        assert_eq!(medium.last().x, 10.0);
    }

    #[test]
    fn test_right_shoulder_points() {
        let far = ShapeDescriptor::right("Far", 3.0, 10.0).unwrap();
        assert_eq!(far.points(), &[Point::new(3.0, 0.0), Point::new(10.0, 1.0)]);
    }

    #[test]
    fn test_unsorted_parameters_rejected() {
        let err = ShapeDescriptor::mid("Bad", 0.0, 5.0, 2.0, 10.0).unwrap_err();
        assert!(matches!(err, FuzzyError::InvalidShape { ref name, .. } if name == "Bad"));

        assert!(ShapeDescriptor::left("Backwards", 3.0, 1.0).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(ShapeDescriptor::right("Inf", 0.0, f64::INFINITY).is_err());
        assert!(ShapeDescriptor::left("NaN", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_zero_width_segment_allowed() {
        let step = ShapeDescriptor::mid("Step", 1.0, 1.0, 2.0, 2.0).unwrap();
        assert_eq!(step.points().len(), 4);
    }
}
