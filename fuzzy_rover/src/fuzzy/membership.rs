//! Evaluable membership functions and linguistic variables, plus the
//! factory functions that build them from variable groups.

use crate::fuzzy::error::FuzzyError;
use crate::fuzzy::group::VariableGroup;
use crate::fuzzy::shape::Point;

/// A named piecewise-linear membership function.
///
/// Values before the first point and after the last point are held flat at
/// that point's y.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipFunction {
    name: String,
    points: Vec<Point>,
}

impl MembershipFunction {
    /// Wraps already validated, x-sorted points.
    pub(crate) fn from_points(name: impl Into<String>, points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 2, "membership function needs two points");
        Self {
            name: name.into(),
            points,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    #[must_use]
    pub fn membership(&self, x: f64) -> f64 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if x < first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // Strict upper bound skips zero-width segments.
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x >= a.x && x < b.x {
                let t = (x - a.x) / (b.x - a.x);
                return (a.y + t * (b.y - a.y)).clamp(0.0, 1.0);
            }
        }

        last.y
    }
}

/// A variable over a crisp domain whose values are qualitative labels.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    start: f64,
    end: f64,
    labels: Vec<MembershipFunction>,
}

impl LinguisticVariable {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Crisp domain as `(start, end)`.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Labels in attachment order.
    #[must_use]
    pub fn labels(&self) -> &[MembershipFunction] {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, name: &str) -> Option<&MembershipFunction> {
        self.labels.iter().find(|l| l.name() == name)
    }

    #[must_use]
    pub fn label_index(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l.name() == name)
    }

    /// Membership degree of `x` under every label, in label order.
    #[must_use]
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        self.labels.iter().map(|l| l.membership(x)).collect()
    }
}

/// One membership function per descriptor, in insertion order, each named
/// after its descriptor.
#[must_use]
pub fn build_sets(group: &VariableGroup) -> Vec<MembershipFunction> {
    group
        .shapes()
        .iter()
        .map(|shape| MembershipFunction::from_points(shape.name(), shape.points().to_vec()))
        .collect()
}

/// Attaches `functions` as the labels of a fresh variable over `[start, end]`.
///
/// # Errors
///
/// Returns [`FuzzyError::InvalidDomain`] unless `start < end` and both are
/// finite, and [`FuzzyError::DuplicateLabel`] if two functions share a name.
pub fn build_variable(
    name: impl Into<String>,
    start: f64,
    end: f64,
    functions: &[MembershipFunction],
) -> Result<LinguisticVariable, FuzzyError> {
    let name = name.into();
    if !(start.is_finite() && end.is_finite() && start < end) {
        return Err(FuzzyError::InvalidDomain {
            variable: name,
            start,
            end,
        });
    }

    let mut labels: Vec<MembershipFunction> = Vec::with_capacity(functions.len());
    for function in functions {
        if labels.iter().any(|l| l.name() == function.name()) {
            return Err(FuzzyError::DuplicateLabel {
                owner: name,
                label: function.name().to_owned(),
            });
        }
        labels.push(function.clone());
    }

    Ok(LinguisticVariable {
        name,
        start,
        end,
        labels,
    })
}
