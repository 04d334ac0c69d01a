//! Variable groups: the label set of one linguistic variable.

use crate::fuzzy::error::FuzzyError;
use crate::fuzzy::shape::ShapeDescriptor;

/// Fraction of the actual range added on each side of a chart.
pub const CHART_MARGIN: f64 = 0.1;

/// A named, ordered collection of shape descriptors (e.g. "Distance" with
/// Near, Medium and Far) that tracks the x extent of its members.
#[derive(Debug, Clone)]
pub struct VariableGroup {
    name: String,
    shapes: Vec<ShapeDescriptor>,
    actual_min: f64,
    actual_max: f64,
}

impl VariableGroup {
    /// Creates an empty group. Bounds start at the +inf/-inf sentinels.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            actual_min: f64::INFINITY,
            actual_max: f64::NEG_INFINITY,
        }
    }

    /// Appends a descriptor and widens the tracked bounds.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateLabel`] if a descriptor with the same
    /// name is already in the group.
    pub fn add(&mut self, shape: ShapeDescriptor) -> Result<&ShapeDescriptor, FuzzyError> {
        if self.shapes.iter().any(|s| s.name() == shape.name()) {
            return Err(FuzzyError::DuplicateLabel {
                owner: self.name.clone(),
                label: shape.name().to_owned(),
            });
        }

        self.actual_min = self.actual_min.min(shape.first().x);
        self.actual_max = self.actual_max.max(shape.last().x);
        self.shapes.push(shape);

        Ok(&self.shapes[self.shapes.len() - 1])
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptors in insertion order.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeDescriptor] {
        &self.shapes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Smallest x over all member points (+inf while empty).
    #[must_use]
    pub const fn actual_min(&self) -> f64 {
        self.actual_min
    }

    /// Largest x over all member points (-inf while empty).
    #[must_use]
    pub const fn actual_max(&self) -> f64 {
        self.actual_max
    }

    /// Chart window: the actual bounds widened by [`CHART_MARGIN`] of the
    /// actual range on each side. `None` for an empty group.
    #[must_use]
    pub fn chart_bounds(&self) -> Option<(f64, f64)> {
        if self.shapes.is_empty() {
            return None;
        }
        let margin = (self.actual_max - self.actual_min) * CHART_MARGIN;
        Some((self.actual_min - margin, self.actual_max + margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance_group() -> VariableGroup {
        let mut group = VariableGroup::new("Distance");
        group.add(ShapeDescriptor::left("Near", 0.75, 2.5).unwrap()).unwrap();
        group
            .add(ShapeDescriptor::mid("Medium", 0.75, 2.5, 3.0, 10.0).unwrap())
            .unwrap();
        group.add(ShapeDescriptor::right("Far", 3.0, 10.0).unwrap()).unwrap();
        group
    }

    #[test]
    fn test_new_group_has_sentinel_bounds() {
        let group = VariableGroup::new("Empty");
        assert!(group.is_empty());
        assert_eq!(group.actual_min(), f64::INFINITY);
        assert_eq!(group.actual_max(), f64::NEG_INFINITY);
        assert!(group.chart_bounds().is_none());
    }

    #[test]
    fn test_bounds_track_members() {
        let group = distance_group();
        assert_eq!(group.actual_min(), 0.75);
        assert_eq!(group.actual_max(), 10.0);
        assert_eq!(group.shapes().len(), 3);
        assert_eq!(group.shapes()[1].name(), "Medium");
    }

    #[test]
    fn test_add_returns_descriptor() {
        let mut group = VariableGroup::new("Heading");
        let added = group
            .add(ShapeDescriptor::left("HardLeft", -35.0, -30.0).unwrap())
            .unwrap();
        assert_eq!(added.name(), "HardLeft");
    }

    #[test]
    fn test_chart_bounds_margin() {
        let group = distance_group();
        let (lo, hi) = group.chart_bounds().unwrap();
        let range = 10.0 - 0.75;
        assert!((lo - (0.75 - 0.1 * range)).abs() < 1e-12);
        assert!((hi - (10.0 + 0.1 * range)).abs() < 1e-12);
    }

    #[test]
    fn test_chart_bounds_degenerate_range() {
        let mut group = VariableGroup::new("Spike");
        group.add(ShapeDescriptor::left("Wall", 4.0, 4.0).unwrap()).unwrap();
        assert_eq!(group.chart_bounds(), Some((4.0, 4.0)));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut group = distance_group();
        let err = group
            .add(ShapeDescriptor::left("Near", 0.0, 1.0).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            FuzzyError::DuplicateLabel {
                owner: "Distance".into(),
                label: "Near".into()
            }
        );
        assert_eq!(group.shapes().len(), 3);
    }
}
