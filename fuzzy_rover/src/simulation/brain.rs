//! The rover's steering knowledge: distance and heading labels plus the
//! rule base mapping three wall distances to a heading change.

use tracing::debug;

use crate::fuzzy::{
    build_sets, build_variable, CentroidDefuzzifier, Database, FuzzyError, GroupChart,
    InferenceSystem, ShapeDescriptor, VariableGroup,
};
use crate::simulation::params::{HEADING_DOMAIN, SENSOR_DOMAIN};

pub const RIGHT_DISTANCE: &str = "RightDistance";
pub const LEFT_DISTANCE: &str = "LeftDistance";
pub const FRONT_DISTANCE: &str = "FrontDistance";
pub const HEADING: &str = "Heading";

/// `(id, text)` for every steering rule.
///
/// Rule 6 covers any near front wall on its own; when it conflicts with
/// rule 3 the two labels are both kept and the centroid lands between them.
pub const STEERING_RULES: [(&str, &str); 6] = [
    // all clear ahead
    ("1", "IF FrontDistance IS Far THEN Heading IS Straight"),
    // boxed in on one side
    ("2", "IF FrontDistance IS Near AND RightDistance IS Near THEN Heading IS Left"),
    ("3", "IF FrontDistance IS Near AND LeftDistance IS Near THEN Heading IS Right"),
    // edge away from walls
    (
        "4",
        "IF LeftDistance IS Near AND (RightDistance IS Medium OR RightDistance IS Far) THEN Heading IS SlightRight",
    ),
    (
        "5",
        "IF RightDistance IS Near AND (LeftDistance IS Medium OR LeftDistance IS Far) THEN Heading IS SlightLeft",
    ),
    // prefer left when both ways are open
    ("6", "IF FrontDistance IS Near THEN Heading IS Left"),
];

/// Perceived distance labels.
///
/// # Errors
///
/// Only if the built-in shapes are malformed.
pub fn distance_group() -> Result<VariableGroup, FuzzyError> {
    let mut group = VariableGroup::new("Distance");
    group.add(ShapeDescriptor::left("Near", 0.75, 2.5)?)?;
    group.add(ShapeDescriptor::mid("Medium", 0.75, 2.5, 3.0, 10.0)?)?;
    group.add(ShapeDescriptor::right("Far", 3.0, 10.0)?)?;
    Ok(group)
}

/// Heading change labels, in degrees.
///
/// # Errors
///
/// Only if the built-in shapes are malformed.
pub fn heading_group() -> Result<VariableGroup, FuzzyError> {
    let mut group = VariableGroup::new(HEADING);
    group.add(ShapeDescriptor::left("HardLeft", -35.0, -30.0)?)?;
    group.add(ShapeDescriptor::mid("Left", -35.0, -30.0, -20.0, -15.0)?)?;
    group.add(ShapeDescriptor::mid("SlightLeft", -20.0, -15.0, -5.0, 0.0)?)?;
    group.add(ShapeDescriptor::mid("Straight", -5.0, -1.0, 1.0, 5.0)?)?;
    group.add(ShapeDescriptor::mid("SlightRight", 0.0, 5.0, 15.0, 20.0)?)?;
    group.add(ShapeDescriptor::mid("Right", 15.0, 20.0, 30.0, 35.0)?)?;
    group.add(ShapeDescriptor::right("HardRight", 30.0, 35.0)?)?;
    Ok(group)
}

/// A ready-to-run engine together with the chart snapshot of its groups.
#[derive(Debug, Clone)]
pub struct SteeringModel {
    pub engine: InferenceSystem,
    pub charts: Vec<GroupChart>,
}

/// Builds the three-sensor, one-output steering model.
///
/// # Errors
///
/// Returns [`FuzzyError::InvalidResolution`] for a zero resolution; any
/// other error means the built-in model itself is inconsistent.
pub fn build_steering_model(resolution: usize) -> Result<SteeringModel, FuzzyError> {
    let defuzzifier = CentroidDefuzzifier::new(resolution)?;

    let distance = distance_group()?;
    let heading = heading_group()?;
    let distance_sets = build_sets(&distance);
    let heading_sets = build_sets(&heading);

    let (d_start, d_end) = SENSOR_DOMAIN;
    let (h_start, h_end) = HEADING_DOMAIN;
    let mut db = Database::new();
    for name in [RIGHT_DISTANCE, LEFT_DISTANCE, FRONT_DISTANCE] {
        db.add_variable(build_variable(name, d_start, d_end, &distance_sets)?)?;
    }
    db.add_variable(build_variable(HEADING, h_start, h_end, &heading_sets)?)?;

    let mut engine = InferenceSystem::new(db, defuzzifier);
    for (id, text) in STEERING_RULES {
        engine.new_rule(id, text)?;
    }

    let charts = [&distance, &heading]
        .into_iter()
        .filter_map(GroupChart::from_group)
        .collect();

    debug!(rules = STEERING_RULES.len(), resolution, "steering model built");
    Ok(SteeringModel { engine, charts })
}
