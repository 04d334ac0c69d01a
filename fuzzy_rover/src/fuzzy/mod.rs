//! Fuzzy-logic modelling and inference.
//!
//! This module provides:
//! - Shape descriptors and variable groups describing linguistic labels
//! - Membership functions and linguistic variables built from those groups
//! - A rule-based inference engine with centroid defuzzification
//! - Chart curves derived from the same descriptors

pub mod curve;
pub mod engine;
pub mod error;
pub mod group;
pub mod membership;
pub mod rule;
pub mod shape;

pub use curve::{derive_curve, sample_curve, GroupChart, Keyframe, SetChart};
pub use engine::{
    CentroidDefuzzifier, Database, InferenceReport, InferenceSystem, Phase, RuleFiring,
    DEFAULT_RESOLUTION,
};
pub use error::FuzzyError;
pub use group::VariableGroup;
pub use membership::{build_sets, build_variable, LinguisticVariable, MembershipFunction};
pub use rule::parse_rule;
pub use shape::{Point, ShapeDescriptor, ShapeKind};
