//! Error types for the fuzzy modelling and inference layer.

use thiserror::Error;

/// Everything that can go wrong while describing, building, or evaluating a
/// fuzzy model.
///
/// Only [`FuzzyError::InferenceGap`] is expected at run time; every other
/// variant is a setup problem and should abort model construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    /// A shape descriptor has non-finite parameters or unsorted points.
    #[error("invalid shape `{name}`: {reason}")]
    InvalidShape {
        /// Shape name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Two shapes (or labels) with the same name in one group or variable.
    #[error("label `{label}` is defined twice in `{owner}`")]
    DuplicateLabel {
        /// Group or variable name
        owner: String,
        /// Repeated label
        label: String,
    },

    /// A linguistic variable whose domain is empty or not finite.
    #[error("variable `{variable}` has an invalid domain [{start}, {end}]")]
    InvalidDomain {
        /// Variable name
        variable: String,
        /// Domain start
        start: f64,
        /// Domain end
        end: f64,
    },

    /// A controller setting outside its valid range.
    #[error("invalid setting `{setting}`: {value}")]
    InvalidConfig {
        /// Setting name
        setting: String,
        /// Rejected value
        value: f64,
    },

    /// The defuzzifier was asked to sample with zero intervals.
    #[error("defuzzification resolution must be at least 1")]
    InvalidResolution,

    /// A variable with this name is already in the database.
    #[error("variable `{0}` is already defined")]
    DuplicateVariable(String),

    /// Reference to a variable that does not exist.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// Reference to a label the variable does not have.
    #[error("variable `{variable}` has no label `{label}`")]
    UnknownLabel {
        /// Variable name
        variable: String,
        /// Missing label
        label: String,
    },

    /// Malformed rule text.
    #[error("rule `{rule}` does not parse at byte {offset}: {message}")]
    RuleParse {
        /// Rule identifier
        rule: String,
        /// Byte offset of the offending token
        offset: usize,
        /// Description of the problem
        message: String,
    },

    /// A rule with this identifier was already registered.
    #[error("rule `{0}` is already defined")]
    DuplicateRule(String),

    /// Rules can only be added before the first evaluation.
    #[error("rule `{0}` was added after the engine started evaluating")]
    RulesFrozen(String),

    /// A rule reads a variable that has no crisp input yet.
    #[error("no input value has been set for variable `{0}`")]
    MissingInput(String),

    /// No rule gave any activation to the requested output.
    #[error("inference gap: no rule fired for output `{output}`")]
    InferenceGap {
        /// Output variable name
        output: String,
    },
}

impl FuzzyError {
    /// True for the recoverable per-cycle condition.
    #[must_use]
    pub const fn is_inference_gap(&self) -> bool {
        matches!(self, Self::InferenceGap { .. })
    }
}
