//! Mamdani inference engine with centroid defuzzification.
//!
//! Each evaluation runs the classic pipeline:
//! 1. Fuzzify every assigned input under each of its labels.
//! 2. Fire each rule concluding on the requested output (AND = min, OR = max).
//! 3. Aggregate per output label, keeping the strongest firing.
//! 4. Clip each label at its activation, take the pointwise maximum over the
//!    output domain and return the sampled centroid.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::fuzzy::error::FuzzyError;
use crate::fuzzy::membership::LinguisticVariable;
use crate::fuzzy::rule::{parse_rule, Clause, Expr};

/// Sample count used when none is specified.
pub const DEFAULT_RESOLUTION: usize = 50;

/// The set of linguistic variables an engine reasons over.
#[derive(Debug, Clone, Default)]
pub struct Database {
    variables: Vec<LinguisticVariable>,
    index: HashMap<String, usize>,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateVariable`] if the name is taken.
    pub fn add_variable(&mut self, variable: LinguisticVariable) -> Result<(), FuzzyError> {
        if self.index.contains_key(variable.name()) {
            return Err(FuzzyError::DuplicateVariable(variable.name().to_owned()));
        }
        self.index.insert(variable.name().to_owned(), self.variables.len());
        self.variables.push(variable);
        Ok(())
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.index.get(name).map(|&i| &self.variables[i])
    }

    #[must_use]
    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    fn index_of(&self, name: &str) -> Result<usize, FuzzyError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FuzzyError::UnknownVariable(name.to_owned()))
    }

    fn resolve(&self, clause: &Clause) -> Result<(usize, usize), FuzzyError> {
        let variable = self.index_of(&clause.variable)?;
        let label = self.variables[variable]
            .label_index(&clause.label)
            .ok_or_else(|| FuzzyError::UnknownLabel {
                variable: clause.variable.clone(),
                label: clause.label.clone(),
            })?;
        Ok((variable, label))
    }
}

/// Centroid (centre of gravity) defuzzifier over evenly spaced samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentroidDefuzzifier {
    intervals: usize,
}

impl Default for CentroidDefuzzifier {
    fn default() -> Self {
        Self {
            intervals: DEFAULT_RESOLUTION,
        }
    }
}

impl CentroidDefuzzifier {
    /// Samples the output domain at `intervals + 1` evenly spaced points,
    /// both ends included.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidResolution`] for zero intervals.
    pub const fn new(intervals: usize) -> Result<Self, FuzzyError> {
        if intervals == 0 {
            return Err(FuzzyError::InvalidResolution);
        }
        Ok(Self { intervals })
    }

    #[must_use]
    pub const fn intervals(&self) -> usize {
        self.intervals
    }

    /// Centroid of the clipped, max-aggregated output labels.
    ///
    /// `activations[i]` caps label `i` of `variable`. Returns `None` when the
    /// aggregate is zero at every sample.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn defuzzify(&self, variable: &LinguisticVariable, activations: &[f64]) -> Option<f64> {
        let (start, end) = variable.domain();
        let span = end - start;

        let mut weighted = 0.0;
        let mut total = 0.0;
        for i in 0..=self.intervals {
            let x = start + span * (i as f64) / (self.intervals as f64);
            let y = variable
                .labels()
                .iter()
                .zip(activations)
                .map(|(label, &cap)| label.membership(x).min(cap))
                .fold(0.0_f64, f64::max);
            weighted += x * y;
            total += y;
        }

        if total > 0.0 {
            Some(weighted / total)
        } else {
            None
        }
    }
}

/// Whether the engine still accepts rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    Ready,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    id: String,
    antecedent: Expr,
    output: usize,
    label: usize,
}

/// Firing strength of one rule during an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFiring {
    /// Rule identifier
    pub rule: String,
    /// Antecedent truth value in `[0, 1]`
    pub strength: f64,
}

/// Everything an evaluation computed, for display and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceReport {
    /// Output variable name
    pub output: String,
    /// Defuzzified crisp value
    pub value: f64,
    /// `(label, activation)` for every label of the output, in label order
    pub activations: Vec<(String, f64)>,
    /// Firing strength of every rule concluding on the output
    pub firings: Vec<RuleFiring>,
}

/// A rule-based fuzzy inference system owned by one agent.
///
/// Variables and rules are fixed at setup; afterwards only the crisp inputs
/// change between evaluations.
#[derive(Debug, Clone)]
pub struct InferenceSystem {
    database: Database,
    defuzzifier: CentroidDefuzzifier,
    rules: Vec<CompiledRule>,
    inputs: Vec<Option<f64>>,
    phase: Phase,
}

impl InferenceSystem {
    #[must_use]
    pub fn new(database: Database, defuzzifier: CentroidDefuzzifier) -> Self {
        let inputs = vec![None; database.variables().len()];
        debug!(
            variables = database.variables().len(),
            resolution = defuzzifier.intervals(),
            "inference system created"
        );
        Self {
            database,
            defuzzifier,
            rules: Vec::new(),
            inputs,
            phase: Phase::Configuring,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.database
    }

    /// Identifiers of the registered rules, in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.id.as_str())
    }

    /// Parses and registers a rule.
    ///
    /// # Errors
    ///
    /// Fails with [`FuzzyError::RulesFrozen`] once the engine has evaluated,
    /// [`FuzzyError::DuplicateRule`] for a reused id, [`FuzzyError::RuleParse`]
    /// for malformed text, and [`FuzzyError::UnknownVariable`] or
    /// [`FuzzyError::UnknownLabel`] for names the database does not define.
    pub fn new_rule(&mut self, id: impl Into<String>, text: &str) -> Result<(), FuzzyError> {
        let id = id.into();
        if self.phase == Phase::Ready {
            return Err(FuzzyError::RulesFrozen(id));
        }
        if self.rules.iter().any(|r| r.id == id) {
            return Err(FuzzyError::DuplicateRule(id));
        }

        let parsed = parse_rule(&id, text)?;
        let antecedent = parsed.antecedent.resolve(&|c| self.database.resolve(c))?;
        let (output, label) = self.database.resolve(&parsed.consequent)?;

        debug!(rule = %id, text, "rule registered");
        self.rules.push(CompiledRule {
            id,
            antecedent,
            output,
            label,
        });
        Ok(())
    }

    /// Stores the crisp value of a variable, replacing any previous value.
    /// Values outside the domain are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::UnknownVariable`] for an undefined name.
    pub fn set_input(&mut self, variable: &str, value: f64) -> Result<(), FuzzyError> {
        let index = self.database.index_of(variable)?;
        self.inputs[index] = Some(value);
        Ok(())
    }

    /// Current crisp value of a variable, if one was set.
    #[must_use]
    pub fn input(&self, variable: &str) -> Option<f64> {
        self.database
            .index
            .get(variable)
            .and_then(|&i| self.inputs[i])
    }

    /// Crisp value of `output` for the current inputs.
    ///
    /// # Errors
    ///
    /// See [`InferenceSystem::evaluate_report`].
    pub fn evaluate(&mut self, output: &str) -> Result<f64, FuzzyError> {
        self.evaluate_report(output).map(|report| report.value)
    }

    /// Runs the full pipeline and returns the intermediate results too.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InferenceGap`] when no rule gives the output any
    /// activation, [`FuzzyError::MissingInput`] when a rule reads a variable
    /// with no value, and [`FuzzyError::UnknownVariable`] for an undefined
    /// output.
    pub fn evaluate_report(&mut self, output: &str) -> Result<InferenceReport, FuzzyError> {
        let out = self.database.index_of(output)?;
        if self.phase == Phase::Configuring {
            debug!(rules = self.rules.len(), "inference system ready");
            self.phase = Phase::Ready;
        }

        let variables = self.database.variables();
        let degrees: Vec<Option<Vec<f64>>> = variables
            .iter()
            .zip(&self.inputs)
            .map(|(variable, input)| input.map(|x| variable.fuzzify(x)))
            .collect();

        let output_var = &variables[out];
        let mut activations = vec![0.0_f64; output_var.labels().len()];
        let mut firings = Vec::new();

        for rule in self.rules.iter().filter(|r| r.output == out) {
            let strength = rule
                .antecedent
                .truth(&degrees)
                .map_err(|v| FuzzyError::MissingInput(variables[v].name().to_owned()))?;
            trace!(rule = %rule.id, strength, "rule fired");
            activations[rule.label] = activations[rule.label].max(strength);
            firings.push(RuleFiring {
                rule: rule.id.clone(),
                strength,
            });
        }

        let value = self
            .defuzzifier
            .defuzzify(output_var, &activations)
            .ok_or_else(|| FuzzyError::InferenceGap {
                output: output.to_owned(),
            })?;
        trace!(output, value, "defuzzified");

        Ok(InferenceReport {
            output: output.to_owned(),
            value,
            activations: output_var
                .labels()
                .iter()
                .map(|l| l.name().to_owned())
                .zip(activations)
                .collect(),
            firings,
        })
    }
}
