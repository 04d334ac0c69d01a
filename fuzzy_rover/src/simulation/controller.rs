//! Per-cycle steering: sense three distances, infer a heading change, and
//! drive the body.
//!
//! The controller owns its inference engine. Sensing, actuation and fault
//! reporting are collaborators passed in as traits so the same controller
//! drives the simulated rover and the test doubles.

use tracing::{error, trace, warn};

use crate::fuzzy::{FuzzyError, GroupChart, InferenceReport};
use crate::simulation::brain::{
    build_steering_model, SteeringModel, FRONT_DISTANCE, HEADING, LEFT_DISTANCE, RIGHT_DISTANCE,
};
use crate::simulation::params::{
    CENTROID_RESOLUTION, FORWARD_SPEED, MAX_ANGULAR_RATE, UNBOUNDED_DISTANCE,
};

/// Returns the distance to the nearest obstacle along a ray, or `None` if
/// there is none.
pub trait DistanceSensor {
    fn measure_distance(&self, origin: (f64, f64), direction: (f64, f64)) -> Option<f64>;
}

/// Moves a body.
pub trait Actuator {
    /// Rotates by `delta_degrees` (positive turns right) over `elapsed` seconds.
    fn apply_heading_delta(&mut self, delta_degrees: f64, elapsed: f64);
    /// Drives forward at `speed` units per second for `elapsed` seconds.
    fn apply_forward_velocity(&mut self, speed: f64, elapsed: f64);
}

/// Sink for cycles where no heading could be inferred.
pub trait Diagnostics {
    fn report_inference_failure(&mut self, readings: SensorReadings, error: &FuzzyError);
}

/// Reports failures as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report_inference_failure(&mut self, readings: SensorReadings, err: &FuzzyError) {
        if err.is_inference_gap() {
            warn!(
                left = readings.left,
                front = readings.front,
                right = readings.right,
                "failed to get heading"
            );
        } else {
            error!(
                left = readings.left,
                front = readings.front,
                right = readings.right,
                %err,
                "steering inference failed"
            );
        }
    }
}

/// Position and heading of a body. Heading is in degrees, measured
/// clockwise from +x in a y-down frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    /// Unit vector pointing `offset` degrees clockwise of the heading.
    #[must_use]
    pub fn direction(&self, offset: f64) -> (f64, f64) {
        let theta = (self.heading + offset).to_radians();
        (theta.cos(), theta.sin())
    }
}

/// The three distances sampled in one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReadings {
    pub left: f64,
    pub front: f64,
    pub right: f64,
}

impl SensorReadings {
    /// Casts the left, front and right rays from `pose`. A ray that hits
    /// nothing reads [`UNBOUNDED_DISTANCE`].
    pub fn sample<S: DistanceSensor + ?Sized>(sensor: &S, pose: &Pose) -> Self {
        let origin = (pose.x, pose.y);
        let read = |offset: f64| {
            sensor
                .measure_distance(origin, pose.direction(offset))
                .unwrap_or(UNBOUNDED_DISTANCE)
        };
        Self {
            left: read(-90.0),
            front: read(0.0),
            right: read(90.0),
        }
    }
}

/// Runtime knobs of the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringConfig {
    /// Cap on rotation speed in degrees per second
    pub max_angular_rate: f64,
    /// Constant forward speed in units per second
    pub forward_speed: f64,
    /// Centroid sample intervals
    pub resolution: usize,
}

impl SteeringConfig {
    /// Checks that rate and speed are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidConfig`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), FuzzyError> {
        for (setting, value) in [
            ("max_angular_rate", self.max_angular_rate),
            ("forward_speed", self.forward_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FuzzyError::InvalidConfig {
                    setting: setting.to_owned(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            max_angular_rate: MAX_ANGULAR_RATE,
            forward_speed: FORWARD_SPEED,
            resolution: CENTROID_RESOLUTION,
        }
    }
}

/// Result of one control cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Heading updated; `requested` is the inferred change, `applied` the
    /// rate-limited rotation actually sent.
    Steered { requested: f64, applied: f64 },
    /// Heading held for this cycle.
    Held(FuzzyError),
}

/// Fuzzy steering controller for one agent.
pub struct SteeringController<D: Diagnostics = TracingDiagnostics> {
    model: SteeringModel,
    config: SteeringConfig,
    diagnostics: D,
    faults: u64,
    last_readings: Option<SensorReadings>,
    last_report: Option<InferenceReport>,
}

impl SteeringController<TracingDiagnostics> {
    /// Controller that logs faults through `tracing`.
    ///
    /// # Errors
    ///
    /// See [`SteeringController::with_diagnostics`].
    pub fn new(config: SteeringConfig) -> Result<Self, FuzzyError> {
        Self::with_diagnostics(config, TracingDiagnostics)
    }
}

impl<D: Diagnostics> SteeringController<D> {
    /// Controller reporting faults to `diagnostics`.
    ///
    /// # Errors
    ///
    /// Fails with [`FuzzyError::InvalidConfig`] for a negative or non-finite
    /// rate or speed, and if the steering model cannot be built (zero
    /// resolution).
    pub fn with_diagnostics(config: SteeringConfig, diagnostics: D) -> Result<Self, FuzzyError> {
        config.validate()?;
        Ok(Self {
            model: build_steering_model(config.resolution)?,
            config,
            diagnostics,
            faults: 0,
            last_readings: None,
            last_report: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Membership charts computed when the model was built.
    #[must_use]
    pub fn charts(&self) -> &[GroupChart] {
        &self.model.charts
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Number of cycles whose heading update was skipped.
    #[must_use]
    pub const fn faults(&self) -> u64 {
        self.faults
    }

    #[must_use]
    pub const fn last_readings(&self) -> Option<SensorReadings> {
        self.last_readings
    }

    /// Report of the last successful inference.
    #[must_use]
    pub const fn last_report(&self) -> Option<&InferenceReport> {
        self.last_report.as_ref()
    }

    /// Heading change for the given readings, without touching any body.
    ///
    /// # Errors
    ///
    /// [`FuzzyError::InferenceGap`] when no rule covers the readings.
    pub fn infer(&mut self, readings: SensorReadings) -> Result<InferenceReport, FuzzyError> {
        let engine = &mut self.model.engine;
        engine.set_input(RIGHT_DISTANCE, readings.right)?;
        engine.set_input(LEFT_DISTANCE, readings.left)?;
        engine.set_input(FRONT_DISTANCE, readings.front)?;
        engine.evaluate_report(HEADING)
    }

    /// Runs one cycle.
    ///
    /// Forward motion is applied every cycle; rotation only when inference
    /// succeeds, limited to `max_angular_rate * elapsed` degrees. A negative
    /// or NaN `elapsed` counts as zero.
    pub fn step<S, A>(&mut self, pose: &Pose, sensor: &S, body: &mut A, elapsed: f64) -> CycleOutcome
    where
        S: DistanceSensor + ?Sized,
        A: Actuator + ?Sized,
    {
        let readings = SensorReadings::sample(sensor, pose);
        self.last_readings = Some(readings);

        let outcome = match self.infer(readings) {
            Ok(report) => {
                let requested = report.value;
                let limit = (self.config.max_angular_rate * elapsed).max(0.0);
                let applied = requested.clamp(-limit, limit);
                trace!(requested, applied, "heading update");
                body.apply_heading_delta(applied, elapsed);
                self.last_report = Some(report);
                CycleOutcome::Steered { requested, applied }
            }
            Err(err) => {
                self.faults += 1;
                self.diagnostics.report_inference_failure(readings, &err);
                CycleOutcome::Held(err)
            }
        };

        body.apply_forward_velocity(self.config.forward_speed, elapsed);
        outcome
    }
}
