use crate::fuzzy::FuzzyError;
use crate::simulation::controller::{
    Actuator, CycleOutcome, Diagnostics, Pose, SteeringConfig, SteeringController,
    TracingDiagnostics,
};
use crate::simulation::environment::ObstacleField;
use rand::Rng;

/// Validates that a value is finite (not NaN or infinite).
/// Returns a safe fallback (0.0) in release mode if the value is non-finite.
#[inline]
fn assert_finite(value: f64, context: &str) -> f64 {
    debug_assert!(value.is_finite(), "Non-finite value in {context}: {value}");
    if value.is_finite() { value } else { 0.0 }
}

/// The rigid body the controller drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoverBody {
    pub x: f64,
    pub y: f64,
    /// Degrees in `[0, 360)`, clockwise from +x
    pub heading: f64,
    /// Speed applied during the last cycle
    pub speed: f64,
}

impl RoverBody {
    #[must_use]
    pub const fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            heading: self.heading,
        }
    }
}

impl Actuator for RoverBody {
    fn apply_heading_delta(&mut self, delta_degrees: f64, _elapsed: f64) {
        let heading = assert_finite(self.heading + delta_degrees, "heading").rem_euclid(360.0);
        // rem_euclid rounds tiny negatives up to 360.0
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    fn apply_forward_velocity(&mut self, speed: f64, elapsed: f64) {
        self.speed = speed;
        let (dx, dy) = self.pose().direction(0.0);
        self.x = assert_finite(self.x + dx * speed * elapsed, "x");
        self.y = assert_finite(self.y + dy * speed * elapsed, "y");
    }
}

/// An autonomous rover steering itself through an obstacle field.
pub struct Rover<D: Diagnostics = TracingDiagnostics> {
    pub body: RoverBody,
    pub controller: SteeringController<D>,
    pub tick_count: u64,
    /// Ticks that ended with the rover inside an obstacle
    pub collisions: u64,
    pub last_outcome: Option<CycleOutcome>,
}

impl Rover<TracingDiagnostics> {
    /// Creates a rover at the given position with a random heading.
    ///
    /// # Errors
    ///
    /// Fails if the steering model cannot be built.
    pub fn new(x: f64, y: f64, config: SteeringConfig) -> Result<Self, FuzzyError> {
        let heading = rand::rng().random_range(0.0..360.0);
        Ok(Self::with_controller(
            x,
            y,
            heading,
            SteeringController::new(config)?,
        ))
    }
}

impl<D: Diagnostics> Rover<D> {
    /// Creates a rover with an explicit heading and controller.
    #[must_use]
    pub fn with_controller(x: f64, y: f64, heading: f64, controller: SteeringController<D>) -> Self {
        Self {
            body: RoverBody {
                x,
                y,
                heading,
                speed: 0.0,
            },
            controller,
            tick_count: 0,
            collisions: 0,
            last_outcome: None,
        }
    }

    /// Runs one control cycle of `elapsed` seconds.
    ///
    /// 1. Samples left, front and right distances from the field.
    /// 2. Steers (or holds heading on an inference gap).
    /// 3. Drives forward and keeps the rover inside the field.
    pub fn update(&mut self, field: &ObstacleField, elapsed: f64) -> &CycleOutcome {
        let pose = self.body.pose();
        let outcome = self.controller.step(&pose, field, &mut self.body, elapsed);

        // Boundary Check
        self.body.x = self.body.x.clamp(0.0, field.width);
        self.body.y = self.body.y.clamp(0.0, field.height);

        if field.obstacles.iter().any(|o| o.contains(self.body.x, self.body.y)) {
            self.collisions += 1;
        }
        self.tick_count += 1;

        self.last_outcome.insert(outcome)
    }
}
