//! Simulation hyperparameters.

// Fuzzy model
pub const SENSOR_DOMAIN: (f64, f64) = (0.0, 10.0);
pub const HEADING_DOMAIN: (f64, f64) = (-50.0, 50.0); // Degrees, positive turns right
pub const CENTROID_RESOLUTION: usize = 50;

// Controller
pub const MAX_ANGULAR_RATE: f64 = 180.0; // Degrees per second
pub const FORWARD_SPEED: f64 = 2.0; // Units per second
pub const UNBOUNDED_DISTANCE: f64 = f64::MAX; // Reading when a ray hits nothing

// Field
pub const FIELD_WIDTH: f64 = 100.0;
pub const FIELD_HEIGHT: f64 = 50.0; // Adjusted for terminal aspect ratio approx
pub const OBSTACLE_COUNT: usize = 12;
pub const OBSTACLE_RADIUS_MIN: f64 = 1.5;
pub const OBSTACLE_RADIUS_MAX: f64 = 4.0;
pub const OBSTACLE_MARGIN: f64 = 5.0;
pub const SPAWN_CLEARANCE: f64 = 6.0; // Keep obstacles away from the rover start

// Loop
pub const TICK_MILLIS: u64 = 50;
