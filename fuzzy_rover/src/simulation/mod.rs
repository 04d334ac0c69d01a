pub mod agent;
pub mod brain;
pub mod controller;
pub mod environment;
pub mod params;

pub use agent::{Rover, RoverBody};
pub use controller::{CycleOutcome, SensorReadings, SteeringConfig, SteeringController};
