//! Integration tests for the full sense, infer, act loop.
//!
//! These tests verify that the rover stays numerically stable and inside
//! the field over long runs, and that inference gaps are absorbed rather
//! than propagated.

use fuzzy_rover::simulation::agent::Rover;
use fuzzy_rover::simulation::controller::{CycleOutcome, SteeringConfig, SteeringController};
use fuzzy_rover::simulation::environment::ObstacleField;
use fuzzy_rover::simulation::params::{FIELD_HEIGHT, FIELD_WIDTH, TICK_MILLIS};

const DT: f64 = TICK_MILLIS as f64 / 1000.0;

/// Run simulation for N ticks and return final rover state
fn run_simulation(field: &ObstacleField, ticks: u64) -> Rover {
    let mut rover = Rover::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, SteeringConfig::default())
        .expect("steering model should build");

    for _ in 0..ticks {
        rover.update(field, DT);

        // Check for NaN/Inf to ensure numerical stability
        assert!(rover.body.x.is_finite(), "Rover x became non-finite");
        assert!(rover.body.y.is_finite(), "Rover y became non-finite");
        assert!(rover.body.heading.is_finite(), "Rover heading became non-finite");
        assert!((0.0..=field.width).contains(&rover.body.x));
        assert!((0.0..=field.height).contains(&rover.body.y));
        assert!((0.0..360.0).contains(&rover.body.heading));
    }
    rover
}

#[test]
fn test_long_run_stays_stable() {
    let field = ObstacleField::new(FIELD_WIDTH, FIELD_HEIGHT);
    let rover = run_simulation(&field, 2000);
    assert_eq!(rover.tick_count, 2000);
    assert!(rover.controller.faults() <= rover.tick_count);
}

#[test]
fn test_empty_field_has_no_collisions() {
    let field = ObstacleField::with_obstacles(FIELD_WIDTH, FIELD_HEIGHT, Vec::new());
    let rover = run_simulation(&field, 500);
    assert_eq!(rover.collisions, 0);
    assert!(rover.last_outcome.is_some());
}

#[test]
fn test_rover_moves_every_tick() {
    let field = ObstacleField::with_obstacles(FIELD_WIDTH, FIELD_HEIGHT, Vec::new());
    let controller = SteeringController::new(SteeringConfig::default()).unwrap();
    let mut rover = Rover::with_controller(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, 0.0, controller);

    let outcome = rover.update(&field, DT).clone();
    assert!(matches!(outcome, CycleOutcome::Steered { .. }));
    let expected = FIELD_WIDTH / 2.0 + SteeringConfig::default().forward_speed * DT;
    assert!((rover.body.x - expected).abs() < 1e-6, "x = {}", rover.body.x);
    assert!(rover.controller.last_report().is_some());
}

#[test]
fn test_rover_turns_away_from_close_wall() {
    let field = ObstacleField::with_obstacles(FIELD_WIDTH, FIELD_HEIGHT, Vec::new());
    let controller = SteeringController::new(SteeringConfig::default()).unwrap();
    // Heading +x with the top wall one unit to the left.
    let mut rover = Rover::with_controller(FIELD_WIDTH / 2.0, 1.0, 0.0, controller);

    match rover.update(&field, DT) {
        CycleOutcome::Steered { requested, applied } => {
            assert!(*requested > 0.0, "requested {requested}");
            assert!(*applied > 0.0);
        }
        CycleOutcome::Held(err) => panic!("unexpected fault: {err}"),
    }
}
