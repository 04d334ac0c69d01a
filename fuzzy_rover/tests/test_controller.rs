use fuzzy_rover::fuzzy::FuzzyError;
use fuzzy_rover::simulation::controller::{
    Actuator, CycleOutcome, Diagnostics, DistanceSensor, Pose, SensorReadings, SteeringConfig,
    SteeringController,
};
use fuzzy_rover::simulation::environment::{Obstacle, ObstacleField};
use fuzzy_rover::simulation::params::UNBOUNDED_DISTANCE;
use fuzzy_rover::simulation::RoverBody;

const EPSILON: f64 = 1e-9;

/// Returns the same distance for every ray.
struct Uniform(Option<f64>);

impl DistanceSensor for Uniform {
    fn measure_distance(&self, _origin: (f64, f64), _direction: (f64, f64)) -> Option<f64> {
        self.0
    }
}

#[derive(Default)]
struct Recorder {
    failures: Vec<(SensorReadings, FuzzyError)>,
}

impl Diagnostics for Recorder {
    fn report_inference_failure(&mut self, readings: SensorReadings, error: &FuzzyError) {
        self.failures.push((readings, error.clone()));
    }
}

fn body_at_origin() -> RoverBody {
    RoverBody {
        x: 10.0,
        y: 10.0,
        heading: 0.0,
        speed: 0.0,
    }
}

#[test]
fn test_gap_reported_to_diagnostics() {
    let mut controller =
        SteeringController::with_diagnostics(SteeringConfig::default(), Recorder::default())
            .unwrap();
    let mut body = body_at_origin();
    let pose = body.pose();

    let outcome = controller.step(&pose, &Uniform(Some(2.75)), &mut body, 0.1);
    assert!(matches!(outcome, CycleOutcome::Held(ref e) if e.is_inference_gap()));

    let failures = &controller.diagnostics().failures;
    assert_eq!(failures.len(), 1);
    assert!((failures[0].0.front - 2.75).abs() < EPSILON);
    assert_eq!(controller.faults(), 1);

    // Heading held, position advanced.
    assert!((body.heading - 0.0).abs() < EPSILON);
    assert!((body.x - 10.2).abs() < EPSILON);
}

#[test]
fn test_open_space_reads_unbounded() {
    let mut controller =
        SteeringController::with_diagnostics(SteeringConfig::default(), Recorder::default())
            .unwrap();
    let mut body = body_at_origin();
    let pose = body.pose();

    let outcome = controller.step(&pose, &Uniform(None), &mut body, 0.1);
    match outcome {
        CycleOutcome::Steered { requested, applied } => {
            assert!(requested.abs() < 1e-6);
            assert!(applied.abs() < 1e-6);
        }
        CycleOutcome::Held(err) => panic!("unexpected fault: {err}"),
    }
    let readings = controller.last_readings().unwrap();
    assert_eq!(readings.left, UNBOUNDED_DISTANCE);
    assert_eq!(readings.front, UNBOUNDED_DISTANCE);
    assert_eq!(readings.right, UNBOUNDED_DISTANCE);
    assert!(controller.diagnostics().failures.is_empty());
}

#[test]
fn test_rate_limit_scales_with_elapsed() {
    let config = SteeringConfig {
        max_angular_rate: 10.0,
        ..SteeringConfig::default()
    };
    let mut controller = SteeringController::new(config).unwrap();
    // Obstacle dead ahead, open on both sides: turn left at -25.
    let field = ObstacleField::with_obstacles(200.0, 200.0, vec![Obstacle::new(12.0, 100.0, 1.0)])
        .without_walls();
    let mut body = RoverBody {
        x: 10.5,
        y: 100.0,
        heading: 0.0,
        speed: 0.0,
    };

    let pose = body.pose();
    let outcome = controller.step(&pose, &field, &mut body, 0.5);
    let (requested, applied) = match outcome {
        CycleOutcome::Steered { requested, applied } => (requested, applied),
        CycleOutcome::Held(err) => panic!("unexpected fault: {err}"),
    };
    assert!((requested + 25.0).abs() < 1e-6, "requested {requested}");
    assert!((applied + 5.0).abs() < EPSILON, "applied {applied}");
    assert!((body.heading - 355.0).abs() < EPSILON);
}

#[test]
fn test_zero_resolution_rejected() {
    let config = SteeringConfig {
        resolution: 0,
        ..SteeringConfig::default()
    };
    assert!(matches!(
        SteeringController::new(config),
        Err(FuzzyError::InvalidResolution)
    ));
}

#[test]
fn test_invalid_rate_or_speed_rejected() {
    for (rate, speed) in [(-180.0, 2.0), (f64::NAN, 2.0), (f64::INFINITY, 2.0), (180.0, -1.0)] {
        let config = SteeringConfig {
            max_angular_rate: rate,
            forward_speed: speed,
            ..SteeringConfig::default()
        };
        assert!(
            matches!(
                SteeringController::new(config),
                Err(FuzzyError::InvalidConfig { .. })
            ),
            "rate {rate}, speed {speed}"
        );
    }

    let err = SteeringConfig {
        max_angular_rate: -180.0,
        ..SteeringConfig::default()
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, FuzzyError::InvalidConfig { ref setting, .. } if setting == "max_angular_rate"));

    // Zero is a valid rate: the rover just never turns.
    let config = SteeringConfig {
        max_angular_rate: 0.0,
        ..SteeringConfig::default()
    };
    let mut controller = SteeringController::new(config).unwrap();
    let mut body = body_at_origin();
    let pose = body.pose();
    let outcome = controller.step(&pose, &Uniform(Some(1.0)), &mut body, 0.05);
    assert!(matches!(outcome, CycleOutcome::Steered { applied, .. } if applied == 0.0));
}

#[test]
fn test_body_turns_and_moves() {
    let mut body = body_at_origin();
    body.apply_heading_delta(90.0, 0.1);
    assert!((body.heading - 90.0).abs() < EPSILON);
    body.apply_forward_velocity(2.0, 0.5);
    // Heading 90 points down (+y).
    assert!((body.x - 10.0).abs() < EPSILON);
    assert!((body.y - 11.0).abs() < EPSILON);

    body.apply_heading_delta(-180.0, 0.1);
    assert!((body.heading - 270.0).abs() < EPSILON);
}

#[test]
fn test_heading_stays_below_full_turn() {
    let mut body = body_at_origin();
    body.apply_heading_delta(-1e-20, 0.05);
    assert!(body.heading < 360.0, "heading {}", body.heading);
    assert_eq!(body.heading, 0.0);

    body.apply_heading_delta(360.0, 0.05);
    assert_eq!(body.heading, 0.0);
}

#[test]
fn test_side_directions() {
    let pose = Pose {
        x: 0.0,
        y: 0.0,
        heading: 0.0,
    };
    let (lx, ly) = pose.direction(-90.0);
    let (rx, ry) = pose.direction(90.0);
    assert!(lx.abs() < EPSILON && (ly + 1.0).abs() < EPSILON);
    assert!(rx.abs() < EPSILON && (ry - 1.0).abs() < EPSILON);
}
