use fuzzy_rover::fuzzy::GroupChart;
use fuzzy_rover::simulation::agent::Rover;
use fuzzy_rover::simulation::brain::{distance_group, heading_group};
use fuzzy_rover::simulation::controller::{SteeringConfig, SteeringController};
use fuzzy_rover::simulation::environment::{Obstacle, ObstacleField};
use fuzzy_rover::ui::charts::{build_panels, CHART_SAMPLES};
use fuzzy_rover::ui::field::{compute_field_grid, world_to_grid_coords, FREE, OBSTACLE};
use fuzzy_rover::ui::render::hud_line;

#[test]
fn test_field_grid_dimensions() {
    let field = ObstacleField::with_obstacles(100.0, 50.0, Vec::new());
    let grid = compute_field_grid(&field, 10, 40);
    assert_eq!(grid.len(), 10);
    for row in &grid {
        assert_eq!(row.chars().count(), 40);
        assert!(row.chars().all(|c| c == FREE));
    }
    assert!(compute_field_grid(&field, 0, 40).is_empty());
}

#[test]
fn test_field_grid_marks_obstacles() {
    let field = ObstacleField::with_obstacles(100.0, 50.0, vec![Obstacle::new(50.0, 25.0, 10.0)]);
    let grid = compute_field_grid(&field, 10, 20);
    let (r, c) = world_to_grid_coords(50.0, 25.0, 100.0, 50.0, 10, 20);
    assert_eq!(grid[r].chars().nth(c), Some(OBSTACLE));
    assert_eq!(grid[0].chars().next(), Some(FREE));
}

#[test]
fn test_world_to_grid_clamps() {
    assert_eq!(world_to_grid_coords(0.0, 0.0, 100.0, 50.0, 10, 20), (0, 0));
    assert_eq!(world_to_grid_coords(100.0, 50.0, 100.0, 50.0, 10, 20), (9, 19));
    assert_eq!(world_to_grid_coords(-5.0, 80.0, 100.0, 50.0, 10, 20), (9, 0));
    assert_eq!(world_to_grid_coords(1.0, 1.0, 100.0, 50.0, 0, 0), (0, 0));
}

#[test]
fn test_panels_from_charts() {
    let charts: Vec<GroupChart> = [distance_group().unwrap(), heading_group().unwrap()]
        .iter()
        .filter_map(GroupChart::from_group)
        .collect();
    let panels = build_panels(&charts);
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].title, "Distance");
    assert_eq!(panels[0].series.len(), 3);
    assert_eq!(panels[1].series[3].label, "Straight");
    for series in &panels[1].series {
        assert_eq!(series.points.len(), CHART_SAMPLES);
        assert!(series
            .points
            .iter()
            .all(|&(_, y)| (-1e-9..=1.0 + 1e-9).contains(&y)));
    }
    let [lo, hi] = panels[1].x_bounds;
    assert!(lo < -35.0 && hi > 35.0);
}

#[test]
fn test_hud_line_before_and_after_tick() {
    let controller = SteeringController::new(SteeringConfig::default()).unwrap();
    let mut rover = Rover::with_controller(50.0, 25.0, 0.0, controller);
    let hud = hud_line(&rover);
    assert!(hud.contains("L: -- F: -- R: --"));
    assert!(hud.contains("Turn: --"));
    assert!(hud.contains("Tick: 0"));

    let field = ObstacleField::with_obstacles(100.0, 50.0, Vec::new());
    rover.update(&field, 0.05);
    let hud = hud_line(&rover);
    assert!(hud.contains("F: 50.00"), "{hud}");
    assert!(hud.contains("Turn: "));
    assert!(hud.contains("Tick: 1"));
}
