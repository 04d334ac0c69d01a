use crate::simulation::controller::DistanceSensor;
use crate::simulation::params::{
    OBSTACLE_COUNT, OBSTACLE_MARGIN, OBSTACLE_RADIUS_MAX, OBSTACLE_RADIUS_MIN, SPAWN_CLEARANCE,
};
use rand::Rng;

/// A circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Obstacle {
    #[must_use]
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Creates a random obstacle within the given bounds.
    fn random(width: f64, height: f64) -> Self {
        let mut rng = rand::rng();
        Self {
            x: rng.random_range(OBSTACLE_MARGIN..width - OBSTACLE_MARGIN),
            y: rng.random_range(OBSTACLE_MARGIN..height - OBSTACLE_MARGIN),
            radius: rng.random_range(OBSTACLE_RADIUS_MIN..OBSTACLE_RADIUS_MAX),
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (x - self.x).powi(2) + (y - self.y).powi(2) <= self.radius.powi(2)
    }

    /// Distance along a unit-length ray to the circle, 0.0 from inside.
    fn ray_distance(&self, origin: (f64, f64), dir: (f64, f64)) -> Option<f64> {
        let oc = (origin.0 - self.x, origin.1 - self.y);
        let b = oc.0 * dir.0 + oc.1 * dir.1;
        let c = oc.0.powi(2) + oc.1.powi(2) - self.radius.powi(2);
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

/// Represents the simulation environment: a rectangle, optionally walled,
/// scattered with circular obstacles.
///
/// Coordinates grow right (x) and down (y), matching terminal rows.
pub struct ObstacleField {
    pub width: f64,
    pub height: f64,
    pub walls: bool,
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// Creates a walled field with random obstacles, keeping the centre clear
    /// for the rover.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::random(width, height, OBSTACLE_COUNT)
    }

    /// Like [`ObstacleField::new`] with an explicit obstacle count.
    ///
    /// A field too small to leave room inside the margins gets no obstacles.
    #[must_use]
    pub fn random(width: f64, height: f64, count: usize) -> Self {
        let roomy = |side: f64| side.is_finite() && side > 2.0 * OBSTACLE_MARGIN;
        if !(roomy(width) && roomy(height)) {
            return Self::with_obstacles(width, height, Vec::new());
        }
        let (cx, cy) = (width / 2.0, height / 2.0);
        let mut obstacles = Vec::with_capacity(count);
        let mut attempts = 0;
        while obstacles.len() < count && attempts < count * 100 {
            attempts += 1;
            let o = Obstacle::random(width, height);
            let clearance = o.radius + SPAWN_CLEARANCE;
            if (o.x - cx).powi(2) + (o.y - cy).powi(2) > clearance.powi(2) {
                obstacles.push(o);
            }
        }
        Self::with_obstacles(width, height, obstacles)
    }

    /// Walled field with the given obstacles.
    #[must_use]
    pub const fn with_obstacles(width: f64, height: f64, obstacles: Vec<Obstacle>) -> Self {
        Self {
            width,
            height,
            walls: true,
            obstacles,
        }
    }

    /// Removes the boundary walls so rays may escape.
    #[must_use]
    pub const fn without_walls(mut self) -> Self {
        self.walls = false;
        self
    }

    /// True if `(x, y)` lies inside an obstacle or outside a walled field.
    #[must_use]
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        if self.walls && (x < 0.0 || x > self.width || y < 0.0 || y > self.height) {
            return true;
        }
        self.obstacles.iter().any(|o| o.contains(x, y))
    }

    /// Distance from `origin` to the nearest obstacle or wall along
    /// `direction`, or `None` if the ray hits nothing.
    #[must_use]
    pub fn raycast(&self, origin: (f64, f64), direction: (f64, f64)) -> Option<f64> {
        let len = direction.0.hypot(direction.1);
        if len <= f64::EPSILON {
            return None;
        }
        let dir = (direction.0 / len, direction.1 / len);

        let obstacle_hit = self
            .obstacles
            .iter()
            .filter_map(|o| o.ray_distance(origin, dir))
            .fold(None, |best: Option<f64>, t| Some(best.map_or(t, |b| b.min(t))));

        let wall_hit = if self.walls { self.wall_distance(origin, dir) } else { None };

        match (obstacle_hit, wall_hit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn wall_distance(&self, origin: (f64, f64), dir: (f64, f64)) -> Option<f64> {
        let axis = |pos: f64, d: f64, limit: f64| -> Option<f64> {
            if d > 0.0 {
                Some(((limit - pos) / d).max(0.0))
            } else if d < 0.0 {
                Some((-pos / d).max(0.0))
            } else {
                None
            }
        };
        match (axis(origin.0, dir.0, self.width), axis(origin.1, dir.1, self.height)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl DistanceSensor for ObstacleField {
    fn measure_distance(&self, origin: (f64, f64), direction: (f64, f64)) -> Option<f64> {
        self.raycast(origin, direction)
    }
}
