use crate::simulation::environment::ObstacleField;
use rayon::prelude::*;

pub const FREE: char = ' ';
pub const OBSTACLE: char = '#';

/// Rasterises the field into `rows` strings of `cols` characters.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_field_grid(field: &ObstacleField, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let scale_y = field.height / rows as f64;
    let scale_x = field.width / cols as f64;

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            // Sample cell centres
            let world_y = (r as f64 + 0.5) * scale_y;
            (0..cols)
                .map(|c| {
                    let world_x = (c as f64 + 0.5) * scale_x;
                    if field.is_blocked(world_x, world_y) {
                        OBSTACLE
                    } else {
                        FREE
                    }
                })
                .collect::<String>()
        })
        .collect()
}

/// Maps a world position to `(row, col)`, clamped to the grid.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn world_to_grid_coords(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    rows: usize,
    cols: usize,
) -> (usize, usize) {
    if rows == 0 || cols == 0 {
        return (0, 0);
    }
    let r = ((y / height) * rows as f64).floor().max(0.0) as usize;
    let c = ((x / width) * cols as f64).floor().max(0.0) as usize;
    (r.min(rows - 1), c.min(cols - 1))
}
