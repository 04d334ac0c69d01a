use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::simulation::agent::Rover;
use crate::simulation::controller::{CycleOutcome, Diagnostics};
use crate::simulation::params::UNBOUNDED_DISTANCE;
use crate::ui::charts::ChartPanel;

const PALETTE: [Color; 7] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::White,
];

fn format_distance(d: f64) -> String {
    if d >= UNBOUNDED_DISTANCE {
        "inf".to_owned()
    } else {
        format!("{d:.2}")
    }
}

/// One-line status for the top of the screen.
#[must_use]
pub fn hud_line<D: Diagnostics>(rover: &Rover<D>) -> String {
    let readings = rover.controller.last_readings().map_or_else(
        || "L: -- F: -- R: --".to_owned(),
        |r| {
            format!(
                "L: {} F: {} R: {}",
                format_distance(r.left),
                format_distance(r.front),
                format_distance(r.right)
            )
        },
    );
    let steer = match &rover.last_outcome {
        Some(CycleOutcome::Steered { requested, .. }) => format!("Turn: {requested:+.1}"),
        Some(CycleOutcome::Held(_)) => "Turn: HOLD".to_owned(),
        None => "Turn: --".to_owned(),
    };
    format!(
        "{readings} | {steer} | Hdg: {:.0} | Faults: {} | Hits: {} | Tick: {}",
        rover.body.heading,
        rover.controller.faults(),
        rover.collisions,
        rover.tick_count
    )
}

fn draw_chart(f: &mut Frame, panel: &ChartPanel, area: Rect) {
    let datasets: Vec<Dataset> = panel
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Dataset::default()
                .name(s.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
                .data(&s.points)
        })
        .collect();

    let [lo, hi] = panel.x_bounds;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(panel.title.clone())
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .bounds(panel.x_bounds)
                .labels(vec![format!("{lo:.1}"), format!("{hi:.1}")]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.05])
                .labels(vec!["0".to_owned(), "1".to_owned()]),
        );

    f.render_widget(chart, area);
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str, panels: &[ChartPanel]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Body
        ])
        .split(f.area());

    // HUD
    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1]);

    // Field
    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| Line::from(Span::raw(s)))
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    f.render_widget(field, body[0]);

    // Membership charts
    if panels.is_empty() {
        return;
    }
    let count = u32::try_from(panels.len()).unwrap_or(u32::MAX);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, count); panels.len()])
        .split(body[1]);
    for (panel, area) in panels.iter().zip(rows.iter()) {
        draw_chart(f, panel, *area);
    }
}

/// Size of the field area inside a terminal of the given size, matching
/// the layout used by [`draw_ui`].
#[must_use]
pub fn field_area(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[1])[0]
}
