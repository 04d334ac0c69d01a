#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, Level};

use fuzzy_rover::simulation::{
    agent::Rover,
    controller::{CycleOutcome, SteeringConfig},
    environment::ObstacleField,
    params::{
        CENTROID_RESOLUTION, FIELD_HEIGHT, FIELD_WIDTH, FORWARD_SPEED, MAX_ANGULAR_RATE,
        OBSTACLE_COUNT, TICK_MILLIS,
    },
};
use fuzzy_rover::ui::{
    charts::{build_panels, ChartPanel},
    field::{compute_field_grid, world_to_grid_coords},
    render::{draw_ui, field_area, hud_line},
};

/// Fuzzy-logic rover weaving through an obstacle field
#[derive(Parser, Debug)]
#[command(name = "fuzzy_rover")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging verbosity: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file while the viewer owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run this many ticks without the viewer, logging to stderr
    #[arg(long)]
    headless: Option<u64>,

    /// Milliseconds per tick
    #[arg(long, default_value_t = TICK_MILLIS)]
    tick_ms: u64,

    /// Number of obstacles
    #[arg(long, default_value_t = OBSTACLE_COUNT)]
    obstacles: usize,

    /// Forward speed in units per second
    #[arg(long, default_value_t = FORWARD_SPEED)]
    speed: f64,

    /// Maximum rotation rate in degrees per second
    #[arg(long, default_value_t = MAX_ANGULAR_RATE)]
    max_turn_rate: f64,

    /// Centroid sample intervals
    #[arg(long, default_value_t = CENTROID_RESOLUTION)]
    resolution: usize,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = parse_level(&cli.log_level);
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = if cli.headless.is_some() {
        builder.with_writer(io::stderr).try_init()
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        builder.with_writer(io::sink).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!(e))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = SteeringConfig {
        max_angular_rate: cli.max_turn_rate,
        forward_speed: cli.speed,
        resolution: cli.resolution,
    };

    // App State
    let field = ObstacleField::random(FIELD_WIDTH, FIELD_HEIGHT, cli.obstacles);
    let mut rover = Rover::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, config)
        .context("failed to build steering model")?;
    let tick_rate = Duration::from_millis(cli.tick_ms.max(1));

    info!(
        obstacles = field.obstacles.len(),
        speed = config.forward_speed,
        "fuzzy_rover v{}",
        env!("CARGO_PKG_VERSION")
    );

    if let Some(ticks) = cli.headless {
        run_headless(&field, &mut rover, tick_rate, ticks);
        return Ok(());
    }

    let panels = build_panels(rover.controller.charts());

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &field, &mut rover, &panels, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    info!(
        ticks = rover.tick_count,
        faults = rover.controller.faults(),
        collisions = rover.collisions,
        "viewer closed"
    );
    Ok(())
}

fn run_headless(field: &ObstacleField, rover: &mut Rover, tick_rate: Duration, ticks: u64) {
    let elapsed = tick_rate.as_secs_f64();
    let mut steered = 0_u64;
    for _ in 0..ticks {
        if matches!(rover.update(field, elapsed), CycleOutcome::Steered { .. }) {
            steered += 1;
        }
    }
    info!(
        ticks,
        steered,
        faults = rover.controller.faults(),
        collisions = rover.collisions,
        x = rover.body.x,
        y = rover.body.y,
        "headless run finished"
    );
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    field: &ObstacleField,
    rover: &mut Rover,
    panels: &[ChartPanel],
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            let elapsed = last_tick.elapsed().as_secs_f64();
            rover.update(field, elapsed);
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = field_area(f.area());
            let rows = area.height as usize;
            let cols = area.width as usize;

            let mut grid = compute_field_grid(field, rows, cols);

            // Overlay Rover
            if rows > 0 && cols > 0 {
                let (r, c) = world_to_grid_coords(
                    rover.body.x,
                    rover.body.y,
                    field.width,
                    field.height,
                    rows,
                    cols,
                );
                if let Some(line) = grid.get_mut(r) {
                    if c < line.len() {
                        line.replace_range(c..=c, "O");
                    }
                }
            }

            draw_ui(f, grid, &hud_line(rover), panels);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
