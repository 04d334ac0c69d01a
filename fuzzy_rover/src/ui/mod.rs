pub mod charts;
pub mod field;
pub mod render;

pub use charts::{ChartPanel, ChartSeries};
