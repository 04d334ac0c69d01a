//! Membership chart data for the viewer.
//!
//! Built once from the controller's chart snapshot; the render loop only
//! borrows the sampled points.

use crate::fuzzy::GroupChart;

/// Points sampled per label curve.
pub const CHART_SAMPLES: usize = 160;

/// One label's sampled curve.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one group's chart.
#[derive(Debug, Clone)]
pub struct ChartPanel {
    pub title: String,
    pub x_bounds: [f64; 2],
    pub series: Vec<ChartSeries>,
}

impl ChartPanel {
    /// Samples every label of `chart` across its chart window.
    #[must_use]
    pub fn from_chart(chart: &GroupChart, samples: usize) -> Self {
        let (lo, hi) = chart.bounds;
        let series = chart
            .charts
            .iter()
            .map(|set| ChartSeries {
                label: set.name.clone(),
                points: set.sample(lo, hi, samples),
            })
            .collect();
        Self {
            title: chart.name.clone(),
            x_bounds: [lo, hi],
            series,
        }
    }
}

/// Panels for all groups, in snapshot order.
#[must_use]
pub fn build_panels(charts: &[GroupChart]) -> Vec<ChartPanel> {
    charts
        .iter()
        .map(|chart| ChartPanel::from_chart(chart, CHART_SAMPLES))
        .collect()
}
