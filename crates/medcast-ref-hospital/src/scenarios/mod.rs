//! Reference dashboard scenarios.
//!
//! Each scenario is a self-contained module that runs the real pipeline
//! against a session's dataset and prints what a dashboard user would see,
//! along with the property the scenario demonstrates.

pub mod comorbidity_sweep;
pub mod meropenem_forecast;
pub mod unknown_medication;

use medcast_contracts::chart::Dashboard;

/// Print the series of a dashboard as aligned `date  value` rows.
pub(crate) fn print_series(dashboard: &Dashboard) {
    for series in dashboard.chart.series() {
        println!("  {} ({} point(s))", series.name, series.len());
        for point in &series.points {
            println!("    {}  {:>10.2}", point.date, point.value);
        }
    }
}
