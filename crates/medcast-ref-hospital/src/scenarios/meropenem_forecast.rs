//! Scenario 1: Meropenem 7-day forecast
//!
//! The dashboard's opening view. Meropenem 1g, 7-day horizon, 3-day moving
//! average, mean comorbidity, predicted score at the neutral baseline of 5.
//!
//! Walk-through:
//!   1. Events for "Meropenem 1g" are filtered and summed per date
//!   2. The 3-day trailing average is attached where defined
//!   3. Seven samples are drawn from [mean, max] of the daily totals
//!   4. Predicted score 5 ⇒ scale factor 1.0, samples pass through unchanged
//!   5. The summary names the medication, the horizon, and the roster mean

use medcast_contracts::{
    chart::Dashboard,
    error::{MedcastError, MedcastResult},
    query::ForecastQuery,
};

use crate::{scenarios::print_series, session::Session};

pub const SCENARIO: &str = "meropenem_forecast";
pub const MEDICATION: &str = "Meropenem 1g";

pub fn query() -> MedcastResult<ForecastQuery> {
    ForecastQuery::from_raw(MEDICATION, 7, 3, "mean", 5.0)
}

/// Compute the scenario's dashboard.
pub fn evaluate(session: &Session) -> MedcastResult<Dashboard> {
    session.compute(&query()?)
}

/// Check the properties this scenario demonstrates.
///
/// Returns a description of the first violated property, if any.
pub fn check(dashboard: &Dashboard) -> Option<String> {
    if !dashboard.summary.contains(MEDICATION) {
        return Some(format!("summary does not name {MEDICATION}"));
    }
    if !dashboard.summary.contains("next 7 days") {
        return Some("summary does not state the 7-day horizon".to_string());
    }
    if !(0.0..=9.0).contains(&dashboard.stats.comorbidity_value) {
        return Some(format!(
            "comorbidity mean {:.2} outside [0, 9]",
            dashboard.stats.comorbidity_value
        ));
    }
    if dashboard.has_data() && dashboard.forecast.len() != 7 {
        return Some(format!("expected 7 forecast points, got {}", dashboard.forecast.len()));
    }
    None
}

pub fn run_scenario(session: &Session) -> MedcastResult<()> {
    println!("=== Scenario 1: Meropenem 7-day forecast ===");
    println!();
    println!("  Medication:            {MEDICATION}");
    println!("  Forecast horizon:      7 days");
    println!("  Moving average:        3 days");
    println!("  Comorbidity metric:    mean");
    println!("  Predicted comorbidity: 5.0 (scale factor 1.0)");
    println!();

    let dashboard = evaluate(session)?;
    print_series(&dashboard);
    println!();
    println!("  Summary: {}", dashboard.summary);

    if let Some(problem) = check(&dashboard) {
        return Err(MedcastError::ScenarioCheck {
            scenario: SCENARIO.to_string(),
            reason: problem,
        });
    }
    println!("  Checks:  PASS");
    println!();
    Ok(())
}
