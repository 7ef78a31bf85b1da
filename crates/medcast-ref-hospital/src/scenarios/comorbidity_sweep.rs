//! Scenario 3: Comorbidity sweep
//!
//! The same Meropenem query run three times with the predicted comorbidity
//! score at 0, 5, and 10. Each run uses a fresh forecaster seeded with the
//! same value, so the raw samples are identical and only the scale factor
//! `predicted / 5` differs:
//!
//!   predicted 0   ⇒ factor 0.0, every forecast point is zero
//!   predicted 5   ⇒ factor 1.0, the raw samples
//!   predicted 10  ⇒ factor 2.0, twice the raw samples

use medcast_contracts::{
    chart::Dashboard,
    error::{MedcastError, MedcastResult},
    query::{ForecastQuery, PredictedComorbidity},
};

use crate::session::{pipeline_for, Session};

pub const SCENARIO: &str = "comorbidity_sweep";
pub const MEDICATION: &str = "Meropenem 1g";
pub const SWEEP_SEED: u64 = 5150;
pub const SCORES: [f64; 3] = [0.0, 5.0, 10.0];

const TOLERANCE: f64 = 1e-9;

/// One dashboard per entry of `SCORES`, in order.
pub fn evaluate(session: &Session) -> MedcastResult<Vec<Dashboard>> {
    SCORES
        .iter()
        .map(|&score| {
            let query = ForecastQuery::from_raw(MEDICATION, 7, 3, "mean", score)?;
            pipeline_for(Some(SWEEP_SEED)).compute(session.dataset(), &query)
        })
        .collect()
}

/// Check that every run's forecast equals the baseline run's scaled by
/// `predicted / 5`.
pub fn check(runs: &[Dashboard]) -> Option<String> {
    let Some(baseline) = runs
        .iter()
        .find(|d| d.query.predicted_comorbidity.score() == PredictedComorbidity::BASELINE)
    else {
        return Some(format!(
            "no baseline run at predicted {}",
            PredictedComorbidity::BASELINE
        ));
    };

    for run in runs {
        let factor = run.query.predicted_comorbidity.scale_factor();
        if run.forecast.len() != baseline.forecast.len() {
            return Some(format!(
                "predicted {} has {} forecast points, baseline has {}",
                run.query.predicted_comorbidity.score(),
                run.forecast.len(),
                baseline.forecast.len()
            ));
        }
        for (point, raw) in run.forecast.iter().zip(&baseline.forecast) {
            let expected = raw.adjusted_dose * factor;
            if (point.adjusted_dose - expected).abs() > TOLERANCE {
                return Some(format!(
                    "predicted {} on {}: expected {expected:.4}, got {:.4}",
                    run.query.predicted_comorbidity.score(),
                    point.date,
                    point.adjusted_dose
                ));
            }
        }
    }
    None
}

pub fn run_scenario(session: &Session) -> MedcastResult<()> {
    println!("=== Scenario 3: Comorbidity sweep ===");
    println!();
    println!("  Medication:     {MEDICATION}");
    println!("  Forecast seed:  {SWEEP_SEED} (identical raw samples per run)");
    println!();

    let runs = evaluate(session)?;
    for run in &runs {
        let score = run.query.predicted_comorbidity;
        let total = run.stats.forecast_total.unwrap_or_default();
        println!(
            "  predicted {:>4.1}  factor {:.1}  total {:>8.2} doses",
            score.score(),
            score.scale_factor(),
            total
        );
    }
    println!();

    if let Some(problem) = check(&runs) {
        return Err(MedcastError::ScenarioCheck {
            scenario: SCENARIO.to_string(),
            reason: problem,
        });
    }
    println!("  Checks:         PASS (forecast scales linearly with predicted / 5)");
    println!();
    Ok(())
}
