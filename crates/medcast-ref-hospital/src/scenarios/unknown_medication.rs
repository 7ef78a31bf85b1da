//! Scenario 2: Unknown medication
//!
//! "Aspirin 100mg" is not in the catalog. The query is still valid: the
//! filter selects no events, so there is no anchor date to forecast from.
//! The dashboard comes back with three empty series and a "no data" summary
//! instead of an error.

use medcast_contracts::{
    chart::Dashboard,
    error::{MedcastError, MedcastResult},
    query::ForecastQuery,
};

use crate::session::Session;

pub const SCENARIO: &str = "unknown_medication";
pub const MEDICATION: &str = "Aspirin 100mg";

pub fn query() -> MedcastResult<ForecastQuery> {
    ForecastQuery::from_raw(MEDICATION, 7, 3, "mean", 5.0)
}

pub fn evaluate(session: &Session) -> MedcastResult<Dashboard> {
    session.compute(&query()?)
}

pub fn check(dashboard: &Dashboard) -> Option<String> {
    if dashboard.has_data() {
        return Some(format!("{MEDICATION} unexpectedly matched events"));
    }
    if let Some(series) = dashboard.chart.series().iter().find(|s| !s.is_empty()) {
        return Some(format!("series '{}' is not empty", series.name));
    }
    if !dashboard.summary.starts_with("No consumption data available") {
        return Some("summary does not report missing data".to_string());
    }
    None
}

pub fn run_scenario(session: &Session) -> MedcastResult<()> {
    println!("=== Scenario 2: Unknown medication ===");
    println!();
    println!("  Medication:   {MEDICATION} (not in catalog)");
    println!(
        "  Catalog:      {}",
        session.dataset().catalog().names().collect::<Vec<_>>().join(", ")
    );
    println!();

    let dashboard = evaluate(session)?;
    println!(
        "  Series:       {}",
        dashboard
            .chart
            .series()
            .iter()
            .map(|s| format!("{} [{}]", s.name, s.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Summary:      {}", dashboard.summary);

    if let Some(problem) = check(&dashboard) {
        return Err(MedcastError::ScenarioCheck {
            scenario: SCENARIO.to_string(),
            reason: problem,
        });
    }
    println!("  Checks:       PASS (empty chart, no error raised)");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use medcast_config::MedcastConfig;
    use medcast_contracts::dataset::{
        Dataset, MedicationCatalog, MedicationEntry, MedicationEvent, Patient,
    };

    use super::*;
    use crate::session::pipeline_for;

    fn session() -> Session {
        let mut config = MedcastConfig::builtin().unwrap();
        config.generator.seed = Some(99);
        Session::start_at(config, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).unwrap()
    }

    #[test]
    fn unknown_medication_is_empty_not_error() {
        let dashboard = evaluate(&session()).unwrap();
        assert_eq!(check(&dashboard), None);
        assert_eq!(dashboard.stats.forecast_total, None);
        assert!(dashboard.summary.contains(MEDICATION));
    }

    #[test]
    fn run_scenario_succeeds() {
        run_scenario(&session()).unwrap();
    }

    #[test]
    fn dispensed_medication_fails_with_scenario_check() {
        let catalog = MedicationCatalog::new(vec![MedicationEntry {
            name: MEDICATION.to_string(),
            dose: 100.0,
        }])
        .unwrap();
        let patients = vec![Patient {
            id: "P0001".to_string(),
            comorbidity_score: 3,
        }];
        let events = vec![MedicationEvent {
            patient_id: "P0001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            time_of_day: "07:45".to_string(),
            medication_name: MEDICATION.to_string(),
            dose: 100.0,
        }];
        let dataset = Dataset::new(catalog, patients, events).unwrap();
        let session = Session::with_dataset(
            MedcastConfig::builtin().unwrap(),
            dataset,
            pipeline_for(Some(1)),
        );

        match run_scenario(&session) {
            Err(MedcastError::ScenarioCheck { scenario, reason }) => {
                assert_eq!(scenario, SCENARIO);
                assert!(reason.contains("unexpectedly matched"), "reason: {reason}");
            }
            other => panic!("expected ScenarioCheck, got {:?}", other),
        }
    }
}
