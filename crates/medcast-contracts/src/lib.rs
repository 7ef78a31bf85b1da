//! # medcast-contracts
//!
//! Shared types, query contracts, and chart payloads for medcast.
//!
//! All crates in the workspace import from here. No computation lives in
//! this crate, only data definitions, boundary validation of query values,
//! and error types.

pub mod chart;
pub mod dataset;
pub mod error;
pub mod query;

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use chart::{ChartPayload, LineStyle, Series, SeriesPoint};
    use dataset::{Dataset, MedicationCatalog, MedicationEntry, MedicationEvent, Patient};
    use error::MedcastError;
    use query::{
        ComorbidityStat, ForecastHorizon, ForecastQuery, MovingAverageWindow,
        PredictedComorbidity, QueryId,
    };

    fn catalog() -> MedicationCatalog {
        MedicationCatalog::new(vec![
            MedicationEntry { name: "Meropenem 1g".to_string(), dose: 1.0 },
            MedicationEntry { name: "Omeprazole 20 mg".to_string(), dose: 20.0 },
        ])
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn event(patient: &str, d: u32, medication: &str, dose: f64) -> MedicationEvent {
        MedicationEvent {
            patient_id: patient.to_string(),
            date: day(d),
            time_of_day: "08:30".to_string(),
            medication_name: medication.to_string(),
            dose,
        }
    }

    // ── MedicationCatalog ────────────────────────────────────────────────────

    #[test]
    fn catalog_lookup_is_case_sensitive() {
        let c = catalog();
        assert_eq!(c.dose_for("Meropenem 1g"), Some(1.0));
        assert_eq!(c.dose_for("meropenem 1g"), None);
        assert!(!c.contains("Aspirin 100mg"));
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["Meropenem 1g", "Omeprazole 20 mg"]);
    }

    #[test]
    fn catalog_rejects_duplicate_names() {
        let err = MedicationCatalog::new(vec![
            MedicationEntry { name: "Meropenem 1g".to_string(), dose: 1.0 },
            MedicationEntry { name: "Meropenem 1g".to_string(), dose: 2.0 },
        ])
        .unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn catalog_rejects_negative_and_nan_doses() {
        for dose in [-1.0, f64::NAN, f64::INFINITY] {
            let result = MedicationCatalog::new(vec![MedicationEntry {
                name: "Bad".to_string(),
                dose,
            }]);
            assert!(result.is_err(), "dose {dose} should be rejected");
        }
    }

    #[test]
    fn catalog_rejects_empty() {
        assert!(MedicationCatalog::new(vec![]).is_err());
    }

    // ── Dataset invariants ───────────────────────────────────────────────────

    #[test]
    fn dataset_accepts_consistent_fixture() {
        let patients = vec![
            Patient { id: "P0001".to_string(), comorbidity_score: 2 },
            Patient { id: "P0002".to_string(), comorbidity_score: 9 },
        ];
        let events = vec![
            event("P0001", 1, "Meropenem 1g", 1.0),
            event("P0002", 1, "Omeprazole 20 mg", 20.0),
            event("P0002", 2, "Meropenem 1g", 1.0),
        ];
        let ds = Dataset::new(catalog(), patients, events).unwrap();

        assert_eq!(ds.events_for("Meropenem 1g").count(), 2);
        assert_eq!(ds.events_for("Aspirin 100mg").count(), 0);
        assert_eq!(ds.comorbidity_scores(), vec![2.0, 9.0]);
    }

    #[test]
    fn dataset_rejects_dose_mismatch() {
        let err = Dataset::new(
            catalog(),
            vec![],
            vec![event("P0001", 1, "Meropenem 1g", 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, MedcastError::InvalidDataset { .. }));
        assert!(err.to_string().contains("does not match catalog dose"));
    }

    #[test]
    fn dataset_rejects_unknown_medication_event() {
        let err = Dataset::new(
            catalog(),
            vec![],
            vec![event("P0001", 1, "Aspirin 100mg", 100.0)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown medication"));
    }

    #[test]
    fn dataset_rejects_duplicate_patient_and_high_score() {
        let dup = vec![
            Patient { id: "P0001".to_string(), comorbidity_score: 1 },
            Patient { id: "P0001".to_string(), comorbidity_score: 1 },
        ];
        assert!(Dataset::new(catalog(), dup, vec![]).is_err());

        let high = vec![Patient { id: "P0001".to_string(), comorbidity_score: 10 }];
        assert!(Dataset::new(catalog(), high, vec![]).is_err());
    }

    // ── Query parameter domains ──────────────────────────────────────────────

    #[test]
    fn forecast_horizon_bounds() {
        assert!(ForecastHorizon::new(0).is_err());
        assert_eq!(ForecastHorizon::new(1).unwrap().days(), 1);
        assert_eq!(ForecastHorizon::new(30).unwrap().days(), 30);
        assert!(ForecastHorizon::new(31).is_err());

        let max = ForecastHorizon::new(30).unwrap();
        assert_eq!(max.increment(), max);
        let min = ForecastHorizon::new(1).unwrap();
        assert_eq!(min.decrement(), min);
    }

    #[test]
    fn moving_average_window_accepts_only_offered_periods() {
        for days in [3u32, 7, 14, 30] {
            let w = MovingAverageWindow::try_from(days).unwrap();
            assert_eq!(u32::from(w), days);
        }
        for days in [0u32, 1, 5, 31] {
            assert!(MovingAverageWindow::try_from(days).is_err());
        }
        assert_eq!(MovingAverageWindow::Thirty.next(), MovingAverageWindow::Three);
    }

    #[test]
    fn predicted_comorbidity_domain_and_scaling() {
        assert!(PredictedComorbidity::new(-0.1).is_err());
        assert!(PredictedComorbidity::new(10.1).is_err());
        assert!(PredictedComorbidity::new(f64::NAN).is_err());

        assert_eq!(PredictedComorbidity::new(5.0).unwrap().scale_factor(), 1.0);
        assert_eq!(PredictedComorbidity::new(0.0).unwrap().scale_factor(), 0.0);
        assert_eq!(PredictedComorbidity::new(10.0).unwrap().scale_factor(), 2.0);
    }

    #[test]
    fn predicted_comorbidity_stepping_clamps_and_rounds() {
        let p = PredictedComorbidity::new(5.0).unwrap();
        assert_eq!(p.stepped(3).score(), 5.3);
        assert_eq!(p.stepped(-3).score(), 4.7);
        assert_eq!(p.stepped(100).score(), 10.0);
        assert_eq!(p.stepped(-100).score(), 0.0);
    }

    #[test]
    fn comorbidity_stat_parse_and_label() {
        assert_eq!("mean".parse::<ComorbidityStat>().unwrap(), ComorbidityStat::Mean);
        assert_eq!("median".parse::<ComorbidityStat>().unwrap(), ComorbidityStat::Median);
        assert!("Mean".parse::<ComorbidityStat>().is_err());
        assert_eq!(ComorbidityStat::Median.label(), "Median");
        assert_eq!(ComorbidityStat::Mean.toggled(), ComorbidityStat::Median);
    }

    #[test]
    fn forecast_query_from_raw_reports_offending_field() {
        let err = ForecastQuery::from_raw("Meropenem 1g", 7, 5, "mean", 5.0).unwrap_err();
        match err {
            MedcastError::OutOfRangeInput { field, .. } => assert_eq!(field, "ma_window"),
            other => panic!("expected OutOfRangeInput, got {other:?}"),
        }
    }

    // ── serde ────────────────────────────────────────────────────────────────

    #[test]
    fn forecast_query_serializes_as_plain_values() {
        let q = ForecastQuery::from_raw("Meropenem 1g", 7, 3, "median", 6.5).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "medication": "Meropenem 1g",
                "forecast_days": 7,
                "ma_window": 3,
                "comorbidity_stat": "median",
                "predicted_comorbidity": 6.5
            })
        );
        let back: ForecastQuery = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn forecast_query_deserialize_rejects_out_of_domain() {
        let json = serde_json::json!({
            "medication": "Meropenem 1g",
            "forecast_days": 45,
            "ma_window": 3,
            "comorbidity_stat": "mean",
            "predicted_comorbidity": 5.0
        });
        assert!(serde_json::from_value::<ForecastQuery>(json).is_err());
    }

    #[test]
    fn dataset_round_trips_through_json() {
        let ds = Dataset::new(
            catalog(),
            vec![Patient { id: "P0001".to_string(), comorbidity_score: 4 }],
            vec![event("P0001", 2, "Meropenem 1g", 1.0)],
        )
        .unwrap();

        let back: Dataset = serde_json::from_value(serde_json::to_value(&ds).unwrap()).unwrap();
        assert_eq!(back.catalog(), ds.catalog());
        assert_eq!(back.patients(), ds.patients());
        assert_eq!(back.events(), ds.events());
    }

    #[test]
    fn catalog_deserialize_applies_constructor_checks() {
        for doc in [
            serde_json::json!({ "entries": [] }),
            serde_json::json!({ "entries": [
                { "name": "Meropenem 1g", "dose": 1.0 },
                { "name": "Meropenem 1g", "dose": 1.0 }
            ] }),
            serde_json::json!({ "entries": [{ "name": "Meropenem 1g", "dose": -7.0 }] }),
        ] {
            let err = serde_json::from_value::<MedicationCatalog>(doc.clone()).unwrap_err();
            assert!(err.to_string().contains("invalid dataset"), "{doc}: {err}");
        }
    }

    #[test]
    fn dataset_deserialize_applies_constructor_checks() {
        let valid_catalog = serde_json::json!({ "entries": [{ "name": "Meropenem 1g", "dose": 1.0 }] });
        let patient = |id: &str, score: u32| serde_json::json!({ "id": id, "comorbidity_score": score });
        let event = |medication: &str, dose: f64| {
            serde_json::json!({
                "patient_id": "P0001",
                "date": "2026-03-02",
                "time_of_day": "08:30",
                "medication_name": medication,
                "dose": dose
            })
        };

        let cases = [
            ("duplicate id", vec![patient("P0001", 1), patient("P0001", 2)], vec![]),
            ("score above 9", vec![patient("P0001", 200)], vec![]),
            ("unknown medication", vec![patient("P0001", 1)], vec![event("Aspirin 100mg", 1.0)]),
            ("dose mismatch", vec![patient("P0001", 1)], vec![event("Meropenem 1g", 2.0)]),
        ];

        for (label, patients, events) in cases {
            let doc = serde_json::json!({
                "catalog": valid_catalog,
                "patients": patients,
                "events": events
            });
            assert!(serde_json::from_value::<Dataset>(doc).is_err(), "{label} was accepted");
        }
    }

    #[test]
    fn day_counts_deserialize_from_whole_numbers_only() {
        let horizon: ForecastHorizon = serde_json::from_value(serde_json::json!(7.0)).unwrap();
        assert_eq!(horizon.days(), 7);
        let window: MovingAverageWindow = serde_json::from_value(serde_json::json!(30)).unwrap();
        assert_eq!(window, MovingAverageWindow::Thirty);

        for bad in [serde_json::json!(7.5), serde_json::json!(-3), serde_json::json!(3.25)] {
            assert!(serde_json::from_value::<ForecastHorizon>(bad.clone()).is_err(), "{bad}");
            assert!(serde_json::from_value::<MovingAverageWindow>(bad.clone()).is_err(), "{bad}");
        }
        assert_eq!(serde_json::to_value(horizon).unwrap(), serde_json::json!(7));
    }

    #[test]
    fn query_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| QueryId::new().to_string()).collect();
        assert_eq!(ids.len(), 50);
    }

    // ── ChartPayload helpers ─────────────────────────────────────────────────

    #[test]
    fn chart_bounds_span_all_series() {
        let pt = |d: u32, v: f64| SeriesPoint { date: day(d), value: v };
        let chart = ChartPayload {
            title: "t".to_string(),
            x_label: "Date".to_string(),
            y_label: "Consumption (Doses)".to_string(),
            daily: Series::new("Daily Consumption", LineStyle::Solid, vec![pt(2, 3.0), pt(4, 1.0)]),
            moving_average: Series::new("3-Day MA", LineStyle::Solid, vec![]),
            forecast: Series::new("Forecasted Consumption", LineStyle::Dashed, vec![pt(9, 7.5)]),
        };
        assert_eq!(chart.date_bounds(), Some((day(2), day(9))));
        assert_eq!(chart.max_value(), 7.5);
        assert_eq!(chart.daily.total(), 4.0);
    }

    // ── Error display ────────────────────────────────────────────────────────

    #[test]
    fn error_display_messages() {
        let err = MedcastError::out_of_range("forecast_days", "expected 1..=30, got 0");
        assert!(err.to_string().contains("forecast_days"));
        assert!(err.to_string().contains("expected 1..=30"));

        let err = MedcastError::ConfigError { reason: "missing [generator]".to_string() };
        assert!(err.to_string().contains("configuration error"));

        let err = MedcastError::Forecast { reason: "bound is NaN".to_string() };
        assert!(err.to_string().contains("forecast error"));

        let err = MedcastError::ScenarioCheck {
            scenario: "comorbidity_sweep".to_string(),
            reason: "no baseline run".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "scenario 'comorbidity_sweep' check failed: no baseline run"
        );

        let err: MedcastError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}
