//! Boundary validator for dashboard query requests.
//!
//! `RequestValidator` checks a JSON request in two phases:
//!
//! 1. **Structural**: the request is validated against `request_schema()`
//!    using the `jsonschema` crate. This is where domain limits live
//!    (horizon 1–30, the four window lengths, mean/median, score 0–10).
//! 2. **Custom**: each registered rule runs against the raw request. Hosts
//!    use these for checks that depend on runtime data, such as restricting
//!    the medication to the loaded catalog.
//!
//! All failures are collected before returning so a caller sees every bad
//! field in one pass.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use medcast_contracts::{
    dataset::MedicationCatalog,
    error::{MedcastError, MedcastResult},
    query::{ForecastHorizon, ForecastQuery, MovingAverageWindow, PredictedComorbidity},
};

/// A caller-supplied check over the raw request.
///
/// Returns `Some(message)` when the request fails the check.
pub type CustomRuleFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// "json-schema" for structural failures, otherwise the custom rule id.
    pub rule_id: String,
    pub message: String,
}

/// The outcome of validating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True only if every check passed.
    pub passed: bool,
    pub failures: Vec<ValidationFailure>,
}

/// The JSON Schema every query request must satisfy.
pub fn request_schema() -> Value {
    let windows: Vec<u32> = MovingAverageWindow::ALL.iter().map(|w| u32::from(*w)).collect();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "medcast forecast query",
        "type": "object",
        "properties": {
            "medication": { "type": "string", "minLength": 1 },
            "forecast_days": {
                "type": "integer",
                "minimum": ForecastHorizon::MIN,
                "maximum": ForecastHorizon::MAX
            },
            "ma_window": { "enum": windows },
            "comorbidity_stat": { "enum": ["mean", "median"] },
            "predicted_comorbidity": {
                "type": "number",
                "minimum": PredictedComorbidity::MIN,
                "maximum": PredictedComorbidity::MAX
            }
        },
        "required": [
            "medication",
            "forecast_days",
            "ma_window",
            "comorbidity_stat",
            "predicted_comorbidity"
        ],
        "additionalProperties": false
    })
}

/// Rule that rejects medications missing from `catalog`.
///
/// Not installed by default: an unknown medication is a legal query that
/// renders an empty chart. Front ends that only offer catalog entries can
/// register this to catch stale or hand-edited requests.
pub fn known_medication_rule(catalog: &MedicationCatalog) -> CustomRuleFn {
    let catalog = catalog.clone();
    Box::new(move |request| {
        let name = request.get("medication").and_then(Value::as_str)?;
        if catalog.contains(name) {
            None
        } else {
            Some(format!("medication '{name}' is not in the catalog"))
        }
    })
}

/// Validates raw JSON requests and converts them into `ForecastQuery`.
pub struct RequestValidator {
    schema: Value,
    custom_rules: Vec<(String, CustomRuleFn)>,
}

impl RequestValidator {
    /// A validator with the standard request schema and no custom rules.
    pub fn new() -> Self {
        Self {
            schema: request_schema(),
            custom_rules: Vec::new(),
        }
    }

    /// Register a custom rule under `rule_id`. Rules run in registration order.
    pub fn register_rule(&mut self, rule_id: impl Into<String>, f: CustomRuleFn) {
        self.custom_rules.push((rule_id.into(), f));
    }

    /// Run every check against `request`.
    pub fn validate(&self, request: &Value) -> ValidationReport {
        let mut failures: Vec<ValidationFailure> = Vec::new();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        match jsonschema::validator_for(&self.schema) {
            Ok(validator) => {
                for error in validator.iter_errors(request) {
                    let message = format!(
                        "JSON Schema violation at {}: {}",
                        error.instance_path, error
                    );
                    warn!(%message, "request failed structural validation");
                    failures.push(ValidationFailure {
                        rule_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
            Err(e) => {
                let message = format!("invalid JSON Schema document: {e}");
                warn!(%message, "schema compilation failure");
                failures.push(ValidationFailure {
                    rule_id: "json-schema".to_string(),
                    message,
                });
            }
        }

        // ── Phase 2: custom rules ────────────────────────────────────────────
        for (rule_id, rule) in &self.custom_rules {
            debug!(rule_id = %rule_id, "evaluating custom request rule");
            if let Some(message) = rule(request) {
                warn!(rule_id = %rule_id, %message, "custom request rule failed");
                failures.push(ValidationFailure {
                    rule_id: rule_id.clone(),
                    message,
                });
            }
        }

        let passed = failures.is_empty();
        debug!(passed, failure_count = failures.len(), "request validation complete");

        ValidationReport { passed, failures }
    }

    /// Validate `request` and convert it into a typed query.
    ///
    /// # Errors
    ///
    /// `MedcastError::OutOfRangeInput` listing every failure when validation
    /// does not pass.
    pub fn parse(&self, request: &Value) -> MedcastResult<ForecastQuery> {
        let report = self.validate(request);
        if !report.passed {
            let reason = report
                .failures
                .iter()
                .map(|f| f.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(MedcastError::out_of_range("request", reason));
        }

        serde_json::from_value(request.clone())
            .map_err(|e| MedcastError::out_of_range("request", e.to_string()))
    }
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use medcast_contracts::{
        dataset::{MedicationCatalog, MedicationEntry},
        error::MedcastError,
        query::{ComorbidityStat, MovingAverageWindow},
    };

    use super::{known_medication_rule, RequestValidator};

    fn valid_request() -> serde_json::Value {
        json!({
            "medication": "Meropenem 1g",
            "forecast_days": 7,
            "ma_window": 3,
            "comorbidity_stat": "mean",
            "predicted_comorbidity": 5.0
        })
    }

    // ── Structural validation ─────────────────────────────────────────────────

    #[test]
    fn test_valid_request_passes_and_parses() {
        let validator = RequestValidator::new();
        let report = validator.validate(&valid_request());
        assert!(report.passed, "failures: {:?}", report.failures);

        let query = validator.parse(&valid_request()).unwrap();
        assert_eq!(query.medication, "Meropenem 1g");
        assert_eq!(query.forecast_days.days(), 7);
        assert_eq!(query.ma_window, MovingAverageWindow::Three);
        assert_eq!(query.comorbidity_stat, ComorbidityStat::Mean);
    }

    #[test]
    fn test_integer_predicted_score_is_accepted() {
        let mut request = valid_request();
        request["predicted_comorbidity"] = json!(10);
        let query = RequestValidator::new().parse(&request).unwrap();
        assert_eq!(query.predicted_comorbidity.score(), 10.0);
    }

    #[test]
    fn test_whole_float_day_counts_validate_and_parse_alike() {
        let validator = RequestValidator::new();
        let mut request = valid_request();
        request["forecast_days"] = json!(7.0);
        request["ma_window"] = json!(14.0);

        assert!(validator.validate(&request).passed);
        let query = validator.parse(&request).unwrap();
        assert_eq!(query.forecast_days.days(), 7);
        assert_eq!(query.ma_window, MovingAverageWindow::Fourteen);

        request["forecast_days"] = json!(7.5);
        assert!(!validator.validate(&request).passed);
        assert!(validator.parse(&request).is_err());
    }

    #[test]
    fn test_forecast_days_bounds() {
        let validator = RequestValidator::new();
        for days in [0, 31, -2] {
            let mut request = valid_request();
            request["forecast_days"] = json!(days);
            let report = validator.validate(&request);
            assert!(!report.passed, "forecast_days {days} should fail");
            assert_eq!(report.failures[0].rule_id, "json-schema");
            assert!(report.failures[0].message.contains("/forecast_days"));
        }
    }

    #[test]
    fn test_window_must_be_offered_period() {
        let mut request = valid_request();
        request["ma_window"] = json!(5);
        assert!(!RequestValidator::new().validate(&request).passed);
    }

    #[test]
    fn test_every_failure_is_reported() {
        let request = json!({
            "medication": "",
            "forecast_days": 45,
            "ma_window": 4,
            "comorbidity_stat": "mode",
            "predicted_comorbidity": 11.5
        });
        let report = RequestValidator::new().validate(&request);
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 5, "failures: {:?}", report.failures);
    }

    #[test]
    fn test_missing_and_extra_fields_fail() {
        let validator = RequestValidator::new();

        let mut missing = valid_request();
        missing.as_object_mut().unwrap().remove("comorbidity_stat");
        assert!(!validator.validate(&missing).passed);

        let mut extra = valid_request();
        extra["debug"] = json!(true);
        assert!(!validator.validate(&extra).passed);
    }

    #[test]
    fn test_parse_reports_out_of_range() {
        let mut request = valid_request();
        request["predicted_comorbidity"] = json!(-1.0);

        match RequestValidator::new().parse(&request) {
            Err(MedcastError::OutOfRangeInput { field, reason }) => {
                assert_eq!(field, "request");
                assert!(reason.contains("/predicted_comorbidity"), "reason: {reason}");
            }
            other => panic!("expected OutOfRangeInput, got {:?}", other),
        }
    }

    /// Unknown medications are legal queries by default.
    #[test]
    fn test_unknown_medication_passes_without_catalog_rule() {
        let mut request = valid_request();
        request["medication"] = json!("Aspirin 100mg");
        assert!(RequestValidator::new().parse(&request).is_ok());
    }

    // ── Custom rules ──────────────────────────────────────────────────────────

    #[test]
    fn test_known_medication_rule() {
        let catalog = MedicationCatalog::new(vec![MedicationEntry {
            name: "Meropenem 1g".to_string(),
            dose: 1.0,
        }])
        .unwrap();

        let mut validator = RequestValidator::new();
        validator.register_rule("known-medication", known_medication_rule(&catalog));

        assert!(validator.validate(&valid_request()).passed);

        let mut request = valid_request();
        request["medication"] = json!("Aspirin 100mg");
        let report = validator.validate(&request);
        assert!(!report.passed);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, "known-medication");
        assert!(report.failures[0].message.contains("Aspirin 100mg"));
    }

    #[test]
    fn test_custom_rules_run_alongside_schema_failures() {
        let mut validator = RequestValidator::new();
        validator.register_rule(
            "horizon-policy",
            Box::new(|request| {
                (request["forecast_days"] == json!(45)).then(|| "horizon too long".to_string())
            }),
        );

        let mut request = valid_request();
        request["forecast_days"] = json!(45);
        let report = validator.validate(&request);
        let ids: Vec<&str> = report.failures.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["json-schema", "horizon-policy"]);
    }
}
