//! Loading and validating `MedcastConfig`.
//!
//! Validation runs on every load:
//!
//! 1. The medication list must form a valid `MedicationCatalog` (non-empty,
//!    unique names, finite non-negative doses).
//! 2. The generator needs at least one patient and a window of at least one
//!    day.
//! 3. `[defaults]` must convert into a valid `ForecastQuery`.
//!
//! A default medication outside the catalog is allowed (it is a valid query
//! that selects nothing) but logged, since it is almost always a typo.

use std::path::Path;

use tracing::{debug, warn};

use medcast_contracts::{
    dataset::MedicationCatalog,
    error::{MedcastError, MedcastResult},
    query::ForecastQuery,
};

use crate::schema::MedcastConfig;

/// The configuration shipped with the binaries.
pub const BUILTIN_CONFIG: &str = include_str!("../config/default.toml");

impl MedcastConfig {
    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `MedcastError::ConfigError` if the TOML is malformed, does not
    /// match the schema, or fails validation.
    pub fn from_toml_str(s: &str) -> MedcastResult<Self> {
        let config: MedcastConfig = toml::from_str(s).map_err(|e| MedcastError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            medications = config.medications.len(),
            patients = config.generator.patients,
            events = config.generator.events,
            seeded = config.generator.seed.is_some(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> MedcastResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedcastError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded default configuration.
    pub fn builtin() -> MedcastResult<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    /// Load `path` when given, otherwise the embedded default.
    pub fn load(path: Option<&Path>) -> MedcastResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::builtin(),
        }
    }

    /// Build the medication catalog from `[[medications]]`.
    pub fn catalog(&self) -> MedcastResult<MedicationCatalog> {
        MedicationCatalog::new(self.medications.clone()).map_err(|e| MedcastError::ConfigError {
            reason: format!("invalid [[medications]]: {}", e),
        })
    }

    /// The dashboard's initial query, built from `[defaults]`.
    pub fn default_query(&self) -> MedcastResult<ForecastQuery> {
        let d = &self.defaults;
        ForecastQuery::from_raw(
            d.medication.clone(),
            d.forecast_days,
            d.ma_window,
            &d.comorbidity_stat,
            d.predicted_comorbidity,
        )
        .map_err(|e| MedcastError::ConfigError {
            reason: format!("invalid [defaults]: {}", e),
        })
    }

    /// Check cross-field constraints the TOML schema cannot express.
    pub fn validate(&self) -> MedcastResult<()> {
        let catalog = self.catalog()?;

        if self.generator.patients == 0 {
            return Err(MedcastError::ConfigError {
                reason: "[generator] patients must be at least 1".to_string(),
            });
        }
        if self.generator.window_days == 0 {
            return Err(MedcastError::ConfigError {
                reason: "[generator] window_days must be at least 1".to_string(),
            });
        }

        let query = self.default_query()?;
        if !catalog.contains(&query.medication) {
            warn!(
                medication = %query.medication,
                "default medication is not in the catalog; the initial chart will be empty"
            );
        }

        Ok(())
    }
}
