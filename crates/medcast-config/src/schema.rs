//! Configuration schema.
//!
//! A `MedcastConfig` is deserialized from TOML. Unknown keys are rejected so a
//! misspelled setting fails loudly instead of silently falling back to a
//! default.
//!
//! Example:
//! ```toml
//! [generator]
//! patients = 50
//! events = 300
//! window_days = 30
//! seed = 42
//!
//! [defaults]
//! medication = "Meropenem 1g"
//! forecast_days = 7
//! ma_window = 3
//! comorbidity_stat = "mean"
//! predicted_comorbidity = 5.0
//!
//! [[medications]]
//! name = "Meropenem 1g"
//! dose = 1.0
//! ```

use serde::{Deserialize, Serialize};

use medcast_contracts::dataset::MedicationEntry;

/// Sizes and seed for the synthetic dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Roster size.
    #[serde(default = "default_patients")]
    pub patients: usize,

    /// Event log size.
    #[serde(default = "default_events")]
    pub events: usize,

    /// Events are dated within the trailing `window_days` days before today.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Fixed seed for the generator and forecaster. `None` draws from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            patients: default_patients(),
            events: default_events(),
            window_days: default_window_days(),
            seed: None,
        }
    }
}

fn default_patients() -> usize {
    50
}

fn default_events() -> usize {
    300
}

fn default_window_days() -> u32 {
    30
}

/// Initial control values, kept as plain values so the loader can report
/// which one is out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDefaults {
    pub medication: String,
    pub forecast_days: u32,
    pub ma_window: u32,
    pub comorbidity_stat: String,
    pub predicted_comorbidity: f64,
}

/// The top-level structure deserialized from a TOML config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedcastConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,

    pub defaults: QueryDefaults,

    /// Medication catalog, in display order.
    pub medications: Vec<MedicationEntry>,
}
