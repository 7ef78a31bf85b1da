//! Patient roster, medication event log, and the read-only dataset context.
//!
//! A `Dataset` is built once (by the generator or by a test fixture) and then
//! only ever borrowed. Nothing in medcast mutates it after construction, which
//! is what makes repeated queries against the same dataset comparable.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MedcastError, MedcastResult};

/// Highest Charlson-style comorbidity score a patient can carry.
pub const MAX_COMORBIDITY_SCORE: u8 = 9;

/// One synthetic patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Medical record number, e.g. "P0042".
    pub id: String,
    /// Severity index in `0..=MAX_COMORBIDITY_SCORE`.
    pub comorbidity_score: u8,
}

/// One administration of a medication to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEvent {
    /// References a `Patient::id`. Not enforced.
    pub patient_id: String,
    pub date: NaiveDate,
    /// "HH:MM". Carried for display only; nothing aggregates on it.
    pub time_of_day: String,
    pub medication_name: String,
    /// Always equal to the catalog dose for `medication_name`.
    pub dose: f64,
}

/// A catalog row: medication name and its fixed dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub name: String,
    pub dose: f64,
}

/// The fixed, ordered set of medications the dashboard knows about.
///
/// The dose mapping is a pure function of the name: each name appears once
/// and carries exactly one dose.
///
/// Deserialization goes through `MedicationCatalog::new`, so a document
/// cannot produce a catalog the constructor would reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct MedicationCatalog {
    entries: Vec<MedicationEntry>,
}

/// Wire shape of `MedicationCatalog`, before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    entries: Vec<MedicationEntry>,
}

impl TryFrom<CatalogDocument> for MedicationCatalog {
    type Error = MedcastError;

    fn try_from(doc: CatalogDocument) -> Result<Self, Self::Error> {
        Self::new(doc.entries)
    }
}

impl MedicationCatalog {
    /// Build a catalog, rejecting duplicate or empty names and doses that are
    /// negative or not finite.
    pub fn new(entries: Vec<MedicationEntry>) -> MedcastResult<Self> {
        if entries.is_empty() {
            return Err(MedcastError::InvalidDataset {
                reason: "medication catalog is empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.name.trim().is_empty() {
                return Err(MedcastError::InvalidDataset {
                    reason: "medication name must not be empty".to_string(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(MedcastError::InvalidDataset {
                    reason: format!("medication '{}' is listed twice", entry.name),
                });
            }
            if !entry.dose.is_finite() || entry.dose < 0.0 {
                return Err(MedcastError::InvalidDataset {
                    reason: format!(
                        "medication '{}' has invalid dose {}",
                        entry.name, entry.dose
                    ),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Look up the dose for `name` (case-sensitive exact match).
    pub fn dose_for(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.dose)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dose_for(name).is_some()
    }

    pub fn entries(&self) -> &[MedicationEntry] {
        &self.entries
    }

    /// Medication names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide, read-only data every query runs against.
///
/// Like the catalog, a deserialized dataset is checked by `Dataset::new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DatasetDocument")]
pub struct Dataset {
    catalog: MedicationCatalog,
    patients: Vec<Patient>,
    events: Vec<MedicationEvent>,
}

/// Wire shape of `Dataset`, before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetDocument {
    catalog: MedicationCatalog,
    patients: Vec<Patient>,
    events: Vec<MedicationEvent>,
}

impl TryFrom<DatasetDocument> for Dataset {
    type Error = MedcastError;

    fn try_from(doc: DatasetDocument) -> Result<Self, Self::Error> {
        Self::new(doc.catalog, doc.patients, doc.events)
    }
}

impl Dataset {
    /// Assemble a dataset and check its invariants.
    ///
    /// # Errors
    ///
    /// `MedcastError::InvalidDataset` when a patient id repeats, a score is
    /// above `MAX_COMORBIDITY_SCORE`, an event names a medication missing
    /// from the catalog, or an event's dose differs from the catalog dose.
    pub fn new(
        catalog: MedicationCatalog,
        patients: Vec<Patient>,
        events: Vec<MedicationEvent>,
    ) -> MedcastResult<Self> {
        let mut ids = HashSet::new();
        for patient in &patients {
            if !ids.insert(patient.id.as_str()) {
                return Err(MedcastError::InvalidDataset {
                    reason: format!("patient id '{}' is not unique", patient.id),
                });
            }
            if patient.comorbidity_score > MAX_COMORBIDITY_SCORE {
                return Err(MedcastError::InvalidDataset {
                    reason: format!(
                        "patient '{}' has comorbidity score {} (max {})",
                        patient.id, patient.comorbidity_score, MAX_COMORBIDITY_SCORE
                    ),
                });
            }
        }

        for event in &events {
            match catalog.dose_for(&event.medication_name) {
                None => {
                    return Err(MedcastError::InvalidDataset {
                        reason: format!(
                            "event for patient '{}' names unknown medication '{}'",
                            event.patient_id, event.medication_name
                        ),
                    });
                }
                Some(dose) if dose != event.dose => {
                    return Err(MedcastError::InvalidDataset {
                        reason: format!(
                            "event dose {} for '{}' does not match catalog dose {}",
                            event.dose, event.medication_name, dose
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            catalog,
            patients,
            events,
        })
    }

    pub fn catalog(&self) -> &MedicationCatalog {
        &self.catalog
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn events(&self) -> &[MedicationEvent] {
        &self.events
    }

    /// Events whose medication name equals `medication` exactly.
    pub fn events_for<'a>(
        &'a self,
        medication: &'a str,
    ) -> impl Iterator<Item = &'a MedicationEvent> + 'a {
        self.events
            .iter()
            .filter(move |e| e.medication_name == medication)
    }

    /// Every patient's comorbidity score as `f64`, in roster order.
    pub fn comorbidity_scores(&self) -> Vec<f64> {
        self.patients
            .iter()
            .map(|p| f64::from(p.comorbidity_score))
            .collect()
    }
}
