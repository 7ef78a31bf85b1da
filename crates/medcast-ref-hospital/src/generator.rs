//! Synthetic hospital data.
//!
//! Everything here is random and fictional. The generator stands in for a
//! pharmacy dispensing system: a roster of patients with comorbidity scores
//! and a log of medication administrations over the trailing window.

use chrono::{Days, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use tracing::info;

use medcast_config::GeneratorSettings;
use medcast_contracts::{
    dataset::{Dataset, MedicationCatalog, MedicationEvent, Patient, MAX_COMORBIDITY_SCORE},
    error::{MedcastError, MedcastResult},
};

/// Medical record number for the `n`th patient (1-based), e.g. "P0007".
pub fn patient_id(n: usize) -> String {
    format!("P{:04}", n)
}

/// `count` patients with ids `P0001..` and scores uniform in `0..=9`.
pub fn generate_patients(count: usize, rng: &mut impl Rng) -> Vec<Patient> {
    (1..=count)
        .map(|n| Patient {
            id: patient_id(n),
            comorbidity_score: rng.gen_range(0..=MAX_COMORBIDITY_SCORE),
        })
        .collect()
}

/// `count` events dated uniformly within `[today - window_days, today - 1]`.
///
/// Patient and medication are chosen uniformly; the dose always comes from
/// the catalog.
///
/// # Errors
///
/// `ConfigError` when events are requested for an empty roster or the window
/// reaches before the calendar's start.
pub fn generate_events(
    patients: &[Patient],
    catalog: &MedicationCatalog,
    count: usize,
    window_days: u32,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> MedcastResult<Vec<MedicationEvent>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    if patients.is_empty() {
        return Err(MedcastError::ConfigError {
            reason: format!("cannot generate {count} events for an empty patient roster"),
        });
    }
    if window_days == 0 {
        return Err(MedcastError::ConfigError {
            reason: "event window must span at least one day".to_string(),
        });
    }

    let start = today
        .checked_sub_days(Days::new(u64::from(window_days)))
        .ok_or_else(|| MedcastError::ConfigError {
            reason: format!("window of {window_days} days before {today} is out of range"),
        })?;

    let mut events = Vec::with_capacity(count);
    for _ in 0..count {
        let patient = patients.choose(rng).ok_or_else(|| MedcastError::ConfigError {
            reason: "patient roster is empty".to_string(),
        })?;
        let entry = catalog
            .entries()
            .choose(rng)
            .ok_or_else(|| MedcastError::ConfigError {
                reason: "medication catalog is empty".to_string(),
            })?;
        let offset = rng.gen_range(0..window_days);
        let date = start
            .checked_add_days(Days::new(u64::from(offset)))
            .ok_or_else(|| MedcastError::ConfigError {
                reason: format!("event date {offset} day(s) after {start} is out of range"),
            })?;
        let time_of_day = format!("{:02}:{:02}", rng.gen_range(0..24), rng.gen_range(0..60));

        events.push(MedicationEvent {
            patient_id: patient.id.clone(),
            date,
            time_of_day,
            medication_name: entry.name.clone(),
            dose: entry.dose,
        });
    }

    Ok(events)
}

/// Build the full dataset described by `settings`.
pub fn generate_dataset(
    settings: &GeneratorSettings,
    catalog: MedicationCatalog,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> MedcastResult<Dataset> {
    let patients = generate_patients(settings.patients, rng);
    let events = generate_events(
        &patients,
        &catalog,
        settings.events,
        settings.window_days,
        today,
        rng,
    )?;

    info!(
        patients = patients.len(),
        events = events.len(),
        medications = catalog.len(),
        window_days = settings.window_days,
        %today,
        "synthetic dataset generated"
    );

    Dataset::new(catalog, patients, events)
}
