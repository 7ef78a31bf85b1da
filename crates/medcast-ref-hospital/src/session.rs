//! The process-wide dashboard session.
//!
//! A `Session` is created once at startup: it loads the configuration,
//! generates the dataset, and wires a pipeline with the configured random
//! source. Front ends keep one session for their whole lifetime, so every
//! query within a run sees the same dataset.

use chrono::{Local, NaiveDate};
use rand::{rngs::StdRng, SeedableRng};
use tracing::debug;

use medcast_config::MedcastConfig;
use medcast_contracts::{
    chart::Dashboard,
    dataset::Dataset,
    error::MedcastResult,
    query::ForecastQuery,
};
use medcast_core::{Pipeline, UniformForecaster};

use crate::generator::generate_dataset;

/// Build a pipeline whose forecaster is seeded when `seed` is given.
pub fn pipeline_for(seed: Option<u64>) -> Pipeline {
    let forecaster = match seed {
        Some(seed) => UniformForecaster::seeded(seed),
        None => UniformForecaster::from_entropy(),
    };
    Pipeline::new(Box::new(forecaster))
}

/// Configuration, generated dataset, and pipeline for one process.
pub struct Session {
    config: MedcastConfig,
    dataset: Dataset,
    pipeline: Pipeline,
}

impl Session {
    /// Start a session whose event window ends today (local time).
    pub fn start(config: MedcastConfig) -> MedcastResult<Self> {
        Self::start_at(config, Local::now().date_naive())
    }

    /// Start a session with an explicit reference date.
    pub fn start_at(config: MedcastConfig, today: NaiveDate) -> MedcastResult<Self> {
        let seed = config.generator.seed;
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let dataset = generate_dataset(&config.generator, config.catalog()?, today, &mut rng)?;
        debug!(seeded = seed.is_some(), "session started");

        Ok(Self {
            pipeline: pipeline_for(seed),
            config,
            dataset,
        })
    }

    /// Wrap an existing dataset, e.g. a test fixture.
    pub fn with_dataset(config: MedcastConfig, dataset: Dataset, pipeline: Pipeline) -> Self {
        Self {
            config,
            dataset,
            pipeline,
        }
    }

    pub fn config(&self) -> &MedcastConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The query the dashboard opens with.
    pub fn default_query(&self) -> MedcastResult<ForecastQuery> {
        self.config.default_query()
    }

    pub fn compute(&self, query: &ForecastQuery) -> MedcastResult<Dashboard> {
        self.pipeline.compute(&self.dataset, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config(seed: u64) -> MedcastConfig {
        let mut config = MedcastConfig::builtin().unwrap();
        config.generator.seed = Some(seed);
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn seeded_sessions_are_reproducible() {
        let a = Session::start_at(seeded_config(7), today()).unwrap();
        let b = Session::start_at(seeded_config(7), today()).unwrap();

        let query = a.default_query().unwrap();
        let da = a.compute(&query).unwrap();
        let db = b.compute(&query).unwrap();

        assert_eq!(a.dataset().events(), b.dataset().events());
        assert_eq!(da.forecast, db.forecast);
        assert_eq!(da.summary, db.summary);
    }

    #[test]
    fn dataset_is_stable_across_queries() {
        let session = Session::start_at(seeded_config(11), today()).unwrap();
        let query = session.default_query().unwrap();

        let first = session.compute(&query).unwrap();
        let second = session.compute(&query).unwrap();
        assert_eq!(first.aggregates, second.aggregates);
        assert_ne!(first.forecast, second.forecast);
    }

    #[test]
    fn every_catalog_medication_has_a_consistent_chart() {
        let session = Session::start_at(seeded_config(23), today()).unwrap();
        let base = session.default_query().unwrap();

        for name in session.dataset().catalog().names() {
            let query = ForecastQuery {
                medication: name.to_string(),
                ..base.clone()
            };
            let dash = session.compute(&query).unwrap();
            let expected: f64 = session.dataset().events_for(name).map(|e| e.dose).sum();
            approx::assert_abs_diff_eq!(dash.chart.daily.total(), expected, epsilon = 1e-6);
            if dash.has_data() {
                assert_eq!(dash.forecast.len(), 7);
            }
        }
    }
}
