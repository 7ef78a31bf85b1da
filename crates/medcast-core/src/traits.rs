//! The forecasting seam.
//!
//! The pipeline is deterministic except for one step: drawing forecast
//! samples. That step goes through `Forecaster` so callers choose the random
//! source, and tests can substitute fixed or seeded implementations.

use medcast_contracts::error::MedcastResult;

/// Produces raw (unadjusted) forecast samples.
///
/// Implementations must be `Send + Sync` so one pipeline can serve several
/// front-end sessions reading the same dataset.
pub trait Forecaster: Send + Sync {
    /// Draw `count` independent samples from the interval `[low, high]`.
    ///
    /// When `high <= low` the interval is a single point and every sample
    /// equals `low`. Non-finite bounds are an error.
    fn draw(&self, low: f64, high: f64, count: usize) -> MedcastResult<Vec<f64>>;
}
