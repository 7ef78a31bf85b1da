//! Uniform random forecaster backed by `rand`.

use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use medcast_contracts::error::{MedcastError, MedcastResult};

use crate::traits::Forecaster;

/// Draws samples uniformly from `[low, high)` with a `StdRng`.
///
/// The generator sits behind a `Mutex` so `draw(&self, ..)` can advance it
/// while the forecaster is shared.
pub struct UniformForecaster {
    rng: Mutex<StdRng>,
}

impl UniformForecaster {
    /// Seed from operating-system entropy. Forecasts differ on every run.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed deterministically; two forecasters with the same seed produce the
    /// same sample sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Forecaster for UniformForecaster {
    fn draw(&self, low: f64, high: f64, count: usize) -> MedcastResult<Vec<f64>> {
        if !low.is_finite() || !high.is_finite() {
            return Err(MedcastError::Forecast {
                reason: format!("sampling interval [{low}, {high}] is not finite"),
            });
        }

        if high <= low {
            debug!(low, high, count, "degenerate sampling interval; samples are constant");
            return Ok(vec![low; count]);
        }

        let mut rng = self.rng.lock().map_err(|_| MedcastError::Forecast {
            reason: "forecaster random source lock poisoned".to_string(),
        })?;
        Ok((0..count).map(|_| rng.gen_range(low..high)).collect())
    }
}
