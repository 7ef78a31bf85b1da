//! # medcast-ref-hospital
//!
//! Reference hospital runtime for the medcast dashboard.
//!
//! - `generator`: synthetic patients and medication events
//! - `session`: one configuration, one dataset, and one pipeline per process
//! - `scenarios`: runnable walk-throughs of the dashboard
//!
//! 1. **Meropenem forecast**: the dashboard's opening view.
//! 2. **Unknown medication**: an empty chart and a "no data" summary, not an
//!    error.
//! 3. **Comorbidity sweep**: one seed, predicted scores 0, 5 and 10, showing
//!    the forecast scale linearly.
//!
//! All data is generated and fictional.

pub mod generator;
pub mod scenarios;
pub mod session;

pub use generator::generate_dataset;
pub use session::{pipeline_for, Session};
