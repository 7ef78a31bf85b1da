//! # medcast-core
//!
//! The query/transform pipeline behind the medcast dashboard.
//!
//! This crate provides:
//! - The `Forecaster` trait, the only source of randomness in a query
//! - `UniformForecaster`, a seedable `rand`-backed implementation
//! - The `Pipeline` that turns a `Dataset` and a `ForecastQuery` into a
//!   `Dashboard` (chart payload + summary text)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medcast_core::{Pipeline, UniformForecaster};
//!
//! let pipeline = Pipeline::new(Box::new(UniformForecaster::seeded(7)));
//! let dashboard = pipeline.compute(&dataset, &query)?;
//! println!("{}", dashboard.summary);
//! ```

pub mod forecast;
pub mod pipeline;
pub mod stats;
pub mod traits;

pub use forecast::UniformForecaster;
pub use pipeline::Pipeline;
