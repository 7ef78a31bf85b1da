//! # medcast-config
//!
//! TOML configuration for medcast.
//!
//! ## Overview
//!
//! [`MedcastConfig`] describes the synthetic dataset (roster size, event
//! count, date window, optional seed), the medication catalog, and the
//! control values the dashboard starts with. A default document is embedded
//! in the crate; binaries accept `--config FILE` to replace it.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medcast_config::MedcastConfig;
//!
//! let config = MedcastConfig::load(None)?;          // embedded default
//! let catalog = config.catalog()?;
//! let query = config.default_query()?;
//! ```

pub mod loader;
pub mod schema;

pub use loader::BUILTIN_CONFIG;
pub use schema::{GeneratorSettings, MedcastConfig, QueryDefaults};

// ── Tests ─────────────────────────────────────────────────────────────────────
