//! # medcast-validate
//!
//! Boundary validation for medcast query requests.
//!
//! This crate provides [`engine::RequestValidator`], which turns an untrusted
//! JSON request into a [`ForecastQuery`](medcast_contracts::query::ForecastQuery)
//! or reports every reason it cannot:
//!
//! 1. **Structural**: JSON Schema validation via the `jsonschema` crate.
//! 2. **Custom**: host-registered rules such as
//!    [`engine::known_medication_rule`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medcast_validate::engine::RequestValidator;
//!
//! let validator = RequestValidator::new();
//! let query = validator.parse(&serde_json::from_str(&body)?)?;
//! ```

pub mod engine;

pub use engine::{
    known_medication_rule, request_schema, CustomRuleFn, RequestValidator, ValidationFailure,
    ValidationReport,
};
