//! # iq-schema
//!
//! Schema enforcement for IntelliQuery.
//!
//! This crate provides:
//! - [`check`] / [`validate_candidate`]: the ordered, category-by-category
//!   intent shape contract applied to every model draft
//! - [`enforce`]: the same contract, returning a typed
//!   [`IntentCandidate`](iq_core::intent::IntentCandidate) or the violations
//! - [`SchemaRegistry`]: JSON Schemas of the pipeline's public types, for
//!   export and for validating externally produced documents

mod error;
mod registry;
mod validator;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
pub use validator::{
    REQUIRED_KEYS, SchemaReport, Violation, ViolationCategory, check, enforce, validate_candidate,
};
