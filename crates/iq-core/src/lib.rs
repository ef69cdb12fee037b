//! # iq-core
//!
//! Core types and error types for IntelliQuery.
//!
//! This crate provides the foundational types shared across all IntelliQuery crates:
//! - The trimmed, non-empty [`Query`](query::Query) boundary type
//! - Intent, verdict-outcome, and error-kind enums
//! - The tagged [`ValidationVerdict`](verdict::ValidationVerdict)
//! - Catalog entries and intent candidates
//! - Pipeline result and status response types
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod intent;
pub mod query;
pub mod responses;
pub mod verdict;
pub mod workspace;
