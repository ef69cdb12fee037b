//! # iq-catalog
//!
//! Read-only accessors for the workspace catalog and the similarity index.
//!
//! - [`WorkspaceCatalog`]: known workspaces in insertion order
//! - [`SimilarityIndex`]: brute-force cosine top-k over workspace vectors
//! - [`CatalogSnapshot`] / [`CatalogStore`]: catalog and index frozen together,
//!   swapped atomically on reload
//! - [`sample_catalog`]: built-in workspaces used when no source is configured
//!
//! Both sources are JSONL files read with `serde-jsonlines`.

mod catalog;
pub mod error;
mod index;
mod sample;
mod store;

pub use catalog::WorkspaceCatalog;
pub use error::CatalogError;
pub use index::{IndexRow, SearchOptions, SimilarityIndex, cosine_similarity};
pub use sample::{sample_catalog, sample_entries};
pub use store::{CatalogSnapshot, CatalogStore};
