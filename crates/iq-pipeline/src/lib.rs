//! # iq-pipeline
//!
//! End-to-end query processing for IntelliQuery.
//!
//! - [`IntentOrchestrator`]: embedding, top-k retrieval, model draft,
//!   normalization and schema enforcement
//! - [`Pipeline`]: the validation gate in front of the orchestrator, plus
//!   status reporting and catalog reload
//! - [`PipelineBuilder`]: explicit construction, directly or from
//!   [`iq_config::IqConfig`]
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use iq_core::query::Query;
//! use iq_pipeline::PipelineBuilder;
//!
//! let config = iq_config::IqConfig::load()?;
//! let pipeline = PipelineBuilder::from_config(&config).build().await;
//! let result = pipeline.process(&Query::parse("Show me sales in Mumbai for last month")?).await?;
//! println!("{:?}", result.intent);
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod error;
mod normalize;
mod orchestrator;
mod pipeline;

use std::time::Duration;

pub use builder::PipelineBuilder;
pub use error::{PipelineError, Service, ServiceFailure};
pub use normalize::{NormalizedDraft, normalize_draft};
pub use orchestrator::{DEFAULT_TOP_K, Extraction, ExtractionDetails, IntentOrchestrator};
pub use pipeline::{CatalogSources, Pipeline};

pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
