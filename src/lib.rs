//! Wildfire reporting data pipeline.
//!
//! Loads per-county property assessments, an aggregate fire statistics table
//! and per-incident fire records; builds a county exposure index; enriches
//! every incident with its average exposure and structural-loss metrics; and
//! filters the enriched incidents by year and county for the report tables.

pub mod config;
pub mod enrich;
pub mod error;
pub mod exposure;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod reports;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::PipelineError;
pub use exposure::CountyExposureIndex;
pub use filter::FilterSelection;
pub use pipeline::{Dataset, LoadReport};
pub use types::{AssessmentRecord, FireIncident, RawIncident};
