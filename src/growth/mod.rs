//! Infant growth percentiles: reference tables, single-measurement
//! evaluation and the weight/length/head composite analysis.

mod analysis;
mod evaluator;
mod reference;
mod tables;

use thiserror::Error;

pub use analysis::*;
pub use evaluator::*;
pub use reference::*;

#[derive(Error, Debug)]
pub enum GrowthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid growth reference data: {0}")]
    ReferenceData(String),

    #[error("Failed to read growth reference file {0}: {1}")]
    ReferenceDataLoad(String, String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
