//! Practice learning: records what a practitioner does in which anonymized
//! situation, and suggests the recurring actions back in similar situations.
//!
//! `similarity` and `matcher` are pure; `engine` persists through the
//! learning repositories.

pub mod engine;
pub mod matcher;
pub mod similarity;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;

pub use engine::*;
pub use matcher::*;
pub use similarity::*;

#[derive(Error, Debug)]
pub enum LearningError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Thresholds of the suggestion lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Patterns observed fewer times are never suggested.
    pub min_frequency: u32,
    /// How many patterns are scored per request.
    pub max_candidates: usize,
    /// Similarity must be strictly above this to suggest.
    pub similarity_threshold: f64,
    /// Confidence ceiling.
    pub max_confidence: f64,
    /// Frequency at which confidence saturates before the similarity factor.
    pub frequency_scale: f64,
    /// A rejected suggestion shown at least this often...
    pub deactivation_min_shown: u32,
    /// ...with an acceptance rate (percent) below this is deactivated.
    pub deactivation_max_rate: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            min_frequency: 3,
            max_candidates: 10,
            similarity_threshold: 0.6,
            max_confidence: 0.95,
            frequency_scale: 10.0,
            deactivation_min_shown: 5,
            deactivation_max_rate: 20.0,
        }
    }
}
