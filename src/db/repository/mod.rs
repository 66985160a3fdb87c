//! Repository layer for the practice learning store.
//!
//! Each table has its own sub-module; all public functions are re-exported here.

mod learning_event;
mod pattern;
mod suggestion;

use chrono::{NaiveDateTime, SubsecRound};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::DatabaseError;

pub use learning_event::*;
pub use pattern::*;
pub use suggestion::*;

/// Timestamp columns hold whole seconds, written and read through rusqlite's
/// chrono support as `YYYY-MM-DD HH:MM:SS` (sortable as text).
pub(crate) fn storage_time(ts: &NaiveDateTime) -> NaiveDateTime {
    ts.trunc_subsecs(0)
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    column: &'static str,
    s: &str,
) -> Result<T, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::MalformedJson {
        column,
        reason: e.to_string(),
    })
}

pub(crate) fn to_json<T: serde::Serialize>(
    column: &'static str,
    value: &T,
) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::MalformedJson {
        column,
        reason: e.to_string(),
    })
}
