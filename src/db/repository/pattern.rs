use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{ActionData, ActionType, AnonymizedContext, PracticePattern};

use super::{parse_json, parse_uuid, storage_time, to_json};

const PATTERN_COLUMNS: &str =
    "id, user_id, action_type, context, action_data, frequency, last_used";

/// Record one observation of (context, action) for a practitioner.
///
/// Single statement keyed by the (user_id, action_type, context_hash,
/// action_key) uniqueness constraint: inserts with frequency 1, or bumps the
/// frequency and refreshes `last_used` on an existing row. The stored action
/// payload is replaced by the latest one.
pub fn upsert_pattern(
    conn: &Connection,
    user_id: &str,
    context: &AnonymizedContext,
    action: &ActionData,
    now: &NaiveDateTime,
) -> Result<PracticePattern, DatabaseError> {
    let canonical = context.canonical();
    let stored_at = storage_time(now);
    let sql = format!(
        "INSERT INTO practice_patterns
         (id, user_id, action_type, context_hash, context, action_key, action_data,
          frequency, last_used, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
         ON CONFLICT(user_id, action_type, context_hash, action_key) DO UPDATE SET
             frequency = frequency + 1,
             last_used = excluded.last_used,
             action_data = excluded.action_data
         RETURNING {PATTERN_COLUMNS}"
    );
    let row = conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            user_id,
            action.action_type().as_str(),
            canonical.context_hash(),
            to_json("context", &canonical)?,
            action.action_key(),
            to_json("action_data", action)?,
            stored_at,
        ],
        pattern_row_from_rusqlite,
    )?;
    pattern_from_row(row)
}

/// Most frequent patterns of a practitioner with at least `min_frequency`
/// observations, most recent first among equal frequencies.
pub fn get_top_patterns(
    conn: &Connection,
    user_id: &str,
    min_frequency: u32,
    limit: usize,
) -> Result<Vec<PracticePattern>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATTERN_COLUMNS} FROM practice_patterns
         WHERE user_id = ?1 AND frequency >= ?2
         ORDER BY frequency DESC, last_used DESC
         LIMIT ?3"
    ))?;
    let rows = stmt.query_map(
        params![user_id, min_frequency, limit as i64],
        pattern_row_from_rusqlite,
    )?;

    let mut patterns = Vec::new();
    for row in rows {
        patterns.push(pattern_from_row(row?)?);
    }
    Ok(patterns)
}

pub fn get_pattern(conn: &Connection, id: &Uuid) -> Result<Option<PracticePattern>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {PATTERN_COLUMNS} FROM practice_patterns WHERE id = ?1"),
            params![id.to_string()],
            pattern_row_from_rusqlite,
        )
        .optional()?;
    row.map(pattern_from_row).transpose()
}

pub fn count_patterns(conn: &Connection, user_id: &str) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM practice_patterns WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Delete every pattern owned by a practitioner. Returns the number removed.
pub fn delete_patterns_for_user(conn: &Connection, user_id: &str) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM practice_patterns WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(deleted)
}

struct PatternRow {
    id: String,
    user_id: String,
    action_type: String,
    context: String,
    action_data: String,
    frequency: u32,
    last_used: NaiveDateTime,
}

fn pattern_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PatternRow, rusqlite::Error> {
    Ok(PatternRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        action_type: row.get(2)?,
        context: row.get(3)?,
        action_data: row.get(4)?,
        frequency: row.get(5)?,
        last_used: row.get(6)?,
    })
}

fn pattern_from_row(row: PatternRow) -> Result<PracticePattern, DatabaseError> {
    Ok(PracticePattern {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        action_type: ActionType::from_str(&row.action_type)?,
        context: parse_json("context", &row.context)?,
        action_data: parse_json("action_data", &row.action_data)?,
        frequency: row.frequency,
        last_used: row.last_used,
    })
}
