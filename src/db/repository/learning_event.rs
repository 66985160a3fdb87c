use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{LearningEvent, LearningEventType};

use super::{parse_json, parse_uuid, storage_time, to_json};

/// Append a learning event. Events are never updated.
pub fn insert_learning_event(
    conn: &Connection,
    event: &LearningEvent,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO learning_events
         (id, user_id, event_type, pattern_id, suggestion_id, payload, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.id.to_string(),
            event.user_id,
            event.event_type.as_str(),
            event.pattern_id.map(|id| id.to_string()),
            event.suggestion_id.map(|id| id.to_string()),
            to_json("payload", &event.payload)?,
            storage_time(&event.created_at),
        ],
    )?;
    Ok(())
}

/// All events of a practitioner in insertion order.
pub fn get_learning_events(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<LearningEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, event_type, pattern_id, suggestion_id, payload, created_at
         FROM learning_events WHERE user_id = ?1
         ORDER BY created_at ASC, rowid ASC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, NaiveDateTime>(6)?,
        ))
    })?;

    let mut events = Vec::new();
    for row in rows {
        let (id, user_id, event_type, pattern_id, suggestion_id, payload, created_at) = row?;
        events.push(LearningEvent {
            id: parse_uuid(&id)?,
            user_id,
            event_type: LearningEventType::from_str(&event_type)?,
            pattern_id: pattern_id.as_deref().map(parse_uuid).transpose()?,
            suggestion_id: suggestion_id.as_deref().map(parse_uuid).transpose()?,
            payload: parse_json("payload", &payload)?,
            created_at,
        });
    }
    Ok(events)
}

pub fn delete_learning_events_for_user(
    conn: &Connection,
    user_id: &str,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM learning_events WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(deleted)
}
