use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{AnonymizedContext, PracticePattern, SmartSuggestion};

use super::{parse_json, parse_uuid, storage_time, to_json};

const SUGGESTION_COLUMNS: &str = "id, user_id, pattern_id, trigger_context, suggested_action,
    times_shown, times_accepted, times_rejected, acceptance_rate, is_active";

/// Get or create the smart suggestion backing a pattern.
///
/// An existing row keeps its counters and activity flag; only the trigger
/// context and suggested action are refreshed.
pub fn upsert_suggestion_for_pattern(
    conn: &Connection,
    pattern: &PracticePattern,
    trigger: &AnonymizedContext,
    now: &NaiveDateTime,
) -> Result<SmartSuggestion, DatabaseError> {
    let sql = format!(
        "INSERT INTO smart_suggestions
         (id, user_id, pattern_id, trigger_context, suggested_action, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         ON CONFLICT(user_id, pattern_id) DO UPDATE SET
             trigger_context = excluded.trigger_context,
             suggested_action = excluded.suggested_action,
             updated_at = excluded.updated_at
         RETURNING {SUGGESTION_COLUMNS}"
    );
    let row = conn.query_row(
        &sql,
        params![
            Uuid::new_v4().to_string(),
            pattern.user_id,
            pattern.id.to_string(),
            to_json("trigger_context", &trigger.canonical())?,
            to_json("suggested_action", &pattern.action_data)?,
            storage_time(now),
        ],
        suggestion_row_from_rusqlite,
    )?;
    suggestion_from_row(row)
}

pub fn get_suggestion(
    conn: &Connection,
    user_id: &str,
    id: &Uuid,
) -> Result<Option<SmartSuggestion>, DatabaseError> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {SUGGESTION_COLUMNS} FROM smart_suggestions WHERE id = ?1 AND user_id = ?2"
            ),
            params![id.to_string(), user_id],
            suggestion_row_from_rusqlite,
        )
        .optional()?;
    row.map(suggestion_from_row).transpose()
}

/// Count one acceptance. Never touches `is_active`.
///
/// Returns `None` when no suggestion with this id belongs to the user.
pub fn record_acceptance(
    conn: &Connection,
    user_id: &str,
    id: &Uuid,
    now: &NaiveDateTime,
) -> Result<Option<SmartSuggestion>, DatabaseError> {
    let sql = format!(
        "UPDATE smart_suggestions SET
             times_accepted = times_accepted + 1,
             times_shown = times_shown + 1,
             acceptance_rate = ROUND((times_accepted + 1) * 100.0 / (times_shown + 1), 2),
             updated_at = ?3
         WHERE id = ?1 AND user_id = ?2
         RETURNING {SUGGESTION_COLUMNS}"
    );
    let row = conn
        .query_row(
            &sql,
            params![id.to_string(), user_id, storage_time(now)],
            suggestion_row_from_rusqlite,
        )
        .optional()?;
    row.map(suggestion_from_row).transpose()
}

/// Count one rejection, deactivating the suggestion once it has been shown
/// at least `min_shown` times with an acceptance rate below `max_rate`.
///
/// Right-hand sides of an UPDATE see the pre-update row, hence the `+ 1`s.
pub fn record_rejection(
    conn: &Connection,
    user_id: &str,
    id: &Uuid,
    min_shown: u32,
    max_rate: f64,
    now: &NaiveDateTime,
) -> Result<Option<SmartSuggestion>, DatabaseError> {
    let sql = format!(
        "UPDATE smart_suggestions SET
             times_rejected = times_rejected + 1,
             times_shown = times_shown + 1,
             acceptance_rate = ROUND(times_accepted * 100.0 / (times_shown + 1), 2),
             is_active = CASE
                 WHEN times_shown + 1 >= ?3
                      AND ROUND(times_accepted * 100.0 / (times_shown + 1), 2) < ?4
                 THEN 0
                 ELSE is_active
             END,
             updated_at = ?5
         WHERE id = ?1 AND user_id = ?2
         RETURNING {SUGGESTION_COLUMNS}"
    );
    let row = conn
        .query_row(
            &sql,
            params![id.to_string(), user_id, min_shown, max_rate, storage_time(now)],
            suggestion_row_from_rusqlite,
        )
        .optional()?;
    row.map(suggestion_from_row).transpose()
}

/// Aggregate counters over a practitioner's suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SuggestionTotals {
    pub suggestions: u32,
    pub active: u32,
    pub shown: u32,
    pub accepted: u32,
}

pub fn suggestion_totals(
    conn: &Connection,
    user_id: &str,
) -> Result<SuggestionTotals, DatabaseError> {
    let totals = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(is_active), 0),
                COALESCE(SUM(times_shown), 0),
                COALESCE(SUM(times_accepted), 0)
         FROM smart_suggestions WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(SuggestionTotals {
                suggestions: row.get(0)?,
                active: row.get(1)?,
                shown: row.get(2)?,
                accepted: row.get(3)?,
            })
        },
    )?;
    Ok(totals)
}

pub fn delete_suggestions_for_user(
    conn: &Connection,
    user_id: &str,
) -> Result<usize, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM smart_suggestions WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(deleted)
}

struct SuggestionRow {
    id: String,
    user_id: String,
    pattern_id: String,
    trigger_context: String,
    suggested_action: String,
    times_shown: u32,
    times_accepted: u32,
    times_rejected: u32,
    acceptance_rate: f64,
    is_active: i32,
}

fn suggestion_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<SuggestionRow, rusqlite::Error> {
    Ok(SuggestionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pattern_id: row.get(2)?,
        trigger_context: row.get(3)?,
        suggested_action: row.get(4)?,
        times_shown: row.get(5)?,
        times_accepted: row.get(6)?,
        times_rejected: row.get(7)?,
        acceptance_rate: row.get(8)?,
        is_active: row.get(9)?,
    })
}

fn suggestion_from_row(row: SuggestionRow) -> Result<SmartSuggestion, DatabaseError> {
    Ok(SmartSuggestion {
        id: parse_uuid(&row.id)?,
        user_id: row.user_id,
        pattern_id: parse_uuid(&row.pattern_id)?,
        trigger_context: parse_json("trigger_context", &row.trigger_context)?,
        suggested_action: parse_json("suggested_action", &row.suggested_action)?,
        times_shown: row.times_shown,
        times_accepted: row.times_accepted,
        times_rejected: row.times_rejected,
        acceptance_rate: row.acceptance_rate,
        is_active: row.is_active != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::upsert_pattern;
    use crate::db::sqlite::open_memory_database;
    use crate::models::ActionData;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn setup() -> (Connection, SmartSuggestion) {
        let conn = open_memory_database().unwrap();
        let ctx = AnonymizedContext {
            consultation_type: Some("postnatale".into()),
            ..Default::default()
        };
        let action = ActionData::Advice { topic: "Allaitement".into(), text: None };
        let pattern = upsert_pattern(&conn, "u1", &ctx, &action, &now()).unwrap();
        let suggestion = upsert_suggestion_for_pattern(&conn, &pattern, &ctx, &now()).unwrap();
        (conn, suggestion)
    }

    #[test]
    fn new_suggestion_starts_active_with_zero_counters() {
        let (_conn, s) = setup();
        assert!(s.is_active);
        assert_eq!(s.times_shown, 0);
        assert_eq!(s.acceptance_rate, 0.0);
    }

    #[test]
    fn upsert_reuses_row_for_same_pattern() {
        let (conn, s) = setup();
        record_acceptance(&conn, "u1", &s.id, &now()).unwrap();
        let pattern = crate::db::repository::get_pattern(&conn, &s.pattern_id)
            .unwrap()
            .unwrap();
        let again = upsert_suggestion_for_pattern(&conn, &pattern, &s.trigger_context, &now())
            .unwrap();
        assert_eq!(again.id, s.id);
        assert_eq!(again.times_accepted, 1);
    }

    #[test]
    fn acceptance_rate_rounded_to_two_decimals() {
        let (conn, s) = setup();
        record_acceptance(&conn, "u1", &s.id, &now()).unwrap();
        record_rejection(&conn, "u1", &s.id, 5, 20.0, &now()).unwrap();
        let after = record_rejection(&conn, "u1", &s.id, 5, 20.0, &now())
            .unwrap()
            .unwrap();
        assert_eq!(after.times_shown, 3);
        assert_eq!(after.times_accepted, 1);
        assert_eq!(after.times_rejected, 2);
        assert_eq!(after.acceptance_rate, 33.33);
        assert!(after.is_active);
    }

    #[test]
    fn rejection_deactivates_past_threshold() {
        let (conn, s) = setup();
        for shown in 1..=4 {
            let r = record_rejection(&conn, "u1", &s.id, 5, 20.0, &now())
                .unwrap()
                .unwrap();
            assert_eq!(r.times_shown, shown);
            assert_eq!(r.acceptance_rate, 0.0);
            assert!(r.is_active, "deactivated after only {shown} rejections");
        }
        let last = record_rejection(&conn, "u1", &s.id, 5, 20.0, &now())
            .unwrap()
            .unwrap();
        assert_eq!(last.times_shown, 5);
        assert_eq!(last.acceptance_rate, 0.0);
        assert!(!last.is_active);
    }

    #[test]
    fn wrong_user_gets_nothing() {
        let (conn, s) = setup();
        assert!(record_acceptance(&conn, "u2", &s.id, &now()).unwrap().is_none());
        assert!(get_suggestion(&conn, "u2", &s.id).unwrap().is_none());
    }

    #[test]
    fn totals_aggregate_counters() {
        let (conn, s) = setup();
        record_acceptance(&conn, "u1", &s.id, &now()).unwrap();
        record_rejection(&conn, "u1", &s.id, 5, 20.0, &now()).unwrap();
        let totals = suggestion_totals(&conn, "u1").unwrap();
        assert_eq!(
            totals,
            SuggestionTotals { suggestions: 1, active: 1, shown: 2, accepted: 1 }
        );
        assert_eq!(suggestion_totals(&conn, "nobody").unwrap(), SuggestionTotals::default());
    }
}
