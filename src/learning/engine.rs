use chrono::{NaiveDateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::db::repository::{
    count_patterns, delete_learning_events_for_user, delete_patterns_for_user,
    delete_suggestions_for_user, get_suggestion, get_top_patterns, insert_learning_event,
    record_acceptance, record_rejection, suggestion_totals, upsert_pattern,
    upsert_suggestion_for_pattern,
};
use crate::models::{
    ActionData, AnonymizedContext, LearningEvent, LearningEventType, PracticePattern,
    SmartSuggestion, Suggestion,
};

use super::matcher::rank_patterns;
use super::{LearningConfig, LearningError};

/// Counts removed by `erase_learning_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErasureSummary {
    pub patterns_deleted: usize,
    pub suggestions_deleted: usize,
    pub events_deleted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub pattern_count: u32,
    pub suggestion_count: u32,
    pub active_suggestions: u32,
    /// Overall acceptance over all answered suggestions, `None` before any answer.
    pub acceptance_rate: Option<f64>,
}

/// Per-practitioner learning operations over the SQLite store.
///
/// Every mutation runs in an IMMEDIATE transaction, so concurrent requests on
/// the same pattern or suggestion serialize on the database write lock.
pub struct PracticeLearning {
    config: LearningConfig,
}

impl PracticeLearning {
    pub fn new(config: LearningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Count one (context, action) observation for `user_id`.
    pub fn record_observation(
        &self,
        conn: &Connection,
        user_id: &str,
        context: &AnonymizedContext,
        action: &ActionData,
    ) -> Result<PracticePattern, LearningError> {
        validate_user(user_id)?;
        if action.action_key().is_empty() {
            return Err(LearningError::Validation(format!(
                "{} action has an empty subject",
                action.action_type()
            )));
        }

        let now = now();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let pattern = upsert_pattern(&tx, user_id, context, action, &now)?;
        insert_learning_event(
            &tx,
            &LearningEvent {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                event_type: LearningEventType::Observation,
                pattern_id: Some(pattern.id),
                suggestion_id: None,
                payload: json!({
                    "context": serde_json::to_value(context.canonical())?,
                    "action": serde_json::to_value(action)?,
                    "frequency": pattern.frequency,
                }),
                created_at: now,
            },
        )?;
        tx.commit()?;

        tracing::debug!(
            user_id = %user_id,
            action_type = pattern.action_type.as_str(),
            frequency = pattern.frequency,
            "Practice observation recorded"
        );
        Ok(pattern)
    }

    /// Ranked suggestions for a new consultation context.
    ///
    /// Each qualifying pattern gets (or reuses) a smart suggestion row; the
    /// returned ids are what `accept_suggestion` / `reject_suggestion` take.
    /// Deactivated suggestions are not offered again.
    pub fn suggest(
        &self,
        conn: &Connection,
        user_id: &str,
        context: &AnonymizedContext,
    ) -> Result<Vec<Suggestion>, LearningError> {
        validate_user(user_id)?;

        let now = now();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let candidates = get_top_patterns(
            &tx,
            user_id,
            self.config.min_frequency,
            self.config.max_candidates,
        )?;
        let ranked = rank_patterns(&candidates, context, &self.config);

        let mut suggestions = Vec::with_capacity(ranked.len());
        for r in ranked {
            let smart = upsert_suggestion_for_pattern(&tx, &r.pattern, context, &now)?;
            if !smart.is_active {
                continue;
            }
            suggestions.push(Suggestion {
                id: smart.id,
                action_type: r.pattern.action_type,
                data: r.pattern.action_data,
                confidence: r.confidence,
                explanation: r.explanation,
            });
        }
        tx.commit()?;

        tracing::debug!(
            user_id = %user_id,
            candidates = candidates.len(),
            suggestions = suggestions.len(),
            "Suggestions computed"
        );
        Ok(suggestions)
    }

    pub fn accept_suggestion(
        &self,
        conn: &Connection,
        user_id: &str,
        suggestion_id: &Uuid,
    ) -> Result<SmartSuggestion, LearningError> {
        let now = now();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let updated = record_acceptance(&tx, user_id, suggestion_id, &now)?
            .ok_or_else(|| suggestion_not_found(suggestion_id))?;
        insert_learning_event(&tx, &answer_event(&updated, LearningEventType::Accepted, now))?;
        tx.commit()?;
        Ok(updated)
    }

    /// Count a rejection; crossing the deactivation threshold switches the
    /// suggestion off for good.
    pub fn reject_suggestion(
        &self,
        conn: &Connection,
        user_id: &str,
        suggestion_id: &Uuid,
    ) -> Result<SmartSuggestion, LearningError> {
        let now = now();
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let before = get_suggestion(&tx, user_id, suggestion_id)?
            .ok_or_else(|| suggestion_not_found(suggestion_id))?;
        let updated = record_rejection(
            &tx,
            user_id,
            suggestion_id,
            self.config.deactivation_min_shown,
            self.config.deactivation_max_rate,
            &now,
        )?
        .ok_or_else(|| suggestion_not_found(suggestion_id))?;
        insert_learning_event(&tx, &answer_event(&updated, LearningEventType::Rejected, now))?;

        let deactivated = before.is_active && !updated.is_active;
        if deactivated {
            insert_learning_event(
                &tx,
                &answer_event(&updated, LearningEventType::Deactivated, now),
            )?;
        }
        tx.commit()?;

        if deactivated {
            tracing::info!(
                user_id = %user_id,
                suggestion_id = %suggestion_id,
                acceptance_rate = updated.acceptance_rate,
                "Suggestion deactivated after repeated rejections"
            );
        }
        Ok(updated)
    }

    /// Delete every pattern, suggestion and learning event of a practitioner.
    pub fn erase_learning_data(
        &self,
        conn: &Connection,
        user_id: &str,
    ) -> Result<ErasureSummary, LearningError> {
        validate_user(user_id)?;

        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let summary = ErasureSummary {
            events_deleted: delete_learning_events_for_user(&tx, user_id)?,
            suggestions_deleted: delete_suggestions_for_user(&tx, user_id)?,
            patterns_deleted: delete_patterns_for_user(&tx, user_id)?,
        };
        tx.commit()?;

        tracing::info!(
            user_id = %user_id,
            patterns = summary.patterns_deleted,
            suggestions = summary.suggestions_deleted,
            events = summary.events_deleted,
            "Learning data erased"
        );
        Ok(summary)
    }

    pub fn learning_stats(
        &self,
        conn: &Connection,
        user_id: &str,
    ) -> Result<LearningStats, LearningError> {
        let pattern_count = count_patterns(conn, user_id)?;
        let totals = suggestion_totals(conn, user_id)?;
        let acceptance_rate = (totals.shown > 0).then(|| {
            (f64::from(totals.accepted) * 100.0 / f64::from(totals.shown) * 100.0).round() / 100.0
        });
        Ok(LearningStats {
            pattern_count,
            suggestion_count: totals.suggestions,
            active_suggestions: totals.active,
            acceptance_rate,
        })
    }
}

impl Default for PracticeLearning {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn validate_user(user_id: &str) -> Result<(), LearningError> {
    if user_id.trim().is_empty() {
        return Err(LearningError::Validation("user id is empty".into()));
    }
    Ok(())
}

fn suggestion_not_found(id: &Uuid) -> LearningError {
    LearningError::NotFound(format!("suggestion {id}"))
}

fn answer_event(
    suggestion: &SmartSuggestion,
    event_type: LearningEventType,
    created_at: NaiveDateTime,
) -> LearningEvent {
    LearningEvent {
        id: Uuid::new_v4(),
        user_id: suggestion.user_id.clone(),
        event_type,
        pattern_id: Some(suggestion.pattern_id),
        suggestion_id: Some(suggestion.id),
        payload: json!({
            "timesShown": suggestion.times_shown,
            "timesAccepted": suggestion.times_accepted,
            "timesRejected": suggestion.times_rejected,
            "acceptanceRate": suggestion.acceptance_rate,
            "isActive": suggestion.is_active,
        }),
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::get_learning_events;
    use crate::db::sqlite::{open_database, open_memory_database};
    use crate::models::ActionType;

    fn context(weeks: u32) -> AnonymizedContext {
        AnonymizedContext {
            consultation_type: Some("prenatale".into()),
            gestational_weeks: Some(weeks),
            ..Default::default()
        }
    }

    fn glucose_test() -> ActionData {
        ActionData::Exam { name: "HGPO 75g".into(), urgent: false }
    }

    fn observe(learning: &PracticeLearning, conn: &Connection, user: &str, times: usize) {
        for _ in 0..times {
            learning
                .record_observation(conn, user, &context(26), &glucose_test())
                .unwrap();
        }
    }

    #[test]
    fn observation_frequency_accumulates() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 2);
        let p = learning
            .record_observation(&conn, "u1", &context(26), &glucose_test())
            .unwrap();
        assert_eq!(p.frequency, 3);
        assert_eq!(p.action_type, ActionType::Exam);

        let events = get_learning_events(&conn, "u1").unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.event_type == LearningEventType::Observation));
        assert_eq!(events[2].payload["frequency"], 3);
    }

    #[test]
    fn observation_validates_input() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        let err = learning
            .record_observation(&conn, " ", &context(26), &glucose_test())
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));
        let blank = ActionData::Advice { topic: "  ".into(), text: None };
        let err = learning
            .record_observation(&conn, "u1", &context(26), &blank)
            .unwrap_err();
        assert!(matches!(err, LearningError::Validation(_)));
    }

    #[test]
    fn suggest_requires_three_observations() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 2);
        assert!(learning.suggest(&conn, "u1", &context(25)).unwrap().is_empty());

        observe(&learning, &conn, "u1", 1);
        let suggestions = learning.suggest(&conn, "u1", &context(25)).unwrap();
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.action_type, ActionType::Exam);
        assert_eq!(s.data, glucose_test());
        assert!((s.confidence - 0.3).abs() < 1e-12);
        assert!(s.explanation.starts_with("You ordered HGPO 75g 3 times"));
    }

    #[test]
    fn suggest_ignores_dissimilar_context_and_other_users() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 4);
        let postnatal = AnonymizedContext {
            consultation_type: Some("postnatale".into()),
            ..Default::default()
        };
        assert!(learning.suggest(&conn, "u1", &postnatal).unwrap().is_empty());
        assert!(learning.suggest(&conn, "u2", &context(26)).unwrap().is_empty());
    }

    #[test]
    fn suggestion_id_stable_across_calls() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 3);
        let first = learning.suggest(&conn, "u1", &context(26)).unwrap();
        let second = learning.suggest(&conn, "u1", &context(27)).unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn repeated_rejection_deactivates_for_good() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 3);
        let id = learning.suggest(&conn, "u1", &context(26)).unwrap()[0].id;

        for _ in 0..5 {
            learning.accept_suggestion(&conn, "u1", &id).unwrap();
        }
        // 5 / (5 + 20) = 20%: not below the threshold yet.
        let mut s = None;
        for _ in 0..20 {
            s = Some(learning.reject_suggestion(&conn, "u1", &id).unwrap());
        }
        let s = s.unwrap();
        assert_eq!(s.acceptance_rate, 20.0);
        assert!(s.is_active);

        let s = learning.reject_suggestion(&conn, "u1", &id).unwrap();
        assert_eq!(s.times_shown, 26);
        assert_eq!(s.acceptance_rate, 19.23);
        assert!(!s.is_active);

        let s = learning.accept_suggestion(&conn, "u1", &id).unwrap();
        assert!(!s.is_active);
        assert!(learning.suggest(&conn, "u1", &context(26)).unwrap().is_empty());

        let deactivations = get_learning_events(&conn, "u1")
            .unwrap()
            .into_iter()
            .filter(|e| e.event_type == LearningEventType::Deactivated)
            .count();
        assert_eq!(deactivations, 1);
    }

    #[test]
    fn unknown_suggestion_is_not_found() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        let id = Uuid::new_v4();
        assert!(matches!(
            learning.accept_suggestion(&conn, "u1", &id).unwrap_err(),
            LearningError::NotFound(_)
        ));
        assert!(matches!(
            learning.reject_suggestion(&conn, "u1", &id).unwrap_err(),
            LearningError::NotFound(_)
        ));
    }

    #[test]
    fn erase_removes_only_target_user() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        observe(&learning, &conn, "u1", 3);
        observe(&learning, &conn, "u2", 3);
        let id = learning.suggest(&conn, "u1", &context(26)).unwrap()[0].id;
        learning.accept_suggestion(&conn, "u1", &id).unwrap();

        let summary = learning.erase_learning_data(&conn, "u1").unwrap();
        assert_eq!(
            summary,
            ErasureSummary { patterns_deleted: 1, suggestions_deleted: 1, events_deleted: 4 }
        );
        assert_eq!(learning.learning_stats(&conn, "u1").unwrap().pattern_count, 0);
        assert_eq!(learning.learning_stats(&conn, "u2").unwrap().pattern_count, 1);
        assert_eq!(get_learning_events(&conn, "u2").unwrap().len(), 3);
    }

    #[test]
    fn stats_summarize_answers() {
        let conn = open_memory_database().unwrap();
        let learning = PracticeLearning::default();
        let empty = learning.learning_stats(&conn, "u1").unwrap();
        assert_eq!(empty.acceptance_rate, None);

        observe(&learning, &conn, "u1", 3);
        let id = learning.suggest(&conn, "u1", &context(26)).unwrap()[0].id;
        learning.accept_suggestion(&conn, "u1", &id).unwrap();
        learning.reject_suggestion(&conn, "u1", &id).unwrap();
        learning.reject_suggestion(&conn, "u1", &id).unwrap();

        let stats = learning.learning_stats(&conn, "u1").unwrap();
        assert_eq!(stats.pattern_count, 1);
        assert_eq!(stats.suggestion_count, 1);
        assert_eq!(stats.active_suggestions, 1);
        assert_eq!(stats.acceptance_rate, Some(33.33));
    }

    #[test]
    fn concurrent_observations_merge_into_one_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("practice.db");
        drop(open_database(&path).unwrap());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let conn = open_database(&path).unwrap();
                    let learning = PracticeLearning::default();
                    observe(&learning, &conn, "u1", 10);
                });
            }
        });

        let conn = open_database(&path).unwrap();
        let learning = PracticeLearning::default();
        let stats = learning.learning_stats(&conn, "u1").unwrap();
        assert_eq!(stats.pattern_count, 1);
        let top = get_top_patterns(&conn, "u1", 1, 10).unwrap();
        assert_eq!(top[0].frequency, 40);
    }
}
