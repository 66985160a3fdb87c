use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::action::ActionData;
use super::context::AnonymizedContext;
use super::enums::{ActionType, LearningEventType};

/// A recurring (context, action) pair observed for one practitioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticePattern {
    pub id: Uuid,
    pub user_id: String,
    pub action_type: ActionType,
    pub context: AnonymizedContext,
    pub action_data: ActionData,
    pub frequency: u32,
    pub last_used: NaiveDateTime,
}

/// A recommendation derived from one pattern, tracked for acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSuggestion {
    pub id: Uuid,
    pub user_id: String,
    /// Weak reference: the pattern may have been erased.
    pub pattern_id: Uuid,
    pub trigger_context: AnonymizedContext,
    pub suggested_action: ActionData,
    pub times_shown: u32,
    pub times_accepted: u32,
    pub times_rejected: u32,
    /// Percentage, two decimals.
    pub acceptance_rate: f64,
    pub is_active: bool,
}

/// Append-only record of a learning interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningEvent {
    pub id: Uuid,
    pub user_id: String,
    pub event_type: LearningEventType,
    pub pattern_id: Option<Uuid>,
    pub suggestion_id: Option<Uuid>,
    pub payload: serde_json::Value,
    pub created_at: NaiveDateTime,
}

/// Ranked suggestion returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Smart suggestion id, used for accept/reject.
    pub id: Uuid,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub data: ActionData,
    /// In `[0, 0.95]`.
    pub confidence: f64,
    pub explanation: String,
}
