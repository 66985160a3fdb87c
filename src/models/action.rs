use serde::{Deserialize, Serialize};

use super::enums::ActionType;

/// What the practitioner did, one variant per action type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionData {
    Prescription {
        medication: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dosage: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
    },
    Exam {
        name: String,
        #[serde(default)]
        urgent: bool,
    },
    Advice {
        topic: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Diagnosis {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    Referral {
        specialty: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ActionData {
    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Prescription { .. } => ActionType::Prescription,
            Self::Exam { .. } => ActionType::Exam,
            Self::Advice { .. } => ActionType::Advice,
            Self::Diagnosis { .. } => ActionType::Diagnosis,
            Self::Referral { .. } => ActionType::Referral,
        }
    }

    /// The field that tells two actions of the same type apart.
    pub fn subject(&self) -> &str {
        match self {
            Self::Prescription { medication, .. } => medication,
            Self::Exam { name, .. } => name,
            Self::Advice { topic, .. } => topic,
            Self::Diagnosis { label, .. } => label,
            Self::Referral { specialty, .. } => specialty,
        }
    }

    /// Discriminating key for pattern uniqueness.
    pub fn action_key(&self) -> String {
        self.subject().trim().to_lowercase()
    }
}
