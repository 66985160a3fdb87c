use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::enums::Trimester;

/// De-identified clinical situation a practitioner acted in.
///
/// Carries no reference to a patient record. Two contexts are the same
/// situation when their canonical forms are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymizedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<String>,
    /// Gestational age in SA.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gestational_weeks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parity: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prior_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trimester: Option<Trimester>,
}

impl AnonymizedContext {
    /// Normalized form used for equality and hashing: strings are trimmed
    /// (case is kept, categories compare exactly), blanks become absent, prior
    /// conditions are sorted and deduplicated.
    pub fn canonical(&self) -> Self {
        let mut prior_conditions: Vec<String> = self
            .prior_conditions
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        prior_conditions.sort();
        prior_conditions.dedup();

        Self {
            consultation_type: trimmed(self.consultation_type.as_deref()),
            gestational_weeks: self.gestational_weeks,
            reason: trimmed(self.reason.as_deref()),
            age_group: trimmed(self.age_group.as_deref()),
            parity: self.parity,
            prior_conditions,
            trimester: self.trimester,
        }
    }

    /// Structural equality on canonical forms.
    pub fn same_situation(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }

    /// Stable key for the canonical context (SHA-256 of its JSON, base64).
    pub fn context_hash(&self) -> String {
        // Serializing a struct of strings and integers cannot fail.
        let json = serde_json::to_string(&self.canonical()).unwrap_or_default();
        let hash = Sha256::digest(json.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(hash)
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
