//! Shared vocabulary of the dispatch pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::template::Language;

/// Urgency of a bulk recipient; lower sorts first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Severe weather, dangerous disease outbreaks.
    Critical,
    /// Sensor threshold breaches, urgent irrigation.
    High,
    /// Reminders and market prices.
    #[default]
    Normal,
    /// Informational broadcasts.
    Low,
}

/// What a bulk recipient receives: either a pre-rendered text, or a
/// template reference resolved at dispatch time.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Template {
        key: String,
        variables: HashMap<String, String>,
    },
}

/// One unit of a bulk dispatch.
#[derive(Debug, Clone)]
pub struct Recipient {
    /// Raw phone number as supplied by the caller; normalized at send time.
    pub phone_number: String,
    pub content: MessageContent,
    pub language: Language,
    pub priority: Priority,
}

impl Recipient {
    /// Recipient of a pre-rendered message.
    pub fn text(phone_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            content: MessageContent::Text(message.into()),
            language: Language::default(),
            priority: Priority::default(),
        }
    }

    /// Recipient of a templated message.
    pub fn template(
        phone_number: impl Into<String>,
        key: impl Into<String>,
        variables: HashMap<String, String>,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            content: MessageContent::Template {
                key: key.into(),
                variables,
            },
            language: Language::default(),
            priority: Priority::default(),
        }
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Outcome of a single send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the send went through the simulated backend.
    #[serde(default)]
    pub simulated: bool,
}

impl SendResult {
    pub fn delivered(message_id: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            provider: Some(provider.into()),
            error: None,
            simulated: false,
        }
    }

    pub fn simulated(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            provider: Some("simulated".to_string()),
            error: None,
            simulated: true,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            provider: None,
            error: Some(error.into()),
            simulated: false,
        }
    }
}

/// A single failed recipient inside a [`BulkReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkError {
    /// The raw number as submitted, not the normalized form.
    pub phone_number: String,
    pub error: String,
}

/// Aggregate accounting for a bulk dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub errors: Vec<BulkError>,
}

impl BulkReport {
    /// Fold one per-recipient result into the report.
    pub fn record(&mut self, phone_number: &str, result: &SendResult) {
        if result.success {
            self.success += 1;
        } else {
            self.failed += 1;
            self.errors.push(BulkError {
                phone_number: phone_number.to_string(),
                error: result
                    .error
                    .clone()
                    .unwrap_or_else(|| "send failed".to_string()),
            });
        }
    }
}

/// Account balance as reported by the active provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceInfo {
    pub balance: String,
    pub provider: String,
}
