//! # FarmSMS Core
//!
//! Core traits and types for the farmsms multi-provider notification
//! dispatch stack.
//!
//! This crate provides the fundamental building blocks for outbound SMS:
//! - [`SmsTransport`] trait implemented by every concrete provider
//! - Common types for requests, results, and errors
//! - The pure domain leaves: phone number canonicalization ([`phone`]),
//!   localized template rendering ([`template`]) and single-segment
//!   truncation ([`truncate`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use farmsms_core::{SendRequest, SmsTransport};
//!
//! // Any SMS provider implements SmsTransport
//! let response = transport.send(SendRequest {
//!     to: "+2250701234567",
//!     from: "FarmSMS",
//!     text: "Bonjour!",
//! }).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod phone;
pub mod template;
pub mod truncate;

mod types;

pub use template::{Language, Template, TemplateCatalog};
pub use types::{
    BalanceInfo, BulkError, BulkReport, MessageContent, Priority, Recipient, SendResult,
};

/// Errors that can occur during SMS operations
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// HTTP/network communication error
    #[error("http error: {0}")]
    Http(String),
    /// Authentication/authorization error
    #[error("authentication error: {0}")]
    Auth(String),
    /// Invalid request parameters
    #[error("invalid request: {0}")]
    Invalid(String),
    /// The provider accepted the request but reported a failure in-band,
    /// e.g. insufficient balance or a blacklisted destination.
    #[error("provider error: {0}")]
    Provider(String),
    /// Unexpected error occurred
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl SmsError {
    /// Transport-level errors advance the failover chain; provider-reported
    /// soft failures and invalid input do not.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SmsError::Http(_) | SmsError::Auth(_) | SmsError::Unexpected(_)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest<'a> {
    pub to: &'a str,
    pub from: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub id: String,
    /// Name of the backend/provider that produced the response, e.g. "africastalking".
    pub provider: &'static str,
    /// Raw provider payload for debugging / audit.
    pub raw: serde_json::Value,
}

/// Provider-agnostic outbound SMS capability.
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Stable provider key, e.g., "africastalking", "twilio".
    fn provider(&self) -> &'static str;

    /// Send a single text SMS.
    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError>;

    /// Remaining account balance as reported by the provider.
    async fn balance(&self) -> Result<String, SmsError> {
        Err(SmsError::Unexpected("balance query not supported".into()))
    }
}

/// Utility to create a pseudo id if a provider doesn't return one.
pub fn fallback_id() -> String {
    Uuid::new_v4().to_string()
}
