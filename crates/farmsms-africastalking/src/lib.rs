use async_trait::async_trait;
use farmsms_core::{SendRequest, SendResponse, SmsError, SmsTransport};
use serde::{Deserialize, Serialize};
#[cfg(feature = "reqwest")]
use tracing::debug;

const PROVIDER: &str = "africastalking";

/// Africa's Talking REST client.
#[derive(Clone, Debug)]
pub struct AfricasTalkingClient {
    /// Application username ("sandbox" for the test environment).
    pub username: String,
    /// API key issued for the application.
    pub api_key: String,
    /// API base URL; override for testing/mocking.
    pub base_url: String,
    #[cfg(feature = "reqwest")]
    http: reqwest::Client,
}

impl AfricasTalkingClient {
    pub fn new<S: Into<String>>(username: S, api_key: S) -> Self {
        Self::with_base_url(
            username,
            api_key,
            "https://api.africastalking.com".to_string(),
        )
    }

    pub fn with_base_url<S: Into<String>>(username: S, api_key: S, base_url: String) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
            base_url,
            #[cfg(feature = "reqwest")]
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct AtSendForm<'a> {
    username: &'a str,
    to: &'a str,
    message: &'a str,
    from: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
struct AtSendResponse {
    #[serde(rename = "SMSMessageData")]
    sms_message_data: AtMessageData,
}

#[derive(Debug, Deserialize, Serialize)]
struct AtMessageData {
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "Recipients", default)]
    recipients: Vec<AtRecipient>,
}

#[derive(Debug, Deserialize, Serialize)]
struct AtRecipient {
    number: String,
    status: String,
    #[serde(rename = "statusCode")]
    status_code: i64,
    #[serde(rename = "messageId")]
    message_id: Option<String>,
    cost: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtUserResponse {
    #[serde(rename = "UserData")]
    user_data: AtUserData,
}

#[derive(Debug, Deserialize)]
struct AtUserData {
    balance: String,
}

#[async_trait]
impl SmsTransport for AfricasTalkingClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        #[cfg(not(feature = "reqwest"))]
        {
            let _ = req;
            return Err(SmsError::Unexpected("reqwest feature disabled".into()));
        }
        #[cfg(feature = "reqwest")]
        {
            let url = format!("{}/version1/messaging", self.base_url.trim_end_matches('/'));
            debug!(to = req.to, "posting message to africastalking");
            let form = AtSendForm {
                username: &self.username,
                to: req.to,
                message: req.text,
                from: req.from,
            };
            let res = self
                .http
                .post(url)
                .header("apiKey", &self.api_key)
                .header("Accept", "application/json")
                .form(&form)
                .send()
                .await
                .map_err(|e| SmsError::Http(e.to_string()))?;

            let status = res.status();
            if status.as_u16() == 401 || status.as_u16() == 403 {
                let body = res.text().await.unwrap_or_default();
                return Err(SmsError::Auth(format!("HTTP {}: {}", status, body)));
            }
            if !status.is_success() {
                let body = res.text().await.unwrap_or_default();
                return Err(SmsError::Http(format!("HTTP {}: {}", status, body)));
            }

            let raw_text = res
                .text()
                .await
                .map_err(|e| SmsError::Http(e.to_string()))?;
            let raw_json: serde_json::Value = serde_json::from_str(&raw_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw": raw_text }));

            let parsed: AtSendResponse = serde_json::from_value(raw_json.clone())
                .map_err(|e| SmsError::Provider(format!("unrecognized response: {}", e)))?;
            let recipient = parsed
                .sms_message_data
                .recipients
                .into_iter()
                .next()
                .ok_or_else(|| SmsError::Provider(parsed.sms_message_data.message))?;

            // Delivery problems are reported in-band with a 2xx status, e.g.
            // "InsufficientBalance" (405) or "UserInBlacklist" (406).
            if recipient.status != "Success" {
                return Err(SmsError::Provider(format!(
                    "{} ({})",
                    recipient.status, recipient.status_code
                )));
            }

            Ok(SendResponse {
                id: recipient.message_id.unwrap_or_else(farmsms_core::fallback_id),
                provider: PROVIDER,
                raw: raw_json,
            })
        }
    }

    async fn balance(&self) -> Result<String, SmsError> {
        #[cfg(not(feature = "reqwest"))]
        {
            return Err(SmsError::Unexpected("reqwest feature disabled".into()));
        }
        #[cfg(feature = "reqwest")]
        {
            let url = format!(
                "{}/version1/user?username={}",
                self.base_url.trim_end_matches('/'),
                self.username
            );
            let res = self
                .http
                .get(url)
                .header("apiKey", &self.api_key)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| SmsError::Http(e.to_string()))?;

            if !res.status().is_success() {
                return Err(SmsError::Http(format!("HTTP {}", res.status())));
            }

            let parsed: AtUserResponse = res
                .json()
                .await
                .map_err(|e| SmsError::Provider(format!("unrecognized response: {}", e)))?;
            Ok(parsed.user_data.balance)
        }
    }
}
