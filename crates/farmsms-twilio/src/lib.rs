use async_trait::async_trait;
use farmsms_core::{SendRequest, SendResponse, SmsError, SmsTransport};
use serde::{Deserialize, Serialize};
use tracing::debug;

const PROVIDER: &str = "twilio";

/// Twilio Messages API client.
#[derive(Clone, Debug)]
pub struct TwilioClient {
    /// Account SID, doubling as the Basic auth username.
    pub account_sid: String,
    /// Auth Token (password for Basic auth).
    pub auth_token: String,
    /// API base URL; override for testing/mocking.
    pub base_url: String,
    http: reqwest::Client,
}

impl TwilioClient {
    pub fn new<S: Into<String>>(account_sid: S, auth_token: S) -> Self {
        Self::with_base_url(account_sid, auth_token, "https://api.twilio.com".to_string())
    }

    pub fn with_base_url<S: Into<String>>(account_sid: S, auth_token: S, base_url: String) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TwilioSendForm<'a> {
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "Body")]
    body: &'a str,
}

#[derive(Debug, Deserialize, Serialize)]
struct TwilioSendResponse {
    sid: String,
    status: String,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TwilioBalanceResponse {
    balance: String,
    currency: String,
}

#[async_trait]
impl SmsTransport for TwilioClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        );
        let form = TwilioSendForm {
            to: req.to,
            from: req.from,
            body: req.text,
        };
        debug!(to = req.to, "posting message to twilio");
        let res = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
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

        let parsed: TwilioSendResponse = serde_json::from_value(raw_json.clone())
            .map_err(|e| SmsError::Provider(format!("unrecognized response: {}", e)))?;

        // A 2xx with a failed status is a soft rejection, not a transport fault.
        if parsed.status == "failed" || parsed.status == "undelivered" {
            let reason = parsed
                .error_message
                .unwrap_or_else(|| format!("message {}", parsed.status));
            return Err(SmsError::Provider(reason));
        }

        Ok(SendResponse {
            id: parsed.sid,
            provider: PROVIDER,
            raw: raw_json,
        })
    }

    async fn balance(&self) -> Result<String, SmsError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Balance.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        );
        let res = self
            .http
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| SmsError::Http(e.to_string()))?;

        if !res.status().is_success() {
            return Err(SmsError::Http(format!("HTTP {}", res.status())));
        }

        let parsed: TwilioBalanceResponse = res
            .json()
            .await
            .map_err(|e| SmsError::Provider(format!("unrecognized response: {}", e)))?;
        Ok(format!("{} {}", parsed.balance, parsed.currency))
    }
}
