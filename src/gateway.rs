//! Ordered provider chain with failover and a simulated fallback.

use std::sync::{Arc, OnceLock};

use farmsms_core::{fallback_id, BalanceInfo, SendRequest, SendResult, SmsTransport};
use tracing::{error, info, warn};

use crate::config::{AppConfig, ProvidersConfig, SmsConfig};
use farmsms_africastalking::AfricasTalkingClient;
use farmsms_twilio::TwilioClient;

const SIMULATED_PROVIDER: &str = "simulated";

/// One transport in the failover chain, paired with the sender identity the
/// provider expects (alphanumeric id for Africa's Talking, an E.164 number
/// for Twilio).
struct ChainEntry {
    transport: Arc<dyn SmsTransport>,
    sender: String,
}

struct GatewayState {
    chain: Vec<ChainEntry>,
}

/// Failover chain over the configured SMS providers.
///
/// Construction is cheap; the concrete clients are built once on first use
/// and reused for the process lifetime. Without any provider credentials
/// the gateway runs in simulated mode: every send succeeds with a synthetic
/// id and the payload is logged instead of transmitted.
pub struct ProviderGateway {
    sms: SmsConfig,
    providers: ProvidersConfig,
    state: OnceLock<GatewayState>,
}

impl ProviderGateway {
    /// Gateway configured from the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sms: config.sms.clone(),
            providers: config.providers.clone(),
            state: OnceLock::new(),
        }
    }

    /// Gateway over an explicit transport chain, tried in order.
    ///
    /// Useful for tests and for hosts constructing their own clients. An
    /// empty chain routes everything to the simulated backend.
    pub fn with_transports(transports: Vec<Arc<dyn SmsTransport>>) -> Self {
        let sms = SmsConfig::default();
        let chain = transports
            .into_iter()
            .map(|transport| ChainEntry {
                sender: sms.sender_id.clone(),
                transport,
            })
            .collect();

        let state = OnceLock::new();
        let _ = state.set(GatewayState { chain });
        Self {
            sms,
            providers: ProvidersConfig::default(),
            state,
        }
    }

    fn state(&self) -> &GatewayState {
        self.state.get_or_init(|| {
            let mut chain = Vec::new();
            if let Some(at) = &self.providers.africastalking {
                chain.push(ChainEntry {
                    transport: Arc::new(AfricasTalkingClient::new(
                        at.username.clone(),
                        at.api_key.clone(),
                    )),
                    sender: self.sms.sender_id.clone(),
                });
            }
            if let Some(twilio) = &self.providers.twilio {
                chain.push(ChainEntry {
                    transport: Arc::new(TwilioClient::new(
                        twilio.account_sid.clone(),
                        twilio.auth_token.clone(),
                    )),
                    sender: twilio.from_number.clone(),
                });
            }

            match self.sms.primary.as_str() {
                "africastalking" => {}
                // Two providers only, so a flip is all ordering takes.
                "twilio" => chain.reverse(),
                other => {
                    warn!(provider = other, "unknown primary provider, keeping default chain order")
                }
            }

            if chain.is_empty() {
                info!("no provider credentials configured, sends will be simulated");
            } else {
                let names: Vec<&str> = chain.iter().map(|e| e.transport.provider()).collect();
                info!(chain = ?names, "sms gateway initialized");
            }
            GatewayState { chain }
        })
    }

    /// Whether sends are currently routed to the simulated backend.
    pub fn is_simulated(&self) -> bool {
        self.state().chain.is_empty()
    }

    /// Send `text` to the already-normalized `to` number.
    ///
    /// Transport-level failures advance down the chain; a provider-reported
    /// rejection (e.g. insufficient balance) is returned to the caller
    /// immediately without failover.
    pub async fn send(&self, to: &str, text: &str) -> SendResult {
        let state = self.state();
        if state.chain.is_empty() {
            return self.send_simulated(to, text);
        }

        let mut last_error = None;
        for entry in &state.chain {
            let provider = entry.transport.provider();
            let request = SendRequest {
                to,
                from: &entry.sender,
                text,
            };
            match entry.transport.send(request).await {
                Ok(response) => {
                    info!(provider, to = mask(to), id = %response.id, "sms sent");
                    return SendResult::delivered(response.id, provider);
                }
                Err(err) if err.is_transport() => {
                    warn!(provider, error = %err, "transport failed, trying next provider");
                    last_error = Some(err);
                }
                Err(err) => {
                    warn!(provider, error = %err, "provider rejected send");
                    return SendResult::rejected(err.to_string());
                }
            }
        }

        let err = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no provider available".to_string());
        error!(to = mask(to), error = %err, "all providers failed");
        SendResult::rejected(err)
    }

    fn send_simulated(&self, to: &str, text: &str) -> SendResult {
        info!(to, text, "[sms-sim] send");
        SendResult::simulated(format!("sim-{}", fallback_id()))
    }

    /// Remaining balance of the provider heading the chain.
    pub async fn balance(&self) -> BalanceInfo {
        let state = self.state();
        let Some(entry) = state.chain.first() else {
            return BalanceInfo {
                balance: "N/A".to_string(),
                provider: SIMULATED_PROVIDER.to_string(),
            };
        };

        let provider = entry.transport.provider().to_string();
        match entry.transport.balance().await {
            Ok(balance) => BalanceInfo { balance, provider },
            Err(err) => {
                error!(provider = %provider, error = %err, "balance query failed");
                BalanceInfo {
                    balance: "N/A".to_string(),
                    provider,
                }
            }
        }
    }
}

/// Last four digits only, for logs.
fn mask(number: &str) -> &str {
    let len = number.len();
    if len > 4 {
        &number[len - 4..]
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use farmsms_core::{SendResponse, SmsError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behavior {
        Deliver,
        TransportError,
        SoftFailure,
    }

    struct ScriptedTransport {
        name: &'static str,
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(name: &'static str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name,
                behavior,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SmsTransport for ScriptedTransport {
        fn provider(&self) -> &'static str {
            self.name
        }

        async fn send(&self, _req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                Behavior::Deliver => Ok(SendResponse {
                    id: format!("{}-id", self.name),
                    provider: self.name,
                    raw: serde_json::Value::Null,
                }),
                Behavior::TransportError => Err(SmsError::Http("connection refused".into())),
                Behavior::SoftFailure => {
                    Err(SmsError::Provider("InsufficientBalance (405)".into()))
                }
            }
        }
    }

    #[tokio::test]
    async fn empty_chain_simulates_sends() {
        let gateway = ProviderGateway::with_transports(vec![]);
        assert!(gateway.is_simulated());

        let result = gateway.send("+2250701234567", "Bonjour").await;
        assert!(result.success);
        assert!(result.simulated);
        assert_eq!(result.provider.as_deref(), Some("simulated"));
        assert!(result.message_id.unwrap().starts_with("sim-"));
    }

    #[tokio::test]
    async fn transport_error_fails_over_to_next_provider() {
        let primary = ScriptedTransport::new("primary", Behavior::TransportError);
        let secondary = ScriptedTransport::new("secondary", Behavior::Deliver);
        let gateway =
            ProviderGateway::with_transports(vec![primary.clone(), secondary.clone()]);

        let result = gateway.send("+2250701234567", "Bonjour").await;
        assert!(result.success);
        assert_eq!(result.provider.as_deref(), Some("secondary"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn soft_failure_does_not_fail_over() {
        let primary = ScriptedTransport::new("primary", Behavior::SoftFailure);
        let secondary = ScriptedTransport::new("secondary", Behavior::Deliver);
        let gateway =
            ProviderGateway::with_transports(vec![primary.clone(), secondary.clone()]);

        let result = gateway.send("+2250701234567", "Bonjour").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("InsufficientBalance"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_last_error() {
        let primary = ScriptedTransport::new("primary", Behavior::TransportError);
        let secondary = ScriptedTransport::new("secondary", Behavior::TransportError);
        let gateway =
            ProviderGateway::with_transports(vec![primary.clone(), secondary.clone()]);

        let result = gateway.send("+2250701234567", "Bonjour").await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("connection refused"));
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn simulated_balance_is_not_available() {
        let gateway = ProviderGateway::with_transports(vec![]);
        let info = gateway.balance().await;
        assert_eq!(info.balance, "N/A");
        assert_eq!(info.provider, "simulated");
    }

    #[tokio::test]
    async fn balance_defaults_to_not_available_when_unsupported() {
        let primary = ScriptedTransport::new("primary", Behavior::Deliver);
        let gateway = ProviderGateway::with_transports(vec![primary]);
        let info = gateway.balance().await;
        assert_eq!(info.balance, "N/A");
        assert_eq!(info.provider, "primary");
    }
}
