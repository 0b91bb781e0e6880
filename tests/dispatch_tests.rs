use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use farmsms::prelude::*;

/// Transport that records every request and always succeeds.
struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsTransport for RecordingTransport {
    fn provider(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, req: SendRequest<'_>) -> Result<SendResponse, SmsError> {
        self.sent
            .lock()
            .unwrap()
            .push((req.to.to_string(), req.text.to_string()));
        Ok(SendResponse {
            id: fallback_id(),
            provider: "recording",
            raw: serde_json::Value::Null,
        })
    }
}

fn test_dispatcher(transport: Arc<RecordingTransport>) -> Dispatcher {
    // High rate so tests do not sleep on the throttle.
    let sms = SmsConfig {
        rate_per_second: 10_000,
        ..SmsConfig::default()
    };
    Dispatcher::new(
        ProviderGateway::with_transports(vec![transport]),
        TemplateCatalog::builtin(),
        &sms,
    )
}

#[tokio::test]
async fn invalid_number_never_reaches_the_provider() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let result = dispatcher.send_sms("", "Bonjour").await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Invalid phone number"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn unknown_template_returns_failure_without_sending() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let result = dispatcher
        .send_from_template("0701234567", "unknown_key", &HashMap::new(), Language::Fr)
        .await;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("Template not found"));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn numbers_are_normalized_before_sending() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let result = dispatcher.send_sms("07 01 23 45 67", "Bonjour").await;
    assert!(result.success);
    assert_eq!(transport.sent()[0].0, "+225701234567");
}

#[tokio::test]
async fn long_messages_are_truncated_to_one_segment() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let message = "A".repeat(200);
    let result = dispatcher.send_sms("0701234567", &message).await;
    assert!(result.success);

    let sent = transport.sent();
    let text = &sent[0].1;
    assert_eq!(text.chars().count(), 160);
    assert!(text.ends_with("..."));
}

#[tokio::test]
async fn otp_template_renders_the_code() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let result = dispatcher.send_otp("0701234567", "123456", Language::Fr).await;
    assert!(result.success);

    let sent = transport.sent();
    assert!(sent[0].1.contains("123456"));
    assert!(!sent[0].1.contains("{code}"));
}

#[tokio::test]
async fn farmer_language_preference_selects_the_variant() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let farmer = Farmer::new("0701234567").with_language(Language::Bci);
    let alert = DiseaseAlert {
        disease: "mildiou".to_string(),
        parcel_name: "Parcelle Nord".to_string(),
        treatment: "bouillie bordelaise".to_string(),
    };
    let result = dispatcher.send_disease_alert(&farmer, &alert).await;
    assert!(result.success);

    let sent = transport.sent();
    assert!(sent[0].1.contains("MALADIE"));
    assert!(sent[0].1.contains("mildiou"));
    // The Baoulé variant, not the French default.
    assert!(sent[0].1.contains("Drogue"));
}

#[tokio::test]
async fn bulk_send_isolates_per_recipient_failures() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let recipients = vec![
        Recipient::text("0701000001", "premier"),
        Recipient::text("", "numéro invalide"),
        Recipient::text("0701000003", "troisième"),
    ];
    let report = dispatcher.send_bulk(recipients, &BulkOptions::default()).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.success, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.success + report.failed, report.total);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].phone_number, "");
    assert_eq!(report.errors[0].error, "Invalid phone number");
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test]
async fn prioritized_bulk_delivers_urgent_first_and_stays_stable() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let recipients = vec![
        Recipient::text("0701000001", "low-1").priority(Priority::Low),
        Recipient::text("0701000002", "critical-1").priority(Priority::Critical),
        Recipient::text("0701000003", "normal-1").priority(Priority::Normal),
        Recipient::text("0701000004", "critical-2").priority(Priority::Critical),
        Recipient::text("0701000005", "low-2").priority(Priority::Low),
    ];
    let report = dispatcher
        .send_bulk(recipients, &BulkOptions { prioritize: true })
        .await;
    assert_eq!(report.success, 5);

    let texts: Vec<String> = transport.sent().into_iter().map(|(_, text)| text).collect();
    assert_eq!(
        texts,
        vec!["critical-1", "critical-2", "normal-1", "low-1", "low-2"]
    );
}

#[tokio::test]
async fn unprioritized_bulk_keeps_submission_order() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let recipients = vec![
        Recipient::text("0701000001", "un").priority(Priority::Low),
        Recipient::text("0701000002", "deux").priority(Priority::Critical),
        Recipient::text("0701000003", "trois").priority(Priority::Normal),
    ];
    dispatcher.send_bulk(recipients, &BulkOptions::default()).await;

    let texts: Vec<String> = transport.sent().into_iter().map(|(_, text)| text).collect();
    assert_eq!(texts, vec!["un", "deux", "trois"]);
}

#[tokio::test]
async fn bulk_mixes_raw_and_templated_recipients() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let variables: HashMap<String, String> =
        [("code".to_string(), "987654".to_string())].into_iter().collect();
    let recipients = vec![
        Recipient::text("0701000001", "message brut"),
        Recipient::template("0701000002", "otp", variables),
    ];
    let report = dispatcher.send_bulk(recipients, &BulkOptions::default()).await;
    assert_eq!(report.success, 2);

    let sent = transport.sent();
    assert_eq!(sent[0].1, "message brut");
    assert!(sent[1].1.contains("987654"));
}

#[tokio::test]
async fn weather_alert_reports_partial_failure() {
    let transport = RecordingTransport::new();
    let dispatcher = test_dispatcher(transport.clone());

    let farmers = vec![
        Farmer::new("0701000001"),
        Farmer::new("pas un numéro"),
        Farmer::new("0701000003").with_language(Language::Dyu),
    ];
    let alert = WeatherAlert {
        message: "Fortes pluies attendues".to_string(),
        parcel_name: None,
    };
    let report = dispatcher.send_weather_alert(&farmers, &alert).await;

    assert_eq!(report.total, 3);
    assert_eq!(report.success, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.errors[0].phone_number, "pas un numéro");
    assert_eq!(report.errors[0].error, "Invalid phone number");

    // Region-wide alert: template falls back to the generic parcel wording.
    let sent = transport.sent();
    assert!(sent[0].1.contains("votre parcelle") || sent[0].1.contains("kɔnɔ"));
}

#[tokio::test]
async fn concurrent_sends_share_one_dispatcher() {
    let transport = RecordingTransport::new();
    let dispatcher = Arc::new(test_dispatcher(transport.clone()));

    let futures: Vec<_> = (0..5)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            async move {
                dispatcher
                    .send_sms(&format!("070100000{}", i), "Bonjour")
                    .await
            }
        })
        .collect();
    let results = futures::future::join_all(futures).await;

    assert!(results.iter().all(|r| r.success));
    assert_eq!(transport.sent().len(), 5);
}

#[tokio::test]
async fn default_config_runs_fully_simulated() {
    let dispatcher = Dispatcher::from_config(&AppConfig::default());

    let result = dispatcher.send_sms("0701234567", "Bonjour").await;
    assert!(result.success);
    assert!(result.simulated);
    assert_eq!(result.provider.as_deref(), Some("simulated"));

    let info = dispatcher.balance().await;
    assert_eq!(info.balance, "N/A");
    assert_eq!(info.provider, "simulated");
}

#[tokio::test]
async fn introspection_lists_templates_and_languages() {
    let dispatcher = Dispatcher::from_config(&AppConfig::default());

    let templates = dispatcher.templates();
    assert_eq!(templates.len(), 9);
    assert!(templates.contains(&"weather_alert"));
    assert!(templates.contains(&"otp"));

    assert_eq!(dispatcher.supported_languages(), vec!["fr", "bci", "dyu"]);
}
