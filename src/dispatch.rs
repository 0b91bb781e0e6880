//! Single-message and bulk dispatch orchestration.

use std::collections::HashMap;

use farmsms_core::{
    phone, truncate::truncate, BalanceInfo, BulkReport, Language, MessageContent, Recipient,
    SendResult, TemplateCatalog,
};
use tracing::{info, warn};

use crate::config::{AppConfig, SmsConfig};
use crate::gateway::ProviderGateway;
use crate::throttle::RateThrottle;

/// Recognized options for a bulk dispatch.
#[derive(Debug, Clone, Default)]
pub struct BulkOptions {
    /// Deliver the most urgent recipients first. The sort is stable:
    /// recipients sharing a priority keep their submission order.
    pub prioritize: bool,
}

/// Orchestrates the outbound pipeline:
/// normalize → render → truncate → throttle → provider chain.
///
/// Public entry points never panic and never return `Err`; every failure is
/// folded into the returned [`SendResult`] or [`BulkReport`].
pub struct Dispatcher {
    gateway: ProviderGateway,
    throttle: RateThrottle,
    catalog: TemplateCatalog,
    max_segment_len: usize,
    default_language: Language,
}

impl Dispatcher {
    /// Dispatcher over an explicit gateway and catalog.
    pub fn new(gateway: ProviderGateway, catalog: TemplateCatalog, sms: &SmsConfig) -> Self {
        Self {
            gateway,
            throttle: RateThrottle::new(sms.rate_per_second),
            catalog,
            max_segment_len: sms.max_segment_len,
            default_language: sms.default_language,
        }
    }

    /// Dispatcher wired entirely from the application config, with the
    /// built-in template catalog.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ProviderGateway::from_config(config),
            TemplateCatalog::builtin(),
            &config.sms,
        )
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Send a single SMS to a raw phone number.
    pub async fn send_sms(&self, raw_number: &str, message: &str) -> SendResult {
        let Some(number) = phone::normalize(raw_number) else {
            warn!(raw = raw_number, "invalid phone number");
            return SendResult::rejected("Invalid phone number");
        };

        let text = truncate(message, self.max_segment_len);
        self.throttle.acquire().await;
        self.gateway.send(&number, &text).await
    }

    /// Render a template in `language` and send the result.
    pub async fn send_from_template(
        &self,
        raw_number: &str,
        template_key: &str,
        variables: &HashMap<String, String>,
        language: Language,
    ) -> SendResult {
        let Some(message) = self.catalog.render(template_key, language, variables) else {
            warn!(template = template_key, "template not found");
            return SendResult::rejected("Template not found");
        };

        self.send_sms(raw_number, &message).await
    }

    /// Deliver a batch of recipients sequentially.
    ///
    /// Per-recipient failures are recorded in the report and never abort
    /// the remaining sends; `total == success + failed` always holds.
    pub async fn send_bulk(&self, mut recipients: Vec<Recipient>, options: &BulkOptions) -> BulkReport {
        if options.prioritize {
            recipients.sort_by_key(|r| r.priority);
        }

        let mut report = BulkReport {
            total: recipients.len(),
            ..BulkReport::default()
        };
        for recipient in &recipients {
            let result = match &recipient.content {
                MessageContent::Text(message) => {
                    self.send_sms(&recipient.phone_number, message).await
                }
                MessageContent::Template { key, variables } => {
                    self.send_from_template(
                        &recipient.phone_number,
                        key,
                        variables,
                        recipient.language,
                    )
                    .await
                }
            };
            report.record(&recipient.phone_number, &result);
        }

        info!(
            total = report.total,
            success = report.success,
            failed = report.failed,
            "bulk send complete"
        );
        report
    }

    /// Keys of every registered template.
    pub fn templates(&self) -> Vec<&str> {
        self.catalog.keys()
    }

    /// Language codes the catalog can render.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        Language::ALL.iter().map(|l| l.code()).collect()
    }

    /// Balance of the provider heading the failover chain.
    pub async fn balance(&self) -> BalanceInfo {
        self.gateway.balance().await
    }
}
