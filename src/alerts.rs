//! Domain alert helpers: map farm entities onto templates and dispatch.
//!
//! These carry no logic of their own beyond field mapping; the pipeline
//! semantics live in [`Dispatcher`](crate::dispatch::Dispatcher).

use std::collections::HashMap;

use farmsms_core::{BulkReport, Language, Priority, Recipient, SendResult};

use crate::dispatch::{BulkOptions, Dispatcher};

/// Caller-supplied farmer record. The dispatch core only needs the phone
/// number and the preferred template language; everything else stays with
/// the host's data model.
#[derive(Debug, Clone)]
pub struct Farmer {
    pub phone_number: String,
    pub preferred_language: Option<Language>,
}

impl Farmer {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            preferred_language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.preferred_language = Some(language);
        self
    }

    fn language_or(&self, default: Language) -> Language {
        self.preferred_language.unwrap_or(default)
    }
}

/// Payload of a weather alert broadcast.
#[derive(Debug, Clone)]
pub struct WeatherAlert {
    pub message: String,
    /// Omitted for region-wide alerts; the template then reads
    /// "votre parcelle".
    pub parcel_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DiseaseAlert {
    pub disease: String,
    pub parcel_name: String,
    pub treatment: String,
}

#[derive(Debug, Clone)]
pub struct SensorAlert {
    pub sensor_name: String,
    pub parcel_name: String,
    pub parameter: String,
    pub value: f64,
    pub unit: Option<String>,
    pub threshold: f64,
}

#[derive(Debug, Clone)]
pub struct HarvestReminder {
    pub crop: String,
    pub parcel_name: String,
    pub days_until_harvest: u32,
}

#[derive(Debug, Clone)]
pub struct MarketPrice {
    pub product: String,
    /// FCFA per unit.
    pub price: u32,
    /// Defaults to "kg".
    pub unit: Option<String>,
    pub market: String,
}

fn vars<const N: usize>(pairs: [(&str, String); N]) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

impl Dispatcher {
    /// Broadcast a weather alert, most urgent recipients first.
    pub async fn send_weather_alert(
        &self,
        farmers: &[Farmer],
        alert: &WeatherAlert,
    ) -> BulkReport {
        let parcel = alert
            .parcel_name
            .clone()
            .unwrap_or_else(|| "votre parcelle".to_string());

        let recipients = farmers
            .iter()
            .map(|farmer| {
                Recipient::template(
                    farmer.phone_number.clone(),
                    "weather_alert",
                    vars([
                        ("message", alert.message.clone()),
                        ("parcelle", parcel.clone()),
                    ]),
                )
                .language(farmer.language_or(self.default_language()))
                .priority(Priority::Critical)
            })
            .collect();

        self.send_bulk(recipients, &BulkOptions { prioritize: true })
            .await
    }

    pub async fn send_disease_alert(&self, farmer: &Farmer, alert: &DiseaseAlert) -> SendResult {
        self.send_from_template(
            &farmer.phone_number,
            "disease_alert",
            &vars([
                ("disease", alert.disease.clone()),
                ("parcelle", alert.parcel_name.clone()),
                ("treatment", alert.treatment.clone()),
            ]),
            farmer.language_or(self.default_language()),
        )
        .await
    }

    pub async fn send_sensor_alert(&self, farmer: &Farmer, alert: &SensorAlert) -> SendResult {
        self.send_from_template(
            &farmer.phone_number,
            "sensor_alert",
            &vars([
                ("sensor", alert.sensor_name.clone()),
                ("parcelle", alert.parcel_name.clone()),
                ("parameter", alert.parameter.clone()),
                ("value", alert.value.to_string()),
                ("unit", alert.unit.clone().unwrap_or_default()),
                ("threshold", alert.threshold.to_string()),
            ]),
            farmer.language_or(self.default_language()),
        )
        .await
    }

    pub async fn send_harvest_reminder(
        &self,
        farmer: &Farmer,
        reminder: &HarvestReminder,
    ) -> SendResult {
        self.send_from_template(
            &farmer.phone_number,
            "harvest_reminder",
            &vars([
                ("culture", reminder.crop.clone()),
                ("parcelle", reminder.parcel_name.clone()),
                ("days", reminder.days_until_harvest.to_string()),
            ]),
            farmer.language_or(self.default_language()),
        )
        .await
    }

    pub async fn send_market_price_alert(
        &self,
        farmer: &Farmer,
        price: &MarketPrice,
    ) -> SendResult {
        self.send_from_template(
            &farmer.phone_number,
            "market_price",
            &vars([
                ("product", price.product.clone()),
                ("price", price.price.to_string()),
                ("unit", price.unit.clone().unwrap_or_else(|| "kg".to_string())),
                ("market", price.market.clone()),
            ]),
            farmer.language_or(self.default_language()),
        )
        .await
    }

    /// One-time verification code.
    pub async fn send_otp(&self, phone_number: &str, code: &str, language: Language) -> SendResult {
        self.send_from_template(phone_number, "otp", &vars([("code", code.to_string())]), language)
            .await
    }

    /// Post-registration welcome message.
    pub async fn send_welcome(&self, phone_number: &str, language: Language) -> SendResult {
        self.send_from_template(phone_number, "welcome", &HashMap::new(), language)
            .await
    }
}
