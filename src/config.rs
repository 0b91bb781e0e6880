use config::{Config, ConfigError, Environment, File};
use farmsms_core::Language;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Outbound SMS behavior
    pub sms: SmsConfig,
    /// SMS providers configuration
    pub providers: ProvidersConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Outbound SMS configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmsConfig {
    /// Sender identity shown to recipients (default: FarmSMS)
    pub sender_id: String,
    /// Provider heading the failover chain (default: africastalking)
    pub primary: String,
    /// Default template language (default: fr)
    pub default_language: Language,
    /// Self-imposed sends-per-second ceiling (default: 10)
    pub rate_per_second: u32,
    /// Single-segment character budget (default: 160)
    pub max_segment_len: usize,
}

/// SMS providers configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    /// Africa's Talking configuration
    pub africastalking: Option<AfricasTalkingConfig>,
    /// Twilio configuration
    pub twilio: Option<TwilioConfig>,
}

/// Africa's Talking provider configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AfricasTalkingConfig {
    /// Application username ("sandbox" for the test environment)
    pub username: String,
    /// API key
    pub api_key: String,
}

/// Twilio provider configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TwilioConfig {
    /// Account SID
    pub account_sid: String,
    /// Auth Token
    pub auth_token: String,
    /// E.164 number sends originate from
    pub from_number: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            sender_id: "FarmSMS".to_string(),
            primary: "africastalking".to_string(),
            default_language: Language::Fr,
            rate_per_second: 10,
            max_segment_len: 160,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with FARMSMS_)
            .add_source(Environment::with_prefix("FARMSMS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sms: SmsConfig::default(),
            providers: ProvidersConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
