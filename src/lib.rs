//! # FarmSMS
//!
//! Multi-provider SMS notification dispatch for agricultural alert systems.
//!
//! ## Features
//!
//! - **Multi-provider failover**: Africa's Talking and Twilio in a
//!   configurable order, with a simulated backend when no credentials are
//!   present
//! - **Localized templates**: French defaults with Baoulé and Dioula
//!   variants and `{placeholder}` substitution
//! - **Phone canonicalization**: Ivorian numbering plans, old and new
//! - **Outbound throttling**: self-imposed sends-per-second ceiling shared
//!   across callers
//! - **Bulk dispatch**: priority-ordered delivery with per-recipient
//!   failure isolation
//! - **Comprehensive configuration**: environment-based configuration
//!   management
//! - **Observability**: structured logging and tracing support
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use farmsms::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     farmsms::logging::init(&config.logging);
//!
//!     let dispatcher = Dispatcher::from_config(&config);
//!     let result = dispatcher.send_sms("0701234567", "Bonjour!").await;
//!     println!("sent: {} via {:?}", result.success, result.provider);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Configuration is layered from `config/{default,<RUN_MODE>,local}` files
//! and `FARMSMS_`-prefixed environment variables:
//!
//! ```text
//! FARMSMS_SMS__RATE_PER_SECOND=10
//! FARMSMS_SMS__SENDER_ID=FarmSMS
//! FARMSMS_PROVIDERS__AFRICASTALKING__USERNAME=sandbox
//! FARMSMS_PROVIDERS__AFRICASTALKING__API_KEY=atsk_...
//! ```

pub mod alerts;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod logging;
pub mod throttle;

pub use config::*;

/// Common imports for farmsms usage
pub mod prelude {
    pub use crate::alerts::{
        DiseaseAlert, Farmer, HarvestReminder, MarketPrice, SensorAlert, WeatherAlert,
    };
    pub use crate::config::{
        AfricasTalkingConfig, AppConfig, LoggingConfig, ProvidersConfig, SmsConfig, TwilioConfig,
    };
    pub use crate::dispatch::{BulkOptions, Dispatcher};
    pub use crate::gateway::ProviderGateway;
    pub use crate::throttle::RateThrottle;
    pub use farmsms_core::*;
}
