//! Send a one-time code through the configured provider chain.
//!
//! Without provider credentials the send is simulated and the payload is
//! printed by the logger instead of being transmitted.
use farmsms::prelude::*;

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    farmsms::logging::init(&config.logging);

    let to = arg_or_env("--to", "SMS_TO");
    let code = arg_or_env("--code", "SMS_OTP_CODE");
    let language = env::var("SMS_LANGUAGE")
        .ok()
        .and_then(|code| Language::from_code(&code))
        .unwrap_or_default();

    let dispatcher = Dispatcher::from_config(&config);
    let result = dispatcher.send_otp(&to, &code, language).await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn arg_or_env(flag: &str, env_key: &str) -> String {
    let args: Vec<String> = std::env::args().collect();
    if let Some(idx) = args.iter().position(|a| a == flag) {
        if idx + 1 < args.len() {
            return args[idx + 1].clone();
        }
    }
    env::var(env_key)
        .unwrap_or_else(|_| panic!("missing {} (arg {} or env {})", flag, flag, env_key))
}
