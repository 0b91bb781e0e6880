//! Broadcast a weather alert to a handful of farmers and print the report.
use farmsms::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    farmsms::logging::init(&config.logging);

    let farmers = vec![
        Farmer::new("0701234567"),
        Farmer::new("05 12 34 56 78").with_language(Language::Dyu),
        Farmer::new("2250799887766").with_language(Language::Bci),
    ];
    let alert = WeatherAlert {
        message: "Fortes pluies attendues cette nuit".to_string(),
        parcel_name: Some("Parcelle Nord".to_string()),
    };

    let dispatcher = Dispatcher::from_config(&config);
    let report = dispatcher.send_weather_alert(&farmers, &alert).await;

    println!(
        "delivered {}/{} ({} failed)",
        report.success, report.total, report.failed
    );
    for error in &report.errors {
        println!("  {} -> {}", error.phone_number, error.error);
    }
    Ok(())
}
