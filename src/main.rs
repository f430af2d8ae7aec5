use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mekong_core::{App, AppError};
use mekong_weather::{WeatherService, WeatherSnapshot};

/// Farm assistant weather panel
#[derive(Parser, Debug)]
#[command(name = "mekong", version, about)]
struct Cli {
    /// Print the weather snapshot as JSON instead of the text panel
    #[arg(long)]
    json: bool,
}

fn print_panel(snapshot: &WeatherSnapshot) {
    let lang = snapshot.language;
    let current = &snapshot.current;

    println!("{}", lang.pick("Weather", "Thời Tiết"));
    println!("  {} ({})", snapshot.location, snapshot.timezone);
    if snapshot.is_fallback() {
        println!("  {}", lang.pick("(demo data)", "(dữ liệu mẫu)"));
    }
    println!(
        "  {}°C  {}",
        current.temperature,
        current.condition.localized(lang)
    );
    println!(
        "  {}: {}%  {}: {} mm  {}: {} km/h",
        lang.pick("Humidity", "Độ ẩm"),
        current.humidity,
        lang.pick("Rain", "Lượng mưa"),
        current.rainfall,
        lang.pick("Wind", "Gió"),
        current.wind_speed
    );

    println!("\n{}", lang.pick("Forecast", "Dự Báo"));
    for day in &snapshot.forecast {
        println!(
            "  {}  {:>3}° / {:>3}°  {:>5} mm  {}",
            day.date.format("%d/%m"),
            day.high,
            day.low,
            day.rainfall,
            day.condition.localized(lang)
        );
    }

    println!("\n{}", lang.pick("Farming Advisories", "Khuyến Nghị Canh Tác"));
    for alert in &snapshot.alerts {
        println!("  [{:?}] {}", alert.severity, alert.kind);
        println!("    {}", alert.message);
    }
}

async fn run(json: bool) -> Result<(), AppError> {
    // Create and initialize application
    let mut app = App::new()?;
    app.initialize()?;

    tracing::info!("Mekong farm assistant started");

    let service = WeatherService::new(app.config(), app.language())?;
    let snapshot = service.refresh().await;

    if json {
        let text = serde_json::to_string_pretty(snapshot.as_ref())
            .context("Failed to serialize weather snapshot")?;
        println!("{}", text);
    } else {
        print_panel(&snapshot);
    }

    // Graceful shutdown
    app.shutdown()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = mekong_core::init() {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(cli.json).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}
