use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use weather_near::cli::{Args, Command};
use weather_near::config::AppConfig;
use weather_near::logging::init_tracing;
use weather_near::models::DisplayPeriod;
use weather_near::{WeatherNearError, WeatherService, web};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_from_path(args.config.clone())?;
    init_tracing(&config.logging, args.verbose)?;

    let service = WeatherService::from_config(&config)?;

    match args.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let sweeper = service.cache().spawn_sweeper(config.cache.sweep_interval());
            info!(
                "weather-near {} serving on {}:{}",
                weather_near::VERSION,
                config.server.host,
                config.server.port
            );
            let outcome = web::run(&config.server, Arc::new(service)).await;
            sweeper.abort();
            outcome
        }
        Command::Lookup { address, force } => {
            match service.lookup(&address, force).await {
                Ok(report) => print_periods(&address, &report.periods, report.from_cache),
                Err(err) => {
                    let err = WeatherNearError::from(err);
                    tracing::warn!("{}", err);
                    eprintln!("{}", err.user_message());
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}

fn print_periods(address: &str, periods: &[DisplayPeriod], from_cache: bool) {
    let source = if from_cache { " (cached)" } else { "" };
    println!("Evenings near {address}{source}:");
    if periods.is_empty() {
        println!("  no periods in the forecast window");
    }
    for period in periods {
        println!(
            "  {:<16} {}  {:<14} wind {:<16} {}",
            period.name.as_deref().unwrap_or("--"),
            period.day,
            period.format_temperature_range(),
            period.format_wind(),
            period.description.as_deref().unwrap_or("")
        );
    }
}
