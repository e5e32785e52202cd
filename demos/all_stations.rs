use shmu_now::{LatLon, ShmuError, ShmuNow};

#[tokio::main]
async fn main() -> Result<(), ShmuError> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let client = ShmuNow::new()?;
    let network = client.current_weather_all().call().await?;

    println!("{} stations from {}", network.reports.len(), network.window);
    for weather in &network.reports {
        let report = &weather.report;
        println!(
            "{:>6} {:<32} {:>6} °C {:>5} hPa  wind {:>4} m/s{}",
            report.id,
            report.name,
            fmt_opt(report.main.temp),
            fmt_opt(report.main.pressure.map(|p| p as f64)),
            fmt_opt(report.wind.map(|w| w.speed)),
            if weather.snapshot.complete { "" } else { "  (incomplete)" }
        );
    }
    for failure in &network.failures {
        println!("skipped {}: {}", failure.station_id, failure.error);
    }

    // Nearest station to Košice centre.
    let near = client
        .current_weather_near()
        .location(LatLon(48.7164, 21.2611))
        .call()
        .await?;
    println!("\nNear Košice: {} ({:?} °C)", near.report.name, near.report.main.temp);

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}
