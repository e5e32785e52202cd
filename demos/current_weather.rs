use shmu_now::ShmuNow;
use std::env;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Bratislava airport unless a station number is given.
    let station = env::args().nth(1).unwrap_or_else(|| "11816".to_string());
    let client = ShmuNow::new()?;

    let weather = client.current_weather().station(&station).call().await?;
    if !weather.snapshot.complete {
        println!(
            "Note: only {} of 5 minutes were available",
            weather.snapshot.record_count
        );
    }
    println!("Window: {}", weather.window);
    println!("Source: {}", weather.source_url);
    println!(
        "{}",
        serde_json::to_string_pretty(&weather.report)?
    );

    Ok(())
}
