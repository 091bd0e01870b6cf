use activity_stats::{Config, Dashboard, load_snapshot};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the report.
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(
        path = %config.data_path.display(),
        calendar = ?config.calendar,
        filter = %config.view.filter,
        "building activity report"
    );

    let snapshot = load_snapshot(&config.data_path).await;
    let dashboard = Dashboard::from_config(&config, snapshot);

    println!("{}", serde_json::to_string_pretty(dashboard.report())?);
    Ok(())
}
