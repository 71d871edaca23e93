use anyhow::{Context, Result};
use pulse::Pulse;
use std::path::Path;
use tracing::info;
use tracing_subscriber;

use config::Config;
use runner::EnrollmentBatchRunner;

mod config;
mod results;
mod runner;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // nothing touches the network until the config is valid
    let config = Config::from_env()?;
    info!(org_id = %config.org_id, "starting device enrollment code generation");

    let client = Pulse::new(&config.api_url, &config.api_key, &config.org_id)
        .context("failed to create pulse api client")?;
    let runner =
        EnrollmentBatchRunner::new(client, config.request_delay, config.rate_limit_backoff);

    let results = runner.run(Path::new(&config.output_file)).await?;
    if results.is_empty() {
        println!("No rooms found in organization {}", config.org_id);
        return Ok(());
    }

    println!("{}", results::summary(&results));
    println!("Results exported to {}", config.output_file);

    // rooms that failed are in the csv and the summary, they don't fail the run
    Ok(())
}
