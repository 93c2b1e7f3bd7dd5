//! Stockpulse Reporter
//!
//! Runs the report pipeline once over the watch-list, or on a cron schedule when
//! `REPORT_SCHEDULE` is set.

use dotenvy::dotenv;
use stockpulse::config::Config;
use stockpulse::core::runtime::ReportRuntime;
use stockpulse::core::scheduler::ReportScheduler;
use stockpulse::logging;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = stockpulse::config::get_environment();
    info!("Starting Stockpulse Reporter");
    info!(environment = %env, "Environment");

    let config = Config::from_env()?;
    let schedule = config.schedule.clone();
    let runtime = ReportRuntime::from_config(config)?;

    let Some(cron_expr) = schedule else {
        let summary = runtime.run_once().await;
        if !summary.delivered() {
            warn!(
                failures = summary.delivery_failures.len(),
                "Some messages could not be delivered"
            );
        }
        if summary.succeeded() == 0 && !summary.results.is_empty() {
            return Err("no symbol produced a report".into());
        }
        return Ok(());
    };

    let scheduler = ReportScheduler::new(
        runtime.orchestrator(),
        runtime.watchlist().to_vec(),
        &cron_expr,
    )
    .map_err(|e| e as Box<dyn std::error::Error>)?;
    scheduler.start().await;

    info!("Reporter running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;

    info!("Shutting down reporter...");
    scheduler.stop().await;
    info!("Reporter stopped");

    Ok(())
}
