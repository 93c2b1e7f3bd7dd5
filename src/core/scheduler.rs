//! Cron-based scheduler for recurring report runs

use crate::pipeline::SymbolOrchestrator;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Runs the orchestrator over the watch-list at every cron tick.
///
/// Each tick is an independent run; nothing carries over between runs. A tick that fires while
/// the previous run is still going waits for it to finish.
pub struct ReportScheduler {
    orchestrator: Arc<SymbolOrchestrator>,
    watchlist: Vec<String>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl ReportScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `orchestrator` - Pipeline to run on each tick
    /// * `watchlist` - Symbols for every run, in order
    /// * `cron_expr` - Six or seven field cron expression (`sec min hour day month weekday [year]`)
    pub fn new(
        orchestrator: Arc<SymbolOrchestrator>,
        watchlist: Vec<String>,
        cron_expr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(
            cron = %cron_expr,
            symbols = ?watchlist,
            "ReportScheduler: created (cron: {})",
            cron_expr
        );

        Ok(Self {
            orchestrator,
            watchlist,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) {
        let orchestrator = self.orchestrator.clone();
        let watchlist = self.watchlist.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("ReportScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    warn!("ReportScheduler: schedule has no upcoming ticks, stopping");
                    break;
                };
                let now = chrono::Utc::now();
                if next_tick > now {
                    let duration = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                info!(
                    tick = %next_tick,
                    symbol_count = watchlist.len(),
                    "ReportScheduler: cron tick, running report for {} symbols",
                    watchlist.len()
                );
                orchestrator.run(&watchlist).await;
            }
        });

        let mut h = self.handle.write().await;
        *h = Some(handle);
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("ReportScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}
