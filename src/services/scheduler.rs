use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::SchedulerConfig;
use crate::state::SharedState;

pub type SchedulerState = Arc<RwLock<SharedState>>;

/// Outcome of one maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub jobs_deactivated: u64,
    pub codes_pruned: u64,
}

/// Periodically deactivates expired jobs and prunes stale reset codes.
pub struct Scheduler {
    state: SchedulerState,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    pub fn new(state: SchedulerState, config: SchedulerConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let prune_codes = self.config.prune_expired_otps;

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = maintain(&state, prune_codes).await {
                    error!(event = "job_failed", job_name = "maintenance", error = %e, "Scheduled maintenance failed");
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_mins = self.config.sweep_interval_minutes.max(1);

        info!("Scheduler running: sweep every {}m", interval_mins);

        let mut sweep_interval = interval(Duration::from_secs(u64::from(interval_mins) * 60));

        loop {
            sweep_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            if let Err(e) = maintain(&self.state, self.config.prune_expired_otps).await {
                error!(event = "job_failed", job_name = "maintenance", error = %e, "Scheduled maintenance failed");
            }
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn run_once(&self) -> Result<MaintenanceReport> {
        info!("Running manual maintenance...");
        maintain(&self.state, self.config.prune_expired_otps).await
    }
}

async fn maintain(state: &SchedulerState, prune_codes: bool) -> Result<MaintenanceReport> {
    let start = std::time::Instant::now();
    info!(event = "job_started", job_name = "expire_jobs", "Starting job expiry sweep");

    let (job_service, reset_service) = {
        let shared = state.read().await;
        (
            shared.job_service.clone(),
            shared.password_reset_service.clone(),
        )
    };

    let now = Utc::now();
    let mut report = MaintenanceReport {
        jobs_deactivated: job_service.sweep_expired(now.date_naive()).await?,
        ..MaintenanceReport::default()
    };

    info!(
        event = "job_finished",
        job_name = "expire_jobs",
        deactivated = report.jobs_deactivated,
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Job expiry sweep finished"
    );

    if prune_codes {
        report.codes_pruned = reset_service.prune_expired(now).await?;
        info!(
            event = "job_finished",
            job_name = "prune_reset_codes",
            pruned = report.codes_pruned,
            "Pruned expired reset codes"
        );
    }

    Ok(report)
}
