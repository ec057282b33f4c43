//! One-off maintenance pass

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::services::Scheduler;
use crate::state::SharedState;

pub async fn cmd_sweep(config: Config) -> anyhow::Result<()> {
    let scheduler_config = config.scheduler.clone();
    let state = Arc::new(RwLock::new(SharedState::new(config).await?));
    let scheduler = Scheduler::new(state, scheduler_config);

    let report = scheduler.run_once().await?;

    println!("✓ Deactivated {} expired job(s)", report.jobs_deactivated);
    println!("✓ Pruned {} expired reset code(s)", report.codes_pruned);

    Ok(())
}
