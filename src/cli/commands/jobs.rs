//! List jobs command handler

use chrono::Utc;

use crate::config::Config;
use crate::db::{JobFilter, Store};

pub async fn cmd_list_jobs(config: &Config, search: Option<String>, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let today = Utc::now().date_naive();

    let filter = JobFilter {
        search,
        limit: Some(limit.max(1)),
        ..JobFilter::default()
    };
    let jobs = store.list_active_jobs(&filter, today).await?;

    if jobs.is_empty() {
        println!("No active jobs.");
        return Ok(());
    }

    println!("Active Jobs ({} shown)", jobs.len());
    println!("{:-<70}", "");

    for row in jobs {
        let job = row.job;
        let company = row.company_name.as_deref().unwrap_or("Unknown company");
        let salary = match (job.salary_min, job.salary_max) {
            (Some(min), Some(max)) => format!("{min:.0}-{max:.0}"),
            (Some(min), None) => format!("from {min:.0}"),
            (None, Some(max)) => format!("up to {max:.0}"),
            (None, None) => "n/a".to_string(),
        };

        println!("• {} at {} [{}]", job.job_title, company, job.job_type);
        println!(
            "  ID: {} | Location: {} | Salary: {} | Expires: {}",
            job.id, job.location, salary, job.expiry_date
        );
    }

    Ok(())
}
