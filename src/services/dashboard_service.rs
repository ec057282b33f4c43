//! Summary counts for the recruiter and job seeker landing pages.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

use crate::domain::ApplicationStatus;
use crate::services::application_service::RecruiterApplicationDto;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DashboardError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecruiterDashboard {
    pub company_name: String,
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub total_applications: u64,
    pub applications_by_status: BTreeMap<&'static str, u64>,
    pub recent_applications: Vec<RecruiterApplicationDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeekerDashboard {
    pub full_name: Option<String>,
    pub total_applications: u64,
    pub applications_by_status: BTreeMap<&'static str, u64>,
    pub active_jobs_available: u64,
}

/// Every status appears in the output, zero when there are no rows for it.
#[must_use]
pub fn status_breakdown(counts: &HashMap<ApplicationStatus, u64>) -> BTreeMap<&'static str, u64> {
    ApplicationStatus::VARIANTS
        .iter()
        .map(|s| (s.as_str(), counts.get(s).copied().unwrap_or(0)))
        .collect()
}

#[async_trait::async_trait]
pub trait DashboardService: Send + Sync {
    async fn recruiter_dashboard(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<RecruiterDashboard, DashboardError>;

    async fn seeker_dashboard(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<SeekerDashboard, DashboardError>;
}
