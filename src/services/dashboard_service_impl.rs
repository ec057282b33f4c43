//! `SeaORM` implementation of the `DashboardService` trait.

use crate::db::Store;
use crate::services::application_service::RecruiterApplicationDto;
use crate::services::dashboard_service::{
    DashboardError, DashboardService, RecruiterDashboard, SeekerDashboard, status_breakdown,
};
use async_trait::async_trait;
use chrono::NaiveDate;

const RECENT_APPLICATIONS: u64 = 5;

pub struct SeaOrmDashboardService {
    store: Store,
}

impl SeaOrmDashboardService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DashboardService for SeaOrmDashboardService {
    async fn recruiter_dashboard(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<RecruiterDashboard, DashboardError> {
        let profile = self
            .store
            .get_recruiter_profile(user_id)
            .await?
            .ok_or_else(|| DashboardError::NotFound("Recruiter profile".to_string()))?;

        let total_jobs = self.store.count_recruiter_jobs(profile.id).await?;
        let active_jobs = self.store.count_active_jobs(Some(profile.id), today).await?;
        let counts = self.store.recruiter_status_counts(profile.id).await?;

        let recent = self
            .store
            .list_recruiter_applications(profile.id, None, None, Some(RECENT_APPLICATIONS))
            .await?;

        Ok(RecruiterDashboard {
            company_name: profile.company_name,
            total_jobs,
            active_jobs,
            total_applications: counts.values().sum(),
            applications_by_status: status_breakdown(&counts),
            recent_applications: recent
                .into_iter()
                .map(RecruiterApplicationDto::from)
                .collect(),
        })
    }

    async fn seeker_dashboard(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<SeekerDashboard, DashboardError> {
        let profile = self
            .store
            .get_seeker_profile(user_id)
            .await?
            .ok_or_else(|| DashboardError::NotFound("Job seeker profile".to_string()))?;

        let counts = self.store.seeker_status_counts(profile.id).await?;
        let active_jobs_available = self.store.count_active_jobs(None, today).await?;

        Ok(SeekerDashboard {
            full_name: profile.full_name,
            total_applications: counts.values().sum(),
            applications_by_status: status_breakdown(&counts),
            active_jobs_available,
        })
    }
}
