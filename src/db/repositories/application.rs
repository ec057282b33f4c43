use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use std::collections::HashMap;

use crate::db::{map_db_err, now_timestamp};
use crate::domain::ApplicationStatus;
use crate::entities::{
    applications, job_seeker_profiles, jobs, prelude::*, recruiter_profiles, users,
};

/// An application as seen by the candidate who submitted it.
#[derive(Debug, Clone)]
pub struct ApplicationRow {
    pub application: applications::Model,
    pub job: Option<jobs::Model>,
    pub company_name: Option<String>,
}

/// An application as seen by the recruiter who owns the job.
#[derive(Debug, Clone)]
pub struct RecruiterApplicationRow {
    pub application: applications::Model,
    pub job_title: String,
    pub candidate: Option<job_seeker_profiles::Model>,
    pub candidate_username: Option<String>,
    pub candidate_email: Option<String>,
}

pub struct ApplicationRepository {
    conn: DatabaseConnection,
}

impl ApplicationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a pending application. A second application for the same
    /// (job, candidate) pair fails with `UniqueViolation`.
    pub async fn create(
        &self,
        job_id: i32,
        job_seeker_id: i32,
        cover_letter: Option<String>,
        resume_path: Option<String>,
    ) -> Result<applications::Model> {
        let now = now_timestamp();

        let model = applications::ActiveModel {
            job_id: Set(job_id),
            job_seeker_id: Set(job_seeker_id),
            cover_letter: Set(cover_letter),
            resume_path: Set(resume_path),
            status: Set(ApplicationStatus::Pending.as_str().to_string()),
            applied_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(map_db_err)?;

        Ok(model)
    }

    /// Sets the status of an application whose job belongs to `recruiter_id`.
    /// Returns `None`, without writing, when the application does not exist or
    /// belongs to another recruiter's job.
    pub async fn update_status(
        &self,
        id: i32,
        recruiter_id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<applications::Model>> {
        let owned = Applications::find_by_id(id)
            .join(JoinType::InnerJoin, applications::Relation::Jobs.def())
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .one(&self.conn)
            .await?;

        let Some(application) = owned else {
            return Ok(None);
        };

        let mut active: applications::ActiveModel = application.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(now_timestamp());

        Ok(Some(active.update(&self.conn).await?))
    }

    pub async fn list_for_seeker(&self, job_seeker_id: i32) -> Result<Vec<ApplicationRow>> {
        let rows = Applications::find()
            .find_also_related(Jobs)
            .filter(applications::Column::JobSeekerId.eq(job_seeker_id))
            .order_by_desc(applications::Column::AppliedAt)
            .order_by_desc(applications::Column::Id)
            .all(&self.conn)
            .await?;

        let recruiter_ids: Vec<i32> = rows
            .iter()
            .filter_map(|(_, job)| job.as_ref().map(|j| j.recruiter_id))
            .collect();

        let companies: HashMap<i32, String> = if recruiter_ids.is_empty() {
            HashMap::new()
        } else {
            RecruiterProfiles::find()
                .filter(recruiter_profiles::Column::Id.is_in(recruiter_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|r| (r.id, r.company_name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(application, job)| {
                let company_name = job
                    .as_ref()
                    .and_then(|j| companies.get(&j.recruiter_id).cloned());
                ApplicationRow {
                    application,
                    job,
                    company_name,
                }
            })
            .collect())
    }

    /// Applications across the recruiter's jobs, newest first.
    pub async fn list_for_recruiter(
        &self,
        recruiter_id: i32,
        job_id: Option<i32>,
        status: Option<ApplicationStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<RecruiterApplicationRow>> {
        let mut query = Applications::find()
            .find_also_related(Jobs)
            .filter(jobs::Column::RecruiterId.eq(recruiter_id));

        if let Some(job_id) = job_id {
            query = query.filter(applications::Column::JobId.eq(job_id));
        }

        if let Some(status) = status {
            query = query.filter(applications::Column::Status.eq(status.as_str()));
        }

        query = query
            .order_by_desc(applications::Column::AppliedAt)
            .order_by_desc(applications::Column::Id);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.conn).await?;

        let seeker_ids: Vec<i32> = rows.iter().map(|(a, _)| a.job_seeker_id).collect();
        let seekers: HashMap<i32, job_seeker_profiles::Model> = if seeker_ids.is_empty() {
            HashMap::new()
        } else {
            JobSeekerProfiles::find()
                .filter(job_seeker_profiles::Column::Id.is_in(seeker_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect()
        };

        let user_ids: Vec<i32> = seekers.values().map(|p| p.user_id).collect();
        let accounts: HashMap<i32, users::Model> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(application, job)| {
                let candidate = seekers.get(&application.job_seeker_id).cloned();
                let account = candidate.as_ref().and_then(|c| accounts.get(&c.user_id));
                RecruiterApplicationRow {
                    job_title: job.map(|j| j.job_title).unwrap_or_default(),
                    candidate_username: account.map(|u| u.username.clone()),
                    candidate_email: account.map(|u| u.email.clone()),
                    candidate,
                    application,
                }
            })
            .collect())
    }

    pub async fn counts_by_job(&self, job_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        if job_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i64)> = Applications::find()
            .select_only()
            .column(applications::Column::JobId)
            .column_as(applications::Column::Id.count(), "count")
            .filter(applications::Column::JobId.is_in(job_ids.to_vec()))
            .group_by(applications::Column::JobId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(job_id, count)| (job_id, u64::try_from(count).unwrap_or(0)))
            .collect())
    }

    pub async fn status_counts_for_recruiter(
        &self,
        recruiter_id: i32,
    ) -> Result<HashMap<ApplicationStatus, u64>> {
        let rows: Vec<(String, i64)> = Applications::find()
            .select_only()
            .column(applications::Column::Status)
            .column_as(applications::Column::Id.count(), "count")
            .join(JoinType::InnerJoin, applications::Relation::Jobs.def())
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .group_by(applications::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(tally(rows))
    }

    pub async fn status_counts_for_seeker(
        &self,
        job_seeker_id: i32,
    ) -> Result<HashMap<ApplicationStatus, u64>> {
        let rows: Vec<(String, i64)> = Applications::find()
            .select_only()
            .column(applications::Column::Status)
            .column_as(applications::Column::Id.count(), "count")
            .filter(applications::Column::JobSeekerId.eq(job_seeker_id))
            .group_by(applications::Column::Status)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(tally(rows))
    }
}

/// Rows with a status string we no longer recognise are skipped.
fn tally(rows: Vec<(String, i64)>) -> HashMap<ApplicationStatus, u64> {
    rows.into_iter()
        .filter_map(|(status, count)| {
            let status = status.parse::<ApplicationStatus>().ok()?;
            Some((status, u64::try_from(count).unwrap_or(0)))
        })
        .collect()
}
