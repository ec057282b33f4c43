//! Domain service for job postings and the expiry lifecycle.
//!
//! Every read that claims to return "active" jobs runs the expiry sweep
//! first, and the underlying query also filters on the expiry date, so an
//! expired posting is never listed even between sweeps.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::db::JobWithCompany;
use crate::domain::job::{is_expired, is_listed};
use crate::entities::jobs;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for JobError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for JobError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Job fields as submitted by a recruiter.
///
/// On create the required fields must be present. On update a missing field
/// keeps its stored value and a blank optional field clears it. Salary bounds
/// are cleared with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInput {
    pub job_title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub salary_min: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub salary_max: Option<Option<f64>>,
    pub experience_level: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    /// `YYYY-MM-DD`
    pub expiry_date: Option<String>,
    pub is_active: Option<bool>,
}

/// Outer `Some` marks a field that was sent, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Browse filters, taken from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobQuery {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDto {
    pub id: i32,
    pub recruiter_id: i32,
    pub company_name: Option<String>,
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub experience_level: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub expiry_date: NaiveDate,
    /// Stored flag combined with the expiry date.
    pub is_active: bool,
    pub is_expired: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl JobDto {
    #[must_use]
    pub fn from_model(job: jobs::Model, company_name: Option<String>, today: NaiveDate) -> Self {
        Self {
            is_active: is_listed(job.is_active, job.expiry_date, today),
            is_expired: is_expired(job.expiry_date, today),
            id: job.id,
            recruiter_id: job.recruiter_id,
            company_name,
            job_title: job.job_title,
            description: job.description,
            location: job.location,
            job_type: job.job_type,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            experience_level: job.experience_level,
            requirements: job.requirements,
            benefits: job.benefits,
            expiry_date: job.expiry_date,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }

    #[must_use]
    pub fn from_row(row: JobWithCompany, today: NaiveDate) -> Self {
        Self::from_model(row.job, row.company_name, today)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecruiterJobDto {
    #[serde(flatten)]
    pub job: JobDto,
    pub application_count: u64,
}

#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Deactivates every active job whose expiry date is before `today`.
    /// Returns the number of jobs changed; a second run on the same day
    /// returns zero.
    async fn sweep_expired(&self, today: NaiveDate) -> Result<u64, JobError>;

    /// Public listing of active jobs, newest first.
    async fn browse(&self, query: JobQuery, today: NaiveDate) -> Result<Vec<JobDto>, JobError>;

    /// Active jobs are visible to anyone; inactive ones only to their owner.
    async fn get_job(
        &self,
        job_id: i32,
        viewer_user_id: Option<i32>,
        today: NaiveDate,
    ) -> Result<JobDto, JobError>;

    async fn create_job(
        &self,
        user_id: i32,
        input: JobInput,
        today: NaiveDate,
    ) -> Result<JobDto, JobError>;

    /// # Errors
    ///
    /// Returns [`JobError::NotFound`] when the job is missing or owned by
    /// another recruiter.
    async fn update_job(
        &self,
        user_id: i32,
        job_id: i32,
        input: JobInput,
        today: NaiveDate,
    ) -> Result<JobDto, JobError>;

    async fn delete_job(&self, user_id: i32, job_id: i32) -> Result<(), JobError>;

    /// Every job the recruiter owns with its application count.
    async fn list_recruiter_jobs(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<Vec<RecruiterJobDto>, JobError>;
}
