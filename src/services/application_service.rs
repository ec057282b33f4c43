//! Domain service for job applications and their review status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Application, ApplicationRow, RecruiterApplicationRow};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ApplicationError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ApplicationError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyInput {
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationQuery {
    pub job_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDto {
    pub id: i32,
    pub job_id: i32,
    pub job_seeker_id: i32,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub status: String,
    pub applied_at: String,
    pub updated_at: String,
}

impl From<Application> for ApplicationDto {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            job_id: app.job_id,
            job_seeker_id: app.job_seeker_id,
            cover_letter: app.cover_letter,
            resume_path: app.resume_path,
            status: app.status,
            applied_at: app.applied_at,
            updated_at: app.updated_at,
        }
    }
}

/// A candidate's own application with the job it targets.
#[derive(Debug, Clone, Serialize)]
pub struct SeekerApplicationDto {
    #[serde(flatten)]
    pub application: ApplicationDto,
    pub job_title: Option<String>,
    pub job_location: Option<String>,
    pub company_name: Option<String>,
}

impl From<ApplicationRow> for SeekerApplicationDto {
    fn from(row: ApplicationRow) -> Self {
        let (job_title, job_location) = match row.job {
            Some(job) => (Some(job.job_title), Some(job.location)),
            None => (None, None),
        };
        Self {
            application: row.application.into(),
            job_title,
            job_location,
            company_name: row.company_name,
        }
    }
}

/// An application on one of the recruiter's jobs, with candidate details.
#[derive(Debug, Clone, Serialize)]
pub struct RecruiterApplicationDto {
    #[serde(flatten)]
    pub application: ApplicationDto,
    pub job_title: String,
    pub candidate_name: Option<String>,
    pub candidate_username: Option<String>,
    pub candidate_email: Option<String>,
    pub candidate_phone: Option<String>,
    pub candidate_headline: Option<String>,
}

impl From<RecruiterApplicationRow> for RecruiterApplicationDto {
    fn from(row: RecruiterApplicationRow) -> Self {
        let (candidate_name, candidate_phone, candidate_headline) = match row.candidate {
            Some(c) => (c.full_name, c.phone, c.headline),
            None => (None, None, None),
        };
        Self {
            application: row.application.into(),
            job_title: row.job_title,
            candidate_name,
            candidate_username: row.candidate_username,
            candidate_email: row.candidate_email,
            candidate_phone,
            candidate_headline,
        }
    }
}

#[async_trait::async_trait]
pub trait ApplicationService: Send + Sync {
    /// Submits an application to a currently listed job.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Conflict`] on a second application to the
    /// same job.
    async fn apply(
        &self,
        user_id: i32,
        job_id: i32,
        input: ApplyInput,
        today: chrono::NaiveDate,
    ) -> Result<ApplicationDto, ApplicationError>;

    async fn list_for_seeker(
        &self,
        user_id: i32,
    ) -> Result<Vec<SeekerApplicationDto>, ApplicationError>;

    async fn list_for_recruiter(
        &self,
        user_id: i32,
        query: ApplicationQuery,
    ) -> Result<Vec<RecruiterApplicationDto>, ApplicationError>;

    /// Sets the review status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`], without writing, when the
    /// application is not on one of the recruiter's jobs, and
    /// [`ApplicationError::Validation`] for an unknown status.
    async fn update_status(
        &self,
        user_id: i32,
        application_id: i32,
        status: &str,
    ) -> Result<ApplicationDto, ApplicationError>;
}
