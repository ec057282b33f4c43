//! Domain service for role-specific profiles.
//!
//! Job seekers keep contact and career details; recruiters keep company
//! details. A recruiter's company name and email are also their login
//! username and account email.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{JobSeekerProfile, RecruiterProfile};
use crate::services::auth_service::UserInfo;

#[derive(Debug, Error)]
pub enum ProfileError {
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

impl From<sea_orm::DbErr> for ProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ProfileError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeekerProfileDto {
    pub id: i32,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub resume_path: Option<String>,
    pub profile_image: Option<String>,
    pub updated_at: String,
}

impl From<JobSeekerProfile> for SeekerProfileDto {
    fn from(p: JobSeekerProfile) -> Self {
        Self {
            id: p.id,
            full_name: p.full_name,
            phone: p.phone,
            location: p.location,
            headline: p.headline,
            skills: p.skills,
            experience_years: p.experience_years,
            resume_path: p.resume_path,
            profile_image: p.profile_image,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecruiterProfileDto {
    pub id: i32,
    pub company_name: String,
    pub company_email: String,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub company_description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RecruiterProfile> for RecruiterProfileDto {
    fn from(p: RecruiterProfile) -> Self {
        Self {
            id: p.id,
            company_name: p.company_name,
            company_email: p.company_email,
            company_phone: p.company_phone,
            company_address: p.company_address,
            company_website: p.company_website,
            company_description: p.company_description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// The caller's account plus whichever profile matches their role.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_seeker: Option<SeekerProfileDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter: Option<RecruiterProfileDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeekerProfileInput {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub resume_path: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecruiterProfileInput {
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub company_description: Option<String>,
}

#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    async fn get_profile(&self, user_id: i32) -> Result<ProfileView, ProfileError>;

    /// Partial update: only the fields present in `input` change.
    async fn update_seeker_profile(
        &self,
        user_id: i32,
        input: SeekerProfileInput,
    ) -> Result<SeekerProfileDto, ProfileError>;

    /// Partial update. Renaming the company also renames the login.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Conflict`] if another account already uses the
    /// new company name or email.
    async fn update_recruiter_profile(
        &self,
        user_id: i32,
        input: RecruiterProfileInput,
    ) -> Result<RecruiterProfileDto, ProfileError>;
}
