use anyhow::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::domain::ApplicationStatus;
use crate::entities::{jobs, password_reset_otps};

pub mod migrator;
pub mod repositories;

pub use repositories::application::{ApplicationRow, RecruiterApplicationRow};
pub use repositories::job::{JobFilter, JobUpdate, JobWithCompany, NewJob};
pub use repositories::profile::{RecruiterProfileUpdate, SeekerProfileUpdate};
pub use repositories::user::{NewAccount, NewProfile, User};

pub use crate::entities::applications::Model as Application;
pub use crate::entities::job_seeker_profiles::Model as JobSeekerProfile;
pub use crate::entities::recruiter_profiles::Model as RecruiterProfile;

/// Raised (inside an `anyhow::Error`) when an insert or update trips a
/// unique index. The payload is the driver message, which names the column.
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);

impl UniqueViolation {
    #[must_use]
    pub fn involves(&self, column: &str) -> bool {
        self.0.contains(column)
    }
}

/// Converts a `DbErr`, turning unique index failures into [`UniqueViolation`].
pub(crate) fn map_db_err(err: DbErr) -> anyhow::Error {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => UniqueViolation(msg).into(),
        _ => err.into(),
    }
}

/// Fixed-width UTC timestamp so stored strings sort chronologically.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[must_use]
pub fn now_timestamp() -> String {
    timestamp(Utc::now())
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn profile_repo(&self) -> repositories::profile::ProfileRepository {
        repositories::profile::ProfileRepository::new(self.conn.clone())
    }

    fn otp_repo(&self) -> repositories::otp::OtpRepository {
        repositories::otp::OtpRepository::new(self.conn.clone())
    }

    fn job_repo(&self) -> repositories::job::JobRepository {
        repositories::job::JobRepository::new(self.conn.clone())
    }

    fn application_repo(&self) -> repositories::application::ApplicationRepository {
        repositories::application::ApplicationRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_account(
        &self,
        account: NewAccount,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(account, password, security).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_password(
        &self,
        user_id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(user_id, new_password, security)
            .await
    }

    pub async fn reset_password_and_clear_codes(
        &self,
        email: &str,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<u64> {
        self.user_repo()
            .reset_password_and_clear_codes(email, new_password, security)
            .await
    }

    // Profiles

    pub async fn get_seeker_profile(&self, user_id: i32) -> Result<Option<JobSeekerProfile>> {
        self.profile_repo().get_seeker_by_user(user_id).await
    }

    pub async fn get_recruiter_profile(&self, user_id: i32) -> Result<Option<RecruiterProfile>> {
        self.profile_repo().get_recruiter_by_user(user_id).await
    }

    pub async fn update_seeker_profile(
        &self,
        user_id: i32,
        update: SeekerProfileUpdate,
    ) -> Result<Option<JobSeekerProfile>> {
        self.profile_repo().update_seeker(user_id, update).await
    }

    pub async fn update_recruiter_profile(
        &self,
        user_id: i32,
        update: RecruiterProfileUpdate,
    ) -> Result<Option<RecruiterProfile>> {
        self.profile_repo().update_recruiter(user_id, update).await
    }

    // Password reset codes

    pub async fn add_reset_code(
        &self,
        email: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<password_reset_otps::Model> {
        self.otp_repo().add(email, code, created_at).await
    }

    pub async fn latest_reset_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<password_reset_otps::Model>> {
        self.otp_repo().latest_matching(email, code).await
    }

    pub async fn count_reset_codes(&self, email: &str) -> Result<u64> {
        self.otp_repo().count_for_email(email).await
    }

    pub async fn prune_reset_codes(&self, older_than: DateTime<Utc>) -> Result<u64> {
        self.otp_repo().prune_older_than(older_than).await
    }

    // Jobs

    pub async fn create_job(&self, recruiter_id: i32, job: NewJob) -> Result<jobs::Model> {
        self.job_repo().create(recruiter_id, job).await
    }

    pub async fn get_job(&self, id: i32) -> Result<Option<JobWithCompany>> {
        self.job_repo().get(id).await
    }

    pub async fn update_job(
        &self,
        id: i32,
        recruiter_id: i32,
        update: JobUpdate,
    ) -> Result<Option<jobs::Model>> {
        self.job_repo().update(id, recruiter_id, update).await
    }

    pub async fn delete_job(&self, id: i32, recruiter_id: i32) -> Result<bool> {
        self.job_repo().delete(id, recruiter_id).await
    }

    pub async fn deactivate_expired_jobs(&self, today: NaiveDate) -> Result<u64> {
        self.job_repo().deactivate_expired(today).await
    }

    pub async fn list_active_jobs(
        &self,
        filter: &JobFilter,
        today: NaiveDate,
    ) -> Result<Vec<JobWithCompany>> {
        self.job_repo().list_active(filter, today).await
    }

    pub async fn list_recruiter_jobs(&self, recruiter_id: i32) -> Result<Vec<jobs::Model>> {
        self.job_repo().list_for_recruiter(recruiter_id).await
    }

    pub async fn count_active_jobs(
        &self,
        recruiter_id: Option<i32>,
        today: NaiveDate,
    ) -> Result<u64> {
        self.job_repo().count_active(recruiter_id, today).await
    }

    pub async fn count_recruiter_jobs(&self, recruiter_id: i32) -> Result<u64> {
        self.job_repo().count_for_recruiter(recruiter_id).await
    }

    // Applications

    pub async fn create_application(
        &self,
        job_id: i32,
        job_seeker_id: i32,
        cover_letter: Option<String>,
        resume_path: Option<String>,
    ) -> Result<Application> {
        self.application_repo()
            .create(job_id, job_seeker_id, cover_letter, resume_path)
            .await
    }

    pub async fn update_application_status(
        &self,
        id: i32,
        recruiter_id: i32,
        status: ApplicationStatus,
    ) -> Result<Option<Application>> {
        self.application_repo()
            .update_status(id, recruiter_id, status)
            .await
    }

    pub async fn list_seeker_applications(&self, job_seeker_id: i32) -> Result<Vec<ApplicationRow>> {
        self.application_repo().list_for_seeker(job_seeker_id).await
    }

    pub async fn list_recruiter_applications(
        &self,
        recruiter_id: i32,
        job_id: Option<i32>,
        status: Option<ApplicationStatus>,
        limit: Option<u64>,
    ) -> Result<Vec<RecruiterApplicationRow>> {
        self.application_repo()
            .list_for_recruiter(recruiter_id, job_id, status, limit)
            .await
    }

    pub async fn application_counts_by_job(&self, job_ids: &[i32]) -> Result<HashMap<i32, u64>> {
        self.application_repo().counts_by_job(job_ids).await
    }

    pub async fn recruiter_status_counts(
        &self,
        recruiter_id: i32,
    ) -> Result<HashMap<ApplicationStatus, u64>> {
        self.application_repo()
            .status_counts_for_recruiter(recruiter_id)
            .await
    }

    pub async fn seeker_status_counts(
        &self,
        job_seeker_id: i32,
    ) -> Result<HashMap<ApplicationStatus, u64>> {
        self.application_repo()
            .status_counts_for_seeker(job_seeker_id)
            .await
    }
}
