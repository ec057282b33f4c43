//! `SeaORM` implementation of the `ApplicationService` trait.

use crate::db::{Store, UniqueViolation};
use crate::domain::ApplicationStatus;
use crate::domain::job::is_listed;
use crate::services::application_service::{
    ApplicationDto, ApplicationError, ApplicationQuery, ApplicationService, ApplyInput,
    RecruiterApplicationDto, SeekerApplicationDto,
};
use crate::services::validation;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

const MAX_COVER_LETTER_LEN: usize = 5000;

pub struct SeaOrmApplicationService {
    store: Store,
}

impl SeaOrmApplicationService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn seeker_id(&self, user_id: i32) -> Result<i32, ApplicationError> {
        self.store
            .get_seeker_profile(user_id)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| ApplicationError::NotFound("Job seeker profile".to_string()))
    }

    async fn recruiter_id(&self, user_id: i32) -> Result<i32, ApplicationError> {
        self.store
            .get_recruiter_profile(user_id)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| ApplicationError::NotFound("Recruiter profile".to_string()))
    }
}

fn parse_status(value: &str) -> Result<ApplicationStatus, ApplicationError> {
    value
        .parse::<ApplicationStatus>()
        .map_err(|e| ApplicationError::Validation(e.to_string()))
}

#[async_trait]
impl ApplicationService for SeaOrmApplicationService {
    async fn apply(
        &self,
        user_id: i32,
        job_id: i32,
        input: ApplyInput,
        today: NaiveDate,
    ) -> Result<ApplicationDto, ApplicationError> {
        let seeker_id = self.seeker_id(user_id).await?;

        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Job".to_string()))?
            .job;

        if !is_listed(job.is_active, job.expiry_date, today) {
            return Err(ApplicationError::Validation(
                "This job is no longer accepting applications".to_string(),
            ));
        }

        let cover_letter = validation::optional(input.cover_letter.as_deref());
        if let Some(letter) = &cover_letter {
            validation::max_len("Cover letter", letter, MAX_COVER_LETTER_LEN)
                .map_err(ApplicationError::Validation)?;
        }

        let created = self
            .store
            .create_application(
                job_id,
                seeker_id,
                cover_letter,
                validation::optional(input.resume_path.as_deref()),
            )
            .await;

        let application = match created {
            Ok(application) => application,
            Err(err) if err.downcast_ref::<UniqueViolation>().is_some() => {
                return Err(ApplicationError::Conflict(
                    "You have already applied for this job".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        info!(application_id = application.id, job_id, seeker_id, "Application submitted");
        metrics::counter!("applications_submitted_total").increment(1);

        Ok(application.into())
    }

    async fn list_for_seeker(
        &self,
        user_id: i32,
    ) -> Result<Vec<SeekerApplicationDto>, ApplicationError> {
        let seeker_id = self.seeker_id(user_id).await?;
        let rows = self.store.list_seeker_applications(seeker_id).await?;

        Ok(rows.into_iter().map(SeekerApplicationDto::from).collect())
    }

    async fn list_for_recruiter(
        &self,
        user_id: i32,
        query: ApplicationQuery,
    ) -> Result<Vec<RecruiterApplicationDto>, ApplicationError> {
        let recruiter_id = self.recruiter_id(user_id).await?;

        let status = validation::optional(query.status.as_deref())
            .map(|s| parse_status(&s))
            .transpose()?;

        let rows = self
            .store
            .list_recruiter_applications(recruiter_id, query.job_id, status, None)
            .await?;

        Ok(rows.into_iter().map(RecruiterApplicationDto::from).collect())
    }

    async fn update_status(
        &self,
        user_id: i32,
        application_id: i32,
        status: &str,
    ) -> Result<ApplicationDto, ApplicationError> {
        let status = parse_status(status)?;
        let recruiter_id = self.recruiter_id(user_id).await?;

        let updated = self
            .store
            .update_application_status(application_id, recruiter_id, status)
            .await?
            .ok_or_else(|| ApplicationError::NotFound("Application".to_string()))?;

        info!(
            application_id,
            recruiter_id,
            status = %status,
            "Application status updated"
        );

        Ok(updated.into())
    }
}
