//! `SeaORM` implementation of the `JobService` trait.

use crate::db::{JobFilter, JobUpdate, NewJob, Store};
use crate::domain::job::is_expired;
use crate::domain::{ExperienceLevel, JobType, SalaryRange};
use crate::entities::jobs;
use crate::services::job_service::{
    JobDto, JobError, JobInput, JobQuery, JobService, RecruiterJobDto,
};
use crate::services::validation;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

const MAX_TITLE_LEN: usize = 200;
const MAX_LOCATION_LEN: usize = 200;
const MAX_PAGE_SIZE: u64 = 100;

pub struct SeaOrmJobService {
    store: Store,
}

impl SeaOrmJobService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn recruiter_id(&self, user_id: i32) -> Result<i32, JobError> {
        self.store
            .get_recruiter_profile(user_id)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| JobError::NotFound("Recruiter profile".to_string()))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, JobError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        JobError::Validation(format!(
            "Invalid expiry date '{value}'. Expected YYYY-MM-DD"
        ))
    })
}

fn parse_job_type(value: &str) -> Result<JobType, JobError> {
    value
        .parse::<JobType>()
        .map_err(|e| JobError::Validation(e.to_string()))
}

fn parse_level(value: Option<&str>) -> Result<Option<ExperienceLevel>, JobError> {
    validation::optional(value)
        .map(|v| v.parse::<ExperienceLevel>())
        .transpose()
        .map_err(|e| JobError::Validation(e.to_string()))
}

fn check_lengths(job: &NewJob) -> Result<(), JobError> {
    validation::max_len("Job title", &job.job_title, MAX_TITLE_LEN)
        .and_then(|()| validation::max_len("Location", &job.location, MAX_LOCATION_LEN))
        .map_err(JobError::Validation)
}

fn check_not_past(expiry_date: NaiveDate, today: NaiveDate) -> Result<(), JobError> {
    if is_expired(expiry_date, today) {
        return Err(JobError::Validation(
            "Expiry date cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

/// Builds a job from a create request, where every required field must be
/// present.
fn new_job(input: &JobInput, today: NaiveDate) -> Result<NewJob, JobError> {
    let required =
        |field: &str, value: &Option<String>| validation::required(field, value.as_deref());

    let job_title = required("Job title", &input.job_title).map_err(JobError::Validation)?;
    let description = required("Description", &input.description).map_err(JobError::Validation)?;
    let location = required("Location", &input.location).map_err(JobError::Validation)?;
    let job_type = parse_job_type(&required("Job type", &input.job_type).map_err(JobError::Validation)?)?;
    let expiry_date =
        parse_date(&required("Expiry date", &input.expiry_date).map_err(JobError::Validation)?)?;
    check_not_past(expiry_date, today)?;

    let salary = SalaryRange::new(input.salary_min.flatten(), input.salary_max.flatten())
        .map_err(JobError::Validation)?;

    let job = NewJob {
        job_title,
        description,
        location,
        job_type,
        salary,
        experience_level: parse_level(input.experience_level.as_deref())?,
        requirements: validation::optional(input.requirements.as_deref()),
        benefits: validation::optional(input.benefits.as_deref()),
        expiry_date,
    };
    check_lengths(&job)?;

    Ok(job)
}

/// Applies a partial update on top of the stored job and decides the new
/// active flag.
fn merged_job(existing: &jobs::Model, input: &JobInput, today: NaiveDate) -> Result<JobUpdate, JobError> {
    let replace = |field: &str, current: &str, value: &Option<String>| match value {
        Some(v) => validation::required(field, Some(v)).map_err(JobError::Validation),
        None => Ok(current.to_string()),
    };
    let replace_optional = |current: &Option<String>, value: &Option<String>| match value {
        Some(v) => validation::optional(Some(v)),
        None => current.clone(),
    };

    let job_type = match &input.job_type {
        Some(v) => parse_job_type(v)?,
        None => parse_job_type(&existing.job_type)?,
    };

    let experience_level = match &input.experience_level {
        Some(v) => parse_level(Some(v))?,
        None => parse_level(existing.experience_level.as_deref())?,
    };

    let expiry_date = match &input.expiry_date {
        Some(v) => {
            let date = parse_date(v)?;
            check_not_past(date, today)?;
            date
        }
        None => existing.expiry_date,
    };

    let salary = SalaryRange::new(
        input.salary_min.unwrap_or(existing.salary_min),
        input.salary_max.unwrap_or(existing.salary_max),
    )
    .map_err(JobError::Validation)?;

    let job = NewJob {
        job_title: replace("Job title", &existing.job_title, &input.job_title)?,
        description: replace("Description", &existing.description, &input.description)?,
        location: replace("Location", &existing.location, &input.location)?,
        job_type,
        salary,
        experience_level,
        requirements: replace_optional(&existing.requirements, &input.requirements),
        benefits: replace_optional(&existing.benefits, &input.benefits),
        expiry_date,
    };
    check_lengths(&job)?;

    let expired = is_expired(job.expiry_date, today);
    let is_active = match input.is_active {
        Some(true) if expired => {
            return Err(JobError::Validation(
                "Cannot activate a job whose expiry date has passed".to_string(),
            ));
        }
        Some(flag) => flag,
        // A new expiry date in the future brings the job back.
        None if input.expiry_date.is_some() => true,
        None => existing.is_active && !expired,
    };

    Ok(JobUpdate { job, is_active })
}

fn job_filter(query: &JobQuery) -> Result<JobFilter, JobError> {
    let job_type = validation::optional(query.job_type.as_deref())
        .map(|v| parse_job_type(&v))
        .transpose()?;

    Ok(JobFilter {
        recruiter_id: None,
        location: validation::optional(query.location.as_deref()),
        job_type,
        experience_level: parse_level(query.experience_level.as_deref())?,
        search: validation::optional(query.search.as_deref()),
        limit: Some(query.limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)),
        offset: query.offset,
    })
}

#[async_trait]
impl JobService for SeaOrmJobService {
    async fn sweep_expired(&self, today: NaiveDate) -> Result<u64, JobError> {
        let count = self.store.deactivate_expired_jobs(today).await?;

        metrics::counter!("jobs_deactivated_total").increment(count);
        if count > 0 {
            info!(deactivated = count, today = %today, "Deactivated expired jobs");
        }

        Ok(count)
    }

    async fn browse(&self, query: JobQuery, today: NaiveDate) -> Result<Vec<JobDto>, JobError> {
        let filter = job_filter(&query)?;
        self.sweep_expired(today).await?;

        let rows = self.store.list_active_jobs(&filter, today).await?;

        Ok(rows
            .into_iter()
            .map(|row| JobDto::from_row(row, today))
            .collect())
    }

    async fn get_job(
        &self,
        job_id: i32,
        viewer_user_id: Option<i32>,
        today: NaiveDate,
    ) -> Result<JobDto, JobError> {
        let row = self
            .store
            .get_job(job_id)
            .await?
            .ok_or_else(|| JobError::NotFound("Job".to_string()))?;

        let dto = JobDto::from_row(row, today);
        if dto.is_active {
            return Ok(dto);
        }

        let viewer_recruiter_id = match viewer_user_id {
            Some(user_id) => self.store.get_recruiter_profile(user_id).await?.map(|p| p.id),
            None => None,
        };

        if viewer_recruiter_id == Some(dto.recruiter_id) {
            Ok(dto)
        } else {
            Err(JobError::NotFound("Job".to_string()))
        }
    }

    async fn create_job(
        &self,
        user_id: i32,
        input: JobInput,
        today: NaiveDate,
    ) -> Result<JobDto, JobError> {
        let recruiter_id = self.recruiter_id(user_id).await?;
        let job = new_job(&input, today)?;

        let model = self.store.create_job(recruiter_id, job).await?;
        let company_name = self
            .store
            .get_recruiter_profile(user_id)
            .await?
            .map(|p| p.company_name);

        info!(job_id = model.id, recruiter_id, "Job posted");
        metrics::counter!("jobs_created_total").increment(1);

        Ok(JobDto::from_model(model, company_name, today))
    }

    async fn update_job(
        &self,
        user_id: i32,
        job_id: i32,
        input: JobInput,
        today: NaiveDate,
    ) -> Result<JobDto, JobError> {
        let recruiter_id = self.recruiter_id(user_id).await?;

        let existing = self
            .store
            .get_job(job_id)
            .await?
            .filter(|row| row.job.recruiter_id == recruiter_id)
            .ok_or_else(|| JobError::NotFound("Job".to_string()))?;

        let update = merged_job(&existing.job, &input, today)?;

        let model = self
            .store
            .update_job(job_id, recruiter_id, update)
            .await?
            .ok_or_else(|| JobError::NotFound("Job".to_string()))?;

        Ok(JobDto::from_model(model, existing.company_name, today))
    }

    async fn delete_job(&self, user_id: i32, job_id: i32) -> Result<(), JobError> {
        let recruiter_id = self.recruiter_id(user_id).await?;

        if !self.store.delete_job(job_id, recruiter_id).await? {
            return Err(JobError::NotFound("Job".to_string()));
        }

        info!(job_id, recruiter_id, "Job deleted");
        Ok(())
    }

    async fn list_recruiter_jobs(
        &self,
        user_id: i32,
        today: NaiveDate,
    ) -> Result<Vec<RecruiterJobDto>, JobError> {
        let profile = self
            .store
            .get_recruiter_profile(user_id)
            .await?
            .ok_or_else(|| JobError::NotFound("Recruiter profile".to_string()))?;

        self.sweep_expired(today).await?;

        let jobs = self.store.list_recruiter_jobs(profile.id).await?;
        let ids: Vec<i32> = jobs.iter().map(|j| j.id).collect();
        let counts = self.store.application_counts_by_job(&ids).await?;

        Ok(jobs
            .into_iter()
            .map(|job| RecruiterJobDto {
                application_count: counts.get(&job.id).copied().unwrap_or(0),
                job: JobDto::from_model(job, Some(profile.company_name.clone()), today),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(expiry: NaiveDate, is_active: bool) -> jobs::Model {
        jobs::Model {
            id: 1,
            recruiter_id: 7,
            job_title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            location: "Berlin".to_string(),
            job_type: "full-time".to_string(),
            salary_min: Some(50_000.0),
            salary_max: Some(70_000.0),
            experience_level: Some("mid".to_string()),
            requirements: None,
            benefits: None,
            expiry_date: expiry,
            is_active,
            created_at: "2024-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000000Z".to_string(),
        }
    }

    fn complete_input() -> JobInput {
        JobInput {
            job_title: Some("  Backend Engineer ".to_string()),
            description: Some("Build services".to_string()),
            location: Some("Berlin".to_string()),
            job_type: Some("full-time".to_string()),
            expiry_date: Some("2024-02-01".to_string()),
            ..JobInput::default()
        }
    }

    #[test]
    fn new_job_requires_core_fields() {
        let err = new_job(&JobInput::default(), day(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, JobError::Validation(msg) if msg == "Job title is required"));
    }

    #[test]
    fn new_job_trims_and_parses() {
        let job = new_job(&complete_input(), day(2024, 1, 1)).unwrap();
        assert_eq!(job.job_title, "Backend Engineer");
        assert_eq!(job.job_type, JobType::FullTime);
        assert_eq!(job.expiry_date, day(2024, 2, 1));
        assert_eq!(job.experience_level, None);
    }

    #[test]
    fn new_job_rejects_past_expiry_and_bad_enums() {
        let past = new_job(&complete_input(), day(2024, 3, 1));
        assert!(matches!(past, Err(JobError::Validation(_))));

        let bad_type = JobInput {
            job_type: Some("gig".to_string()),
            ..complete_input()
        };
        assert!(matches!(new_job(&bad_type, day(2024, 1, 1)), Err(JobError::Validation(_))));

        let bad_salary = JobInput {
            salary_min: Some(Some(10.0)),
            salary_max: Some(Some(5.0)),
            ..complete_input()
        };
        assert!(matches!(new_job(&bad_salary, day(2024, 1, 1)), Err(JobError::Validation(_))));
    }

    #[test]
    fn expiry_today_is_accepted() {
        let input = JobInput {
            expiry_date: Some("2024-01-01".to_string()),
            ..complete_input()
        };
        assert!(new_job(&input, day(2024, 1, 1)).is_ok());
    }

    #[test]
    fn moving_expiry_forward_reactivates() {
        let existing = stored(day(2024, 1, 1), false);
        let input = JobInput {
            expiry_date: Some("2024-03-01".to_string()),
            ..JobInput::default()
        };
        let update = merged_job(&existing, &input, day(2024, 2, 1)).unwrap();
        assert!(update.is_active);
        assert_eq!(update.job.job_title, "Backend Engineer");
    }

    #[test]
    fn expired_job_cannot_be_activated() {
        let existing = stored(day(2024, 1, 1), false);
        let input = JobInput {
            is_active: Some(true),
            ..JobInput::default()
        };
        assert!(matches!(
            merged_job(&existing, &input, day(2024, 2, 1)),
            Err(JobError::Validation(_))
        ));
    }

    #[test]
    fn untouched_expired_job_stays_inactive() {
        let existing = stored(day(2024, 1, 1), true);
        let input = JobInput {
            location: Some("Remote".to_string()),
            ..JobInput::default()
        };
        let update = merged_job(&existing, &input, day(2024, 2, 1)).unwrap();
        assert!(!update.is_active);
        assert_eq!(update.job.location, "Remote");
    }

    #[test]
    fn blank_optional_field_clears_it() {
        let existing = stored(day(2024, 6, 1), true);
        let input = JobInput {
            experience_level: Some(String::new()),
            ..JobInput::default()
        };
        let update = merged_job(&existing, &input, day(2024, 2, 1)).unwrap();
        assert_eq!(update.job.experience_level, None);
        assert!(update.is_active);
    }

    #[test]
    fn null_salary_bound_clears_it() {
        let existing = stored(day(2024, 6, 1), true);

        let raise_floor = JobInput {
            salary_min: Some(Some(80_000.0)),
            ..JobInput::default()
        };
        assert!(matches!(
            merged_job(&existing, &raise_floor, day(2024, 2, 1)),
            Err(JobError::Validation(_))
        ));

        let input: JobInput =
            serde_json::from_str(r#"{"salary_min": 80000.0, "salary_max": null}"#).unwrap();
        let update = merged_job(&existing, &input, day(2024, 2, 1)).unwrap();
        assert_eq!(update.job.salary.min, Some(80_000.0));
        assert_eq!(update.job.salary.max, None);

        let untouched: JobInput = serde_json::from_str(r#"{"location": "Remote"}"#).unwrap();
        let update = merged_job(&existing, &untouched, day(2024, 2, 1)).unwrap();
        assert_eq!(update.job.salary.max, Some(70_000.0));
    }

    #[test]
    fn browse_filter_validates_job_type() {
        let query = JobQuery {
            job_type: Some("freelance".to_string()),
            ..JobQuery::default()
        };
        assert!(matches!(job_filter(&query), Err(JobError::Validation(_))));

        let filter = job_filter(&JobQuery {
            limit: Some(1000),
            ..JobQuery::default()
        })
        .unwrap();
        assert_eq!(filter.limit, Some(MAX_PAGE_SIZE));
    }
}
