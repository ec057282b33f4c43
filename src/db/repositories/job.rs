use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

use crate::db::now_timestamp;
use crate::domain::{ExperienceLevel, JobType, SalaryRange};
use crate::entities::{applications, jobs, prelude::*, recruiter_profiles};

/// Validated job fields, ready to persist.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_title: String,
    pub description: String,
    pub location: String,
    pub job_type: JobType,
    pub salary: SalaryRange,
    pub experience_level: Option<ExperienceLevel>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub expiry_date: NaiveDate,
}

/// Full replacement of the editable columns of an existing job.
#[derive(Debug, Clone)]
pub struct JobUpdate {
    pub job: NewJob,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub recruiter_id: Option<i32>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub search: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct JobWithCompany {
    pub job: jobs::Model,
    pub company_name: Option<String>,
}

impl From<(jobs::Model, Option<recruiter_profiles::Model>)> for JobWithCompany {
    fn from((job, recruiter): (jobs::Model, Option<recruiter_profiles::Model>)) -> Self {
        Self {
            job,
            company_name: recruiter.map(|r| r.company_name),
        }
    }
}

pub struct JobRepository {
    conn: DatabaseConnection,
}

impl JobRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, recruiter_id: i32, job: NewJob) -> Result<jobs::Model> {
        let now = now_timestamp();

        let model = jobs::ActiveModel {
            recruiter_id: Set(recruiter_id),
            job_title: Set(job.job_title),
            description: Set(job.description),
            location: Set(job.location),
            job_type: Set(job.job_type.as_str().to_string()),
            salary_min: Set(job.salary.min),
            salary_max: Set(job.salary.max),
            experience_level: Set(job.experience_level.map(|e| e.as_str().to_string())),
            requirements: Set(job.requirements),
            benefits: Set(job.benefits),
            expiry_date: Set(job.expiry_date),
            is_active: Set(true),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<JobWithCompany>> {
        let row = Jobs::find_by_id(id)
            .find_also_related(RecruiterProfiles)
            .one(&self.conn)
            .await?;

        Ok(row.map(JobWithCompany::from))
    }

    pub async fn update(
        &self,
        id: i32,
        recruiter_id: i32,
        update: JobUpdate,
    ) -> Result<Option<jobs::Model>> {
        let Some(existing) = Jobs::find_by_id(id)
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let job = update.job;
        let mut active: jobs::ActiveModel = existing.into();
        active.job_title = Set(job.job_title);
        active.description = Set(job.description);
        active.location = Set(job.location);
        active.job_type = Set(job.job_type.as_str().to_string());
        active.salary_min = Set(job.salary.min);
        active.salary_max = Set(job.salary.max);
        active.experience_level = Set(job.experience_level.map(|e| e.as_str().to_string()));
        active.requirements = Set(job.requirements);
        active.benefits = Set(job.benefits);
        active.expiry_date = Set(job.expiry_date);
        active.is_active = Set(update.is_active);
        active.updated_at = Set(now_timestamp());

        Ok(Some(active.update(&self.conn).await?))
    }

    /// Deletes the job and its applications. Returns false when the job does
    /// not exist or belongs to another recruiter.
    pub async fn delete(&self, id: i32, recruiter_id: i32) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let owned = Jobs::find_by_id(id)
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .one(&txn)
            .await?;

        if owned.is_none() {
            return Ok(false);
        }

        Applications::delete_many()
            .filter(applications::Column::JobId.eq(id))
            .exec(&txn)
            .await?;

        Jobs::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Flips `is_active` off for every active job whose expiry date is before
    /// `today`. Returns the number of rows changed.
    pub async fn deactivate_expired(&self, today: NaiveDate) -> Result<u64> {
        let result = Jobs::update_many()
            .col_expr(jobs::Column::IsActive, Expr::value(false))
            .col_expr(jobs::Column::UpdatedAt, Expr::value(now_timestamp()))
            .filter(jobs::Column::IsActive.eq(true))
            .filter(jobs::Column::ExpiryDate.lt(today))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Jobs flagged active whose expiry date is today or later, newest first.
    pub async fn list_active(
        &self,
        filter: &JobFilter,
        today: NaiveDate,
    ) -> Result<Vec<JobWithCompany>> {
        let mut query = Jobs::find()
            .find_also_related(RecruiterProfiles)
            .filter(jobs::Column::IsActive.eq(true))
            .filter(jobs::Column::ExpiryDate.gte(today));

        if let Some(recruiter_id) = filter.recruiter_id {
            query = query.filter(jobs::Column::RecruiterId.eq(recruiter_id));
        }

        if let Some(location) = &filter.location {
            query = query.filter(jobs::Column::Location.contains(location));
        }

        if let Some(job_type) = filter.job_type {
            query = query.filter(jobs::Column::JobType.eq(job_type.as_str()));
        }

        if let Some(level) = filter.experience_level {
            query = query.filter(jobs::Column::ExperienceLevel.eq(level.as_str()));
        }

        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(jobs::Column::JobTitle.contains(search))
                    .add(jobs::Column::Description.contains(search)),
            );
        }

        query = query
            .order_by_desc(jobs::Column::CreatedAt)
            .order_by_desc(jobs::Column::Id);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        if let Some(offset) = filter.offset {
            query = query.offset(offset);
        }

        let rows = query.all(&self.conn).await?;

        Ok(rows.into_iter().map(JobWithCompany::from).collect())
    }

    /// Every job the recruiter owns, active or not, newest first.
    pub async fn list_for_recruiter(&self, recruiter_id: i32) -> Result<Vec<jobs::Model>> {
        Ok(Jobs::find()
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .order_by_desc(jobs::Column::CreatedAt)
            .order_by_desc(jobs::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn count_active(&self, recruiter_id: Option<i32>, today: NaiveDate) -> Result<u64> {
        let mut query = Jobs::find()
            .filter(jobs::Column::IsActive.eq(true))
            .filter(jobs::Column::ExpiryDate.gte(today));

        if let Some(recruiter_id) = recruiter_id {
            query = query.filter(jobs::Column::RecruiterId.eq(recruiter_id));
        }

        Ok(query.count(&self.conn).await?)
    }

    pub async fn count_for_recruiter(&self, recruiter_id: i32) -> Result<u64> {
        Ok(Jobs::find()
            .filter(jobs::Column::RecruiterId.eq(recruiter_id))
            .count(&self.conn)
            .await?)
    }
}
