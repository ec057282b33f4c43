use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::db::{map_db_err, now_timestamp};
use crate::entities::{job_seeker_profiles, prelude::*, recruiter_profiles, users};

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct SeekerProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<i32>,
    pub resume_path: Option<String>,
    pub profile_image: Option<String>,
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct RecruiterProfileUpdate {
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub company_description: Option<String>,
}

pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_seeker_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<job_seeker_profiles::Model>> {
        Ok(JobSeekerProfiles::find()
            .filter(job_seeker_profiles::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await?)
    }

    pub async fn get_recruiter_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<recruiter_profiles::Model>> {
        Ok(RecruiterProfiles::find()
            .filter(recruiter_profiles::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await?)
    }

    pub async fn update_seeker(
        &self,
        user_id: i32,
        update: SeekerProfileUpdate,
    ) -> Result<Option<job_seeker_profiles::Model>> {
        let Some(profile) = self.get_seeker_by_user(user_id).await? else {
            return Ok(None);
        };

        let mut active: job_seeker_profiles::ActiveModel = profile.into();
        if let Some(v) = update.full_name {
            active.full_name = Set(Some(v));
        }
        if let Some(v) = update.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = update.location {
            active.location = Set(Some(v));
        }
        if let Some(v) = update.headline {
            active.headline = Set(Some(v));
        }
        if let Some(v) = update.skills {
            active.skills = Set(Some(v));
        }
        if let Some(v) = update.experience_years {
            active.experience_years = Set(Some(v));
        }
        if let Some(v) = update.resume_path {
            active.resume_path = Set(Some(v));
        }
        if let Some(v) = update.profile_image {
            active.profile_image = Set(Some(v));
        }
        active.updated_at = Set(now_timestamp());

        Ok(Some(active.update(&self.conn).await?))
    }

    /// Company name and email double as the account's username and email,
    /// so changing them rewrites the user row in the same transaction.
    pub async fn update_recruiter(
        &self,
        user_id: i32,
        update: RecruiterProfileUpdate,
    ) -> Result<Option<recruiter_profiles::Model>> {
        let txn = self.conn.begin().await?;

        let Some(profile) = RecruiterProfiles::find()
            .filter(recruiter_profiles::Column::UserId.eq(user_id))
            .one(&txn)
            .await?
        else {
            return Ok(None);
        };

        let now = now_timestamp();

        if update.company_name.is_some() || update.company_email.is_some() {
            let user = Users::find_by_id(user_id)
                .one(&txn)
                .await?
                .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

            let mut user_active: users::ActiveModel = user.into();
            if let Some(name) = &update.company_name {
                user_active.username = Set(name.clone());
            }
            if let Some(email) = &update.company_email {
                user_active.email = Set(email.clone());
            }
            user_active.updated_at = Set(now.clone());
            user_active.update(&txn).await.map_err(map_db_err)?;
        }

        let mut active: recruiter_profiles::ActiveModel = profile.into();
        if let Some(v) = update.company_name {
            active.company_name = Set(v);
        }
        if let Some(v) = update.company_email {
            active.company_email = Set(v);
        }
        if let Some(v) = update.company_phone {
            active.company_phone = Set(Some(v));
        }
        if let Some(v) = update.company_address {
            active.company_address = Set(Some(v));
        }
        if let Some(v) = update.company_website {
            active.company_website = Set(Some(v));
        }
        if let Some(v) = update.company_description {
            active.company_description = Set(Some(v));
        }
        active.updated_at = Set(now);

        let updated = active.update(&txn).await.map_err(map_db_err)?;
        txn.commit().await?;

        Ok(Some(updated))
    }
}
