use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::timestamp;
use crate::entities::{password_reset_otps, prelude::*};

pub struct OtpRepository {
    conn: DatabaseConnection,
}

impl OtpRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stores a new code. Earlier codes for the same email are left alone.
    pub async fn add(
        &self,
        email: &str,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<password_reset_otps::Model> {
        let model = password_reset_otps::ActiveModel {
            email: Set(email.to_string()),
            code: Set(code.to_string()),
            created_at: Set(timestamp(created_at)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    /// Most recently issued record carrying this exact (email, code) pair.
    pub async fn latest_matching(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<password_reset_otps::Model>> {
        Ok(PasswordResetOtps::find()
            .filter(password_reset_otps::Column::Email.eq(email))
            .filter(password_reset_otps::Column::Code.eq(code))
            .order_by_desc(password_reset_otps::Column::CreatedAt)
            .order_by_desc(password_reset_otps::Column::Id)
            .one(&self.conn)
            .await?)
    }

    pub async fn count_for_email(&self, email: &str) -> Result<u64> {
        Ok(PasswordResetOtps::find()
            .filter(password_reset_otps::Column::Email.eq(email))
            .count(&self.conn)
            .await?)
    }

    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let result = PasswordResetOtps::delete_many()
            .filter(password_reset_otps::Column::CreatedAt.lt(timestamp(cutoff)))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
