use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A candidate applies to a given job at most once.
        manager
            .create_index(
                Index::create()
                    .name("idx_applications_job_seeker_unique")
                    .table(Applications::Table)
                    .col(Applications::JobId)
                    .col(Applications::JobSeekerId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_active_expiry")
                    .table(Jobs::Table)
                    .col(Jobs::IsActive)
                    .col(Jobs::ExpiryDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_recruiter")
                    .table(Jobs::Table)
                    .col(Jobs::RecruiterId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_password_reset_otps_email")
                    .table(PasswordResetOtps::Table)
                    .col(PasswordResetOtps::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for index in [
            "idx_password_reset_otps_email",
            "idx_jobs_recruiter",
            "idx_jobs_active_expiry",
            "idx_applications_job_seeker_unique",
        ] {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {index}"))
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    JobId,
    JobSeekerId,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    IsActive,
    ExpiryDate,
    RecruiterId,
}

#[derive(DeriveIden)]
enum PasswordResetOtps {
    Table,
    Email,
}
