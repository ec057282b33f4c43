use sea_orm::entity::prelude::*;

/// A job seeker's submission against a job. `(job_id, job_seeker_id)` is
/// unique, see `m20240102_add_indexes`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub job_id: i32,

    pub job_seeker_id: i32,

    pub cover_letter: Option<String>,

    pub resume_path: Option<String>,

    /// One of `crate::domain::ApplicationStatus`
    pub status: String,

    pub applied_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Jobs,
    #[sea_orm(
        belongs_to = "super::job_seeker_profiles::Entity",
        from = "Column::JobSeekerId",
        to = "super::job_seeker_profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    JobSeekerProfiles,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jobs.def()
    }
}

impl Related<super::job_seeker_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobSeekerProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
