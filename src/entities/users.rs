use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Login identifier. Recruiters sign in with their company name.
    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// `job_seeker` or `recruiter`
    pub role: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::job_seeker_profiles::Entity")]
    JobSeekerProfiles,
    #[sea_orm(has_one = "super::recruiter_profiles::Entity")]
    RecruiterProfiles,
}

impl Related<super::job_seeker_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobSeekerProfiles.def()
    }
}

impl Related<super::recruiter_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecruiterProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
