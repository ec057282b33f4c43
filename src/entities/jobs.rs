use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub recruiter_id: i32,

    pub job_title: String,
    pub description: String,
    pub location: String,

    /// One of `crate::domain::JobType`
    pub job_type: String,

    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,

    /// One of `crate::domain::ExperienceLevel`
    pub experience_level: Option<String>,

    pub requirements: Option<String>,
    pub benefits: Option<String>,

    pub expiry_date: Date,

    pub is_active: bool,

    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recruiter_profiles::Entity",
        from = "Column::RecruiterId",
        to = "super::recruiter_profiles::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    RecruiterProfiles,
    #[sea_orm(has_many = "super::applications::Entity")]
    Applications,
}

impl Related<super::recruiter_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecruiterProfiles.def()
    }
}

impl Related<super::applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
