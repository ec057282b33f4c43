pub use super::applications::Entity as Applications;
pub use super::job_seeker_profiles::Entity as JobSeekerProfiles;
pub use super::jobs::Entity as Jobs;
pub use super::password_reset_otps::Entity as PasswordResetOtps;
pub use super::recruiter_profiles::Entity as RecruiterProfiles;
pub use super::users::Entity as Users;
