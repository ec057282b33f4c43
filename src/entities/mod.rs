pub mod prelude;

pub mod applications;
pub mod job_seeker_profiles;
pub mod jobs;
pub mod password_reset_otps;
pub mod recruiter_profiles;
pub mod users;
