pub mod validation;

pub mod scheduler;
pub use scheduler::{MaintenanceReport, Scheduler};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, Registration, SessionUser, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod password_reset_service;
pub mod password_reset_service_impl;
pub use password_reset_service::{
    LogOtpDispatcher, OtpDispatcher, PasswordResetError, PasswordResetService, ResetCompletion,
};
pub use password_reset_service_impl::SeaOrmPasswordResetService;

pub mod profile_service;
pub mod profile_service_impl;
pub use profile_service::{
    ProfileError, ProfileService, ProfileView, RecruiterProfileDto, RecruiterProfileInput,
    SeekerProfileDto, SeekerProfileInput,
};
pub use profile_service_impl::SeaOrmProfileService;

pub mod job_service;
pub mod job_service_impl;
pub use job_service::{JobDto, JobError, JobInput, JobQuery, JobService, RecruiterJobDto};
pub use job_service_impl::SeaOrmJobService;

pub mod application_service;
pub mod application_service_impl;
pub use application_service::{
    ApplicationDto, ApplicationError, ApplicationQuery, ApplicationService, ApplyInput,
    RecruiterApplicationDto, SeekerApplicationDto,
};
pub use application_service_impl::SeaOrmApplicationService;

pub mod dashboard_service;
pub mod dashboard_service_impl;
pub use dashboard_service::{DashboardError, DashboardService, RecruiterDashboard, SeekerDashboard};
pub use dashboard_service_impl::SeaOrmDashboardService;
