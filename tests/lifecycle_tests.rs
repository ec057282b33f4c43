use std::sync::Arc;

use chrono::NaiveDate;
use jobboard::config::Config;
use jobboard::db::JobFilter;
use jobboard::services::{
    ApplyInput, ApplicationError, AuthError, JobError, JobInput, JobQuery, Registration, Scheduler,
};
use jobboard::state::SharedState;
use tokio::sync::RwLock;

fn test_config() -> Config {
    let path = std::env::temp_dir().join(format!("jobboard-life-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.scheduler.enabled = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

async fn register_recruiter(state: &SharedState, company: &str) -> i32 {
    state
        .auth_service
        .register(Registration {
            role: Some("recruiter".to_string()),
            company_name: Some(company.to_string()),
            company_email: Some(format!("jobs@{}.example.com", company.to_lowercase())),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap()
        .id
}

async fn register_seeker(state: &SharedState, username: &str) -> i32 {
    state
        .auth_service
        .register(Registration {
            role: Some("job_seeker".to_string()),
            username: Some(username.to_string()),
            email: Some(format!("{username}@example.com")),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap()
        .id
}

fn job_input(title: &str, expiry: &str) -> JobInput {
    JobInput {
        job_title: Some(title.to_string()),
        description: Some("Keep the lights on".to_string()),
        location: Some("Lisbon".to_string()),
        job_type: Some("contract".to_string()),
        expiry_date: Some(expiry.to_string()),
        ..JobInput::default()
    }
}

#[tokio::test]
async fn test_sweep_deactivates_expired_jobs_once() {
    let state = SharedState::new(test_config()).await.unwrap();
    let recruiter = register_recruiter(&state, "Umbrella").await;

    let expired = state
        .job_service
        .create_job(recruiter, job_input("Night Guard", "2024-01-01"), date("2023-12-01"))
        .await
        .unwrap();
    let due_today = state
        .job_service
        .create_job(recruiter, job_input("Day Guard", "2024-01-02"), date("2023-12-01"))
        .await
        .unwrap();

    let today = date("2024-01-02");

    // The query filters on the date even before any sweep has run.
    let listed = state
        .store
        .list_active_jobs(&JobFilter::default(), today)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].job.id, due_today.id);

    assert_eq!(state.job_service.sweep_expired(today).await.unwrap(), 1);
    assert_eq!(state.job_service.sweep_expired(today).await.unwrap(), 0);

    let err = state
        .job_service
        .get_job(expired.id, None, today)
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::NotFound(_)));

    let owner_view = state
        .job_service
        .get_job(expired.id, Some(recruiter), today)
        .await
        .unwrap();
    assert!(!owner_view.is_active);
    assert!(owner_view.is_expired);

    let browse = state
        .job_service
        .browse(JobQuery::default(), today)
        .await
        .unwrap();
    assert_eq!(browse.len(), 1);
    assert_eq!(browse[0].job_title, "Day Guard");
}

#[tokio::test]
async fn test_new_expiry_date_reactivates_job() {
    let state = SharedState::new(test_config()).await.unwrap();
    let recruiter = register_recruiter(&state, "Stark").await;

    let job = state
        .job_service
        .create_job(recruiter, job_input("Welder", "2024-01-01"), date("2023-12-01"))
        .await
        .unwrap();

    let today = date("2024-02-01");
    state.job_service.sweep_expired(today).await.unwrap();

    let err = state
        .job_service
        .update_job(
            recruiter,
            job.id,
            JobInput {
                is_active: Some(true),
                ..JobInput::default()
            },
            today,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JobError::Validation(_)));

    let updated = state
        .job_service
        .update_job(
            recruiter,
            job.id,
            JobInput {
                expiry_date: Some("2024-03-01".to_string()),
                ..JobInput::default()
            },
            today,
        )
        .await
        .unwrap();
    assert!(updated.is_active);
    assert_eq!(updated.job_title, "Welder");
}

#[tokio::test]
async fn test_cannot_apply_to_expired_job() {
    let state = SharedState::new(test_config()).await.unwrap();
    let recruiter = register_recruiter(&state, "Wayne").await;
    let seeker = register_seeker(&state, "harvey").await;

    let job = state
        .job_service
        .create_job(recruiter, job_input("Butler", "2024-01-01"), date("2023-12-01"))
        .await
        .unwrap();

    let err = state
        .application_service
        .apply(seeker, job.id, ApplyInput::default(), date("2024-01-02"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let application = state
        .application_service
        .apply(seeker, job.id, ApplyInput::default(), date("2024-01-01"))
        .await
        .unwrap();
    assert_eq!(application.status, "pending");
}

#[tokio::test]
async fn test_registration_conflict_leaves_no_partial_user() {
    let state = SharedState::new(test_config()).await.unwrap();
    register_seeker(&state, "ivy").await;

    let err = state
        .auth_service
        .register(Registration {
            role: Some("job_seeker".to_string()),
            username: Some("ivy2".to_string()),
            email: Some("IVY@example.com".to_string()),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(msg) if msg == "Email already registered"));

    assert!(state.store.get_user_by_username("ivy2").await.unwrap().is_none());

    register_recruiter(&state, "Cyberdyne").await;
    let err = state
        .auth_service
        .register(Registration {
            role: Some("recruiter".to_string()),
            company_name: Some("Cyberdyne".to_string()),
            company_email: Some("other@cyberdyne.example.com".to_string()),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict(_)));
    assert!(
        state
            .store
            .get_user_by_email("other@cyberdyne.example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_scheduler_run_once() {
    let config = test_config();
    let scheduler_config = config.scheduler.clone();
    let state = SharedState::new(config).await.unwrap();
    let recruiter = register_recruiter(&state, "Tyrell").await;

    state
        .job_service
        .create_job(recruiter, job_input("Designer", "2020-06-01"), date("2020-01-01"))
        .await
        .unwrap();

    let scheduler = Scheduler::new(Arc::new(RwLock::new(state.clone())), scheduler_config);
    assert!(!scheduler.is_running().await);

    let report = scheduler.run_once().await.unwrap();
    assert_eq!(report.jobs_deactivated, 1);

    let report = scheduler.run_once().await.unwrap();
    assert_eq!(report.jobs_deactivated, 0);
}
