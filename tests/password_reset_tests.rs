use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, TimeZone, Utc};
use jobboard::config::Config;
use jobboard::services::{OtpDispatcher, PasswordResetError, Registration, ResetCompletion};
use jobboard::state::SharedState;
use serde_json::json;
use tower::ServiceExt;

#[derive(Default)]
struct RecordingDispatcher {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingDispatcher {
    fn last_code(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, code)| code.clone())
    }
}

#[async_trait::async_trait]
impl OtpDispatcher for RecordingDispatcher {
    async fn dispatch(&self, email: &str, code: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

fn test_config() -> Config {
    let path = std::env::temp_dir().join(format!("jobboard-otp-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.server.secure_cookies = false;
    config.scheduler.enabled = false;
    config.observability.metrics_enabled = false;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config
}

async fn setup() -> (SharedState, Arc<RecordingDispatcher>) {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let state = SharedState::with_dispatcher(test_config(), dispatcher.clone())
        .await
        .unwrap();

    state
        .auth_service
        .register(Registration {
            role: Some("job_seeker".to_string()),
            username: Some("jane".to_string()),
            email: Some("jane@example.com".to_string()),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap();

    (state, dispatcher)
}

#[tokio::test]
async fn test_request_code_for_unknown_email() {
    let (state, dispatcher) = setup().await;

    let err = state
        .password_reset_service
        .request_code("nobody@example.com", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::EmailNotFound));
    assert!(dispatcher.last_code().is_none());
}

#[tokio::test]
async fn test_code_expires_after_ttl() {
    let (state, _) = setup().await;
    let issued = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    state
        .store
        .add_reset_code("jane@example.com", "123456", issued)
        .await
        .unwrap();

    let service = &state.password_reset_service;

    service
        .verify_code("jane@example.com", "123456", issued + Duration::seconds(599))
        .await
        .unwrap();

    service
        .verify_code("jane@example.com", "123456", issued + Duration::minutes(10))
        .await
        .unwrap();

    let err = service
        .verify_code("jane@example.com", "123456", issued + Duration::seconds(601))
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::Expired));

    let err = service
        .verify_code("jane@example.com", "654321", issued)
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::InvalidCode));

    let err = service
        .verify_code("jane@example.com", "12ab56", issued)
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::InvalidCode));
}

#[tokio::test]
async fn test_most_recent_matching_code_wins() {
    let (state, _) = setup().await;
    let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let second = first + Duration::minutes(30);

    state
        .store
        .add_reset_code("jane@example.com", "111111", first)
        .await
        .unwrap();
    state
        .store
        .add_reset_code("jane@example.com", "111111", second)
        .await
        .unwrap();

    // The old record alone would be expired by now.
    state
        .password_reset_service
        .verify_code("jane@example.com", "111111", second + Duration::minutes(5))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_complete_reset_clears_codes() {
    let (state, dispatcher) = setup().await;
    let now = Utc::now();

    state
        .password_reset_service
        .request_code("Jane@Example.com", now)
        .await
        .unwrap();
    state
        .password_reset_service
        .request_code("jane@example.com", now)
        .await
        .unwrap();
    assert_eq!(state.store.count_reset_codes("jane@example.com").await.unwrap(), 2);

    let code = dispatcher.last_code().unwrap();

    let err = state
        .password_reset_service
        .complete_reset(
            ResetCompletion {
                email: "jane@example.com".to_string(),
                code: code.clone(),
                new_password: "brandnew1".to_string(),
                confirm_password: Some("different".to_string()),
            },
            now,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::Validation(_)));

    state
        .password_reset_service
        .complete_reset(
            ResetCompletion {
                email: "jane@example.com".to_string(),
                code: code.clone(),
                new_password: "brandnew1".to_string(),
                confirm_password: Some("brandnew1".to_string()),
            },
            now,
        )
        .await
        .unwrap();

    assert_eq!(state.store.count_reset_codes("jane@example.com").await.unwrap(), 0);
    assert!(state.auth_service.login("jane", "brandnew1").await.is_ok());
    assert!(state.auth_service.login("jane", "secret123").await.is_err());

    let err = state
        .password_reset_service
        .verify_code("jane@example.com", &code, now)
        .await
        .unwrap_err();
    assert!(matches!(err, PasswordResetError::InvalidCode));
}

#[tokio::test]
async fn test_prune_expired_codes() {
    let (state, _) = setup().await;
    let now = Utc::now();

    state
        .store
        .add_reset_code("jane@example.com", "222222", now - Duration::hours(2))
        .await
        .unwrap();
    state
        .store
        .add_reset_code("jane@example.com", "333333", now)
        .await
        .unwrap();

    let pruned = state.password_reset_service.prune_expired(now).await.unwrap();
    assert_eq!(pruned, 1);
    assert_eq!(state.store.count_reset_codes("jane@example.com").await.unwrap(), 1);
}

#[tokio::test]
async fn test_reset_flow_over_http() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let state = jobboard::api::create_app_state_with_dispatcher(test_config(), dispatcher.clone())
        .await
        .unwrap();
    state
        .shared
        .auth_service
        .register(Registration {
            role: Some("job_seeker".to_string()),
            username: Some("kim".to_string()),
            email: Some("kim@example.com".to_string()),
            password: Some("secret123".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap();
    let app = jobboard::api::router(state).await;

    let post = |uri: &str, body: serde_json::Value| {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/password-reset/request",
            json!({ "email": "ghost@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/password-reset/request",
            json!({ "email": "kim@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let code = dispatcher.last_code().unwrap();

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/password-reset/verify",
            json!({ "email": "kim@example.com", "code": "000000" }),
        ))
        .await
        .unwrap();
    if code != "000000" {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/password-reset/verify",
            json!({ "email": "kim@example.com", "code": code }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/password-reset/complete",
            json!({
                "email": "kim@example.com",
                "code": code,
                "new_password": "fresh-pass",
                "confirm_password": "fresh-pass",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post(
            "/api/auth/login",
            json!({ "username": "kim", "password": "fresh-pass" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
