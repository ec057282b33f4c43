use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::OtpDispatcher;
use crate::state::SharedState;

mod applications;
pub mod auth;
mod dashboard;
mod error;
mod jobs;
mod observability;
mod password_reset;
mod profiles;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

/// Calendar date used for expiry decisions.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Same as [`create_app_state_from_config`] but reset codes go through
/// `dispatcher` instead of the log.
pub async fn create_app_state_with_dispatcher(
    config: Config,
    dispatcher: Arc<dyn OtpDispatcher>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_dispatcher(config, dispatcher).await?);
    Ok(create_app_state(shared, None))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies, idle_minutes) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
            config.server.session_idle_minutes,
        )
    };

    let protected_routes = create_protected_router();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(idle_minutes)));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/auth/password-reset/request",
            post(password_reset::request_code),
        )
        .route(
            "/auth/password-reset/verify",
            post(password_reset::verify_code),
        )
        .route(
            "/auth/password-reset/complete",
            post(password_reset::complete_reset),
        )
        // Role checks for the write methods happen in the extractors.
        .route("/jobs", get(jobs::browse_jobs).post(jobs::create_job))
        .route(
            "/jobs/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/jobs/{id}/apply", post(jobs::apply_to_job))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .layer(session_layer)
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Routes that need a session. Role-specific handlers additionally check the
/// role through their extractor.
fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/profile", get(profiles::get_profile))
        .route("/profile/seeker", put(profiles::update_seeker_profile))
        .route("/profile/recruiter", put(profiles::update_recruiter_profile))
        .route("/recruiter/jobs", get(jobs::list_recruiter_jobs))
        .route(
            "/recruiter/applications",
            get(applications::list_recruiter_applications),
        )
        .route("/applications", get(applications::list_my_applications))
        .route(
            "/applications/{id}/status",
            put(applications::update_application_status),
        )
        .route("/dashboard/recruiter", get(dashboard::recruiter_dashboard))
        .route("/dashboard/seeker", get(dashboard::seeker_dashboard))
        .route_layer(middleware::from_fn(auth::auth_middleware))
}
