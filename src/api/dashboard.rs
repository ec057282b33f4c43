use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::{RecruiterUser, SeekerUser};
use super::{ApiError, ApiResponse, AppState, today};
use crate::services::{DashboardError, RecruiterDashboard, SeekerDashboard};

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::NotFound(_) => Self::NotFound(err.to_string()),
            DashboardError::Database(msg) => Self::DatabaseError(msg),
            DashboardError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /dashboard/recruiter
pub async fn recruiter_dashboard(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
) -> Result<Json<ApiResponse<RecruiterDashboard>>, ApiError> {
    let dashboard = state
        .shared
        .dashboard_service
        .recruiter_dashboard(user.user_id, today())
        .await?;

    Ok(Json(ApiResponse::success(dashboard)))
}

/// GET /dashboard/seeker
pub async fn seeker_dashboard(
    State(state): State<Arc<AppState>>,
    SeekerUser(user): SeekerUser,
) -> Result<Json<ApiResponse<SeekerDashboard>>, ApiError> {
    let dashboard = state
        .shared
        .dashboard_service
        .seeker_dashboard(user.user_id, today())
        .await?;

    Ok(Json(ApiResponse::success(dashboard)))
}
