use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{RecruiterUser, SeekerUser};
use super::validation::{validate_application_id, validate_job_id};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::services::{
    ApplicationDto, ApplicationError, ApplicationQuery, RecruiterApplicationDto,
    SeekerApplicationDto,
};

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(_) => Self::NotFound(err.to_string()),
            ApplicationError::Validation(msg) => Self::validation(msg),
            ApplicationError::Conflict(msg) => Self::Conflict(msg),
            ApplicationError::Database(msg) => Self::DatabaseError(msg),
            ApplicationError::Internal(msg) => Self::internal(msg),
        }
    }
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// GET /applications
/// The job seeker's own applications, newest first.
pub async fn list_my_applications(
    State(state): State<Arc<AppState>>,
    SeekerUser(user): SeekerUser,
) -> Result<Json<ApiResponse<Vec<SeekerApplicationDto>>>, ApiError> {
    let applications = state
        .shared
        .application_service
        .list_for_seeker(user.user_id)
        .await?;

    Ok(Json(ApiResponse::success(applications)))
}

/// GET /recruiter/applications?job_id=&status=
pub async fn list_recruiter_applications(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    Query(query): Query<ApplicationQuery>,
) -> Result<Json<ApiResponse<Vec<RecruiterApplicationDto>>>, ApiError> {
    if let Some(job_id) = query.job_id {
        validate_job_id(job_id)?;
    }

    let applications = state
        .shared
        .application_service
        .list_for_recruiter(user.user_id, query)
        .await?;

    Ok(Json(ApiResponse::success(applications)))
}

/// PUT /applications/{id}/status
pub async fn update_application_status(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<ApplicationDto>>, ApiError> {
    let id = validate_application_id(id)?;

    let application = state
        .shared
        .application_service
        .update_status(user.user_id, id, &payload.status)
        .await?;

    Ok(Json(ApiResponse::success(application)))
}
