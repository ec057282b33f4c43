//! Job posting endpoints.
//!
//! Browsing and reading single jobs is public. Posting, editing and deleting
//! require a recruiter session and only touch the caller's own jobs.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::{MaybeUser, RecruiterUser, SeekerUser};
use super::validation::{validate_job_id, validate_search_query};
use super::{ApiError, ApiJson, ApiResponse, AppState, MessageResponse, today};
use crate::services::{
    ApplicationDto, ApplyInput, JobDto, JobError, JobInput, JobQuery, RecruiterJobDto,
};

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound(_) => Self::NotFound(err.to_string()),
            JobError::Validation(msg) => Self::validation(msg),
            JobError::Database(msg) => Self::DatabaseError(msg),
            JobError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /jobs
/// Active jobs, newest first. Expired jobs are swept before listing.
pub async fn browse_jobs(
    State(state): State<Arc<AppState>>,
    Query(mut query): Query<JobQuery>,
) -> Result<Json<ApiResponse<Vec<JobDto>>>, ApiError> {
    if let Some(search) = &query.search {
        query.search = Some(validate_search_query(search)?.to_string());
    }

    let jobs = state.shared.job_service.browse(query, today()).await?;
    Ok(Json(ApiResponse::success(jobs)))
}

/// GET /jobs/{id}
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<JobDto>>, ApiError> {
    let id = validate_job_id(id)?;

    let job = state
        .shared
        .job_service
        .get_job(id, viewer.map(|u| u.user_id), today())
        .await?;

    Ok(Json(ApiResponse::success(job)))
}

/// POST /jobs
pub async fn create_job(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    ApiJson(payload): ApiJson<JobInput>,
) -> Result<(StatusCode, Json<ApiResponse<JobDto>>), ApiError> {
    let job = state
        .shared
        .job_service
        .create_job(user.user_id, payload, today())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(job))))
}

/// PUT /jobs/{id}
pub async fn update_job(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<JobInput>,
) -> Result<Json<ApiResponse<JobDto>>, ApiError> {
    let id = validate_job_id(id)?;

    let job = state
        .shared
        .job_service
        .update_job(user.user_id, id, payload, today())
        .await?;

    Ok(Json(ApiResponse::success(job)))
}

/// DELETE /jobs/{id}
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_job_id(id)?;

    state.shared.job_service.delete_job(user.user_id, id).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Job deleted",
    ))))
}

/// POST /jobs/{id}/apply
pub async fn apply_to_job(
    State(state): State<Arc<AppState>>,
    SeekerUser(user): SeekerUser,
    Path(id): Path<i32>,
    ApiJson(input): ApiJson<ApplyInput>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationDto>>), ApiError> {
    let id = validate_job_id(id)?;

    let application = state
        .shared
        .application_service
        .apply(user.user_id, id, input, today())
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(application))))
}

/// GET /recruiter/jobs
/// Every job the recruiter owns, active or not, with application counts.
pub async fn list_recruiter_jobs(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
) -> Result<Json<ApiResponse<Vec<RecruiterJobDto>>>, ApiError> {
    let jobs = state
        .shared
        .job_service
        .list_recruiter_jobs(user.user_id, today())
        .await?;

    Ok(Json(ApiResponse::success(jobs)))
}
