use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::{AuthUser, RecruiterUser, SeekerUser};
use super::{ApiError, ApiJson, ApiResponse, AppState};
use crate::services::{
    ProfileError, ProfileView, RecruiterProfileDto, RecruiterProfileInput, SeekerProfileDto,
    SeekerProfileInput,
};

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(_) => Self::NotFound(err.to_string()),
            ProfileError::Validation(msg) => Self::validation(msg),
            ProfileError::Conflict(msg) => Self::Conflict(msg),
            ProfileError::Database(msg) => Self::DatabaseError(msg),
            ProfileError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    let view = state.shared.profile_service.get_profile(user.user_id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// PUT /profile/seeker
pub async fn update_seeker_profile(
    State(state): State<Arc<AppState>>,
    SeekerUser(user): SeekerUser,
    ApiJson(payload): ApiJson<SeekerProfileInput>,
) -> Result<Json<ApiResponse<SeekerProfileDto>>, ApiError> {
    let profile = state
        .shared
        .profile_service
        .update_seeker_profile(user.user_id, payload)
        .await?;

    Ok(Json(ApiResponse::success(profile)))
}

/// PUT /profile/recruiter
///
/// Renaming the company changes the login username, so the session is not
/// touched here; the next login uses the new name.
pub async fn update_recruiter_profile(
    State(state): State<Arc<AppState>>,
    RecruiterUser(user): RecruiterUser,
    ApiJson(payload): ApiJson<RecruiterProfileInput>,
) -> Result<Json<ApiResponse<RecruiterProfileDto>>, ApiError> {
    let profile = state
        .shared
        .profile_service
        .update_recruiter_profile(user.user_id, payload)
        .await?;

    Ok(Json(ApiResponse::success(profile)))
}
