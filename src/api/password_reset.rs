//! Password reset endpoints.
//!
//! `request` issues a one-time code for a registered email, `verify` checks a
//! code without consuming it, and `complete` sets the new password and
//! discards every outstanding code for the address.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiJson, ApiResponse, AppState, MessageResponse};
use crate::services::{PasswordResetError, ResetCompletion};

impl From<PasswordResetError> for ApiError {
    fn from(err: PasswordResetError) -> Self {
        match err {
            PasswordResetError::EmailNotFound => Self::NotFound(err.to_string()),
            PasswordResetError::InvalidCode => Self::validation(err.to_string()),
            PasswordResetError::Expired => Self::Gone(err.to_string()),
            PasswordResetError::Validation(msg) => Self::validation(msg),
            PasswordResetError::Database(msg) => Self::DatabaseError(msg),
            PasswordResetError::Delivery(msg) | PasswordResetError::Internal(msg) => {
                Self::internal(msg)
            }
        }
    }
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// POST /auth/password-reset/request
pub async fn request_code(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ResetRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .shared
        .password_reset_service
        .request_code(&payload.email, Utc::now())
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "A reset code has been sent to your email",
    ))))
}

/// POST /auth/password-reset/verify
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<VerifyRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .shared
        .password_reset_service
        .verify_code(&payload.email, &payload.code, Utc::now())
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Code verified",
    ))))
}

/// POST /auth/password-reset/complete
pub async fn complete_reset(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ResetCompletion>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .shared
        .password_reset_service
        .complete_reset(payload, Utc::now())
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Password has been reset",
    ))))
}
