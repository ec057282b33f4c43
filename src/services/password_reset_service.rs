//! Domain service for the one-time-code password reset flow.
//!
//! A code is issued per request and delivered through an [`OtpDispatcher`].
//! Earlier codes stay valid until they expire; verification looks at the
//! most recent record matching both email and code.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PasswordResetError {
    #[error("No account found with that email address")]
    EmailNotFound,

    #[error("Invalid reset code")]
    InvalidCode,

    #[error("Reset code has expired")]
    Expired,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to deliver reset code: {0}")]
    Delivery(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for PasswordResetError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PasswordResetError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResetCompletion {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: Option<String>,
}

/// Delivers a freshly issued code to its owner.
#[async_trait::async_trait]
pub trait OtpDispatcher: Send + Sync {
    async fn dispatch(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Writes codes to the log instead of sending them anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOtpDispatcher;

#[async_trait::async_trait]
impl OtpDispatcher for LogOtpDispatcher {
    async fn dispatch(&self, email: &str, code: &str) -> anyhow::Result<()> {
        info!(email = %email, "Password reset code issued");
        debug!(email = %email, code = %code, "Password reset code");
        Ok(())
    }
}

#[async_trait::async_trait]
pub trait PasswordResetService: Send + Sync {
    /// Issues and dispatches a new code for a registered email.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordResetError::EmailNotFound`] for unknown addresses.
    async fn request_code(&self, email: &str, now: DateTime<Utc>)
    -> Result<(), PasswordResetError>;

    /// # Errors
    ///
    /// Returns [`PasswordResetError::InvalidCode`] when no record matches and
    /// [`PasswordResetError::Expired`] when the newest match is past its TTL.
    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError>;

    /// Re-verifies the code, sets the new password and discards every code
    /// issued for the email.
    async fn complete_reset(
        &self,
        completion: ResetCompletion,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError>;

    /// Deletes codes that can no longer verify. Returns how many were removed.
    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<u64, PasswordResetError>;
}
