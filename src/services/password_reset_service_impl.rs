//! `SeaORM` implementation of the `PasswordResetService` trait.

use crate::config::Config;
use crate::db::{Store, parse_timestamp};
use crate::domain::otp;
use crate::services::password_reset_service::{
    OtpDispatcher, PasswordResetError, PasswordResetService, ResetCompletion,
};
use crate::services::validation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct SeaOrmPasswordResetService {
    store: Store,
    config: Arc<RwLock<Config>>,
    dispatcher: Arc<dyn OtpDispatcher>,
}

impl SeaOrmPasswordResetService {
    #[must_use]
    pub fn new(
        store: Store,
        config: Arc<RwLock<Config>>,
        dispatcher: Arc<dyn OtpDispatcher>,
    ) -> Self {
        Self {
            store,
            config,
            dispatcher,
        }
    }

    fn normalize_email(email: &str) -> Result<String, PasswordResetError> {
        validation::email("Email", email).map_err(PasswordResetError::Validation)
    }

    async fn check_code(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError> {
        let code = code.trim();
        if !otp::is_well_formed(code) {
            return Err(PasswordResetError::InvalidCode);
        }

        let record = self
            .store
            .latest_reset_code(email, code)
            .await?
            .ok_or(PasswordResetError::InvalidCode)?;

        let created_at = parse_timestamp(&record.created_at)?;
        let ttl = self.config.read().await.otp_ttl();

        if otp::is_expired(created_at, now, ttl) {
            return Err(PasswordResetError::Expired);
        }

        Ok(())
    }
}

#[async_trait]
impl PasswordResetService for SeaOrmPasswordResetService {
    async fn request_code(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError> {
        let email = Self::normalize_email(email)?;

        if self.store.get_user_by_email(&email).await?.is_none() {
            return Err(PasswordResetError::EmailNotFound);
        }

        let code = otp::generate_code();
        self.store.add_reset_code(&email, &code, now).await?;

        self.dispatcher
            .dispatch(&email, &code)
            .await
            .map_err(|e| PasswordResetError::Delivery(e.to_string()))?;

        metrics::counter!("password_reset_codes_issued_total").increment(1);

        Ok(())
    }

    async fn verify_code(
        &self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError> {
        let email = Self::normalize_email(email)?;
        self.check_code(&email, code, now).await
    }

    async fn complete_reset(
        &self,
        completion: ResetCompletion,
        now: DateTime<Utc>,
    ) -> Result<(), PasswordResetError> {
        let email = Self::normalize_email(&completion.email)?;
        self.check_code(&email, &completion.code, now).await?;

        let security = self.config.read().await.security.clone();
        validation::password(&completion.new_password, security.password_min_length)
            .map_err(PasswordResetError::Validation)?;

        if completion
            .confirm_password
            .as_deref()
            .is_some_and(|confirm| confirm != completion.new_password)
        {
            return Err(PasswordResetError::Validation(
                "Passwords do not match".to_string(),
            ));
        }

        if self.store.get_user_by_email(&email).await?.is_none() {
            warn!(email = %email, "Reset code matched an address with no account");
            return Err(PasswordResetError::EmailNotFound);
        }

        let cleared = self
            .store
            .reset_password_and_clear_codes(&email, &completion.new_password, &security)
            .await?;

        info!(email = %email, cleared_codes = cleared, "Password reset completed");

        Ok(())
    }

    async fn prune_expired(&self, now: DateTime<Utc>) -> Result<u64, PasswordResetError> {
        let ttl = self.config.read().await.otp_ttl();
        Ok(self.store.prune_reset_codes(now - ttl).await?)
    }
}
