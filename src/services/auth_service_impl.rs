//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::Config;
use crate::db::{NewAccount, NewProfile, Store, UniqueViolation, User};
use crate::domain::Role;
use crate::services::auth_service::{
    AuthError, AuthService, Registration, SessionUser, UserInfo,
};
use crate::services::validation;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

const MAX_USERNAME_LEN: usize = 150;

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    fn build_account(form: &Registration, role: Role) -> Result<NewAccount, String> {
        match role {
            Role::JobSeeker => {
                let username = validation::required("Username", form.username.as_deref())?;
                validation::max_len("Username", &username, MAX_USERNAME_LEN)?;
                let email = validation::email(
                    "Email",
                    &validation::required("Email", form.email.as_deref())?,
                )?;
                let phone = validation::optional(form.phone.as_deref())
                    .map(|p| validation::phone("Phone", &p))
                    .transpose()?;

                Ok(NewAccount {
                    username,
                    email,
                    profile: NewProfile::JobSeeker {
                        full_name: validation::optional(form.full_name.as_deref()),
                        phone,
                    },
                })
            }
            Role::Recruiter => {
                let company_name =
                    validation::required("Company name", form.company_name.as_deref())?;
                validation::max_len("Company name", &company_name, MAX_USERNAME_LEN)?;
                let company_email = validation::email(
                    "Company email",
                    &validation::required("Company email", form.company_email.as_deref())?,
                )?;
                let company_phone = validation::optional(form.company_phone.as_deref())
                    .map(|p| validation::phone("Company phone", &p))
                    .transpose()?;

                Ok(NewAccount {
                    username: company_name.clone(),
                    email: company_email.clone(),
                    profile: NewProfile::Recruiter {
                        company_name,
                        company_email,
                        company_phone,
                        company_address: validation::optional(form.company_address.as_deref()),
                    },
                })
            }
        }
    }

    fn conflict_message(violation: &UniqueViolation, role: Role) -> String {
        if violation.involves("email") {
            "Email already registered".to_string()
        } else if role == Role::Recruiter {
            "Company name already registered".to_string()
        } else {
            "Username already taken".to_string()
        }
    }
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, form: Registration) -> Result<UserInfo, AuthError> {
        let role = form
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AuthError::Validation("Role is required".to_string()))?
            .parse::<Role>()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let security = self.config.read().await.security.clone();

        let password = form.password.clone().unwrap_or_default();
        validation::password(&password, security.password_min_length)
            .map_err(AuthError::Validation)?;
        if form
            .confirm_password
            .as_deref()
            .is_some_and(|confirm| confirm != password)
        {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        let account = Self::build_account(&form, role).map_err(AuthError::Validation)?;

        let user = match self.store.create_account(account, &password, &security).await {
            Ok(user) => user,
            Err(err) => {
                return Err(match err.downcast_ref::<UniqueViolation>() {
                    Some(violation) => AuthError::Conflict(Self::conflict_message(violation, role)),
                    None => err.into(),
                });
            }
        };

        info!(user_id = user.id, role = %user.role, "Registered new account");

        Ok(user.into())
    }

    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(SessionUser {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    async fn get_user_info(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user.into())
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let security = self.config.read().await.security.clone();

        validation::password(new_password, security.password_min_length)
            .map_err(AuthError::Validation)?;

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let is_valid = self
            .store
            .verify_user_password(&user.username, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation("Current password is incorrect".to_string()));
        }

        self.store
            .update_user_password(user_id, new_password, &security)
            .await?;

        Ok(())
    }
}
