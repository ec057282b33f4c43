//! `SeaORM` implementation of the `ProfileService` trait.

use crate::db::{RecruiterProfileUpdate, SeekerProfileUpdate, Store, UniqueViolation};
use crate::domain::Role;
use crate::services::profile_service::{
    ProfileError, ProfileService, ProfileView, RecruiterProfileDto, RecruiterProfileInput,
    SeekerProfileDto, SeekerProfileInput,
};
use crate::services::validation;
use async_trait::async_trait;

const MAX_EXPERIENCE_YEARS: i32 = 80;

pub struct SeaOrmProfileService {
    store: Store,
}

impl SeaOrmProfileService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Present values are trimmed; a blank value clears the field.
fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

fn seeker_update(input: SeekerProfileInput) -> Result<SeekerProfileUpdate, ProfileError> {
    let phone = trimmed(input.phone)
        .map(|p| {
            if p.is_empty() {
                Ok(p)
            } else {
                validation::phone("Phone", &p)
            }
        })
        .transpose()
        .map_err(ProfileError::Validation)?;

    if input
        .experience_years
        .is_some_and(|years| !(0..=MAX_EXPERIENCE_YEARS).contains(&years))
    {
        return Err(ProfileError::Validation(format!(
            "Experience years must be between 0 and {MAX_EXPERIENCE_YEARS}"
        )));
    }

    Ok(SeekerProfileUpdate {
        full_name: trimmed(input.full_name),
        phone,
        location: trimmed(input.location),
        headline: trimmed(input.headline),
        skills: trimmed(input.skills),
        experience_years: input.experience_years,
        resume_path: trimmed(input.resume_path),
        profile_image: trimmed(input.profile_image),
    })
}

fn recruiter_update(input: RecruiterProfileInput) -> Result<RecruiterProfileUpdate, ProfileError> {
    let company_name = input
        .company_name
        .map(|n| validation::required("Company name", Some(&n)))
        .transpose()
        .map_err(ProfileError::Validation)?;

    let company_email = input
        .company_email
        .map(|e| validation::email("Company email", &e))
        .transpose()
        .map_err(ProfileError::Validation)?;

    let company_phone = trimmed(input.company_phone)
        .map(|p| {
            if p.is_empty() {
                Ok(p)
            } else {
                validation::phone("Company phone", &p)
            }
        })
        .transpose()
        .map_err(ProfileError::Validation)?;

    let company_website = trimmed(input.company_website)
        .map(|w| {
            if w.is_empty() {
                return Ok(w);
            }
            match url::Url::parse(&w) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(w),
                _ => Err(ProfileError::Validation(
                    "Company website must be an http(s) URL".to_string(),
                )),
            }
        })
        .transpose()?;

    Ok(RecruiterProfileUpdate {
        company_name,
        company_email,
        company_phone,
        company_address: trimmed(input.company_address),
        company_website,
        company_description: trimmed(input.company_description),
    })
}

#[async_trait]
impl ProfileService for SeaOrmProfileService {
    async fn get_profile(&self, user_id: i32) -> Result<ProfileView, ProfileError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| ProfileError::NotFound("User".to_string()))?;

        let mut view = ProfileView {
            user: user.clone().into(),
            job_seeker: None,
            recruiter: None,
        };

        match user.role {
            Role::JobSeeker => {
                view.job_seeker = self
                    .store
                    .get_seeker_profile(user_id)
                    .await?
                    .map(SeekerProfileDto::from);
            }
            Role::Recruiter => {
                view.recruiter = self
                    .store
                    .get_recruiter_profile(user_id)
                    .await?
                    .map(RecruiterProfileDto::from);
            }
        }

        Ok(view)
    }

    async fn update_seeker_profile(
        &self,
        user_id: i32,
        input: SeekerProfileInput,
    ) -> Result<SeekerProfileDto, ProfileError> {
        let update = seeker_update(input)?;

        let profile = self
            .store
            .update_seeker_profile(user_id, update)
            .await?
            .ok_or_else(|| ProfileError::NotFound("Job seeker profile".to_string()))?;

        Ok(profile.into())
    }

    async fn update_recruiter_profile(
        &self,
        user_id: i32,
        input: RecruiterProfileInput,
    ) -> Result<RecruiterProfileDto, ProfileError> {
        let update = recruiter_update(input)?;

        let profile = match self.store.update_recruiter_profile(user_id, update).await {
            Ok(profile) => profile,
            Err(err) => {
                return Err(match err.downcast_ref::<UniqueViolation>() {
                    Some(v) if v.involves("email") => {
                        ProfileError::Conflict("Email already registered".to_string())
                    }
                    Some(_) => {
                        ProfileError::Conflict("Company name already registered".to_string())
                    }
                    None => err.into(),
                });
            }
        };

        profile
            .map(RecruiterProfileDto::from)
            .ok_or_else(|| ProfileError::NotFound("Recruiter profile".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeker_update_keeps_absent_fields_absent() {
        let update = seeker_update(SeekerProfileInput {
            headline: Some("  Rustacean ".to_string()),
            ..SeekerProfileInput::default()
        })
        .unwrap();

        assert_eq!(update.headline.as_deref(), Some("Rustacean"));
        assert!(update.full_name.is_none());
        assert!(update.phone.is_none());
    }

    #[test]
    fn seeker_update_validates_phone_and_years() {
        let bad_phone = SeekerProfileInput {
            phone: Some("not a phone".to_string()),
            ..SeekerProfileInput::default()
        };
        assert!(matches!(seeker_update(bad_phone), Err(ProfileError::Validation(_))));

        let bad_years = SeekerProfileInput {
            experience_years: Some(-1),
            ..SeekerProfileInput::default()
        };
        assert!(matches!(seeker_update(bad_years), Err(ProfileError::Validation(_))));

        let cleared = seeker_update(SeekerProfileInput {
            phone: Some("  ".to_string()),
            ..SeekerProfileInput::default()
        })
        .unwrap();
        assert_eq!(cleared.phone.as_deref(), Some(""));
    }

    #[test]
    fn recruiter_update_normalizes_email_and_checks_website() {
        let update = recruiter_update(RecruiterProfileInput {
            company_email: Some(" HR@Acme.io ".to_string()),
            company_website: Some("https://acme.io".to_string()),
            ..RecruiterProfileInput::default()
        })
        .unwrap();
        assert_eq!(update.company_email.as_deref(), Some("hr@acme.io"));

        let bad = RecruiterProfileInput {
            company_website: Some("ftp://acme.io".to_string()),
            ..RecruiterProfileInput::default()
        };
        assert!(matches!(recruiter_update(bad), Err(ProfileError::Validation(_))));
    }

    #[test]
    fn recruiter_update_rejects_blank_company_name() {
        let input = RecruiterProfileInput {
            company_name: Some("   ".to_string()),
            ..RecruiterProfileInput::default()
        };
        assert!(matches!(recruiter_update(input), Err(ProfileError::Validation(_))));
    }
}
