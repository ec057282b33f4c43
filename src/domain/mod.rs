//! Domain types for the job board with strong typing.
//!
//! Roles, job and application enums, and the lifecycle rules that the
//! services and repositories build on. Everything in here is pure: no
//! database access and no clock reads, "now" is always passed in.

pub mod application;
pub mod job;
pub mod otp;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use application::ApplicationStatus;
pub use job::{ExperienceLevel, JobType, SalaryRange};

/// Account role. Each role owns exactly one kind of profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "jobseeker")]
    JobSeeker,
    Recruiter,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JobSeeker => "job_seeker",
            Self::Recruiter => "recruiter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Allowed values: {}",
            self.kind,
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "job_seeker" | "jobseeker" => Ok(Self::JobSeeker),
            "recruiter" => Ok(Self::Recruiter),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
                allowed: &["job_seeker", "recruiter"],
            }),
        }
    }
}
