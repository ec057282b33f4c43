//! Job posting enums and the expiry rules.
//!
//! A job expiring on day `D` is still listed on `D` and becomes inactive from
//! `D + 1` onwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "full-time")]
    FullTime,
    #[serde(rename = "part-time")]
    PartTime,
    #[serde(rename = "contract")]
    Contract,
    #[serde(rename = "internship")]
    Internship,
    #[serde(rename = "remote")]
    Remote,
    #[serde(rename = "hybrid")]
    Hybrid,
}

impl JobType {
    pub const ALL: &'static [&'static str] = &[
        "full-time",
        "part-time",
        "contract",
        "internship",
        "remote",
        "hybrid",
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
            Self::Remote => "remote",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full-time" => Ok(Self::FullTime),
            "part-time" => Ok(Self::PartTime),
            "contract" => Ok(Self::Contract),
            "internship" => Ok(Self::Internship),
            "remote" => Ok(Self::Remote),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(UnknownVariant {
                kind: "job type",
                value: other.to_string(),
                allowed: Self::ALL,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub const ALL: &'static [&'static str] = &["entry", "mid", "senior", "executive"];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Executive => "executive",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entry" => Ok(Self::Entry),
            "mid" => Ok(Self::Mid),
            "senior" => Ok(Self::Senior),
            "executive" => Ok(Self::Executive),
            other => Err(UnknownVariant {
                kind: "experience level",
                value: other.to_string(),
                allowed: Self::ALL,
            }),
        }
    }
}

/// Optional salary bounds. Both ends are inclusive and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalaryRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SalaryRange {
    /// # Errors
    ///
    /// Returns a message when a bound is negative or not finite, or when
    /// `min > max`.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, String> {
        for (label, value) in [("salary_min", min), ("salary_max", max)] {
            if let Some(v) = value
                && (!v.is_finite() || v < 0.0)
            {
                return Err(format!("{label} must be a non-negative number"));
            }
        }

        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err("salary_min cannot be greater than salary_max".to_string());
        }

        Ok(Self { min, max })
    }
}

/// True once the calendar day is past the expiry date.
#[must_use]
pub fn is_expired(expiry_date: NaiveDate, today: NaiveDate) -> bool {
    expiry_date < today
}

/// Whether the sweep must flip this row to inactive.
#[must_use]
pub fn needs_deactivation(is_active: bool, expiry_date: NaiveDate, today: NaiveDate) -> bool {
    is_active && is_expired(expiry_date, today)
}

/// The listing predicate: flagged active and not past expiry.
#[must_use]
pub fn is_listed(is_active: bool, expiry_date: NaiveDate, today: NaiveDate) -> bool {
    is_active && !is_expired(expiry_date, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn job_expiring_today_is_still_listed() {
        let today = date(2024, 1, 1);
        assert!(!is_expired(today, today));
        assert!(is_listed(true, today, today));
        assert!(!needs_deactivation(true, today, today));
    }

    #[test]
    fn job_expired_yesterday_needs_deactivation() {
        let expiry = date(2024, 1, 1);
        let today = date(2024, 1, 2);
        assert!(is_expired(expiry, today));
        assert!(needs_deactivation(true, expiry, today));
        assert!(!is_listed(true, expiry, today));
    }

    #[test]
    fn inactive_job_is_never_listed_or_swept() {
        let expiry = date(2030, 1, 1);
        let today = date(2024, 1, 1);
        assert!(!is_listed(false, expiry, today));
        assert!(!needs_deactivation(false, date(2020, 1, 1), today));
    }

    #[test]
    fn salary_range_rejects_inverted_bounds() {
        assert!(SalaryRange::new(Some(50_000.0), Some(40_000.0)).is_err());
        assert!(SalaryRange::new(Some(40_000.0), Some(40_000.0)).is_ok());
        assert!(SalaryRange::new(None, Some(10.0)).is_ok());
        assert!(SalaryRange::new(Some(-1.0), None).is_err());
        assert!(SalaryRange::new(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn job_type_parses_hyphenated_names() {
        assert_eq!("full-time".parse::<JobType>().unwrap(), JobType::FullTime);
        assert_eq!("hybrid".parse::<JobType>().unwrap(), JobType::Hybrid);
        assert!("fulltime".parse::<JobType>().is_err());
        for name in JobType::ALL {
            assert_eq!(name.parse::<JobType>().unwrap().as_str(), *name);
        }
    }

    #[test]
    fn experience_level_parses() {
        assert_eq!(
            "senior".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Senior
        );
        assert!("guru".parse::<ExperienceLevel>().is_err());
    }
}
