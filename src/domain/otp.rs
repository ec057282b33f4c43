//! One-time password reset codes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

pub const CODE_LENGTH: usize = 6;

/// Generates a zero-padded six digit numeric code.
#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let value: u32 = rng.random_range(0..1_000_000);
    format!("{value:06}")
}

/// Codes are six ASCII digits. Anything else can never match a stored code.
#[must_use]
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// A code is expired once strictly more than `ttl` has elapsed since issuance.
#[must_use]
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    now - created_at > ttl
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert!(is_well_formed(&code), "bad code {code}");
        }
    }

    #[test]
    fn well_formed_rejects_letters_and_lengths() {
        assert!(is_well_formed("012345"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("1234567"));
        assert!(!is_well_formed("12a456"));
    }

    #[test]
    fn code_is_valid_just_under_ttl_and_expired_just_over() {
        let created = Utc::now();
        let ttl = Duration::minutes(10);

        let almost = created + Duration::minutes(9) + Duration::seconds(59);
        assert!(!is_expired(created, almost, ttl));

        let exact = created + ttl;
        assert!(!is_expired(created, exact, ttl));

        let over = created + ttl + Duration::milliseconds(1);
        assert!(is_expired(created, over, ttl));
    }
}
