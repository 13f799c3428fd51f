//! Generated student credentials.
//!
//! Student numbers double as the student's login handle and as the
//! local-part of the synthetic email registered with the identity provider.
//! The one-time password is returned exactly once in the enrolment response
//! and never persisted in plaintext.

use rand::Rng;

/// Prefix on every generated student number.
pub const STUDENT_NUMBER_PREFIX: &str = "STU";

/// Length of generated one-time passwords.
pub const ONE_TIME_PASSWORD_LEN: usize = 12;

/// Alphabet for one-time passwords. Omits visually ambiguous characters
/// (0/O, 1/l/I) since guardians transcribe these by hand.
const PASSWORD_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789";

/// Generate a student number from a millisecond timestamp.
///
/// Format: `STU` followed by the last six digits of the timestamp,
/// zero-padded. Matches `^STU\d{6}$`.
pub fn student_number(now_ms: i64) -> String {
    format!("{STUDENT_NUMBER_PREFIX}{:06}", now_ms.rem_euclid(1_000_000))
}

/// Generate a random one-time password of `len` characters.
pub fn one_time_password(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..PASSWORD_ALPHABET.len());
            PASSWORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Build the synthetic identity email for a student number.
pub fn synthetic_student_email(student_number: &str, domain: &str) -> String {
    format!("{student_number}@{domain}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn student_number_format() {
        let re = Regex::new(r"^STU\d{6}$").unwrap();
        for ms in [0_i64, 1_700_000_123_456, 999_999, 1_000_000, 123] {
            let number = student_number(ms);
            assert!(re.is_match(&number), "bad student number: {number}");
        }
    }

    #[test]
    fn student_number_uses_last_six_digits() {
        assert_eq!(student_number(1_700_000_123_456), "STU123456");
        assert_eq!(student_number(42), "STU000042");
    }

    #[test]
    fn one_time_password_length_and_charset() {
        let password = one_time_password(ONE_TIME_PASSWORD_LEN);
        assert_eq!(password.len(), ONE_TIME_PASSWORD_LEN);
        assert!(password
            .bytes()
            .all(|b| PASSWORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn one_time_passwords_differ() {
        // Collisions over 32 chars of a 55-symbol alphabet are negligible.
        let a = one_time_password(32);
        let b = one_time_password(32);
        assert_ne!(a, b);
    }

    #[test]
    fn synthetic_email_shape() {
        assert_eq!(
            synthetic_student_email("STU123456", "students.crestwood.edu.au"),
            "STU123456@students.crestwood.edu.au"
        );
    }
}
