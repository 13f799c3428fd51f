//! Guardian and student form state with per-step validation gates.
//!
//! The validators return a list of [`FieldError`]s rather than failing fast
//! so every problem on a step can be surfaced inline at once. The same
//! primitives back the server-side payload validation in the API crate.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::FieldError;
use crate::types::RelationshipType;

// ---------------------------------------------------------------------------
// Field primitives
// ---------------------------------------------------------------------------

/// Minimum digits a phone number must contain after stripping formatting.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Length of a valid postcode.
pub const POSTCODE_LEN: usize = 4;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // RFC-shaped, not RFC-complete: one @, a dot in the domain, no spaces.
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}

/// Whether a string looks like an email address.
pub fn is_rfc_shaped_email(s: &str) -> bool {
    email_regex().is_match(s)
}

/// Count the digits in a string, ignoring all other characters.
pub fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

/// Whether a string is a valid 4-digit postcode.
pub fn is_valid_postcode(s: &str) -> bool {
    s.len() == POSTCODE_LEN && s.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Guardian form
// ---------------------------------------------------------------------------

/// Guardian (parent) step state. Held in memory only; never persisted.
#[derive(Debug, Clone, Default)]
pub struct GuardianForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub relationship: Option<RelationshipType>,
    pub password: String,
    pub password_confirm: String,
    pub referral_source: String,
    pub occupation: String,
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
}

/// Validate the parent step gate.
pub fn validate_parent(form: &GuardianForm, min_password_len: usize) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if form.first_name.trim().is_empty() {
        errors.push(FieldError::new("parent.firstName", "First name is required"));
    }
    if form.last_name.trim().is_empty() {
        errors.push(FieldError::new("parent.lastName", "Last name is required"));
    }
    if !is_rfc_shaped_email(&form.email) {
        errors.push(FieldError::new(
            "parent.email",
            "Enter a valid email address",
        ));
    }
    if digit_count(&form.phone) < MIN_PHONE_DIGITS {
        errors.push(FieldError::new(
            "parent.phone",
            format!("Phone number must contain at least {MIN_PHONE_DIGITS} digits"),
        ));
    }
    if form.relationship.is_none() {
        errors.push(FieldError::new(
            "parent.relationship",
            "Select your relationship to the student",
        ));
    }
    if form.password.len() < min_password_len {
        errors.push(FieldError::new(
            "parent.password",
            format!("Password must be at least {min_password_len} characters long"),
        ));
    } else if form.password != form.password_confirm {
        errors.push(FieldError::new(
            "parent.passwordConfirm",
            "Passwords do not match",
        ));
    }
    if form.referral_source.trim().is_empty() {
        errors.push(FieldError::new(
            "parent.referralSource",
            "Let us know how you heard about us",
        ));
    }
    if form.street.trim().is_empty() {
        errors.push(FieldError::new("parent.street", "Street address is required"));
    }
    if form.suburb.trim().is_empty() {
        errors.push(FieldError::new("parent.suburb", "Suburb is required"));
    }
    if !is_valid_postcode(&form.postcode) {
        errors.push(FieldError::new(
            "parent.postcode",
            "Postcode must be 4 digits",
        ));
    }
    if form.state.trim().is_empty() {
        errors.push(FieldError::new("parent.state", "Select a state"));
    }

    errors
}

// ---------------------------------------------------------------------------
// Student form
// ---------------------------------------------------------------------------

/// Student step state.
#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub school_name: String,
    pub grade_level: Option<i32>,
}

/// Lowest grade level the academy enrols.
pub const MIN_GRADE_LEVEL: i32 = 7;

/// Highest grade level the academy enrols.
pub const MAX_GRADE_LEVEL: i32 = 12;

/// Validate the student step gate.
pub fn validate_student(form: &StudentForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError::new("student.name", "Student name is required"));
    }
    if form.gender.trim().is_empty() {
        errors.push(FieldError::new("student.gender", "Select a gender"));
    }
    if form.date_of_birth.is_none() {
        errors.push(FieldError::new(
            "student.dateOfBirth",
            "Date of birth is required",
        ));
    }
    if form.school_name.trim().is_empty() {
        errors.push(FieldError::new(
            "student.schoolName",
            "School name is required",
        ));
    }
    match form.grade_level {
        None => errors.push(FieldError::new(
            "student.gradeLevel",
            "Select a grade level",
        )),
        Some(grade) if !(MIN_GRADE_LEVEL..=MAX_GRADE_LEVEL).contains(&grade) => {
            errors.push(FieldError::new(
                "student.gradeLevel",
                format!("Grade level must be between {MIN_GRADE_LEVEL} and {MAX_GRADE_LEVEL}"),
            ));
        }
        Some(_) => {}
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_guardian() -> GuardianForm {
        GuardianForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "(04) 1234 5678".into(),
            relationship: Some(RelationshipType::Mother),
            password: "longenough".into(),
            password_confirm: "longenough".into(),
            referral_source: "google".into(),
            occupation: String::new(), // occupation is optional
            street: "1 Main St".into(),
            suburb: "Epping".into(),
            postcode: "2121".into(),
            state: "NSW".into(),
        }
    }

    // -- primitives --

    #[test]
    fn email_shapes() {
        assert!(is_rfc_shaped_email("a@b.co"));
        assert!(is_rfc_shaped_email("jane.doe+tag@sub.example.com"));
        assert!(!is_rfc_shaped_email("not-an-email"));
        assert!(!is_rfc_shaped_email("a@b"));
        assert!(!is_rfc_shaped_email("a b@c.com"));
        assert!(!is_rfc_shaped_email(""));
    }

    #[test]
    fn phone_digit_counting() {
        assert_eq!(digit_count("(04) 1234 5678"), 10);
        assert_eq!(digit_count("+61 412 345 678"), 11);
        assert_eq!(digit_count("no digits"), 0);
    }

    #[test]
    fn postcode_shapes() {
        assert!(is_valid_postcode("2121"));
        assert!(is_valid_postcode("0800"));
        assert!(!is_valid_postcode("212"));
        assert!(!is_valid_postcode("21215"));
        assert!(!is_valid_postcode("2a21"));
    }

    // -- parent gate --

    #[test]
    fn valid_guardian_passes() {
        assert!(validate_parent(&valid_guardian(), 8).is_empty());
    }

    #[test]
    fn empty_guardian_reports_every_field() {
        let errors = validate_parent(&GuardianForm::default(), 8);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        for field in [
            "parent.firstName",
            "parent.lastName",
            "parent.email",
            "parent.phone",
            "parent.relationship",
            "parent.password",
            "parent.referralSource",
            "parent.street",
            "parent.suburb",
            "parent.postcode",
            "parent.state",
        ] {
            assert!(fields.contains(&field), "missing error for {field}");
        }
    }

    #[test]
    fn short_phone_rejected() {
        let mut form = valid_guardian();
        form.phone = "0412 345".into();
        let errors = validate_parent(&form, 8);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "parent.phone");
    }

    #[test]
    fn password_mismatch_rejected() {
        let mut form = valid_guardian();
        form.password_confirm = "different!".into();
        let errors = validate_parent(&form, 8);
        assert_eq!(errors[0].field, "parent.passwordConfirm");
    }

    #[test]
    fn short_password_reported_before_mismatch() {
        let mut form = valid_guardian();
        form.password = "short".into();
        form.password_confirm = "also-short".into();
        let errors = validate_parent(&form, 8);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "parent.password");
    }

    // -- student gate --

    #[test]
    fn valid_student_passes() {
        let form = StudentForm {
            name: "Sam".into(),
            gender: "male".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2010, 1, 1),
            school_name: "Epping High".into(),
            grade_level: Some(9),
        };
        assert!(validate_student(&form).is_empty());
    }

    #[test]
    fn empty_student_reports_every_field() {
        let errors = validate_student(&StudentForm::default());
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn grade_level_out_of_range() {
        let mut form = StudentForm {
            name: "Sam".into(),
            gender: "male".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2010, 1, 1),
            school_name: "Epping High".into(),
            grade_level: Some(6),
        };
        assert_eq!(validate_student(&form).len(), 1);
        form.grade_level = Some(13);
        assert_eq!(validate_student(&form).len(), 1);
        form.grade_level = Some(7);
        assert!(validate_student(&form).is_empty());
        form.grade_level = Some(12);
        assert!(validate_student(&form).is_empty());
    }
}
