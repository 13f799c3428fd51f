//! Intake wizard state machine.
//!
//! The wizard collects guardian, student, and subject/class selections across
//! five ordered steps. All state is transient in-memory form state; password
//! and PII fields are never persisted, and [`WizardForm::safe_snapshot`] is
//! the only projection suitable for client-side caching.
//!
//! Steps are linear with explicit back/next transitions and no skipping:
//! `Parent -> Student -> Course -> Summary -> Payment`. Each forward
//! transition is gated by that step's validation; submit is available only
//! from `Payment`.

pub mod address;
pub mod form;

use serde::{Deserialize, Serialize};

use crate::course::CourseRef;
use crate::error::FieldError;
use crate::pricing;
use crate::types::PaymentMethod;

use form::{GuardianForm, StudentForm};

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// The five ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Parent,
    Student,
    Course,
    Summary,
    Payment,
}

impl WizardStep {
    /// The step after this one, or `None` from the final step.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Parent => Some(Self::Student),
            Self::Student => Some(Self::Course),
            Self::Course => Some(Self::Summary),
            Self::Summary => Some(Self::Payment),
            Self::Payment => None,
        }
    }

    /// The step before this one, or `None` from the first step.
    pub fn back(self) -> Option<Self> {
        match self {
            Self::Parent => None,
            Self::Student => Some(Self::Parent),
            Self::Course => Some(Self::Student),
            Self::Summary => Some(Self::Course),
            Self::Payment => Some(Self::Summary),
        }
    }

    /// Human-readable label for the step indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Parent => "Parent Details",
            Self::Student => "Student Details",
            Self::Course => "Course Selection",
            Self::Summary => "Summary",
            Self::Payment => "Payment",
        }
    }
}

// ---------------------------------------------------------------------------
// Subject selections
// ---------------------------------------------------------------------------

/// One subject the guardian is enrolling the student in.
///
/// A selection is complete only once both a course and a class are chosen.
/// `unit_price` is always derived from the pricing rules, never supplied by
/// the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectSelection {
    pub subject: String,
    pub course: Option<CourseRef>,
    pub course_name: Option<String>,
    pub class_id: Option<String>,
    pub class_name: Option<String>,
    pub unit_price: i64,
}

impl SubjectSelection {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            course: None,
            course_name: None,
            class_id: None,
            class_name: None,
            unit_price: 0,
        }
    }

    /// Whether both a course and a class have been chosen.
    pub fn is_complete(&self) -> bool {
        self.course.is_some() && self.class_id.is_some()
    }

    /// Choose a course. Resets any previously chosen class (the class list
    /// depends on the course) and reprices from the course name.
    pub fn select_course(&mut self, course: CourseRef, course_name: impl Into<String>) {
        let course_name = course_name.into();
        self.unit_price = pricing::granular_unit_price(&course_name);
        self.course = Some(course);
        self.course_name = Some(course_name);
        self.class_id = None;
        self.class_name = None;
    }

    /// Choose a class within the selected course. Reprices from the class's
    /// resolved name so the running total tracks the most specific label.
    pub fn select_class(&mut self, class_id: impl Into<String>, class_name: impl Into<String>) {
        let class_name = class_name.into();
        self.unit_price = pricing::granular_unit_price(&class_name);
        self.class_id = Some(class_id.into());
        self.class_name = Some(class_name);
    }
}

// ---------------------------------------------------------------------------
// Wizard form
// ---------------------------------------------------------------------------

/// Transient in-memory state for one wizard session.
#[derive(Debug, Clone)]
pub struct WizardForm {
    pub step: WizardStep,
    pub guardian: GuardianForm,
    pub student: StudentForm,
    pub subjects: Vec<SubjectSelection>,
    pub terms_accepted: bool,
    pub payment_method: PaymentMethod,
    min_password_len: usize,
}

impl WizardForm {
    /// Start a fresh wizard at the `Parent` step.
    pub fn new(min_password_len: usize) -> Self {
        Self {
            step: WizardStep::Parent,
            guardian: GuardianForm::default(),
            student: StudentForm::default(),
            subjects: Vec::new(),
            terms_accepted: false,
            payment_method: PaymentMethod::Stripe,
            min_password_len,
        }
    }

    /// Add a subject row, returning its index.
    pub fn add_subject(&mut self, subject: impl Into<String>) -> usize {
        self.subjects.push(SubjectSelection::new(subject));
        self.subjects.len() - 1
    }

    /// Validate the current step's gate.
    ///
    /// Empty result means the step may be advanced.
    pub fn validate_current_step(&self) -> Vec<FieldError> {
        match self.step {
            WizardStep::Parent => form::validate_parent(&self.guardian, self.min_password_len),
            WizardStep::Student => form::validate_student(&self.student),
            WizardStep::Course => validate_selections(&self.subjects),
            WizardStep::Summary => {
                if self.terms_accepted {
                    Vec::new()
                } else {
                    vec![FieldError::new(
                        "termsAccepted",
                        "You must accept the terms and conditions to continue",
                    )]
                }
            }
            // The payment step has no gate of its own; submit is the
            // terminal action.
            WizardStep::Payment => Vec::new(),
        }
    }

    /// Advance to the next step if the current gate passes.
    pub fn advance(&mut self) -> Result<WizardStep, Vec<FieldError>> {
        let errors = self.validate_current_step();
        if !errors.is_empty() {
            return Err(errors);
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(next)
            }
            None => Ok(self.step),
        }
    }

    /// Go back one step. No gate applies to backward transitions.
    pub fn back(&mut self) -> Option<WizardStep> {
        let previous = self.step.back()?;
        self.step = previous;
        Some(previous)
    }

    /// Whether submit is available: on the `Payment` step with every earlier
    /// gate satisfied.
    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Payment
            && form::validate_parent(&self.guardian, self.min_password_len).is_empty()
            && form::validate_student(&self.student).is_empty()
            && validate_selections(&self.subjects).is_empty()
            && self.terms_accepted
    }

    /// Running total across all selections, in cents.
    ///
    /// This is the same figure the bank-transfer confirmation shows as the
    /// amount due, computed by the canonical pricing rules.
    pub fn running_total(&self) -> i64 {
        self.subjects.iter().map(|s| s.unit_price).sum()
    }

    /// Project the non-sensitive fields only.
    ///
    /// Excludes the guardian's details and password and the student's
    /// identifying fields, so the result is safe to cache client-side.
    pub fn safe_snapshot(&self) -> SafeSnapshot {
        SafeSnapshot {
            step: self.step,
            subjects: self
                .subjects
                .iter()
                .map(|s| SafeSubject {
                    subject: s.subject.clone(),
                    course_name: s.course_name.clone(),
                    class_name: s.class_name.clone(),
                    unit_price: s.unit_price,
                })
                .collect(),
            terms_accepted: self.terms_accepted,
            payment_method: self.payment_method,
        }
    }
}

/// Validate the course-selection gate: at least one subject, and every
/// subject has both a course and a class chosen.
pub fn validate_selections(subjects: &[SubjectSelection]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if subjects.is_empty() {
        errors.push(FieldError::new(
            "subjects",
            "Select at least one subject",
        ));
        return errors;
    }
    for (i, selection) in subjects.iter().enumerate() {
        if selection.course.is_none() {
            errors.push(FieldError::new(
                format!("subjects[{i}].course"),
                format!("Choose a course for {}", selection.subject),
            ));
        }
        if selection.class_id.is_none() {
            errors.push(FieldError::new(
                format!("subjects[{i}].class"),
                format!("Choose a class for {}", selection.subject),
            ));
        }
    }
    errors
}

// ---------------------------------------------------------------------------
// Safe projection
// ---------------------------------------------------------------------------

/// Cache-safe projection of wizard state (no password, no PII).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeSnapshot {
    pub step: WizardStep,
    pub subjects: Vec<SafeSubject>,
    pub terms_accepted: bool,
    pub payment_method: PaymentMethod,
}

/// Subject row within a [`SafeSnapshot`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeSubject {
    pub subject: String,
    pub course_name: Option<String>,
    pub class_name: Option<String>,
    pub unit_price: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid_guardian() -> GuardianForm {
        GuardianForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane.doe@example.com".into(),
            phone: "0412 345 678".into(),
            relationship: Some(crate::types::RelationshipType::Mother),
            password: "hunter2hunter2".into(),
            password_confirm: "hunter2hunter2".into(),
            referral_source: "word-of-mouth".into(),
            occupation: "Engineer".into(),
            street: "12 Acacia Avenue".into(),
            suburb: "Epping".into(),
            postcode: "2121".into(),
            state: "NSW".into(),
        }
    }

    fn valid_student() -> StudentForm {
        StudentForm {
            name: "Sam Doe".into(),
            gender: "female".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2009, 4, 2),
            school_name: "Epping High".into(),
            grade_level: Some(11),
        }
    }

    fn complete_selection(subject: &str, course_name: &str) -> SubjectSelection {
        let mut selection = SubjectSelection::new(subject);
        selection.select_course(
            CourseRef::parse("course-id").unwrap(),
            course_name,
        );
        selection.select_class("class-1", course_name);
        selection
    }

    fn filled_form() -> WizardForm {
        let mut form = WizardForm::new(8);
        form.guardian = valid_guardian();
        form.student = valid_student();
        form.subjects = vec![
            complete_selection("Mathematics", "Year 11 Mathematics Advanced"),
            complete_selection("Physics", "Year 11 Physics"),
        ];
        form.terms_accepted = true;
        form
    }

    // -- step transitions --

    #[test]
    fn steps_are_linear() {
        assert_eq!(WizardStep::Parent.next(), Some(WizardStep::Student));
        assert_eq!(WizardStep::Student.next(), Some(WizardStep::Course));
        assert_eq!(WizardStep::Course.next(), Some(WizardStep::Summary));
        assert_eq!(WizardStep::Summary.next(), Some(WizardStep::Payment));
        assert_eq!(WizardStep::Payment.next(), None);
        assert_eq!(WizardStep::Parent.back(), None);
        assert_eq!(WizardStep::Payment.back(), Some(WizardStep::Summary));
    }

    #[test]
    fn advance_is_gated_by_validation() {
        let mut form = WizardForm::new(8);
        // Empty parent step cannot advance.
        let errors = form.advance().unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(form.step, WizardStep::Parent);

        form.guardian = valid_guardian();
        assert_eq!(form.advance().unwrap(), WizardStep::Student);
    }

    #[test]
    fn full_walk_through_all_steps() {
        let mut form = filled_form();
        assert_eq!(form.step, WizardStep::Parent);
        assert_eq!(form.advance().unwrap(), WizardStep::Student);
        assert_eq!(form.advance().unwrap(), WizardStep::Course);
        assert_eq!(form.advance().unwrap(), WizardStep::Summary);
        assert_eq!(form.advance().unwrap(), WizardStep::Payment);
        assert!(form.can_submit());
    }

    #[test]
    fn back_is_never_gated() {
        let mut form = WizardForm::new(8);
        form.guardian = valid_guardian();
        form.advance().unwrap();
        // Student step is empty (invalid), but going back still works.
        assert_eq!(form.back(), Some(WizardStep::Parent));
    }

    #[test]
    fn summary_requires_terms_acceptance() {
        let mut form = filled_form();
        form.terms_accepted = false;
        form.step = WizardStep::Summary;
        let errors = form.advance().unwrap_err();
        assert_eq!(errors[0].field, "termsAccepted");

        form.terms_accepted = true;
        assert_eq!(form.advance().unwrap(), WizardStep::Payment);
    }

    #[test]
    fn submit_only_from_payment_step() {
        let mut form = filled_form();
        assert!(!form.can_submit());
        form.step = WizardStep::Payment;
        assert!(form.can_submit());
    }

    // -- selections --

    #[test]
    fn course_step_requires_complete_selections() {
        let mut subjects = vec![SubjectSelection::new("Mathematics")];
        let errors = validate_selections(&subjects);
        assert_eq!(errors.len(), 2); // missing course and class

        subjects[0].select_course(
            CourseRef::parse("maths|year9").unwrap(),
            "Year 9 Mathematics",
        );
        let errors = validate_selections(&subjects);
        assert_eq!(errors.len(), 1); // class still missing

        subjects[0].select_class("class-9a", "Year 9 Mathematics A");
        assert!(validate_selections(&subjects).is_empty());
    }

    #[test]
    fn no_subjects_is_an_error() {
        assert_eq!(validate_selections(&[]).len(), 1);
    }

    #[test]
    fn selecting_course_resets_class_and_reprices() {
        let mut selection = SubjectSelection::new("Mathematics");
        selection.select_course(
            CourseRef::parse("maths|year12").unwrap(),
            "Year 12 Mathematics Advanced",
        );
        selection.select_class("class-12a", "Year 12 Mathematics Advanced A");
        assert!(selection.is_complete());
        assert_eq!(selection.unit_price, 75_000);

        // Re-choosing the course clears the class and reprices.
        selection.select_course(
            CourseRef::parse("maths|year9").unwrap(),
            "Year 9 Mathematics",
        );
        assert!(!selection.is_complete());
        assert_eq!(selection.class_id, None);
        assert_eq!(selection.unit_price, 45_000);
    }

    #[test]
    fn selecting_class_reprices_from_class_name() {
        let mut selection = SubjectSelection::new("Mathematics");
        selection.select_course(
            CourseRef::parse("maths|year11").unwrap(),
            "Year 11 Mathematics",
        );
        assert_eq!(selection.unit_price, 75_000);

        // The resolved class name is a standard stream, priced lower.
        selection.select_class("class-std", "Year 11 Standard Mathematics");
        assert_eq!(selection.unit_price, 45_000);
    }

    #[test]
    fn running_total_matches_canonical_pricing() {
        let form = filled_form();
        // Two senior subjects at 75_000 each.
        assert_eq!(form.running_total(), 150_000);
    }

    // -- safe projection --

    #[test]
    fn safe_snapshot_excludes_sensitive_fields() {
        let form = filled_form();
        let snapshot = form.safe_snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(!json.contains("hunter2"), "password leaked");
        assert!(!json.contains("jane.doe@example.com"), "email leaked");
        assert!(!json.contains("Sam Doe"), "student name leaked");
        assert!(!json.contains("Acacia"), "address leaked");

        assert_eq!(snapshot.subjects.len(), 2);
        assert_eq!(snapshot.subjects[0].unit_price, 75_000);
    }
}
