//! POST /api/v1/enrol — submit a completed intake form.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use crestwood_core::course::CourseRef;
use crestwood_core::error::FieldError;
use crestwood_core::types::{DbId, PaymentMethod, RelationshipType};
use crestwood_core::wizard::form::{
    validate_parent, validate_student, GuardianForm, StudentForm,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::ClientIp;
use crate::provisioning::{
    self, EnrolmentData, GuardianData, SelectionData, StudentData,
};
use crate::state::AppState;

/// Max enrolment submissions per client per window.
pub const ENROL_RATE_LIMIT: u32 = 5;
pub const ENROL_RATE_WINDOW_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolRequest {
    pub parent: ParentPayload,
    pub student: StudentPayload,
    pub selection: SelectionStep,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// The course step of the wizard, as submitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStep {
    pub subjects: Vec<SelectionPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub relationship: String,
    pub referral_source: String,
    #[serde(default)]
    pub occupation: Option<String>,
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub gender: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date_of_birth: String,
    pub school_name: String,
    pub grade_level: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPayload {
    pub subject: String,
    /// Course id, either bare or in the legacy `"id|yearN"` composite.
    pub course: String,
    pub course_name: String,
    pub class_id: String,
    pub class_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolResponse {
    pub success: bool,
    pub student_id: DbId,
    pub student_number: String,
    /// One-time student password, shown to the guardian exactly once.
    pub student_password: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_enrol(
    request: &EnrolRequest,
    min_password_len: usize,
) -> Result<EnrolmentData, Vec<FieldError>> {
    let mut errors = Vec::new();

    // Parent gate, same rules as the wizard step. The API payload has no
    // confirmation field, so mirror the password into it.
    let relationship = RelationshipType::from_str_db(&request.parent.relationship).ok();
    let guardian_form = GuardianForm {
        first_name: request.parent.first_name.clone(),
        last_name: request.parent.last_name.clone(),
        email: request.parent.email.clone(),
        phone: request.parent.phone.clone(),
        relationship,
        password: request.parent.password.clone(),
        password_confirm: request.parent.password.clone(),
        referral_source: request.parent.referral_source.clone(),
        occupation: request.parent.occupation.clone().unwrap_or_default(),
        street: request.parent.street.clone(),
        suburb: request.parent.suburb.clone(),
        postcode: request.parent.postcode.clone(),
        state: request.parent.state.clone(),
    };
    errors.extend(validate_parent(&guardian_form, min_password_len));

    // Student gate.
    let date_of_birth =
        NaiveDate::parse_from_str(&request.student.date_of_birth, "%Y-%m-%d").ok();
    let dob_malformed =
        date_of_birth.is_none() && !request.student.date_of_birth.trim().is_empty();
    if dob_malformed {
        errors.push(FieldError::new(
            "student.dateOfBirth",
            "Date of birth must be in YYYY-MM-DD format",
        ));
    }
    let student_form = StudentForm {
        name: request.student.name.clone(),
        gender: request.student.gender.clone(),
        date_of_birth,
        school_name: request.student.school_name.clone(),
        grade_level: Some(request.student.grade_level),
    };
    let mut student_errors = validate_student(&student_form);
    if dob_malformed {
        // The format error above already covers the field; drop the gate's
        // "required" message so the field map carries one message per field.
        student_errors.retain(|e| e.field != "student.dateOfBirth");
    }
    errors.extend(student_errors);

    // Selections.
    if request.selection.subjects.is_empty() {
        errors.push(FieldError::new(
            "selection.subjects",
            "Select at least one subject",
        ));
    }
    let mut selections = Vec::with_capacity(request.selection.subjects.len());
    for (index, selection) in request.selection.subjects.iter().enumerate() {
        let mut complete = true;
        if selection.subject.trim().is_empty() {
            errors.push(FieldError::new(
                format!("selection.subjects[{index}].subject"),
                "Subject is required",
            ));
            complete = false;
        }
        if selection.class_id.trim().is_empty() {
            errors.push(FieldError::new(
                format!("selection.subjects[{index}].classId"),
                "Select a class",
            ));
            complete = false;
        }
        if selection.class_name.trim().is_empty() {
            errors.push(FieldError::new(
                format!("selection.subjects[{index}].className"),
                "Select a class",
            ));
            complete = false;
        }
        if selection.course_name.trim().is_empty() {
            errors.push(FieldError::new(
                format!("selection.subjects[{index}].courseName"),
                "Select a course",
            ));
            complete = false;
        }
        let course = match CourseRef::parse(&selection.course) {
            Ok(course) => Some(course),
            Err(e) => {
                errors.push(FieldError::new(
                    format!("selection.subjects[{index}].course"),
                    e.to_string(),
                ));
                complete = false;
                None
            }
        };
        if complete {
            if let Some(course) = course {
                selections.push(SelectionData {
                    subject: selection.subject.trim().to_string(),
                    course,
                    course_name: selection.course_name.trim().to_string(),
                    class_id: selection.class_id.trim().to_string(),
                    class_name: selection.class_name.trim().to_string(),
                });
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All gates passed, so the Options below are present.
    Ok(EnrolmentData {
        guardian: GuardianData {
            first_name: request.parent.first_name.trim().to_string(),
            last_name: request.parent.last_name.trim().to_string(),
            email: request.parent.email.trim().to_lowercase(),
            password: request.parent.password.clone(),
            phone: request.parent.phone.trim().to_string(),
            relationship: guardian_form.relationship.unwrap_or(RelationshipType::Guardian),
            referral_source: request.parent.referral_source.trim().to_string(),
            occupation: request
                .parent
                .occupation
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            street: request.parent.street.trim().to_string(),
            suburb: request.parent.suburb.trim().to_string(),
            postcode: request.parent.postcode.trim().to_string(),
            state: request.parent.state.trim().to_string(),
        },
        student: StudentData {
            name: request.student.name.trim().to_string(),
            gender: request.student.gender.trim().to_string(),
            date_of_birth: student_form.date_of_birth.unwrap_or_default(),
            school_name: request.student.school_name.trim().to_string(),
            grade_level: request.student.grade_level,
        },
        selections,
        payment_method: request.payment_method.unwrap_or(PaymentMethod::Stripe),
    })
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

pub async fn enrol(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(request): Json<EnrolRequest>,
) -> AppResult<Json<EnrolResponse>> {
    // 1. Rate limit per client.
    let decision = state.limiter.check(
        &format!("{ip}:enrol"),
        ENROL_RATE_LIMIT,
        Duration::seconds(ENROL_RATE_WINDOW_SECS),
    );
    if !decision.allowed {
        return Err(AppError::RateLimited {
            retry_after_secs: decision.retry_after_secs(Utc::now()),
        });
    }

    // 2. Validate the whole submission before touching anything external.
    let data =
        validate_enrol(&request, state.config.min_password_length).map_err(AppError::Validation)?;

    // 3. Run the provisioning saga.
    let outcome = provisioning::provision_enrolment(
        state.store.as_ref(),
        state.identity.as_ref(),
        &state.config,
        &data,
    )
    .await?;

    Ok(Json(EnrolResponse {
        success: true,
        student_id: outcome.student_id,
        student_number: outcome.student_number,
        student_password: outcome.student_password,
    }))
}
