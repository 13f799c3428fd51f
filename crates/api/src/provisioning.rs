//! Enrolment provisioning saga.
//!
//! Creates the guardian identity, guardian rows, student identity and
//! student rows in order, tracking a compensation for each completed step.
//! If any later step fails, completed steps are unwound in reverse so a
//! failed enrolment leaves no partial records behind.

use chrono::{NaiveDate, Utc};
use crestwood_core::course::CourseRef;
use crestwood_core::credentials;
use crestwood_core::types::{DbId, IdentityId, PaymentMethod, RelationshipType};
use crestwood_db::models::{
    CreateGuardian, CreateProfile, CreateRelationship, CreateStudent, ProfileRole,
};
use crestwood_db::EnrolmentStore;

use crate::clients::{IdentityProvider, NewIdentity};
use crate::config::ServerConfig;
use crate::error::AppError;

/// Validated guardian details.
#[derive(Debug, Clone)]
pub struct GuardianData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub relationship: RelationshipType,
    pub referral_source: String,
    pub occupation: Option<String>,
    pub street: String,
    pub suburb: String,
    pub postcode: String,
    pub state: String,
}

/// Validated student details.
#[derive(Debug, Clone)]
pub struct StudentData {
    pub name: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub school_name: String,
    pub grade_level: i32,
}

/// One fully-chosen subject selection.
#[derive(Debug, Clone)]
pub struct SelectionData {
    pub subject: String,
    pub course: CourseRef,
    pub course_name: String,
    pub class_id: String,
    pub class_name: String,
}

/// A complete, validated enrolment ready to provision.
#[derive(Debug, Clone)]
pub struct EnrolmentData {
    pub guardian: GuardianData,
    pub student: StudentData,
    pub selections: Vec<SelectionData>,
    pub payment_method: PaymentMethod,
}

/// What a successful provisioning run produced. The one-time password is
/// returned exactly once; it is never persisted by this service.
#[derive(Debug, Clone)]
pub struct ProvisionedEnrolment {
    pub student_id: DbId,
    pub student_number: String,
    pub student_password: String,
}

enum Compensation {
    DeleteIdentity(IdentityId),
    DeleteProfile(DbId),
    DeleteGuardian(DbId),
    DeleteStudent(DbId),
}

/// Undo completed steps in reverse order. Compensation failures are logged
/// and skipped so the remaining steps still run.
async fn unwind(
    store: &dyn EnrolmentStore,
    identity: &dyn IdentityProvider,
    completed: Vec<Compensation>,
) {
    for compensation in completed.into_iter().rev() {
        match compensation {
            Compensation::DeleteIdentity(id) => {
                if let Err(e) = identity.delete_user(id).await {
                    tracing::warn!(identity_id = %id, error = %e, "compensation failed: delete identity");
                }
            }
            Compensation::DeleteProfile(id) => {
                if let Err(e) = store.delete_profile(id).await {
                    tracing::warn!(profile_id = id, error = %e, "compensation failed: delete profile");
                }
            }
            Compensation::DeleteGuardian(id) => {
                if let Err(e) = store.delete_guardian(id).await {
                    tracing::warn!(guardian_id = id, error = %e, "compensation failed: delete guardian");
                }
            }
            Compensation::DeleteStudent(id) => {
                if let Err(e) = store.delete_student(id).await {
                    tracing::warn!(student_id = id, error = %e, "compensation failed: delete student");
                }
            }
        }
    }
}

/// Run the full provisioning saga for a validated enrolment.
pub async fn provision_enrolment(
    store: &dyn EnrolmentStore,
    identity: &dyn IdentityProvider,
    config: &ServerConfig,
    data: &EnrolmentData,
) -> Result<ProvisionedEnrolment, AppError> {
    let guardian_name = format!("{} {}", data.guardian.first_name, data.guardian.last_name);
    let mut completed: Vec<Compensation> = Vec::new();

    // 1. Guardian identity. A duplicate email fails here before anything
    //    was written, so there is nothing to unwind.
    let guardian_identity = identity
        .create_user(&NewIdentity {
            email: data.guardian.email.clone(),
            password: data.guardian.password.clone(),
            display_name: guardian_name.clone(),
            must_reset_password: false,
        })
        .await?;
    completed.push(Compensation::DeleteIdentity(guardian_identity));

    // 2. Guardian profile row.
    let guardian_profile = match store
        .create_profile(&CreateProfile {
            identity_id: guardian_identity,
            full_name: guardian_name.clone(),
            role: ProfileRole::Guardian,
        })
        .await
    {
        Ok(profile) => profile,
        Err(e) => return abort(store, identity, completed, e).await,
    };
    completed.push(Compensation::DeleteProfile(guardian_profile.id));

    // 3. Guardian row.
    let guardian = match store
        .create_guardian(&CreateGuardian {
            profile_id: guardian_profile.id,
            email: data.guardian.email.clone(),
            phone: data.guardian.phone.clone(),
            street: data.guardian.street.clone(),
            suburb: data.guardian.suburb.clone(),
            postcode: data.guardian.postcode.clone(),
            state: data.guardian.state.clone(),
            occupation: data.guardian.occupation.clone(),
            referral_source: data.guardian.referral_source.clone(),
            relationship: data.guardian.relationship,
        })
        .await
    {
        Ok(guardian) => guardian,
        Err(e) => return abort(store, identity, completed, e).await,
    };
    completed.push(Compensation::DeleteGuardian(guardian.id));

    // 4. Student credentials.
    let student_number = credentials::student_number(Utc::now().timestamp_millis());
    let student_password = credentials::one_time_password(credentials::ONE_TIME_PASSWORD_LEN);
    let student_email =
        credentials::synthetic_student_email(&student_number, &config.student_email_domain);

    // 5. Student identity, with a forced password reset on first login.
    let student_identity = match identity
        .create_user(&NewIdentity {
            email: student_email,
            password: student_password.clone(),
            display_name: data.student.name.clone(),
            must_reset_password: true,
        })
        .await
    {
        Ok(id) => id,
        Err(e) => return abort(store, identity, completed, e).await,
    };
    completed.push(Compensation::DeleteIdentity(student_identity));

    // 6. Student profile row.
    let student_profile = match store
        .create_profile(&CreateProfile {
            identity_id: student_identity,
            full_name: data.student.name.clone(),
            role: ProfileRole::Student,
        })
        .await
    {
        Ok(profile) => profile,
        Err(e) => return abort(store, identity, completed, e).await,
    };
    completed.push(Compensation::DeleteProfile(student_profile.id));

    // 7. Student row with display strings for the selections.
    let subjects = join_field(&data.selections, |s| s.subject.as_str());
    let courses = join_field(&data.selections, |s| s.course_name.as_str());
    let classes = join_field(&data.selections, |s| s.class_name.as_str());
    let student = match store
        .create_student(&CreateStudent {
            profile_id: student_profile.id,
            student_number: student_number.clone(),
            gender: data.student.gender.clone(),
            date_of_birth: data.student.date_of_birth,
            school_name: data.student.school_name.clone(),
            grade_level: data.student.grade_level,
            subjects,
            courses,
            classes,
            payment_method: data.payment_method,
        })
        .await
    {
        Ok(student) => student,
        Err(e) => return abort(store, identity, completed, e).await,
    };
    completed.push(Compensation::DeleteStudent(student.id));

    // 8. Guardian-student link.
    if let Err(e) = store
        .create_relationship(&CreateRelationship {
            guardian_id: guardian.id,
            student_id: student.id,
            relationship_type: data.guardian.relationship,
        })
        .await
    {
        return abort(store, identity, completed, e).await;
    }

    tracing::info!(
        student_id = student.id,
        guardian_id = guardian.id,
        %student_number,
        "enrolment provisioned"
    );

    Ok(ProvisionedEnrolment {
        student_id: student.id,
        student_number,
        student_password,
    })
}

async fn abort<E: Into<AppError>>(
    store: &dyn EnrolmentStore,
    identity: &dyn IdentityProvider,
    completed: Vec<Compensation>,
    cause: E,
) -> Result<ProvisionedEnrolment, AppError> {
    unwind(store, identity, completed).await;
    Err(cause.into())
}

fn join_field<'a>(
    selections: &'a [SelectionData],
    field: impl Fn(&'a SelectionData) -> &'a str,
) -> String {
    selections.iter().map(field).collect::<Vec<_>>().join(", ")
}
