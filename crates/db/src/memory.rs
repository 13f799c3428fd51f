//! In-memory [`EnrolmentStore`] implementation.
//!
//! Backs the API integration tests and local runs without Postgres. Ids are
//! sequential per table; timestamps use the real clock.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use crestwood_core::types::DbId;

use crate::models::{
    CreateGuardian, CreateProfile, CreateRelationship, CreateStudent, Guardian, Profile,
    Relationship, Student,
};
use crate::store::{EnrolmentStore, StoreError};

#[derive(Default)]
struct Inner {
    next_id: DbId,
    profiles: HashMap<DbId, Profile>,
    guardians: HashMap<DbId, Guardian>,
    students: HashMap<DbId, Student>,
    relationships: HashMap<DbId, Relationship>,
}

impl Inner {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-guarded in-memory store.
#[derive(Default)]
pub struct InMemoryEnrolmentStore {
    inner: Mutex<Inner>,
}

impl InMemoryEnrolmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all guardian rows (test helper).
    pub fn guardians(&self) -> Vec<Guardian> {
        self.inner.lock().unwrap().guardians.values().cloned().collect()
    }

    /// Snapshot of all student rows (test helper).
    pub fn students(&self) -> Vec<Student> {
        self.inner.lock().unwrap().students.values().cloned().collect()
    }

    /// Snapshot of all profile rows (test helper).
    pub fn profiles(&self) -> Vec<Profile> {
        self.inner.lock().unwrap().profiles.values().cloned().collect()
    }

    /// Snapshot of all relationship rows (test helper).
    pub fn relationships(&self) -> Vec<Relationship> {
        self.inner
            .lock()
            .unwrap()
            .relationships
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EnrolmentStore for InMemoryEnrolmentStore {
    async fn create_profile(&self, input: &CreateProfile) -> Result<Profile, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let profile = Profile {
            id: inner.next_id(),
            identity_id: input.identity_id,
            full_name: input.full_name.clone(),
            role: input.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn delete_profile(&self, id: DbId) -> Result<(), StoreError> {
        self.inner.lock().unwrap().profiles.remove(&id);
        Ok(())
    }

    async fn create_guardian(&self, input: &CreateGuardian) -> Result<Guardian, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let guardian = Guardian {
            id: inner.next_id(),
            profile_id: input.profile_id,
            email: input.email.clone(),
            phone: input.phone.clone(),
            street: input.street.clone(),
            suburb: input.suburb.clone(),
            postcode: input.postcode.clone(),
            state: input.state.clone(),
            occupation: input.occupation.clone(),
            referral_source: input.referral_source.clone(),
            relationship: input.relationship.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.guardians.insert(guardian.id, guardian.clone());
        Ok(guardian)
    }

    async fn delete_guardian(&self, id: DbId) -> Result<(), StoreError> {
        self.inner.lock().unwrap().guardians.remove(&id);
        Ok(())
    }

    async fn create_student(&self, input: &CreateStudent) -> Result<Student, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let student = Student {
            id: inner.next_id(),
            profile_id: input.profile_id,
            student_number: input.student_number.clone(),
            gender: input.gender.clone(),
            date_of_birth: input.date_of_birth,
            school_name: input.school_name.clone(),
            grade_level: input.grade_level,
            subjects: input.subjects.clone(),
            courses: input.courses.clone(),
            classes: input.classes.clone(),
            payment_method: input.payment_method.as_str().to_string(),
            payment_status: "unpaid".to_string(),
            checkout_session_id: None,
            created_at: now,
            updated_at: now,
        };
        inner.students.insert(student.id, student.clone());
        Ok(student)
    }

    async fn delete_student(&self, id: DbId) -> Result<(), StoreError> {
        self.inner.lock().unwrap().students.remove(&id);
        Ok(())
    }

    async fn create_relationship(
        &self,
        input: &CreateRelationship,
    ) -> Result<Relationship, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let relationship = Relationship {
            id: inner.next_id(),
            guardian_id: input.guardian_id,
            student_id: input.student_id,
            relationship_type: input.relationship_type.as_str().to_string(),
            created_at: Utc::now(),
        };
        inner
            .relationships
            .insert(relationship.id, relationship.clone());
        Ok(relationship)
    }

    async fn find_student(&self, id: DbId) -> Result<Option<Student>, StoreError> {
        Ok(self.inner.lock().unwrap().students.get(&id).cloned())
    }

    async fn set_checkout_session(
        &self,
        student_id: DbId,
        session_id: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let student = inner
            .students
            .get_mut(&student_id)
            .ok_or(StoreError::NotFound {
                entity: "Student",
                id: student_id,
            })?;
        student.checkout_session_id = Some(session_id.to_string());
        student.payment_status = "pending".to_string();
        student.updated_at = Utc::now();
        Ok(())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
