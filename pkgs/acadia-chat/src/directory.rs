//! Student directory seam
//!
//! The academy platform owns student records; this core only needs to
//! resolve an id into a display profile when the operator adds a student
//! to chat. The trait keeps that collaborator external.

use std::collections::HashMap;

use parking_lot::RwLock;

use acadia_store::StudentProfile;

/// Resolves student ids to display profiles
pub trait StudentDirectory: Send + Sync {
    fn lookup(&self, student_id: &str) -> Option<StudentProfile>;
}

/// HashMap-backed directory for tests and demos
#[derive(Default)]
pub struct InMemoryDirectory {
    students: RwLock<HashMap<String, StudentProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a student
    pub fn insert(&self, student_id: impl Into<String>, profile: StudentProfile) {
        self.students.write().insert(student_id.into(), profile);
    }
}

impl StudentDirectory for InMemoryDirectory {
    fn lookup(&self, student_id: &str) -> Option<StudentProfile> {
        self.students.read().get(student_id).cloned()
    }
}
