use serde::{Deserialize, Serialize};

use crate::models::{enrollment, enrollment_document};

/// Manual enrollment creation by an administrator. When the period is
/// omitted the current academic period applies.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollment {
    pub student_id: i64,
    pub academic_year: Option<String>,
    pub semester: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEnrollmentStatus {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDocument {
    /// "Verified" or "Rejected"
    pub status: String,
}

/// Enrollment with its uploaded documents, as listed on the dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentWithDocuments {
    #[serde(flatten)]
    pub enrollment: enrollment::Model,
    pub documents: Vec<enrollment_document::Model>,
}
