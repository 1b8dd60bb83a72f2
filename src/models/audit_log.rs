use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: DateTimeUtc,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub details: Option<String>, // JSON string for flexible data
    pub success: bool,
    pub error_message: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Audit action types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditAction {
    // Authentication
    Login,
    LoginFailed,

    // Registration workflow
    RegistrationSubmitted,
    RegistrationApproved,
    RegistrationRejected,

    // Enrollment workflow
    EnrollmentCreated,
    EnrollmentStatusChanged,
    DocumentUploaded,
    DocumentReviewed,

    // Payments
    PaymentRecorded,

    // Curriculum management
    ProgramCreated,
    ProgramUpdated,
    ProgramDeleted,
    YearCreated,
    YearDeleted,
    CourseCreated,
    CourseUpdated,
    CourseDeleted,

    // System
    AdminCreated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Login => write!(f, "login"),
            AuditAction::LoginFailed => write!(f, "login_failed"),
            AuditAction::RegistrationSubmitted => write!(f, "registration_submitted"),
            AuditAction::RegistrationApproved => write!(f, "registration_approved"),
            AuditAction::RegistrationRejected => write!(f, "registration_rejected"),
            AuditAction::EnrollmentCreated => write!(f, "enrollment_created"),
            AuditAction::EnrollmentStatusChanged => write!(f, "enrollment_status_changed"),
            AuditAction::DocumentUploaded => write!(f, "document_uploaded"),
            AuditAction::DocumentReviewed => write!(f, "document_reviewed"),
            AuditAction::PaymentRecorded => write!(f, "payment_recorded"),
            AuditAction::ProgramCreated => write!(f, "program_created"),
            AuditAction::ProgramUpdated => write!(f, "program_updated"),
            AuditAction::ProgramDeleted => write!(f, "program_deleted"),
            AuditAction::YearCreated => write!(f, "year_created"),
            AuditAction::YearDeleted => write!(f, "year_deleted"),
            AuditAction::CourseCreated => write!(f, "course_created"),
            AuditAction::CourseUpdated => write!(f, "course_updated"),
            AuditAction::CourseDeleted => write!(f, "course_deleted"),
            AuditAction::AdminCreated => write!(f, "admin_created"),
        }
    }
}

// Resource types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceType {
    User,
    Registration,
    Student,
    Program,
    Year,
    Course,
    Enrollment,
    Document,
    Payment,
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceType::User => write!(f, "user"),
            ResourceType::Registration => write!(f, "registration"),
            ResourceType::Student => write!(f, "student"),
            ResourceType::Program => write!(f, "program"),
            ResourceType::Year => write!(f, "year"),
            ResourceType::Course => write!(f, "course"),
            ResourceType::Enrollment => write!(f, "enrollment"),
            ResourceType::Document => write!(f, "document"),
            ResourceType::Payment => write!(f, "payment"),
        }
    }
}
