//! Permission system with type-safe authorization extractors
//!
//! Authorization is resolved from the `role` claim on the identity record,
//! not from an email allowlist. Admin-role users hold every permission;
//! student-role users hold only the self-service set.
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Authorized, permissions::*};
//!
//! async fn approve(
//!     Authorized(admin, _): Authorized<RegistrationsManage>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<StudentResponse>> {
//!     // Permission already verified - just use the user
//! }
//! ```

use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::user;

/// Trait for permission marker types
pub trait Permission: Send + Sync + 'static {
    /// The permission string (e.g., "registrations.manage")
    const NAME: &'static str;
}

/// Macro to define permission types
///
/// Creates zero-sized marker types that implement `Permission`
macro_rules! define_permissions {
    ($($(#[$meta:meta])* $name:ident => $perm:expr),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Permission for $name {
                const NAME: &'static str = $perm;
            }
        )*
    };
}

// Define all application permissions
define_permissions! {
    // Registration review
    /// View submitted registrations
    RegistrationsView => "registrations.view",
    /// Approve and reject registrations
    RegistrationsManage => "registrations.manage",

    // Student records
    /// View student records
    StudentsView => "students.view",

    // Curriculum management
    /// View programs, years and courses
    ProgramsView => "programs.view",
    /// Create, update, delete programs, years and courses
    ProgramsManage => "programs.manage",

    // Enrollment management
    /// View all enrollments
    EnrollmentsView => "enrollments.view",
    /// Create enrollments and change enrollment status
    EnrollmentsManage => "enrollments.manage",
    /// Verify or reject uploaded documents
    DocumentsReview => "documents.review",

    // Payments
    /// Record payments at the cashier or on behalf of students
    PaymentsRecord => "payments.record",

    // Audit
    /// View the audit trail
    AuditView => "audit.view",
}

/// Permissions held by the student role: self-service only. Everything
/// else requires the admin role.
const STUDENT_PERMISSIONS: &[&str] = &["programs.view", "payments.record"];

/// Resolve a permission against a user's role claim
pub fn role_has_permission(role: &str, permission: &str) -> bool {
    match role {
        user::ROLE_ADMIN => true,
        user::ROLE_STUDENT => STUDENT_PERMISSIONS.contains(&permission),
        _ => false,
    }
}

/// Extractor that requires a specific permission
///
/// Verifies that the authenticated user's role grants the required
/// permission before the handler is called; rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct Authorized<P: Permission>(pub user::Model, pub PhantomData<P>);

impl<P: Permission> Authorized<P> {
    /// Get the authenticated user
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// Get the user ID
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

#[async_trait]
impl<S, P> FromRequestParts<S> for Authorized<P>
where
    S: Send + Sync,
    P: Permission,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get authenticated user from extensions (set by auth middleware)
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if !role_has_permission(&auth_user.0.role, P::NAME) {
            return Err(AppError::Forbidden(format!(
                "Permission denied: {} required",
                P::NAME
            )));
        }

        Ok(Authorized(auth_user.0.clone(), PhantomData))
    }
}

/// Extractor for any authenticated user (no specific permission required)
#[derive(Debug, Clone)]
pub struct Authenticated(pub user::Model);

impl Authenticated {
    /// Get the authenticated user
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    /// Get the user ID
    pub fn user_id(&self) -> i64 {
        self.0.id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(Authenticated(auth_user.0.clone()))
    }
}
