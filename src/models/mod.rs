pub mod audit_log;
pub mod course;
pub mod enrollment;
pub mod enrollment_course;
pub mod enrollment_document;
pub mod payment;
pub mod program;
pub mod registration;
pub mod student;
pub mod user;
pub mod year;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::audit_log::{self, Entity as AuditLog};
    pub use super::course::{self, Entity as Course};
    pub use super::enrollment::{self, Entity as Enrollment};
    pub use super::enrollment_course::{self, Entity as EnrollmentCourse};
    pub use super::enrollment_document::{self, Entity as EnrollmentDocument};
    pub use super::payment::{self, Entity as Payment};
    pub use super::program::{self, Entity as Program};
    pub use super::registration::{self, Entity as Registration};
    pub use super::student::{self, Entity as Student};
    pub use super::user::{self, Entity as User};
    pub use super::year::{self, Entity as Year};
}
