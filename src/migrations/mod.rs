pub use sea_orm_migration::prelude::*;

mod m20260115_000001_create_users;
mod m20260115_000002_create_programs;
mod m20260115_000003_create_years;
mod m20260115_000004_create_courses;
mod m20260115_000005_create_registrations;
mod m20260115_000006_create_students;
mod m20260115_000007_create_enrollments;
mod m20260115_000008_create_enrollment_courses;
mod m20260115_000009_create_enrollment_documents;
mod m20260115_000010_create_payments;
mod m20260115_000011_create_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_create_users::Migration),
            Box::new(m20260115_000002_create_programs::Migration),
            Box::new(m20260115_000003_create_years::Migration),
            Box::new(m20260115_000004_create_courses::Migration),
            Box::new(m20260115_000005_create_registrations::Migration),
            Box::new(m20260115_000006_create_students::Migration),
            Box::new(m20260115_000007_create_enrollments::Migration),
            Box::new(m20260115_000008_create_enrollment_courses::Migration),
            Box::new(m20260115_000009_create_enrollment_documents::Migration),
            Box::new(m20260115_000010_create_payments::Migration),
            Box::new(m20260115_000011_create_audit_logs::Migration),
        ]
    }
}
