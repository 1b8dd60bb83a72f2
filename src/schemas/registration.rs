use serde::Deserialize;
use validator::Validate;

/// Public registration submission. Validated before anything touches the
/// database.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRegistration {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub middle_name: Option<String>,
    #[validate(email)]
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub program_id: i64,
    #[validate(range(min = 1, max = 6))]
    pub year_level: i32,
    #[serde(default)]
    pub is_returning_student: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectRegistration {
    pub remarks: Option<String>,
}
