use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProgram {
    #[validate(length(min = 1, max = 20))]
    pub program_code: String,
    #[validate(length(min = 1, max = 200))]
    pub program_name: String,
    pub total_units: i32,
    #[validate(range(min = 1, max = 10))]
    pub years_to_complete: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProgram {
    pub program_code: Option<String>,
    pub program_name: Option<String>,
    pub total_units: Option<i32>,
    pub years_to_complete: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateYear {
    #[validate(range(min = 1, max = 6))]
    pub year_level: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 200))]
    pub course_name: String,
    #[validate(range(min = 1, max = 12))]
    pub units: i32,
    #[validate(range(min = 1, max = 2))]
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourse {
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub units: Option<i32>,
    pub semester: Option<i32>,
    pub status: Option<String>,
}
