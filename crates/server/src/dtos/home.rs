use chrono::NaiveDate;
use database::services::student::EnrollmentDateGroup;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EnrollmentDateGroupViewModel {
    pub enrollment_date: NaiveDate,
    pub student_count: i64,
}

impl From<EnrollmentDateGroup> for EnrollmentDateGroupViewModel {
    fn from(group: EnrollmentDateGroup) -> Self {
        Self {
            enrollment_date: group.enrollment_date,
            student_count: group.student_count,
        }
    }
}
