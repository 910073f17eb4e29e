use crate::action::ModelState;
use crate::dtos::{Validate, check_text};
use database::entities::{course, department, enrollment, student};
use models::{course_status::CourseStatus, grade::Grade};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CourseViewModel {
    /// Course number
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    #[serde(skip_deserializing)]
    pub department_name: Option<String>,
    #[schema(value_type = String)]
    pub status: CourseStatus,
    #[serde(skip_deserializing)]
    pub owner_id: Option<String>,
}

impl From<course::Model> for CourseViewModel {
    fn from(model: course::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            credits: model.credits,
            department_id: model.department_id,
            department_name: None,
            status: model.status,
            owner_id: model.owner_id,
        }
    }
}

impl From<(course::Model, Option<department::Model>)> for CourseViewModel {
    fn from((course, department): (course::Model, Option<department::Model>)) -> Self {
        Self {
            department_name: department.map(|d| d.name),
            ..Self::from(course)
        }
    }
}

impl CourseViewModel {
    /// A newly submitted course owned by `owner_id`
    pub fn into_model(self, owner_id: Option<String>) -> course::Model {
        course::Model {
            id: self.id,
            title: self.title.trim().to_owned(),
            credits: self.credits,
            department_id: self.department_id,
            status: CourseStatus::Submitted,
            owner_id,
        }
    }

    /// Copies the editable fields; status and owner are left alone
    pub fn merge_into(&self, model: &mut course::Model) {
        model.title = self.title.trim().to_owned();
        model.credits = self.credits;
        model.department_id = self.department_id;
    }

    /// Like [`CourseViewModel::merge_into`], also applying the reviewed status
    pub fn merge_review_into(&self, model: &mut course::Model) {
        self.merge_into(model);
        model.status = self.status;
    }
}

impl Validate for CourseViewModel {
    fn validate(&self, state: &mut ModelState) {
        if self.id <= 0 {
            state.add_error("id", "The Number field is required.");
        }
        check_text(state, "title", "Title", &self.title, 3, 50);
        if !(0..=5).contains(&self.credits) {
            state.add_error("credits", "The field Credits must be between 0 and 5.");
        }
        if self.department_id <= 0 {
            state.add_error("department_id", "The Department field is required.");
        }
    }
}

/// A student enrolled in a course, as listed by the instructor drill-down
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CourseEnrollmentViewModel {
    pub student_id: i32,
    pub student_name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub grade: Option<Grade>,
}

impl From<(enrollment::Model, Option<student::Model>)> for CourseEnrollmentViewModel {
    fn from((enrollment, student): (enrollment::Model, Option<student::Model>)) -> Self {
        Self {
            student_id: enrollment.student_id,
            student_name: student.map(|s| s.full_name()),
            grade: enrollment.grade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> course::Model {
        course::Model {
            id: 1,
            title: "Course 1".to_owned(),
            credits: 3,
            department_id: 1,
            status: CourseStatus::Submitted,
            owner_id: Some("user123".to_owned()),
        }
    }

    #[test]
    fn test_merge_keeps_owner_and_status() {
        let mut course = stored();
        let submitted = CourseViewModel {
            id: 1,
            title: "Course 1 vm".to_owned(),
            credits: 4,
            department_id: 2,
            status: CourseStatus::Approved,
            owner_id: Some("someone-else".to_owned()),
            ..Default::default()
        };

        submitted.merge_into(&mut course);
        assert_eq!(course.title, "Course 1 vm");
        assert_eq!(course.department_id, 2);
        assert_eq!(course.status, CourseStatus::Submitted);
        assert_eq!(course.owner_id.as_deref(), Some("user123"));

        submitted.merge_review_into(&mut course);
        assert_eq!(course.status, CourseStatus::Approved);
        assert_eq!(course.owner_id.as_deref(), Some("user123"));
    }

    #[test]
    fn test_new_course_is_submitted() {
        let submitted = CourseViewModel {
            id: 4022,
            title: "Microeconomics".to_owned(),
            credits: 3,
            department_id: 4,
            status: CourseStatus::Approved,
            ..Default::default()
        };

        let course = submitted.into_model(Some("user123".to_owned()));
        assert_eq!(course.status, CourseStatus::Submitted);
        assert_eq!(course.owner_id.as_deref(), Some("user123"));
    }

    #[test]
    fn test_validation_ranges() {
        let mut model = CourseViewModel::from(stored());
        assert!(model.model_state().is_valid());

        model.credits = 6;
        model.title = "AB".to_owned();
        let state = model.model_state();
        assert_eq!(state.errors("credits").len(), 1);
        assert_eq!(state.errors("title").len(), 1);
    }

    #[test]
    fn test_owner_is_not_deserialized() {
        let model: CourseViewModel =
            serde_json::from_str(r#"{"id":1,"title":"Chemistry","owner_id":"intruder"}"#).unwrap();
        assert_eq!(model.owner_id, None);
        assert_eq!(model.status, CourseStatus::Submitted);
    }
}
