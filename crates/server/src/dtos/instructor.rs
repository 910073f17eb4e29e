use crate::action::ModelState;
use crate::dtos::course::{CourseEnrollmentViewModel, CourseViewModel};
use crate::dtos::{Validate, check_required, check_text};
use chrono::NaiveDate;
use database::entities::{instructor, office_assignment};
use database::services::instructor::InstructorDetail;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct InstructorViewModel {
    pub id: i32,
    pub last_name: String,
    pub first_mid_name: String,
    pub hire_date: Option<NaiveDate>,
    pub office_location: Option<String>,
    #[serde(skip_deserializing)]
    pub courses: Vec<CourseViewModel>,
}

impl From<InstructorDetail> for InstructorViewModel {
    fn from(detail: InstructorDetail) -> Self {
        Self {
            id: detail.instructor.id,
            last_name: detail.instructor.last_name,
            first_mid_name: detail.instructor.first_mid_name,
            hire_date: Some(detail.instructor.hire_date),
            office_location: detail.office_assignment.map(|o| o.location),
            courses: detail.courses.into_iter().map(CourseViewModel::from).collect(),
        }
    }
}

impl From<instructor::Model> for InstructorViewModel {
    fn from(model: instructor::Model) -> Self {
        Self {
            id: model.id,
            last_name: model.last_name,
            first_mid_name: model.first_mid_name,
            hire_date: Some(model.hire_date),
            ..Default::default()
        }
    }
}

impl InstructorViewModel {
    pub fn into_model(self) -> instructor::Model {
        instructor::Model {
            id: 0,
            last_name: self.last_name.trim().to_owned(),
            first_mid_name: self.first_mid_name.trim().to_owned(),
            hire_date: self.hire_date.unwrap_or_default(),
        }
    }

    pub fn merge_into(&self, model: &mut instructor::Model) {
        model.last_name = self.last_name.trim().to_owned();
        model.first_mid_name = self.first_mid_name.trim().to_owned();
        if let Some(hire_date) = self.hire_date {
            model.hire_date = hire_date;
        }
    }

    /// The submitted office location, `None` when blank
    pub fn office_location(&self) -> Option<String> {
        self.office_location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(str::to_owned)
    }

    pub fn office_assignment(&self, instructor_id: i32) -> Option<office_assignment::Model> {
        self.office_location()
            .map(|location| office_assignment::Model {
                instructor_id,
                location,
            })
    }
}

impl Validate for InstructorViewModel {
    fn validate(&self, state: &mut ModelState) {
        check_text(state, "last_name", "Last Name", &self.last_name, 1, 50);
        check_text(state, "first_mid_name", "First Name", &self.first_mid_name, 1, 50);
        check_required(state, "hire_date", "Hire Date", &self.hire_date);
        if let Some(location) = self.office_location() {
            check_text(state, "office_location", "Office Location", &location, 1, 50);
        }
    }
}

/// Create and edit body: the instructor plus the multi-selected course numbers
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct InstructorForm {
    #[serde(flatten)]
    pub instructor: InstructorViewModel,
    pub selected_courses: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct InstructorIndexParams {
    /// Selected instructor
    pub id: Option<i32>,
    /// Selected course of that instructor
    pub course_id: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstructorIndexViewModel {
    pub instructors: Vec<InstructorViewModel>,
    pub selected_instructor_id: Option<i32>,
    pub courses: Vec<CourseViewModel>,
    pub selected_course_id: Option<i32>,
    pub enrollments: Vec<CourseEnrollmentViewModel>,
}

/// Course numbers from a multi-select, ascending; entries that are not
/// numbers are ignored
pub fn parse_course_ids(selected: &[String]) -> Vec<i32> {
    let mut ids: Vec<i32> = selected
        .iter()
        .filter_map(|value| value.trim().parse().ok())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_course_ids_skips_garbage() {
        let selected = vec![
            "3".to_owned(),
            "abc".to_owned(),
            " 1 ".to_owned(),
            "3".to_owned(),
            String::new(),
        ];
        assert_eq!(parse_course_ids(&selected), vec![1, 3]);
    }

    #[test]
    fn test_blank_office_location_is_none() {
        let mut model = InstructorViewModel {
            office_location: Some("   ".to_owned()),
            ..Default::default()
        };
        assert_eq!(model.office_assignment(5), None);

        model.office_location = Some(" Smith 17 ".to_owned());
        assert_eq!(
            model.office_assignment(5),
            Some(office_assignment::Model {
                instructor_id: 5,
                location: "Smith 17".to_owned(),
            })
        );
    }

    #[test]
    fn test_form_flattens_instructor_fields() {
        let form: InstructorForm = serde_json::from_str(
            r#"{"id":4,"last_name":"Kapoor","first_mid_name":"Candace","hire_date":"2001-01-15","selected_courses":["1050","x"]}"#,
        )
        .unwrap();

        assert_eq!(form.instructor.id, 4);
        assert_eq!(form.instructor.hire_date, NaiveDate::from_ymd_opt(2001, 1, 15));
        assert_eq!(parse_course_ids(&form.selected_courses), vec![1050]);
        assert!(form.instructor.model_state().is_valid());
    }
}
