use crate::action::ModelState;
use crate::dtos::{Validate, check_required, check_text};
use chrono::NaiveDate;
use database::entities::{course, enrollment, student};
use database::services::student::StudentSort;
use models::{grade::Grade, paging::PaginatedList};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct StudentViewModel {
    pub id: i32,
    pub last_name: String,
    pub first_mid_name: String,
    pub enrollment_date: Option<NaiveDate>,
}

impl From<student::Model> for StudentViewModel {
    fn from(model: student::Model) -> Self {
        Self {
            id: model.id,
            last_name: model.last_name,
            first_mid_name: model.first_mid_name,
            enrollment_date: Some(model.enrollment_date),
        }
    }
}

impl StudentViewModel {
    /// A new row; the id is generated by the store
    pub fn into_model(self) -> student::Model {
        student::Model {
            id: 0,
            last_name: self.last_name.trim().to_owned(),
            first_mid_name: self.first_mid_name.trim().to_owned(),
            enrollment_date: self.enrollment_date.unwrap_or_default(),
        }
    }

    pub fn merge_into(&self, model: &mut student::Model) {
        model.last_name = self.last_name.trim().to_owned();
        model.first_mid_name = self.first_mid_name.trim().to_owned();
        if let Some(enrollment_date) = self.enrollment_date {
            model.enrollment_date = enrollment_date;
        }
    }
}

impl Validate for StudentViewModel {
    fn validate(&self, state: &mut ModelState) {
        check_text(state, "last_name", "Last Name", &self.last_name, 1, 50);
        check_text(state, "first_mid_name", "First Name", &self.first_mid_name, 1, 50);
        check_required(state, "enrollment_date", "Enrollment Date", &self.enrollment_date);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EnrollmentViewModel {
    pub enrollment_id: i32,
    pub course_id: i32,
    pub course_title: Option<String>,
    #[schema(value_type = Option<String>)]
    pub grade: Option<Grade>,
}

impl From<(enrollment::Model, Option<course::Model>)> for EnrollmentViewModel {
    fn from((enrollment, course): (enrollment::Model, Option<course::Model>)) -> Self {
        Self {
            enrollment_id: enrollment.id,
            course_id: enrollment.course_id,
            course_title: course.map(|c| c.title),
            grade: enrollment.grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StudentDetailsViewModel {
    #[serde(flatten)]
    pub student: StudentViewModel,
    pub full_name: String,
    pub enrollments: Vec<EnrollmentViewModel>,
}

/// Query string of the student list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct StudentIndexParams {
    /// `""`, `name_desc`, `Date` or `date_desc`
    pub sort_order: Option<String>,
    pub current_filter: Option<String>,
    pub search_string: Option<String>,
    pub page_number: Option<u64>,
}

impl StudentIndexParams {
    pub fn sort(&self) -> StudentSort {
        match self.sort_order.as_deref() {
            Some("name_desc") => StudentSort::LastNameDesc,
            Some("Date") => StudentSort::EnrollmentDate,
            Some("date_desc") => StudentSort::EnrollmentDateDesc,
            _ => StudentSort::LastName,
        }
    }

    /// A new search starts over at the first page, otherwise the previous
    /// filter is kept while paging
    pub fn search_and_page(&self) -> (Option<String>, Option<u64>) {
        match &self.search_string {
            Some(search) => (Some(search.clone()), Some(1)),
            None => (self.current_filter.clone(), self.page_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentIndexViewModel {
    pub current_sort: String,
    pub name_sort_parm: String,
    pub date_sort_parm: String,
    pub current_filter: Option<String>,
    pub students: PaginatedList<StudentViewModel>,
}

impl StudentIndexViewModel {
    /// Sort parameters the column headers link to, toggling the current order
    pub fn sort_links(sort_order: &str) -> (String, String) {
        let name_sort = if sort_order.is_empty() { "name_desc" } else { "" };
        let date_sort = if sort_order == "Date" { "date_desc" } else { "Date" };
        (name_sort.to_owned(), date_sort.to_owned())
    }
}
