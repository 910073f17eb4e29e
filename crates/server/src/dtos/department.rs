use crate::action::ModelState;
use crate::dtos::{Validate, check_required, check_text};
use chrono::NaiveDate;
use database::entities::{department, instructor};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DepartmentViewModel {
    pub id: i32,
    pub name: String,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    /// Administrator
    pub instructor_id: Option<i32>,
    #[serde(skip_deserializing)]
    pub administrator_name: Option<String>,
    /// Concurrency token last seen by the client
    pub row_version: Vec<u8>,
}

impl From<department::Model> for DepartmentViewModel {
    fn from(model: department::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            budget: model.budget,
            start_date: Some(model.start_date),
            instructor_id: model.instructor_id,
            administrator_name: None,
            row_version: model.row_version,
        }
    }
}

impl From<(department::Model, Option<instructor::Model>)> for DepartmentViewModel {
    fn from((department, administrator): (department::Model, Option<instructor::Model>)) -> Self {
        Self {
            administrator_name: administrator.map(|i| i.full_name()),
            ..Self::from(department)
        }
    }
}

impl DepartmentViewModel {
    /// A new row; id and row version are assigned when it is saved
    pub fn into_model(self) -> department::Model {
        department::Model {
            id: 0,
            name: self.name.trim().to_owned(),
            budget: self.budget,
            start_date: self.start_date.unwrap_or_default(),
            instructor_id: self.instructor_id,
            row_version: Vec::new(),
        }
    }

    /// Copies the editable fields; the row version is never taken from input
    pub fn merge_into(&self, model: &mut department::Model) {
        model.name = self.name.trim().to_owned();
        model.budget = self.budget;
        if let Some(start_date) = self.start_date {
            model.start_date = start_date;
        }
        model.instructor_id = self.instructor_id;
    }
}

impl Validate for DepartmentViewModel {
    fn validate(&self, state: &mut ModelState) {
        check_text(state, "name", "Name", &self.name, 3, 50);
        if !self.budget.is_finite() || self.budget < 0.0 {
            state.add_error("budget", "The field Budget must be a non-negative amount.");
        }
        check_required(state, "start_date", "Start Date", &self.start_date);
    }
}

/// Body of a department delete confirmation
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct DepartmentDeleteForm {
    pub row_version: Vec<u8>,
}
