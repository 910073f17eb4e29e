//! Outcomes of a handler: a rendered view document, a redirect to another
//! action, or a bare not-found / forbidden status.

use crate::error::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect as HttpRedirect, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key under which errors that belong to no single field are stored
pub const MODEL_ERROR_KEY: &str = "";

pub const SAVE_CHANGES_ERROR: &str = "saveChangesError";
pub const CONCURRENCY_ERROR: &str = "concurrencyError";

#[derive(Debug)]
pub enum ActionResult<T> {
    View(View<T>),
    Redirect(Redirect),
    NotFound,
    Forbidden,
}

impl<T> ActionResult<T> {
    pub fn view(name: &'static str, model: T) -> Self {
        Self::View(View::new(name, model))
    }

    pub fn redirect_to_index(controller: &'static str) -> Self {
        Self::Redirect(Redirect::new(controller, "Index"))
    }

    /// The view document, if this outcome renders one
    #[cfg(test)]
    pub fn as_view(&self) -> Option<&View<T>> {
        match self {
            Self::View(view) => Some(view),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_redirect(&self) -> Option<&Redirect> {
        match self {
            Self::Redirect(redirect) => Some(redirect),
            _ => None,
        }
    }
}

impl<T> From<View<T>> for ActionResult<T> {
    fn from(view: View<T>) -> Self {
        Self::View(view)
    }
}

impl<T> From<Redirect> for ActionResult<T> {
    fn from(redirect: Redirect) -> Self {
        Self::Redirect(redirect)
    }
}

#[derive(Debug, Serialize)]
pub struct View<T> {
    pub view: &'static str,
    pub model: T,
    pub model_state: ModelState,
    pub view_data: ViewData,
}

impl<T> View<T> {
    pub fn new(view: &'static str, model: T) -> Self {
        Self {
            view,
            model,
            model_state: ModelState::default(),
            view_data: ViewData::default(),
        }
    }

    pub fn with_model_state(mut self, model_state: ModelState) -> Self {
        self.model_state = model_state;
        self
    }

    pub fn with_select_list(mut self, name: &'static str, options: Vec<SelectOption>) -> Self {
        self.view_data.select_lists.insert(name, options);
        self
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.view_data.error_message = Some(message.into());
        self
    }

    #[cfg(test)]
    pub fn select_list(&self, name: &str) -> Option<&[SelectOption]> {
        self.view_data.select_lists.get(name).map(Vec::as_slice)
    }
}

/// Validation errors keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelState {
    errors: BTreeMap<String, Vec<String>>,
}

impl ModelState {
    pub fn add_error(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(key.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_model_error(&mut self, message: impl Into<String>) {
        self.add_error(MODEL_ERROR_KEY, message);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn errors(&self, key: &str) -> &[String] {
        self.errors.get(key).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewData {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub select_lists: BTreeMap<&'static str, Vec<SelectOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One entry of a drop-down or multi-select
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl ToString, text: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            text: text.into(),
            selected,
        }
    }
}

/// Target of a redirect to another action of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub controller: &'static str,
    pub action: &'static str,
    pub id: Option<i32>,
    pub flags: Vec<&'static str>,
}

impl Redirect {
    pub fn new(controller: &'static str, action: &'static str) -> Self {
        Self {
            controller,
            action,
            id: None,
            flags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_flag(mut self, flag: &'static str) -> Self {
        self.flags.push(flag);
        self
    }

    #[cfg(test)]
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(&flag)
    }

    /// Path of the target action; `Index` is served from the resource root
    pub fn location(&self) -> String {
        let mut location = format!("/{}", self.controller.to_ascii_lowercase());

        if self.action != "Index" {
            location.push('/');
            location.push_str(&self.action.to_ascii_lowercase());
        }
        if let Some(id) = self.id {
            location.push_str(&format!("/{id}"));
        }
        if !self.flags.is_empty() {
            let query: Vec<String> = self.flags.iter().map(|f| format!("{f}=true")).collect();
            location.push('?');
            location.push_str(&query.join("&"));
        }

        location
    }
}

impl<T: Serialize> IntoResponse for ActionResult<T> {
    fn into_response(self) -> Response {
        match self {
            ActionResult::View(view) => {
                let status = if view.model_state.is_valid() {
                    StatusCode::OK
                } else {
                    StatusCode::UNPROCESSABLE_ENTITY
                };
                (status, Json(view)).into_response()
            }
            ActionResult::Redirect(redirect) => {
                HttpRedirect::to(&redirect.location()).into_response()
            }
            ActionResult::NotFound => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ErrorResponse::new(status, "Not Found"))).into_response()
            }
            ActionResult::Forbidden => {
                let status = StatusCode::FORBIDDEN;
                (status, Json(ErrorResponse::new(status, "Forbidden"))).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_locations() {
        assert_eq!(Redirect::new("Students", "Index").location(), "/students");
        assert_eq!(
            Redirect::new("Students", "Delete")
                .with_id(7)
                .with_flag(SAVE_CHANGES_ERROR)
                .location(),
            "/students/delete/7?saveChangesError=true"
        );
        assert_eq!(
            Redirect::new("Departments", "Edit")
                .with_id(2)
                .with_flag(CONCURRENCY_ERROR)
                .location(),
            "/departments/edit/2?concurrencyError=true"
        );
    }

    #[test]
    fn test_model_state() {
        let mut state = ModelState::default();
        assert!(state.is_valid());

        state.add_error("title", "The Title field is required.");
        state.add_model_error("Unable to save changes.");

        assert!(!state.is_valid());
        assert_eq!(state.errors("title").len(), 1);
        assert_eq!(state.errors(MODEL_ERROR_KEY), ["Unable to save changes."]);
        assert!(state.errors("credits").is_empty());
    }

    #[test]
    fn test_invalid_view_is_unprocessable() {
        let mut state = ModelState::default();
        state.add_error("name", "required");

        let response = ActionResult::view("Create", ()).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            ActionResult::View(View::new("Create", ()).with_model_state(state)).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_status_outcomes() {
        let response = ActionResult::<()>::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ActionResult::<()>::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = ActionResult::<()>::redirect_to_index("Courses").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/courses");
    }
}
