pub mod course;
pub mod department;
pub mod health;
pub mod home;
pub mod instructor;
pub mod student;

use crate::action::ActionResult;
use crate::state::AppState;
use axum::{Router, routing::get};
use serde::Deserialize;
use utoipa::IntoParams;

/// Query flags set by a failed delete or edit when redirecting back to its form
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorFlags {
    pub save_changes_error: bool,
    pub concurrency_error: bool,
}

/// Route identifiers that are not numbers are treated like missing ones
pub fn parse_id(id: &str) -> Option<i32> {
    id.trim().parse().ok()
}

/// Details requested without an identifier
pub async fn missing_id() -> ActionResult<()> {
    ActionResult::NotFound
}

/// Every resource route; all of them expect a validated access token
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(student::index))
        .route("/students/details", get(missing_id))
        .route("/students/details/{id}", get(student::details))
        .route(
            "/students/create",
            get(student::create_form).post(student::create),
        )
        .route(
            "/students/edit/{id}",
            get(student::edit_form).post(student::edit),
        )
        .route(
            "/students/delete/{id}",
            get(student::delete_form).post(student::delete_confirmed),
        )
        .route("/courses", get(course::index))
        .route("/courses/details", get(missing_id))
        .route(
            "/courses/details/{id}",
            get(course::details).post(course::review),
        )
        .route(
            "/courses/create",
            get(course::create_form).post(course::create),
        )
        .route("/courses/edit/{id}", get(course::edit_form).post(course::edit))
        .route(
            "/courses/delete/{id}",
            get(course::delete_form).post(course::delete_confirmed),
        )
        .route("/instructors", get(instructor::index))
        .route("/instructors/details", get(missing_id))
        .route("/instructors/details/{id}", get(instructor::details))
        .route(
            "/instructors/create",
            get(instructor::create_form).post(instructor::create),
        )
        .route(
            "/instructors/edit/{id}",
            get(instructor::edit_form).post(instructor::edit),
        )
        .route(
            "/instructors/delete/{id}",
            get(instructor::delete_form).post(instructor::delete_confirmed),
        )
        .route("/departments", get(department::index))
        .route("/departments/details", get(missing_id))
        .route("/departments/details/{id}", get(department::details))
        .route(
            "/departments/create",
            get(department::create_form).post(department::create),
        )
        .route(
            "/departments/edit/{id}",
            get(department::edit_form).post(department::edit),
        )
        .route(
            "/departments/delete/{id}",
            get(department::delete_form).post(department::delete_confirmed),
        )
        .route("/about", get(home::about))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_error_flags_use_camel_case() {
        let flags: ErrorFlags = serde_json::from_str(r#"{"saveChangesError":true}"#).unwrap();
        assert!(flags.save_changes_error);
        assert!(!flags.concurrency_error);
    }
}
