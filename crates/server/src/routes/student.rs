use crate::action::ActionResult;
use crate::auth::Caller;
use crate::dtos::student::{
    StudentDetailsViewModel, StudentIndexParams, StudentIndexViewModel, StudentViewModel,
};
use crate::error::AppError;
use crate::handlers;
use crate::routes::{ErrorFlags, parse_id};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// Paged, searchable and sortable student list
#[utoipa::path(
    get,
    path = "/students",
    params(StudentIndexParams),
    responses(
        (status = 200, description = "Student list view"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<StudentIndexParams>,
) -> Result<ActionResult<StudentIndexViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::student::index(&uow, params).await
}

/// Student with enrollments and their courses
#[utoipa::path(
    get,
    path = "/students/details/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details view", body = StudentDetailsViewModel),
        (status = 404, description = "Student not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<StudentDetailsViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::student::details(&uow, parse_id(&id)).await
}

#[utoipa::path(
    get,
    path = "/students/create",
    responses(
        (status = 200, description = "Empty student form")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn create_form() -> ActionResult<StudentViewModel> {
    handlers::student::create_form()
}

#[utoipa::path(
    post,
    path = "/students/create",
    request_body = StudentViewModel,
    responses(
        (status = 303, description = "Created, redirects to the student list"),
        (status = 422, description = "Invalid input, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(model): Json<StudentViewModel>,
) -> Result<ActionResult<StudentViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::student::create(&mut uow, model).await
}

#[utoipa::path(
    get,
    path = "/students/edit/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student form", body = StudentViewModel),
        (status = 404, description = "Student not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<StudentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::student::edit_form(&uow, parse_id(&id)).await
}

#[utoipa::path(
    post,
    path = "/students/edit/{id}",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = StudentViewModel,
    responses(
        (status = 303, description = "Saved, redirects to the student list"),
        (status = 404, description = "Student not found or ID mismatch"),
        (status = 422, description = "Invalid input or save failure, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(model): Json<StudentViewModel>,
) -> Result<ActionResult<StudentViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::student::edit(&mut uow, id, model).await
}

#[utoipa::path(
    get,
    path = "/students/delete/{id}",
    params(
        ("id" = String, Path, description = "Student ID"),
        ErrorFlags
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = StudentViewModel),
        (status = 404, description = "Student not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flags): Query<ErrorFlags>,
) -> Result<ActionResult<StudentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::student::delete_form(&uow, parse_id(&id), flags.save_changes_error).await
}

/// Deletes a student and its enrollments; requires an administrator or manager
#[utoipa::path(
    post,
    path = "/students/delete/{id}",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 303, description = "Redirects to the list, or back to the confirmation on failure"),
        (status = 403, description = "Caller is not an administrator or manager")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Students"
)]
pub async fn delete_confirmed(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<ActionResult<()>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::student::delete_confirmed(&mut uow, &caller, id).await
}
