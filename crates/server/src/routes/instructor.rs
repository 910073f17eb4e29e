use crate::action::ActionResult;
use crate::auth::Caller;
use crate::dtos::instructor::{
    InstructorForm, InstructorIndexParams, InstructorIndexViewModel, InstructorViewModel,
};
use crate::error::AppError;
use crate::handlers;
use crate::routes::{ErrorFlags, parse_id};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// Instructors, optionally drilling into one instructor's courses and one
/// course's enrollments
#[utoipa::path(
    get,
    path = "/instructors",
    params(InstructorIndexParams),
    responses(
        (status = 200, description = "Instructor list view"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<InstructorIndexParams>,
) -> Result<ActionResult<InstructorIndexViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::instructor::index(&uow, params).await
}

#[utoipa::path(
    get,
    path = "/instructors/details/{id}",
    params(
        ("id" = String, Path, description = "Instructor ID")
    ),
    responses(
        (status = 200, description = "Instructor details view", body = InstructorViewModel),
        (status = 404, description = "Instructor not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::instructor::details(&uow, parse_id(&id)).await
}

#[utoipa::path(
    get,
    path = "/instructors/create",
    responses(
        (status = 200, description = "Empty instructor form with course options")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn create_form(
    State(state): State<AppState>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::instructor::create_form(&uow).await
}

#[utoipa::path(
    post,
    path = "/instructors/create",
    request_body = InstructorForm,
    responses(
        (status = 303, description = "Created, redirects to the instructor list"),
        (status = 422, description = "Invalid input, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(form): Json<InstructorForm>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::instructor::create(&mut uow, form).await
}

#[utoipa::path(
    get,
    path = "/instructors/edit/{id}",
    params(
        ("id" = String, Path, description = "Instructor ID")
    ),
    responses(
        (status = 200, description = "Instructor form with assigned courses", body = InstructorViewModel),
        (status = 404, description = "Instructor not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::instructor::edit_form(&uow, parse_id(&id)).await
}

/// Updates an instructor, its office and its course assignments
#[utoipa::path(
    post,
    path = "/instructors/edit/{id}",
    params(
        ("id" = i32, Path, description = "Instructor ID")
    ),
    request_body = InstructorForm,
    responses(
        (status = 303, description = "Saved, redirects to the instructor list"),
        (status = 404, description = "Instructor not found or ID mismatch"),
        (status = 422, description = "Invalid input or save failure, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(form): Json<InstructorForm>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::instructor::edit(&mut uow, id, form).await
}

#[utoipa::path(
    get,
    path = "/instructors/delete/{id}",
    params(
        ("id" = String, Path, description = "Instructor ID"),
        ErrorFlags
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = InstructorViewModel),
        (status = 404, description = "Instructor not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flags): Query<ErrorFlags>,
) -> Result<ActionResult<InstructorViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::instructor::delete_form(&uow, parse_id(&id), flags.save_changes_error).await
}

/// Deletes an instructor and unsets it as department administrator;
/// requires an administrator or manager
#[utoipa::path(
    post,
    path = "/instructors/delete/{id}",
    params(
        ("id" = i32, Path, description = "Instructor ID")
    ),
    responses(
        (status = 303, description = "Redirects to the list, or back to the confirmation on failure"),
        (status = 403, description = "Caller is not an administrator or manager")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Instructors"
)]
pub async fn delete_confirmed(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<ActionResult<()>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::instructor::delete_confirmed(&mut uow, &caller, id).await
}
