use crate::action::ActionResult;
use crate::auth::Caller;
use crate::dtos::course::CourseViewModel;
use crate::error::AppError;
use crate::handlers;
use crate::routes::{ErrorFlags, parse_id};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// Courses visible to the caller
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "Approved and owned courses, or every course for staff", body = Vec<CourseViewModel>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn index(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<ActionResult<Vec<CourseViewModel>>, AppError> {
    let uow = state.unit_of_work();
    handlers::course::index(&uow, &caller).await
}

#[utoipa::path(
    get,
    path = "/courses/details/{id}",
    params(
        ("id" = String, Path, description = "Course number")
    ),
    responses(
        (status = 200, description = "Course details view", body = CourseViewModel),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::course::details(&uow, parse_id(&id)).await
}

/// Approves, rejects or resubmits a course
#[utoipa::path(
    post,
    path = "/courses/details/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    request_body = CourseViewModel,
    responses(
        (status = 303, description = "Reviewed, redirects to the course list"),
        (status = 403, description = "Only administrators and managers may approve or reject"),
        (status = 404, description = "Course not found or ID mismatch"),
        (status = 422, description = "Invalid input, details redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn review(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(model): Json<CourseViewModel>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::course::review(&mut uow, &caller, id, model).await
}

#[utoipa::path(
    get,
    path = "/courses/create",
    responses(
        (status = 200, description = "Empty course form with department options")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn create_form(
    State(state): State<AppState>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::course::create_form(&uow).await
}

/// Submits a new course owned by the caller
#[utoipa::path(
    post,
    path = "/courses/create",
    request_body = CourseViewModel,
    responses(
        (status = 303, description = "Created, redirects to the course list"),
        (status = 403, description = "Caller cannot own courses"),
        (status = 422, description = "Invalid input, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    Json(model): Json<CourseViewModel>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::course::create(&mut uow, &caller, model).await
}

#[utoipa::path(
    get,
    path = "/courses/edit/{id}",
    params(
        ("id" = String, Path, description = "Course number")
    ),
    responses(
        (status = 200, description = "Course form", body = CourseViewModel),
        (status = 403, description = "Caller is neither the owner nor staff"),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::course::edit_form(&uow, &caller, parse_id(&id)).await
}

#[utoipa::path(
    post,
    path = "/courses/edit/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    request_body = CourseViewModel,
    responses(
        (status = 303, description = "Saved, redirects to the course list"),
        (status = 403, description = "Caller is neither the owner nor staff"),
        (status = 404, description = "Course not found or ID mismatch"),
        (status = 422, description = "Invalid input or save failure, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn edit(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
    Json(model): Json<CourseViewModel>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::course::edit(&mut uow, &caller, id, model).await
}

#[utoipa::path(
    get,
    path = "/courses/delete/{id}",
    params(
        ("id" = String, Path, description = "Course number"),
        ErrorFlags
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = CourseViewModel),
        (status = 403, description = "Caller is neither the owner nor staff"),
        (status = 404, description = "Course not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(flags): Query<ErrorFlags>,
) -> Result<ActionResult<CourseViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::course::delete_form(&uow, &caller, parse_id(&id), flags.save_changes_error).await
}

#[utoipa::path(
    post,
    path = "/courses/delete/{id}",
    params(
        ("id" = i32, Path, description = "Course number")
    ),
    responses(
        (status = 303, description = "Redirects to the list, or back to the confirmation on failure"),
        (status = 403, description = "Caller is neither the owner nor staff")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Courses"
)]
pub async fn delete_confirmed(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<ActionResult<()>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::course::delete_confirmed(&mut uow, &caller, id).await
}
