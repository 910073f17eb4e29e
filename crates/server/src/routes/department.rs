use crate::action::ActionResult;
use crate::dtos::department::{DepartmentDeleteForm, DepartmentViewModel};
use crate::error::AppError;
use crate::handlers;
use crate::routes::{ErrorFlags, parse_id};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Departments with their administrators", body = Vec<DepartmentViewModel>),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn index(
    State(state): State<AppState>,
) -> Result<ActionResult<Vec<DepartmentViewModel>>, AppError> {
    let uow = state.unit_of_work();
    handlers::department::index(&uow).await
}

#[utoipa::path(
    get,
    path = "/departments/details/{id}",
    params(
        ("id" = String, Path, description = "Department ID")
    ),
    responses(
        (status = 200, description = "Department details view", body = DepartmentViewModel),
        (status = 404, description = "Department not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::department::details(&uow, parse_id(&id)).await
}

#[utoipa::path(
    get,
    path = "/departments/create",
    responses(
        (status = 200, description = "Empty department form with instructor options")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn create_form(
    State(state): State<AppState>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::department::create_form(&uow).await
}

#[utoipa::path(
    post,
    path = "/departments/create",
    request_body = DepartmentViewModel,
    responses(
        (status = 303, description = "Created, redirects to the department list"),
        (status = 422, description = "Invalid input, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn create(
    State(state): State<AppState>,
    Json(model): Json<DepartmentViewModel>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::department::create(&mut uow, model).await
}

#[utoipa::path(
    get,
    path = "/departments/edit/{id}",
    params(
        ("id" = String, Path, description = "Department ID"),
        ErrorFlags
    ),
    responses(
        (status = 200, description = "Department form carrying the current row version", body = DepartmentViewModel),
        (status = 404, description = "Department not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flags): Query<ErrorFlags>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::department::edit_form(&uow, parse_id(&id), flags.concurrency_error).await
}

/// Saves a department if its row version is still current
#[utoipa::path(
    post,
    path = "/departments/edit/{id}",
    params(
        ("id" = i32, Path, description = "Department ID")
    ),
    request_body = DepartmentViewModel,
    responses(
        (status = 303, description = "Saved, or redirected back to the form with concurrencyError=true"),
        (status = 404, description = "ID mismatch"),
        (status = 422, description = "Invalid input, department deleted or save failure, form redisplayed")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(model): Json<DepartmentViewModel>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::department::edit(&mut uow, id, model).await
}

#[utoipa::path(
    get,
    path = "/departments/delete/{id}",
    params(
        ("id" = String, Path, description = "Department ID"),
        ErrorFlags
    ),
    responses(
        (status = 200, description = "Delete confirmation", body = DepartmentViewModel),
        (status = 303, description = "Department already deleted by another user"),
        (status = 404, description = "Department not found")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(flags): Query<ErrorFlags>,
) -> Result<ActionResult<DepartmentViewModel>, AppError> {
    let uow = state.unit_of_work();
    handlers::department::delete_form(&uow, parse_id(&id), flags.concurrency_error).await
}

/// Deletes a department if its row version is still current
#[utoipa::path(
    post,
    path = "/departments/delete/{id}",
    params(
        ("id" = i32, Path, description = "Department ID")
    ),
    request_body = DepartmentDeleteForm,
    responses(
        (status = 303, description = "Redirects to the list, or back to the confirmation with concurrencyError=true")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Departments"
)]
pub async fn delete_confirmed(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(form): Json<DepartmentDeleteForm>,
) -> Result<ActionResult<()>, AppError> {
    let mut uow = state.unit_of_work();
    handlers::department::delete_confirmed(&mut uow, id, &form.row_version).await
}
