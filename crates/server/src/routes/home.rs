use crate::action::ActionResult;
use crate::dtos::home::EnrollmentDateGroupViewModel;
use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;
use axum::extract::State;

/// Student counts per enrollment date
#[utoipa::path(
    get,
    path = "/about",
    responses(
        (status = 200, description = "About view with enrollment date groups"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Home"
)]
pub async fn about(
    State(state): State<AppState>,
) -> Result<ActionResult<Vec<EnrollmentDateGroupViewModel>>, AppError> {
    let uow = state.unit_of_work();
    handlers::home::about(&uow).await
}
