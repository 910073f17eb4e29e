use crate::action::{ActionResult, CONCURRENCY_ERROR, ModelState, Redirect, SelectOption, View};
use crate::concurrency::{TokenCheck, check_row_version};
use crate::dtos::Validate;
use crate::dtos::department::DepartmentViewModel;
use crate::handlers::{HandlerResult, SAVE_FAILED_MESSAGE};
use database::{SaveError, UnitOfWork};
use log::{info, warn};
use sea_orm::DbErr;

const CONTROLLER: &str = "Departments";
const INSTRUCTOR_LIST: &str = "instructor_id";

pub const DELETED_BY_ANOTHER_USER: &str =
    "Unable to save changes. The department was deleted by another user.";

const EDIT_CONFLICT_MESSAGE: &str = "The record you attempted to edit was modified by another user \
    after you got the original value. The edit operation was canceled and the current values in the \
    database have been displayed. If you still want to edit this record, save it again.";

const DELETE_CONFLICT_MESSAGE: &str = "The record you attempted to delete was modified by another \
    user after you got the original values. The delete operation was canceled and the current values \
    in the database have been displayed. If you still want to delete this record, confirm the delete \
    again.";

async fn instructor_options(
    uow: &dyn UnitOfWork,
    selected: Option<i32>,
) -> Result<Vec<SelectOption>, DbErr> {
    Ok(uow
        .instructors()
        .await?
        .into_iter()
        .map(|i| SelectOption::new(i.id, i.full_name(), Some(i.id) == selected))
        .collect())
}

async fn form_view(
    uow: &dyn UnitOfWork,
    name: &'static str,
    model: DepartmentViewModel,
    state: ModelState,
) -> HandlerResult<DepartmentViewModel> {
    let options = instructor_options(uow, model.instructor_id).await?;

    Ok(View::new(name, model)
        .with_model_state(state)
        .with_select_list(INSTRUCTOR_LIST, options)
        .into())
}

fn conflict_redirect(action: &'static str, id: i32) -> Redirect {
    Redirect::new(CONTROLLER, action)
        .with_id(id)
        .with_flag(CONCURRENCY_ERROR)
}

pub async fn index(uow: &dyn UnitOfWork) -> HandlerResult<Vec<DepartmentViewModel>> {
    let departments = uow
        .departments_with_administrator()
        .await?
        .into_iter()
        .map(DepartmentViewModel::from)
        .collect();

    Ok(ActionResult::view("Index", departments))
}

pub async fn details(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
) -> HandlerResult<DepartmentViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };

    Ok(match uow.department_with_administrator(id).await? {
        Some(found) => ActionResult::view("Details", found.into()),
        None => ActionResult::NotFound,
    })
}

pub async fn create_form(uow: &dyn UnitOfWork) -> HandlerResult<DepartmentViewModel> {
    form_view(uow, "Create", DepartmentViewModel::default(), ModelState::default()).await
}

pub async fn create(
    uow: &mut dyn UnitOfWork,
    model: DepartmentViewModel,
) -> HandlerResult<DepartmentViewModel> {
    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Create", model, state).await;
    }

    uow.add(model.clone().into_model().into());

    match uow.save().await {
        Ok(()) => {
            info!("created department {}", model.name);
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to create department {}: {e}", model.name);
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Create", model, state).await
        }
    }
}

pub async fn edit_form(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
    concurrency_error: bool,
) -> HandlerResult<DepartmentViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(found) = uow.department_with_administrator(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let result = form_view(uow, "Edit", found.into(), ModelState::default()).await?;
    Ok(match result {
        ActionResult::View(view) if concurrency_error => {
            view.with_error_message(EDIT_CONFLICT_MESSAGE).into()
        }
        other => other,
    })
}

/// Applies an edit guarded by the submitted row version.
///
/// The stored token is compared before any field is touched, and the update
/// is staged against that token so a writer that commits in between is also
/// reported as a conflict.
pub async fn edit(
    uow: &mut dyn UnitOfWork,
    id: i32,
    model: DepartmentViewModel,
) -> HandlerResult<DepartmentViewModel> {
    if model.id != id {
        return Ok(ActionResult::NotFound);
    }

    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Edit", model, state).await;
    }

    let Some((mut department, _)) = uow.department_with_administrator(id).await? else {
        warn!("department {id} was deleted before the edit was saved");
        state.add_model_error(DELETED_BY_ANOTHER_USER);
        return form_view(uow, "Edit", model, state).await;
    };

    if check_row_version(&department.row_version, &model.row_version) == TokenCheck::Conflict {
        warn!("department {id} was modified by another user, edit rejected");
        return Ok(conflict_redirect("Edit", id).into());
    }

    uow.track_row_version(id, department.row_version.clone());
    model.merge_into(&mut department);
    uow.update(department.into());

    match uow.save().await {
        Ok(()) => {
            info!("updated department {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(SaveError::Conflict) => {
            warn!("department {id} changed while saving, edit rejected");
            Ok(conflict_redirect("Edit", id).into())
        }
        Err(e) => {
            warn!("failed to update department {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Edit", model, state).await
        }
    }
}

pub async fn delete_form(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
    concurrency_error: bool,
) -> HandlerResult<DepartmentViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(found) = uow.department_with_administrator(id).await? else {
        // Somebody else deleted it while the user was confirming
        return Ok(if concurrency_error {
            ActionResult::redirect_to_index(CONTROLLER)
        } else {
            ActionResult::NotFound
        });
    };

    let mut view = View::new("Delete", DepartmentViewModel::from(found));
    if concurrency_error {
        view = view.with_error_message(DELETE_CONFLICT_MESSAGE);
    }
    Ok(view.into())
}

pub async fn delete_confirmed(
    uow: &mut dyn UnitOfWork,
    id: i32,
    row_version: &[u8],
) -> HandlerResult<()> {
    let Some((department, _)) = uow.department_with_administrator(id).await? else {
        return Ok(ActionResult::redirect_to_index(CONTROLLER));
    };

    if check_row_version(&department.row_version, row_version) == TokenCheck::Conflict {
        warn!("department {id} was modified by another user, delete rejected");
        return Ok(conflict_redirect("Delete", id).into());
    }

    uow.track_row_version(id, department.row_version.clone());
    uow.delete(department.into());

    match uow.save().await {
        Ok(()) => {
            info!("deleted department {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to delete department {id}: {e}");
            Ok(conflict_redirect("Delete", id).into())
        }
    }
}
