use crate::action::{ActionResult, ModelState, Redirect, SAVE_CHANGES_ERROR, SelectOption, View};
use crate::auth::{Caller, Operation, authorize};
use crate::dtos::Validate;
use crate::dtos::course::CourseViewModel;
use crate::handlers::{DELETE_FAILED_MESSAGE, HandlerResult, SAVE_FAILED_MESSAGE};
use database::UnitOfWork;
use log::{info, warn};
use models::course_status::CourseStatus;
use sea_orm::DbErr;

const CONTROLLER: &str = "Courses";
const DEPARTMENT_LIST: &str = "department_id";

/// Departments ordered by name, for the course forms
async fn department_options(
    uow: &dyn UnitOfWork,
    selected: Option<i32>,
) -> Result<Vec<SelectOption>, DbErr> {
    Ok(uow
        .departments()
        .await?
        .into_iter()
        .map(|d| SelectOption::new(d.id, d.name, Some(d.id) == selected))
        .collect())
}

async fn form_view(
    uow: &dyn UnitOfWork,
    name: &'static str,
    model: CourseViewModel,
    state: ModelState,
) -> HandlerResult<CourseViewModel> {
    let selected = (model.department_id > 0).then_some(model.department_id);
    let options = department_options(uow, selected).await?;

    Ok(View::new(name, model)
        .with_model_state(state)
        .with_select_list(DEPARTMENT_LIST, options)
        .into())
}

/// Lists the courses the caller may read: approved ones and their own,
/// or all of them for staff
pub async fn index(uow: &dyn UnitOfWork, caller: &Caller) -> HandlerResult<Vec<CourseViewModel>> {
    let courses = uow
        .courses()
        .await?
        .into_iter()
        .filter(|(course, _)| authorize(caller, course, Operation::Read).is_allowed())
        .map(CourseViewModel::from)
        .collect();

    Ok(ActionResult::view("Index", courses))
}

pub async fn details(uow: &dyn UnitOfWork, id: Option<i32>) -> HandlerResult<CourseViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some((course, department)) = uow.course_with_department(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let model = CourseViewModel::from((course, department));
    form_view(uow, "Details", model, ModelState::default()).await
}

/// Applies a reviewer's decision (or an owner's resubmission) to a course
pub async fn review(
    uow: &mut dyn UnitOfWork,
    caller: &Caller,
    id: i32,
    model: CourseViewModel,
) -> HandlerResult<CourseViewModel> {
    if model.id != id {
        return Ok(ActionResult::NotFound);
    }

    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Details", model, state).await;
    }

    let Some(mut course) = uow.course(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let operation = match model.status {
        CourseStatus::Approved => Operation::Approve,
        CourseStatus::Rejected => Operation::Reject,
        CourseStatus::Submitted => Operation::Update,
    };
    if !authorize(caller, &course, operation).is_allowed() {
        warn!("{operation:?} of course {id} denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    model.merge_review_into(&mut course);
    uow.update(course.into());

    match uow.save().await {
        Ok(()) => {
            info!("course {id} is now {}", model.status.as_str());
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to review course {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Details", model, state).await
        }
    }
}

pub async fn create_form(uow: &dyn UnitOfWork) -> HandlerResult<CourseViewModel> {
    form_view(uow, "Create", CourseViewModel::default(), ModelState::default()).await
}

pub async fn create(
    uow: &mut dyn UnitOfWork,
    caller: &Caller,
    model: CourseViewModel,
) -> HandlerResult<CourseViewModel> {
    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Create", model, state).await;
    }

    let course = model
        .clone()
        .into_model(caller.user_id().map(str::to_owned));
    if !authorize(caller, &course, Operation::Create).is_allowed() {
        warn!("course creation denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    let id = course.id;
    uow.add(course.into());

    match uow.save().await {
        Ok(()) => {
            info!("created course {id} for {:?}", caller.user_id());
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to create course {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Create", model, state).await
        }
    }
}

pub async fn edit_form(
    uow: &dyn UnitOfWork,
    caller: &Caller,
    id: Option<i32>,
) -> HandlerResult<CourseViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(course) = uow.course(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    if !authorize(caller, &course, Operation::Update).is_allowed() {
        return Ok(ActionResult::Forbidden);
    }

    form_view(uow, "Edit", course.into(), ModelState::default()).await
}

pub async fn edit(
    uow: &mut dyn UnitOfWork,
    caller: &Caller,
    id: i32,
    model: CourseViewModel,
) -> HandlerResult<CourseViewModel> {
    if model.id != id {
        return Ok(ActionResult::NotFound);
    }

    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Edit", model, state).await;
    }

    let Some(mut course) = uow.course(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    if !authorize(caller, &course, Operation::Update).is_allowed() {
        warn!("update of course {id} denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    model.merge_into(&mut course);
    uow.update(course.into());

    match uow.save().await {
        Ok(()) => {
            info!("updated course {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to update course {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Edit", model, state).await
        }
    }
}

pub async fn delete_form(
    uow: &dyn UnitOfWork,
    caller: &Caller,
    id: Option<i32>,
    save_changes_error: bool,
) -> HandlerResult<CourseViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some((course, department)) = uow.course_with_department(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    if !authorize(caller, &course, Operation::Delete).is_allowed() {
        return Ok(ActionResult::Forbidden);
    }

    let mut view = View::new("Delete", CourseViewModel::from((course, department)));
    if save_changes_error {
        view = view.with_error_message(DELETE_FAILED_MESSAGE);
    }
    Ok(view.into())
}

pub async fn delete_confirmed(
    uow: &mut dyn UnitOfWork,
    caller: &Caller,
    id: i32,
) -> HandlerResult<()> {
    let Some(course) = uow.course(id).await? else {
        return Ok(ActionResult::redirect_to_index(CONTROLLER));
    };

    if !authorize(caller, &course, Operation::Delete).is_allowed() {
        warn!("delete of course {id} denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    uow.delete(course.into());

    match uow.save().await {
        Ok(()) => {
            info!("deleted course {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to delete course {id}: {e}");
            Ok(Redirect::new(CONTROLLER, "Delete")
                .with_id(id)
                .with_flag(SAVE_CHANGES_ERROR)
                .into())
        }
    }
}
