use crate::action::{ActionResult, Redirect, SAVE_CHANGES_ERROR, View};
use crate::auth::{Caller, require_staff};
use crate::dtos::Validate;
use crate::dtos::student::{
    EnrollmentViewModel, StudentDetailsViewModel, StudentIndexParams, StudentIndexViewModel,
    StudentViewModel,
};
use crate::handlers::{DELETE_FAILED_MESSAGE, HandlerResult, SAVE_FAILED_MESSAGE};
use database::UnitOfWork;
use database::services::student::StudentQuery;
use log::{info, warn};
use models::paging::{PaginatedList, clamp_page, page_or_first};

const CONTROLLER: &str = "Students";
pub const PAGE_SIZE: u64 = 3;

pub async fn index(
    uow: &dyn UnitOfWork,
    params: StudentIndexParams,
) -> HandlerResult<StudentIndexViewModel> {
    let sort_order = params.sort_order.clone().unwrap_or_default();
    let (name_sort_parm, date_sort_parm) = StudentIndexViewModel::sort_links(&sort_order);
    let (search, page) = params.search_and_page();
    let page = page_or_first(page);

    let query = StudentQuery {
        search: search.clone(),
        sort: params.sort(),
        page,
        per_page: PAGE_SIZE,
    };
    let (students, total_items) = uow.students(&query).await?;
    let page = clamp_page(page, total_items, PAGE_SIZE);

    Ok(ActionResult::view(
        "Index",
        StudentIndexViewModel {
            current_sort: sort_order,
            name_sort_parm,
            date_sort_parm,
            current_filter: search,
            students: PaginatedList::new(students, total_items, page, PAGE_SIZE)
                .map(StudentViewModel::from),
        },
    ))
}

pub async fn details(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
) -> HandlerResult<StudentDetailsViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some((student, enrollments)) = uow.student_with_enrollments(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let full_name = student.full_name();
    Ok(ActionResult::view(
        "Details",
        StudentDetailsViewModel {
            student: student.into(),
            full_name,
            enrollments: enrollments
                .into_iter()
                .map(EnrollmentViewModel::from)
                .collect(),
        },
    ))
}

pub fn create_form() -> ActionResult<StudentViewModel> {
    ActionResult::view("Create", StudentViewModel::default())
}

pub async fn create(
    uow: &mut dyn UnitOfWork,
    model: StudentViewModel,
) -> HandlerResult<StudentViewModel> {
    let mut state = model.model_state();
    if !state.is_valid() {
        return Ok(View::new("Create", model).with_model_state(state).into());
    }

    uow.add(model.clone().into_model().into());

    match uow.save().await {
        Ok(()) => {
            info!("created student {}, {}", model.last_name, model.first_mid_name);
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to create student: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            Ok(View::new("Create", model).with_model_state(state).into())
        }
    }
}

pub async fn edit_form(uow: &dyn UnitOfWork, id: Option<i32>) -> HandlerResult<StudentViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };

    Ok(match uow.student(id).await? {
        Some(student) => ActionResult::view("Edit", student.into()),
        None => ActionResult::NotFound,
    })
}

pub async fn edit(
    uow: &mut dyn UnitOfWork,
    id: i32,
    model: StudentViewModel,
) -> HandlerResult<StudentViewModel> {
    if model.id != id {
        return Ok(ActionResult::NotFound);
    }

    let mut state = model.model_state();
    if !state.is_valid() {
        return Ok(View::new("Edit", model).with_model_state(state).into());
    }

    let Some(mut student) = uow.student(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    model.merge_into(&mut student);
    uow.update(student.into());

    match uow.save().await {
        Ok(()) => {
            info!("updated student {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to update student {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            Ok(View::new("Edit", model).with_model_state(state).into())
        }
    }
}

pub async fn delete_form(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
    save_changes_error: bool,
) -> HandlerResult<StudentViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(student) = uow.student(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let mut view = View::new("Delete", StudentViewModel::from(student));
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
    let Some(student) = uow.student(id).await? else {
        return Ok(ActionResult::redirect_to_index(CONTROLLER));
    };

    if !require_staff(caller).is_allowed() {
        warn!("delete of student {id} denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    uow.delete(student.into());

    match uow.save().await {
        Ok(()) => {
            info!("deleted student {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to delete student {id}: {e}");
            Ok(Redirect::new(CONTROLLER, "Delete")
                .with_id(id)
                .with_flag(SAVE_CHANGES_ERROR)
                .into())
        }
    }
}
