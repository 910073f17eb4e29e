use crate::action::{ActionResult, ModelState, Redirect, SAVE_CHANGES_ERROR, SelectOption, View};
use crate::auth::{Caller, require_staff};
use crate::dtos::Validate;
use crate::dtos::course::{CourseEnrollmentViewModel, CourseViewModel};
use crate::dtos::instructor::{
    InstructorForm, InstructorIndexParams, InstructorIndexViewModel, InstructorViewModel,
    parse_course_ids,
};
use crate::handlers::{DELETE_FAILED_MESSAGE, HandlerResult, SAVE_FAILED_MESSAGE};
use database::entities::course_assignment;
use database::{NewInstructor, UnitOfWork};
use log::{debug, info, warn};
use sea_orm::DbErr;

const CONTROLLER: &str = "Instructors";
const COURSE_LIST: &str = "courses";

/// Course assignments to remove and to add so that the current set becomes
/// the submitted one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentDiff {
    pub removed: Vec<i32>,
    pub added: Vec<i32>,
}

impl AssignmentDiff {
    /// Both inputs must be sorted ascending
    pub fn between(existing: &[i32], submitted: &[i32]) -> Self {
        let removed = existing
            .iter()
            .copied()
            .filter(|id| submitted.binary_search(id).is_err())
            .collect();
        let added = submitted
            .iter()
            .copied()
            .filter(|id| existing.binary_search(id).is_err())
            .collect();

        Self { removed, added }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Every course, flagged when it is in `assigned` (sorted ascending)
async fn course_options(
    uow: &dyn UnitOfWork,
    assigned: &[i32],
) -> Result<Vec<SelectOption>, DbErr> {
    Ok(uow
        .courses()
        .await?
        .into_iter()
        .map(|(course, _)| {
            let selected = assigned.binary_search(&course.id).is_ok();
            SelectOption::new(course.id, format!("{} {}", course.id, course.title), selected)
        })
        .collect())
}

async fn form_view(
    uow: &dyn UnitOfWork,
    name: &'static str,
    model: InstructorViewModel,
    assigned: &[i32],
    state: ModelState,
) -> HandlerResult<InstructorViewModel> {
    let options = course_options(uow, assigned).await?;

    Ok(View::new(name, model)
        .with_model_state(state)
        .with_select_list(COURSE_LIST, options)
        .into())
}

/// Instructors with a drill-down into the selected instructor's courses and
/// the selected course's enrollments
pub async fn index(
    uow: &dyn UnitOfWork,
    params: InstructorIndexParams,
) -> HandlerResult<InstructorIndexViewModel> {
    let instructors: Vec<InstructorViewModel> = uow
        .instructors_with_assignments()
        .await?
        .into_iter()
        .map(InstructorViewModel::from)
        .collect();

    let courses: Vec<CourseViewModel> = params
        .id
        .and_then(|id| instructors.iter().find(|i| i.id == id))
        .map(|i| i.courses.clone())
        .unwrap_or_default();

    let enrollments = match params.course_id {
        Some(course_id) => uow
            .enrollments_for_course(course_id)
            .await?
            .into_iter()
            .map(CourseEnrollmentViewModel::from)
            .collect(),
        None => Vec::new(),
    };

    Ok(ActionResult::view(
        "Index",
        InstructorIndexViewModel {
            instructors,
            selected_instructor_id: params.id,
            courses,
            selected_course_id: params.course_id,
            enrollments,
        },
    ))
}

pub async fn details(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
) -> HandlerResult<InstructorViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };

    Ok(match uow.instructor_with_assignments(id).await? {
        Some(detail) => ActionResult::view("Details", detail.into()),
        None => ActionResult::NotFound,
    })
}

pub async fn create_form(uow: &dyn UnitOfWork) -> HandlerResult<InstructorViewModel> {
    form_view(
        uow,
        "Create",
        InstructorViewModel::default(),
        &[],
        ModelState::default(),
    )
    .await
}

pub async fn create(
    uow: &mut dyn UnitOfWork,
    form: InstructorForm,
) -> HandlerResult<InstructorViewModel> {
    let course_ids = parse_course_ids(&form.selected_courses);
    let model = form.instructor;

    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Create", model, &course_ids, state).await;
    }

    uow.add(
        NewInstructor {
            instructor: model.clone().into_model(),
            office_location: model.office_location(),
            course_ids: course_ids.clone(),
        }
        .into(),
    );

    match uow.save().await {
        Ok(()) => {
            info!(
                "created instructor {}, {} with {} courses",
                model.last_name,
                model.first_mid_name,
                course_ids.len()
            );
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to create instructor: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Create", model, &course_ids, state).await
        }
    }
}

pub async fn edit_form(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
) -> HandlerResult<InstructorViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(detail) = uow.instructor_with_assignments(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let assigned = detail.assigned_course_ids();
    form_view(uow, "Edit", detail.into(), &assigned, ModelState::default()).await
}

/// Updates the instructor, its office and its course assignments in one commit
pub async fn edit(
    uow: &mut dyn UnitOfWork,
    id: i32,
    form: InstructorForm,
) -> HandlerResult<InstructorViewModel> {
    let course_ids = parse_course_ids(&form.selected_courses);
    let model = form.instructor;

    if model.id != id {
        return Ok(ActionResult::NotFound);
    }

    let mut state = model.model_state();
    if !state.is_valid() {
        return form_view(uow, "Edit", model, &course_ids, state).await;
    }

    let Some(detail) = uow.instructor_with_assignments(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let mut instructor = detail.instructor.clone();
    model.merge_into(&mut instructor);
    uow.update(instructor.into());

    match (detail.office_assignment.clone(), model.office_assignment(id)) {
        (Some(existing), None) => uow.delete(existing.into()),
        (Some(existing), Some(office)) if existing != office => uow.update(office.into()),
        (None, Some(office)) => uow.add(office.into()),
        _ => {}
    }

    let diff = AssignmentDiff::between(&detail.assigned_course_ids(), &course_ids);
    debug!(
        "instructor {id}: removing courses {:?}, adding courses {:?}",
        diff.removed, diff.added
    );
    for course_id in &diff.removed {
        uow.delete(
            course_assignment::Model {
                instructor_id: id,
                course_id: *course_id,
            }
            .into(),
        );
    }
    for course_id in &diff.added {
        uow.add(
            course_assignment::Model {
                instructor_id: id,
                course_id: *course_id,
            }
            .into(),
        );
    }

    match uow.save().await {
        Ok(()) => {
            info!("updated instructor {id}");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to update instructor {id}: {e}");
            state.add_model_error(SAVE_FAILED_MESSAGE);
            form_view(uow, "Edit", model, &course_ids, state).await
        }
    }
}

pub async fn delete_form(
    uow: &dyn UnitOfWork,
    id: Option<i32>,
    save_changes_error: bool,
) -> HandlerResult<InstructorViewModel> {
    let Some(id) = id else {
        return Ok(ActionResult::NotFound);
    };
    let Some(detail) = uow.instructor_with_assignments(id).await? else {
        return Ok(ActionResult::NotFound);
    };

    let mut view = View::new("Delete", InstructorViewModel::from(detail));
    if save_changes_error {
        view = view.with_error_message(DELETE_FAILED_MESSAGE);
    }
    Ok(view.into())
}

/// Deletes an instructor after unsetting it as administrator of every
/// department it runs, all in one commit
pub async fn delete_confirmed(
    uow: &mut dyn UnitOfWork,
    caller: &Caller,
    id: i32,
) -> HandlerResult<()> {
    let Some(detail) = uow.instructor_with_assignments(id).await? else {
        return Ok(ActionResult::redirect_to_index(CONTROLLER));
    };

    if !require_staff(caller).is_allowed() {
        warn!("delete of instructor {id} denied for {:?}", caller.user_id());
        return Ok(ActionResult::Forbidden);
    }

    let departments = uow.departments_administered_by(id).await?;
    let department_count = departments.len();
    for mut department in departments {
        department.instructor_id = None;
        uow.update(department.into());
    }

    uow.delete(detail.instructor.into());

    match uow.save().await {
        Ok(()) => {
            info!("deleted instructor {id}, cleared {department_count} department administrators");
            Ok(ActionResult::redirect_to_index(CONTROLLER))
        }
        Err(e) => {
            warn!("failed to delete instructor {id}: {e}");
            Ok(Redirect::new(CONTROLLER, "Delete")
                .with_id(id)
                .with_flag(SAVE_CHANGES_ERROR)
                .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{
        FakeUnitOfWork, SaveFailure, course, date, department, instructor, student,
    };
    use database::Record;
    use database::entities::{enrollment, office_assignment};
    use models::{course_status::CourseStatus, grade::Grade, role::Role};

    fn faculty() -> FakeUnitOfWork {
        let mut uow = FakeUnitOfWork::new();
        uow.departments = vec![
            department(1, "English", Some(1), &[1]),
            department(2, "Mathematics", Some(1), &[2]),
            department(3, "Economics", Some(2), &[3]),
        ];
        uow.courses = vec![
            course(1, "Chemistry", CourseStatus::Approved, "user123"),
            course(2, "Microeconomics", CourseStatus::Approved, "user123"),
            course(3, "Calculus", CourseStatus::Approved, "user123"),
        ];
        uow.instructors = vec![
            instructor(1, "Abercrombie", "Kim"),
            instructor(2, "Fakhouri", "Fadi"),
        ];
        uow.office_assignments = vec![office_of(1, "Smith 17")];
        uow.course_assignments = vec![course_assignment::Model {
            instructor_id: 1,
            course_id: 3,
        }];
        uow.students = vec![student(1, "Alexander", "Carson", date(2010, 9, 1))];
        uow.enrollments = vec![enrollment::Model {
            id: 1,
            course_id: 3,
            student_id: 1,
            grade: Some(Grade::A),
        }];
        uow
    }

    fn form(id: i32, office: Option<&str>, courses: &[&str]) -> InstructorForm {
        InstructorForm {
            instructor: InstructorViewModel {
                id,
                last_name: "Abercrombie".to_owned(),
                first_mid_name: "Kim".to_owned(),
                hire_date: Some(date(1995, 3, 11)),
                office_location: office.map(str::to_owned),
                courses: vec![],
            },
            selected_courses: courses.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn staff() -> Caller {
        Caller::new("manager", vec![Role::Manager])
    }

    fn office_of(instructor_id: i32, location: &str) -> office_assignment::Model {
        office_assignment::Model {
            instructor_id,
            location: location.to_owned(),
        }
    }

    #[test]
    fn test_assignment_diff() {
        let diff = AssignmentDiff::between(&[3], &[1, 2]);
        assert_eq!(diff.removed, vec![3]);
        assert_eq!(diff.added, vec![1, 2]);

        let diff = AssignmentDiff::between(&[1, 2, 4], &[2, 3, 4]);
        assert_eq!(diff.removed, vec![1]);
        assert_eq!(diff.added, vec![3]);

        assert!(AssignmentDiff::between(&[1, 2], &[1, 2]).is_empty());
    }

    #[tokio::test]
    async fn test_index_drill_down() {
        let uow = faculty();

        let params = InstructorIndexParams {
            id: Some(1),
            course_id: Some(3),
        };
        let result = index(&uow, params).await.unwrap();
        let model = &result.as_view().unwrap().model;

        assert_eq!(model.instructors.len(), 2);
        assert_eq!(model.instructors[0].office_location.as_deref(), Some("Smith 17"));
        assert_eq!(model.courses.len(), 1);
        assert_eq!(model.courses[0].title, "Calculus");
        assert_eq!(model.enrollments.len(), 1);
        assert_eq!(model.enrollments[0].student_name.as_deref(), Some("Alexander, Carson"));

        let result = index(&uow, InstructorIndexParams::default()).await.unwrap();
        let model = &result.as_view().unwrap().model;
        assert!(model.courses.is_empty());
        assert!(model.enrollments.is_empty());
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let uow = faculty();

        assert!(matches!(details(&uow, None).await.unwrap(), ActionResult::NotFound));
        assert!(matches!(details(&uow, Some(9)).await.unwrap(), ActionResult::NotFound));
    }

    #[tokio::test]
    async fn test_create_converts_selected_courses() {
        let mut uow = faculty();

        let result = create(&mut uow, form(0, Some("Thompson 304"), &["1", "x", "2"]))
            .await
            .unwrap();
        assert_eq!(result.as_redirect().unwrap().action, "Index");
        match uow.adds().as_slice() {
            [Record::NewInstructor(new)] => {
                assert_eq!(new.course_ids, vec![1, 2]);
                assert_eq!(new.office_location.as_deref(), Some("Thompson 304"));
                assert_eq!(new.instructor.last_name, "Abercrombie");
            }
            other => panic!("unexpected changes: {other:?}"),
        }
        assert_eq!(uow.saves, 1);
    }

    #[tokio::test]
    async fn test_create_invalid_keeps_selection() {
        let mut uow = faculty();
        let mut invalid = form(0, None, &["2"]);
        invalid.instructor.last_name.clear();

        let result = create(&mut uow, invalid).await.unwrap();
        let view = result.as_view().unwrap();
        assert!(!view.model_state.is_valid());

        let options = view.select_list(COURSE_LIST).unwrap();
        assert_eq!(options.len(), 3);
        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(selected, ["2"]);
        assert!(uow.changes.is_empty());
    }

    #[tokio::test]
    async fn test_edit_form_marks_assigned_courses() {
        let uow = faculty();

        let result = edit_form(&uow, Some(1)).await.unwrap();
        let options = result.as_view().unwrap().select_list(COURSE_LIST).unwrap();
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
        assert!(options.iter().any(|o| o.selected && o.value == "3"));
    }

    #[tokio::test]
    async fn test_edit_reconciles_course_assignments() {
        let mut uow = faculty();

        let result = edit(&mut uow, 1, form(1, Some("Smith 17"), &["1", "2"]))
            .await
            .unwrap();
        assert_eq!(result.as_redirect().unwrap().action, "Index");

        let removed: Vec<i32> = uow
            .deletes()
            .iter()
            .filter_map(|r| match r {
                Record::CourseAssignment(a) => Some(a.course_id),
                _ => None,
            })
            .collect();
        let added: Vec<i32> = uow
            .adds()
            .iter()
            .filter_map(|r| match r {
                Record::CourseAssignment(a) => Some(a.course_id),
                _ => None,
            })
            .collect();

        assert_eq!(removed, vec![3]);
        assert_eq!(added, vec![1, 2]);
        assert_eq!(uow.deletes().len(), 1);
        assert_eq!(uow.adds().len(), 2);
        assert_eq!(
            uow.updates()
                .iter()
                .filter(|r| matches!(r, Record::Instructor(_)))
                .count(),
            1
        );
        assert_eq!(uow.saves, 1);
    }

    #[tokio::test]
    async fn test_edit_blank_office_removes_assignment() {
        let mut uow = faculty();

        edit(&mut uow, 1, form(1, Some("  "), &["3"])).await.unwrap();

        assert_eq!(
            uow.deletes().as_slice(),
            [&Record::OfficeAssignment(office_of(1, "Smith 17"))]
        );
        assert!(uow.adds().is_empty());
    }

    #[tokio::test]
    async fn test_edit_office_is_created_or_moved() {
        let mut uow = faculty();
        edit(&mut uow, 2, form(2, Some("Gowan 27"), &[])).await.unwrap();
        assert_eq!(
            uow.adds().as_slice(),
            [&Record::OfficeAssignment(office_of(2, "Gowan 27"))]
        );

        let mut uow = faculty();
        edit(&mut uow, 1, form(1, Some("Thompson 304"), &["3"]))
            .await
            .unwrap();
        assert!(uow
            .updates()
            .contains(&&Record::OfficeAssignment(office_of(1, "Thompson 304"))));
    }

    #[tokio::test]
    async fn test_edit_id_mismatch_is_not_found() {
        let mut uow = faculty();

        let result = edit(&mut uow, 2, form(1, None, &[])).await.unwrap();
        assert!(matches!(result, ActionResult::NotFound));
        assert!(uow.changes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unsets_department_administrators() {
        let mut uow = faculty();

        let result = delete_confirmed(&mut uow, &staff(), 1).await.unwrap();
        assert_eq!(result.as_redirect().unwrap().action, "Index");

        let updates = uow.updates();
        assert_eq!(updates.len(), 2);
        for record in updates {
            match record {
                Record::Department(d) => assert_eq!(d.instructor_id, None),
                other => panic!("unexpected update: {other:?}"),
            }
        }
        assert!(matches!(
            uow.deletes().as_slice(),
            [Record::Instructor(i)] if i.id == 1
        ));
        assert!(matches!(uow.changes.last(), Some(database::Change::Delete(_))));
        assert_eq!(uow.saves, 1);
    }

    #[tokio::test]
    async fn test_delete_requires_staff() {
        let mut uow = faculty();

        let result = delete_confirmed(&mut uow, &Caller::new("user123", vec![]), 1)
            .await
            .unwrap();
        assert!(matches!(result, ActionResult::Forbidden));
        assert!(uow.changes.is_empty());
    }

    #[tokio::test]
    async fn test_delete_save_failure_redirects_with_flag() {
        let mut uow = faculty().failing(SaveFailure::Database);

        let result = delete_confirmed(&mut uow, &staff(), 2).await.unwrap();
        let redirect = result.as_redirect().unwrap();
        assert_eq!(redirect.action, "Delete");
        assert!(redirect.has_flag(SAVE_CHANGES_ERROR));
    }
}
