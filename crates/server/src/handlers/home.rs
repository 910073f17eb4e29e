use crate::action::ActionResult;
use crate::dtos::home::EnrollmentDateGroupViewModel;
use crate::handlers::HandlerResult;
use database::UnitOfWork;

/// Number of students per enrollment date
pub async fn about(uow: &dyn UnitOfWork) -> HandlerResult<Vec<EnrollmentDateGroupViewModel>> {
    let groups = uow
        .enrollment_date_groups()
        .await?
        .into_iter()
        .map(EnrollmentDateGroupViewModel::from)
        .collect();

    Ok(ActionResult::view("About", groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{FakeUnitOfWork, date, student};

    #[tokio::test]
    async fn test_about_groups_by_enrollment_date() {
        let mut uow = FakeUnitOfWork::new();
        uow.students = vec![
            student(1, "Alexander", "Carson", date(2010, 9, 1)),
            student(2, "Alonso", "Meredith", date(2012, 9, 1)),
            student(3, "Barzdukas", "Gytis", date(2012, 9, 1)),
        ];

        let result = about(&uow).await.unwrap();
        let groups = &result.as_view().unwrap().model;

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].enrollment_date, date(2010, 9, 1));
        assert_eq!(groups[1].student_count, 2);
    }
}
