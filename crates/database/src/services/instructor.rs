use crate::entities::{course, course_assignment, department, instructor, office_assignment};
use crate::services::course::CourseWithDepartment;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

/// An instructor with the rows the instructor screens display
#[derive(Debug, Clone, PartialEq)]
pub struct InstructorDetail {
    pub instructor: instructor::Model,
    pub office_assignment: Option<office_assignment::Model>,
    /// Assigned courses ordered by course number
    pub courses: Vec<CourseWithDepartment>,
}

impl InstructorDetail {
    /// Course numbers of the current assignments, ascending
    pub fn assigned_course_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.courses.iter().map(|(course, _)| course.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

pub struct InstructorService;

impl InstructorService {
    /// Get all instructors ordered by last name
    pub async fn get_instructors(db: &DatabaseConnection) -> Result<Vec<instructor::Model>, DbErr> {
        instructor::Entity::find()
            .order_by_asc(instructor::Column::LastName)
            .all(db)
            .await
    }

    /// Get all instructors with their office and assigned courses
    pub async fn get_instructors_with_assignments(
        db: &DatabaseConnection,
    ) -> Result<Vec<InstructorDetail>, DbErr> {
        let instructors = Self::get_instructors(db).await?;
        Self::load_assignments(db, instructors).await
    }

    /// Get a single instructor with its office and assigned courses
    pub async fn get_instructor_with_assignments(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<InstructorDetail>, DbErr> {
        let instructor = match instructor::Entity::find_by_id(id).one(db).await? {
            Some(instructor) => instructor,
            None => return Ok(None),
        };

        Ok(Self::load_assignments(db, vec![instructor]).await?.pop())
    }

    async fn load_assignments(
        db: &DatabaseConnection,
        instructors: Vec<instructor::Model>,
    ) -> Result<Vec<InstructorDetail>, DbErr> {
        if instructors.is_empty() {
            return Ok(vec![]);
        }

        let instructor_ids: Vec<i32> = instructors.iter().map(|i| i.id).collect();

        // Offices and course assignments are independent, fetch them together
        let (offices, assignments) = futures::try_join!(
            office_assignment::Entity::find()
                .filter(office_assignment::Column::InstructorId.is_in(instructor_ids.clone()))
                .all(db),
            course_assignment::Entity::find()
                .filter(course_assignment::Column::InstructorId.is_in(instructor_ids))
                .find_also_related(course::Entity)
                .order_by_asc(course_assignment::Column::CourseId)
                .all(db),
        )?;

        let department_ids: Vec<i32> = assignments
            .iter()
            .filter_map(|(_, course)| course.as_ref().map(|c| c.department_id))
            .collect();

        let departments: HashMap<i32, department::Model> = if department_ids.is_empty() {
            HashMap::new()
        } else {
            department::Entity::find()
                .filter(department::Column::Id.is_in(department_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|d| (d.id, d))
                .collect()
        };

        // Build lookup maps
        let mut offices_by_instructor: HashMap<i32, office_assignment::Model> = offices
            .into_iter()
            .map(|office| (office.instructor_id, office))
            .collect();

        let mut courses_by_instructor: HashMap<i32, Vec<CourseWithDepartment>> = HashMap::new();
        for (assignment, course) in assignments {
            let Some(course) = course else { continue };
            let department = departments.get(&course.department_id).cloned();
            courses_by_instructor
                .entry(assignment.instructor_id)
                .or_default()
                .push((course, department));
        }

        let details = instructors
            .into_iter()
            .map(|instructor| InstructorDetail {
                office_assignment: offices_by_instructor.remove(&instructor.id),
                courses: courses_by_instructor
                    .remove(&instructor.id)
                    .unwrap_or_default(),
                instructor,
            })
            .collect();

        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::InstructorDetail;
    use crate::entities::{course, instructor};
    use chrono::NaiveDate;
    use models::course_status::CourseStatus;

    fn course(id: i32) -> course::Model {
        course::Model {
            id,
            title: format!("Course {id}"),
            credits: 3,
            department_id: 1,
            status: CourseStatus::Approved,
            owner_id: None,
        }
    }

    #[test]
    fn test_assigned_course_ids_are_sorted() {
        let detail = InstructorDetail {
            instructor: instructor::Model {
                id: 1,
                last_name: "Abercrombie".to_owned(),
                first_mid_name: "Kim".to_owned(),
                hire_date: NaiveDate::from_ymd_opt(1995, 3, 11).unwrap(),
            },
            office_assignment: None,
            courses: vec![(course(4041), None), (course(1045), None)],
        };

        assert_eq!(detail.assigned_course_ids(), vec![1045, 4041]);
    }
}
