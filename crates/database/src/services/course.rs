use crate::entities::{course, department, enrollment, student};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub type CourseWithDepartment = (course::Model, Option<department::Model>);
pub type EnrollmentWithStudent = (enrollment::Model, Option<student::Model>);

pub struct CourseService;

impl CourseService {
    /// Get all courses with their department, ordered by course number
    pub async fn get_courses_with_department(
        db: &DatabaseConnection,
    ) -> Result<Vec<CourseWithDepartment>, DbErr> {
        course::Entity::find()
            .find_also_related(department::Entity)
            .order_by_asc(course::Column::Id)
            .all(db)
            .await
    }

    pub async fn get_course(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<course::Model>, DbErr> {
        course::Entity::find_by_id(id).one(db).await
    }

    pub async fn get_course_with_department(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<CourseWithDepartment>, DbErr> {
        course::Entity::find_by_id(id)
            .find_also_related(department::Entity)
            .one(db)
            .await
    }

    /// Get the enrollments of a course with the enrolled students
    pub async fn get_enrollments_for_course(
        db: &DatabaseConnection,
        course_id: i32,
    ) -> Result<Vec<EnrollmentWithStudent>, DbErr> {
        enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .find_also_related(student::Entity)
            .order_by_asc(enrollment::Column::Id)
            .all(db)
            .await
    }
}
