use crate::entities::{department, instructor};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

pub type DepartmentWithAdministrator = (department::Model, Option<instructor::Model>);

pub struct DepartmentService;

impl DepartmentService {
    /// Get all departments ordered by name
    pub async fn get_departments(db: &DatabaseConnection) -> Result<Vec<department::Model>, DbErr> {
        department::Entity::find()
            .order_by_asc(department::Column::Name)
            .all(db)
            .await
    }

    pub async fn get_departments_with_administrator(
        db: &DatabaseConnection,
    ) -> Result<Vec<DepartmentWithAdministrator>, DbErr> {
        department::Entity::find()
            .find_also_related(instructor::Entity)
            .order_by_asc(department::Column::Name)
            .all(db)
            .await
    }

    pub async fn get_department_with_administrator(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<DepartmentWithAdministrator>, DbErr> {
        department::Entity::find_by_id(id)
            .find_also_related(instructor::Entity)
            .one(db)
            .await
    }

    /// Get the departments whose administrator is the given instructor
    pub async fn get_departments_administered_by(
        db: &DatabaseConnection,
        instructor_id: i32,
    ) -> Result<Vec<department::Model>, DbErr> {
        department::Entity::find()
            .filter(department::Column::InstructorId.eq(instructor_id))
            .all(db)
            .await
    }
}
