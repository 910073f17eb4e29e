use models::course_status::CourseStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    /// Course number, chosen by the user rather than generated
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub title: String,
    pub credits: i32,
    pub department_id: i32,
    pub status: CourseStatus,
    /// Subject of the user who authored the course
    pub owner_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::department::Entity",
        from = "Column::DepartmentId",
        to = "super::department::Column::Id"
    )]
    Department,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::course_assignment::Entity")]
    CourseAssignments,
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::course_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseAssignments.def()
    }
}

// Many-to-many relationship with instructors
impl Related<super::instructor::Entity> for Entity {
    fn to() -> RelationDef {
        super::course_assignment::Relation::Instructor.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::course_assignment::Relation::Course.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
