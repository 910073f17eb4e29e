use crate::entities::{
    course, course_assignment, department, enrollment, instructor, office_assignment, student,
};
use crate::services::{
    course::{CourseService, CourseWithDepartment, EnrollmentWithStudent},
    department::{DepartmentService, DepartmentWithAdministrator},
    instructor::{InstructorDetail, InstructorService},
    student::{EnrollmentDateGroup, StudentDetail, StudentQuery, StudentService},
};
use async_trait::async_trait;
use log::{debug, warn};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, QueryFilter, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// A row staged for writing
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Student(student::Model),
    Course(course::Model),
    Department(department::Model),
    Instructor(instructor::Model),
    /// Only valid for [`Change::Add`]
    NewInstructor(NewInstructor),
    OfficeAssignment(office_assignment::Model),
    CourseAssignment(course_assignment::Model),
}

/// An instructor inserted together with the rows it owns.
///
/// The generated instructor id is propagated to the office and the course
/// assignments when the unit of work is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstructor {
    pub instructor: instructor::Model,
    pub office_location: Option<String>,
    pub course_ids: Vec<i32>,
}

impl Record {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Student(_) => "student",
            Self::Course(_) => "course",
            Self::Department(_) => "department",
            Self::Instructor(_) | Self::NewInstructor(_) => "instructor",
            Self::OfficeAssignment(_) => "office assignment",
            Self::CourseAssignment(_) => "course assignment",
        }
    }
}

impl From<student::Model> for Record {
    fn from(model: student::Model) -> Self {
        Self::Student(model)
    }
}

impl From<course::Model> for Record {
    fn from(model: course::Model) -> Self {
        Self::Course(model)
    }
}

impl From<department::Model> for Record {
    fn from(model: department::Model) -> Self {
        Self::Department(model)
    }
}

impl From<instructor::Model> for Record {
    fn from(model: instructor::Model) -> Self {
        Self::Instructor(model)
    }
}

impl From<NewInstructor> for Record {
    fn from(new_instructor: NewInstructor) -> Self {
        Self::NewInstructor(new_instructor)
    }
}

impl From<office_assignment::Model> for Record {
    fn from(model: office_assignment::Model) -> Self {
        Self::OfficeAssignment(model)
    }
}

impl From<course_assignment::Model> for Record {
    fn from(model: course_assignment::Model) -> Self {
        Self::CourseAssignment(model)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Add(Record),
    Update(Record),
    Delete(Record),
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// A guarded row was changed or removed after it was read
    #[error("the record was modified or deleted by another user")]
    Conflict,

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Reads of the application's aggregates plus a set of staged changes that
/// are written together by [`UnitOfWork::save`].
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn students(&self, query: &StudentQuery) -> Result<(Vec<student::Model>, u64), DbErr>;
    async fn student(&self, id: i32) -> Result<Option<student::Model>, DbErr>;
    async fn student_with_enrollments(&self, id: i32) -> Result<Option<StudentDetail>, DbErr>;
    async fn enrollment_date_groups(&self) -> Result<Vec<EnrollmentDateGroup>, DbErr>;

    async fn courses(&self) -> Result<Vec<CourseWithDepartment>, DbErr>;
    async fn course(&self, id: i32) -> Result<Option<course::Model>, DbErr>;
    async fn course_with_department(&self, id: i32)
    -> Result<Option<CourseWithDepartment>, DbErr>;
    async fn enrollments_for_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<EnrollmentWithStudent>, DbErr>;

    async fn instructors(&self) -> Result<Vec<instructor::Model>, DbErr>;
    async fn instructors_with_assignments(&self) -> Result<Vec<InstructorDetail>, DbErr>;
    async fn instructor_with_assignments(
        &self,
        id: i32,
    ) -> Result<Option<InstructorDetail>, DbErr>;

    async fn departments(&self) -> Result<Vec<department::Model>, DbErr>;
    async fn departments_with_administrator(
        &self,
    ) -> Result<Vec<DepartmentWithAdministrator>, DbErr>;
    async fn department_with_administrator(
        &self,
        id: i32,
    ) -> Result<Option<DepartmentWithAdministrator>, DbErr>;
    async fn departments_administered_by(
        &self,
        instructor_id: i32,
    ) -> Result<Vec<department::Model>, DbErr>;

    fn add(&mut self, record: Record);
    fn update(&mut self, record: Record);
    fn delete(&mut self, record: Record);

    /// Sets the row version a later department update or delete must still
    /// find in the store; otherwise [`UnitOfWork::save`] fails with
    /// [`SaveError::Conflict`].
    fn track_row_version(&mut self, department_id: i32, row_version: Vec<u8>);

    /// Writes every staged change in one transaction
    async fn save(&mut self) -> Result<(), SaveError>;
}

/// Generates a fresh department concurrency token
pub fn new_row_version() -> Vec<u8> {
    Uuid::new_v4().as_bytes().to_vec()
}

pub struct SeaOrmUnitOfWork {
    db: Arc<DatabaseConnection>,
    changes: Vec<Change>,
    row_versions: HashMap<i32, Vec<u8>>,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            changes: Vec::new(),
            row_versions: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> &[Change] {
        &self.changes
    }

    async fn apply(
        txn: &DatabaseTransaction,
        change: Change,
        row_versions: &HashMap<i32, Vec<u8>>,
    ) -> Result<(), SaveError> {
        match change {
            Change::Add(record) => Self::insert(txn, record).await,
            Change::Update(record) => Self::update_row(txn, record, row_versions).await,
            Change::Delete(record) => Self::delete_row(txn, record, row_versions).await,
        }
    }

    async fn insert(txn: &DatabaseTransaction, record: Record) -> Result<(), SaveError> {
        match record {
            Record::Student(model) => {
                let mut active = model.into_active_model().reset_all();
                active.id = NotSet;
                active.insert(txn).await?;
            }
            Record::Course(model) => {
                model.into_active_model().reset_all().insert(txn).await?;
            }
            Record::Department(model) => {
                let mut active = model.into_active_model().reset_all();
                active.id = NotSet;
                active.row_version = Set(new_row_version());
                active.insert(txn).await?;
            }
            Record::Instructor(instructor) => {
                Self::insert_instructor(
                    txn,
                    NewInstructor {
                        instructor,
                        office_location: None,
                        course_ids: vec![],
                    },
                )
                .await?;
            }
            Record::NewInstructor(new_instructor) => {
                Self::insert_instructor(txn, new_instructor).await?;
            }
            Record::OfficeAssignment(model) => {
                model.into_active_model().reset_all().insert(txn).await?;
            }
            Record::CourseAssignment(model) => {
                course_assignment::Entity::insert(model.into_active_model().reset_all())
                    .exec(txn)
                    .await?;
            }
        }

        Ok(())
    }

    async fn insert_instructor(
        txn: &DatabaseTransaction,
        new_instructor: NewInstructor,
    ) -> Result<(), SaveError> {
        let mut active = new_instructor.instructor.into_active_model().reset_all();
        active.id = NotSet;
        let instructor = active.insert(txn).await?;

        if let Some(location) = new_instructor.office_location {
            office_assignment::ActiveModel {
                instructor_id: Set(instructor.id),
                location: Set(location),
            }
            .insert(txn)
            .await?;
        }

        if !new_instructor.course_ids.is_empty() {
            let assignments =
                new_instructor
                    .course_ids
                    .into_iter()
                    .map(|course_id| course_assignment::ActiveModel {
                        instructor_id: Set(instructor.id),
                        course_id: Set(course_id),
                    });
            course_assignment::Entity::insert_many(assignments)
                .exec(txn)
                .await?;
        }

        Ok(())
    }

    async fn update_row(
        txn: &DatabaseTransaction,
        record: Record,
        row_versions: &HashMap<i32, Vec<u8>>,
    ) -> Result<(), SaveError> {
        match record {
            Record::Student(model) => {
                model.into_active_model().reset_all().update(txn).await?;
            }
            Record::Course(model) => {
                model.into_active_model().reset_all().update(txn).await?;
            }
            Record::Department(model) => {
                let id = model.id;
                let expected = row_versions
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(|| model.row_version.clone());

                let mut active = model.into_active_model().reset_all();
                active.id = NotSet;
                active.row_version = Set(new_row_version());

                let result = department::Entity::update_many()
                    .set(active)
                    .filter(department::Column::Id.eq(id))
                    .filter(department::Column::RowVersion.eq(expected))
                    .exec(txn)
                    .await?;

                if result.rows_affected == 0 {
                    warn!("department {id} changed since it was read, update rejected");
                    return Err(SaveError::Conflict);
                }
            }
            Record::Instructor(model) => {
                model.into_active_model().reset_all().update(txn).await?;
            }
            Record::OfficeAssignment(model) => {
                model.into_active_model().reset_all().update(txn).await?;
            }
            Record::CourseAssignment(_) | Record::NewInstructor(_) => {
                return Err(SaveError::Database(DbErr::Custom(format!(
                    "{} rows cannot be updated",
                    record.kind()
                ))));
            }
        }

        Ok(())
    }

    async fn delete_row(
        txn: &DatabaseTransaction,
        record: Record,
        row_versions: &HashMap<i32, Vec<u8>>,
    ) -> Result<(), SaveError> {
        match record {
            Record::Student(model) => {
                enrollment::Entity::delete_many()
                    .filter(enrollment::Column::StudentId.eq(model.id))
                    .exec(txn)
                    .await?;
                student::Entity::delete_by_id(model.id).exec(txn).await?;
            }
            Record::Course(model) => {
                enrollment::Entity::delete_many()
                    .filter(enrollment::Column::CourseId.eq(model.id))
                    .exec(txn)
                    .await?;
                course_assignment::Entity::delete_many()
                    .filter(course_assignment::Column::CourseId.eq(model.id))
                    .exec(txn)
                    .await?;
                course::Entity::delete_by_id(model.id).exec(txn).await?;
            }
            Record::Department(model) => {
                let expected = row_versions
                    .get(&model.id)
                    .cloned()
                    .unwrap_or(model.row_version);

                let result = department::Entity::delete_many()
                    .filter(department::Column::Id.eq(model.id))
                    .filter(department::Column::RowVersion.eq(expected))
                    .exec(txn)
                    .await?;

                if result.rows_affected == 0 {
                    warn!(
                        "department {} changed since it was read, delete rejected",
                        model.id
                    );
                    return Err(SaveError::Conflict);
                }
            }
            Record::Instructor(model) => {
                office_assignment::Entity::delete_many()
                    .filter(office_assignment::Column::InstructorId.eq(model.id))
                    .exec(txn)
                    .await?;
                course_assignment::Entity::delete_many()
                    .filter(course_assignment::Column::InstructorId.eq(model.id))
                    .exec(txn)
                    .await?;
                instructor::Entity::delete_by_id(model.id).exec(txn).await?;
            }
            Record::OfficeAssignment(model) => {
                office_assignment::Entity::delete_by_id(model.instructor_id)
                    .exec(txn)
                    .await?;
            }
            Record::CourseAssignment(model) => {
                course_assignment::Entity::delete_by_id((model.instructor_id, model.course_id))
                    .exec(txn)
                    .await?;
            }
            Record::NewInstructor(_) => {
                return Err(SaveError::Database(DbErr::Custom(
                    "an unsaved instructor cannot be deleted".to_owned(),
                )));
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SeaOrmUnitOfWork {
    async fn students(&self, query: &StudentQuery) -> Result<(Vec<student::Model>, u64), DbErr> {
        StudentService::get_students_paginated(&self.db, query).await
    }

    async fn student(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        StudentService::get_student(&self.db, id).await
    }

    async fn student_with_enrollments(&self, id: i32) -> Result<Option<StudentDetail>, DbErr> {
        StudentService::get_student_with_enrollments(&self.db, id).await
    }

    async fn enrollment_date_groups(&self) -> Result<Vec<EnrollmentDateGroup>, DbErr> {
        StudentService::get_enrollment_date_groups(&self.db).await
    }

    async fn courses(&self) -> Result<Vec<CourseWithDepartment>, DbErr> {
        CourseService::get_courses_with_department(&self.db).await
    }

    async fn course(&self, id: i32) -> Result<Option<course::Model>, DbErr> {
        CourseService::get_course(&self.db, id).await
    }

    async fn course_with_department(
        &self,
        id: i32,
    ) -> Result<Option<CourseWithDepartment>, DbErr> {
        CourseService::get_course_with_department(&self.db, id).await
    }

    async fn enrollments_for_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<EnrollmentWithStudent>, DbErr> {
        CourseService::get_enrollments_for_course(&self.db, course_id).await
    }

    async fn instructors(&self) -> Result<Vec<instructor::Model>, DbErr> {
        InstructorService::get_instructors(&self.db).await
    }

    async fn instructors_with_assignments(&self) -> Result<Vec<InstructorDetail>, DbErr> {
        InstructorService::get_instructors_with_assignments(&self.db).await
    }

    async fn instructor_with_assignments(
        &self,
        id: i32,
    ) -> Result<Option<InstructorDetail>, DbErr> {
        InstructorService::get_instructor_with_assignments(&self.db, id).await
    }

    async fn departments(&self) -> Result<Vec<department::Model>, DbErr> {
        DepartmentService::get_departments(&self.db).await
    }

    async fn departments_with_administrator(
        &self,
    ) -> Result<Vec<DepartmentWithAdministrator>, DbErr> {
        DepartmentService::get_departments_with_administrator(&self.db).await
    }

    async fn department_with_administrator(
        &self,
        id: i32,
    ) -> Result<Option<DepartmentWithAdministrator>, DbErr> {
        DepartmentService::get_department_with_administrator(&self.db, id).await
    }

    async fn departments_administered_by(
        &self,
        instructor_id: i32,
    ) -> Result<Vec<department::Model>, DbErr> {
        DepartmentService::get_departments_administered_by(&self.db, instructor_id).await
    }

    fn add(&mut self, record: Record) {
        self.changes.push(Change::Add(record));
    }

    fn update(&mut self, record: Record) {
        self.changes.push(Change::Update(record));
    }

    fn delete(&mut self, record: Record) {
        self.changes.push(Change::Delete(record));
    }

    fn track_row_version(&mut self, department_id: i32, row_version: Vec<u8>) {
        self.row_versions.insert(department_id, row_version);
    }

    async fn save(&mut self) -> Result<(), SaveError> {
        let changes = std::mem::take(&mut self.changes);
        let row_versions = std::mem::take(&mut self.row_versions);

        if changes.is_empty() {
            return Ok(());
        }

        debug!("saving {} staged changes", changes.len());

        // Dropping the transaction on an early return rolls it back
        let txn = self.db.begin().await?;
        for change in changes {
            Self::apply(&txn, change, &row_versions).await?;
        }
        txn.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};

    fn affected(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    /// Runs the staged changes against a mock database and returns the
    /// outcome with the statements of the single transaction
    async fn save_with(
        mock: MockDatabase,
        stage: impl FnOnce(&mut SeaOrmUnitOfWork),
    ) -> (Result<(), SaveError>, Vec<String>) {
        let db = Arc::new(mock.into_connection());
        let mut uow = SeaOrmUnitOfWork::new(Arc::clone(&db));
        stage(&mut uow);
        let result = uow.save().await;
        drop(uow);

        let log: Vec<Transaction> = Arc::try_unwrap(db)
            .ok()
            .expect("connection still shared")
            .into_transaction_log();
        assert_eq!(log.len(), 1);
        let statements = log[0]
            .statements()
            .iter()
            .map(|stmt| format!("{} {:?}", stmt.sql, stmt.values))
            .collect();
        (result, statements)
    }

    fn department() -> department::Model {
        department::Model {
            id: 1,
            name: "English".to_owned(),
            budget: 350000.0,
            start_date: NaiveDate::from_ymd_opt(2007, 9, 1).unwrap(),
            instructor_id: Some(11),
            row_version: vec![0, 1, 2, 3],
        }
    }

    #[test]
    fn test_row_versions_are_unique() {
        let first = new_row_version();
        let second = new_row_version();
        assert_eq!(first.len(), 16);
        assert_ne!(first, second);
    }

    #[test]
    fn test_staging_keeps_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut uow = SeaOrmUnitOfWork::new(Arc::new(db));

        uow.update(department().into());
        uow.delete(
            course_assignment::Model {
                instructor_id: 1,
                course_id: 3,
            }
            .into(),
        );

        assert_eq!(uow.pending().len(), 2);
        assert!(matches!(
            uow.pending()[0],
            Change::Update(Record::Department(_))
        ));
        assert_eq!(
            match &uow.pending()[1] {
                Change::Delete(record) => record.kind(),
                _ => "",
            },
            "course assignment"
        );
    }

    #[tokio::test]
    async fn test_save_without_changes_is_a_no_op() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut uow = SeaOrmUnitOfWork::new(Arc::new(db));

        assert!(uow.save().await.is_ok());
    }

    #[tokio::test]
    async fn test_department_update_is_guarded_by_row_version() {
        let mock = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([affected(1)]);
        let (result, statements) = save_with(mock, |uow| {
            uow.track_row_version(1, vec![9]);
            uow.update(department().into());
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("BEGIN"));
        assert!(statements[1].starts_with(r#"UPDATE "departments""#));
        assert!(statements[1].contains(r#""departments"."row_version" = $"#));
        assert!(statements[1].contains("Bytes(Some([9]))"));
        assert!(statements[2].starts_with("COMMIT"));
    }

    #[tokio::test]
    async fn test_stale_department_update_is_a_conflict() {
        let mock = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([affected(0)]);
        let (result, statements) = save_with(mock, |uow| {
            uow.track_row_version(1, vec![1]);
            uow.update(department().into());
        })
        .await;

        assert!(matches!(result, Err(SaveError::Conflict)));
        assert!(statements.last().unwrap().starts_with("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_stale_department_delete_is_a_conflict() {
        let mock = MockDatabase::new(DatabaseBackend::Postgres).append_exec_results([affected(0)]);
        let (result, statements) = save_with(mock, |uow| uow.delete(department().into())).await;

        assert!(matches!(result, Err(SaveError::Conflict)));
        assert!(statements[1].starts_with(r#"DELETE FROM "departments""#));
        // the stored token is used when none was tracked
        assert!(statements[1].contains("Bytes(Some([0, 1, 2, 3]))"));
        assert!(statements.last().unwrap().starts_with("ROLLBACK"));
    }

    #[tokio::test]
    async fn test_failed_instructor_delete_rolls_back_department_updates() {
        let mock = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1), affected(1), affected(2)])
            .append_exec_errors([DbErr::Custom("connection reset".to_owned())]);
        let (result, statements) = save_with(mock, |uow| {
            let mut administered = department();
            administered.instructor_id = None;
            uow.update(administered.into());
            uow.delete(
                instructor::Model {
                    id: 11,
                    last_name: "Kapoor".to_owned(),
                    first_mid_name: "Candace".to_owned(),
                    hire_date: NaiveDate::from_ymd_opt(2001, 1, 15).unwrap(),
                }
                .into(),
            );
        })
        .await;

        assert!(matches!(result, Err(SaveError::Database(_))));
        assert!(statements[1].starts_with(r#"UPDATE "departments""#));
        assert!(statements[4].starts_with(r#"DELETE FROM "instructors""#));
        assert!(statements.last().unwrap().starts_with("ROLLBACK"));
        assert!(!statements.iter().any(|stmt| stmt.starts_with("COMMIT")));
    }
}
