use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Student list filters and sorts by name
        manager
            .create_index(
                Index::create()
                    .name("idx_students_last_name")
                    .table(Students::Table)
                    .col(Students::LastName)
                    .to_owned(),
            )
            .await?;

        // Course list filters on status and owner for non-staff users
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_status_owner_id")
                    .table(Courses::Table)
                    .col(Courses::Status)
                    .col(Courses::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_department_id")
                    .table(Courses::Table)
                    .col(Courses::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Instructor deletion looks up administered departments
        manager
            .create_index(
                Index::create()
                    .name("idx_departments_instructor_id")
                    .table(Departments::Table)
                    .col(Departments::InstructorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_assignments_course_id")
                    .table(CourseAssignments::Table)
                    .col(CourseAssignments::CourseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_course_assignments_course_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_enrollments_course_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_enrollments_student_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_departments_instructor_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_courses_department_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_courses_status_owner_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_students_last_name").to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Students {
    Table,
    LastName,
}

#[derive(Iden)]
enum Courses {
    Table,
    DepartmentId,
    Status,
    OwnerId,
}

#[derive(Iden)]
enum Departments {
    Table,
    InstructorId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    StudentId,
    CourseId,
}

#[derive(Iden)]
enum CourseAssignments {
    Table,
    CourseId,
}
