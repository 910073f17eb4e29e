use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::LastName).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Students::FirstMidName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Students::EnrollmentDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Create instructors table
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Instructors::LastName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Instructors::FirstMidName)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Instructors::HireDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        // Create departments table, the administrator is optional
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Departments::Budget).double().not_null())
                    .col(ColumnDef::new(Departments::StartDate).date().not_null())
                    .col(ColumnDef::new(Departments::InstructorId).integer())
                    .col(ColumnDef::new(Departments::RowVersion).blob().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-departments-instructor_id")
                            .from(Departments::Table, Departments::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table, ids are course numbers and not generated
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Courses::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .col(ColumnDef::new(Courses::DepartmentId).integer().not_null())
                    .col(
                        ColumnDef::new(Courses::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Courses::OwnerId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-department_id")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Enrollments::CourseId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::StudentId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::Grade).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-course_id")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollments-student_id")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create office_assignments table (one-to-one with instructors)
        manager
            .create_table(
                Table::create()
                    .table(OfficeAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficeAssignments::InstructorId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OfficeAssignments::Location)
                            .string_len(50)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-office_assignments-instructor_id")
                            .from(OfficeAssignments::Table, OfficeAssignments::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_assignments junction table (many-to-many)
        manager
            .create_table(
                Table::create()
                    .table(CourseAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseAssignments::InstructorId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseAssignments::CourseId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CourseAssignments::InstructorId)
                            .col(CourseAssignments::CourseId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_assignments-instructor_id")
                            .from(CourseAssignments::Table, CourseAssignments::InstructorId)
                            .to(Instructors::Table, Instructors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-course_assignments-course_id")
                            .from(CourseAssignments::Table, CourseAssignments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(CourseAssignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OfficeAssignments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    LastName,
    FirstMidName,
    EnrollmentDate,
}

#[derive(Iden)]
enum Instructors {
    Table,
    Id,
    LastName,
    FirstMidName,
    HireDate,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    Name,
    Budget,
    StartDate,
    InstructorId,
    RowVersion,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    Title,
    Credits,
    DepartmentId,
    Status,
    OwnerId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    Id,
    CourseId,
    StudentId,
    Grade,
}

#[derive(Iden)]
enum OfficeAssignments {
    Table,
    InstructorId,
    Location,
}

#[derive(Iden)]
enum CourseAssignments {
    Table,
    InstructorId,
    CourseId,
}
