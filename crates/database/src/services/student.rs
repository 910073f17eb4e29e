use crate::entities::{course, enrollment, student};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    prelude::Date,
    sea_query::{Expr, Func, LikeExpr},
};
use models::paging::clamp_page;
use serde::Serialize;

/// Ordering of the student list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentSort {
    #[default]
    LastName,
    LastNameDesc,
    EnrollmentDate,
    EnrollmentDateDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentQuery {
    /// Matches students whose last or first name contains the text
    pub search: Option<String>,
    pub sort: StudentSort,
    /// 1-based page number
    pub page: u64,
    pub per_page: u64,
}

/// A student together with its enrollments and the enrolled course
pub type EnrollmentWithCourse = (enrollment::Model, Option<course::Model>);
pub type StudentDetail = (student::Model, Vec<EnrollmentWithCourse>);

/// Number of students that enrolled on a given date
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct EnrollmentDateGroup {
    pub enrollment_date: Date,
    pub student_count: i64,
}

const LIKE_ESCAPE: char = '\\';

/// `%search%` in lower case, with the wildcards the user typed taken literally
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match on either name column
fn name_matches(search: &str) -> Condition {
    let pattern = like_pattern(search);
    let column_like = |column: student::Column| {
        Expr::expr(Func::lower(Expr::col((student::Entity, column))))
            .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE))
    };

    Condition::any()
        .add(column_like(student::Column::LastName))
        .add(column_like(student::Column::FirstMidName))
}

pub struct StudentService;

impl StudentService {
    /// Query students with filtering, ordering and pagination
    pub async fn get_students_paginated(
        db: &DatabaseConnection,
        query: &StudentQuery,
    ) -> Result<(Vec<student::Model>, u64), DbErr> {
        let mut select = student::Entity::find();

        if let Some(search) = query.search.as_deref()
            && !search.is_empty()
        {
            select = select.filter(name_matches(search));
        }

        select = match query.sort {
            StudentSort::LastName => select.order_by_asc(student::Column::LastName),
            StudentSort::LastNameDesc => select.order_by_desc(student::Column::LastName),
            StudentSort::EnrollmentDate => select.order_by_asc(student::Column::EnrollmentDate),
            StudentSort::EnrollmentDateDesc => {
                select.order_by_desc(student::Column::EnrollmentDate)
            }
        };

        let total_items = select.clone().count(db).await?;
        let page = clamp_page(query.page, total_items, query.per_page);
        let paginator = select.paginate(db, query.per_page);
        let students = paginator.fetch_page(page - 1).await?; // SeaORM uses 0-based pages

        Ok((students, total_items))
    }

    pub async fn get_student(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find_by_id(id).one(db).await
    }

    /// Get a single student with its enrollments and their courses
    pub async fn get_student_with_enrollments(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<StudentDetail>, DbErr> {
        let student = match student::Entity::find_by_id(id).one(db).await? {
            Some(student) => student,
            None => return Ok(None),
        };

        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::StudentId.eq(id))
            .find_also_related(course::Entity)
            .order_by_asc(enrollment::Column::CourseId)
            .all(db)
            .await?;

        Ok(Some((student, enrollments)))
    }

    /// Count students per enrollment date
    pub async fn get_enrollment_date_groups(
        db: &DatabaseConnection,
    ) -> Result<Vec<EnrollmentDateGroup>, DbErr> {
        student::Entity::find()
            .select_only()
            .column(student::Column::EnrollmentDate)
            .column_as(Expr::col(student::Column::Id).count(), "student_count")
            .group_by(student::Column::EnrollmentDate)
            .order_by_asc(student::Column::EnrollmentDate)
            .into_model::<EnrollmentDateGroup>()
            .all(db)
            .await
    }
}
