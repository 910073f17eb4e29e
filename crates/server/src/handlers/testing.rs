//! In-memory unit of work for handler tests. Reads are served from plain
//! vectors; staged changes and commits are recorded instead of applied.

use async_trait::async_trait;
use chrono::NaiveDate;
use database::entities::{
    course, course_assignment, department, enrollment, instructor, office_assignment, student,
};
use database::services::{
    course::{CourseWithDepartment, EnrollmentWithStudent},
    department::DepartmentWithAdministrator,
    instructor::InstructorDetail,
    student::{EnrollmentDateGroup, StudentDetail, StudentQuery, StudentSort},
};
use database::{Change, Record, SaveError, UnitOfWork};
use models::course_status::CourseStatus;
use models::paging::clamp_page;
use sea_orm::DbErr;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFailure {
    Conflict,
    Database,
}

#[derive(Debug, Default)]
pub struct FakeUnitOfWork {
    pub students: Vec<student::Model>,
    pub enrollments: Vec<enrollment::Model>,
    pub courses: Vec<course::Model>,
    pub departments: Vec<department::Model>,
    pub instructors: Vec<instructor::Model>,
    pub office_assignments: Vec<office_assignment::Model>,
    pub course_assignments: Vec<course_assignment::Model>,

    pub changes: Vec<Change>,
    pub tracked_row_versions: Vec<(i32, Vec<u8>)>,
    pub saves: usize,
    pub save_failure: Option<SaveFailure>,
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn student(id: i32, last_name: &str, first_mid_name: &str, enrolled: NaiveDate) -> student::Model {
    student::Model {
        id,
        last_name: last_name.to_owned(),
        first_mid_name: first_mid_name.to_owned(),
        enrollment_date: enrolled,
    }
}

pub fn course(id: i32, title: &str, status: CourseStatus, owner: &str) -> course::Model {
    course::Model {
        id,
        title: title.to_owned(),
        credits: 3,
        department_id: 1,
        status,
        owner_id: Some(owner.to_owned()),
    }
}

pub fn department(id: i32, name: &str, instructor_id: Option<i32>, row_version: &[u8]) -> department::Model {
    department::Model {
        id,
        name: name.to_owned(),
        budget: 100000.0,
        start_date: date(2007, 9, 1),
        instructor_id,
        row_version: row_version.to_vec(),
    }
}

pub fn instructor(id: i32, last_name: &str, first_mid_name: &str) -> instructor::Model {
    instructor::Model {
        id,
        last_name: last_name.to_owned(),
        first_mid_name: first_mid_name.to_owned(),
        hire_date: date(2002, 7, 6),
    }
}

impl FakeUnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, failure: SaveFailure) -> Self {
        self.save_failure = Some(failure);
        self
    }

    pub fn adds(&self) -> Vec<&Record> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Add(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<&Record> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Update(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<&Record> {
        self.changes
            .iter()
            .filter_map(|change| match change {
                Change::Delete(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    fn department_of(&self, course: &course::Model) -> Option<department::Model> {
        self.departments
            .iter()
            .find(|d| d.id == course.department_id)
            .cloned()
    }

    fn detail_of(&self, instructor: &instructor::Model) -> InstructorDetail {
        let mut courses: Vec<CourseWithDepartment> = self
            .course_assignments
            .iter()
            .filter(|a| a.instructor_id == instructor.id)
            .filter_map(|a| self.courses.iter().find(|c| c.id == a.course_id))
            .map(|c| (c.clone(), self.department_of(c)))
            .collect();
        courses.sort_by_key(|(c, _)| c.id);

        InstructorDetail {
            instructor: instructor.clone(),
            office_assignment: self
                .office_assignments
                .iter()
                .find(|o| o.instructor_id == instructor.id)
                .cloned(),
            courses,
        }
    }

    fn administrator_of(&self, department: &department::Model) -> Option<instructor::Model> {
        department
            .instructor_id
            .and_then(|id| self.instructors.iter().find(|i| i.id == id).cloned())
    }
}

#[async_trait]
impl UnitOfWork for FakeUnitOfWork {
    async fn students(&self, query: &StudentQuery) -> Result<(Vec<student::Model>, u64), DbErr> {
        let mut students: Vec<student::Model> = self
            .students
            .iter()
            .filter(|s| match query.search.as_deref() {
                Some(search) if !search.is_empty() => {
                    let search = search.to_lowercase();
                    s.last_name.to_lowercase().contains(&search)
                        || s.first_mid_name.to_lowercase().contains(&search)
                }
                _ => true,
            })
            .cloned()
            .collect();

        match query.sort {
            StudentSort::LastName => students.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
            StudentSort::LastNameDesc => students.sort_by(|a, b| b.last_name.cmp(&a.last_name)),
            StudentSort::EnrollmentDate => students.sort_by_key(|s| s.enrollment_date),
            StudentSort::EnrollmentDateDesc => {
                students.sort_by(|a, b| b.enrollment_date.cmp(&a.enrollment_date))
            }
        }

        let total = students.len() as u64;
        let page = clamp_page(query.page, total, query.per_page);
        let skip = ((page - 1) * query.per_page) as usize;
        let page = students
            .into_iter()
            .skip(skip)
            .take(query.per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn student(&self, id: i32) -> Result<Option<student::Model>, DbErr> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }

    async fn student_with_enrollments(&self, id: i32) -> Result<Option<StudentDetail>, DbErr> {
        Ok(self.students.iter().find(|s| s.id == id).map(|s| {
            let enrollments = self
                .enrollments
                .iter()
                .filter(|e| e.student_id == id)
                .map(|e| {
                    let course = self.courses.iter().find(|c| c.id == e.course_id).cloned();
                    (e.clone(), course)
                })
                .collect();
            (s.clone(), enrollments)
        }))
    }

    async fn enrollment_date_groups(&self) -> Result<Vec<EnrollmentDateGroup>, DbErr> {
        let mut groups: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for student in &self.students {
            *groups.entry(student.enrollment_date).or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(enrollment_date, student_count)| EnrollmentDateGroup {
                enrollment_date,
                student_count,
            })
            .collect())
    }

    async fn courses(&self) -> Result<Vec<CourseWithDepartment>, DbErr> {
        let mut courses: Vec<CourseWithDepartment> = self
            .courses
            .iter()
            .map(|c| (c.clone(), self.department_of(c)))
            .collect();
        courses.sort_by_key(|(c, _)| c.id);
        Ok(courses)
    }

    async fn course(&self, id: i32) -> Result<Option<course::Model>, DbErr> {
        Ok(self.courses.iter().find(|c| c.id == id).cloned())
    }

    async fn course_with_department(
        &self,
        id: i32,
    ) -> Result<Option<CourseWithDepartment>, DbErr> {
        Ok(self
            .courses
            .iter()
            .find(|c| c.id == id)
            .map(|c| (c.clone(), self.department_of(c))))
    }

    async fn enrollments_for_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<EnrollmentWithStudent>, DbErr> {
        Ok(self
            .enrollments
            .iter()
            .filter(|e| e.course_id == course_id)
            .map(|e| {
                let student = self.students.iter().find(|s| s.id == e.student_id).cloned();
                (e.clone(), student)
            })
            .collect())
    }

    async fn instructors(&self) -> Result<Vec<instructor::Model>, DbErr> {
        let mut instructors = self.instructors.clone();
        instructors.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(instructors)
    }

    async fn instructors_with_assignments(&self) -> Result<Vec<InstructorDetail>, DbErr> {
        let instructors = self.instructors().await?;
        Ok(instructors.iter().map(|i| self.detail_of(i)).collect())
    }

    async fn instructor_with_assignments(
        &self,
        id: i32,
    ) -> Result<Option<InstructorDetail>, DbErr> {
        Ok(self
            .instructors
            .iter()
            .find(|i| i.id == id)
            .map(|i| self.detail_of(i)))
    }

    async fn departments(&self) -> Result<Vec<department::Model>, DbErr> {
        let mut departments = self.departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn departments_with_administrator(
        &self,
    ) -> Result<Vec<DepartmentWithAdministrator>, DbErr> {
        let departments = self.departments().await?;
        Ok(departments
            .into_iter()
            .map(|d| {
                let administrator = self.administrator_of(&d);
                (d, administrator)
            })
            .collect())
    }

    async fn department_with_administrator(
        &self,
        id: i32,
    ) -> Result<Option<DepartmentWithAdministrator>, DbErr> {
        Ok(self
            .departments
            .iter()
            .find(|d| d.id == id)
            .map(|d| (d.clone(), self.administrator_of(d))))
    }

    async fn departments_administered_by(
        &self,
        instructor_id: i32,
    ) -> Result<Vec<department::Model>, DbErr> {
        Ok(self
            .departments
            .iter()
            .filter(|d| d.instructor_id == Some(instructor_id))
            .cloned()
            .collect())
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
        self.tracked_row_versions.push((department_id, row_version));
    }

    async fn save(&mut self) -> Result<(), SaveError> {
        self.saves += 1;
        match self.save_failure {
            None => Ok(()),
            Some(SaveFailure::Conflict) => Err(SaveError::Conflict),
            Some(SaveFailure::Database) => Err(SaveError::Database(DbErr::Custom(
                "connection reset".to_owned(),
            ))),
        }
    }
}
