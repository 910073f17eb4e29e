use crate::dtos::{
    course::{CourseEnrollmentViewModel, CourseViewModel},
    department::{DepartmentDeleteForm, DepartmentViewModel},
    home::EnrollmentDateGroupViewModel,
    instructor::{InstructorForm, InstructorViewModel},
    student::{EnrollmentViewModel, StudentDetailsViewModel, StudentViewModel},
};
use crate::error::ErrorResponse;
use crate::routes::{course, department, health, home, instructor, student};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        home::about,
        student::index,
        student::details,
        student::create_form,
        student::create,
        student::edit_form,
        student::edit,
        student::delete_form,
        student::delete_confirmed,
        course::index,
        course::details,
        course::review,
        course::create_form,
        course::create,
        course::edit_form,
        course::edit,
        course::delete_form,
        course::delete_confirmed,
        instructor::index,
        instructor::details,
        instructor::create_form,
        instructor::create,
        instructor::edit_form,
        instructor::edit,
        instructor::delete_form,
        instructor::delete_confirmed,
        department::index,
        department::details,
        department::create_form,
        department::create,
        department::edit_form,
        department::edit,
        department::delete_form,
        department::delete_confirmed
    ),
    components(schemas(
        ErrorResponse,
        StudentViewModel,
        StudentDetailsViewModel,
        EnrollmentViewModel,
        CourseViewModel,
        CourseEnrollmentViewModel,
        InstructorViewModel,
        InstructorForm,
        DepartmentViewModel,
        DepartmentDeleteForm,
        EnrollmentDateGroupViewModel
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Home", description = "Enrollment statistics"),
        (name = "Students", description = "Student screens"),
        (name = "Courses", description = "Course screens, filtered and reviewed by role and ownership"),
        (name = "Instructors", description = "Instructor screens with office and course assignments"),
        (name = "Departments", description = "Department screens with optimistic concurrency"),
    ),
    info(
        title = "ContosoUniversity API",
        version = "1.0.0",
        description = "University administration backend",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
