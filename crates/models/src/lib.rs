pub mod course_status;
pub mod grade;
pub mod paging;
pub mod role;
