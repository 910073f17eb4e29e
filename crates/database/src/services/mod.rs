pub mod course;
pub mod department;
pub mod instructor;
pub mod student;
pub mod unit_of_work;
