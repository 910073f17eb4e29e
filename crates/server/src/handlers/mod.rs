//! Request orchestration for each resource, written against
//! [`database::UnitOfWork`] so the same code runs over the database and the
//! in-memory double used by the tests.

pub mod course;
pub mod department;
pub mod home;
pub mod instructor;
pub mod student;

#[cfg(test)]
pub(crate) mod testing;

use crate::action::ActionResult;
use crate::error::AppError;

pub type HandlerResult<T> = Result<ActionResult<T>, AppError>;

pub(crate) const SAVE_FAILED_MESSAGE: &str =
    "Unable to save changes. Try again, and if the problem persists see your system administrator.";

pub(crate) const DELETE_FAILED_MESSAGE: &str =
    "Delete failed. Try again, and if the problem persists see your system administrator.";
