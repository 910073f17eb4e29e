pub mod db;
pub mod entities;
pub mod services;

pub use services::unit_of_work::{
    Change, NewInstructor, Record, SaveError, SeaOrmUnitOfWork, UnitOfWork,
};
