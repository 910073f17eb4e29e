pub mod identity;
pub mod policy;

pub use identity::{Caller, ContosoClaims};
pub use policy::{Operation, authorize, require_staff};
