use crate::auth::Caller;
use database::entities::course;
use log::debug;

/// Operations checked against a single course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Approve,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Decides whether `caller` may perform `operation` on `course`.
///
/// Staff may do anything. Everyone else may read approved courses, and may
/// create, read, update or delete the courses they own. Approving and
/// rejecting is reserved for staff.
pub fn authorize(caller: &Caller, course: &course::Model, operation: Operation) -> Decision {
    if caller.is_staff() {
        return Decision::Allow;
    }

    let is_owner = match (caller.user_id(), course.owner_id.as_deref()) {
        (Some(user), Some(owner)) => user == owner,
        _ => false,
    };

    let decision = Decision::from(match operation {
        Operation::Read => course.status.is_approved() || is_owner,
        Operation::Create | Operation::Update | Operation::Delete => is_owner,
        Operation::Approve | Operation::Reject => false,
    });

    if !decision.is_allowed() {
        debug!(
            "{:?} on course {} denied for {:?}",
            operation,
            course.id,
            caller.user_id()
        );
    }

    decision
}

/// Role check for deletes of students and instructors
pub fn require_staff(caller: &Caller) -> Decision {
    Decision::from(caller.is_staff())
}
