pub mod course;
pub mod department;
pub mod home;
pub mod instructor;
pub mod student;

use crate::action::ModelState;

/// Field-level validation of a submitted view-model
pub trait Validate {
    fn validate(&self, state: &mut ModelState);

    fn model_state(&self) -> ModelState {
        let mut state = ModelState::default();
        self.validate(&mut state);
        state
    }
}

/// Required text whose trimmed length lies within `min..=max`
pub(crate) fn check_text(
    state: &mut ModelState,
    field: &str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let length = value.trim().chars().count();

    if length == 0 {
        state.add_error(field, format!("The {label} field is required."));
    } else if length < min || length > max {
        if min > 1 {
            state.add_error(
                field,
                format!("The field {label} must be a string with a minimum length of {min} and a maximum length of {max}."),
            );
        } else {
            state.add_error(
                field,
                format!("The field {label} must be a string with a maximum length of {max}."),
            );
        }
    }
}

pub(crate) fn check_required<T>(state: &mut ModelState, field: &str, label: &str, value: &Option<T>) {
    if value.is_none() {
        state.add_error(field, format!("The {label} field is required."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_text() {
        let mut state = ModelState::default();
        check_text(&mut state, "title", "Title", "  ", 3, 50);
        check_text(&mut state, "name", "Name", "ab", 3, 50);
        check_text(&mut state, "last_name", "Last Name", &"x".repeat(51), 1, 50);
        check_text(&mut state, "location", "Office Location", "Gowan 27", 1, 50);

        assert_eq!(state.errors("title"), ["The Title field is required."]);
        assert_eq!(state.errors("name").len(), 1);
        assert_eq!(
            state.errors("last_name"),
            ["The field Last Name must be a string with a maximum length of 50."]
        );
        assert!(state.errors("location").is_empty());
    }
}
