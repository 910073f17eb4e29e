/// Outcome of comparing a submitted department row version with the stored one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Match,
    Conflict,
}

/// Byte-for-byte comparison; an empty submission never matches a stored token
pub fn check_row_version(stored: &[u8], submitted: &[u8]) -> TokenCheck {
    if !submitted.is_empty() && stored == submitted {
        TokenCheck::Match
    } else {
        TokenCheck::Conflict
    }
}
