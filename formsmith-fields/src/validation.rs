//! Value checks shared by field validators.

/// True when `value` has something other than whitespace in it.
pub fn has_content(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// The required/optional rule every capturing built-in field follows.
///
/// Required fields reject a missing, empty or whitespace-only value; optional
/// fields accept anything.
pub fn check_required(required: bool, value: Option<&str>) -> bool {
    !required || has_content(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank_values() {
        assert!(!check_required(true, Some("")));
        assert!(!check_required(true, Some("   ")));
        assert!(!check_required(true, Some("\t\n")));
        assert!(!check_required(true, None));
        assert!(check_required(true, Some("x")));
        assert!(check_required(true, Some("  padded  ")));
    }

    #[test]
    fn optional_accepts_everything() {
        assert!(check_required(false, Some("")));
        assert!(check_required(false, Some("   ")));
        assert!(check_required(false, None));
        assert!(check_required(false, Some("anything")));
    }
}
