use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Invalid selector: selector must be a non-empty string")]
    Empty,

    #[error("Invalid selector: \"{0}\". Attribute selector brackets don't match.")]
    UnbalancedBrackets(String),
}

/// Cheap structural check run on the container selector before any network
/// access. Only bracket balance is verified; the selector engine has the
/// final word on grammar.
pub fn validate_selector(selector: &str) -> Result<(), SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty);
    }

    if selector.contains('[') {
        let open = selector.matches('[').count();
        let close = selector.matches(']').count();
        if open != close {
            return Err(SelectorError::UnbalancedBrackets(selector.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_selectors() {
        assert!(validate_selector(".athing").is_ok());
        assert!(validate_selector("div.post > a").is_ok());
        assert!(validate_selector("body").is_ok());
    }

    #[test]
    fn test_accepts_balanced_attribute_selectors() {
        assert!(validate_selector("[data-test^=\"post-item\"]").is_ok());
        assert!(validate_selector("a[href][title]").is_ok());
    }

    #[test]
    fn test_rejects_empty_selector() {
        assert_eq!(validate_selector(""), Err(SelectorError::Empty));
        assert_eq!(validate_selector("   "), Err(SelectorError::Empty));
    }

    #[test]
    fn test_rejects_unbalanced_brackets() {
        let err = validate_selector("[data-testid=\"post-container\"").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid selector: \"[data-testid=\"post-container\"\". Attribute selector brackets don't match."
        );
        assert!(validate_selector("a[href]]").is_err());
    }

    #[test]
    fn test_heuristic_only_checks_when_opening_bracket_present() {
        // A stray closing bracket alone is left for the selector engine to reject.
        assert!(validate_selector("div]").is_ok());
    }
}
