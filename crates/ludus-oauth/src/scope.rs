//! Scope string normalization.
//!
//! The upstream token endpoint returns granted scopes as a string that mixes
//! comma-space and bare-space delimiters around some scope names (the Korean
//! "조회" suffix in particular). On disk the scope is kept as a single
//! space-delimited token sequence; in memory it is expanded to a comma-space
//! display form. Both transformations are idempotent and mutually inverse
//! for well-formed scope strings.

/// Split a scope string into its individual tokens, regardless of whether
/// the input uses comma-space, bare-space, or a mix of both.
fn scope_tokens(scope: &str) -> impl Iterator<Item = &str> {
    scope.split([',', ' ']).filter(|token| !token.is_empty())
}

/// Collapse a scope string to the stored form: tokens joined by single spaces.
pub fn normalize_scope(scope: &str) -> String {
    scope_tokens(scope).collect::<Vec<_>>().join(" ")
}

/// Expand a scope string to the display form: tokens joined by `", "`.
pub fn expand_scope(scope: &str) -> String {
    scope_tokens(scope).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_mixed_delimiters() {
        assert_eq!(normalize_scope("유저, 조회 채팅, 조회"), "유저 조회 채팅 조회");
        assert_eq!(normalize_scope("a, b, c"), "a b c");
        assert_eq!(normalize_scope("a b c"), "a b c");
        assert_eq!(normalize_scope(""), "");
    }

    #[test]
    fn expand_produces_display_form() {
        assert_eq!(expand_scope("a b c"), "a, b, c");
        assert_eq!(expand_scope("유저 조회"), "유저, 조회");
        assert_eq!(expand_scope(""), "");
    }

    #[test]
    fn normalize_then_expand_round_trips() {
        let display = "a, b, c";
        assert_eq!(expand_scope(&normalize_scope(display)), display);

        let stored = "a b c";
        assert_eq!(normalize_scope(&expand_scope(stored)), stored);
    }

    #[test]
    fn both_transformations_are_idempotent() {
        let stored = normalize_scope("유저 조회, 채팅 조회");
        assert_eq!(normalize_scope(&stored), stored);

        let display = expand_scope("유저 조회 채팅 조회");
        assert_eq!(expand_scope(&display), display);
    }
}
