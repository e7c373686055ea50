//! Association between terminal panes and worktrees
//!
//! Terminals expose no metadata slot for "which worktree owns this pane",
//! so ownership is inferred from visible titles. The rule lives behind
//! [`SessionMatcher`] so placement and teardown do not depend on it.

/// Decides whether a visible pane/tab title belongs to a worktree
pub trait SessionMatcher {
    fn matches(&self, title: &str, worktree_name: &str) -> bool;

    /// True when the title belongs to at least one of `names`
    fn matches_any(&self, title: &str, names: &[String]) -> bool {
        names.iter().any(|name| self.matches(title, name))
    }
}

/// Substring containment on titles
///
/// Approximate: a worktree name that occurs inside an unrelated title
/// (e.g. "api" in "rapid-shell") is a false positive. Combined titles
/// such as "alpha / beta" match both names.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl SessionMatcher for SubstringMatcher {
    fn matches(&self, title: &str, worktree_name: &str) -> bool {
        // An empty name would match every title.
        !worktree_name.is_empty() && title.contains(worktree_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_match() {
        let m = SubstringMatcher;
        assert!(m.matches("alpha", "alpha"));
        assert!(m.matches("alpha / beta", "beta"));
        assert!(m.matches("~/w/alpha (zsh)", "alpha"));
        assert!(!m.matches("random-shell", "alpha"));
    }

    #[test]
    fn test_substring_false_positive_is_kept() {
        assert!(SubstringMatcher.matches("rapid-shell", "api"));
    }

    #[test]
    fn test_empty_name_never_matches() {
        assert!(!SubstringMatcher.matches("anything", ""));
    }

    #[test]
    fn test_matches_any() {
        let m = SubstringMatcher;
        assert!(m.matches_any("alpha / beta", &names(&["gamma", "beta"])));
        assert!(!m.matches_any("zsh", &names(&["alpha", "beta"])));
        assert!(!m.matches_any("alpha", &[]));
    }
}
