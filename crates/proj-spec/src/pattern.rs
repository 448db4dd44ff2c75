//! Exclude-pattern expansion for file matching rule sets.
//!
//! Configuration-level excludes are relative to a resource prefix. The
//! matcher downstream works on absolute patterns with last-match-wins
//! semantics, where a leading `!` negates, so every exclude is turned
//! around on the way in:
//!
//! ```text
//! excludes: ["a", "!b"]   prefix: "/prefix/"
//!   "a"  -> "!/prefix/a"   (plain exclusion becomes a negated pattern)
//!   "!b" -> "/prefix/b"    (re-inclusion becomes a positive pattern)
//! ```

use tracing::trace;

/// Marker for negated patterns.
pub const NEGATION: char = '!';

/// Append the absolute form of `excludes` to `patterns`.
///
/// Existing entries are left in place and derived entries are appended in
/// the order of `excludes`. `prefix` must start and end with `/`; this is
/// not checked.
pub fn expand_excludes<S: AsRef<str>>(patterns: &mut Vec<String>, excludes: &[S], prefix: &str) {
    patterns.reserve(excludes.len());
    for exclude in excludes {
        let exclude = exclude.as_ref();
        let derived = match exclude.strip_prefix(NEGATION) {
            Some(included) => format!("{prefix}{included}"),
            None => format!("{NEGATION}{prefix}{exclude}"),
        };
        trace!(exclude, derived = %derived, "expanded exclude");
        patterns.push(derived);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_mixed_excludes() {
        let mut patterns = vec![
            "/default/pattern".to_string(),
            "!/other/pattern".to_string(),
        ];
        expand_excludes(&mut patterns, &["a", "!b", "c", "!d"], "/prefix/");
        assert_eq!(
            patterns,
            vec![
                "/default/pattern",
                "!/other/pattern",
                "!/prefix/a",
                "/prefix/b",
                "!/prefix/c",
                "/prefix/d",
            ]
        );
    }

    #[test]
    fn test_expand_empty_excludes_is_noop() {
        let mut patterns = vec!["/x/**".to_string()];
        let none: [&str; 0] = [];
        expand_excludes(&mut patterns, &none, "/prefix/");
        expand_excludes(&mut patterns, &none, "/prefix/");
        assert_eq!(patterns, vec!["/x/**"]);
    }

    #[test]
    fn test_expand_only_strips_one_negation() {
        let mut patterns = Vec::new();
        expand_excludes(&mut patterns, &["!!odd"], "/p/");
        assert_eq!(patterns, vec!["/p/!odd"]);
    }

    #[test]
    fn test_expand_accepts_owned_strings() {
        let mut patterns = Vec::new();
        let excludes = vec!["**/*.md".to_string()];
        expand_excludes(&mut patterns, &excludes, "/");
        assert_eq!(patterns, vec!["!/**/*.md"]);
    }
}
