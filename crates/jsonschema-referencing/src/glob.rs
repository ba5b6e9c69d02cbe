//! Glob-to-regex compilation for file-pattern schema association.
use once_cell::sync::OnceCell;

/// A compiled file-pattern association: a positive or negative glob plus its
/// equivalent regular expression.
pub struct CompiledPattern {
    source: String,
    negated: bool,
    regex: OnceCell<regex::Regex>,
}

impl CompiledPattern {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let (negated, rest) = match pattern.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        CompiledPattern {
            source: rest.to_string(),
            negated,
            regex: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    fn regex(&self) -> &regex::Regex {
        self.regex.get_or_init(|| {
            let translated = glob_to_regex(&self.source);
            regex::Regex::new(&translated).unwrap_or_else(|_| regex::Regex::new("$^").expect("empty-match regex"))
        })
    }

    #[must_use]
    pub fn is_match(&self, resource: &str) -> bool {
        self.regex().is_match(resource)
    }
}

/// Translates a glob pattern into an anchored regular expression. A pattern
/// with no `/` is prefixed with `**/` so it matches at any depth.
fn glob_to_regex(pattern: &str) -> String {
    let rooted = pattern.contains('/');
    let pattern = if rooted { pattern.to_string() } else { format!("**/{pattern}") };

    let mut out = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '[' => {
                let close = chars[i..].iter().position(|&c| c == ']').map(|p| i + p);
                if let Some(close) = close {
                    out.push('[');
                    out.extend(&chars[i + 1..close]);
                    out.push(']');
                    i = close + 1;
                } else {
                    out.push_str("\\[");
                    i += 1;
                }
            }
            c if "\\.+^$()|{}".contains(c) => {
                out.push('\\');
                out.push(c);
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out.push('$');
    out
}

/// A set of positive and negative glob associations for one schema URI. A
/// resource matches iff at least one positive pattern matches and no
/// negative pattern matches.
#[derive(Default)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    #[must_use]
    pub fn new(globs: &[String]) -> Self {
        PatternSet {
            patterns: globs.iter().map(|g| CompiledPattern::new(g)).collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, resource: &str) -> bool {
        let mut matched = false;
        for pattern in &self.patterns {
            if pattern.is_match(resource) {
                matched = !pattern.is_negated();
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_filename_matches_any_depth() {
        let set = PatternSet::new(&["package.json".to_string()]);
        assert!(set.matches("a/b/package.json"));
        assert!(set.matches("package.json"));
        assert!(!set.matches("package.jsonx"));
    }

    #[test]
    fn negative_pattern_overrides_a_later_positive_match_order() {
        // Last matching rule wins, so order in the input list matters.
        let set = PatternSet::new(&["*.json".to_string(), "!private.json".to_string()]);
        assert!(set.matches("a.json"));
        assert!(!set.matches("private.json"));
    }

    #[test]
    fn double_star_matches_nested_directories() {
        let set = PatternSet::new(&["**/schemas/*.json".to_string()]);
        assert!(set.matches("a/b/schemas/x.json"));
        assert!(!set.matches("a/b/schemas/sub/x.json"));
    }
}
