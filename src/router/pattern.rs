//! Route pattern compilation.
//!
//! A pattern is a path template:
//!
//! - `{name}` captures one path segment (one or more characters, never `/`) under `name`
//! - `*` captures anything, including `/`, greedily and without a name
//! - every other character matches itself, `.` included
//!
//! Patterns without any of `{`, `}` or `*` are static and are never compiled; the
//! route table looks them up by exact string instead.
//!
//! Compilation produces an anchored regex, e.g. `/file/{name}.{ext}` becomes
//! `^/file/(?P<name>[^/]+)\.(?P<ext>[^/]+)$`.

use std::collections::HashSet;
use std::sync::Arc;

use regex::Regex;

use crate::error::RouteError;
use crate::params::Params;

/// Regex fragment for a named single-segment capture (name spliced in between).
const NAMED_CAPTURE_OPEN: &str = "(?P<";
const NAMED_CAPTURE_CLOSE: &str = ">[^/]+)";
/// Regex fragment for the unnamed greedy wildcard.
const WILDCARD_CAPTURE: &str = "(.*)";

/// Characters that make a pattern dynamic.
const PATTERN_IDENTIFIERS: [char; 3] = ['*', '{', '}'];

/// `true` if `pattern` needs a compiled matcher, `false` if it is a static path.
#[inline]
#[must_use]
pub fn is_dynamic(pattern: &str) -> bool {
    pattern.contains(PATTERN_IDENTIFIERS)
}

/// Compiled form of a dynamic pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: Arc<str>,
    regex: Regex,
    /// Capture names indexed by regex group; `None` for the wildcard groups.
    groups: Vec<Option<Arc<str>>>,
}

impl Matcher {
    /// The pattern this matcher was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled regex source.
    #[must_use]
    pub fn as_regex_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Names of the `{name}` captures in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().flatten().map(AsRef::as_ref)
    }

    /// Whole-path match test.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and bind every named capture.
    ///
    /// Returns `None` if the path does not match. A match with no named captures
    /// (wildcard-only pattern) yields an empty set.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Params> {
        let caps = self.regex.captures(path)?;
        let params = self
            .groups
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| {
                let name = name.as_ref()?;
                let value = caps.get(idx)?;
                Some((Arc::clone(name), value.as_str().to_string()))
            })
            .collect();
        Some(params)
    }
}

/// Compile a dynamic pattern into a [`Matcher`].
///
/// Capture names must be unique within one pattern; a repeated name is rejected.
///
/// # Errors
///
/// Returns a [`RouteError`] for unbalanced braces, empty or duplicate capture names,
/// and names the regex engine does not accept.
pub fn compile(pattern: &str) -> Result<Matcher, RouteError> {
    let mut source = String::with_capacity(pattern.len() * 2 + 2);
    source.push('^');

    let mut seen: HashSet<&str> = HashSet::new();
    let mut literal_start = 0;
    let mut chars = pattern.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '*' => {
                source.push_str(&regex::escape(&pattern[literal_start..idx]));
                source.push_str(WILDCARD_CAPTURE);
                literal_start = idx + 1;
            }
            '{' => {
                source.push_str(&regex::escape(&pattern[literal_start..idx]));
                let name_start = idx + 1;
                let name_end = loop {
                    match chars.next() {
                        Some((end, '}')) => break end,
                        Some((_, '{')) => {
                            return Err(RouteError::UnexpectedBrace {
                                pattern: pattern.to_string(),
                            })
                        }
                        Some(_) => {}
                        None => {
                            return Err(RouteError::UnclosedCapture {
                                pattern: pattern.to_string(),
                            })
                        }
                    }
                };
                let name = &pattern[name_start..name_end];
                if name.is_empty() {
                    return Err(RouteError::EmptyCapture {
                        pattern: pattern.to_string(),
                    });
                }
                if !seen.insert(name) {
                    return Err(RouteError::DuplicateCapture {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                source.push_str(NAMED_CAPTURE_OPEN);
                source.push_str(name);
                source.push_str(NAMED_CAPTURE_CLOSE);
                literal_start = name_end + 1;
            }
            '}' => {
                return Err(RouteError::UnexpectedBrace {
                    pattern: pattern.to_string(),
                })
            }
            _ => {}
        }
    }

    source.push_str(&regex::escape(&pattern[literal_start..]));
    source.push('$');

    let regex = Regex::new(&source).map_err(|source| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    let groups = regex
        .capture_names()
        .map(|name| name.map(Arc::from))
        .collect();

    Ok(Matcher {
        pattern: Arc::from(pattern),
        regex,
        groups,
    })
}
