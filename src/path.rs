//! Request path normalization.
//!
//! Every path is canonicalized before lookup so that static keys and dynamic
//! matchers both see the same shape:
//!
//! - `""` becomes `/`
//! - a missing leading `/` is added
//! - repeated slashes collapse, `.` segments disappear, `..` pops the previous
//!   segment (never above the root); all of it purely lexical
//! - a trailing `/` on the input survives, unless the result is the root itself
//!
//! Trailing slashes are significant: `/a/b/` and `/a/b` are different routes and no
//! redirect is ever issued.
//!
//! The URI path of an incoming request is still percent-encoded. [`decode_path`]
//! decodes it exactly once before cleaning, so routes and parameter values are
//! written in decoded form.
//!
//! ```
//! use brrtmux::path::{clean_path, decode_path};
//!
//! assert_eq!(clean_path("a//b/./c/.."), "/a/b");
//! assert_eq!(clean_path("/a/b/"), "/a/b/");
//! assert_eq!(clean_path(""), "/");
//! assert_eq!(decode_path("/hello/a&b%20c").as_deref(), Some("/hello/a&b c"));
//! ```

use std::borrow::Cow;

use smallvec::SmallVec;

/// Percent-decode a raw URI path once.
///
/// `+` is left alone (it only means space in query strings). Returns `None` when
/// the decoded bytes are not valid UTF-8.
#[must_use]
pub fn decode_path(raw: &str) -> Option<Cow<'_, str>> {
    urlencoding::decode(raw).ok()
}

/// Canonicalize `path` for route lookup.
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut segments: SmallVec<[&str; 16]> = SmallVec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }

    if cleaned.is_empty() {
        return "/".to_string();
    }
    if path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}
