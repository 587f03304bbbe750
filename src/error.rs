//! Registration errors.
//!
//! Dispatch itself never fails: a request either reaches a handler or one of the
//! two fallbacks (not found / method not allowed). Everything that can go wrong is
//! a caller mistake made while building the route table, and is reported here.

use std::convert::Infallible;

use thiserror::Error;

/// Error returned when a route cannot be registered.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The method token is not `*` and not a valid HTTP method.
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod {
        /// The rejected method string
        method: String,
    },
    /// A `{` was opened but never closed.
    #[error("unclosed capture in pattern '{pattern}'")]
    UnclosedCapture {
        /// The offending pattern
        pattern: String,
    },
    /// A `}` appeared without a matching `{`, or a `{` appeared inside a capture.
    #[error("unexpected brace in pattern '{pattern}'")]
    UnexpectedBrace {
        /// The offending pattern
        pattern: String,
    },
    /// A static pattern that path cleaning would rewrite, so no request could reach it.
    #[error("static pattern '{pattern}' is not a clean path (did you mean '{canonical}'?)")]
    NonCanonicalPath {
        /// The offending pattern
        pattern: String,
        /// What the pattern cleans to
        canonical: String,
    },
    /// `{}` with no name.
    #[error("empty capture name in pattern '{pattern}'")]
    EmptyCapture {
        /// The offending pattern
        pattern: String,
    },
    /// The same capture name is used twice in one pattern.
    #[error("duplicate capture '{name}' in pattern '{pattern}'")]
    DuplicateCapture {
        /// The offending pattern
        pattern: String,
        /// The repeated name
        name: String,
    },
    /// The regex engine rejected the compiled pattern (usually an invalid capture name).
    #[error("pattern '{pattern}' does not compile: {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Error reported by the regex engine
        #[source]
        source: regex::Error,
    },
}

impl From<Infallible> for RouteError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
