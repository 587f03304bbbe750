//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route patterns (`/users/{id}`, `/static/*`) into matchers
//! - Holding the route table: static paths keyed exactly, dynamic patterns in order
//! - Resolving a method and a normalized path to a route, a method-not-allowed
//!   outcome with its allow-list, or not-found
//!
//! It does not invoke handlers; that is the [`Dispatcher`](crate::dispatcher::Dispatcher)'s job.
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: at registration, dynamic patterns are converted into anchored
//!    regex matchers with one named group per `{name}` capture.
//!
//! 2. **Matching**: for each request the exact path is tried against the static map
//!    first (O(1)), then against each distinct dynamic pattern in registration order
//!    (O(n) in the number of dynamic patterns).
//!
//! ## Example
//!
//! ```rust
//! use brrtmux::router::{RouteOutcome, Router};
//! use http::{Method, Response};
//!
//! let mut router = Router::new();
//! router.get("/users/{id}", |_req| Response::new("user".into())).unwrap();
//!
//! match router.route(&Method::GET, "/users/123") {
//!     RouteOutcome::Matched(m) => assert_eq!(m.params.get("id"), Some("123")),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod core;
mod pattern;

pub use core::{
    AllowList, MethodFilter, Route, RouteMatch, RouteOutcome, Router, MAX_INLINE_METHODS,
};
pub use pattern::{compile, is_dynamic, Matcher};
