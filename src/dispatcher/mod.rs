//! # Dispatcher Module
//!
//! Turns one [`http::Request`] into one [`http::Response`] using a [`Router`].
//!
//! ## Request Flow
//!
//! 1. The request path is normalized ([`clean_path`])
//! 2. The router resolves method + path to an outcome
//! 3. On a match, the extracted [`Params`] are attached to the request and the
//!    route's handler runs
//! 4. Otherwise the not-found or method-not-allowed fallback runs
//!
//! ## Example
//!
//! ```rust
//! use brrtmux::{param_value, Dispatcher, Router};
//! use http::{Request, Response, StatusCode};
//!
//! let mut router = Router::new();
//! router
//!     .get("/hello/{name}", |req| {
//!         let name = param_value(&req, "name").unwrap_or("stranger").to_string();
//!         Response::new(format!("hello {name}").into())
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(router);
//!
//! let res = dispatcher.dispatch(Request::get("/hello/world").body(Default::default()).unwrap());
//! assert_eq!(res.body().as_ref(), b"hello world");
//!
//! let res = dispatcher.dispatch(Request::post("/hello/world").body(Default::default()).unwrap());
//! assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
//! ```
//!
//! [`Router`]: crate::router::Router
//! [`clean_path`]: crate::path::clean_path
//! [`Params`]: crate::params::Params

mod core;
mod fallback;

pub use core::Dispatcher;
pub use fallback::{method_not_allowed, not_found};
