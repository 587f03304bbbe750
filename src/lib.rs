//! # brrtmux
//!
//! **brrtmux** is a small, strict HTTP request router. Given a request it selects the
//! single registered handler responsible for it and hands that handler the named
//! parameters captured from the path.
//!
//! ## Overview
//!
//! Requests and responses are plain [`http`] types (`Request<Bytes>` /
//! `Response<Bytes>`), so any server that speaks `http` 1.x can drive the router.
//! Listening, connection handling, TLS and body I/O stay with the host server.
//!
//! ## Architecture
//!
//! - **[`path`]** - request path decoding and normalization (`%xx`, `//`, `.`, `..`, strict trailing slash)
//! - **[`router`]** - pattern compilation and the route table (static + dynamic)
//! - **[`dispatcher`]** - one request in, exactly one handler or fallback invoked
//! - **[`params`]** - the request-scoped path parameter carrier
//! - **[`handler`]** - the handler traits and the per-route [`MethodHandler`]
//! - **[`config`]** / **[`logging`]** - runtime tuning and `tracing` setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server as Host server
//!     participant Dispatcher
//!     participant Router
//!     participant Handler
//!
//!     Server->>Dispatcher: dispatch(GET /users/42)
//!     Dispatcher->>Dispatcher: decode_path + clean_path("/users/42")
//!     Dispatcher->>Router: route(GET, "/users/42")
//!     Router->>Router: static map (exact)
//!     Router->>Router: dynamic patterns in order
//!
//!     alt No pattern matches
//!         Router-->>Dispatcher: NotFound
//!         Dispatcher-->>Server: 404 (not-found handler)
//!     else Path matches, method does not
//!         Router-->>Dispatcher: MethodNotAllowed([GET, POST])
//!         Dispatcher-->>Server: 405 + Allow (method-not-allowed handler)
//!     else Match
//!         Router-->>Dispatcher: Matched(route, {id: "42"})
//!         Dispatcher->>Handler: call(request + Params)
//!         Handler-->>Server: response
//!     end
//! ```
//!
//! ## Patterns
//!
//! | Pattern | Matches | Binds |
//! |---|---|---|
//! | `/health` | `/health` only | nothing |
//! | `/users/{id}` | `/users/42` | `id = "42"` |
//! | `/file/{name}.{ext}` | `/file/report.txt` | `name = "report"`, `ext = "txt"` |
//! | `/static/*` | `/static/css/site.css` | nothing (wildcards are unnamed) |
//!
//! Static routes always beat dynamic ones for the exact same path. Dynamic patterns
//! are tried in registration order and the first one whose path matches decides the
//! outcome. Trailing slashes are significant.
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtmux::{param_value, Dispatcher, Router};
//! use http::{Method, Request, Response, StatusCode};
//!
//! let mut router = Router::new();
//! router
//!     .get("/users/{id}", |req| {
//!         let id = param_value(&req, "id").unwrap_or_default().to_string();
//!         Response::new(id.into())
//!     })
//!     .unwrap();
//! router.post("/users", |_req| Response::new("created".into())).unwrap();
//!
//! let dispatcher = Dispatcher::new(router);
//!
//! let req = Request::get("/users/42").body(Default::default()).unwrap();
//! assert_eq!(dispatcher.dispatch(req).body().as_ref(), b"42");
//!
//! let req = Request::builder()
//!     .method(Method::DELETE)
//!     .uri("/users")
//!     .body(Default::default())
//!     .unwrap();
//! let res = dispatcher.dispatch(req);
//! assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
//! assert_eq!(res.headers()["allow"], "POST");
//! ```
//!
//! ## Concurrency
//!
//! Build the [`Router`] during startup, wrap it in a [`Dispatcher`], then share the
//! dispatcher (e.g. behind an `Arc`) with every worker. Registration needs `&mut`
//! access, so routes cannot be added once the dispatcher is being shared.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod logging;
pub mod params;
pub mod path;
pub mod router;

pub use config::RouterConfig;
pub use dispatcher::Dispatcher;
pub use error::RouteError;
pub use handler::{Body, Handler, MethodHandler, MethodNotAllowedHandler};
pub use params::{param_value, Params, RequestExt};
pub use path::{clean_path, decode_path};
pub use router::{AllowList, MethodFilter, RouteOutcome, Router};
