//! # Handler Module
//!
//! Handlers are opaque callables that consume one request and produce one response.
//! The router never looks inside them; it only decides which one runs.
//!
//! Any `Fn(Request<Body>) -> Response<Body>` closure that is `Send + Sync + 'static`
//! is a [`Handler`]. Types that need to carry state (the [`Dispatcher`] itself, the
//! per-method [`MethodHandler`]) implement the trait directly.
//!
//! [`Dispatcher`]: crate::dispatcher::Dispatcher

mod method;

use bytes::Bytes;
use http::{Method, Request, Response};

pub use method::MethodHandler;

/// Body type for requests and responses routed by this crate.
pub type Body = Bytes;

/// Something that turns a request into a response.
pub trait Handler: Send + Sync + 'static {
    /// Serve one request.
    fn call(&self, req: Request<Body>) -> Response<Body>;
}

impl<F> Handler for F
where
    F: Fn(Request<Body>) -> Response<Body> + Send + Sync + 'static,
{
    fn call(&self, req: Request<Body>) -> Response<Body> {
        self(req)
    }
}

/// Handler invoked when a path matched but its method did not.
///
/// Receives the request and the methods that would have been accepted, in the order
/// the matching routes were registered.
pub trait MethodNotAllowedHandler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>, allow: &[Method]) -> Response<Body>;
}

impl<F> MethodNotAllowedHandler for F
where
    F: Fn(Request<Body>, &[Method]) -> Response<Body> + Send + Sync + 'static,
{
    fn call(&self, req: Request<Body>, allow: &[Method]) -> Response<Body> {
        self(req, allow)
    }
}
