use std::sync::Arc;

use http::{Method, Request, Response};
use tracing::debug;

use super::{Body, Handler};
use crate::dispatcher::method_not_allowed;
use crate::router::AllowList;

/// Per-route method multiplexer.
///
/// Maps each method to its handler and answers "405 Method Not Allowed" with an
/// `Allow` header listing every supported method when none match. Register it under
/// the `*` method to get method filtering that is owned by the route rather than by
/// the route table:
///
/// ```
/// use std::sync::Arc;
///
/// use brrtmux::{MethodHandler, Router};
/// use http::{Method, Response};
///
/// let users = MethodHandler::new()
///     .on_fn(Method::GET, |_req| Response::new("list".into()))
///     .on_fn(Method::POST, |_req| Response::new("create".into()));
///
/// let mut router = Router::new();
/// router.handle("*", "/users", Arc::new(users)).unwrap();
/// ```
#[derive(Clone, Default)]
pub struct MethodHandler {
    handlers: Vec<(Method, Arc<dyn Handler>)>,
}

impl MethodHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `method` to `handler`. Registering the same method again replaces the
    /// earlier handler but keeps its position in the `Allow` list.
    #[must_use]
    pub fn on(mut self, method: Method, handler: Arc<dyn Handler>) -> Self {
        match self.handlers.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = handler,
            None => self.handlers.push((method, handler)),
        }
        self
    }

    /// Closure form of [`MethodHandler::on`].
    #[must_use]
    pub fn on_fn<F>(self, method: Method, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Response<Body> + Send + Sync + 'static,
    {
        self.on(method, Arc::new(handler))
    }

    /// Methods this handler accepts, in registration order.
    #[must_use]
    pub fn allowed(&self) -> AllowList {
        self.handlers.iter().map(|(m, _)| m.clone()).collect()
    }
}

impl Handler for MethodHandler {
    fn call(&self, req: Request<Body>) -> Response<Body> {
        if let Some((_, handler)) = self.handlers.iter().find(|(m, _)| m == req.method()) {
            return handler.call(req);
        }

        let allow = self.allowed();
        debug!(
            method = %req.method(),
            path = %req.uri().path(),
            allow = %allow,
            "Method handler has no entry for request method"
        );
        method_not_allowed(&allow)
    }
}
