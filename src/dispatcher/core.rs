//! Dispatcher core module - hot path for request dispatch.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use http::{Method, Request, Response};
use tracing::{debug, info, warn};

use super::fallback::{default_method_not_allowed, default_not_found};
use crate::config::RouterConfig;
use crate::handler::{Body, Handler, MethodNotAllowedHandler};
use crate::path::{clean_path, decode_path};
use crate::router::{RouteMatch, RouteOutcome, Router};

/// Request entry point: normalizes the path, resolves it against a [`Router`] and
/// invokes exactly one handler.
///
/// Every request ends in exactly one call: the matched route's handler, the
/// not-found handler, or the method-not-allowed handler. The dispatcher holds no
/// per-request state, so one instance is shared by every worker of the host server
/// (it is `Send + Sync`; wrap it in an `Arc`).
#[derive(Clone)]
pub struct Dispatcher {
    router: Router,
    not_found: Arc<dyn Handler>,
    method_not_allowed: Arc<dyn MethodNotAllowedHandler>,
    config: RouterConfig,
}

impl Dispatcher {
    /// Wrap a fully registered route table with the default fallbacks.
    #[must_use]
    pub fn new(router: Router) -> Self {
        info!(
            routes_count = router.len(),
            "Dispatcher ready"
        );
        Self {
            router,
            not_found: Arc::new(default_not_found),
            method_not_allowed: Arc::new(default_method_not_allowed),
            config: RouterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the handler used when no route matches the path.
    #[must_use]
    pub fn with_not_found(mut self, handler: Arc<dyn Handler>) -> Self {
        self.not_found = handler;
        self
    }

    /// Closure form of [`Dispatcher::with_not_found`].
    #[must_use]
    pub fn with_not_found_fn<F>(self, handler: F) -> Self
    where
        F: Fn(Request<Body>) -> Response<Body> + Send + Sync + 'static,
    {
        self.with_not_found(Arc::new(handler))
    }

    /// Replace the handler used when the path matches but the method does not.
    #[must_use]
    pub fn with_method_not_allowed(mut self, handler: Arc<dyn MethodNotAllowedHandler>) -> Self {
        self.method_not_allowed = handler;
        self
    }

    /// Closure form of [`Dispatcher::with_method_not_allowed`].
    #[must_use]
    pub fn with_method_not_allowed_fn<F>(self, handler: F) -> Self
    where
        F: Fn(Request<Body>, &[Method]) -> Response<Body> + Send + Sync + 'static,
    {
        self.with_method_not_allowed(Arc::new(handler))
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve one request.
    ///
    /// The URI path is percent-decoded once, then cleaned. A path that does not
    /// decode to UTF-8 cannot name any route and goes to the not-found handler.
    pub fn dispatch(&self, req: Request<Body>) -> Response<Body> {
        let Some(decoded) = decode_path(req.uri().path()) else {
            warn!(
                method = %req.method(),
                raw_path = %req.uri().path(),
                "Request path is not valid UTF-8 after percent-decoding"
            );
            return self.not_found.call(req);
        };
        let path = clean_path(&decoded);

        // RT1: Route match attempt
        debug!(
            method = %req.method(),
            raw_path = %req.uri().path(),
            path = %path,
            "Route match attempt"
        );

        let match_start = Instant::now();
        let outcome = self.router.route(req.method(), &path);
        let match_duration = match_start.elapsed();

        match outcome {
            RouteOutcome::Matched(RouteMatch { route, params }) => {
                self.log_match(req.method(), &path, route.pattern(), match_duration);
                let req = if params.is_empty() {
                    req
                } else {
                    params.attach(req)
                };
                route.handler().call(req)
            }
            RouteOutcome::MethodNotAllowed(allow) => {
                // RT2: Path matched, method did not (405)
                warn!(
                    method = %req.method(),
                    path = %path,
                    allow = %allow,
                    duration_us = match_duration.as_micros(),
                    "Method not allowed"
                );
                self.method_not_allowed.call(req, &allow)
            }
            RouteOutcome::NotFound => {
                // RT4: No route found (404)
                warn!(
                    method = %req.method(),
                    path = %path,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
                self.not_found.call(req)
            }
        }
    }

    fn log_match(&self, method: &Method, path: &str, pattern: &str, duration: Duration) {
        // RT3: Route matched
        if duration > self.config.slow_match_threshold() {
            warn!(
                method = %method,
                path = %path,
                route_pattern = %pattern,
                duration_us = duration.as_micros(),
                "Slow route matching detected"
            );
        } else if self.config.log_matches {
            info!(
                method = %method,
                path = %path,
                route_pattern = %pattern,
                duration_us = duration.as_micros(),
                "Route matched"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                route_pattern = %pattern,
                duration_us = duration.as_micros(),
                "Route matched"
            );
        }
    }
}

impl From<Router> for Dispatcher {
    fn from(router: Router) -> Self {
        Dispatcher::new(router)
    }
}

impl Handler for Dispatcher {
    fn call(&self, req: Request<Body>) -> Response<Body> {
        self.dispatch(req)
    }
}
