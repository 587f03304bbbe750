//! Router core module - the route table and the lookup hot path.
//!
//! Two structures back the table:
//!
//! - static routes: exact path → routes for that path, one per registered method
//! - dynamic routes: one compiled [`Matcher`] per distinct pattern, in registration
//!   order, each with its per-method routes
//!
//! Lookup never allocates for the common case (≤8 parameters, ≤8 allowed methods).

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use http::Method;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::pattern::{compile, is_dynamic, Matcher};
use crate::error::RouteError;
use crate::handler::{Body, Handler};
use crate::params::Params;
use crate::path::clean_path;

/// Maximum number of allowed methods stored inline before heap allocation.
pub const MAX_INLINE_METHODS: usize = 8;

/// Which request methods a route accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodFilter {
    /// Any method (registered as `"*"`).
    Any,
    /// Exactly this method.
    Only(Method),
}

impl MethodFilter {
    /// Registration token for [`MethodFilter::Any`].
    pub const ANY_TOKEN: &'static str = "*";

    #[inline]
    #[must_use]
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Any => true,
            MethodFilter::Only(m) => m == method,
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        MethodFilter::Only(method)
    }
}

impl From<&Method> for MethodFilter {
    fn from(method: &Method) -> Self {
        MethodFilter::Only(method.clone())
    }
}

impl FromStr for MethodFilter {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::ANY_TOKEN {
            return Ok(MethodFilter::Any);
        }
        Method::from_bytes(s.as_bytes())
            .map(MethodFilter::Only)
            .map_err(|_| RouteError::InvalidMethod {
                method: s.to_string(),
            })
    }
}

impl TryFrom<&str> for MethodFilter {
    type Error = RouteError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodFilter::Any => f.write_str(Self::ANY_TOKEN),
            MethodFilter::Only(m) => f.write_str(m.as_str()),
        }
    }
}

/// Ordered, de-duplicated set of methods for the `Allow` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(SmallVec<[Method; MAX_INLINE_METHODS]>);

impl AllowList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `method` unless it is already present.
    pub fn push(&mut self, method: Method) {
        if !self.0.contains(&method) {
            self.0.push(method);
        }
    }

    /// `Allow` header value: methods joined with `", "`.
    #[must_use]
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl Deref for AllowList {
    type Target = [Method];

    fn deref(&self) -> &[Method] {
        &self.0
    }
}

impl FromIterator<Method> for AllowList {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        let mut allow = AllowList::new();
        for method in iter {
            allow.push(method);
        }
        allow
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, method) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}

/// A registered route. Immutable once registered.
#[derive(Clone)]
pub struct Route {
    method: MethodFilter,
    pattern: Arc<str>,
    handler: Arc<dyn Handler>,
}

impl Route {
    #[must_use]
    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    /// The pattern exactly as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// One distinct dynamic pattern and the routes registered under it.
#[derive(Clone)]
struct PatternGroup {
    matcher: Matcher,
    routes: Vec<Route>,
}

/// Successful lookup: the selected route and the parameters bound by its pattern.
#[derive(Debug, Clone)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    /// Empty for static routes and for wildcard-only patterns.
    pub params: Params,
}

/// Result of looking a request up in the route table.
#[derive(Debug, Clone)]
pub enum RouteOutcome<'r> {
    /// A route accepts this path and method.
    Matched(RouteMatch<'r>),
    /// The path matched but no route for it accepts the method.
    MethodNotAllowed(AllowList),
    /// No route matches the path.
    NotFound,
}

/// Route table.
///
/// Built once during startup and then shared read-only. Registration takes
/// `&mut self`, so adding routes while requests are being dispatched through a
/// shared reference is rejected by the compiler rather than left unsynchronized.
///
/// # Precedence
///
/// 1. A static route for the exact (normalized) path always wins over dynamic ones.
///    If static routes exist for the path but none accepts the method, the result is
///    method-not-allowed and dynamic routes are not tried.
/// 2. Dynamic patterns are tried in registration order. The first pattern whose
///    matcher accepts the path decides the outcome, even when a later pattern would
///    also match and would accept the method.
#[derive(Clone, Default)]
pub struct Router {
    static_routes: HashMap<String, Vec<Route>>,
    dynamic_routes: Vec<PatternGroup>,
    dynamic_index: HashMap<Arc<str>, usize>,
    /// Every registration in order, for introspection.
    registered: Vec<(MethodFilter, Arc<str>)>,
}

impl Router {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` (`"*"` for any method) and `pattern`.
    ///
    /// Capture names must be unique within one pattern.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the method token is invalid, a static pattern is
    /// not already a clean path, or a dynamic pattern does not compile.
    pub fn handle<M>(
        &mut self,
        method: M,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouteError>
    where
        M: TryInto<MethodFilter>,
        RouteError: From<M::Error>,
    {
        let method: MethodFilter = method.try_into()?;

        if !is_dynamic(pattern) {
            let canonical = clean_path(pattern);
            if canonical != pattern {
                warn!(
                    method = %method,
                    pattern = %pattern,
                    canonical = %canonical,
                    "Rejected static pattern that is not a clean path"
                );
                return Err(RouteError::NonCanonicalPath {
                    pattern: pattern.to_string(),
                    canonical,
                });
            }
            let pattern: Arc<str> = Arc::from(pattern);
            self.static_routes
                .entry(pattern.to_string())
                .or_default()
                .push(Route {
                    method: method.clone(),
                    pattern: Arc::clone(&pattern),
                    handler,
                });
            self.record(method, pattern, "static");
            return Ok(());
        }

        let idx = match self.dynamic_index.get(pattern) {
            Some(&idx) => idx,
            None => {
                let matcher = compile(pattern)?;
                debug!(
                    pattern = %pattern,
                    regex = %matcher.as_regex_str(),
                    "Compiled route pattern"
                );
                self.dynamic_routes.push(PatternGroup {
                    matcher,
                    routes: Vec::new(),
                });
                let idx = self.dynamic_routes.len() - 1;
                self.dynamic_index.insert(Arc::from(pattern), idx);
                idx
            }
        };

        let group = &mut self.dynamic_routes[idx];
        let pattern: Arc<str> = Arc::from(group.matcher.pattern());
        group.routes.push(Route {
            method: method.clone(),
            pattern: Arc::clone(&pattern),
            handler,
        });
        self.record(method, pattern, "dynamic");
        Ok(())
    }

    /// Closure form of [`Router::handle`].
    ///
    /// # Errors
    ///
    /// Same as [`Router::handle`].
    pub fn handle_fn<M, F>(&mut self, method: M, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        M: TryInto<MethodFilter>,
        RouteError: From<M::Error>,
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle(method, pattern, Arc::new(handler))
    }

    /// Register a `GET` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(Method::GET, pattern, handler)
    }

    /// Register a `POST` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(Method::POST, pattern, handler)
    }

    /// Register a `PUT` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(Method::PUT, pattern, handler)
    }

    /// Register a `PATCH` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(Method::PATCH, pattern, handler)
    }

    /// Register a `DELETE` handler.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(Method::DELETE, pattern, handler)
    }

    /// Register a handler for every method.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] if the pattern does not compile.
    pub fn any<F>(&mut self, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(http::Request<Body>) -> http::Response<Body> + Send + Sync + 'static,
    {
        self.handle_fn(MethodFilter::Any, pattern, handler)
    }

    fn record(&mut self, method: MethodFilter, pattern: Arc<str>, kind: &'static str) {
        info!(
            method = %method,
            pattern = %pattern,
            kind = kind,
            routes_count = self.registered.len() + 1,
            "Route registered"
        );
        self.registered.push((method, pattern));
    }

    /// Look up `path` (already normalized) for `method`.
    ///
    /// Pure: the same table, method and path always produce the same outcome.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> RouteOutcome<'_> {
        if let Some(routes) = self.static_routes.get(path) {
            return select(routes, method, Params::new());
        }

        for group in &self.dynamic_routes {
            let Some(params) = group.matcher.captures(path) else {
                continue;
            };
            debug!(
                path = %path,
                pattern = %group.matcher.pattern(),
                params_count = params.len(),
                "Dynamic pattern matched path"
            );
            return select(&group.routes, method, params);
        }

        RouteOutcome::NotFound
    }

    /// Every registration as `(method, pattern)`, in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&MethodFilter, &str)> {
        self.registered.iter().map(|(m, p)| (m, p.as_ref()))
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Print all registered routes to stdout
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        println!(
            "[routes] static={} dynamic={} count={}",
            self.static_routes.len(),
            self.dynamic_routes.len(),
            self.registered.len()
        );
        for (method, pattern) in &self.registered {
            println!("[route] {method} {pattern}");
        }
    }
}

/// Pick the first route accepting `method`, or collect the allow-list.
fn select<'r>(routes: &'r [Route], method: &Method, params: Params) -> RouteOutcome<'r> {
    let mut allow = AllowList::new();
    for route in routes {
        if route.method.matches(method) {
            return RouteOutcome::Matched(RouteMatch { route, params });
        }
        if let MethodFilter::Only(m) = &route.method {
            allow.push(m.clone());
        }
    }
    RouteOutcome::MethodNotAllowed(allow)
}
