//! Path parameters carried alongside a request.
//!
//! When a dynamic route matches, the dispatcher builds a fresh [`Params`] set and
//! stores it in the request's [`http::Extensions`] before the handler runs. The set
//! is keyed by type, so it cannot collide with anything else a host server keeps in
//! the extensions, and it lives and dies with the request.
//!
//! Handlers read values with [`param_value`] or the [`RequestExt`] trait:
//!
//! ```
//! use brrtmux::params::{param_value, Params, RequestExt};
//! use http::Request;
//!
//! let mut params = Params::new();
//! params.push("id", "42");
//!
//! let req = params.attach(Request::new(()));
//! assert_eq!(param_value(&req, "id"), Some("42"));
//! assert_eq!(req.param("missing"), None);
//! ```

use std::sync::Arc;

use http::Request;
use smallvec::SmallVec;

/// Maximum number of path parameters stored inline before heap allocation.
/// Most REST paths have ≤4 parameters (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Names are `Arc<str>` shared with the compiled matcher, so building a set per
/// request only clones pointers; values are per-request data from the path.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Named values captured from the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: ParamVec,
}

impl Params {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding.
    pub fn push(&mut self, name: impl Into<Arc<str>>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Value bound to `name`.
    ///
    /// Uses "last write wins" semantics if a name appears more than once.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate bindings in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Store this set in the request's extensions, replacing any previous set.
    #[must_use]
    pub fn attach<B>(self, mut req: Request<B>) -> Request<B> {
        req.extensions_mut().insert(self);
        req
    }

    /// Parameter set attached to `req`, if any.
    #[must_use]
    pub fn of<B>(req: &Request<B>) -> Option<&Params> {
        req.extensions().get::<Params>()
    }
}

impl FromIterator<(Arc<str>, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (Arc<str>, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

/// Value of the path parameter `name` for a request routed by this crate.
///
/// Returns `None` when the name is unknown or no parameters were attached; never an
/// error.
#[must_use]
pub fn param_value<'r, B>(req: &'r Request<B>, name: &str) -> Option<&'r str> {
    Params::of(req).and_then(|params| params.get(name))
}

/// Parameter accessors on [`http::Request`].
pub trait RequestExt {
    /// Value of the path parameter `name`, see [`param_value`].
    fn param(&self, name: &str) -> Option<&str>;

    /// The whole attached parameter set, if any.
    fn params(&self) -> Option<&Params>;
}

impl<B> RequestExt for Request<B> {
    fn param(&self, name: &str) -> Option<&str> {
        param_value(self, name)
    }

    fn params(&self) -> Option<&Params> {
        Params::of(self)
    }
}
