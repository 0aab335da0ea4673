//! Mount root and URL generation.
//!
//! Routing works on the stripped path; links handed back to the client must
//! carry the prefix the proxy stripped. [`MountRoot`] is the bridge: the
//! wrapper records the configured prefix on every request, and [`href`] /
//! [`external_href`] read it back when building URLs. Both work whether or
//! not a prefix is configured, so handler code never branches on deployment.

use std::sync::Arc;

use http::header::HOST;

use crate::forwarded::UrlScheme;

/// The URL path prefix already consumed by the proxy, a.k.a. the script name.
///
/// Inserted as a request extension by
/// [`ReverseProxyPrefix`](crate::ReverseProxyPrefix) whenever a prefix is
/// configured, overwriting any existing value. Cheap to clone — the prefix
/// string is shared, not copied, across every in-flight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountRoot(Arc<str>);

impl MountRoot {
    pub(crate) fn new(prefix: Arc<str>) -> Self {
        Self(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins the mount root and `path` with exactly one slash between them.
    ///
    /// For a mount root of `/svc`, both `/foo` and `foo` join to `/svc/foo`.
    pub fn join(&self, path: &str) -> String {
        let root = self.0.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{root}{path}")
        } else {
            format!("{root}/{path}")
        }
    }
}

/// Builds a root-relative URL for `path` in the context of `req`.
///
/// With a [`MountRoot`] extension present the result is `mount_root + path`;
/// without one, `path` itself. This is what a self link or a `location`
/// header should contain.
pub fn href<B>(req: &http::Request<B>, path: &str) -> String {
    match req.extensions().get::<MountRoot>() {
        Some(root) => root.join(path),
        None if path.starts_with('/') => path.to_owned(),
        None => format!("/{path}"),
    }
}

/// Builds an absolute URL for `path` in the context of `req`.
///
/// Scheme comes from the [`UrlScheme`] extension (set by the forwarded-header
/// fix), defaulting to `http`. Host comes from the `Host` header, then the
/// request URI's authority, then `localhost`.
pub fn external_href<B>(req: &http::Request<B>, path: &str) -> String {
    let scheme = req
        .extensions()
        .get::<UrlScheme>()
        .map(|s| s.0.as_str())
        .unwrap_or("http");
    let host = req
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    format!("{scheme}://{host}{}", href(req, path))
}
