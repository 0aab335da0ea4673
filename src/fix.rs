//! Path-prefix correction wrapper.
//!
//! # How a request flows through
//!
//! ```text
//! proxy forwards GET /some-service/v1/foo        (prefix NOT stripped)
//!   or            GET /foo                       (prefix stripped upstream)
//!        ↓
//! ReverseProxyPrefix::call
//!   mount root extension ← "/some-service/v1"    (always, when configured)
//!   uri path             ← "/foo"                (only when it matched)
//!        ↓
//! ProxyFix::call                                  client addr / scheme / host
//!        ↓
//! your service                                    routes against "/foo"
//! ```
//!
//! Mutation always happens-before delegation, within one `call`, on the one
//! task that owns the request. The only state shared across requests is the
//! prefix and the delegate, both written once at construction and read-only
//! afterwards — nothing to lock.
//!
//! A path that does not start with the configured prefix passes through
//! unmodified. The mount root is still overwritten, the pair is
//! inconsistent, and downstream routing 404s — deliberately. The proxy is
//! misconfigured in that situation and a quiet 404 is the historical,
//! relied-upon behaviour.

use std::sync::Arc;

use http::Uri;
use http::uri::PathAndQuery;
use hyper::service::Service;
use tracing::debug;

use crate::config::Config;
use crate::forwarded::ProxyFix;
use crate::mount::MountRoot;

/// Service wrapper that corrects the mount root and request path, then
/// applies the forwarded-header fix.
///
/// Construct with [`ReverseProxyPrefix::wrap`] and install the result as the
/// connection entry point yourself — the wrapper never mutates anything it
/// does not own.
#[derive(Clone, Debug)]
pub struct ReverseProxyPrefix<S> {
    prefix: Option<Arc<str>>,
    inner: ProxyFix<S>,
}

impl<S> ReverseProxyPrefix<S> {
    /// Wraps `inner`, reading the optional prefix out of `config` once.
    ///
    /// The forwarded-header fix is layered in unconditionally; the prefix
    /// only controls path rewriting. Without one, paths pass through
    /// untouched.
    pub fn wrap(inner: S, config: Config) -> Self {
        let prefix: Option<Arc<str>> = config.prefix.map(Arc::from);
        if let Some(p) = &prefix {
            debug!(prefix = %p, "reverse proxy path prefix correction enabled");
        }
        Self { prefix, inner: ProxyFix::new(inner) }
    }
}

impl<S, B> Service<http::Request<B>> for ReverseProxyPrefix<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn call(&self, mut req: http::Request<B>) -> Self::Future {
        if let Some(prefix) = &self.prefix {
            // The mount root is overwritten unconditionally — it reflects
            // configuration, not whatever the request happened to carry.
            req.extensions_mut()
                .insert(MountRoot::new(Arc::clone(prefix)));

            if req.uri().path().starts_with(prefix.as_ref()) {
                strip_prefix(&mut req, prefix);
            }
        }

        self.inner.call(req)
    }
}

/// Removes the leading `prefix` from the URI path, keeping the query intact.
///
/// An exact match leaves an empty remainder; an origin-form URI cannot carry
/// an empty path, so the remainder is written as `/` — the root of the
/// mounted application. If the rebuilt URI is rejected (a prefix that splits
/// a path segment can leave a remainder with no leading slash), the URI is
/// left unmodified rather than failing the request.
fn strip_prefix<B>(req: &mut http::Request<B>, prefix: &str) {
    if prefix.is_empty() {
        return;
    }

    let path = req.uri().path();
    let rest = &path[prefix.len()..];
    let rest = if rest.is_empty() { "/" } else { rest };
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{rest}?{query}"),
        None => rest.to_owned(),
    };

    let Ok(path_and_query) = path_and_query.parse::<PathAndQuery>() else {
        return;
    };
    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *req.uri_mut() = uri;
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use bytes::Bytes;
    use http_body_util::{BodyExt, Full};
    use hyper::service::service_fn;

    use super::*;

    /// Downstream probe: reports what it observed as `mount_root|path|query`.
    fn probe() -> impl Service<
        http::Request<Full<Bytes>>,
        Response = http::Response<Full<Bytes>>,
        Error = Infallible,
    > {
        service_fn(|req: http::Request<Full<Bytes>>| async move {
            let root = req
                .extensions()
                .get::<MountRoot>()
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default();
            let body = format!(
                "{root}|{}|{}",
                req.uri().path(),
                req.uri().query().unwrap_or_default(),
            );
            Ok::<_, Infallible>(http::Response::new(Full::new(Bytes::from(body))))
        })
    }

    async fn observe(config: Config, uri: &str) -> String {
        let svc = ReverseProxyPrefix::wrap(probe(), config);
        let req = http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = svc.call(req).await.unwrap();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_passes_path_through() {
        assert_eq!(
            observe(Config::passthrough(), "/foo").await,
            "|/foo|",
        );
    }

    #[tokio::test]
    async fn strips_matching_prefix_and_sets_mount_root() {
        assert_eq!(
            observe(
                Config::with_prefix("/some-service/v1"),
                "/some-service/v1/foo",
            )
            .await,
            "/some-service/v1|/foo|",
        );
    }

    #[tokio::test]
    async fn mismatched_path_keeps_its_path_but_gets_the_mount_root() {
        // Inconsistent pair on purpose: routing downstream will 404.
        assert_eq!(
            observe(Config::with_prefix("/svc"), "/other/foo").await,
            "/svc|/other/foo|",
        );
    }

    #[tokio::test]
    async fn exact_match_becomes_root() {
        assert_eq!(
            observe(Config::with_prefix("/svc"), "/svc").await,
            "/svc|/|",
        );
    }

    #[tokio::test]
    async fn query_string_survives_stripping() {
        assert_eq!(
            observe(Config::with_prefix("/svc"), "/svc/foo?page=2&q=x").await,
            "/svc|/foo|page=2&q=x",
        );
    }

    #[tokio::test]
    async fn exact_match_with_query_becomes_root_with_query() {
        assert_eq!(
            observe(Config::with_prefix("/svc"), "/svc?page=2").await,
            "/svc|/|page=2",
        );
    }

    #[tokio::test]
    async fn strips_only_once() {
        assert_eq!(
            observe(Config::with_prefix("/svc"), "/svc/svc/foo").await,
            "/svc|/svc/foo|",
        );
    }

    #[tokio::test]
    async fn mount_root_overwrites_any_earlier_value() {
        // Two wrappers stacked: the inner one wins, because it runs last
        // before the application sees the request.
        let inner = ReverseProxyPrefix::wrap(probe(), Config::with_prefix("/inner"));
        let outer = ReverseProxyPrefix::wrap(inner, Config::with_prefix("/outer"));
        let req = http::Request::builder()
            .uri("/outer/inner/foo")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = outer.call(req).await.unwrap();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, Bytes::from("/inner|/foo|"));
    }

    #[tokio::test]
    async fn response_passes_through_unmodified() {
        let inner = service_fn(|_req: http::Request<Full<Bytes>>| async move {
            let res = http::Response::builder()
                .status(http::StatusCode::IM_A_TEAPOT)
                .header("x-custom", "kept")
                .body(Full::new(Bytes::from("body")))
                .unwrap();
            Ok::<_, Infallible>(res)
        });
        let svc = ReverseProxyPrefix::wrap(inner, Config::with_prefix("/svc"));
        let req = http::Request::builder()
            .uri("/svc/foo")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let res = svc.call(req).await.unwrap();
        assert_eq!(res.status(), http::StatusCode::IM_A_TEAPOT);
        assert_eq!(res.headers().get("x-custom").unwrap(), "kept");
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, Bytes::from("body"));
    }
}
