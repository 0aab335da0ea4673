//! Forwarded-header trust layer.
//!
//! A reverse proxy replaces three transport facts before your service sees
//! the request: the peer address becomes the proxy's, the scheme becomes
//! whatever the last hop spoke, and `Host` becomes an internal name. The
//! proxy records the originals in `X-Forwarded-For`, `X-Forwarded-Proto`,
//! and `X-Forwarded-Host`.
//!
//! [`ProxyFix`] trusts exactly **one** adjacent hop and writes the originals
//! back where the application looks for them. Trust is the whole game here:
//! every value in these headers is client-controlled until your own proxy
//! appends to it, which is why only the entry added by the adjacent hop —
//! the last one — is honoured. Do not install this layer on a service
//! reachable without a proxy in front of it.

use std::net::IpAddr;

use http::header::HOST;
use http::uri::Scheme;
use hyper::service::Service;

/// The original client address, restored from `X-Forwarded-For`.
///
/// Inserted as a request extension, overwriting whatever the connection
/// layer put there — behind a proxy the socket peer is the proxy itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClientAddr(pub IpAddr);

/// The scheme the client actually used, restored from `X-Forwarded-Proto`.
///
/// An origin-form request URI carries no scheme of its own; absolute URL
/// generation ([`external_href`](crate::external_href)) reads this extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlScheme(pub Scheme);

/// Service wrapper that applies the one-hop forwarded-header fix.
///
/// [`ReverseProxyPrefix`](crate::ReverseProxyPrefix) installs this for you;
/// wrap with it directly only when you want header trust without any path
/// rewriting.
#[derive(Clone, Debug)]
pub struct ProxyFix<S> {
    inner: S,
}

impl<S> ProxyFix<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, B> Service<http::Request<B>> for ProxyFix<S>
where
    S: Service<http::Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn call(&self, mut req: http::Request<B>) -> Self::Future {
        // X-Forwarded-For is a comma-separated chain, each hop appending the
        // peer it saw. Only the last entry was written by the adjacent
        // (trusted) proxy; everything before it is hearsay.
        if let Some(client) = last_forwarded_for(&req) {
            req.extensions_mut().insert(ClientAddr(client));
        }

        if let Some(scheme) = forwarded_proto(&req) {
            req.extensions_mut().insert(UrlScheme(scheme));
        }

        // The proxy rewrote Host to reach us; X-Forwarded-Host is what the
        // client targeted. Restore it in place so host-based logic and
        // absolute URLs agree with the outside world.
        if let Some(host) = req.headers().get("x-forwarded-host").cloned() {
            req.headers_mut().insert(HOST, host);
        }

        self.inner.call(req)
    }
}

/// Last parseable entry of `X-Forwarded-For`, if any.
fn last_forwarded_for<B>(req: &http::Request<B>) -> Option<IpAddr> {
    let value = req.headers().get("x-forwarded-for")?.to_str().ok()?;
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .next_back()?
        .parse()
        .ok()
}

/// `X-Forwarded-Proto` as a parsed scheme, if present and valid.
fn forwarded_proto<B>(req: &http::Request<B>) -> Option<Scheme> {
    let value = req.headers().get("x-forwarded-proto")?.to_str().ok()?;
    value.parse().ok()
}
