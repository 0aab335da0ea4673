//! # proxyfix
//!
//! Request-metadata correction for hyper services behind a reverse proxy.
//! Nothing more. Nothing less.
//!
//! ## The problem
//!
//! A proxy often strips a path prefix before your service ever sees the
//! request: the client asks for `example.com/some-service/v1/foo`, the proxy
//! forwards `some-service-v1.internal/foo`. Your routes match `/foo` and
//! everything looks fine — until you generate a URL. A self link built from
//! the request context comes out as `/foo`, the client follows it to
//! `example.com/foo`, and the proxy has never heard of it.
//!
//! The proxy also replaces the transport facts: the peer address is the
//! proxy, the scheme is whatever the last hop spoke, the `Host` header is an
//! internal name. Anything the application derives from those — client IPs
//! in audit logs, absolute URLs — is wrong.
//!
//! ## The contract
//!
//! proxyfix is one wrapper around your service, installed once at startup:
//!
//! - With a configured prefix, every request gets a [`MountRoot`] extension
//!   carrying that prefix, and the prefix is stripped from the URI path
//!   before your routes see it. `/some-service/v1/foo` routes as `/foo`;
//!   URLs built with [`href`] come back as `/some-service/v1/foo`.
//! - The forwarded headers of the one adjacent proxy hop are trusted:
//!   `X-Forwarded-For` becomes a [`ClientAddr`] extension, `X-Forwarded-Proto`
//!   a [`UrlScheme`] extension, `X-Forwarded-Host` overwrites `Host`.
//! - The response passes through untouched. proxyfix never errors, never
//!   logs on the request path, never allocates a boxed future.
//!
//! The prefix value must include a leading slash and no trailing slash
//! (`/foo`, not `/foo/`). proxyfix does not police this by default — see
//! [`Config::checked`] if you want it policed.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use hyper::service::service_fn;
//! use proxyfix::{Config, ReverseProxyPrefix, href};
//!
//! # async fn serve_somehow<S>(_svc: S) {}
//! # async fn run() {
//! let app = service_fn(|req: http::Request<hyper::body::Incoming>| async move {
//!     // Routes match the stripped path; links carry the full prefix.
//!     let this = href(&req, req.uri().path());
//!     let body = format!(r#"{{"self":"{this}"}}"#);
//!     Ok::<_, std::convert::Infallible>(http::Response::new(body))
//! });
//!
//! let svc = ReverseProxyPrefix::wrap(app, Config::with_prefix("/some-service/v1"));
//! // `svc` is the new entry point — hand it to your connection loop.
//! serve_somehow(svc).await;
//! # }
//! ```

mod config;
mod error;
mod fix;
mod forwarded;
mod mount;

pub use config::Config;
pub use error::Error;
pub use fix::ReverseProxyPrefix;
pub use forwarded::{ClientAddr, ProxyFix, UrlScheme};
pub use mount::{MountRoot, external_href, href};
