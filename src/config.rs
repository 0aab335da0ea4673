//! Wrapper configuration.
//!
//! One optional value: the path prefix the reverse proxy strips before
//! forwarding. It is read once, at [`ReverseProxyPrefix::wrap`] time, and is
//! immutable for the life of the process — no ambient globals, no reload.
//!
//! [`ReverseProxyPrefix::wrap`]: crate::ReverseProxyPrefix::wrap

use crate::error::Error;

/// The environment variable [`Config::from_env`] reads.
pub const REVERSE_PROXY_PATH: &str = "REVERSE_PROXY_PATH";

/// Configuration for [`ReverseProxyPrefix`](crate::ReverseProxyPrefix).
///
/// `prefix` is the URL path the proxy consumes before forwarding, with a
/// leading slash and no trailing slash (`/some-service/v1`). `None` means
/// no path rewriting at all — the wrapper still applies the forwarded-header
/// fix, but mount root and path pass through untouched.
///
/// None of the constructors except [`Config::checked`] validate the value;
/// a malformed prefix simply produces whatever string-prefix stripping
/// produces. That is the documented contract, not an oversight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// The path prefix the proxy strips, if any.
    pub prefix: Option<String>,
}

impl Config {
    /// No prefix: path concerns pass through, forwarded headers still apply.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// A prefix, stored verbatim — no validation.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    /// A prefix, rejected unless it starts with `/` and does not end with `/`.
    ///
    /// Opt-in strictness: [`Config::with_prefix`] keeps the historical
    /// anything-goes behaviour for callers that rely on it.
    pub fn checked(prefix: impl Into<String>) -> Result<Self, Error> {
        let prefix = prefix.into();
        if !prefix.starts_with('/') {
            return Err(Error::MissingLeadingSlash(prefix));
        }
        if prefix.ends_with('/') {
            return Err(Error::TrailingSlash(prefix));
        }
        Ok(Self { prefix: Some(prefix) })
    }

    /// Reads the prefix from the `REVERSE_PROXY_PATH` environment variable.
    ///
    /// Variable absent (or not valid UTF-8) means no prefix. Present but
    /// empty is kept as an empty prefix — present and absent are distinct,
    /// matching how deployment manifests set the variable per environment.
    pub fn from_env() -> Self {
        Self { prefix: std::env::var(REVERSE_PROXY_PATH).ok() }
    }
}
