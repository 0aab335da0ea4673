//! Unified error type.

use std::fmt;

/// The error type returned by proxyfix's one fallible operation.
///
/// Only [`Config::checked`](crate::Config::checked) produces it. The request
/// path raises nothing: a mismatched or malformed prefix degrades to
/// pass-through behaviour, and anything the wrapped service returns — errors
/// included — propagates unmodified.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The prefix does not start with `/` (e.g. `foo` instead of `/foo`).
    MissingLeadingSlash(String),
    /// The prefix ends with `/` (e.g. `/foo/` instead of `/foo`).
    TrailingSlash(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLeadingSlash(p) => {
                write!(f, "prefix `{p}` must start with a slash")
            }
            Self::TrailingSlash(p) => {
                write!(f, "prefix `{p}` must not end with a slash")
            }
        }
    }
}

impl std::error::Error for Error {}
