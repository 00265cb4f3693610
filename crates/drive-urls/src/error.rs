//! Error kinds surfaced by parsing, construction and the accessibility probe.
//!
//! "Not public" and "unresolved" are kept apart: the first is an answer about
//! the resource, the second means no answer could be obtained.

use thiserror::Error;

/// Top-level error for every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum DriveUrlError {
    /// The share URL matches none of the recognized shapes.
    #[error("unrecognized share URL {url:?}: {reason}")]
    Parse { url: String, reason: ParseFailure },

    /// A resource id given to the direct constructor is unusable.
    #[error("invalid resource id {id:?}: {reason}")]
    Validation { id: String, reason: &'static str },

    /// The access URL could not be reached or the redirect chain broke down.
    #[error("could not resolve {url}: {cause}")]
    Unresolved { url: String, cause: UnresolvedCause },

    /// The access URL answered, but the resource requires sign-in or is denied.
    #[error("{url} is not publicly accessible: {denial}")]
    NotPubliclyAccessible { url: String, denial: AccessDenial },
}

impl DriveUrlError {
    pub fn is_parse(&self) -> bool {
        matches!(self, DriveUrlError::Parse { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DriveUrlError::Validation { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, DriveUrlError::Unresolved { .. })
    }

    pub fn is_not_public(&self) -> bool {
        matches!(self, DriveUrlError::NotPubliclyAccessible { .. })
    }
}

/// Why a share URL was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("not a valid absolute URL")]
    InvalidUrl,
    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),
    #[error("host {0:?} is neither docs.google.com nor drive.google.com")]
    UnknownHost(String),
    #[error("path does not match a known share pattern")]
    UnknownPattern,
    #[error("identifier segment is missing")]
    MissingId,
    #[error("identifier segment {0:?} contains invalid characters")]
    MalformedId(String),
}

/// Why the probe could not produce an answer.
#[derive(Debug, Error)]
pub enum UnresolvedCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {0} redirect without a Location header")]
    MissingLocation(u32),
    #[error("redirect Location {0:?} is not a valid URL")]
    BadLocation(String),
    #[error("more than {0} redirects")]
    TooManyRedirects(usize),
}

/// Evidence that the resource is not public.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenial {
    #[error("redirected to sign-in page {0}")]
    LoginRedirect(String),
    #[error("server answered HTTP {0}")]
    Status(u32),
}

/// Failure of a single HTTP exchange, as reported by an [`HttpClient`](crate::probe::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connect or transfer deadline exceeded.
    #[error("timed out: {0}")]
    Timeout(String),
    /// DNS failure, refused connection, reset, empty reply.
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request failed: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_url_and_reason() {
        let e = DriveUrlError::Parse {
            url: "https://example.com/x".to_string(),
            reason: ParseFailure::UnknownHost("example.com".to_string()),
        };
        let msg = e.to_string();
        assert!(msg.contains("https://example.com/x"));
        assert!(msg.contains("example.com"));
        assert!(e.is_parse());
    }

    #[test]
    fn transport_error_converts_into_unresolved_cause() {
        let cause: UnresolvedCause = TransportError::Timeout("30s".to_string()).into();
        assert!(matches!(cause, UnresolvedCause::Transport(TransportError::Timeout(_))));
        assert_eq!(cause.to_string(), "timed out: 30s");
    }

    #[test]
    fn predicates_are_exclusive() {
        let e = DriveUrlError::NotPubliclyAccessible {
            url: "u".to_string(),
            denial: AccessDenial::Status(403),
        };
        assert!(e.is_not_public());
        assert!(!e.is_unresolved());
        assert!(!e.is_validation());
    }
}
