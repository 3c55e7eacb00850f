use std::path::PathBuf;

use thiserror::Error;

/// Longest body excerpt carried by an error, in characters.
pub(crate) const EXCERPT_CHARS: usize = 200;

/// Top-level error type for the `jamfly-api` crate.
///
/// Every dispatch outcome that is not a decoded value lands in exactly one
/// of these kinds. None of them ever carries credentials or token material;
/// HTTP-derived variants keep the status and a bounded body excerpt.
#[derive(Debug, Error)]
pub enum Error {
    // ── Client-side contract ────────────────────────────────────────
    /// Missing required argument, mutually exclusive arguments both set,
    /// wrong scalar type, or an unfilled URL slot. Raised before any
    /// request is issued.
    #[error("invalid argument: {0}")]
    Argument(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The auth endpoint rejected the credentials, returned an unusable
    /// token, or a retried request still came back 401/403.
    #[error("authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    // ── HTTP outcomes ───────────────────────────────────────────────
    /// 404 for the given resource path.
    #[error("resource not found: {path}")]
    NotFound { path: String, body: String },

    /// 409, typically a uniqueness violation.
    #[error("conflict (HTTP 409): {body}")]
    Conflict { body: String },

    /// Any other non-success status below 500.
    #[error("client error (HTTP {status}): {body}")]
    Client { status: u16, body: String },

    /// 5xx. Never retried by the dispatcher.
    #[error("server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    // ── Transport ───────────────────────────────────────────────────
    /// DNS, connect, TLS, timeout, or cancellation.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body failed the declared decoder.
    #[error("failed to decode response: {message}")]
    ResponseDecode { message: String, body: String },

    /// Local file I/O for an upload or download.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Network-level failure underneath [`Error::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP stack failed before a status line arrived.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// An external cancel signal aborted the exchange.
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(TransportError::Http(err.without_url()))
    }
}

impl Error {
    /// Shorthand for [`Error::Argument`].
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    /// The HTTP status behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for authentication failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the exchange was aborted by a cancel signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Cancelled))
    }

    /// Returns `true` if this is a transient error a caller may choose to retry.
    ///
    /// The dispatcher itself never retries these.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(TransportError::Http(e)) => e.is_timeout() || e.is_connect(),
            Self::Server { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// First [`EXCERPT_CHARS`] characters of a response body.
pub(crate) fn excerpt(body: &str) -> String {
    match body.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_keeps_short_bodies_verbatim() {
        assert_eq!(excerpt("Conflict: name taken"), "Conflict: name taken");
    }

    #[test]
    fn excerpt_truncates_on_char_boundary() {
        let body = "é".repeat(EXCERPT_CHARS + 50);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn authentication_display_includes_status_when_known() {
        let err = Error::Authentication {
            status: Some(401),
            message: "invalid credentials".into(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed (HTTP 401): invalid credentials"
        );

        let err = Error::Authentication {
            status: None,
            message: "token already expired".into(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed: token already expired"
        );
    }

    #[test]
    fn status_maps_http_kinds() {
        assert_eq!(
            Error::NotFound {
                path: "/api/v1/buildings/9".into(),
                body: String::new()
            }
            .status(),
            Some(404)
        );
        assert_eq!(Error::Conflict { body: String::new() }.status(), Some(409));
        assert_eq!(Error::argument("x").status(), None);
    }

    #[test]
    fn cancelled_is_a_transport_error() {
        let err = Error::from(TransportError::Cancelled);
        assert!(err.is_cancelled());
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "transport error: request cancelled");
    }

    #[test]
    fn gateway_errors_are_transient() {
        for status in [502, 503, 504] {
            let err = Error::Server {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "{status}");
        }
        assert!(
            !Error::Server {
                status: 500,
                body: String::new()
            }
            .is_transient()
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
