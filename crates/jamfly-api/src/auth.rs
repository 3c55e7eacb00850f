// Bearer-token lifecycle
//
// Tokens come from `POST /api/v1/auth/token` with HTTP Basic credentials
// and are cached until they come within `TOKEN_REFRESH_SKEW` of expiry.
// Reads of a fresh token are lock-free (ArcSwapOption); acquisition is
// serialized behind an async gate so concurrent callers never race two
// auth requests against each other.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use url::Url;

use crate::error::{Error, excerpt};
use crate::observe::{Exchange, SharedObserver, record};
use crate::transport::cancellable;

pub const AUTH_TOKEN_PATH: &str = "/api/v1/auth/token";
pub const KEEP_ALIVE_PATH: &str = "/api/v1/auth/keep-alive";
pub const INVALIDATE_PATH: &str = "/api/v1/auth/invalidate-token";

/// A token expiring within this window is treated as already stale.
pub const TOKEN_REFRESH_SKEW_SECS: i64 = 30;

/// Lifetime assumed when the auth response omits an expiry.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 25 * 60;

// ── Credentials ──────────────────────────────────────────────────────

/// Server location plus API-user credentials. Read-only after construction.
#[derive(Clone)]
pub struct Credentials {
    base_url: Url,
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Parse and normalize `base_url` (trailing slash trimmed).
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| Error::argument(format!("invalid base URL '{trimmed}': {e}")))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::argument(format!(
                "base URL must be an http(s) URL, got '{trimmed}'"
            )));
        }
        let username = username.into();
        if username.is_empty() {
            return Err(Error::argument("username must not be empty"));
        }
        Ok(Self {
            base_url,
            username,
            password,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `base_url` joined with the `/`-separated segments of `path`.
    pub(crate) fn url_for(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::argument("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ── Token ────────────────────────────────────────────────────────────

/// A cached bearer token.
pub(crate) struct Token {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    pub(crate) fn secret(&self) -> &str {
        self.value.expose_secret()
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - TimeDelta::seconds(TOKEN_REFRESH_SKEW_SECS) > now
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Where the bearer token for an attempt came from.
///
/// Only a `Cached` token earns the one-shot refresh-and-retry on 401/403;
/// a token acquired for this very call being rejected means the
/// credentials themselves lack access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenSource {
    Cached,
    Fresh,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    #[serde(default, alias = "expires_at")]
    expires: Option<DateTime<Utc>>,
}

// ── Manager ──────────────────────────────────────────────────────────

/// Acquires, caches and refreshes the bearer token for one client.
pub struct TokenManager {
    credentials: Credentials,
    http: reqwest::Client,
    cache: ArcSwapOption<Token>,
    gate: Mutex<()>,
    observer: SharedObserver,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &self.credentials)
            .field("expires_at", &self.expires_at())
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub(crate) fn new(credentials: Credentials, http: reqwest::Client, observer: SharedObserver) -> Self {
        Self {
            credentials,
            http,
            cache: ArcSwapOption::empty(),
            gate: Mutex::new(()),
            observer,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current bearer token, acquiring a new one if the cache is empty or
    /// within the refresh skew of expiry.
    pub async fn token(&self) -> Result<SecretString, Error> {
        let (token, _) = self.bearer(None).await?;
        Ok(SecretString::from(token.secret().to_owned()))
    }

    /// Drop the cached token. The next request acquires a new one.
    pub fn invalidate(&self) {
        if self.cache.swap(None).is_some() {
            debug!("cached token invalidated");
        }
    }

    /// Expiry of the cached token, if one is cached.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.cache.load().as_ref().map(|t| t.expires_at)
    }

    /// Extend the session: `POST /api/v1/auth/keep-alive` with the current
    /// token. The returned token replaces the cache.
    ///
    /// The cache is read under the gate, so a refresh already in flight
    /// finishes first and its token is the one extended.
    pub async fn keep_alive(&self) -> Result<DateTime<Utc>, Error> {
        let _gate = self.gate.lock().await;
        let current = match self.fresh_cached() {
            Some(token) => token,
            None => self.acquire(None).await?,
        };

        let url = self.credentials.url_for(KEEP_ALIVE_PATH)?;
        let request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(current.secret());
        let (status, body) = self
            .exchange("auth.keep-alive", &Method::POST, &url, request, None)
            .await?;

        if !status.is_success() {
            self.cache.store(None);
            return Err(auth_failure(status, &body));
        }
        let token = parse_token(status, &body, Utc::now())?;
        let expires_at = token.expires_at;
        self.cache.store(Some(Arc::new(token)));
        info!(%expires_at, "token extended");
        Ok(expires_at)
    }

    /// Invalidate the token server-side, then drop the cache regardless of
    /// the outcome. A no-op when no token is cached.
    pub async fn revoke(&self) -> Result<(), Error> {
        let _gate = self.gate.lock().await;
        let Some(current) = self.cache.swap(None) else {
            debug!("no cached token to revoke");
            return Ok(());
        };

        let url = self.credentials.url_for(INVALIDATE_PATH)?;
        let request = self.http.post(url.clone()).bearer_auth(current.secret());
        let (status, body) = self
            .exchange("auth.invalidate", &Method::POST, &url, request, None)
            .await?;

        // 401: the server already considers the token dead.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            info!("token revoked");
            Ok(())
        } else {
            Err(auth_failure(status, &body))
        }
    }

    // ── dispatcher entry points ──────────────────────────────────────

    /// Token for the next attempt plus where it came from.
    pub(crate) async fn bearer(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<(Arc<Token>, TokenSource), Error> {
        if let Some(token) = self.fresh_cached() {
            trace!("reusing cached token");
            return Ok((token, TokenSource::Cached));
        }

        let _gate = cancellable(cancel, async { Ok(self.gate.lock().await) }).await?;
        if let Some(token) = self.fresh_cached() {
            trace!("token refreshed by a concurrent caller");
            return Ok((token, TokenSource::Cached));
        }

        let token = self.acquire(cancel).await?;
        Ok((token, TokenSource::Fresh))
    }

    /// Replace `rejected` after a 401/403. If another caller already swapped
    /// in a different fresh token, that one is reused instead.
    pub(crate) async fn replace_rejected(
        &self,
        rejected: &Arc<Token>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Arc<Token>, Error> {
        let _gate = cancellable(cancel, async { Ok(self.gate.lock().await) }).await?;

        if let Some(current) = self
            .fresh_cached()
            .filter(|current| !Arc::ptr_eq(current, rejected))
        {
            return Ok(current);
        }
        self.invalidate();
        self.acquire(cancel).await
    }

    // ── internals ────────────────────────────────────────────────────

    fn fresh_cached(&self) -> Option<Arc<Token>> {
        self.cache
            .load_full()
            .filter(|token| token.is_fresh(Utc::now()))
    }

    /// Issue the auth request and store the result. Caller holds the gate.
    async fn acquire(&self, cancel: Option<&CancellationToken>) -> Result<Arc<Token>, Error> {
        let url = self.credentials.url_for(AUTH_TOKEN_PATH)?;
        debug!("acquiring bearer token");

        let request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            );
        let (status, body) = self
            .exchange("auth.token", &Method::POST, &url, request, cancel)
            .await?;

        if !status.is_success() {
            return Err(auth_failure(status, &body));
        }

        let token = Arc::new(parse_token(status, &body, Utc::now())?);
        self.cache.store(Some(Arc::clone(&token)));
        info!(expires_at = %token.expires_at, "bearer token acquired");
        Ok(token)
    }

    /// Send an auth-endpoint request and read the whole body, reporting the
    /// exchange to the observer.
    async fn exchange(
        &self,
        operation: &str,
        method: &Method,
        url: &Url,
        request: reqwest::RequestBuilder,
        cancel: Option<&CancellationToken>,
    ) -> Result<(StatusCode, String), Error> {
        let started = Instant::now();
        let sent = cancellable(cancel, async { request.send().await.map_err(Error::from) }).await;
        record(
            &self.observer,
            &Exchange {
                operation,
                method,
                url,
                status: sent.as_ref().ok().map(reqwest::Response::status),
                elapsed: started.elapsed(),
                attempt: 1,
            },
        );
        let resp = sent?;
        let status = resp.status();
        let body = cancellable(cancel, async { resp.text().await.map_err(Error::from) }).await?;
        Ok((status, body))
    }
}

/// Decode an auth response body into a token valid at `now`.
fn parse_token(status: StatusCode, body: &str, now: DateTime<Utc>) -> Result<Token, Error> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(|e| Error::Authentication {
        status: Some(status.as_u16()),
        message: format!("unreadable token response: {e}"),
    })?;

    if parsed.token.is_empty() {
        return Err(Error::Authentication {
            status: Some(status.as_u16()),
            message: "token response carried an empty token".into(),
        });
    }

    let expires_at = match parsed.expires {
        Some(expires) if expires <= now => {
            return Err(Error::Authentication {
                status: None,
                message: format!("token already expired at {expires}"),
            });
        }
        Some(expires) => expires,
        None => now + TimeDelta::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
    };

    Ok(Token {
        value: SecretString::from(parsed.token),
        expires_at,
    })
}

pub(crate) fn auth_failure(status: StatusCode, body: &str) -> Error {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("rejected by server")
            .to_owned()
    } else {
        excerpt(body.trim())
    };
    Error::Authentication {
        status: Some(status.as_u16()),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials::new(
            "https://jamf.example.com/",
            "api-user",
            SecretString::from("hunter2".to_owned()),
        )
        .unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(creds.base_url().as_str(), "https://jamf.example.com/");
    }

    #[test]
    fn credentials_reject_non_http_urls() {
        let err = Credentials::new("ftp://jamf", "u", SecretString::from("p".to_owned())).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
        let err = Credentials::new("not a url", "u", SecretString::from("p".to_owned())).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn url_for_keeps_base_path_prefix() {
        let creds = Credentials::new(
            "https://proxy.example.com/jamf/",
            "u",
            SecretString::from("p".to_owned()),
        )
        .unwrap();
        assert_eq!(
            creds.url_for(AUTH_TOKEN_PATH).unwrap().as_str(),
            "https://proxy.example.com/jamf/api/v1/auth/token"
        );
    }

    #[test]
    fn parse_token_uses_server_expiry() {
        let body = r#"{"token":"abc","expires":"2026-03-01T12:20:00Z"}"#;
        let token = parse_token(StatusCode::OK, body, now()).unwrap();
        assert_eq!(token.secret(), "abc");
        assert_eq!(token.expires_at, now() + TimeDelta::minutes(20));
    }

    #[test]
    fn parse_token_accepts_expires_at_alias() {
        let body = r#"{"token":"abc","expires_at":"2026-03-01T12:05:00Z"}"#;
        let token = parse_token(StatusCode::OK, body, now()).unwrap();
        assert_eq!(token.expires_at, now() + TimeDelta::minutes(5));
    }

    #[test]
    fn missing_expiry_defaults_to_25_minutes() {
        let token = parse_token(StatusCode::OK, r#"{"token":"abc"}"#, now()).unwrap();
        assert_eq!(token.expires_at, now() + TimeDelta::minutes(25));
    }

    #[test]
    fn past_expiry_fails_acquisition() {
        let body = r#"{"token":"abc","expires":"2026-03-01T11:59:00Z"}"#;
        let err = parse_token(StatusCode::OK, body, now()).unwrap_err();
        assert!(err.is_auth(), "got {err:?}");
    }

    #[test]
    fn malformed_body_is_an_auth_error() {
        let err = parse_token(StatusCode::OK, "<html>", now()).unwrap_err();
        assert!(
            matches!(&err, Error::Authentication { message, .. } if message.starts_with("unreadable")),
            "got {err:?}"
        );
    }

    #[test]
    fn freshness_honours_skew() {
        let token = Token {
            value: SecretString::from("t".to_owned()),
            expires_at: now() + TimeDelta::seconds(TOKEN_REFRESH_SKEW_SECS),
        };
        assert!(!token.is_fresh(now()));
        assert!(token.is_fresh(now() - TimeDelta::seconds(1)));
    }

    #[test]
    fn token_debug_redacts_value() {
        let token = Token {
            value: SecretString::from("very-secret".to_owned()),
            expires_at: now(),
        };
        assert!(!format!("{token:?}").contains("very-secret"));
    }

    #[test]
    fn auth_failure_prefers_body_excerpt() {
        let err = auth_failure(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.to_string(), "authentication failed (HTTP 401): Unauthorized");
        let err = auth_failure(StatusCode::FORBIDDEN, r#"{"errors":[]}"#);
        assert_eq!(err.status(), Some(403));
    }
}
