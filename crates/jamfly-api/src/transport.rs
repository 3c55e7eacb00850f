// Shared transport configuration for building reqwest::Client instances.
//
// The dispatcher needs two clients with identical TLS and timeout settings
// that differ only in redirect policy: GET follows redirects, every other
// verb surfaces the 3xx as-is. The token manager reuses the non-following one.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::redirect::Policy;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, TransportError};

/// Connect budget: TCP + TLS handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request budget, including reading the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum redirect hops followed by GET requests.
const MAX_REDIRECTS: usize = 10;

/// TLS verification mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the bundled webpki root store.
    #[default]
    System,
    /// Additionally trust a CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (lab servers with self-signed certs).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: concat!("jamfly/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// `follow_redirects` selects between a bounded redirect policy and
    /// `Policy::none()`.
    pub fn build_client(&self, follow_redirects: bool) -> Result<reqwest::Client, Error> {
        let policy = if follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .redirect(policy);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path).map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::argument(format!("invalid CA certificate: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder.build().map_err(Error::from)
    }
}

/// Drive `fut` to completion unless `cancel` fires first.
///
/// When the signal wins, `fut` is dropped mid-flight and nothing it would
/// have produced is observed by the caller.
pub(crate) async fn cancellable<T, F>(cancel: Option<&CancellationToken>, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(TransportError::Cancelled.into()),
                res = fut => res,
            }
        }
        None => fut.await,
    }
}
