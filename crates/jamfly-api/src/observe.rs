// Exchange observation
//
// Every HTTP exchange (auth requests included) is reported once, after the
// status line arrives or the transport fails. Observers see a borrowed,
// read-only record and cannot influence the request.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use tracing::{debug, warn};
use url::Url;

/// One completed (or failed) HTTP exchange.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    /// Catalog operation name, or `auth.token` / `auth.keep-alive` /
    /// `auth.invalidate` for token traffic.
    pub operation: &'a str,
    pub method: &'a Method,
    /// Request URL. Never carries credentials.
    pub url: &'a Url,
    /// `None` when the transport failed before a status arrived.
    pub status: Option<StatusCode>,
    pub elapsed: Duration,
    /// 1 for the first send, 2 for the post-refresh retry.
    pub attempt: u8,
}

/// Hook invoked for every exchange. Implementations must be cheap and
/// must not block; they run inline on the request task.
pub trait ExchangeObserver: Send + Sync {
    fn on_exchange(&self, exchange: &Exchange<'_>);
}

impl<F> ExchangeObserver for F
where
    F: Fn(&Exchange<'_>) + Send + Sync,
{
    fn on_exchange(&self, exchange: &Exchange<'_>) {
        self(exchange);
    }
}

pub(crate) type SharedObserver = Option<Arc<dyn ExchangeObserver>>;

/// Log the exchange and forward it to the installed observer, if any.
pub(crate) fn record(observer: &SharedObserver, exchange: &Exchange<'_>) {
    let elapsed_ms = exchange.elapsed.as_millis();
    match exchange.status {
        Some(status) if status.is_success() || status.is_redirection() => debug!(
            operation = exchange.operation,
            method = %exchange.method,
            path = exchange.url.path(),
            status = status.as_u16(),
            elapsed_ms,
            attempt = exchange.attempt,
            "exchange complete"
        ),
        Some(status) => warn!(
            operation = exchange.operation,
            method = %exchange.method,
            path = exchange.url.path(),
            status = status.as_u16(),
            elapsed_ms,
            attempt = exchange.attempt,
            "exchange returned error status"
        ),
        None => warn!(
            operation = exchange.operation,
            method = %exchange.method,
            path = exchange.url.path(),
            elapsed_ms,
            attempt = exchange.attempt,
            "exchange failed before a response arrived"
        ),
    }

    if let Some(observer) = observer {
        observer.on_exchange(exchange);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn closures_are_observers() {
        let seen: Arc<Mutex<Vec<(String, Option<u16>)>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let observer: SharedObserver = Some(Arc::new(move |ex: &Exchange<'_>| {
            sink.lock()
                .unwrap()
                .push((ex.operation.to_owned(), ex.status.map(|s| s.as_u16())));
        }));

        let url = Url::parse("https://jamf.example.com/api/v1/buildings").unwrap();
        record(
            &observer,
            &Exchange {
                operation: "list_buildings",
                method: &Method::GET,
                url: &url,
                status: Some(StatusCode::OK),
                elapsed: Duration::from_millis(12),
                attempt: 1,
            },
        );
        record(
            &observer,
            &Exchange {
                operation: "list_buildings",
                method: &Method::GET,
                url: &url,
                status: None,
                elapsed: Duration::from_millis(3),
                attempt: 1,
            },
        );

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("list_buildings".to_owned(), Some(200)),
                ("list_buildings".to_owned(), None)
            ]
        );
    }
}
