//! Command handlers.

pub mod auth;
pub mod call;
pub mod config_cmd;
pub mod ops;

use jamfly_api::JamfClient;

/// Invalidate the token a command acquired. Failures are logged only so
/// they never mask the command's own outcome.
pub async fn end_session(client: &JamfClient) {
    if let Err(err) = client.tokens().revoke().await {
        tracing::debug!(error = %err, "token invalidation failed");
    }
}
