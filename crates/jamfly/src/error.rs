//! CLI error types with miette diagnostics.
//!
//! Maps `jamfly_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use jamfly_api::{Error as ApiError, TransportError};
use jamfly_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Jamf Pro server")]
    #[diagnostic(
        code(jamfly::connection_failed),
        help(
            "Check the server URL and your network.\n\
             Self-signed certificate? Configure ca_cert in your profile, or use --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: ApiError,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(jamfly::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout {
        #[source]
        source: ApiError,
    },

    #[error("Request cancelled")]
    #[diagnostic(code(jamfly::cancelled))]
    Cancelled,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(jamfly::auth_failed),
        help(
            "Verify the API user's credentials and privileges.\n\
             Run: jamfly config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(jamfly::no_credentials),
        help(
            "Configure credentials with: jamfly config init\n\
             Or set JAMFLY_USERNAME and JAMFLY_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Resource not found: {path}")]
    #[diagnostic(code(jamfly::not_found))]
    NotFound { path: String },

    #[error("Conflict: {body}")]
    #[diagnostic(
        code(jamfly::conflict),
        help("A resource with the same unique field probably exists already.")
    )]
    Conflict { body: String },

    #[error("Operation '{name}' not found")]
    #[diagnostic(code(jamfly::unknown_operation), help("Run: jamfly ops list --search <text>"))]
    UnknownOperation { name: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(jamfly::api_error))]
    Api(ApiError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jamfly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(jamfly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: jamfly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(jamfly::no_config),
        help(
            "Create one with: jamfly config init\n\
             Or pass --url and --username. Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(jamfly::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(jamfly::json), help("Check the JSON text or file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::UnknownOperation { .. } | Self::Json(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if let ApiError::Transport(TransportError::Http(e)) = &err {
            if e.is_timeout() {
                return Self::Timeout { source: err };
            }
        }
        match err {
            ApiError::Argument(reason) => Self::Validation {
                field: "arguments".into(),
                reason,
            },
            ApiError::Authentication { message, .. } => Self::AuthFailed { message },
            ApiError::NotFound { path, .. } => Self::NotFound { path },
            ApiError::Conflict { body } => Self::Conflict { body },
            ApiError::Transport(TransportError::Cancelled) => Self::Cancelled,
            transport @ ApiError::Transport(_) => Self::ConnectionFailed { source: transport },
            other => Self::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => Self::ProfileNotFound {
                name,
                available: "(unknown)".into(),
            },
            ConfigError::Client(api) => api.into(),
            other => Self::Config(other),
        }
    }
}
