//! Clap derive structures for the `jamfly` CLI.
//!
//! Defines the command tree, global flags, and shared value parsers.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// jamfly -- call any Jamf Pro API operation from the command line
#[derive(Debug, Parser)]
#[command(
    name = "jamfly",
    version,
    about = "Call Jamf Pro API operations from the command line",
    long_about = "A thin CLI over the jamfly-api operation catalog.\n\n\
        Every catalog operation is reachable by name through `jamfly call`;\n\
        `jamfly ops` lists and describes them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "JAMFLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Jamf Pro base URL (overrides profile)
    #[arg(long, short = 'u', env = "JAMFLY_URL", global = true)]
    pub url: Option<String>,

    /// API user (overrides profile)
    #[arg(long, env = "JAMFLY_USERNAME", global = true)]
    pub username: Option<String>,

    /// API user's password
    #[arg(long, env = "JAMFLY_PASSWORD", global = true, hide = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "JAMFLY_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "JAMFLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "JAMFLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Table for listings, pretty JSON for API responses
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the operation catalog
    #[command(alias = "op")]
    Ops(OpsArgs),

    /// Invoke a catalog operation by name
    #[command(alias = "c")]
    Call(CallArgs),

    /// Check or end the API session
    Auth(AuthArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OpsArgs {
    #[command(subcommand)]
    pub command: OpsCommand,
}

#[derive(Debug, Subcommand)]
pub enum OpsCommand {
    /// List operations
    #[command(alias = "ls")]
    List {
        /// Only operations in this family (e.g. "buildings")
        #[arg(long, short = 'f')]
        family: Option<String>,

        /// Case-insensitive match against name, path and summary
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Describe one operation
    Show {
        /// Operation name (e.g. "delete_building")
        name: String,
    },

    /// List operation families
    Families,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CALL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CallArgs {
    /// Operation name (see `jamfly ops list`)
    pub name: String,

    /// Path slot value, repeatable (e.g. --arg id=7)
    #[arg(long = "arg", short = 'a', value_parser = parse_key_val)]
    pub args: Vec<(String, String)>,

    /// Query parameter, repeatable (e.g. --query page=0)
    #[arg(long = "query", short = 'Q', value_parser = parse_key_val)]
    pub query: Vec<(String, String)>,

    /// Inline JSON request body
    #[arg(long, conflicts_with_all = ["json_file", "file", "form"])]
    pub json: Option<String>,

    /// Read the JSON request body from a file
    #[arg(long, conflicts_with_all = ["file", "form"])]
    pub json_file: Option<PathBuf>,

    /// File to upload as the multipart `file` part
    #[arg(long, conflicts_with = "form")]
    pub file: Option<PathBuf>,

    /// Form field, repeatable (e.g. --form name=value)
    #[arg(long, value_parser = parse_key_val)]
    pub form: Vec<(String, String)>,

    /// Target a single resource id
    #[arg(long)]
    pub id: Option<String>,

    /// Target several resource ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ids: Option<Vec<String>>,

    /// Directory for downloaded files
    #[arg(long)]
    pub save_to: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Acquire a token, report its expiry, then invalidate it
    Check,

    /// Acquire a token, extend it once via keep-alive, then invalidate it
    KeepAlive,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (url, username, password_env, ca_cert, insecure, timeout, download_dir)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// Split `key=value` at the first `=`.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
