// jamfly-api: Async Rust client for the Jamf Pro REST API
//
// Token lifecycle (`auth`), parameter hygiene (`params`), request dispatch
// (`client`) and the operation catalog (`catalog`).

pub mod auth;
pub mod body;
pub mod catalog;
pub mod client;
pub mod descriptor;
mod download;
pub mod error;
pub mod observe;
pub mod params;
pub mod transport;

pub use auth::{Credentials, TokenManager};
pub use body::{FileUpload, RequestBody};
pub use catalog::{ExportQuery, ListQuery};
pub use client::{Call, CallArgs, JamfClient, JamfClientBuilder, Output};
pub use descriptor::{BodyKind, Decoder, Operation, Stability, Verb};
pub use error::{Error, TransportError};
pub use observe::{Exchange, ExchangeObserver};
pub use params::{IdArgs, IdTarget, Identifier, ParamSpec, ParamType, ParamValue, Params, prepare_query};
pub use transport::{TlsMode, TransportConfig};

pub use secrecy::SecretString;
pub use tokio_util::sync::CancellationToken;
