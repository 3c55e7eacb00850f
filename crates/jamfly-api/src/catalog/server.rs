//! Session details and server version.

use serde_json::Value;

use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;

const FAMILY: &str = "server";

pub const AUTH_DETAILS: Operation = Operation::get("get_auth_details", "/api/v1/auth")
    .family(FAMILY)
    .summary("Privileges and account details of the authenticated user");

pub const VERSION: Operation = Operation::get("get_jamf_pro_version", "/api/v1/jamf-pro-version")
    .family(FAMILY)
    .summary("Jamf Pro server version");

pub const SERVER_URL: Operation = Operation::get("get_jamf_pro_server_url", "/api/v1/jamf-pro-server-url")
    .family(FAMILY)
    .summary("Configured Jamf Pro server URL");

pub(crate) const OPERATIONS: &[&Operation] = &[&AUTH_DETAILS, &VERSION, &SERVER_URL];

impl JamfClient {
    pub async fn get_auth_details(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&AUTH_DETAILS)).await
    }

    /// `{"version": "11.x.y-…"}`
    pub async fn get_jamf_pro_version(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&VERSION)).await
    }

    pub async fn get_jamf_pro_server_url(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&SERVER_URL)).await
    }
}
