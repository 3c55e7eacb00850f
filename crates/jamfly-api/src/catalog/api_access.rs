//! API roles, privileges and API client integrations.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "api-access";

pub const LIST_ROLES: Operation = Operation::get("list_api_roles", "/api/v1/api-roles")
    .family(FAMILY)
    .summary("List API roles")
    .query(PAGED);

pub const GET_ROLE: Operation = Operation::get("get_api_role", "/api/v1/api-roles/{id}")
    .family(FAMILY)
    .summary("Get an API role");

pub const CREATE_ROLE: Operation = Operation::post("create_api_role", "/api/v1/api-roles")
    .family(FAMILY)
    .summary("Create an API role")
    .json_body();

pub const UPDATE_ROLE: Operation = Operation::put("update_api_role", "/api/v1/api-roles/{id}")
    .family(FAMILY)
    .summary("Replace an API role")
    .json_body();

pub const DELETE_ROLE: Operation = Operation::delete("delete_api_role", "/api/v1/api-roles/{id}")
    .family(FAMILY)
    .summary("Delete an API role")
    .success("API role {id} successfully deleted.");

pub const PRIVILEGES: Operation = Operation::get("list_api_role_privileges", "/api/v1/api-role-privileges")
    .family(FAMILY)
    .summary("Privileges assignable to API roles");

pub const LIST_INTEGRATIONS: Operation = Operation::get("list_api_integrations", "/api/v1/api-integrations")
    .family(FAMILY)
    .summary("List API client integrations")
    .query(PAGED);

pub const GET_INTEGRATION: Operation =
    Operation::get("get_api_integration", "/api/v1/api-integrations/{id}")
        .family(FAMILY)
        .summary("Get an API client integration");

pub const CREATE_INTEGRATION: Operation =
    Operation::post("create_api_integration", "/api/v1/api-integrations")
        .family(FAMILY)
        .summary("Create an API client integration")
        .json_body();

pub const UPDATE_INTEGRATION: Operation =
    Operation::put("update_api_integration", "/api/v1/api-integrations/{id}")
        .family(FAMILY)
        .summary("Replace an API client integration")
        .json_body();

pub const DELETE_INTEGRATION: Operation =
    Operation::delete("delete_api_integration", "/api/v1/api-integrations/{id}")
        .family(FAMILY)
        .summary("Delete an API client integration")
        .success("API integration {id} successfully deleted.");

pub const CLIENT_CREDENTIALS: Operation = Operation::post(
    "create_api_client_credentials",
    "/api/v1/api-integrations/{id}/client-credentials",
)
.family(FAMILY)
.summary("Rotate and return client credentials for an integration");

pub const CLIENT_TOKEN: Operation = Operation::post("request_api_client_token", "/api/oauth/token")
    .family(FAMILY)
    .summary("Exchange API client credentials for an access token")
    .form();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST_ROLES,
    &GET_ROLE,
    &CREATE_ROLE,
    &UPDATE_ROLE,
    &DELETE_ROLE,
    &PRIVILEGES,
    &LIST_INTEGRATIONS,
    &GET_INTEGRATION,
    &CREATE_INTEGRATION,
    &UPDATE_INTEGRATION,
    &DELETE_INTEGRATION,
    &CLIENT_CREDENTIALS,
    &CLIENT_TOKEN,
];

impl JamfClient {
    pub async fn list_api_roles(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST_ROLES, query).await
    }

    pub async fn get_api_role(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_ROLE, id).await
    }

    pub async fn create_api_role(&self, role: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_ROLE, role).await
    }

    pub async fn update_api_role(&self, id: impl Into<Identifier>, role: Value) -> Result<Value, Error> {
        self.update_by_id(&UPDATE_ROLE, id, role).await
    }

    pub async fn delete_api_role(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_ROLE, id).await
    }

    pub async fn list_api_role_privileges(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&PRIVILEGES)).await
    }

    pub async fn list_api_integrations(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST_INTEGRATIONS, query).await
    }

    pub async fn get_api_integration(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_INTEGRATION, id).await
    }

    pub async fn create_api_integration(&self, integration: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_INTEGRATION, integration).await
    }

    pub async fn update_api_integration(
        &self,
        id: impl Into<Identifier>,
        integration: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE_INTEGRATION, id, integration).await
    }

    pub async fn delete_api_integration(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_INTEGRATION, id).await
    }

    /// `{"clientId": …, "clientSecret": …}`. The previous secret stops working.
    pub async fn create_api_client_credentials(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.json_call(Call::new(&CLIENT_CREDENTIALS).arg("id", id.into()))
            .await
    }

    /// Client-credentials grant for an API integration. The returned
    /// `access_token` belongs to the integration; it is not cached.
    pub async fn request_api_client_token(
        &self,
        client_id: &str,
        client_secret: &SecretString,
    ) -> Result<Value, Error> {
        let form = vec![
            ("client_id".to_owned(), client_id.to_owned()),
            ("grant_type".to_owned(), "client_credentials".to_owned()),
            ("client_secret".to_owned(), client_secret.expose_secret().to_owned()),
        ];
        self.json_call(Call::new(&CLIENT_TOKEN).form(form)).await
    }
}
