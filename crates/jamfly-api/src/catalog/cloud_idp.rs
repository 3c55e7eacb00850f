//! Cloud identity providers.

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED, PAGED_SORTED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "cloud-idp";

pub const LIST: Operation = Operation::get("list_cloud_idps", "/api/v1/cloud-idp")
    .family(FAMILY)
    .summary("List cloud identity providers")
    .query(PAGED_SORTED);

pub const GET: Operation = Operation::get("get_cloud_idp", "/api/v1/cloud-idp/{id}")
    .family(FAMILY)
    .summary("Get a cloud identity provider");

pub const HISTORY: Operation = Operation::get("get_cloud_idp_history", "/api/v1/cloud-idp/{id}/history")
    .family(FAMILY)
    .summary("Cloud identity provider history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_cloud_idp_history_note", "/api/v1/cloud-idp/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a cloud identity provider's history")
        .json_body();

pub const EXPORT_CSV: Operation = Operation::post("export_cloud_idps", "/api/v1/cloud-idp/export")
    .family(FAMILY)
    .summary("Export cloud identity providers as CSV")
    .query(EXPORT)
    .csv();

pub const TEST_GROUP: Operation = Operation::post("test_cloud_idp_group", "/api/v1/cloud-idp/{id}/test-group")
    .family(FAMILY)
    .summary("Look up a group through a cloud identity provider")
    .json_body();

pub const TEST_USER: Operation = Operation::post("test_cloud_idp_user", "/api/v1/cloud-idp/{id}/test-user")
    .family(FAMILY)
    .summary("Look up a user through a cloud identity provider")
    .json_body();

pub const TEST_USER_MEMBERSHIP: Operation = Operation::post(
    "test_cloud_idp_user_membership",
    "/api/v1/cloud-idp/{id}/test-user-membership",
)
.family(FAMILY)
.summary("Check a user's group membership through a cloud identity provider")
.json_body();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &HISTORY,
    &ADD_HISTORY_NOTE,
    &EXPORT_CSV,
    &TEST_GROUP,
    &TEST_USER,
    &TEST_USER_MEMBERSHIP,
];

impl JamfClient {
    pub async fn list_cloud_idps(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_cloud_idp(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn get_cloud_idp_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_cloud_idp_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }

    pub async fn export_cloud_idps(&self, query: &ExportQuery) -> Result<String, Error> {
        self.export_with(&EXPORT_CSV, query).await
    }

    /// `lookup` is `{"groupname": "…"}`.
    pub async fn test_cloud_idp_group(&self, id: impl Into<Identifier>, lookup: Value) -> Result<Value, Error> {
        self.update_by_id(&TEST_GROUP, id, lookup).await
    }

    /// `lookup` is `{"username": "…"}`.
    pub async fn test_cloud_idp_user(&self, id: impl Into<Identifier>, lookup: Value) -> Result<Value, Error> {
        self.update_by_id(&TEST_USER, id, lookup).await
    }

    pub async fn test_cloud_idp_user_membership(
        &self,
        id: impl Into<Identifier>,
        lookup: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&TEST_USER_MEMBERSHIP, id, lookup).await
    }
}
