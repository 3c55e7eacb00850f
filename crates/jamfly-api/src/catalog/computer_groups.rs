//! Computer groups and smart computer groups.

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "computer-groups";

pub const LIST: Operation = Operation::get("list_computer_groups", "/api/v1/computer-groups")
    .family(FAMILY)
    .summary("All computer groups, static and smart");

pub const LIST_SMART: Operation =
    Operation::get("list_smart_computer_groups", "/api/v2/computer-groups/smart-groups")
        .family(FAMILY)
        .summary("List smart computer groups")
        .query(PAGED);

pub const GET_SMART: Operation =
    Operation::get("get_smart_computer_group", "/api/v2/computer-groups/smart-groups/{id}")
        .family(FAMILY)
        .summary("Get a smart computer group");

pub const CREATE_SMART: Operation =
    Operation::post("create_smart_computer_group", "/api/v2/computer-groups/smart-groups")
        .family(FAMILY)
        .summary("Create a smart computer group")
        .json_body();

pub const UPDATE_SMART: Operation =
    Operation::put("update_smart_computer_group", "/api/v2/computer-groups/smart-groups/{id}")
        .family(FAMILY)
        .summary("Replace a smart computer group")
        .json_body();

pub const DELETE_SMART: Operation =
    Operation::delete("delete_smart_computer_group", "/api/v2/computer-groups/smart-groups/{id}")
        .family(FAMILY)
        .summary("Delete a smart computer group")
        .success("Smart computer group {id} successfully deleted.");

pub const SMART_MEMBERSHIP: Operation = Operation::get(
    "get_smart_computer_group_membership",
    "/api/v2/computer-groups/smart-group-membership/{id}",
)
.family(FAMILY)
.summary("Computer ids currently in a smart group");

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &LIST_SMART,
    &GET_SMART,
    &CREATE_SMART,
    &UPDATE_SMART,
    &DELETE_SMART,
    &SMART_MEMBERSHIP,
];

impl JamfClient {
    pub async fn list_computer_groups(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST)).await
    }

    pub async fn list_smart_computer_groups(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST_SMART, query).await
    }

    pub async fn get_smart_computer_group(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_SMART, id).await
    }

    pub async fn create_smart_computer_group(&self, group: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_SMART, group).await
    }

    pub async fn update_smart_computer_group(
        &self,
        id: impl Into<Identifier>,
        group: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE_SMART, id, group).await
    }

    pub async fn delete_smart_computer_group(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_SMART, id).await
    }

    pub async fn get_smart_computer_group_membership(
        &self,
        id: impl Into<Identifier>,
    ) -> Result<Value, Error> {
        self.get_by_id(&SMART_MEMBERSHIP, id).await
    }
}
