//! Computer PreStage enrollments and their device scope.

use serde_json::{Value, json};

use super::{ListQuery, PAGED_SORTED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "computer-prestages";

pub const LIST: Operation = Operation::get("list_computer_prestages", "/api/v3/computer-prestages")
    .family(FAMILY)
    .summary("List computer prestages")
    .query(PAGED_SORTED);

pub const GET: Operation = Operation::get("get_computer_prestage", "/api/v3/computer-prestages/{id}")
    .family(FAMILY)
    .summary("Get a computer prestage");

pub const CREATE: Operation = Operation::post("create_computer_prestage", "/api/v3/computer-prestages")
    .family(FAMILY)
    .summary("Create a computer prestage")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_computer_prestage", "/api/v3/computer-prestages/{id}")
    .family(FAMILY)
    .summary("Replace a computer prestage")
    .json_body();

pub const DELETE: Operation =
    Operation::delete("delete_computer_prestage", "/api/v3/computer-prestages/{id}")
        .family(FAMILY)
        .summary("Delete a computer prestage")
        .success("Computer prestage {id} successfully deleted.");

pub const ALL_SCOPES: Operation =
    Operation::get("list_computer_prestage_scopes", "/api/v2/computer-prestages/scope")
        .family(FAMILY)
        .summary("Serial number to prestage assignments");

pub const GET_SCOPE: Operation =
    Operation::get("get_computer_prestage_scope", "/api/v2/computer-prestages/{id}/scope")
        .family(FAMILY)
        .summary("Serial numbers scoped to a prestage");

pub const ADD_SCOPE: Operation = Operation::post(
    "add_computer_prestage_scope",
    "/api/v2/computer-prestages/{id}/scope/add-multiple",
)
.family(FAMILY)
.summary("Add serial numbers to a prestage scope")
.json_body();

pub const REMOVE_SCOPE: Operation = Operation::post(
    "remove_computer_prestage_scope",
    "/api/v2/computer-prestages/{id}/scope/delete-multiple",
)
.family(FAMILY)
.summary("Remove serial numbers from a prestage scope")
.json_body();

pub const REPLACE_SCOPE: Operation =
    Operation::put("replace_computer_prestage_scope", "/api/v2/computer-prestages/{id}/scope")
        .family(FAMILY)
        .summary("Replace the serial numbers scoped to a prestage")
        .json_body();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &CREATE,
    &UPDATE,
    &DELETE,
    &ALL_SCOPES,
    &GET_SCOPE,
    &ADD_SCOPE,
    &REMOVE_SCOPE,
    &REPLACE_SCOPE,
];

/// Scope-change body. `version_lock` must echo the scope's current
/// `versionLock` or the server answers 409.
fn scope_body(serial_numbers: &[&str], version_lock: i64) -> Value {
    json!({
        "serialNumbers": serial_numbers,
        "versionLock": version_lock,
    })
}

impl JamfClient {
    pub async fn list_computer_prestages(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_computer_prestage(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_computer_prestage(&self, prestage: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, prestage).await
    }

    pub async fn update_computer_prestage(
        &self,
        id: impl Into<Identifier>,
        prestage: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, prestage).await
    }

    pub async fn delete_computer_prestage(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE, id).await
    }

    pub async fn list_computer_prestage_scopes(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&ALL_SCOPES)).await
    }

    pub async fn get_computer_prestage_scope(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_SCOPE, id).await
    }

    pub async fn add_computer_prestage_scope(
        &self,
        id: impl Into<Identifier>,
        serial_numbers: &[&str],
        version_lock: i64,
    ) -> Result<Value, Error> {
        self.update_by_id(&ADD_SCOPE, id, scope_body(serial_numbers, version_lock))
            .await
    }

    pub async fn remove_computer_prestage_scope(
        &self,
        id: impl Into<Identifier>,
        serial_numbers: &[&str],
        version_lock: i64,
    ) -> Result<Value, Error> {
        self.update_by_id(&REMOVE_SCOPE, id, scope_body(serial_numbers, version_lock))
            .await
    }

    pub async fn replace_computer_prestage_scope(
        &self,
        id: impl Into<Identifier>,
        serial_numbers: &[&str],
        version_lock: i64,
    ) -> Result<Value, Error> {
        self.update_by_id(&REPLACE_SCOPE, id, scope_body(serial_numbers, version_lock))
            .await
    }
}
