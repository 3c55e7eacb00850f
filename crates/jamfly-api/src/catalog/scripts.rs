//! Scripts: `/api/v1/scripts`.

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "scripts";

pub const LIST: Operation = Operation::get("list_scripts", "/api/v1/scripts")
    .family(FAMILY)
    .summary("List scripts")
    .query(PAGED);

pub const GET: Operation = Operation::get("get_script", "/api/v1/scripts/{id}")
    .family(FAMILY)
    .summary("Get a script");

pub const CREATE: Operation = Operation::post("create_script", "/api/v1/scripts")
    .family(FAMILY)
    .summary("Create a script")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_script", "/api/v1/scripts/{id}")
    .family(FAMILY)
    .summary("Replace a script")
    .json_body();

pub const DELETE: Operation = Operation::delete("delete_script", "/api/v1/scripts/{id}")
    .family(FAMILY)
    .summary("Delete a script")
    .success("Script {id} successfully deleted.");

pub const DOWNLOAD: Operation = Operation::get("download_script", "/api/v1/scripts/{id}/download")
    .family(FAMILY)
    .summary("Script contents as plain text")
    .accept("text/plain")
    .text();

pub const HISTORY: Operation = Operation::get("get_script_history", "/api/v1/scripts/{id}/history")
    .family(FAMILY)
    .summary("Script history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_script_history_note", "/api/v1/scripts/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a script's history")
        .json_body();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &CREATE,
    &UPDATE,
    &DELETE,
    &DOWNLOAD,
    &HISTORY,
    &ADD_HISTORY_NOTE,
];

impl JamfClient {
    pub async fn list_scripts(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST, query).await
    }

    pub async fn get_script(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_script(&self, script: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, script).await
    }

    pub async fn update_script(&self, id: impl Into<Identifier>, script: Value) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, script).await
    }

    pub async fn delete_script(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE, id).await
    }

    /// Raw script body.
    pub async fn download_script(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.text_call(Call::new(&DOWNLOAD).arg("id", id.into())).await
    }

    pub async fn get_script_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_script_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }
}
