//! Buildings: `/api/v1/buildings`.

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED};
use crate::client::JamfClient;
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, Identifier};

const FAMILY: &str = "buildings";

pub const LIST: Operation = Operation::get("list_buildings", "/api/v1/buildings")
    .family(FAMILY)
    .summary("List buildings")
    .query(PAGED);

pub const GET: Operation = Operation::get("get_building", "/api/v1/buildings/{id}")
    .family(FAMILY)
    .summary("Get a building");

pub const CREATE: Operation = Operation::post("create_building", "/api/v1/buildings")
    .family(FAMILY)
    .summary("Create a building")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_building", "/api/v1/buildings/{id}")
    .family(FAMILY)
    .summary("Replace a building")
    .json_body();

pub const DELETE: Operation = Operation::delete("delete_building", "/api/v1/buildings/{id}")
    .family(FAMILY)
    .summary("Delete a building")
    .success("Building {id} successfully deleted.");

pub const DELETE_MULTIPLE: Operation =
    Operation::post("delete_multiple_buildings", "/api/v1/buildings/delete-multiple")
        .family(FAMILY)
        .summary("Delete several buildings")
        .json_body()
        .success("Building(s) {ids} successfully deleted.");

pub const HISTORY: Operation = Operation::get("get_building_history", "/api/v1/buildings/{id}/history")
    .family(FAMILY)
    .summary("Building history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_building_history_note", "/api/v1/buildings/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a building's history")
        .json_body();

pub const EXPORT_CSV: Operation = Operation::post("export_buildings", "/api/v1/buildings/export")
    .family(FAMILY)
    .summary("Export buildings as CSV")
    .query(EXPORT)
    .csv();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &CREATE,
    &UPDATE,
    &DELETE,
    &DELETE_MULTIPLE,
    &HISTORY,
    &ADD_HISTORY_NOTE,
    &EXPORT_CSV,
];

impl JamfClient {
    pub async fn list_buildings(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST, query).await
    }

    pub async fn get_building(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_building(&self, building: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, building).await
    }

    pub async fn update_building(
        &self,
        id: impl Into<Identifier>,
        building: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, building).await
    }

    /// Delete one building (`id`) or several (`ids`).
    ///
    /// Returns `"Building 42 successfully deleted."` or
    /// `"Building(s) 1, 2 successfully deleted."`.
    pub async fn delete_buildings(&self, target: &IdArgs) -> Result<String, Error> {
        self.delete_by_target(&DELETE, &DELETE_MULTIPLE, target).await
    }

    pub async fn get_building_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_building_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }

    pub async fn export_buildings(&self, query: &ExportQuery) -> Result<String, Error> {
        self.export_with(&EXPORT_CSV, query).await
    }
}
