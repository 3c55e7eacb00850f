//! Categories: `/api/v1/categories`.

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::JamfClient;
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, Identifier};

const FAMILY: &str = "categories";

pub const LIST: Operation = Operation::get("list_categories", "/api/v1/categories")
    .family(FAMILY)
    .summary("List categories")
    .query(PAGED);

pub const GET: Operation = Operation::get("get_category", "/api/v1/categories/{id}")
    .family(FAMILY)
    .summary("Get a category");

pub const CREATE: Operation = Operation::post("create_category", "/api/v1/categories")
    .family(FAMILY)
    .summary("Create a category")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_category", "/api/v1/categories/{id}")
    .family(FAMILY)
    .summary("Replace a category")
    .json_body();

pub const DELETE: Operation = Operation::delete("delete_category", "/api/v1/categories/{id}")
    .family(FAMILY)
    .summary("Delete a category")
    .success("Category {id} successfully deleted.");

pub const DELETE_MULTIPLE: Operation =
    Operation::post("delete_multiple_categories", "/api/v1/categories/delete-multiple")
        .family(FAMILY)
        .summary("Delete several categories")
        .json_body()
        .success("Category(s) {ids} successfully deleted.");

pub const HISTORY: Operation = Operation::get("get_category_history", "/api/v1/categories/{id}/history")
    .family(FAMILY)
    .summary("Category history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_category_history_note", "/api/v1/categories/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a category's history")
        .json_body();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &CREATE,
    &UPDATE,
    &DELETE,
    &DELETE_MULTIPLE,
    &HISTORY,
    &ADD_HISTORY_NOTE,
];

impl JamfClient {
    pub async fn list_categories(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST, query).await
    }

    pub async fn get_category(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_category(&self, category: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, category).await
    }

    pub async fn update_category(
        &self,
        id: impl Into<Identifier>,
        category: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, category).await
    }

    pub async fn delete_categories(&self, target: &IdArgs) -> Result<String, Error> {
        self.delete_by_target(&DELETE, &DELETE_MULTIPLE, target).await
    }

    pub async fn get_category_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_category_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }
}
