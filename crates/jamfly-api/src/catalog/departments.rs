//! Departments: `/api/v1/departments`.

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::JamfClient;
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, Identifier};

const FAMILY: &str = "departments";

pub const LIST: Operation = Operation::get("list_departments", "/api/v1/departments")
    .family(FAMILY)
    .summary("List departments")
    .query(PAGED);

pub const GET: Operation = Operation::get("get_department", "/api/v1/departments/{id}")
    .family(FAMILY)
    .summary("Get a department");

pub const CREATE: Operation = Operation::post("create_department", "/api/v1/departments")
    .family(FAMILY)
    .summary("Create a department")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_department", "/api/v1/departments/{id}")
    .family(FAMILY)
    .summary("Replace a department")
    .json_body();

pub const DELETE: Operation = Operation::delete("delete_department", "/api/v1/departments/{id}")
    .family(FAMILY)
    .summary("Delete a department")
    .success("Department {id} successfully deleted.");

pub const DELETE_MULTIPLE: Operation =
    Operation::post("delete_multiple_departments", "/api/v1/departments/delete-multiple")
        .family(FAMILY)
        .summary("Delete several departments")
        .json_body()
        .success("Department(s) {ids} successfully deleted.");

pub const HISTORY: Operation =
    Operation::get("get_department_history", "/api/v1/departments/{id}/history")
        .family(FAMILY)
        .summary("Department history")
        .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_department_history_note", "/api/v1/departments/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a department's history")
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
    pub async fn list_departments(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST, query).await
    }

    pub async fn get_department(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_department(&self, department: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, department).await
    }

    pub async fn update_department(
        &self,
        id: impl Into<Identifier>,
        department: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, department).await
    }

    pub async fn delete_departments(&self, target: &IdArgs) -> Result<String, Error> {
        self.delete_by_target(&DELETE, &DELETE_MULTIPLE, target).await
    }

    pub async fn get_department_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_department_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }
}
