//! Packages: metadata records plus the package file upload.

use std::path::Path;

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED};
use crate::body::FileUpload;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, Identifier};

const FAMILY: &str = "packages";

pub const LIST: Operation = Operation::get("list_packages", "/api/v1/packages")
    .family(FAMILY)
    .summary("List packages")
    .query(PAGED);

pub const GET: Operation = Operation::get("get_package", "/api/v1/packages/{id}")
    .family(FAMILY)
    .summary("Get a package");

pub const CREATE: Operation = Operation::post("create_package", "/api/v1/packages")
    .family(FAMILY)
    .summary("Create a package record")
    .json_body();

pub const UPDATE: Operation = Operation::put("update_package", "/api/v1/packages/{id}")
    .family(FAMILY)
    .summary("Replace a package record")
    .json_body();

pub const DELETE: Operation = Operation::delete("delete_package", "/api/v1/packages/{id}")
    .family(FAMILY)
    .summary("Delete a package")
    .success("Package {id} successfully deleted.");

pub const DELETE_MULTIPLE: Operation =
    Operation::post("delete_multiple_packages", "/api/v1/packages/delete-multiple")
        .family(FAMILY)
        .summary("Delete several packages")
        .json_body()
        .success("Package(s) {ids} successfully deleted.");

pub const UPLOAD: Operation = Operation::post("upload_package", "/api/v1/packages/{id}/upload")
    .family(FAMILY)
    .summary("Upload the file behind a package record")
    .multipart();

pub const HISTORY: Operation = Operation::get("get_package_history", "/api/v1/packages/{id}/history")
    .family(FAMILY)
    .summary("Package history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_package_history_note", "/api/v1/packages/{id}/history")
        .family(FAMILY)
        .summary("Add a note to a package's history")
        .json_body();

pub const EXPORT_CSV: Operation = Operation::post("export_packages", "/api/v1/packages/export")
    .family(FAMILY)
    .summary("Export packages as CSV")
    .query(EXPORT)
    .csv();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &CREATE,
    &UPDATE,
    &DELETE,
    &DELETE_MULTIPLE,
    &UPLOAD,
    &HISTORY,
    &ADD_HISTORY_NOTE,
    &EXPORT_CSV,
];

impl JamfClient {
    pub async fn list_packages(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST, query).await
    }

    pub async fn get_package(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn create_package(&self, package: Value) -> Result<Value, Error> {
        self.send_json(&CREATE, package).await
    }

    pub async fn update_package(&self, id: impl Into<Identifier>, package: Value) -> Result<Value, Error> {
        self.update_by_id(&UPDATE, id, package).await
    }

    pub async fn delete_packages(&self, target: &IdArgs) -> Result<String, Error> {
        self.delete_by_target(&DELETE, &DELETE_MULTIPLE, target).await
    }

    /// Upload `file` as the payload of package record `id`. The file is read
    /// fully before sending.
    pub async fn upload_package(&self, id: impl Into<Identifier>, file: &Path) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&UPLOAD).arg("id", id.into()).upload(upload))
            .await
    }

    pub async fn get_package_history(
        &self,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.history_of(&HISTORY, id, query).await
    }

    pub async fn add_package_history_note(
        &self,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.add_note(&ADD_HISTORY_NOTE, id, note).await
    }

    pub async fn export_packages(&self, query: &ExportQuery) -> Result<String, Error> {
        self.export_with(&EXPORT_CSV, query).await
    }
}
