//! Computer inventory, FileVault and inventory attachments.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{FILTER, ListQuery, PAGE, PAGE_SIZE, SORT};
use crate::body::FileUpload;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, ParamType, Params};

const FAMILY: &str = "computer-inventory";

const SECTION: ParamSpec = ParamSpec::optional("section", ParamType::StringList);

const INVENTORY_QUERY: &[ParamSpec] = &[SECTION, PAGE, PAGE_SIZE, SORT, FILTER];
const SECTION_QUERY: &[ParamSpec] = &[SECTION];

pub const LIST: Operation = Operation::get("list_computers_inventory", "/api/v1/computers-inventory")
    .family(FAMILY)
    .summary("Paged computer inventory, optionally limited to sections")
    .query(INVENTORY_QUERY);

pub const GET: Operation = Operation::get("get_computer_inventory", "/api/v1/computers-inventory/{id}")
    .family(FAMILY)
    .summary("Inventory record of one computer")
    .query(SECTION_QUERY);

pub const DETAIL: Operation =
    Operation::get("get_computer_inventory_detail", "/api/v1/computers-inventory-detail/{id}")
        .family(FAMILY)
        .summary("Full inventory record of one computer");

pub const DELETE: Operation = Operation::delete("delete_computer_inventory", "/api/v1/computers-inventory/{id}")
    .family(FAMILY)
    .summary("Delete a computer record")
    .success("Computer {id} successfully deleted.");

pub const FILEVAULT_ALL: Operation =
    Operation::get("list_computers_filevault", "/api/v1/computers-inventory/filevault")
        .family(FAMILY)
        .summary("FileVault status of all computers")
        .query(super::PAGED_SORTED);

pub const FILEVAULT: Operation =
    Operation::get("get_computer_filevault", "/api/v1/computers-inventory/{id}/filevault")
        .family(FAMILY)
        .summary("FileVault status and recovery key presence of one computer");

pub const UPLOAD_ATTACHMENT: Operation = Operation::post(
    "upload_computer_attachment",
    "/api/v1/computers-inventory/{id}/attachments",
)
.family(FAMILY)
.summary("Attach a file to a computer record")
.multipart();

pub const DOWNLOAD_ATTACHMENT: Operation = Operation::get(
    "download_computer_attachment",
    "/api/v1/computers-inventory/{id}/attachments/{attachmentId}",
)
.family(FAMILY)
.summary("Download a computer attachment")
.download();

pub const DELETE_ATTACHMENT: Operation = Operation::delete(
    "delete_computer_attachment",
    "/api/v1/computers-inventory/{id}/attachments/{attachmentId}",
)
.family(FAMILY)
.summary("Remove a computer attachment")
.success("Attachment {attachmentId} successfully deleted from computer {id}.");

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &DETAIL,
    &DELETE,
    &FILEVAULT_ALL,
    &FILEVAULT,
    &UPLOAD_ATTACHMENT,
    &DOWNLOAD_ATTACHMENT,
    &DELETE_ATTACHMENT,
];

impl JamfClient {
    /// `sections` narrows the record to e.g. `GENERAL`, `HARDWARE`.
    pub async fn list_computers_inventory(
        &self,
        sections: &[&str],
        query: &ListQuery,
    ) -> Result<Value, Error> {
        let params = Params::new()
            .with("section", sections.to_vec())
            .with_all(query.to_params());
        self.json_call(Call::new(&LIST).query(params)).await
    }

    pub async fn get_computer_inventory(
        &self,
        id: impl Into<Identifier>,
        sections: &[&str],
    ) -> Result<Value, Error> {
        let params = Params::new().with("section", sections.to_vec());
        self.json_call(Call::new(&GET).arg("id", id.into()).query(params))
            .await
    }

    pub async fn get_computer_inventory_detail(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&DETAIL, id).await
    }

    pub async fn delete_computer_inventory(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE, id).await
    }

    pub async fn list_computers_filevault(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&FILEVAULT_ALL).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_computer_filevault(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&FILEVAULT, id).await
    }

    pub async fn upload_computer_attachment(
        &self,
        id: impl Into<Identifier>,
        file: &Path,
    ) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&UPLOAD_ATTACHMENT).arg("id", id.into()).upload(upload))
            .await
    }

    /// Saved under the server-supplied name in `dir` (client default if `None`).
    pub async fn download_computer_attachment(
        &self,
        id: impl Into<Identifier>,
        attachment_id: impl Into<Identifier>,
        dir: Option<&Path>,
    ) -> Result<PathBuf, Error> {
        let call = Call::new(&DOWNLOAD_ATTACHMENT)
            .arg("id", id.into())
            .arg("attachmentId", attachment_id.into());
        self.download_call(call, dir).await
    }

    pub async fn delete_computer_attachment(
        &self,
        id: impl Into<Identifier>,
        attachment_id: impl Into<Identifier>,
    ) -> Result<String, Error> {
        let call = Call::new(&DELETE_ATTACHMENT)
            .arg("id", id.into())
            .arg("attachmentId", attachment_id.into());
        self.message_call(call).await
    }
}
