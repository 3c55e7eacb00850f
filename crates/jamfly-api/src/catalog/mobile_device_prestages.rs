//! Mobile device PreStage enrollments and their attachments.

use std::path::Path;

use serde_json::{Value, json};

use super::{ListQuery, PAGED_SORTED};
use crate::body::FileUpload;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, IdTarget, Identifier};

const FAMILY: &str = "mobile-device-prestages";

pub const LIST: Operation = Operation::get("list_mobile_device_prestages", "/api/v2/mobile-device-prestages")
    .family(FAMILY)
    .summary("List mobile device prestages")
    .query(PAGED_SORTED);

pub const GET: Operation =
    Operation::get("get_mobile_device_prestage", "/api/v2/mobile-device-prestages/{id}")
        .family(FAMILY)
        .summary("Get a mobile device prestage");

pub const DELETE: Operation =
    Operation::delete("delete_mobile_device_prestage", "/api/v2/mobile-device-prestages/{id}")
        .family(FAMILY)
        .summary("Delete a mobile device prestage")
        .success("Mobile device prestage {id} successfully deleted.");

pub const LIST_ATTACHMENTS: Operation = Operation::get(
    "list_mobile_device_prestage_attachments",
    "/api/v2/mobile-device-prestages/{id}/attachments",
)
.family(FAMILY)
.summary("Attachments of a mobile device prestage");

pub const UPLOAD_ATTACHMENT: Operation = Operation::post(
    "upload_mobile_device_prestage_attachment",
    "/api/v2/mobile-device-prestages/{id}/attachments",
)
.family(FAMILY)
.summary("Attach a file to a mobile device prestage")
.multipart();

pub const DELETE_ATTACHMENTS: Operation = Operation::post(
    "delete_mobile_device_prestage_attachments",
    "/api/v2/mobile-device-prestages/{id}/attachments/delete-multiple",
)
.family(FAMILY)
.summary("Remove attachments from a mobile device prestage")
.json_body()
.success("Attachment(s) {ids} successfully deleted from mobile device prestage {id}.");

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST,
    &GET,
    &DELETE,
    &LIST_ATTACHMENTS,
    &UPLOAD_ATTACHMENT,
    &DELETE_ATTACHMENTS,
];

impl JamfClient {
    pub async fn list_mobile_device_prestages(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_mobile_device_prestage(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn delete_mobile_device_prestage(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE, id).await
    }

    pub async fn list_mobile_device_prestage_attachments(
        &self,
        id: impl Into<Identifier>,
    ) -> Result<Value, Error> {
        self.get_by_id(&LIST_ATTACHMENTS, id).await
    }

    pub async fn upload_mobile_device_prestage_attachment(
        &self,
        id: impl Into<Identifier>,
        file: &Path,
    ) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&UPLOAD_ATTACHMENT).arg("id", id.into()).upload(upload))
            .await
    }

    /// Remove one or more attachments. The endpoint only has a bulk form,
    /// so a single `id` target is sent as a one-element list.
    pub async fn delete_mobile_device_prestage_attachments(
        &self,
        prestage_id: impl Into<Identifier>,
        attachments: &IdArgs,
    ) -> Result<String, Error> {
        let ids = match attachments.resolve()? {
            IdTarget::Single(id) => vec![id],
            IdTarget::Many(ids) => ids,
        };
        let joined = ids.join(", ");
        let call = Call::new(&DELETE_ATTACHMENTS)
            .arg("id", prestage_id.into())
            .json(json!({ "ids": ids }))
            .message_arg("ids", joined);
        self.message_call(call).await
    }
}
