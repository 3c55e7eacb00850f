//! Self Service branding and icons.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{ListQuery, PAGED_SORTED};
use crate::body::FileUpload;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, ParamType, Params};

const FAMILY: &str = "self-service";

const ICON_DOWNLOAD_QUERY: &[ParamSpec] = &[
    ParamSpec::optional("res", ParamType::String),
    ParamSpec::optional("scale", ParamType::String),
];

pub const LIST_BRANDING: Operation =
    Operation::get("list_self_service_branding_macos", "/api/v1/self-service/branding/macos")
        .family(FAMILY)
        .summary("List macOS Self Service branding configurations")
        .query(PAGED_SORTED);

pub const GET_BRANDING: Operation =
    Operation::get("get_self_service_branding_macos", "/api/v1/self-service/branding/macos/{id}")
        .family(FAMILY)
        .summary("Get a macOS Self Service branding configuration");

pub const CREATE_BRANDING: Operation =
    Operation::post("create_self_service_branding_macos", "/api/v1/self-service/branding/macos")
        .family(FAMILY)
        .summary("Create a macOS Self Service branding configuration")
        .json_body();

pub const UPDATE_BRANDING: Operation = Operation::put(
    "update_self_service_branding_macos",
    "/api/v1/self-service/branding/macos/{id}",
)
.family(FAMILY)
.summary("Replace a macOS Self Service branding configuration")
.json_body();

pub const DELETE_BRANDING: Operation = Operation::delete(
    "delete_self_service_branding_macos",
    "/api/v1/self-service/branding/macos/{id}",
)
.family(FAMILY)
.summary("Delete a macOS Self Service branding configuration")
.success("Self Service branding configuration {id} successfully deleted.");

pub const UPLOAD_BRANDING_IMAGE: Operation =
    Operation::post("upload_self_service_branding_image", "/api/self-service/branding/images")
        .family(FAMILY)
        .summary("Upload a Self Service branding image")
        .multipart();

pub const UPLOAD_ICON: Operation = Operation::post("upload_icon", "/api/v1/icon")
    .family(FAMILY)
    .summary("Upload an icon")
    .multipart();

pub const GET_ICON: Operation = Operation::get("get_icon", "/api/v1/icon/{id}")
    .family(FAMILY)
    .summary("Icon metadata");

pub const DOWNLOAD_ICON: Operation = Operation::get("download_icon", "/api/v1/icon/download/{id}")
    .family(FAMILY)
    .summary("Download an icon image")
    .query(ICON_DOWNLOAD_QUERY)
    .accept("image/*")
    .download();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &LIST_BRANDING,
    &GET_BRANDING,
    &CREATE_BRANDING,
    &UPDATE_BRANDING,
    &DELETE_BRANDING,
    &UPLOAD_BRANDING_IMAGE,
    &UPLOAD_ICON,
    &GET_ICON,
    &DOWNLOAD_ICON,
];

impl JamfClient {
    pub async fn list_self_service_branding_macos(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST_BRANDING).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_self_service_branding_macos(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_BRANDING, id).await
    }

    pub async fn create_self_service_branding_macos(&self, branding: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_BRANDING, branding).await
    }

    pub async fn update_self_service_branding_macos(
        &self,
        id: impl Into<Identifier>,
        branding: Value,
    ) -> Result<Value, Error> {
        self.update_by_id(&UPDATE_BRANDING, id, branding).await
    }

    pub async fn delete_self_service_branding_macos(
        &self,
        id: impl Into<Identifier>,
    ) -> Result<String, Error> {
        self.delete_by_id(&DELETE_BRANDING, id).await
    }

    pub async fn upload_self_service_branding_image(&self, file: &Path) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&UPLOAD_BRANDING_IMAGE).upload(upload))
            .await
    }

    /// Returns the new icon's `{id, url}`.
    pub async fn upload_icon(&self, file: &Path) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&UPLOAD_ICON).upload(upload)).await
    }

    pub async fn get_icon(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_ICON, id).await
    }

    /// `res` is `original`, `300` or `512`; `scale` is `0` for the
    /// unscaled image.
    pub async fn download_icon(
        &self,
        id: impl Into<Identifier>,
        res: Option<&str>,
        scale: Option<&str>,
        dir: Option<&Path>,
    ) -> Result<PathBuf, Error> {
        let params = Params::new().with("res", res).with("scale", scale);
        let call = Call::new(&DOWNLOAD_ICON).arg("id", id.into()).query(params);
        self.download_call(call, dir).await
    }
}
