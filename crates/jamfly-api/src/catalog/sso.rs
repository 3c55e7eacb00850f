//! Single sign-on settings, metadata and the SAML signing certificate.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;

const FAMILY: &str = "sso";

pub const GET_SETTINGS: Operation = Operation::get("get_sso_settings", "/api/v3/sso")
    .family(FAMILY)
    .summary("Current SSO configuration");

pub const UPDATE_SETTINGS: Operation = Operation::put("update_sso_settings", "/api/v3/sso")
    .family(FAMILY)
    .summary("Replace the SSO configuration")
    .json_body();

pub const DISABLE: Operation = Operation::post("disable_sso", "/api/v3/sso/disable")
    .family(FAMILY)
    .summary("Turn SSO off")
    .success("SSO successfully disabled.");

pub const VALIDATE_METADATA: Operation =
    Operation::post("validate_sso_metadata", "/api/v3/sso/validate")
        .family(FAMILY)
        .summary("Validate an identity provider metadata source")
        .json_body();

pub const DOWNLOAD_METADATA: Operation =
    Operation::get("download_sso_metadata", "/api/v3/sso/metadata/download")
        .family(FAMILY)
        .summary("Download the service provider metadata file")
        .download();

pub const DEPENDENCIES: Operation = Operation::get("get_sso_dependencies", "/api/v3/sso/dependencies")
    .family(FAMILY)
    .summary("Enrollment customizations relying on SSO");

pub const HISTORY: Operation = Operation::get("get_sso_history", "/api/v3/sso/history")
    .family(FAMILY)
    .summary("SSO settings history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation = Operation::post("add_sso_history_note", "/api/v3/sso/history")
    .family(FAMILY)
    .summary("Add a note to the SSO history")
    .json_body();

pub const GET_CERTIFICATE: Operation = Operation::get("get_sso_certificate", "/api/v2/sso/cert")
    .family(FAMILY)
    .summary("SAML signing certificate details");

pub const DOWNLOAD_CERTIFICATE: Operation =
    Operation::get("download_sso_certificate", "/api/v2/sso/cert/download")
        .family(FAMILY)
        .summary("Download the SAML signing certificate")
        .download();

pub const REGENERATE_CERTIFICATE: Operation =
    Operation::post("regenerate_sso_certificate", "/api/v2/sso/cert")
        .family(FAMILY)
        .summary("Generate a new SAML signing certificate");

pub const DELETE_CERTIFICATE: Operation = Operation::delete("delete_sso_certificate", "/api/v2/sso/cert")
    .family(FAMILY)
    .summary("Remove the SAML signing certificate")
    .success("SSO certificate successfully deleted.");

pub(crate) const OPERATIONS: &[&Operation] = &[
    &GET_SETTINGS,
    &UPDATE_SETTINGS,
    &DISABLE,
    &VALIDATE_METADATA,
    &DOWNLOAD_METADATA,
    &DEPENDENCIES,
    &HISTORY,
    &ADD_HISTORY_NOTE,
    &GET_CERTIFICATE,
    &DOWNLOAD_CERTIFICATE,
    &REGENERATE_CERTIFICATE,
    &DELETE_CERTIFICATE,
];

impl JamfClient {
    pub async fn get_sso_settings(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&GET_SETTINGS)).await
    }

    pub async fn update_sso_settings(&self, settings: Value) -> Result<Value, Error> {
        self.send_json(&UPDATE_SETTINGS, settings).await
    }

    pub async fn disable_sso(&self) -> Result<String, Error> {
        self.message_call(Call::new(&DISABLE)).await
    }

    pub async fn validate_sso_metadata(&self, source: Value) -> Result<Value, Error> {
        self.send_json(&VALIDATE_METADATA, source).await
    }

    pub async fn download_sso_metadata(&self, dir: Option<&Path>) -> Result<PathBuf, Error> {
        self.download_call(Call::new(&DOWNLOAD_METADATA), dir).await
    }

    pub async fn get_sso_dependencies(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&DEPENDENCIES)).await
    }

    pub async fn get_sso_history(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&HISTORY, query).await
    }

    pub async fn add_sso_history_note(&self, note: &str) -> Result<Value, Error> {
        self.send_json(&ADD_HISTORY_NOTE, serde_json::json!({ "note": note }))
            .await
    }

    pub async fn get_sso_certificate(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&GET_CERTIFICATE)).await
    }

    pub async fn download_sso_certificate(&self, dir: Option<&Path>) -> Result<PathBuf, Error> {
        self.download_call(Call::new(&DOWNLOAD_CERTIFICATE), dir).await
    }

    pub async fn regenerate_sso_certificate(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&REGENERATE_CERTIFICATE)).await
    }

    pub async fn delete_sso_certificate(&self) -> Result<String, Error> {
        self.message_call(Call::new(&DELETE_CERTIFICATE)).await
    }
}
