//! User-initiated enrollment settings, history, access groups and languages.

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED, PAGED_SORTED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "enrollment";

pub const GET_SETTINGS: Operation = Operation::get("get_enrollment_settings", "/api/v2/enrollment")
    .family(FAMILY)
    .summary("User-initiated enrollment settings");

pub const UPDATE_SETTINGS: Operation = Operation::put("update_enrollment_settings", "/api/v2/enrollment")
    .family(FAMILY)
    .summary("Replace user-initiated enrollment settings")
    .json_body();

pub const HISTORY: Operation = Operation::get("get_enrollment_history", "/api/v2/enrollment/history")
    .family(FAMILY)
    .summary("Enrollment settings history")
    .query(PAGED);

pub const ADD_HISTORY_NOTE: Operation =
    Operation::post("add_enrollment_history_note", "/api/v2/enrollment/history")
        .family(FAMILY)
        .summary("Add a note to the enrollment history")
        .json_body();

pub const EXPORT_HISTORY: Operation =
    Operation::post("export_enrollment_history", "/api/v2/enrollment/history/export")
        .family(FAMILY)
        .summary("Export enrollment history as CSV")
        .query(EXPORT)
        .csv();

pub const LIST_ACCESS_GROUPS: Operation =
    Operation::get("list_enrollment_access_groups", "/api/v3/enrollment/access-groups")
        .family(FAMILY)
        .summary("LDAP groups allowed to enroll")
        .query(PAGED_SORTED);

pub const GET_ACCESS_GROUP: Operation =
    Operation::get("get_enrollment_access_group", "/api/v3/enrollment/access-groups/{id}")
        .family(FAMILY)
        .summary("Get an enrollment access group");

pub const DELETE_ACCESS_GROUP: Operation =
    Operation::delete("delete_enrollment_access_group", "/api/v3/enrollment/access-groups/{id}")
        .family(FAMILY)
        .summary("Remove an enrollment access group")
        .success("Enrollment access group {id} successfully deleted.");

pub const LIST_LANGUAGES: Operation =
    Operation::get("list_enrollment_languages", "/api/v3/enrollment/languages")
        .family(FAMILY)
        .summary("Configured enrollment languages")
        .query(PAGED_SORTED);

pub const DELETE_LANGUAGE: Operation =
    Operation::delete("delete_enrollment_language", "/api/v3/enrollment/languages/{id}")
        .family(FAMILY)
        .summary("Remove an enrollment language")
        .success("Enrollment language {id} successfully deleted.");

pub(crate) const OPERATIONS: &[&Operation] = &[
    &GET_SETTINGS,
    &UPDATE_SETTINGS,
    &HISTORY,
    &ADD_HISTORY_NOTE,
    &EXPORT_HISTORY,
    &LIST_ACCESS_GROUPS,
    &GET_ACCESS_GROUP,
    &DELETE_ACCESS_GROUP,
    &LIST_LANGUAGES,
    &DELETE_LANGUAGE,
];

impl JamfClient {
    pub async fn get_enrollment_settings(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&GET_SETTINGS)).await
    }

    pub async fn update_enrollment_settings(&self, settings: Value) -> Result<Value, Error> {
        self.send_json(&UPDATE_SETTINGS, settings).await
    }

    pub async fn get_enrollment_history(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&HISTORY, query).await
    }

    pub async fn add_enrollment_history_note(&self, note: &str) -> Result<Value, Error> {
        self.send_json(&ADD_HISTORY_NOTE, serde_json::json!({ "note": note }))
            .await
    }

    pub async fn export_enrollment_history(&self, query: &ExportQuery) -> Result<String, Error> {
        self.export_with(&EXPORT_HISTORY, query).await
    }

    pub async fn list_enrollment_access_groups(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST_ACCESS_GROUPS).query(query.to_sorted_params()))
            .await
    }

    pub async fn get_enrollment_access_group(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_ACCESS_GROUP, id).await
    }

    pub async fn delete_enrollment_access_group(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_ACCESS_GROUP, id).await
    }

    pub async fn list_enrollment_languages(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST_LANGUAGES).query(query.to_sorted_params()))
            .await
    }

    /// `id` is the language code, e.g. `"en"`.
    pub async fn delete_enrollment_language(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_LANGUAGE, id).await
    }
}
