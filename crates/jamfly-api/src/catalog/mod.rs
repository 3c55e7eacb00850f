// Operation catalog
//
// Static descriptors grouped by resource family. Each family module owns
// its descriptors plus thin typed wrappers on `JamfClient`; everything
// funnels into `JamfClient::dispatch`.

use std::path::Path;

use serde_json::{Value, json};

use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{IdArgs, IdTarget, Identifier, ParamSpec, ParamType, Params};

pub mod api_access;
pub mod buildings;
pub mod categories;
pub mod cloud_idp;
pub mod computer_groups;
pub mod computer_inventory;
pub mod computer_prestages;
pub mod departments;
pub mod enrollment;
pub mod inventory_preload;
pub mod mobile_device_prestages;
pub mod mobile_devices;
pub mod packages;
pub mod patch;
pub mod pki;
#[cfg(feature = "preview")]
pub mod remote_administration;
pub mod scripts;
pub mod self_service;
pub mod server;
pub mod sites;
pub mod software_updates;
pub mod sso;

// ── Query schemas ────────────────────────────────────────────────────

pub(crate) const PAGE: ParamSpec = ParamSpec::optional("page", ParamType::Integer);
pub(crate) const PAGE_SIZE: ParamSpec = ParamSpec::optional("page-size", ParamType::Integer);
pub(crate) const SORT: ParamSpec = ParamSpec::optional("sort", ParamType::StringList);
pub(crate) const FILTER: ParamSpec = ParamSpec::optional("filter", ParamType::String);

/// `page`, `page-size`, `sort`, `filter`.
pub(crate) const PAGED: &[ParamSpec] = &[PAGE, PAGE_SIZE, SORT, FILTER];

/// Paged endpoints that take no RSQL filter.
pub(crate) const PAGED_SORTED: &[ParamSpec] = &[PAGE, PAGE_SIZE, SORT];

/// CSV export endpoints.
pub(crate) const EXPORT: &[ParamSpec] = &[
    ParamSpec::optional("export-fields", ParamType::StringList),
    ParamSpec::optional("export-labels", ParamType::StringList),
    PAGE,
    PAGE_SIZE,
    SORT,
    FILTER,
];

const FAMILIES: &[&[&Operation]] = &[
    server::OPERATIONS,
    buildings::OPERATIONS,
    departments::OPERATIONS,
    categories::OPERATIONS,
    sites::OPERATIONS,
    scripts::OPERATIONS,
    computer_inventory::OPERATIONS,
    mobile_devices::OPERATIONS,
    computer_groups::OPERATIONS,
    computer_prestages::OPERATIONS,
    mobile_device_prestages::OPERATIONS,
    packages::OPERATIONS,
    api_access::OPERATIONS,
    sso::OPERATIONS,
    self_service::OPERATIONS,
    software_updates::OPERATIONS,
    cloud_idp::OPERATIONS,
    enrollment::OPERATIONS,
    pki::OPERATIONS,
    inventory_preload::OPERATIONS,
    patch::OPERATIONS,
];

/// Every compiled-in descriptor, family by family.
pub fn all() -> impl Iterator<Item = &'static Operation> {
    let families = FAMILIES.iter().copied();
    #[cfg(feature = "preview")]
    let families = families.chain(std::iter::once(remote_administration::OPERATIONS));
    families.flat_map(|ops| ops.iter().copied())
}

/// Look a descriptor up by its unique name.
pub fn find(name: &str) -> Option<&'static Operation> {
    all().find(|op| op.name == name)
}

/// Distinct family names in catalog order.
pub fn families() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for op in all() {
        if !names.contains(&op.family) {
            names.push(op.family);
        }
    }
    names
}

// ── Query builders ───────────────────────────────────────────────────

/// Paging, sorting and filtering for list operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// `field:asc` / `field:desc` criteria, applied in order.
    pub sort: Vec<String>,
    /// RSQL expression.
    pub filter: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn sort(mut self, criterion: impl Into<String>) -> Self {
        self.sort.push(criterion.into());
        self
    }

    pub fn filter(mut self, rsql: impl Into<String>) -> Self {
        self.filter = Some(rsql.into());
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("page", self.page)
            .with("page-size", self.page_size)
            .with("sort", self.sort.clone())
            .with("filter", self.filter.clone())
    }

    /// Paging and sorting only, for endpoints without RSQL support.
    pub(crate) fn to_sorted_params(&self) -> Params {
        Params::new()
            .with("page", self.page)
            .with("page-size", self.page_size)
            .with("sort", self.sort.clone())
    }
}

/// Column selection for CSV exports, on top of the usual list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportQuery {
    pub list: ListQuery,
    pub fields: Vec<String>,
    /// Header labels, positionally matched to `fields`.
    pub labels: Vec<String>,
}

impl ExportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: impl Into<String>, label: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self.labels.push(label.into());
        self
    }

    pub fn list(mut self, list: ListQuery) -> Self {
        self.list = list;
        self
    }

    pub fn to_params(&self) -> Params {
        Params::new()
            .with("export-fields", self.fields.clone())
            .with("export-labels", self.labels.clone())
            .with("page", self.list.page)
            .with("page-size", self.list.page_size)
            .with("sort", self.list.sort.clone())
            .with("filter", self.list.filter.clone())
    }
}

// ── Facade helpers ───────────────────────────────────────────────────

impl JamfClient {
    pub(crate) async fn json_call(&self, call: Call<'_>) -> Result<Value, Error> {
        self.dispatch(call).await?.into_json()
    }

    pub(crate) async fn text_call(&self, call: Call<'_>) -> Result<String, Error> {
        self.dispatch(call).await?.into_text()
    }

    pub(crate) async fn message_call(&self, call: Call<'_>) -> Result<String, Error> {
        self.dispatch(call).await?.into_message()
    }

    pub(crate) async fn download_call(
        &self,
        call: Call<'_>,
        dir: Option<&Path>,
    ) -> Result<std::path::PathBuf, Error> {
        let call = match dir {
            Some(dir) => call.save_to(dir),
            None => call,
        };
        self.dispatch(call).await?.into_path()
    }

    pub(crate) async fn list_with(&self, op: &Operation, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(op).query(query.to_params())).await
    }

    pub(crate) async fn get_by_id(
        &self,
        op: &Operation,
        id: impl Into<Identifier>,
    ) -> Result<Value, Error> {
        self.json_call(Call::new(op).arg("id", id.into())).await
    }

    pub(crate) async fn send_json(&self, op: &Operation, body: Value) -> Result<Value, Error> {
        self.json_call(Call::new(op).json(body)).await
    }

    pub(crate) async fn update_by_id(
        &self,
        op: &Operation,
        id: impl Into<Identifier>,
        body: Value,
    ) -> Result<Value, Error> {
        self.json_call(Call::new(op).arg("id", id.into()).json(body))
            .await
    }

    /// Single-resource delete returning the success string.
    pub(crate) async fn delete_by_id(
        &self,
        op: &Operation,
        id: impl Into<Identifier>,
    ) -> Result<String, Error> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::argument("id must not be empty"));
        }
        self.message_call(Call::new(op).arg("id", id)).await
    }

    /// Bulk-delete convention: one id goes to `DELETE …/{id}`, several to
    /// `POST …/delete-multiple` with `{"ids": [...]}`.
    pub(crate) async fn delete_by_target(
        &self,
        single: &Operation,
        multiple: &Operation,
        target: &IdArgs,
    ) -> Result<String, Error> {
        let call = match target.resolve()? {
            IdTarget::Single(id) => Call::new(single).arg("id", id),
            IdTarget::Many(ids) => {
                let joined = ids.join(", ");
                Call::new(multiple)
                    .json(json!({ "ids": ids }))
                    .message_arg("ids", joined)
            }
        };
        self.message_call(call).await
    }

    pub(crate) async fn history_of(
        &self,
        op: &Operation,
        id: impl Into<Identifier>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        self.json_call(Call::new(op).arg("id", id.into()).query(query.to_params()))
            .await
    }

    pub(crate) async fn add_note(
        &self,
        op: &Operation,
        id: impl Into<Identifier>,
        note: &str,
    ) -> Result<Value, Error> {
        self.json_call(
            Call::new(op)
                .arg("id", id.into())
                .json(json!({ "note": note })),
        )
        .await
    }

    pub(crate) async fn export_with(&self, op: &Operation, query: &ExportQuery) -> Result<String, Error> {
        self.text_call(Call::new(op).query(query.to_params())).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::descriptor::{BodyKind, Decoder, Stability};

    #[test]
    fn operation_names_are_unique() {
        let mut seen = HashSet::new();
        for op in all() {
            assert!(seen.insert(op.name), "duplicate operation name {}", op.name);
        }
        assert!(seen.len() > 100, "catalog unexpectedly small: {}", seen.len());
    }

    #[test]
    fn every_descriptor_is_well_formed() {
        for op in all() {
            assert!(op.path.starts_with("/api/"), "{}: {}", op.name, op.path);
            assert!(!op.family.is_empty(), "{} has no family", op.name);
            assert!(!op.summary.is_empty(), "{} has no summary", op.name);
            assert_eq!(
                op.decoder == Decoder::Success,
                op.success.is_some(),
                "{}: success decoder and template must come together",
                op.name
            );
            if op.body == BodyKind::Multipart {
                assert_ne!(op.verb, crate::descriptor::Verb::Get, "{}", op.name);
            }
        }
    }

    #[test]
    fn preview_descriptors_only_with_feature() {
        let previews = all().filter(|op| op.stability == Stability::Preview).count();
        if cfg!(feature = "preview") {
            assert!(previews > 0);
        } else {
            assert_eq!(previews, 0);
        }
    }

    #[test]
    fn find_resolves_by_name() {
        let op = find("delete_building").unwrap();
        assert_eq!(op.path, "/api/v1/buildings/{id}");
        assert!(find("no_such_operation").is_none());
    }

    #[test]
    fn families_are_listed_once() {
        let families = families();
        assert!(families.contains(&"buildings"));
        let unique: HashSet<_> = families.iter().collect();
        assert_eq!(unique.len(), families.len());
    }

    #[test]
    fn list_query_wire_names() {
        let params = ListQuery::new()
            .page(0)
            .page_size(50)
            .sort("id:asc")
            .to_params()
            .sanitized();
        assert_eq!(
            params.to_pairs(),
            vec![
                ("page".to_owned(), "0".to_owned()),
                ("page-size".to_owned(), "50".to_owned()),
                ("sort".to_owned(), "id:asc".to_owned()),
            ]
        );
    }

    #[test]
    fn export_query_keeps_field_label_order() {
        let params = ExportQuery::new()
            .field("id", "ID")
            .field("name", "Name")
            .to_params()
            .sanitized();
        assert_eq!(
            params.to_pairs(),
            vec![
                ("export-fields".to_owned(), "id".to_owned()),
                ("export-fields".to_owned(), "name".to_owned()),
                ("export-labels".to_owned(), "ID".to_owned()),
                ("export-labels".to_owned(), "Name".to_owned()),
            ]
        );
    }
}
