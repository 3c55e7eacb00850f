//! Inventory preload: CSV template, validation, ingestion and records.

use std::path::Path;

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED};
use crate::body::FileUpload;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "inventory-preload";

pub const CSV_TEMPLATE: Operation =
    Operation::get("download_inventory_preload_template", "/api/v2/inventory-preload/csv-template")
        .family(FAMILY)
        .summary("Blank inventory preload CSV template")
        .csv();

pub const VALIDATE_CSV: Operation =
    Operation::post("validate_inventory_preload_csv", "/api/v2/inventory-preload/csv-validate")
        .family(FAMILY)
        .summary("Validate an inventory preload CSV without importing it")
        .multipart();

pub const INGEST_CSV: Operation = Operation::post("ingest_inventory_preload_csv", "/api/v2/inventory-preload/csv")
    .family(FAMILY)
    .summary("Import an inventory preload CSV")
    .multipart();

pub const LIST_RECORDS: Operation =
    Operation::get("list_inventory_preload_records", "/api/v2/inventory-preload/records")
        .family(FAMILY)
        .summary("List inventory preload records")
        .query(PAGED);

pub const GET_RECORD: Operation =
    Operation::get("get_inventory_preload_record", "/api/v2/inventory-preload/records/{id}")
        .family(FAMILY)
        .summary("Get an inventory preload record");

pub const DELETE_RECORD: Operation =
    Operation::delete("delete_inventory_preload_record", "/api/v2/inventory-preload/records/{id}")
        .family(FAMILY)
        .summary("Delete an inventory preload record")
        .success("Inventory preload record {id} successfully deleted.");

pub const DELETE_ALL: Operation = Operation::post(
    "delete_all_inventory_preload_records",
    "/api/v2/inventory-preload/records/delete-all",
)
.family(FAMILY)
.summary("Delete every inventory preload record")
.success("All inventory preload records successfully deleted.");

pub const EXPORT_CSV: Operation = Operation::post("export_inventory_preload", "/api/v2/inventory-preload/export")
    .family(FAMILY)
    .summary("Export inventory preload records as CSV")
    .query(EXPORT)
    .csv();

pub(crate) const OPERATIONS: &[&Operation] = &[
    &CSV_TEMPLATE,
    &VALIDATE_CSV,
    &INGEST_CSV,
    &LIST_RECORDS,
    &GET_RECORD,
    &DELETE_RECORD,
    &DELETE_ALL,
    &EXPORT_CSV,
];

impl JamfClient {
    pub async fn download_inventory_preload_template(&self) -> Result<String, Error> {
        self.text_call(Call::new(&CSV_TEMPLATE)).await
    }

    /// `{"recordCount": n}` on success; row errors come back as a 400.
    pub async fn validate_inventory_preload_csv(&self, file: &Path) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&VALIDATE_CSV).upload(upload)).await
    }

    pub async fn ingest_inventory_preload_csv(&self, file: &Path) -> Result<Value, Error> {
        let upload = FileUpload::from_path(file).await?;
        self.json_call(Call::new(&INGEST_CSV).upload(upload)).await
    }

    pub async fn list_inventory_preload_records(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST_RECORDS, query).await
    }

    pub async fn get_inventory_preload_record(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_RECORD, id).await
    }

    pub async fn delete_inventory_preload_record(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_RECORD, id).await
    }

    pub async fn delete_all_inventory_preload_records(&self) -> Result<String, Error> {
        self.message_call(Call::new(&DELETE_ALL)).await
    }

    pub async fn export_inventory_preload(&self, query: &ExportQuery) -> Result<String, Error> {
        self.export_with(&EXPORT_CSV, query).await
    }
}
