//! Patch management software title configurations and their reports.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{EXPORT, ExportQuery, ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::Identifier;

const FAMILY: &str = "patch";

const SPREADSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const LIST: Operation = Operation::get(
    "list_patch_software_title_configurations",
    "/api/v2/patch-software-title-configurations",
)
.family(FAMILY)
.summary("List patch software title configurations");

pub const GET: Operation = Operation::get(
    "get_patch_software_title_configuration",
    "/api/v2/patch-software-title-configurations/{id}",
)
.family(FAMILY)
.summary("Get a patch software title configuration");

pub const REPORT: Operation = Operation::get(
    "get_patch_report",
    "/api/v2/patch-software-title-configurations/{id}/patch-report",
)
.family(FAMILY)
.summary("Patch report rows for a software title")
.query(PAGED);

pub const EXPORT_REPORT_CSV: Operation = Operation::get(
    "export_patch_report",
    "/api/v2/patch-software-title-configurations/{id}/export-report",
)
.family(FAMILY)
.summary("Patch report as CSV")
.query(EXPORT)
.csv();

pub const DOWNLOAD_REPORT: Operation = Operation::get(
    "download_patch_report",
    "/api/v2/patch-software-title-configurations/{id}/export-report",
)
.family(FAMILY)
.summary("Download the patch report spreadsheet")
.query(EXPORT)
.accept(SPREADSHEET)
.download();

pub(crate) const OPERATIONS: &[&Operation] = &[&LIST, &GET, &REPORT, &EXPORT_REPORT_CSV, &DOWNLOAD_REPORT];

impl JamfClient {
    pub async fn list_patch_software_title_configurations(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST)).await
    }

    pub async fn get_patch_software_title_configuration(
        &self,
        id: impl Into<Identifier>,
    ) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn get_patch_report(&self, id: impl Into<Identifier>, query: &ListQuery) -> Result<Value, Error> {
        self.history_of(&REPORT, id, query).await
    }

    pub async fn export_patch_report(
        &self,
        id: impl Into<Identifier>,
        query: &ExportQuery,
    ) -> Result<String, Error> {
        self.text_call(
            Call::new(&EXPORT_REPORT_CSV)
                .arg("id", id.into())
                .query(query.to_params()),
        )
        .await
    }

    /// Same report as [`export_patch_report`](Self::export_patch_report),
    /// requested as an `.xlsx` file.
    pub async fn download_patch_report(
        &self,
        id: impl Into<Identifier>,
        query: &ExportQuery,
        dir: Option<&Path>,
    ) -> Result<PathBuf, Error> {
        let call = Call::new(&DOWNLOAD_REPORT)
            .arg("id", id.into())
            .query(query.to_params());
        self.download_call(call, dir).await
    }
}
