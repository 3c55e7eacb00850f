//! Remote administration configurations (preview endpoints).
//!
//! Compiled in only with the `preview` feature; the server marks these
//! paths as subject to change.

use serde_json::Value;

use super::ListQuery;
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, Params};

const FAMILY: &str = "remote-administration";

const PAGING: &[ParamSpec] = &[super::PAGE, super::PAGE_SIZE];

pub const LIST: Operation = Operation::get(
    "list_remote_administration_configurations",
    "/api/preview/remote-administration-configurations",
)
.family(FAMILY)
.summary("List remote administration configurations")
.query(PAGING)
.preview();

pub const GET_TEAM_VIEWER: Operation = Operation::get(
    "get_team_viewer_configuration",
    "/api/preview/remote-administration-configurations/team-viewer/{id}",
)
.family(FAMILY)
.summary("Get a TeamViewer remote administration configuration")
.preview();

pub const DELETE_TEAM_VIEWER: Operation = Operation::delete(
    "delete_team_viewer_configuration",
    "/api/preview/remote-administration-configurations/team-viewer/{id}",
)
.family(FAMILY)
.summary("Delete a TeamViewer remote administration configuration")
.success("TeamViewer configuration {id} successfully deleted.")
.preview();

pub(crate) const OPERATIONS: &[&Operation] = &[&LIST, &GET_TEAM_VIEWER, &DELETE_TEAM_VIEWER];

impl JamfClient {
    /// Only `page` and `page_size` of `query` are sent.
    pub async fn list_remote_administration_configurations(&self, query: &ListQuery) -> Result<Value, Error> {
        let params = Params::new()
            .with("page", query.page)
            .with("page-size", query.page_size);
        self.json_call(Call::new(&LIST).query(params)).await
    }

    pub async fn get_team_viewer_configuration(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_TEAM_VIEWER, id).await
    }

    pub async fn delete_team_viewer_configuration(&self, id: impl Into<Identifier>) -> Result<String, Error> {
        self.delete_by_id(&DELETE_TEAM_VIEWER, id).await
    }
}
