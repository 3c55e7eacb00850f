//! Sites and the objects assigned to them.

use serde_json::Value;

use super::{FILTER, ListQuery, PAGE, PAGE_SIZE, SORT};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, ParamType};

const FAMILY: &str = "sites";

const SITE_OBJECTS_QUERY: &[ParamSpec] = &[
    PAGE,
    PAGE_SIZE,
    SORT,
    FILTER,
    ParamSpec::optional("objectType", ParamType::String),
];

pub const LIST: Operation = Operation::get("list_sites", "/api/v1/sites")
    .family(FAMILY)
    .summary("List sites");

pub const OBJECTS: Operation = Operation::get("get_site_objects", "/api/v1/sites/{id}/objects")
    .family(FAMILY)
    .summary("Objects assigned to a site")
    .query(SITE_OBJECTS_QUERY);

pub(crate) const OPERATIONS: &[&Operation] = &[&LIST, &OBJECTS];

impl JamfClient {
    pub async fn list_sites(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST)).await
    }

    /// Objects of a site, optionally narrowed to one `object_type`
    /// (e.g. `"Computer"`).
    pub async fn get_site_objects(
        &self,
        id: impl Into<Identifier>,
        object_type: Option<&str>,
        query: &ListQuery,
    ) -> Result<Value, Error> {
        let params = query.to_params().with("objectType", object_type);
        self.json_call(Call::new(&OBJECTS).arg("id", id.into()).query(params))
            .await
    }
}
