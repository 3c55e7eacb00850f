//! Mobile devices: `/api/v2/mobile-devices`.

use serde_json::Value;

use super::{FILTER, ListQuery, PAGE, PAGE_SIZE, PAGED_SORTED, SORT};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, ParamType, Params};

const FAMILY: &str = "mobile-devices";

const DETAIL_QUERY: &[ParamSpec] = &[
    ParamSpec::optional("section", ParamType::StringList),
    PAGE,
    PAGE_SIZE,
    SORT,
    FILTER,
];

pub const LIST: Operation = Operation::get("list_mobile_devices", "/api/v2/mobile-devices")
    .family(FAMILY)
    .summary("List mobile devices")
    .query(PAGED_SORTED);

pub const LIST_DETAIL: Operation =
    Operation::get("list_mobile_devices_detail", "/api/v2/mobile-devices/detail")
        .family(FAMILY)
        .summary("Paged mobile device details, optionally limited to sections")
        .query(DETAIL_QUERY);

pub const GET: Operation = Operation::get("get_mobile_device", "/api/v2/mobile-devices/{id}")
    .family(FAMILY)
    .summary("Get a mobile device");

pub const DETAIL: Operation = Operation::get("get_mobile_device_detail", "/api/v2/mobile-devices/{id}/detail")
    .family(FAMILY)
    .summary("Full record of a mobile device");

pub(crate) const OPERATIONS: &[&Operation] = &[&LIST, &LIST_DETAIL, &GET, &DETAIL];

impl JamfClient {
    pub async fn list_mobile_devices(&self, query: &ListQuery) -> Result<Value, Error> {
        self.json_call(Call::new(&LIST).query(query.to_sorted_params()))
            .await
    }

    pub async fn list_mobile_devices_detail(
        &self,
        sections: &[&str],
        query: &ListQuery,
    ) -> Result<Value, Error> {
        let params = Params::new()
            .with("section", sections.to_vec())
            .with_all(query.to_params());
        self.json_call(Call::new(&LIST_DETAIL).query(params)).await
    }

    pub async fn get_mobile_device(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET, id).await
    }

    pub async fn get_mobile_device_detail(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&DETAIL, id).await
    }
}
