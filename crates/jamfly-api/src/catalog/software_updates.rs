//! Managed software updates: available versions, plans and statuses.

use serde_json::Value;

use super::{ListQuery, PAGED};
use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;
use crate::params::{Identifier, ParamSpec, ParamType, Params};

const FAMILY: &str = "software-updates";

const STATUS_QUERY: &[ParamSpec] = &[ParamSpec::optional("filter", ParamType::String)];

pub const AVAILABLE: Operation = Operation::get(
    "list_available_software_updates",
    "/api/v1/managed-software-updates/available-updates",
)
.family(FAMILY)
.summary("OS versions available for managed updates");

pub const LIST_PLANS: Operation =
    Operation::get("list_software_update_plans", "/api/v1/managed-software-updates/plans")
        .family(FAMILY)
        .summary("List managed software update plans")
        .query(PAGED);

pub const GET_PLAN: Operation =
    Operation::get("get_software_update_plan", "/api/v1/managed-software-updates/plans/{id}")
        .family(FAMILY)
        .summary("Get a managed software update plan");

pub const CREATE_PLAN: Operation =
    Operation::post("create_software_update_plan", "/api/v1/managed-software-updates/plans")
        .family(FAMILY)
        .summary("Create managed software update plans for devices")
        .json_body();

pub const CREATE_GROUP_PLAN: Operation = Operation::post(
    "create_group_software_update_plan",
    "/api/v1/managed-software-updates/plans/group",
)
.family(FAMILY)
.summary("Create managed software update plans for a group")
.json_body();

pub const PLAN_EVENTS: Operation = Operation::get(
    "get_software_update_plan_events",
    "/api/v1/managed-software-updates/plans/{id}/events",
)
.family(FAMILY)
.summary("Event log of a managed software update plan");

pub const STATUSES: Operation = Operation::get(
    "list_software_update_statuses",
    "/api/v1/managed-software-updates/update-statuses",
)
.family(FAMILY)
.summary("Managed software update statuses")
.query(STATUS_QUERY);

pub(crate) const OPERATIONS: &[&Operation] = &[
    &AVAILABLE,
    &LIST_PLANS,
    &GET_PLAN,
    &CREATE_PLAN,
    &CREATE_GROUP_PLAN,
    &PLAN_EVENTS,
    &STATUSES,
];

impl JamfClient {
    pub async fn list_available_software_updates(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&AVAILABLE)).await
    }

    pub async fn list_software_update_plans(&self, query: &ListQuery) -> Result<Value, Error> {
        self.list_with(&LIST_PLANS, query).await
    }

    pub async fn get_software_update_plan(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&GET_PLAN, id).await
    }

    pub async fn create_software_update_plan(&self, plan: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_PLAN, plan).await
    }

    pub async fn create_group_software_update_plan(&self, plan: Value) -> Result<Value, Error> {
        self.send_json(&CREATE_GROUP_PLAN, plan).await
    }

    pub async fn get_software_update_plan_events(&self, id: impl Into<Identifier>) -> Result<Value, Error> {
        self.get_by_id(&PLAN_EVENTS, id).await
    }

    pub async fn list_software_update_statuses(&self, filter: Option<&str>) -> Result<Value, Error> {
        self.json_call(Call::new(&STATUSES).query(Params::new().with("filter", filter)))
            .await
    }
}
