//! Built-in certificate authority.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::client::{Call, JamfClient};
use crate::descriptor::Operation;
use crate::error::Error;

const FAMILY: &str = "pki";

pub const ACTIVE_CA: Operation =
    Operation::get("get_active_certificate_authority", "/api/v1/pki/certificate-authority/active")
        .family(FAMILY)
        .summary("Details of the active certificate authority");

pub const ACTIVE_CA_DER: Operation = Operation::get(
    "download_active_certificate_authority_der",
    "/api/v1/pki/certificate-authority/active/der",
)
.family(FAMILY)
.summary("Download the active CA certificate (DER)")
.accept("application/pkix-cert")
.download();

pub const ACTIVE_CA_PEM: Operation = Operation::get(
    "download_active_certificate_authority_pem",
    "/api/v1/pki/certificate-authority/active/pem",
)
.family(FAMILY)
.summary("Download the active CA certificate chain (PEM)")
.accept("application/pem-certificate-chain")
.download();

pub(crate) const OPERATIONS: &[&Operation] = &[&ACTIVE_CA, &ACTIVE_CA_DER, &ACTIVE_CA_PEM];

impl JamfClient {
    pub async fn get_active_certificate_authority(&self) -> Result<Value, Error> {
        self.json_call(Call::new(&ACTIVE_CA)).await
    }

    pub async fn download_active_certificate_authority_der(&self, dir: Option<&Path>) -> Result<PathBuf, Error> {
        self.download_call(Call::new(&ACTIVE_CA_DER), dir).await
    }

    pub async fn download_active_certificate_authority_pem(&self, dir: Option<&Path>) -> Result<PathBuf, Error> {
        self.download_call(Call::new(&ACTIVE_CA_PEM), dir).await
    }
}
