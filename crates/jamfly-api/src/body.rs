// Request bodies
//
// Upload contents are read into memory once, before the first attempt, so
// the post-refresh retry re-sends byte-identical content.

use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::descriptor::{BodyKind, Operation};
use crate::error::Error;

/// Field name of the single part in every multipart upload.
pub const UPLOAD_FIELD: &str = "file";

/// A file to send as the `file` part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    file_name: String,
    mime: String,
    bytes: Bytes,
}

impl FileUpload {
    /// Read `path` fully. The part's file name is the path's last component
    /// and its MIME type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                Error::argument(format!("upload path has no file name: {}", path.display()))
            })?;
        Ok(Self::from_bytes(file_name, bytes))
    }

    /// Upload in-memory content under `file_name`.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self {
            file_name,
            mime,
            bytes: bytes.into(),
        }
    }

    /// Override the guessed MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Build a fresh multipart form; called once per attempt.
    pub(crate) fn to_form(&self) -> Result<Form, Error> {
        let part = Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)
            .map_err(|_| Error::argument(format!("invalid MIME type '{}'", self.mime)))?;
        Ok(Form::new().part(UPLOAD_FIELD, part))
    }
}

/// Body attached to a call.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    None,
    Json(Value),
    Multipart(FileUpload),
    Form(Vec<(String, String)>),
}

impl RequestBody {
    pub fn kind(&self) -> BodyKind {
        match self {
            Self::None => BodyKind::None,
            Self::Json(_) => BodyKind::Json,
            Self::Multipart(_) => BodyKind::Multipart,
            Self::Form(_) => BodyKind::Form,
        }
    }

    /// Whether the body brings its own `Content-Type` header.
    pub(crate) fn sets_content_type(&self) -> bool {
        matches!(self, Self::Multipart(_) | Self::Form(_))
    }
}

/// The body shape must match what the operation declares.
pub(crate) fn check_body(op: &Operation, body: &RequestBody) -> Result<(), Error> {
    if op.body == body.kind() {
        return Ok(());
    }
    Err(match (op.body, body) {
        (BodyKind::None, _) => Error::argument(format!("{} does not take a request body", op.name)),
        (expected, RequestBody::None) => Error::argument(format!(
            "{} requires a {} request body",
            op.name,
            kind_name(expected)
        )),
        (expected, got) => Error::argument(format!(
            "{} expects a {} request body, got {}",
            op.name,
            kind_name(expected),
            kind_name(got.kind())
        )),
    })
}

fn kind_name(kind: BodyKind) -> &'static str {
    match kind {
        BodyKind::None => "empty",
        BodyKind::Json => "JSON",
        BodyKind::Multipart => "multipart",
        BodyKind::Form => "form",
    }
}
