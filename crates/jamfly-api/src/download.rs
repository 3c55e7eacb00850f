// Streaming downloads
//
// The target name comes from Content-Disposition (`filename*` beats
// `filename`), else the last URL path segment. Whatever the source, only
// the final path component survives, so a hostile header cannot escape
// the download directory.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use percent_encoding::percent_decode_str;
use reqwest::Response;
use reqwest::header::CONTENT_DISPOSITION;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::cancellable;

/// Name used when neither the header nor the URL yields one.
const FALLBACK_NAME: &str = "download";

/// Stream `resp` into `dir`, returning the written path.
///
/// A partially written file is removed if the stream fails or is cancelled.
pub(crate) async fn save(
    resp: Response,
    url: &Url,
    dir: &Path,
    cancel: Option<&CancellationToken>,
) -> Result<PathBuf, Error> {
    let header_name = resp
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(filename_from_disposition);
    let name = resolve_name(header_name.as_deref(), url);

    tokio::fs::create_dir_all(dir).await.map_err(|source| Error::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(name);

    match cancellable(cancel, write_body(resp, &path)).await {
        Ok(written) => {
            debug!(path = %path.display(), bytes = written, "download saved");
            Ok(path)
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&path).await;
            Err(e)
        }
    }
}

async fn write_body(resp: Response, path: &Path) -> Result<usize, Error> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    let mut stream = resp.bytes_stream();
    let mut written = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len();
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

/// Pick the on-disk name for a download.
pub(crate) fn resolve_name(header_name: Option<&str>, url: &Url) -> String {
    header_name
        .and_then(safe_file_name)
        .or_else(|| {
            url.path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .and_then(|s| safe_file_name(&s))
        })
        .unwrap_or_else(|| FALLBACK_NAME.to_owned())
}

/// Extract the file name from a Content-Disposition value.
///
/// `filename*=charset'lang'percent-encoded` (RFC 6266 / 5987) wins over a
/// plain or quoted `filename=`.
pub(crate) fn filename_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let raw = raw.trim().trim_matches('"');
                // charset'language'value; charset and language are optional.
                let encoded = raw.splitn(3, '\'').nth(2).unwrap_or(raw);
                extended = Some(percent_decode_str(encoded).decode_utf8_lossy().into_owned());
            }
            "filename" => {
                plain = Some(raw.trim().trim_matches('"').to_owned());
            }
            _ => {}
        }
    }

    extended.or(plain).filter(|name| !name.is_empty())
}

/// Final path component of `name`, or `None` if nothing usable remains.
fn safe_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match last {
        "" | "." | ".." => None,
        other => Some(other.to_owned()),
    }
}
