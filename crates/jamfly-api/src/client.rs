// Request dispatcher
//
// `JamfClient::dispatch` turns one `Call` (descriptor + caller arguments)
// into exactly one HTTP exchange, or two when a cached token is rejected
// and refreshed. Argument problems surface before any request is issued.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::auth::{Credentials, Token, TokenManager, TokenSource, auth_failure};
use crate::body::{FileUpload, RequestBody, check_body};
use crate::catalog;
use crate::descriptor::{BodyKind, Decoder, Operation, Verb};
use crate::download;
use crate::error::{Error, excerpt};
use crate::observe::{Exchange, ExchangeObserver, SharedObserver, record};
use crate::params::{IdArgs, IdTarget, Params, prepare_query};
use crate::transport::{TlsMode, TransportConfig, cancellable};

const APPLICATION_JSON: &str = "application/json";

// ── Output ───────────────────────────────────────────────────────────

/// Decoded result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Json(Value),
    Text(String),
    /// Path of the file written by a download.
    File(PathBuf),
    /// Interpolated success template.
    Message(String),
}

impl Output {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Text(_) => "text",
            Self::File(_) => "file",
            Self::Message(_) => "message",
        }
    }

    pub fn into_json(self) -> Result<Value, Error> {
        match self {
            Self::Json(value) => Ok(value),
            other => Err(other.mismatch("json")),
        }
    }

    pub fn into_text(self) -> Result<String, Error> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn into_path(self) -> Result<PathBuf, Error> {
        match self {
            Self::File(path) => Ok(path),
            other => Err(other.mismatch("file")),
        }
    }

    pub fn into_message(self) -> Result<String, Error> {
        match self {
            Self::Message(message) => Ok(message),
            other => Err(other.mismatch("message")),
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        Error::ResponseDecode {
            message: format!("expected {expected} output, operation produced {}", self.kind()),
            body: String::new(),
        }
    }
}

// ── Call ─────────────────────────────────────────────────────────────

/// One invocation of a descriptor, assembled by the caller.
#[derive(Debug, Clone)]
pub struct Call<'a> {
    op: &'a Operation,
    path_args: Vec<(String, String)>,
    message_args: Vec<(String, String)>,
    query: Params,
    body: RequestBody,
    headers: HeaderMap,
    cancel: Option<CancellationToken>,
    download_dir: Option<PathBuf>,
}

impl<'a> Call<'a> {
    pub fn new(op: &'a Operation) -> Self {
        Self {
            op,
            path_args: Vec::new(),
            message_args: Vec::new(),
            query: Params::new(),
            body: RequestBody::None,
            headers: HeaderMap::new(),
            cancel: None,
            download_dir: None,
        }
    }

    pub fn operation(&self) -> &'a Operation {
        self.op
    }

    /// Fill the `{name}` path slot. Also available to the success template.
    pub fn arg(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.path_args.push((name.into(), value.to_string()));
        self
    }

    /// Value used only by the success template.
    pub fn message_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message_args.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, params: Params) -> Self {
        self.query = params;
        self
    }

    pub fn json(self, body: Value) -> Self {
        self.body(RequestBody::Json(body))
    }

    pub fn upload(self, file: FileUpload) -> Self {
        self.body(RequestBody::Multipart(file))
    }

    pub fn form(self, pairs: Vec<(String, String)>) -> Self {
        self.body(RequestBody::Form(pairs))
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Header override. `Authorization` is ignored; the dispatcher owns it.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Abort the exchange (and any token acquisition it triggers) when
    /// `token` is cancelled.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Directory for `download` outputs; defaults to the client's.
    pub fn save_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }
}

/// Owned, descriptor-free call arguments for [`JamfClient::call`].
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub path: Vec<(String, String)>,
    pub query: Params,
    pub body: RequestBody,
    /// `id` fills the `{id}` slot; `ids` becomes `{"ids": [...]}`.
    pub target: Option<IdArgs>,
    pub headers: HeaderMap,
    pub download_dir: Option<PathBuf>,
    pub cancel: Option<CancellationToken>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.path.push((name.into(), value.to_string()));
        self
    }

    pub fn query(mut self, params: Params) -> Self {
        self.query = params;
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn target(mut self, target: IdArgs) -> Self {
        self.target = Some(target);
        self
    }

    pub fn save_to(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Bind these arguments to `op`, resolving any id/ids target.
    pub fn into_call(self, op: &Operation) -> Result<Call<'_>, Error> {
        let mut call = Call::new(op).query(self.query).headers(self.headers);
        call.path_args = self.path;
        call.body = self.body;
        call.cancel = self.cancel;
        call.download_dir = self.download_dir;

        match self.target.as_ref().map(IdArgs::resolve).transpose()? {
            None => {}
            Some(IdTarget::Single(id)) => {
                if !op.slots().contains(&"id") {
                    return Err(Error::argument(format!("{} does not take an id", op.name)));
                }
                call = call.arg("id", id);
            }
            Some(IdTarget::Many(ids)) => {
                if op.body != BodyKind::Json || call.body != RequestBody::None {
                    return Err(Error::argument(format!(
                        "{} cannot take ids as its request body",
                        op.name
                    )));
                }
                let joined = ids.join(", ");
                call = call.json(json!({ "ids": ids })).message_arg("ids", joined);
            }
        }
        Ok(call)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Jamf Pro API client.
///
/// Cheap to share behind an `Arc`; concurrent calls share only the
/// credentials and the token cache.
pub struct JamfClient {
    tokens: TokenManager,
    http: reqwest::Client,
    http_no_redirect: reqwest::Client,
    observer: SharedObserver,
    download_dir: PathBuf,
}

impl fmt::Debug for JamfClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JamfClient")
            .field("base_url", &self.base_url().as_str())
            .field("download_dir", &self.download_dir)
            .finish_non_exhaustive()
    }
}

/// Builder for [`JamfClient`]; every knob has an internal default.
pub struct JamfClientBuilder {
    base_url: String,
    username: String,
    password: SecretString,
    transport: TransportConfig,
    download_dir: Option<PathBuf>,
    observer: SharedObserver,
}

impl JamfClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.transport.connect_timeout = timeout;
        self
    }

    pub fn tls(mut self, tls: TlsMode) -> Self {
        self.transport.tls = tls;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = user_agent.into();
        self
    }

    /// Default directory for downloads (current directory otherwise).
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    pub fn observer(mut self, observer: impl ExchangeObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn build(self) -> Result<JamfClient, Error> {
        let credentials = Credentials::new(&self.base_url, self.username, self.password)?;
        let http = self.transport.build_client(true)?;
        let http_no_redirect = self.transport.build_client(false)?;

        Ok(JamfClient {
            tokens: TokenManager::new(credentials, http_no_redirect.clone(), self.observer.clone()),
            http,
            http_no_redirect,
            observer: self.observer,
            download_dir: self.download_dir.unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

impl JamfClient {
    /// Client with default timeouts and TLS settings.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> Result<Self, Error> {
        Self::builder(base_url, username, password).build()
    }

    pub fn builder(
        base_url: &str,
        username: impl Into<String>,
        password: SecretString,
    ) -> JamfClientBuilder {
        JamfClientBuilder {
            base_url: base_url.to_owned(),
            username: username.into(),
            password,
            transport: TransportConfig::default(),
            download_dir: None,
            observer: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        self.tokens.credentials().base_url()
    }

    /// The client's token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Dispatch the catalog operation called `name`.
    pub async fn call(&self, name: &str, args: CallArgs) -> Result<Output, Error> {
        let op = catalog::find(name)
            .ok_or_else(|| Error::argument(format!("unknown operation '{name}'")))?;
        self.dispatch(args.into_call(op)?).await
    }

    /// Execute one call: validate, authenticate, send, retry once on an
    /// expired cached token, decode.
    pub async fn dispatch(&self, call: Call<'_>) -> Result<Output, Error> {
        let Call {
            op,
            path_args,
            mut message_args,
            query,
            body,
            headers: overrides,
            cancel,
            download_dir,
        } = call;
        let cancel = cancel.as_ref();

        let query = prepare_query(&query, op.query)?;
        let segments = op.render_segments(&path_args)?;
        check_body(op, &body)?;
        let url = self.endpoint_url(&segments, &query.to_pairs())?;
        let headers = assemble_headers(op, &body, &overrides);

        let (token, source) = self.tokens.bearer(cancel).await?;
        let mut resp = self.send(op, &url, &headers, &body, &token, 1, cancel).await?;

        if is_auth_rejection(resp.status()) {
            if source == TokenSource::Fresh {
                return Err(rejected(resp, cancel).await);
            }
            debug!(
                operation = op.name,
                status = resp.status().as_u16(),
                "cached token rejected, refreshing"
            );
            let fresh = self.tokens.replace_rejected(&token, cancel).await?;
            resp = self.send(op, &url, &headers, &body, &fresh, 2, cancel).await?;
            if is_auth_rejection(resp.status()) {
                return Err(rejected(resp, cancel).await);
            }
        }

        message_args.extend(path_args);
        let dir = download_dir.as_deref().unwrap_or(&self.download_dir);
        decode(op, &url, resp, &message_args, dir, cancel).await
    }

    fn endpoint_url(&self, segments: &[String], query: &[(String, String)]) -> Result<Url, Error> {
        let mut url = self.base_url().clone();
        url.path_segments_mut()
            .map_err(|()| Error::argument("base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    #[allow(clippy::too_many_arguments)]
    async fn send(
        &self,
        op: &Operation,
        url: &Url,
        headers: &HeaderMap,
        body: &RequestBody,
        token: &Token,
        attempt: u8,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, Error> {
        let client = if op.verb == Verb::Get {
            &self.http
        } else {
            &self.http_no_redirect
        };
        let method = op.verb.method();

        let request = client
            .request(method.clone(), url.clone())
            .headers(headers.clone())
            .bearer_auth(token.secret());
        let request = match body {
            RequestBody::None => request,
            RequestBody::Json(value) => request.json(value),
            RequestBody::Multipart(upload) => request.multipart(upload.to_form()?),
            RequestBody::Form(pairs) => request.form(pairs),
        };

        let started = Instant::now();
        let sent = cancellable(cancel, async { request.send().await.map_err(Error::from) }).await;
        record(
            &self.observer,
            &Exchange {
                operation: op.name,
                method: &method,
                url,
                status: sent.as_ref().ok().map(Response::status),
                elapsed: started.elapsed(),
                attempt,
            },
        );
        sent
    }
}

/// Defaults, then the descriptor's Accept, then caller overrides.
/// `Authorization` is never taken from overrides; bodies that carry their
/// own `Content-Type` (multipart boundary, urlencoded) keep it.
fn assemble_headers(op: &Operation, body: &RequestBody, overrides: &HeaderMap) -> HeaderMap {
    let own_content_type = body.sets_content_type();
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    if !own_content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    }
    if let Some(accept) = op.accept {
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
    }

    let allowed = |name: &HeaderName| {
        *name != AUTHORIZATION && !(own_content_type && *name == CONTENT_TYPE)
    };
    for name in overrides.keys().filter(|name| allowed(*name)) {
        headers.remove(name);
    }
    for (name, value) in overrides.iter().filter(|(name, _)| allowed(*name)) {
        headers.append(name.clone(), value.clone());
    }
    headers
}

fn is_auth_rejection(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

async fn read_text(resp: Response, cancel: Option<&CancellationToken>) -> Result<String, Error> {
    cancellable(cancel, async { resp.text().await.map_err(Error::from) }).await
}

async fn rejected(resp: Response, cancel: Option<&CancellationToken>) -> Error {
    let status = resp.status();
    match read_text(resp, cancel).await {
        Ok(body) => auth_failure(status, &body),
        Err(e) if e.is_cancelled() => e,
        Err(_) => auth_failure(status, ""),
    }
}

/// Map a non-2xx response to its error kind.
async fn classify(status: StatusCode, url: &Url, resp: Response, cancel: Option<&CancellationToken>) -> Error {
    let body = match read_text(resp, cancel).await {
        Ok(body) => excerpt(body.trim()),
        Err(e) if e.is_cancelled() => return e,
        Err(_) => String::new(),
    };
    match status.as_u16() {
        401 | 403 => auth_failure(status, &body),
        404 => Error::NotFound {
            path: url.path().to_owned(),
            body,
        },
        409 => Error::Conflict { body },
        code @ 500.. => Error::Server { status: code, body },
        code => Error::Client { status: code, body },
    }
}

async fn decode(
    op: &Operation,
    url: &Url,
    resp: Response,
    message_args: &[(String, String)],
    download_dir: &Path,
    cancel: Option<&CancellationToken>,
) -> Result<Output, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(classify(status, url, resp, cancel).await);
    }

    match op.decoder {
        Decoder::Json => {
            let bytes = cancellable(cancel, async { resp.bytes().await.map_err(Error::from) }).await?;
            decode_json(&bytes).map(Output::Json)
        }
        Decoder::Text => {
            let bytes = cancellable(cancel, async { resp.bytes().await.map_err(Error::from) }).await?;
            Ok(Output::Text(String::from_utf8_lossy(&bytes).into_owned()))
        }
        Decoder::Download => download::save(resp, url, download_dir, cancel)
            .await
            .map(Output::File),
        Decoder::Success => {
            drop(resp);
            Ok(Output::Message(op.render_message(message_args)))
        }
    }
}

/// Parse a JSON body; an empty body (204, or 200 with nothing) is `null`.
fn decode_json(bytes: &[u8]) -> Result<Value, Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| Error::ResponseDecode {
        message: e.to_string(),
        body: excerpt(&String::from_utf8_lossy(bytes)),
    })
}
