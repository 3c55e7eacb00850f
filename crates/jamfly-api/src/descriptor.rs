// Operation descriptors
//
// One static record per remote operation. The dispatcher reads nothing
// else: verb, path template, query schema, body shape, decoder, Accept
// override and success template fully determine a call.

use std::fmt;

use reqwest::Method;

use crate::error::Error;
use crate::params::ParamSpec;

/// HTTP verb of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Post => Method::POST,
            Self::Put => Method::PUT,
            Self::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    /// `multipart/form-data` with a single `file` part.
    Multipart,
    /// `application/x-www-form-urlencoded`.
    Form,
}

/// How a 2xx response is turned into an [`Output`](crate::Output).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Json,
    /// Raw body as a string (CSV exports, script contents).
    Text,
    /// Body streamed to a file on disk.
    Download,
    /// Body discarded; the success template is returned instead.
    Success,
}

/// Whether an endpoint is part of the stable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    /// Preview/beta endpoint; path and shape may move between releases.
    Preview,
}

/// Static description of one remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub family: &'static str,
    pub summary: &'static str,
    pub verb: Verb,
    pub path: &'static str,
    pub query: &'static [ParamSpec],
    pub body: BodyKind,
    pub decoder: Decoder,
    pub accept: Option<&'static str>,
    pub success: Option<&'static str>,
    pub stability: Stability,
}

impl Operation {
    pub const fn new(name: &'static str, verb: Verb, path: &'static str) -> Self {
        Self {
            name,
            family: "",
            summary: "",
            verb,
            path,
            query: &[],
            body: BodyKind::None,
            decoder: Decoder::Json,
            accept: None,
            success: None,
            stability: Stability::Stable,
        }
    }

    pub const fn get(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Verb::Get, path)
    }

    pub const fn post(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Verb::Post, path)
    }

    pub const fn put(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Verb::Put, path)
    }

    pub const fn delete(name: &'static str, path: &'static str) -> Self {
        Self::new(name, Verb::Delete, path)
    }

    // ── const builders ───────────────────────────────────────────────

    pub const fn family(mut self, family: &'static str) -> Self {
        self.family = family;
        self
    }

    pub const fn summary(mut self, summary: &'static str) -> Self {
        self.summary = summary;
        self
    }

    pub const fn query(mut self, query: &'static [ParamSpec]) -> Self {
        self.query = query;
        self
    }

    pub const fn json_body(mut self) -> Self {
        self.body = BodyKind::Json;
        self
    }

    pub const fn multipart(mut self) -> Self {
        self.body = BodyKind::Multipart;
        self
    }

    pub const fn form(mut self) -> Self {
        self.body = BodyKind::Form;
        self
    }

    pub const fn text(mut self) -> Self {
        self.decoder = Decoder::Text;
        self
    }

    /// CSV export: `Accept: text/csv`, body returned as text.
    pub const fn csv(mut self) -> Self {
        self.decoder = Decoder::Text;
        self.accept = Some("text/csv");
        self
    }

    pub const fn download(mut self) -> Self {
        self.decoder = Decoder::Download;
        self
    }

    pub const fn accept(mut self, mime: &'static str) -> Self {
        self.accept = Some(mime);
        self
    }

    /// Use the success-string decoder with the given template.
    pub const fn success(mut self, template: &'static str) -> Self {
        self.decoder = Decoder::Success;
        self.success = Some(template);
        self
    }

    pub const fn preview(mut self) -> Self {
        self.stability = Stability::Preview;
        self
    }

    // ── templates ────────────────────────────────────────────────────

    /// Names of the `{slot}` placeholders in the path, in order.
    pub fn slots(&self) -> Vec<&'static str> {
        let mut slots = Vec::new();
        let mut rest = self.path;
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}') else {
                break;
            };
            slots.push(&rest[open + 1..open + close]);
            rest = &rest[open + close + 1..];
        }
        slots
    }

    /// Fill the path template and split it into raw (unencoded) segments.
    ///
    /// Every slot must be supplied; unknown names in `args` are ignored. A
    /// filled segment may not be empty, `.` or `..`: URL normalisation would
    /// turn those into a different resource.
    pub(crate) fn render_segments(&self, args: &[(String, String)]) -> Result<Vec<String>, Error> {
        self.path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                let filled = interpolate(segment, args, |slot| {
                    Error::argument(format!(
                        "missing path argument '{slot}' for {}",
                        self.name
                    ))
                })?;
                if segment.contains('{') && matches!(filled.as_str(), "" | "." | "..") {
                    return Err(Error::argument(format!(
                        "path argument '{filled}' is not a valid segment for {}",
                        self.name
                    )));
                }
                Ok(filled)
            })
            .collect()
    }

    /// Interpolate the success template; placeholders without a value are left as-is.
    pub(crate) fn render_message(&self, args: &[(String, String)]) -> String {
        match self.success {
            Some(template) => interpolate_lenient(template, args),
            None => format!("{} completed successfully.", self.name),
        }
    }
}

fn lookup<'a>(args: &'a [(String, String)], slot: &str) -> Option<&'a str> {
    args.iter()
        .find(|(name, _)| name == slot)
        .map(|(_, value)| value.as_str())
}

fn interpolate<E>(
    template: &str,
    args: &[(String, String)],
    missing: impl Fn(&str) -> E,
) -> Result<String, E> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let slot = &rest[open + 1..open + close];
        out.push_str(&rest[..open]);
        out.push_str(lookup(args, slot).ok_or_else(|| missing(slot))?);
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn interpolate_lenient(template: &str, args: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let slot = &rest[open + 1..open + close];
        out.push_str(&rest[..open]);
        match lookup(args, slot) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    static DELETE: Operation = Operation::delete("delete_building", "/api/v1/buildings/{id}")
        .success("Building {id} successfully deleted.");

    static ATTACHMENT: Operation = Operation::get(
        "download_computer_attachment",
        "/api/v1/computers-inventory/{id}/attachments/{attachmentId}",
    )
    .download();

    fn args(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn slots_are_listed_in_order() {
        assert_eq!(ATTACHMENT.slots(), vec!["id", "attachmentId"]);
        assert!(Operation::get("x", "/api/v1/buildings").slots().is_empty());
    }

    #[test]
    fn render_segments_fills_every_slot() {
        let segments = ATTACHMENT
            .render_segments(&args(&[("attachmentId", "7"), ("id", "12")]))
            .unwrap();
        assert_eq!(
            segments,
            vec!["api", "v1", "computers-inventory", "12", "attachments", "7"]
        );
    }

    #[test]
    fn unfilled_slot_is_an_argument_error() {
        let err = ATTACHMENT
            .render_segments(&args(&[("id", "12")]))
            .unwrap_err();
        assert!(
            matches!(&err, Error::Argument(m) if m.contains("'attachmentId'")),
            "got {err:?}"
        );
    }

    #[test]
    fn dot_and_empty_slot_values_are_rejected() {
        for bad in ["", ".", ".."] {
            let err = DELETE.render_segments(&args(&[("id", bad)])).unwrap_err();
            assert!(
                matches!(&err, Error::Argument(m) if m.contains("not a valid segment")),
                "{bad:?}: got {err:?}"
            );
        }
        // dots inside a value are ordinary characters
        let segments = DELETE.render_segments(&args(&[("id", "a..b")])).unwrap();
        assert_eq!(segments.last().map(String::as_str), Some("a..b"));
    }

    #[test]
    fn success_template_is_interpolated() {
        assert_eq!(
            DELETE.render_message(&args(&[("id", "42")])),
            "Building 42 successfully deleted."
        );
    }

    #[test]
    fn success_template_is_stable_for_equal_inputs() {
        let a = DELETE.render_message(&args(&[("id", "42")]));
        let b = DELETE.render_message(&args(&[("id", "42")]));
        assert_eq!(a, b);
    }

    #[test]
    fn missing_message_value_keeps_placeholder() {
        assert_eq!(
            DELETE.render_message(&[]),
            "Building {id} successfully deleted."
        );
    }

    #[test]
    fn builders_set_decoder_and_accept() {
        let op = Operation::post("export_buildings", "/api/v1/buildings/export").csv();
        assert_eq!(op.decoder, Decoder::Text);
        assert_eq!(op.accept, Some("text/csv"));
        assert_eq!(op.verb.method(), Method::POST);
        assert_eq!(DELETE.decoder, Decoder::Success);
    }
}
