//! Output formatting: table, JSON, YAML, plain.
//!
//! Listings render as `tabled` tables; API responses have no fixed shape,
//! so `table` falls back to pretty JSON for them.

use std::io::{self, IsTerminal, Write};

use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use jamfly_api::Output;

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// `plain` calls `id_fn` on each item to emit one identifier per line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single item; `detail_fn` supplies the table-mode view.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => render_json_compact(data),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Render a dispatch result.
///
/// Text, file paths and success messages print verbatim in every format.
pub fn render_output(format: &OutputFormat, output: &Output) -> String {
    match output {
        Output::Json(value) => render_single(format, value, render_json_pretty::<Value>, plain_value),
        Output::Text(text) => text.clone(),
        Output::File(path) => path.display().to_string(),
        Output::Message(message) => message.clone(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Strings unquoted, arrays one element per line, anything else compact.
fn plain_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(plain_value).collect::<Vec<_>>().join("\n"),
        other => render_json_compact(other),
    }
}

fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn render_json_compact<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    #[test]
    fn plain_flattens_arrays_and_unquotes_strings() {
        let out = Output::Json(json!(["a", 2, {"id": "3"}]));
        assert_eq!(render_output(&OutputFormat::Plain, &out), "a\n2\n{\"id\":\"3\"}");
    }

    #[test]
    fn table_falls_back_to_pretty_json() {
        let out = Output::Json(json!({"id": "1"}));
        assert_eq!(render_output(&OutputFormat::Table, &out), "{\n  \"id\": \"1\"\n}");
    }

    #[test]
    fn non_json_outputs_print_verbatim() {
        let msg = Output::Message("Building 7 successfully deleted.".into());
        assert_eq!(render_output(&OutputFormat::Json, &msg), "Building 7 successfully deleted.");

        let file = Output::File(PathBuf::from("/tmp/ca.pem"));
        assert_eq!(render_output(&OutputFormat::Yaml, &file), "/tmp/ca.pem");
    }

    #[test]
    fn yaml_renders_objects() {
        let out = Output::Json(json!({"name": "HQ"}));
        assert_eq!(render_output(&OutputFormat::Yaml, &out), "name: HQ\n");
    }
}
