//! Catalog browsing: `jamfly ops list|show|families`.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::Tabled;

use jamfly_api::catalog;
use jamfly_api::{BodyKind, Decoder, Operation, Stability};

use crate::cli::{GlobalOpts, OpsArgs, OpsCommand};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct OpView {
    name: &'static str,
    family: &'static str,
    verb: &'static str,
    path: &'static str,
    summary: &'static str,
    query: Vec<QueryParamView>,
    body: &'static str,
    output: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    accept: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<&'static str>,
    preview: bool,
}

#[derive(Serialize)]
struct QueryParamView {
    name: &'static str,
    #[serde(rename = "type")]
    ty: String,
    required: bool,
}

impl From<&Operation> for OpView {
    fn from(op: &Operation) -> Self {
        Self {
            name: op.name,
            family: op.family,
            verb: op.verb.as_str(),
            path: op.path,
            summary: op.summary,
            query: op
                .query
                .iter()
                .map(|p| QueryParamView {
                    name: p.name,
                    ty: p.ty.to_string(),
                    required: p.required,
                })
                .collect(),
            body: body_name(op.body),
            output: decoder_name(op.decoder),
            accept: op.accept,
            success: op.success,
            preview: op.stability == Stability::Preview,
        }
    }
}

fn body_name(kind: BodyKind) -> &'static str {
    match kind {
        BodyKind::None => "none",
        BodyKind::Json => "json",
        BodyKind::Multipart => "multipart",
        BodyKind::Form => "form",
    }
}

fn decoder_name(decoder: Decoder) -> &'static str {
    match decoder {
        Decoder::Json => "json",
        Decoder::Text => "text",
        Decoder::Download => "file",
        Decoder::Success => "message",
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OpRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Verb")]
    verb: &'static str,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Summary")]
    summary: &'static str,
}

impl From<&OpView> for OpRow {
    fn from(v: &OpView) -> Self {
        Self {
            name: v.name,
            verb: v.verb,
            path: v.path,
            summary: v.summary,
        }
    }
}

#[derive(Serialize)]
struct FamilyView {
    family: &'static str,
    operations: usize,
}

#[derive(Tabled)]
struct FamilyRow {
    #[tabled(rename = "Family")]
    family: &'static str,
    #[tabled(rename = "Operations")]
    operations: usize,
}

// ── Filtering ───────────────────────────────────────────────────────

fn matches(op: &Operation, family: Option<&str>, search: Option<&str>) -> bool {
    if family.is_some_and(|f| !op.family.eq_ignore_ascii_case(f)) {
        return false;
    }
    search.is_none_or(|needle| {
        let needle = needle.to_lowercase();
        [op.name, op.path, op.summary]
            .iter()
            .any(|hay| hay.to_lowercase().contains(&needle))
    })
}

fn detail(view: &OpView, color: bool) -> String {
    let mut lines = Vec::new();
    let verb = if color {
        view.verb.bold().to_string()
    } else {
        view.verb.to_owned()
    };
    lines.push(format!("{verb} {}", view.path));
    lines.push(format!("  name:     {}", view.name));
    lines.push(format!("  family:   {}", view.family));
    lines.push(format!("  summary:  {}", view.summary));
    lines.push(format!("  body:     {}", view.body));
    lines.push(format!("  output:   {}", view.output));
    if let Some(accept) = view.accept {
        lines.push(format!("  accept:   {accept}"));
    }
    if let Some(success) = view.success {
        lines.push(format!("  message:  {success}"));
    }
    if view.preview {
        let tag = if color {
            "preview".yellow().to_string()
        } else {
            "preview".to_owned()
        };
        lines.push(format!("  status:   {tag}"));
    }
    if !view.query.is_empty() {
        lines.push("  query:".to_owned());
        for p in &view.query {
            let req = if p.required { " (required)" } else { "" };
            lines.push(format!("    {} <{}>{req}", p.name, p.ty));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: OpsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        OpsCommand::List { family, search } => {
            let views: Vec<OpView> = catalog::all()
                .filter(|op| matches(op, family.as_deref(), search.as_deref()))
                .map(OpView::from)
                .collect();
            let out = output::render_list(&global.output, &views, |v| OpRow::from(v), |v| v.name.to_owned());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OpsCommand::Show { name } => {
            let op = catalog::find(&name).ok_or(CliError::UnknownOperation { name })?;
            let view = OpView::from(op);
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &view,
                |v| detail(v, color),
                |v| format!("{} {}", v.verb, v.path),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OpsCommand::Families => {
            let views: Vec<FamilyView> = catalog::families()
                .into_iter()
                .map(|family| FamilyView {
                    family,
                    operations: catalog::all().filter(|op| op.family == family).count(),
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &views,
                |v| FamilyRow {
                    family: v.family,
                    operations: v.operations,
                },
                |v| v.family.to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
