//! `jamfly call NAME ...`: invoke any catalog operation by name.

use std::path::Path;

use jamfly_api::catalog;
use jamfly_api::{
    CallArgs as ApiCallArgs, CancellationToken, FileUpload, IdArgs, Identifier, JamfClient,
    Operation, ParamType, ParamValue, Params, RequestBody,
};

use crate::cli::{CallArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Argument translation ────────────────────────────────────────────

/// Group repeated `--query` keys and type each value by the operation's
/// schema. Names the schema does not declare pass through as strings and
/// are rejected (or accepted) by the dispatcher.
fn query_params(op: &Operation, pairs: Vec<(String, String)>) -> Result<Params, CliError> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in pairs {
        match grouped.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => grouped.push((name, vec![value])),
        }
    }

    let mut params = Params::new();
    for (name, mut values) in grouped {
        let ty = op.query.iter().find(|p| p.name == name).map(|p| p.ty);
        let value = match ty {
            Some(ParamType::StringList) => ParamValue::List(values.into_iter().map(ParamValue::Str).collect()),
            _ if values.len() > 1 => {
                if ty.is_some() {
                    return Err(CliError::Validation {
                        field: name,
                        reason: "may only be given once".into(),
                    });
                }
                ParamValue::List(values.into_iter().map(ParamValue::Str).collect())
            }
            Some(ParamType::Integer) => {
                let raw = values.remove(0);
                ParamValue::Int(raw.parse().map_err(|_| CliError::Validation {
                    field: name.clone(),
                    reason: format!("expected an integer, got '{raw}'"),
                })?)
            }
            Some(ParamType::Boolean) => {
                let raw = values.remove(0);
                ParamValue::Bool(raw.parse().map_err(|_| CliError::Validation {
                    field: name.clone(),
                    reason: format!("expected true or false, got '{raw}'"),
                })?)
            }
            Some(ParamType::String) | None => ParamValue::Str(values.remove(0)),
        };
        params.insert(name, value);
    }
    Ok(params)
}

async fn request_body(args: &mut CallArgs) -> Result<RequestBody, CliError> {
    if let Some(ref text) = args.json {
        return Ok(RequestBody::Json(serde_json::from_str(text)?));
    }
    if let Some(ref path) = args.json_file {
        let text = tokio::fs::read_to_string(path).await?;
        return Ok(RequestBody::Json(serde_json::from_str(&text)?));
    }
    if let Some(ref path) = args.file {
        return Ok(RequestBody::Multipart(FileUpload::from_path(path).await?));
    }
    if !args.form.is_empty() {
        return Ok(RequestBody::Form(std::mem::take(&mut args.form)));
    }
    Ok(RequestBody::None)
}

fn target(args: &CallArgs) -> Option<IdArgs> {
    if args.id.is_none() && args.ids.is_none() {
        return None;
    }
    Some(IdArgs {
        id: args.id.clone().map(Identifier::from),
        ids: args
            .ids
            .clone()
            .map(|ids| ids.into_iter().map(Identifier::from).collect()),
    })
}

async fn build_args(op: &Operation, mut args: CallArgs, cancel: CancellationToken) -> Result<ApiCallArgs, CliError> {
    let body = request_body(&mut args).await?;
    let query = query_params(op, std::mem::take(&mut args.query))?;

    let mut api = ApiCallArgs::new().query(query).body(body).cancel_on(cancel);
    for (name, value) in &args.args {
        api = api.arg(name, value);
    }
    if let Some(target) = target(&args) {
        api = api.target(target);
    }
    if let Some(ref dir) = args.save_to {
        api = api.save_to(dir);
    }
    Ok(api)
}

/// Cancel in-flight work on Ctrl-C.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    cancel
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &JamfClient, args: CallArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let op = catalog::find(&args.name).ok_or_else(|| CliError::UnknownOperation {
        name: args.name.clone(),
    })?;
    if let Some(ref dir) = args.save_to {
        ensure_dir(dir)?;
    }

    let api_args = build_args(op, args, cancel_on_interrupt()).await?;
    tracing::debug!(operation = op.name, "calling");
    let out = client.call(op.name, api_args).await?;

    output::print_output(&output::render_output(&global.output, &out), global.quiet);
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<(), CliError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "save-to".into(),
            reason: format!("{} is not a directory", dir.display()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};

    fn call_args(argv: &[&str]) -> CallArgs {
        let mut full = vec!["jamfly", "call"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Call(args) => args,
            other => panic!("unexpected {other:?}"),
        }
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn query_values_follow_schema_types() {
        let op = catalog::find("list_buildings").unwrap();
        let params = query_params(op, pairs(&[("page", "0"), ("page-size", "50"), ("sort", "id:asc"), ("sort", "name:desc")])).unwrap();

        assert_eq!(params.get("page"), Some(&ParamValue::Int(0)));
        assert_eq!(params.get("page-size"), Some(&ParamValue::Int(50)));
        assert_eq!(
            params.get("sort"),
            Some(&ParamValue::List(vec![
                ParamValue::Str("id:asc".into()),
                ParamValue::Str("name:desc".into()),
            ]))
        );
    }

    #[test]
    fn bad_integer_is_a_usage_error() {
        let op = catalog::find("list_buildings").unwrap();
        let err = query_params(op, pairs(&[("page", "first")])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::exit_code::USAGE);
    }

    #[test]
    fn repeated_scalar_is_rejected() {
        let op = catalog::find("list_buildings").unwrap();
        assert!(query_params(op, pairs(&[("page", "0"), ("page", "1")])).is_err());
    }

    #[test]
    fn ids_split_on_commas() {
        let args = call_args(&["delete_multiple_buildings", "--ids", "1,2,3"]);
        let t = target(&args).unwrap();
        assert_eq!(t.ids.unwrap().len(), 3);
        assert!(t.id.is_none());
    }

    #[test]
    fn no_target_without_id_flags() {
        let args = call_args(&["list_buildings"]);
        assert!(target(&args).is_none());
    }

    #[tokio::test]
    async fn inline_json_becomes_json_body() {
        let mut args = call_args(&["create_building", "--json", r#"{"name":"HQ"}"#]);
        let body = request_body(&mut args).await.unwrap();
        assert_eq!(body, RequestBody::Json(serde_json::json!({"name": "HQ"})));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let mut args = call_args(&["create_building", "--json", "{name"]);
        assert!(matches!(request_body(&mut args).await.unwrap_err(), CliError::Json(_)));
    }

    #[tokio::test]
    async fn form_pairs_keep_order() {
        let mut args = call_args(&["create_building", "--form", "b=2", "--form", "a=1"]);
        let body = request_body(&mut args).await.unwrap();
        assert_eq!(body, RequestBody::Form(pairs(&[("b", "2"), ("a", "1")])));
    }
}
