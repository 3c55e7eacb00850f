//! `jamfly auth check|keep-alive`: exercise the token endpoints directly.
//! A CLI process keeps no state between runs, so every token it acquires
//! is invalidated before it exits.

use serde::Serialize;

use jamfly_api::JamfClient;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SessionView {
    url: String,
    username: String,
    expires: Option<String>,
    revoked: bool,
}

fn session(client: &JamfClient, revoked: bool) -> SessionView {
    let creds = client.tokens().credentials();
    SessionView {
        url: creds.base_url().to_string(),
        username: creds.username().to_owned(),
        expires: client.tokens().expires_at().map(|at| at.to_rfc3339()),
        revoked,
    }
}

fn detail(view: &SessionView) -> String {
    let expires = view.expires.as_deref().unwrap_or("unknown");
    let mut out = format!(
        "Authenticated as {} at {}\nToken expires {expires}",
        view.username, view.url
    );
    if view.revoked {
        out.push_str("\nToken invalidated");
    }
    out
}

fn print(view: &SessionView, global: &GlobalOpts) {
    let out = output::render_single(&global.output, view, detail, |v| {
        v.expires.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
}

pub async fn handle(client: &JamfClient, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        AuthCommand::Check => {
            client.tokens().token().await?;
            let mut view = session(client, false);
            client.tokens().revoke().await?;
            view.revoked = true;
            print(&view, global);
            Ok(())
        }

        AuthCommand::KeepAlive => {
            client.tokens().token().await?;
            client.tokens().keep_alive().await?;
            let mut view = session(client, false);
            client.tokens().revoke().await?;
            view.revoked = true;
            print(&view, global);
            Ok(())
        }
    }
}
