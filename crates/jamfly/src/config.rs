//! Resolve a `JamfClient` from the config file, the active profile and
//! global flag overrides.

use secrecy::SecretString;

use jamfly_api::JamfClient;
use jamfly_config::{Config, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// `--profile`, else the config's default, else "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    cfg.profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let names = cfg.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// The active profile with `--url`, `--username`, `--insecure` and
/// `--timeout` applied on top.
///
/// Without a matching profile, `--url` alone is enough to start from an
/// empty one.
pub fn effective_profile(global: &GlobalOpts, cfg: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, cfg);

    let mut profile = match (cfg.profiles.get(&name), global.url.as_ref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(_)) => Profile::default(),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(cfg),
                name,
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: jamfly_config::config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    Ok((name, profile))
}

/// Build the client for every command that talks to the server.
pub fn build_client(global: &GlobalOpts) -> Result<JamfClient, CliError> {
    let cfg = jamfly_config::load_config_or_default();
    let (name, profile) = effective_profile(global, &cfg)?;

    let settings = jamfly_config::client_settings(&profile, &cfg.defaults)?;
    let username = jamfly_config::resolve_username(&profile, &name)?;
    let password = match global.password {
        Some(ref pw) if !pw.is_empty() => SecretString::from(pw.clone()),
        _ => jamfly_config::resolve_password(&profile, &name)?,
    };

    tracing::debug!(profile = %name, url = %settings.url, "building client");
    Ok(jamfly_config::build_client(&settings, username, password)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["jamfly"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["ops", "families"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with(name: &str, url: &str) -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            name.into(),
            Profile {
                url: url.into(),
                username: Some("api-user".into()),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with("default", "https://a.jamfcloud.com");
        let g = global(&["--url", "https://b.jamfcloud.com", "--username", "other", "-k", "--timeout", "5"]);

        let (name, profile) = effective_profile(&g, &cfg).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.url, "https://b.jamfcloud.com");
        assert_eq!(profile.username.as_deref(), Some("other"));
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.timeout, Some(5));
    }

    #[test]
    fn url_flag_works_without_profile() {
        let cfg = Config::default();
        let g = global(&["--url", "https://b.jamfcloud.com"]);
        let (_, profile) = effective_profile(&g, &cfg).unwrap();
        assert_eq!(profile.url, "https://b.jamfcloud.com");
        assert_eq!(profile.username, None);
    }

    #[test]
    fn missing_named_profile_lists_available() {
        let cfg = config_with("prod", "https://a.jamfcloud.com");
        let g = global(&["--profile", "staging"]);
        match effective_profile(&g, &cfg).unwrap_err() {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "staging");
                assert_eq!(available, "prod");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let g = global(&[]);
        assert!(matches!(
            effective_profile(&g, &Config::default()).unwrap_err(),
            CliError::NoConfig { .. }
        ));
    }
}
