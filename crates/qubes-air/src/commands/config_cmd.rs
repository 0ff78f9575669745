//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use qubes_air_core::{DEFAULT_ORIGIN, LoadOrdering};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn ordering_name(ordering: LoadOrdering) -> &'static str {
    match ordering {
        LoadOrdering::LastCompletion => "last-completion",
        LoadOrdering::LatestRequest => "latest-request",
    }
}

fn parse_ordering(value: &str) -> Result<LoadOrdering, CliError> {
    match value {
        "last-completion" | "last_completion" => Ok(LoadOrdering::LastCompletion),
        "latest-request" | "latest_request" => Ok(LoadOrdering::LatestRequest),
        _ => Err(CliError::Validation {
            field: "load_ordering".into(),
            reason: "must be 'last-completion' or 'latest-request'".into(),
        }),
    }
}

/// Format config as TOML-like text, profiles sorted by name.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    if let Some(ref base) = cfg.api_base_url {
        let _ = writeln!(out, "api_base_url = \"{base}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(
        out,
        "load_ordering = \"{}\"",
        ordering_name(cfg.defaults.load_ordering)
    );

    let mut names: Vec<_> = cfg.profiles.iter().collect();
    names.sort_by(|a, b| a.0.cmp(b.0));
    for (name, p) in names {
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(ref base) = p.api_base {
            let _ = writeln!(out, "api_base = \"{base}\"");
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(ordering) = p.load_ordering {
            let _ = writeln!(out, "load_ordering = \"{}\"", ordering_name(ordering));
        }
    }

    out.trim_end().to_owned()
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn empty_profile() -> Profile {
    Profile {
        server: DEFAULT_ORIGIN.into(),
        api_base: None,
        insecure: None,
        timeout: None,
        load_ordering: None,
    }
}

/// Apply `config set <key> <value>` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "server" => {
            config::validate_origin(&value)?;
            profile.server = value;
        }
        "api_base" | "api-base" => profile.api_base = Some(value),
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "load_ordering" | "load-ordering" => {
            profile.load_ordering = Some(parse_ordering(&value)?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: server, api_base, \
                     insecure, timeout, load_ordering"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("Qubes Air console configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Console server URL")
                .default(DEFAULT_ORIGIN.into())
                .validate_with(|s: &String| config::validate_origin(s).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(prompt_err)?;

            let api_base: String = Input::new()
                .with_prompt("API base path")
                .default("/api/v1".into())
                .interact_text()
                .map_err(prompt_err)?;

            let insecure = Confirm::new()
                .with_prompt("Accept self-signed TLS certificates?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let profile = Profile {
                server,
                api_base: (api_base != "/api/v1").then_some(api_base),
                insecure: insecure.then_some(true),
                timeout: None,
                load_ordering: None,
            };

            // Keep profiles from an existing file
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: qubes-air health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(empty_profile);
            set_key(profile, &key, value)?;

            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: qubes-air config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.iter().collect();
                names.sort_by(|a, b| a.0.cmp(b.0));
                for (name, profile) in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}\t{}", profile.server);
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_unknown_keys() {
        let mut profile = empty_profile();
        let err = set_key(&mut profile, "password", "x".into())
            .err()
            .unwrap_or_else(|| panic!("expected an error"));
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn set_parses_typed_values() {
        let mut profile = empty_profile();
        set_key(&mut profile, "timeout", "5".into()).unwrap_or_else(|e| panic!("{e}"));
        set_key(&mut profile, "load-ordering", "latest-request".into())
            .unwrap_or_else(|e| panic!("{e}"));
        set_key(&mut profile, "server", "https://air.lan".into()).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(profile.timeout, Some(5));
        assert_eq!(profile.load_ordering, Some(LoadOrdering::LatestRequest));
        assert_eq!(profile.server, "https://air.lan");
    }

    #[test]
    fn set_rejects_bad_server() {
        let mut profile = empty_profile();
        assert!(set_key(&mut profile, "server", "not a url".into()).is_err());
        assert_eq!(profile.server, DEFAULT_ORIGIN);
    }

    #[test]
    fn format_sorts_profiles() {
        let mut cfg = Config::default();
        cfg.profiles.insert("b".into(), empty_profile());
        cfg.profiles.insert("a".into(), empty_profile());
        let out = format_config(&cfg);
        let a = out.find("[profiles.a]").unwrap_or(usize::MAX);
        let b = out.find("[profiles.b]").unwrap_or(0);
        assert!(a < b);
        assert!(out.contains("load_ordering = \"last-completion\""));
    }
}
