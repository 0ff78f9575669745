//! CLI configuration: a thin wrapper around `qubes_air_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--server, --api-base, --insecure, --timeout).

use std::time::Duration;

use qubes_air_core::ConsoleConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use qubes_air_config::{
    Config, ConfigError, Profile, config_path, load_config_or_default, save_config,
    validate_origin,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `ConsoleConfig` from the config file, profile, and CLI overrides.
///
/// Flags win over the profile, the profile over `[defaults]`. With no
/// profile at all the local development server is targeted.
pub fn resolve_console_config(global: &GlobalOpts, cfg: &Config) -> Result<ConsoleConfig, CliError> {
    let profile = cfg
        .profile(global.profile.as_deref())
        .map_err(|err| match err {
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            },
            other => other.into(),
        })?
        .map(|(_, profile)| profile);

    let mut console = cfg.to_console_config(profile)?;

    if let Some(ref server) = global.server {
        validate_origin(server)?;
        console.origin.clone_from(server);
    }
    if let Some(base) = global.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
        console.api_base = base.to_owned();
    }
    if global.insecure {
        console.accept_invalid_certs = true;
    }
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }

    tracing::debug!(
        origin = %console.origin,
        api_base = %console.api_base,
        "resolved console config"
    );
    Ok(console)
}
