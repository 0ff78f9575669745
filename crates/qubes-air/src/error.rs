//! CLI error types with miette diagnostics.
//!
//! Maps API and configuration errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use qubes_air_config::ConfigError;
use qubes_air_core::Error as ApiError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to console at {url}")]
    #[diagnostic(
        code(qubes_air::connection_failed),
        help(
            "Check that the console server is running and reachable.\n\
             URL: {url}\n\
             Try: qubes-air health --server {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(qubes_air::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout {
        url: String,
        #[source]
        source: ApiError,
    },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(qubes_air::not_found),
        help("Run: qubes-air {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Could not load {resource}: {message}")]
    #[diagnostic(
        code(qubes_air::load_failed),
        help("Check the server with: qubes-air health")
    )]
    LoadFailed { resource: String, message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error (HTTP {status}, {code}): {message}")]
    #[diagnostic(code(qubes_air::api_error), help("{hint}"))]
    Api {
        status: u16,
        code: String,
        message: String,
        hint: String,
    },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(
        code(qubes_air::bad_response),
        help("The server answered with a shape this client does not understand. Check that --api-base points at a compatible server.")
    )]
    BadResponse { message: String },

    #[error("Server reports status '{status}'")]
    #[diagnostic(code(qubes_air::unhealthy))]
    Unhealthy { status: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(qubes_air::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(qubes_air::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: qubes-air config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(qubes_air::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(qubes_air::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Api { status: 409, .. } => exit_code::CONFLICT,
            Self::Api { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Like `From<ApiError>`, but a 404 names the missing resource.
    pub fn for_resource(err: ApiError, resource_type: &str, identifier: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: format!("{resource_type}s list"),
            };
        }
        err.into()
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout {
                url: e.url().map(ToString::to_string).unwrap_or_default(),
                source: err,
            },

            ApiError::Transport(ref e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map(|u| u.origin().ascii_serialization())
                    .unwrap_or_default(),
                source: err,
            },

            ApiError::Api {
                status,
                code,
                message,
                details,
            } => {
                let hint = details.map_or_else(
                    || "Re-run with -v for request details.".to_owned(),
                    |fields| {
                        fields
                            .iter()
                            .map(|(field, reason)| format!("{field}: {reason}"))
                            .collect::<Vec<_>>()
                            .join("\n")
                    },
                );
                Self::Api {
                    status,
                    code,
                    message,
                    hint,
                }
            }

            ApiError::InvalidUrl(e) => Self::Validation {
                field: "server".into(),
                reason: e.to_string(),
            },

            ApiError::Deserialization { message, .. } => Self::BadResponse { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
