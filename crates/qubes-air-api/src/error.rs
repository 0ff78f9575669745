use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Code reported when the server's error body carries none.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Top-level error type for the `qubes-air-api` crate.
///
/// Callers usually only need to tell a request that never got an answer
/// (`Transport`) from one the server rejected (`Api`).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, or an interrupted body.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base URL or endpoint path could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-2xx status.
    #[error("API error (HTTP {status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: Option<BTreeMap<String, String>>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body did not match the declared response type.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build an `Api` error from a non-2xx response body.
    ///
    /// Never fails: a body that is not the documented JSON shape falls back
    /// to the status line's reason phrase.
    pub(crate) fn from_error_body(status: StatusCode, raw: &str) -> Self {
        let body = serde_json::from_str::<ErrorBody>(raw).unwrap_or_default();

        let message = body
            .error
            .or(body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| reason_phrase(status));

        let code = body
            .code
            .and_then(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) if s.is_empty() => None,
                serde_json::Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_owned());

        let details = match body.details {
            Some(serde_json::Value::Object(map)) => Some(
                map.into_iter()
                    .map(|(field, value)| match value {
                        serde_json::Value::String(s) => (field, s),
                        other => (field, other.to_string()),
                    })
                    .collect(),
            ),
            _ => None,
        };

        Self::Api {
            status: status.as_u16(),
            code,
            message,
            details,
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable code from the error body.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Per-field validation messages, if the server sent any.
    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Human-readable message without the status/code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if re-issuing the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

// ── Error body shape ─────────────────────────────────────────────────

/// `{ error, code?, details? }`. Deployed servers also send `message`
/// and a numeric `code`, so the loosely-typed fields are kept as JSON.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_str().to_owned(), str::to_owned)
}
