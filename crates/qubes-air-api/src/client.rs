// Async HTTP client for the Qubes Air console API.
//
// Versioned base path: /api/v1/ (configurable)
// Unversioned: /health
//
// Endpoint methods live in `zones.rs`, `qubes.rs`, and `system.rs` as
// inherent impls; this module only owns URL construction and the shared
// request/response mechanics.

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ListOptions;
use crate::transport::TransportConfig;

/// Path prefix used when no API base is configured.
pub const DEFAULT_API_BASE: &str = "/api/v1";

/// Thin typed wrapper over the console's REST endpoints.
///
/// Holds no state besides the connection pool: every call is a single
/// request, and errors are returned to the caller untouched.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
    api_base: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `origin` (e.g. `http://127.0.0.1:8080`).
    ///
    /// `api_base` is either a path joined onto the origin (`/api/v1`) or an
    /// absolute URL. It is resolved once here and never re-read.
    pub fn new(origin: &str, api_base: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(origin, api_base, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(origin: &str, api_base: &str, http: reqwest::Client) -> Result<Self, Error> {
        let origin = Url::parse(origin)?;
        let api_base = resolve_api_base(&origin, api_base)?;
        debug!(%origin, %api_base, "api client configured");
        Ok(Self {
            http,
            origin,
            api_base,
        })
    }

    /// The resolved versioned base URL (always ends with `/`).
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{api_base}/{segments...}` with each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A fixed top-level path on the origin, outside the versioned prefix.
    pub(crate) fn root_endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.origin.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        mut url: Url,
        options: &ListOptions,
    ) -> Result<T, Error> {
        let pairs = options.query_pairs();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
        }
        self.get(url).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    /// POST with no body at all (state-transition endpoints).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }
}

/// Resolve the configured API base against the origin.
///
/// The result always ends with `/` so endpoint segments append cleanly.
pub fn resolve_api_base(origin: &Url, api_base: &str) -> Result<Url, Error> {
    let raw = if api_base.trim().is_empty() {
        DEFAULT_API_BASE
    } else {
        api_base.trim()
    };

    let mut url = match Url::parse(raw) {
        Ok(absolute) => absolute,
        Err(url::ParseError::RelativeUrlWithoutBase) => origin.join(raw)?,
        Err(e) => return Err(e.into()),
    };

    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    // A body that cannot be read is treated like one that cannot be parsed.
    let raw = resp.text().await.unwrap_or_default();
    let err = Error::from_error_body(status, &raw);
    debug!(status = status.as_u16(), code = err.code(), "request rejected");
    err
}
