//! Async client for the Qubes Air console REST API.
//!
//! [`ApiClient`] exposes one method per endpoint (zones, qubes, health,
//! status) over a shared request primitive. Wire types live in [`models`];
//! every failure is an [`Error`], and a non-2xx response always carries a
//! status, a code, and a message.
//!
//! ```no_run
//! # async fn demo() -> Result<(), qubes_air_api::Error> {
//! use qubes_air_api::{ApiClient, ListOptions, TransportConfig};
//!
//! let client = ApiClient::new("http://127.0.0.1:8080", "/api/v1", &TransportConfig::default())?;
//! let page = client.list_zones(&ListOptions::new().status("connected")).await?;
//! println!("{} connected zones", page.zones.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod qubes;
mod system;
mod zones;

pub use client::{ApiClient, DEFAULT_API_BASE, resolve_api_base};
pub use error::{Error, UNKNOWN_ERROR_CODE};
pub use models::*;
pub use transport::TransportConfig;
