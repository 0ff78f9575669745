// ── Wire model ──
//
// Entity snapshots, request payloads, and list envelopes exchanged with
// the console API. Pure data: the server decides what is valid.

mod list;
mod qube;
mod system;
mod zone;

pub use list::{ListOptions, QubeListResponse, ZoneListResponse};
pub use qube::{
    GpuSpec, Qube, QubeCreateRequest, QubeSpec, QubeSpecPatch, QubeStatus, QubeType,
    QubeUpdateRequest,
};
pub use system::{HealthResponse, StatusResponse};
pub use zone::{Zone, ZoneConfig, ZoneCreateRequest, ZoneStatus, ZoneType, ZoneUpdateRequest};

/// An entity that lives in a server-owned collection and is addressed by id.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Collection name, used in log fields.
    const KIND: &'static str;

    fn id(&self) -> &str;
}
