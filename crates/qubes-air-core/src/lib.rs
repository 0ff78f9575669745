//! Reactive client-side state for the Qubes Air console.
//!
//! Each server collection (zones, qubes) is mirrored by a [`ResourceStore`]
//! that reconciles its local copy after every confirmed server response and
//! publishes a fresh immutable snapshot to subscribers. [`views`] derives
//! read-only projections from those snapshots.
//!
//! ```no_run
//! # async fn demo() -> Result<(), qubes_air_api::Error> {
//! use qubes_air_core::{Console, ConsoleConfig, ListOptions};
//!
//! let console = Console::new(&ConsoleConfig::default())?;
//! let connected = console.zones().connected_zones_view();
//!
//! console.zones().load(&ListOptions::default()).await;
//! console.zones().connect("z1").await?;
//! println!("{} connected", connected.get().len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod console;
pub mod observable;
pub mod store;
pub mod stream;
pub mod views;

pub use config::{API_BASE_ENV, ConsoleConfig, DEFAULT_ORIGIN, LoadOrdering};
pub use console::Console;
pub use observable::{Observable, Subscription};
pub use store::{
    CollectionState, QubeApi, QubeStore, ResourceApi, ResourceStore, ZoneApi, ZoneStore,
};
pub use stream::{StateStream, StateWatchStream};
pub use views::DerivedView;

// Wire types callers need to drive the stores.
pub use qubes_air_api::{
    ApiClient, Error, ListOptions, Qube, QubeCreateRequest, QubeSpec, QubeSpecPatch, QubeStatus,
    QubeType, QubeUpdateRequest, Resource, Zone, ZoneConfig, ZoneCreateRequest, ZoneStatus,
    ZoneType, ZoneUpdateRequest,
};
