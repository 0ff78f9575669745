// ── Resource stores ──
//
// Client-side reconciled caches of the server's zone and qube collections.

mod qubes;
mod resource;
mod state;
mod zones;

pub use qubes::{QubeApi, QubeStore};
pub use resource::{ResourceApi, ResourceStore};
pub use state::CollectionState;
pub use zones::{ZoneApi, ZoneStore};
