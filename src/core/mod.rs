pub mod constants;
pub mod geo;
pub mod snapshot;
pub mod time;

// Re-exports for convenience
pub use geo::{Level, TileCoord};
pub use snapshot::{closest_snapshot, Snapshot};
pub use time::resolve_target_time;
