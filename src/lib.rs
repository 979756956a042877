//! # himawall
//!
//! Fetches a near-realtime full-disk image of Earth taken by the Himawari-8
//! satellite, resolves a requested observation time to the closest available
//! snapshot, optionally composites the disk onto a background image behind a
//! soft-edged circular mask, and applies the result as the desktop wallpaper.
//!
//! The library is split into small focused modules: time-offset resolution
//! and snapshot matching in `core`, the snapshot archive index in `archive`,
//! concurrent tile acquisition in `tiles`, image assembly and compositing in
//! `compose`, and thin desktop integration in `desktop`. The `pipeline`
//! module wires them together for the `himawall-app` binary.

pub mod archive;
pub mod compose;
pub mod core;
pub mod desktop;
pub mod pipeline;
pub mod tiles;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    geo::{Level, TileCoord},
    snapshot::{closest_snapshot, Snapshot},
    time::resolve_target_time,
};

pub use crate::tiles::{
    fetcher::{fetch_with_retry, RetryPolicy},
    grid::{GridConfig, GridDownloader},
    source::{HimawariTileSource, TileSource},
};

pub use crate::pipeline::{run, RunConfig};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Validation(String),

    #[error("could not download '{url}': {reason}")]
    Download { url: String, reason: String },

    #[error("deadline of {0} minute(s) elapsed before the pipeline finished")]
    Timeout(u64),

    #[error("desktop environment '{0}' is not supported")]
    UnsupportedEnvironment(String),

    #[error("could not open image to composite over '{path}': {reason}")]
    CompositeSource { path: String, reason: String },

    #[error("could not parse snapshot archive: {0}")]
    Archive(String),
}
