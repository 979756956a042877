pub mod fetcher;
pub mod grid;
pub mod source;

// Re-exports for convenience
pub use fetcher::{fetch_with_retry, http_client, RetryPolicy};
pub use grid::{GridConfig, GridDownloader};
pub use source::{HimawariTileSource, TileSource};
