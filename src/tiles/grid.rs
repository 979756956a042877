//! Concurrent download of the full level×level tile grid.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fxhash::FxHashMap;
use log::{debug, info};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::core::geo::{Level, TileCoord};
use crate::tiles::fetcher::{fetch_with_retry, http_client, RetryPolicy};
use crate::tiles::source::TileSource;
use crate::{Error, Result};

/// Configuration for the grid downloader.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Maximum concurrent tile downloads. The grid spawns one task per tile
    /// (400 at level 20) but never holds more connections than this.
    pub max_concurrent: usize,
    /// Retry policy applied to each tile fetch.
    pub retry: RetryPolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 64,
            retry: RetryPolicy::default(),
        }
    }
}

impl GridConfig {
    pub fn for_testing() -> Self {
        Self {
            max_concurrent: 4,
            retry: RetryPolicy {
                max_attempts: 1,
                delay: Duration::from_millis(50),
            },
        }
    }
}

/// Downloads every tile of a grid concurrently, reporting progress through a
/// shared completion counter. Tiles complete in whatever order the executor
/// yields; assembly later places them by coordinate, not arrival order. Any
/// single tile exhausting its retries aborts the whole grid; there is no
/// partial-image fallback.
pub struct GridDownloader<S: TileSource + 'static> {
    source: Arc<S>,
    config: GridConfig,
}

impl<S: TileSource + 'static> GridDownloader<S> {
    pub fn new(source: S, config: GridConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub async fn download(
        &self,
        level: Level,
        cancel: &CancellationToken,
    ) -> Result<FxHashMap<TileCoord, Vec<u8>>> {
        let total = level.tile_count() as usize;
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<Result<(TileCoord, Vec<u8>)>> = JoinSet::new();

        debug!(
            "downloading {total} tiles at level {level} with at most {} in flight",
            self.config.max_concurrent
        );

        for coord in level.coords() {
            let url = self.source.url(coord);
            let semaphore = semaphore.clone();
            let completed = completed.clone();
            let retry = self.config.retry.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| Error::Download {
                    url: url.clone(),
                    reason: String::from("download pool closed"),
                })?;

                let bytes = fetch_with_retry(http_client(), &url, &retry, &cancel).await?;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if done == total {
                    info!("downloading tiles: completed.");
                } else {
                    info!("downloading tiles: {done}/{total} completed...");
                }
                Ok((coord, bytes))
            });
        }

        let mut tiles = FxHashMap::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok((coord, bytes))) => {
                    tiles.insert(coord, bytes);
                }
                Ok(Err(err)) => {
                    tasks.abort_all();
                    return Err(err);
                }
                Err(join_err) => {
                    tasks.abort_all();
                    return Err(Error::Download {
                        url: String::from("<tile grid>"),
                        reason: format!("tile task failed: {join_err}"),
                    });
                }
            }
        }

        Ok(tiles)
    }
}
