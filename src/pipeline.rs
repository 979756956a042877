//! The supervisory pipeline: archive index → target time → closest snapshot
//! → image acquisition (full image or tile grid) → optional composite →
//! output file → wallpaper.

use std::path::PathBuf;

use image::RgbaImage;
use log::info;
use tokio_util::sync::CancellationToken;

use crate::archive;
use crate::compose::{assemble, composite_over, open_base, write_output};
use crate::core::constants::SATELLITE_UTC_OFFSET;
use crate::core::geo::Level;
use crate::core::snapshot::closest_snapshot;
use crate::core::time::{resolve_target_time, validate_offset};
use crate::desktop;
use crate::tiles::fetcher::{fetch_with_retry, http_client};
use crate::tiles::grid::{GridConfig, GridDownloader};
use crate::tiles::source::HimawariTileSource;
use crate::{Error, Result};

const DISPLAY_TIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Everything one run needs to know. Built by the CLI, validated before any
/// network activity.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Detect the UTC offset from the local clock instead of `offset`.
    pub auto_offset: bool,
    /// Requested UTC offset in hours, [-12, +10].
    pub offset: i32,
    /// Grid side for the tiled protocol variant.
    pub level: Level,
    /// Fetch the image as a level×level tile grid instead of following the
    /// archive's single-file download link.
    pub tiles: bool,
    /// Directory receiving the single live output file.
    pub output_dir: PathBuf,
    /// Optional base image to composite the disk over.
    pub composite_over: Option<PathBuf>,
    /// Concurrency and retry knobs for the download phase.
    pub grid: GridConfig,
}

impl RunConfig {
    /// Default output directory: the user cache directory, falling back to
    /// the system temp directory.
    pub fn default_output_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("himawall")
    }

    /// Checks everything that must be rejected before the first request.
    pub fn validate(&self) -> Result<()> {
        if !self.auto_offset {
            validate_offset(self.offset)?;
        }
        Ok(())
    }
}

/// Runs the whole pipeline once and returns the path of the written output
/// file. Cancellation is observed at every fetch; cancelling `cancel` makes
/// in-flight downloads give up between retries.
pub async fn run(config: &RunConfig, cancel: CancellationToken) -> Result<PathBuf> {
    config.validate()?;
    let policy = config.grid.retry.clone();

    info!("updating...");
    let index = archive::fetch_index(http_client(), &policy, &cancel).await?;
    let latest = index.latest().clone();
    info!(
        "latest version: {} GMT.",
        latest.time.format(DISPLAY_TIME_FORMAT)
    );

    let target = resolve_target_time(latest.time, config.auto_offset, config.offset)?;
    if config.auto_offset || config.offset != SATELLITE_UTC_OFFSET {
        info!("offset version: {} GMT.", target.format(DISPLAY_TIME_FORMAT));
    }

    let matched = closest_snapshot(index.snapshots(), target)
        .cloned()
        .ok_or_else(|| Error::Archive(String::from("the archive page listed no snapshots")))?;
    info!(
        "found closest match: {} GMT.",
        matched.time.format(DISPLAY_TIME_FORMAT)
    );

    // an unreadable composite base must fail before any download work
    let base = match &config.composite_over {
        Some(path) => {
            info!("opening image to composite over...");
            Some(open_base(path)?)
        }
        None => None,
    };

    let disk: RgbaImage = if config.tiles {
        let source = HimawariTileSource::new(config.level, matched.time);
        let downloader = GridDownloader::new(source, config.grid.clone());
        let tiles = downloader.download(config.level, &cancel).await?;
        assemble(&tiles, config.level)?
    } else {
        let url = index.download_url(&matched);
        info!("downloading image...");
        let bytes = fetch_with_retry(http_client(), &url, &policy, &cancel).await?;
        image::load_from_memory(&bytes)?.to_rgba8()
    };

    let final_image = match base {
        Some(base) => {
            info!("compositing over the base image...");
            composite_over(&base, &disk)
        }
        None => disk,
    };

    let path = write_output(&config.output_dir, &final_image, target)?;
    desktop::set_background(&path)?;
    Ok(path)
}
