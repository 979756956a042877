//! Snapshot archive listing: fetches the fixed full-disk archive page and
//! extracts the recency-ordered `(timestamp, download link)` rows the core
//! consumes. The page is a rigid generated table, so row extraction is
//! regex-based rather than a full HTML parse.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::sync::CancellationToken;

use crate::core::constants::{ARCHIVE_BASE_URL, ARCHIVE_PAGE_PATH, ARCHIVE_TIME_FORMAT};
use crate::core::snapshot::Snapshot;
use crate::tiles::fetcher::{fetch_with_retry, RetryPolicy};
use crate::{Error, Result};

static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<tr[^>]*>.*?</tr>").expect("row pattern"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}").expect("time pattern"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]+)""#).expect("link pattern"));

/// The archive page listing, most recent snapshot first.
#[derive(Debug, Clone)]
pub struct SnapshotIndex {
    snapshots: Vec<Snapshot>,
}

impl SnapshotIndex {
    /// Extracts every table row carrying both a `YYYY-MM-DD HH:MM` timestamp
    /// and a download link. Header and decoration rows carry neither and are
    /// skipped. A page with no usable rows is an [`Error::Archive`].
    pub fn parse(html: &str) -> Result<Self> {
        let mut snapshots = Vec::new();

        for row in ROW_RE.find_iter(html) {
            let row = row.as_str();
            let Some(time_match) = TIME_RE.find(row) else {
                continue;
            };
            let Some(link) = LINK_RE.captures(row).and_then(|c| c.get(1)) else {
                continue;
            };
            let Ok(time) =
                chrono::NaiveDateTime::parse_from_str(time_match.as_str(), ARCHIVE_TIME_FORMAT)
            else {
                continue;
            };
            snapshots.push(Snapshot::new(time, link.as_str()));
        }

        if snapshots.is_empty() {
            return Err(Error::Archive(String::from(
                "the archive page listed no snapshots",
            )));
        }

        debug!("archive page listed {} snapshots", snapshots.len());
        Ok(Self { snapshots })
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Most recent snapshot; the first data row of the page.
    pub fn latest(&self) -> &Snapshot {
        &self.snapshots[0]
    }

    /// Absolute download URL for one of this index's rows.
    pub fn download_url(&self, snapshot: &Snapshot) -> String {
        format!(
            "{}/{}",
            ARCHIVE_BASE_URL,
            snapshot.link.trim_start_matches('/')
        )
    }
}

/// URL of the archive page itself.
pub fn archive_page_url() -> String {
    format!("{ARCHIVE_BASE_URL}/{ARCHIVE_PAGE_PATH}")
}

/// Fetches and parses the archive page.
pub async fn fetch_index(
    client: &reqwest::Client,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<SnapshotIndex> {
    let bytes = fetch_with_retry(client, &archive_page_url(), policy, cancel).await?;
    SnapshotIndex::parse(&String::from_utf8_lossy(&bytes))
}
