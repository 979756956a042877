//! Engine-wide magic numbers and endpoints in a single place.

/// Native width of the assembled full-disk image in pixels.
pub const WIDTH: u32 = 11000;

/// Native height of the assembled full-disk image in pixels.
pub const HEIGHT: u32 = 11000;

/// Archive host serving the snapshot listing and per-snapshot full images.
pub const ARCHIVE_BASE_URL: &str = "http://rammb.cira.colostate.edu/ramsdis/online";

/// Query path of the full-disk natural-color archive page.
pub const ARCHIVE_PAGE_PATH: &str =
    "archive_hi_res.asp?data_folder=himawari-8/full_disk_ahi_natural_color&width=800&height=800";

/// Tile server for the gridded variant of the protocol.
pub const TILE_BASE_URL: &str = "http://himawari8.nict.go.jp";

/// Imagery product identifier used by the tile server.
pub const TILE_PRODUCT: &str = "D531106";

/// The satellite expresses all snapshot timestamps in UTC+10:00.
pub const SATELLITE_UTC_OFFSET: i32 = 10;

/// Inclusive domain of a user-requested UTC offset in hours.
pub const MIN_UTC_OFFSET: i32 = -12;
pub const MAX_UTC_OFFSET: i32 = SATELLITE_UTC_OFFSET;

/// Grid sides accepted by the tile server.
pub const LEVELS: [u32; 4] = [4, 8, 16, 20];

/// Timestamp layout inside tile URLs.
pub const TILE_TIME_FORMAT: &str = "%Y/%m/%d/%H%M%S";

/// Timestamp layout of the archive listing rows.
pub const ARCHIVE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Output file name pattern; exactly one such file is kept alive.
pub const OUTPUT_GLOB_PREFIX: &str = "himawari-";
pub const OUTPUT_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
