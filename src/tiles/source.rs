use chrono::NaiveDateTime;

use crate::core::constants::{TILE_BASE_URL, TILE_PRODUCT, TILE_TIME_FORMAT, WIDTH};
use crate::core::geo::{Level, TileCoord};

/// Trait representing anything that can produce tile URLs for a given
/// grid coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Tile source for the Himawari-8 real-time tile server. URLs carry the grid
/// side, the native pixel width and the snapshot's satellite-native
/// timestamp.
pub struct HimawariTileSource {
    level: Level,
    time: NaiveDateTime,
}

impl HimawariTileSource {
    pub fn new(level: Level, time: NaiveDateTime) -> Self {
        Self { level, time }
    }
}

impl TileSource for HimawariTileSource {
    fn url(&self, coord: TileCoord) -> String {
        format!(
            "{}/img/{}/{}d/{}/{}_{}_{}.png",
            TILE_BASE_URL,
            TILE_PRODUCT,
            self.level,
            WIDTH,
            self.time.format(TILE_TIME_FORMAT),
            coord.x,
            coord.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn formats_the_tile_url() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        let source = HimawariTileSource::new(Level::new(4).unwrap(), time);
        assert_eq!(
            source.url(TileCoord::new(2, 3)),
            "http://himawari8.nict.go.jp/img/D531106/4d/11000/2024/03/01/030000_2_3.png"
        );
    }
}
