use fxhash::FxHashMap;
use image::{imageops, RgbaImage};

use crate::core::geo::{Level, TileCoord};
use crate::{Error, Result};

/// Stitches a fully downloaded tile grid into one canvas. Each tile lands at
/// `(x · side, y · side)` in pixel space; the canvas dimensions follow from
/// the decoded tile size, which is `WIDTH / level` at native resolution.
/// Every coordinate must be present and all tiles must share one size.
pub fn assemble(tiles: &FxHashMap<TileCoord, Vec<u8>>, level: Level) -> Result<RgbaImage> {
    let side = level.side();
    let mut decoded = Vec::with_capacity(level.tile_count() as usize);
    let mut tile_size: Option<(u32, u32)> = None;

    for coord in level.coords() {
        let bytes = tiles.get(&coord).ok_or_else(|| {
            Error::Validation(format!(
                "tile ({}, {}) missing from the downloaded grid",
                coord.x, coord.y
            ))
        })?;
        let tile = image::load_from_memory(bytes)?.to_rgba8();

        match tile_size {
            Some(size) if tile.dimensions() != size => {
                return Err(Error::Validation(format!(
                    "tile ({}, {}) is {}x{}, expected {}x{}",
                    coord.x,
                    coord.y,
                    tile.width(),
                    tile.height(),
                    size.0,
                    size.1
                )));
            }
            None => tile_size = Some(tile.dimensions()),
            _ => {}
        }
        decoded.push((coord, tile));
    }

    let (tile_w, tile_h) =
        tile_size.ok_or_else(|| Error::Validation(String::from("empty tile grid")))?;

    let mut canvas = RgbaImage::new(tile_w * side, tile_h * side);
    for (coord, tile) in decoded {
        imageops::replace(
            &mut canvas,
            &tile,
            i64::from(coord.x * tile_w),
            i64::from(coord.y * tile_h),
        );
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let tile = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        tile.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn tile_color(coord: TileCoord) -> [u8; 4] {
        [coord.x as u8 * 40, coord.y as u8 * 40, 200, 255]
    }

    #[test]
    fn every_pixel_belongs_to_its_tile() {
        let level = Level::new(4).unwrap();
        let mut tiles = FxHashMap::default();
        for coord in level.coords() {
            tiles.insert(coord, solid_png(8, 8, tile_color(coord)));
        }

        let canvas = assemble(&tiles, level).unwrap();
        assert_eq!(canvas.dimensions(), (32, 32));

        for coord in level.coords() {
            let expected = Rgba(tile_color(coord));
            // corners and center of the region owned by this tile
            for (dx, dy) in [(0, 0), (7, 0), (0, 7), (7, 7), (3, 4)] {
                let px = canvas.get_pixel(coord.x * 8 + dx, coord.y * 8 + dy);
                assert_eq!(*px, expected, "tile ({}, {})", coord.x, coord.y);
            }
        }
    }

    #[test]
    fn missing_tile_is_an_error() {
        let level = Level::new(4).unwrap();
        let mut tiles = FxHashMap::default();
        for coord in level.coords() {
            tiles.insert(coord, solid_png(8, 8, [0, 0, 0, 255]));
        }
        tiles.remove(&TileCoord::new(2, 1));

        assert!(matches!(
            assemble(&tiles, level),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn mismatched_tile_size_is_an_error() {
        let level = Level::new(4).unwrap();
        let mut tiles = FxHashMap::default();
        for coord in level.coords() {
            tiles.insert(coord, solid_png(8, 8, [10, 10, 10, 255]));
        }
        tiles.insert(TileCoord::new(3, 3), solid_png(9, 8, [10, 10, 10, 255]));

        assert!(assemble(&tiles, level).is_err());
    }
}
