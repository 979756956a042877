use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::RgbaImage;
use log::{debug, info};

use crate::core::constants::{OUTPUT_GLOB_PREFIX, OUTPUT_TIME_FORMAT};
use crate::Result;

/// Writes the final image as `himawari-<target>.png` inside `dir`, then
/// prunes every other `himawari-*.png` there. Exactly one live output file
/// survives, and stale files are only removed after the new one exists, so a
/// failed run never leaves the directory empty.
pub fn write_output(dir: &Path, image: &RgbaImage, target: NaiveDateTime) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let name = format!(
        "{}{}.png",
        OUTPUT_GLOB_PREFIX,
        target.format(OUTPUT_TIME_FORMAT)
    );
    let path = dir.join(name);

    info!("saving to '{}'...", path.display());
    image.save(&path)?;
    prune_stale(dir, &path)?;

    Ok(path)
}

fn prune_stale(dir: &Path, keep: &Path) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path == keep {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(OUTPUT_GLOB_PREFIX) && name.ends_with(".png") {
            debug!("removing stale output '{}'", path.display());
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use image::Rgba;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("himawall-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn keeps_exactly_the_newest_file() {
        let dir = scratch_dir("prune");
        let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

        let first = write_output(&dir, &image, ts(1, 3)).unwrap();
        assert!(first.exists());

        let second = write_output(&dir, &image, ts(2, 5)).unwrap();
        assert!(second.exists());
        assert!(!first.exists());
        assert_eq!(
            second.file_name().and_then(|n| n.to_str()),
            Some("himawari-20240302T050000.png")
        );

        let survivors: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(survivors.len(), 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn leaves_unrelated_files_alone() {
        let dir = scratch_dir("unrelated");
        fs::create_dir_all(&dir).unwrap();
        let bystander = dir.join("notes.txt");
        fs::write(&bystander, b"keep me").unwrap();

        let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        write_output(&dir, &image, ts(1, 3)).unwrap();

        assert!(bystander.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
