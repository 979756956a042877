//! Compositing the full-disk image onto a user-supplied base picture.
//!
//! The disk is resized to fit inside the base, centered on a black canvas of
//! the base's size, and stencilled through a blurred circular mask so that
//! the globe blends into the base with a soft edge.

use std::path::Path;

use image::{imageops, imageops::FilterType, GrayImage, Luma, Rgba, RgbaImage};
use log::debug;

use crate::{Error, Result};

/// Factor shaving the mask radius just inside the disk edge so the blur
/// never samples the black corners of the resized square.
const MASK_RADIUS_FACTOR: f64 = 0.988;

/// Standard deviation of the Gaussian softening the mask edge.
const MASK_BLUR_SIGMA: f32 = 2.0;

/// Opens the base image; an unreadable file fails the run before any
/// download work is spent.
pub fn open_base(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::CompositeSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Composites `disk` over `base` behind a centered, soft-edged circular
/// mask. Pixels inside the circle take the (resized) satellite image, pixels
/// outside keep the base, and the blurred rim fades between the two.
pub fn composite_over(base: &RgbaImage, disk: &RgbaImage) -> RgbaImage {
    let (base_w, base_h) = base.dimensions();
    let (disk_w, disk_h) = disk.dimensions();

    let ratio = f64::min(
        f64::from(base_w) / f64::from(disk_w),
        f64::from(base_h) / f64::from(disk_h),
    );
    let resized_w = (f64::from(disk_w) * ratio).round() as u32;
    let resized_h = (f64::from(disk_h) * ratio).round() as u32;
    debug!("resizing disk by {ratio:.4} to {resized_w}x{resized_h}");

    let resized = imageops::resize(disk, resized_w, resized_h, FilterType::Lanczos3);

    // resized disk centered on a black canvas the size of the base
    let mut centered = RgbaImage::from_pixel(base_w, base_h, Rgba([0, 0, 0, 255]));
    imageops::replace(
        &mut centered,
        &resized,
        i64::from((base_w - resized_w) / 2),
        i64::from((base_h - resized_h) / 2),
    );

    let radius = f64::from(resized_w.min(resized_h)) * MASK_RADIUS_FACTOR / 2.0;
    let mask = circular_mask(base_w, base_h, radius);

    let mut out = base.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let m = u32::from(mask.get_pixel(x, y)[0]);
        if m == 0 {
            continue;
        }
        let overlay = centered.get_pixel(x, y);
        for channel in 0..3 {
            let b = u32::from(pixel[channel]);
            let o = u32::from(overlay[channel]);
            pixel[channel] = ((o * m + b * (255 - m) + 127) / 255) as u8;
        }
        pixel[3] = 255;
    }
    out
}

/// Single-channel stencil: black field, centered white filled circle of the
/// given radius, Gaussian-blurred to soften the edge.
fn circular_mask(width: u32, height: u32, radius: f64) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([0]));
    let cx = f64::from(width) / 2.0;
    let cy = f64::from(height) / 2.0;

    for y in 0..height {
        let dy = f64::from(y) + 0.5 - cy;
        if dy.abs() > radius {
            continue;
        }
        let half_span = (radius * radius - dy * dy).sqrt();
        let x0 = (cx - half_span).ceil().max(0.0) as u32;
        let x1 = (cx + half_span).floor().min(f64::from(width) - 1.0) as u32;
        for x in x0..=x1 {
            mask.put_pixel(x, y, Luma([255]));
        }
    }

    imageops::blur(&mask, MASK_BLUR_SIGMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_disk(side: u32) -> RgbaImage {
        RgbaImage::from_fn(side, side, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([220, 40, 40, 255])
            } else {
                Rgba([40, 40, 220, 255])
            }
        })
    }

    #[test]
    fn center_shows_the_disk_and_corners_keep_the_base() {
        let base = RgbaImage::from_pixel(64, 48, Rgba([7, 99, 7, 255]));
        let disk = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));

        let out = composite_over(&base, &disk);
        assert_eq!(out.dimensions(), (64, 48));

        // well inside the circle: pure disk content
        let center = out.get_pixel(32, 24);
        assert_eq!(center[0], 255);
        assert_eq!(center[1], 255);

        // corners lie far outside the mask: untouched base
        for &(x, y) in &[(0, 0), (63, 0), (0, 47), (63, 47)] {
            assert_eq!(*out.get_pixel(x, y), Rgba([7, 99, 7, 255]));
        }
    }

    #[test]
    fn mask_edge_is_soft() {
        let base = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        let disk = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        let out = composite_over(&base, &disk);

        // somewhere along the horizontal radius there must be a blend value
        // strictly between base and overlay
        let y = 32;
        let soft = (0..64).any(|x| {
            let v = out.get_pixel(x, y)[0];
            v > 10 && v < 245
        });
        assert!(soft, "expected a blurred rim between disk and base");
    }

    #[test]
    fn compositing_is_deterministic() {
        let base = checker_disk(48);
        let disk = checker_disk(40);

        let first = composite_over(&base, &disk);
        let second = composite_over(&base, &disk);
        assert_eq!(first.as_raw(), second.as_raw());
    }
}
