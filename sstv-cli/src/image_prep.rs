//! Image loading, RGBA compositing, aspect-preserving resize with white
//! letterbox padding, and grayscale derivation ahead of the core.

use color_eyre::eyre::{Context, Result};
use image::{imageops::FilterType, GenericImageView, Rgba, RgbaImage};
use std::path::Path;

use sstv_core::image::jfif_luma;
use sstv_core::{LumaImage, PixelField, RgbImage};

/// Loads `path`, flattens any alpha over white, fits it into
/// `(width, height)` preserving aspect ratio, and pads the remainder
/// with white. `grayscale` selects whether the result is a `Luma` or
/// `Rgb` pixel field, matching the target mode's family.
pub fn load_and_fit(path: &Path, width: usize, height: usize, grayscale: bool) -> Result<PixelField> {
    let source = image::open(path).wrap_err_with(|| format!("failed to open image {}", path.display()))?;
    let (src_w, src_h) = source.dimensions();

    let scale = (width as f64 / src_w as f64).min(height as f64 / src_h as f64);
    let fit_w = ((src_w as f64 * scale).round() as u32).clamp(1, width as u32);
    let fit_h = ((src_h as f64 * scale).round() as u32).clamp(1, height as u32);

    let resized = source.resize_exact(fit_w, fit_h, FilterType::Lanczos3).to_rgba8();

    let mut canvas = RgbaImage::from_pixel(width as u32, height as u32, Rgba([255, 255, 255, 255]));
    let x_off = (width as u32 - fit_w) / 2;
    let y_off = (height as u32 - fit_h) / 2;
    image::imageops::overlay(&mut canvas, &resized, x_off as i64, y_off as i64);

    let mut r = Vec::with_capacity(width * height);
    let mut g = Vec::with_capacity(width * height);
    let mut b = Vec::with_capacity(width * height);
    for y in 0..height as u32 {
        for x in 0..width as u32 {
            let px = canvas.get_pixel(x, y);
            let alpha = px[3] as f64 / 255.0;
            // Flatten alpha over a white backdrop: transparent pixels
            // read as white, matching the letterbox fill.
            r.push((px[0] as f64 / 255.0) * alpha + (1.0 - alpha));
            g.push((px[1] as f64 / 255.0) * alpha + (1.0 - alpha));
            b.push((px[2] as f64 / 255.0) * alpha + (1.0 - alpha));
        }
    }

    if grayscale {
        let luma = r.iter().zip(&g).zip(&b).map(|((&r, &g), &b)| jfif_luma(r, g, b)).collect();
        Ok(PixelField::Luma(LumaImage::new(width, height, luma)))
    } else {
        Ok(PixelField::Rgb(RgbImage::new(width, height, r, g, b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba as ImgRgba};

    fn write_solid_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
        let img: ImageBuffer<ImgRgba<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, ImgRgba(rgba));
        img.save(path).unwrap();
    }

    #[test]
    fn letterboxed_image_matches_target_dimensions() {
        let dir = tempdir();
        let path = dir.join("solid.png");
        write_solid_png(&path, 100, 50, [255, 0, 0, 255]);

        let field = load_and_fit(&path, 160, 120, false).unwrap();
        assert_eq!(field.width(), 160);
        assert_eq!(field.height(), 120);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn grayscale_request_yields_luma_field() {
        let dir = tempdir();
        let path = dir.join("solid_gray.png");
        write_solid_png(&path, 160, 120, [128, 128, 128, 255]);

        let field = load_and_fit(&path, 160, 120, true).unwrap();
        assert!(matches!(field, PixelField::Luma(_)));
        std::fs::remove_file(&path).ok();
    }

    fn tempdir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("sstv-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
