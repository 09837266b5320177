//! Image output.
//!
//! The renderer accumulates linear HDR values; this module writes them out
//! either as 8-bit PNG with an sRGB transfer curve applied, or as OpenEXR
//! keeping the full linear range for downstream grading. I/O failures are
//! logged, never panicked on.

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{info, warn};

/// Map a linear value to the sRGB transfer curve.
///
/// Linear segment below 0.0031308, power curve above, per the sRGB standard.
fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Save a linear HDR image as 8-bit PNG.
///
/// Values are clamped to [0, 1] and pushed through the sRGB transfer curve;
/// out-of-range highlights clip to white.
pub fn save_image_as_png(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let (width, height) = image.dimensions();
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb([
            (linear_to_srgb(pixel[0].clamp(0.0, 1.0)) * 255.0) as u8,
            (linear_to_srgb(pixel[1].clamp(0.0, 1.0)) * 255.0) as u8,
            (linear_to_srgb(pixel[2].clamp(0.0, 1.0)) * 255.0) as u8,
        ])
    });

    match u8_image.save(output_path) {
        Ok(()) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save a linear HDR image as OpenEXR, with no tone mapping or gamma.
pub fn save_image_as_exr(image: &ImageBuffer<Rgb<f32>, Vec<f32>>, output_path: &str) {
    let (width, height) = image.dimensions();
    let result = write_rgb_file(output_path, width as usize, height as usize, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    });

    match result {
        Ok(()) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}
