//! Pixel-area resampling.
//!
//! `image` ships no area filter, so shrinking is done here with fractional
//! pixel coverage. Enlarging on either axis falls back to `Triangle`.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};

/// Resize `image` to `width` x `height` with area averaging.
pub fn resize_area(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_width, src_height) = image.dimensions();
    if (src_width, src_height) == (width, height) {
        return image.clone();
    }
    if width == 0 || height == 0 || width > src_width || height > src_height {
        return imageops::resize(image, width, height, FilterType::Triangle);
    }

    let _span = tracing::debug_span!("resize_area").entered();

    let column_taps = area_taps(src_width, width);
    let row_taps = area_taps(src_height, height);
    let (src_width, width) = (src_width as usize, width as usize);
    let raw = image.as_raw();

    // Horizontal pass: src_height rows of `width` pixels
    let mut rows = vec![0.0f32; src_height as usize * width * 3];
    for (y, src_row) in raw.chunks_exact(src_width * 3).enumerate() {
        for (dx, taps) in column_taps.iter().enumerate() {
            let out = (y * width + dx) * 3;
            for &(sx, weight) in taps {
                for c in 0..3 {
                    rows[out + c] += f32::from(src_row[sx * 3 + c]) * weight;
                }
            }
        }
    }

    // Vertical pass
    let mut output = RgbImage::new(width as u32, height);
    for (dy, taps) in row_taps.iter().enumerate() {
        for dx in 0..width {
            let mut acc = [0.0f32; 3];
            for &(sy, weight) in taps {
                let src = (sy * width + dx) * 3;
                for c in 0..3 {
                    acc[c] += rows[src + c] * weight;
                }
            }
            output.put_pixel(
                dx as u32,
                dy as u32,
                Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8)),
            );
        }
    }

    output
}

/// Source indices and coverage weights for each destination index.
/// Weights for one destination sum to 1.
fn area_taps(src: u32, dst: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|d| {
            let start = f64::from(d) * scale;
            let end = (start + scale).min(f64::from(src));
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src as usize);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-9).then(|| (s, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}
