use crate::error::{Error, Result};
use image::{Rgb, RgbImage};
use imageproc::filter::box_filter;
use imageproc::map::{blue_channel, green_channel, map_colors2, red_channel};

/// Normalized box blur with a `size` x `size` kernel (`size` odd).
///
/// Each channel goes through [`box_filter`] separately; borders repeat
/// the edge pixel.
pub fn box_blur(image: &RgbImage, size: u32) -> RgbImage {
    let _span = tracing::debug_span!("box_blur", size).entered();

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || size <= 1 {
        return image.clone();
    }

    let radius = size / 2;
    let red = box_filter(&red_channel(image), radius, radius);
    let green = box_filter(&green_channel(image), radius, radius);
    let blue = box_filter(&blue_channel(image), radius, radius);

    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            red.get_pixel(x, y)[0],
            green.get_pixel(x, y)[0],
            blue.get_pixel(x, y)[0],
        ])
    })
}

/// `saturate(round(alpha * a + beta * b + gamma))` per channel.
///
/// The weights are used as given, not renormalized.
pub fn add_weighted(
    a: &RgbImage,
    alpha: f64,
    b: &RgbImage,
    beta: f64,
    gamma: f64,
) -> Result<RgbImage> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::mismatch(a.dimensions(), b.dimensions()));
    }

    Ok(map_colors2(a, b, |pa: Rgb<u8>, pb: Rgb<u8>| {
        Rgb([0usize, 1, 2].map(|c| {
            let v = alpha * f64::from(pa[c]) + beta * f64::from(pb[c]) + gamma;
            v.round().clamp(0.0, 255.0) as u8
        }))
    }))
}
