use super::filters::{add_weighted, box_blur};
use crate::error::{Error, Result};
use image::{GrayImage, Rgb, RgbImage};

/// Weight of the original portrait in the blend
pub const ORIGINAL_WEIGHT: f64 = 0.9;

/// Weight of the blurred color layer in the blend
pub const TINT_WEIGHT: f64 = 0.22;

/// Side of the averaging kernel that softens the mask edge
pub const EDGE_BLUR_SIZE: u32 = 9;

/// Tint the hair region of `image` with `color`.
///
/// The color layer is cut out with `hair_mask`, blurred 9x9 to hide the
/// blocky mask edge, and added on top of the portrait as
/// `0.9 * original + 0.22 * layer`. The weights intentionally sum to more
/// than one; channels saturate at 255.
pub fn recolor_hair(image: &RgbImage, hair_mask: &GrayImage, color: Rgb<u8>) -> Result<RgbImage> {
    let _span = tracing::debug_span!("recolor_hair").entered();

    if image.dimensions() != hair_mask.dimensions() {
        return Err(Error::mismatch(image.dimensions(), hair_mask.dimensions()));
    }

    let (width, height) = hair_mask.dimensions();
    let layer = RgbImage::from_fn(width, height, |x, y| {
        if hair_mask.get_pixel(x, y)[0] != 0 {
            color
        } else {
            Rgb([0, 0, 0])
        }
    });

    let softened = box_blur(&layer, EDGE_BLUR_SIZE);

    tracing::debug!(
        "Recoloring hair with {:?} over {}x{}",
        color.0,
        width,
        height
    );

    add_weighted(image, ORIGINAL_WEIGHT, &softened, TINT_WEIGHT, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn expected(channel: u8) -> u8 {
        (ORIGINAL_WEIGHT * 255.0 + TINT_WEIGHT * f64::from(channel))
            .round()
            .min(255.0) as u8
    }

    #[test]
    fn full_mask_on_white_matches_blend_weights() {
        let image = RgbImage::from_pixel(32, 24, Rgb([255, 255, 255]));
        let mask = GrayImage::from_pixel(32, 24, Luma([255]));
        let color = Rgb([255, 10, 60]);

        let result = recolor_hair(&image, &mask, color).unwrap();

        let want = Rgb([expected(255), expected(10), expected(60)]);
        assert_eq!(want, Rgb([255, 232, 243]));
        assert!(result.pixels().all(|p| *p == want));
    }

    #[test]
    fn empty_mask_only_dims_the_portrait() {
        let image = RgbImage::from_pixel(16, 16, Rgb([100, 200, 30]));
        let mask = GrayImage::new(16, 16);

        let result = recolor_hair(&image, &mask, Rgb([255, 0, 0])).unwrap();
        // 0.9 * [100, 200, 30]
        assert!(result.pixels().all(|p| *p == Rgb([90, 180, 27])));
    }

    #[test]
    fn tint_fades_out_past_the_mask_edge() {
        let image = RgbImage::from_pixel(40, 10, Rgb([100, 100, 100]));
        let mask = GrayImage::from_fn(40, 10, |x, _| if x < 20 { Luma([255]) } else { Luma([0]) });

        let result = recolor_hair(&image, &mask, Rgb([200, 200, 200])).unwrap();

        let inside = result.get_pixel(5, 5)[0];
        let edge = result.get_pixel(20, 5)[0];
        let outside = result.get_pixel(35, 5)[0];
        // 90 + 44 inside, 90 outside
        assert_eq!(inside, 134);
        assert_eq!(outside, 90);
        assert!(outside < edge && edge < inside);
    }

    #[test]
    fn rejects_mask_of_wrong_size() {
        let image = RgbImage::new(10, 10);
        let mask = GrayImage::new(10, 9);
        assert!(matches!(
            recolor_hair(&image, &mask, Rgb([1, 2, 3])),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
