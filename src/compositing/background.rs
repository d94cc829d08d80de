use crate::error::{Error, Result};
use crate::resample::resize_area;
use image::{imageops, GrayImage, Rgb, RgbImage};

/// Which dimension of the foreground the resized background matches exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Size and crop window that make a background cover a foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFit {
    /// Background size after resizing
    pub width: u32,
    pub height: u32,
    pub axis: FitAxis,
    /// Top-left corner of the crop window inside the resized background
    pub crop_x: u32,
    pub crop_y: u32,
}

/// Work out how to resize `background` so it covers `foreground`.
///
/// Both arguments are (width, height). The background is first scaled to
/// the foreground width; if that leaves it too short it is scaled to the
/// foreground height instead. The crop starts at the leftover margin on
/// each axis, so the bottom-right of the resized background is kept.
pub fn fit_to_cover(background: (u32, u32), foreground: (u32, u32)) -> Result<CoverFit> {
    let (bg_width, bg_height) = background;
    let (fg_width, fg_height) = foreground;
    if bg_width == 0 || bg_height == 0 || fg_width == 0 || fg_height == 0 {
        return Err(Error::invalid_shape(format!(
            "cannot fit {bg_width}x{bg_height} background to {fg_width}x{fg_height} foreground"
        )));
    }

    let too_large = || {
        Error::invalid_shape(format!(
            "covering {fg_width}x{fg_height} with a {bg_width}x{bg_height} background exceeds u32 dimensions"
        ))
    };

    // Integer arithmetic keeps equal aspect ratios on the width branch
    let scaled_height = u32::try_from(u64::from(bg_height) * u64::from(fg_width) / u64::from(bg_width))
        .map_err(|_| too_large())?;

    let (width, height, axis) = if scaled_height < fg_height {
        let width = u64::from(fg_width) * u64::from(fg_height) / u64::from(scaled_height.max(1));
        let width = u32::try_from(width.max(u64::from(fg_width))).map_err(|_| too_large())?;
        (width, fg_height, FitAxis::Height)
    } else {
        (fg_width, scaled_height, FitAxis::Width)
    };

    Ok(CoverFit {
        width,
        height,
        axis,
        crop_x: width - fg_width,
        crop_y: height - fg_height,
    })
}

/// Split the two sources through a background mask.
///
/// Returns `(foreground AND NOT mask, background AND mask)`. The mask is
/// applied literally: the background part keeps pixels whose mask value is
/// non-zero, the foreground part keeps pixels whose inverted mask value
/// (`255 - m`) is non-zero. For a {0, 255} mask every pixel lands in exactly
/// one part; an intermediate value keeps the pixel in both.
pub fn split_by_mask(
    foreground: &RgbImage,
    background: &RgbImage,
    background_mask: &GrayImage,
) -> Result<(RgbImage, RgbImage)> {
    if foreground.dimensions() != background_mask.dimensions() {
        return Err(Error::mismatch(
            foreground.dimensions(),
            background_mask.dimensions(),
        ));
    }
    if background.dimensions() != background_mask.dimensions() {
        return Err(Error::mismatch(
            background.dimensions(),
            background_mask.dimensions(),
        ));
    }

    let (width, height) = background_mask.dimensions();
    let black = Rgb([0, 0, 0]);
    let foreground_part = RgbImage::from_fn(width, height, |x, y| {
        if background_mask.get_pixel(x, y)[0] != u8::MAX {
            *foreground.get_pixel(x, y)
        } else {
            black
        }
    });
    let background_part = RgbImage::from_fn(width, height, |x, y| {
        if background_mask.get_pixel(x, y)[0] != 0 {
            *background.get_pixel(x, y)
        } else {
            black
        }
    });

    Ok((foreground_part, background_part))
}

/// Pixel-wise OR of the two parts from [`split_by_mask`]
pub fn merge_parts(foreground_part: &RgbImage, background_part: &RgbImage) -> RgbImage {
    RgbImage::from_fn(foreground_part.width(), foreground_part.height(), |x, y| {
        let (f, b) = (foreground_part.get_pixel(x, y), background_part.get_pixel(x, y));
        Rgb([f[0] | b[0], f[1] | b[1], f[2] | b[2]])
    })
}

/// Put `background` behind the subject of `foreground`.
///
/// `background_mask` is the foreground's restored background class at the
/// foreground's size. The background is resized to cover the foreground,
/// cropped to its size and selected wherever the mask is set. There is no
/// feathering.
pub fn replace_background(
    background: &RgbImage,
    foreground: &RgbImage,
    background_mask: &GrayImage,
) -> Result<RgbImage> {
    let _span = tracing::debug_span!("replace_background").entered();

    if foreground.dimensions() != background_mask.dimensions() {
        return Err(Error::mismatch(
            foreground.dimensions(),
            background_mask.dimensions(),
        ));
    }

    let (fg_width, fg_height) = foreground.dimensions();
    let fit = fit_to_cover(background.dimensions(), foreground.dimensions())?;

    tracing::debug!(
        "Fitting {}x{} background to {:?}: resize to {}x{}, crop at ({}, {})",
        background.width(),
        background.height(),
        fit.axis,
        fit.width,
        fit.height,
        fit.crop_x,
        fit.crop_y
    );

    let resized = resize_area(background, fit.width, fit.height);
    let cropped = imageops::crop_imm(&resized, fit.crop_x, fit.crop_y, fg_width, fg_height).to_image();

    let (foreground_part, background_part) = split_by_mask(foreground, &cropped, background_mask)?;
    Ok(merge_parts(&foreground_part, &background_part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn wide_background_fits_to_height() {
        // 512x384 portrait, 1024x512 background
        let fit = fit_to_cover((1024, 512), (512, 384)).unwrap();
        assert_eq!(fit.axis, FitAxis::Height);
        assert_eq!((fit.width, fit.height), (768, 384));
        assert_eq!(fit.crop_y, 0);
        assert_eq!(fit.crop_x, 256);
    }

    #[test]
    fn tall_background_fits_to_width() {
        let fit = fit_to_cover((400, 1000), (200, 200)).unwrap();
        assert_eq!(fit.axis, FitAxis::Width);
        assert_eq!((fit.width, fit.height), (200, 500));
        assert_eq!((fit.crop_x, fit.crop_y), (0, 300));
    }

    #[test]
    fn equal_aspect_ratio_needs_no_crop() {
        for (background, foreground) in [((1024, 768), (512, 384)), ((300, 225), (200, 150)), ((99, 33), (300, 100))] {
            let fit = fit_to_cover(background, foreground).unwrap();
            assert_eq!(fit.axis, FitAxis::Width, "{background:?} -> {foreground:?}");
            assert_eq!((fit.width, fit.height), foreground);
            assert_eq!((fit.crop_x, fit.crop_y), (0, 0));
        }
    }

    #[test]
    fn fit_always_covers_foreground() {
        for background in [(1, 1000), (1000, 1), (640, 480), (333, 777), (5000, 20)] {
            for foreground in [(512, 384), (1, 1), (17, 300), (1920, 1080)] {
                let fit = fit_to_cover(background, foreground).unwrap();
                assert!(fit.width >= foreground.0 && fit.height >= foreground.1);
                assert_eq!(fit.width - fit.crop_x, foreground.0);
                assert_eq!(fit.height - fit.crop_y, foreground.1);
            }
        }
    }

    #[test]
    fn fit_rejects_empty_images() {
        assert!(matches!(
            fit_to_cover((0, 10), (10, 10)),
            Err(Error::InvalidImageShape { .. })
        ));
    }

    #[test]
    fn fit_rejects_sizes_beyond_u32() {
        // Height branch: width would be 65536 * 65536
        assert!(matches!(
            fit_to_cover((65536, 1), (65536, 65536)),
            Err(Error::InvalidImageShape { .. })
        ));
        // Width branch: scaled height would be 65536 * 65536
        assert!(matches!(
            fit_to_cover((1, 65536), (65536, 10)),
            Err(Error::InvalidImageShape { .. })
        ));
    }

    #[test]
    fn split_keeps_intermediate_mask_values_in_both_parts() {
        let foreground = RgbImage::from_pixel(2, 1, Rgb([0x0f, 0x0f, 0x0f]));
        let background = RgbImage::from_pixel(2, 1, Rgb([0xf0, 0xf0, 0xf0]));
        let mask = GrayImage::from_fn(2, 1, |x, _| if x == 0 { Luma([128]) } else { Luma([255]) });

        let (fg_part, bg_part) = split_by_mask(&foreground, &background, &mask).unwrap();

        assert_eq!(fg_part.get_pixel(0, 0), &Rgb([0x0f, 0x0f, 0x0f]));
        assert_eq!(bg_part.get_pixel(0, 0), &Rgb([0xf0, 0xf0, 0xf0]));
        assert_eq!(merge_parts(&fg_part, &bg_part).get_pixel(0, 0), &Rgb([0xff, 0xff, 0xff]));

        assert_eq!(fg_part.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(bg_part.get_pixel(1, 0), &Rgb([0xf0, 0xf0, 0xf0]));
    }

    #[test]
    fn split_partitions_every_pixel() {
        let foreground = RgbImage::from_fn(8, 6, |x, y| Rgb([x as u8 + 1, y as u8 + 1, 200]));
        let background = RgbImage::from_pixel(8, 6, Rgb([9, 8, 7]));
        let mask = GrayImage::from_fn(8, 6, |x, y| {
            if (x + y) % 3 == 0 {
                Luma([255])
            } else {
                Luma([0])
            }
        });

        let (fg_part, bg_part) = split_by_mask(&foreground, &background, &mask).unwrap();
        let merged = merge_parts(&fg_part, &bg_part);

        for (x, y, pixel) in merged.enumerate_pixels() {
            let fg_set = fg_part.get_pixel(x, y).0 != [0, 0, 0];
            let bg_set = bg_part.get_pixel(x, y).0 != [0, 0, 0];
            assert!(fg_set ^ bg_set, "pixel ({x}, {y})");
            let chosen = if fg_set { fg_part.get_pixel(x, y) } else { bg_part.get_pixel(x, y) };
            assert_eq!(pixel, chosen);
            assert_eq!(bg_set, mask.get_pixel(x, y)[0] == 255);
        }
    }

    #[test]
    fn replace_keeps_foreground_size_and_crops_bottom_right() {
        // Left half red, right half blue
        let background = RgbImage::from_fn(1024, 512, |x, _| {
            if x < 512 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let foreground = RgbImage::from_pixel(512, 384, Rgb([0, 255, 0]));
        let mask = GrayImage::from_fn(512, 384, |x, _| if x < 256 { Luma([255]) } else { Luma([0]) });

        let result = replace_background(&background, &foreground, &mask).unwrap();

        assert_eq!(result.dimensions(), (512, 384));
        // Resized to 768x384 with red up to x = 384; the crop starts at x = 256.
        // A centered crop would start at x = 128 and show red at 200.
        assert_eq!(result.get_pixel(10, 100), &Rgb([255, 0, 0]));
        assert_eq!(result.get_pixel(200, 100), &Rgb([0, 0, 255]));
        assert_eq!(result.get_pixel(500, 100), &Rgb([0, 255, 0]));
    }

    #[test]
    fn replace_handles_tall_background() {
        let background = RgbImage::from_pixel(300, 900, Rgb([40, 50, 60]));
        let foreground = RgbImage::from_pixel(120, 80, Rgb([1, 2, 3]));
        let mask = GrayImage::from_pixel(120, 80, Luma([255]));

        let result = replace_background(&background, &foreground, &mask).unwrap();
        assert_eq!(result.dimensions(), (120, 80));
        assert!(result.pixels().all(|p| *p == Rgb([40, 50, 60])));
    }

    #[test]
    fn replace_rejects_mask_of_wrong_size() {
        let background = RgbImage::new(10, 10);
        let foreground = RgbImage::new(10, 10);
        let mask = GrayImage::new(5, 10);
        assert!(matches!(
            replace_background(&background, &foreground, &mask),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
