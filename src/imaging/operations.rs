//! Pixel operations used to build a variant.
//!
//! | Step | Function | `image` API |
//! |---|---|---|
//! | Fill (resize + center crop) | [`fill`] | `DynamicImage::resize_to_fill`, Lanczos3 |
//! | Fit (no crop) | [`fit`] | `DynamicImage::resize_exact`, Lanczos3 |
//! | Backdrop composite | [`compose_on_backdrop`] | `imageops::overlay` |
//! | Watermark | [`overlay_watermark`] | `imageops::overlay` |

use super::calculations::{calculate_fit_dimensions, center_origin, watermark_origin};
use crate::dimensions::{Dimensions, WatermarkPosition};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Backdrop color used when the backdrop asset can't be loaded: deep navy
/// with zero alpha.
pub const FALLBACK_BACKDROP: Rgba<u8> = Rgba([0, 29, 56, 0]);

const FILTER: FilterType = FilterType::Lanczos3;

fn size_of(image: &impl GenericImageView) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions { width, height }
}

/// Resize to cover `target`, then crop the center to exactly `target`.
pub fn fill(image: &DynamicImage, target: Dimensions) -> DynamicImage {
    image.resize_to_fill(target.width, target.height, FILTER)
}

/// Shrink to fit inside `bounds` keeping the aspect ratio. No cropping.
pub fn fit(image: &DynamicImage, bounds: Dimensions) -> DynamicImage {
    let source = size_of(image);
    let fitted = calculate_fit_dimensions(source, bounds);
    if fitted == source {
        return image.clone();
    }
    image.resize_exact(fitted.width, fitted.height, FILTER)
}

/// Solid canvas in [`FALLBACK_BACKDROP`].
pub fn fallback_backdrop(target: Dimensions) -> RgbaImage {
    RgbaImage::from_pixel(target.width, target.height, FALLBACK_BACKDROP)
}

/// Draw `foreground` centered on `backdrop` at full opacity.
pub fn compose_on_backdrop(mut backdrop: RgbaImage, foreground: &DynamicImage) -> RgbaImage {
    let top = foreground.to_rgba8();
    let (x, y) = center_origin(size_of(&backdrop), size_of(&top));
    imageops::overlay(&mut backdrop, &top, x, y);
    backdrop
}

/// Draw `mark` on `background` at the anchored position. Parts of the mark
/// outside the background are clipped.
pub fn overlay_watermark(
    background: DynamicImage,
    mark: &DynamicImage,
    position: &WatermarkPosition,
) -> DynamicImage {
    let mut canvas = background.into_rgba8();
    let top = mark.to_rgba8();
    let (x, y) = watermark_origin(size_of(&canvas), size_of(&top), position);
    imageops::overlay(&mut canvas, &top, x, y);
    DynamicImage::ImageRgba8(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient, solid};

    fn rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(gradient(width, height))
    }

    #[test]
    fn fill_produces_exact_target() {
        let out = fill(&rgb(400, 300), Dimensions::new(100, 100));
        assert_eq!(out.dimensions(), (100, 100));
    }

    #[test]
    fn fill_portrait_to_landscape_box() {
        let out = fill(&rgb(300, 400), Dimensions::new(120, 60));
        assert_eq!(out.dimensions(), (120, 60));
    }

    #[test]
    fn fit_preserves_aspect() {
        let out = fit(&rgb(300, 600), Dimensions::new(100, 100));
        assert_eq!(out.dimensions(), (50, 100));
    }

    #[test]
    fn fit_returns_source_when_it_already_fits() {
        let out = fit(&rgb(40, 80), Dimensions::new(40, 80));
        assert_eq!(out.dimensions(), (40, 80));
    }

    #[test]
    fn compose_centers_foreground() {
        let backdrop = fallback_backdrop(Dimensions::new(100, 100));
        let fg = DynamicImage::ImageRgba8(solid(50, 100, [255, 0, 0, 255]));
        let out = compose_on_backdrop(backdrop, &fg);

        assert_eq!(out.dimensions(), (100, 100));
        // Margins keep the fallback, center is foreground.
        assert_eq!(*out.get_pixel(0, 50), FALLBACK_BACKDROP);
        assert_eq!(*out.get_pixel(99, 50), FALLBACK_BACKDROP);
        assert_eq!(*out.get_pixel(50, 50), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(25, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(24, 0), FALLBACK_BACKDROP);
    }

    #[test]
    fn watermark_lands_at_anchor() {
        let bg = DynamicImage::ImageRgba8(solid(200, 100, [0, 0, 0, 255]));
        let mark = DynamicImage::ImageRgba8(solid(20, 10, [255, 255, 255, 255]));
        let out = overlay_watermark(bg, &mark, &WatermarkPosition::BOTTOM_RIGHT.offset(5, 5));
        let out = out.to_rgba8();

        assert_eq!(*out.get_pixel(175, 85), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(194, 94), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(174, 85), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(195, 95), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn watermark_off_canvas_is_clipped() {
        let bg = DynamicImage::ImageRgba8(solid(10, 10, [0, 0, 0, 255]));
        let mark = DynamicImage::ImageRgba8(solid(20, 20, [255, 255, 255, 255]));
        let out = overlay_watermark(bg, &mark, &WatermarkPosition::TOP_LEFT.offset(-15, -15));
        let out = out.to_rgba8();

        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(*out.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*out.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }
}
