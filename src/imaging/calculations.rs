//! Pure calculation functions for variant geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::dimensions::{Dimensions, Horizontal, Vertical, WatermarkPosition};

/// Cap a requested size to the original, each axis independently.
///
/// Variants are never upscaled: a 300×300 request against a 200×400
/// original yields 200×300.
pub fn cap_to_original(requested: Dimensions, original: Dimensions) -> Dimensions {
    Dimensions {
        width: requested.width.min(original.width),
        height: requested.height.min(original.height),
    }
}

/// Landscape means strictly wider than tall; squares are not landscape.
pub fn is_landscape(original: Dimensions) -> bool {
    original.height < original.width
}

/// Largest size with the source's aspect ratio that fits inside `bounds`.
///
/// Never grows the source: if it already fits, its own size is returned.
/// The bounding side takes the bound exactly; the other side is truncated,
/// never rounded up. Each side is at least 1px.
pub fn calculate_fit_dimensions(source: Dimensions, bounds: Dimensions) -> Dimensions {
    if source.width <= bounds.width && source.height <= bounds.height {
        return source;
    }

    let source_aspect = source.width as f64 / source.height.max(1) as f64;
    let bounds_aspect = bounds.width as f64 / bounds.height.max(1) as f64;

    let (width, height) = if source_aspect > bounds_aspect {
        (bounds.width, (bounds.width as f64 / source_aspect) as u32)
    } else {
        ((bounds.height as f64 * source_aspect) as u32, bounds.height)
    };

    Dimensions {
        width: width.max(1),
        height: height.max(1),
    }
}

/// Top-left corner that centers `inner` on `outer`.
pub fn center_origin(outer: Dimensions, inner: Dimensions) -> (i64, i64) {
    (
        outer.width as i64 / 2 - inner.width as i64 / 2,
        outer.height as i64 / 2 - inner.height as i64 / 2,
    )
}

/// Top-left corner for a watermark of size `mark` on a background of size
/// `background`.
///
/// | Anchor | x | y |
/// |---|---|---|
/// | Left / Top | `offset_x` | `offset_y` |
/// | Right / Bottom | `bg_w − wm_w − offset_x` | `bg_h − wm_h − offset_y` |
/// | Center | `bg_w/2 − wm_w/2 + offset_x` | `bg_h/2 − wm_h/2 + offset_y` |
///
/// Results may be negative or past the edge; compositing clips.
pub fn watermark_origin(
    background: Dimensions,
    mark: Dimensions,
    position: &WatermarkPosition,
) -> (i64, i64) {
    let (bg_w, bg_h) = (background.width as i64, background.height as i64);
    let (wm_w, wm_h) = (mark.width as i64, mark.height as i64);
    let (off_x, off_y) = (position.offset_x as i64, position.offset_y as i64);

    let x = match position.horizontal {
        Horizontal::Left => off_x,
        Horizontal::Right => (bg_w - wm_w) - off_x,
        Horizontal::Center => bg_w / 2 - wm_w / 2 + off_x,
    };
    let y = match position.vertical {
        Vertical::Top => off_y,
        Vertical::Bottom => (bg_h - wm_h) - off_y,
        Vertical::Center => bg_h / 2 - wm_h / 2 + off_y,
    };

    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height)
    }

    // =========================================================================
    // cap_to_original
    // =========================================================================

    #[test]
    fn cap_leaves_smaller_request_alone() {
        assert_eq!(cap_to_original(dims(100, 50), dims(800, 600)), dims(100, 50));
    }

    #[test]
    fn cap_limits_each_axis_independently() {
        assert_eq!(cap_to_original(dims(300, 300), dims(200, 400)), dims(200, 300));
        assert_eq!(cap_to_original(dims(100, 900), dims(200, 400)), dims(100, 400));
        assert_eq!(cap_to_original(dims(999, 999), dims(200, 400)), dims(200, 400));
    }

    // =========================================================================
    // is_landscape
    // =========================================================================

    #[test]
    fn landscape_only_when_wider() {
        assert!(is_landscape(dims(400, 300)));
        assert!(!is_landscape(dims(300, 400)));
        assert!(!is_landscape(dims(300, 300)));
    }

    // =========================================================================
    // calculate_fit_dimensions
    // =========================================================================

    #[test]
    fn fit_portrait_into_square() {
        // 600x800 into 300x300 → height-bound: 225x300
        assert_eq!(calculate_fit_dimensions(dims(600, 800), dims(300, 300)), dims(225, 300));
    }

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(calculate_fit_dimensions(dims(800, 400), dims(200, 200)), dims(200, 100));
    }

    #[test]
    fn fit_never_grows() {
        assert_eq!(calculate_fit_dimensions(dims(100, 150), dims(400, 400)), dims(100, 150));
    }

    #[test]
    fn fit_truncates_the_free_side() {
        // 100 * 50/301 = 16.6 → 16, not 17
        assert_eq!(calculate_fit_dimensions(dims(100, 301), dims(50, 50)), dims(16, 50));
        // width-bound: 50 / 3.01 = 16.6 → 16
        assert_eq!(calculate_fit_dimensions(dims(301, 100), dims(50, 50)), dims(50, 16));
    }

    #[test]
    fn fit_keeps_one_pixel_minimum() {
        assert_eq!(calculate_fit_dimensions(dims(1000, 1), dims(10, 10)), dims(10, 1));
    }

    // =========================================================================
    // center_origin
    // =========================================================================

    #[test]
    fn center_origin_splits_margin() {
        assert_eq!(center_origin(dims(300, 300), dims(225, 300)), (38, 0));
        assert_eq!(center_origin(dims(100, 100), dims(100, 100)), (0, 0));
    }

    // =========================================================================
    // watermark_origin
    // =========================================================================

    #[test]
    fn watermark_right_bottom_with_offset() {
        let pos = WatermarkPosition::BOTTOM_RIGHT.offset(5, 5);
        assert_eq!(watermark_origin(dims(200, 100), dims(20, 10), &pos), (175, 85));
    }

    #[test]
    fn watermark_center_center() {
        let pos = WatermarkPosition::anchored(Horizontal::Center, Vertical::Center);
        assert_eq!(watermark_origin(dims(200, 100), dims(20, 10), &pos), (90, 45));
    }

    #[test]
    fn watermark_top_left_is_offset() {
        let pos = WatermarkPosition::TOP_LEFT.offset(7, 3);
        assert_eq!(watermark_origin(dims(200, 100), dims(20, 10), &pos), (7, 3));
    }

    #[test]
    fn watermark_center_offset_moves_right_and_down() {
        let pos = WatermarkPosition::anchored(Horizontal::Center, Vertical::Center).offset(4, -2);
        assert_eq!(watermark_origin(dims(200, 100), dims(20, 10), &pos), (94, 43));
    }

    #[test]
    fn watermark_unrecognized_anchor_falls_back_to_top_left() {
        let pos = WatermarkPosition {
            horizontal: Horizontal::from("north"),
            vertical: Vertical::from("east"),
            offset_x: 2,
            offset_y: 3,
        };
        assert_eq!(watermark_origin(dims(200, 100), dims(20, 10), &pos), (2, 3));
    }

    #[test]
    fn watermark_larger_than_background_goes_negative() {
        let pos = WatermarkPosition::BOTTOM_RIGHT;
        assert_eq!(watermark_origin(dims(10, 10), dims(20, 20), &pos), (-10, -10));
    }
}
