//! Utility functions for image processing and coordinate transformations.

pub mod image_conversion;
pub mod safe_cast;

use opencv::core::Rect;
use safe_cast::f32_to_i32_clamp;

/// Expand a face box by `shift` of its size on every side, square it and keep
/// it inside the image.
///
/// The face mesh model expects a square crop with some margin around the
/// detected face.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn refine_box(bbox: Rect, max_width: i32, max_height: i32, shift: f32) -> Rect {
    let x_shift = f32_to_i32_clamp(bbox.width as f32 * shift, 0, max_width);
    let y_shift = f32_to_i32_clamp(bbox.height as f32 * shift, 0, max_height);

    let mut refined = Rect::new(
        (bbox.x - x_shift).max(0),
        (bbox.y - y_shift).max(0),
        bbox.width + 2 * x_shift,
        bbox.height + 2 * y_shift,
    );
    refined.width = refined.width.min(max_width - refined.x);
    refined.height = refined.height.min(max_height - refined.y);

    let side = refined.width.max(refined.height).min(max_width).min(max_height);
    refined.width = side;
    refined.height = side;

    if refined.x + side > max_width {
        refined.x = max_width - side;
    }
    if refined.y + side > max_height {
        refined.y = max_height - side;
    }

    refined
}
