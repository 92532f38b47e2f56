//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the size of a "fit" resize: scale the source down, preserving
/// aspect ratio, until it fits inside the bounding box.
///
/// Never upscales. A source that already fits is returned unchanged. Neither
/// output edge drops below 1px, and neither exceeds its bound.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (width, height), both non-zero
///
/// # Returns
/// * `(width, height)` - Fitted dimensions
///
/// # Examples
/// ```
/// # use imgrelay::imaging::fit_within;
/// // 200x100 into a 100x100 box keeps 2:1 → 100x50
/// assert_eq!(fit_within((200, 100), (100, 100)), (100, 50));
///
/// // Already fits: unchanged
/// assert_eq!(fit_within((640, 480), (800, 600)), (640, 480));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);

    // The constraining edge lands exactly on its bound; only the free edge
    // is rounded.
    if max_w as f64 / src_w as f64 <= max_h as f64 / src_h as f64 {
        let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
        (max_w, h)
    } else {
        let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
        (w, max_h)
    }
}

/// Whether two sizes share the same aspect ratio, within the rounding error
/// a resize can introduce on the shorter edge.
pub fn preserves_aspect(source: (u32, u32), output: (u32, u32)) -> bool {
    let (src_w, src_h) = source;
    let (out_w, out_h) = output;
    // Cross-multiplied difference, tolerating one pixel on either edge.
    let lhs = src_w as u64 * out_h as u64;
    let rhs = src_h as u64 * out_w as u64;
    lhs.abs_diff(rhs) <= (src_w.max(src_h)) as u64
}
