//! Height-capped downscaling.

use crate::error::ItemError;
use crate::image_result::ImageResult;
use image::imageops::FilterType;
use image::DynamicImage;

/// Target `(width, height)` when an image of `size` must fit under `max_height`.
///
/// Returns `None` when no resize is needed (`height <= max_height`). Width is
/// scaled by the same factor, rounded to nearest, and never drops below 1.
pub fn target_size((width, height): (u32, u32), max_height: u32) -> Option<(u32, u32)> {
    if height <= max_height || max_height == 0 {
        return None;
    }
    let scaled = (u64::from(width) * u64::from(max_height) + u64::from(height) / 2) / u64::from(height);
    let new_width = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    Some((new_width, max_height))
}

/// Decode and shrink `image` so its height equals `max_height`.
///
/// Returns `Ok(None)` when the image already fits; the caller then saves the
/// original bytes untouched.
pub fn downscale(image: &ImageResult, max_height: u32) -> Result<Option<DynamicImage>, ItemError> {
    let Some((w, h)) = target_size(image.size(), max_height) else {
        return Ok(None);
    };
    let decoded = image::load_from_memory_with_format(image.content(), image.format())
        .map_err(ItemError::Decode)?;
    tracing::debug!(
        url = image.url(),
        from = ?image.size(),
        to = ?(w, h),
        "downscaling image"
    );
    Ok(Some(decoded.resize_exact(w, h, FilterType::Lanczos3)))
}
