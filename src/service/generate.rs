use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::foundation::geom::CropRect;

/// Why a generation attempt could not produce bytes.
///
/// Both variants are "try again shortly" conditions at the serving boundary:
/// a capture device may still be flushing the file when decoding fails, and a
/// degenerate crop is treated the same way rather than as a hard error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateFailure {
    /// The bytes did not decode to a non-empty image.
    Undecodable,
    /// The requested crop has no area inside the decoded bounds.
    EmptyRegion,
}

/// Decode `bytes`, apply the optional crop, resize to `target_width`, and
/// re-encode as JPEG at `jpeg_quality`.
///
/// The crop is clamped to the decoded bounds first. The resize is driven by
/// width alone and preserves aspect ratio; output height is rounded to the
/// nearest pixel with a floor of 1.
pub fn render_thumbnail(
    bytes: &[u8],
    target_width: u32,
    crop: Option<&CropRect>,
    jpeg_quality: u8,
) -> Result<Vec<u8>, GenerateFailure> {
    let decoded = image::load_from_memory(bytes).map_err(|_| GenerateFailure::Undecodable)?;
    let (w, h) = (decoded.width(), decoded.height());
    if w == 0 || h == 0 {
        return Err(GenerateFailure::Undecodable);
    }

    let region = match crop {
        Some(c) => c.clamp_to(w, h).ok_or(GenerateFailure::EmptyRegion)?,
        None => CropRect::new(0, 0, w, h),
    };
    let cropped = decoded.crop_imm(region.x, region.y, region.w, region.h);

    let target_width = target_width.max(1);
    let target_height = scaled_height(region.w, region.h, target_width);
    let resized = cropped.resize_exact(target_width, target_height, FilterType::Lanczos3);

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, jpeg_quality)
        .encode_image(&resized.into_rgb8())
        .map_err(|_| GenerateFailure::Undecodable)?;
    Ok(out)
}

fn scaled_height(region_w: u32, region_h: u32, target_width: u32) -> u32 {
    let scaled = (u64::from(region_h) * u64::from(target_width) + u64::from(region_w) / 2)
        / u64::from(region_w);
    (scaled as u32).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/service/generate.rs"]
mod tests;
