use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LightboxError, LightboxResult};

/// Axis-aligned crop rectangle in source pixel coordinates.
///
/// The wire form used by thumbnail addresses is `x,y,w,h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl CropRect {
    /// Construct a crop rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Parse the `x,y,w,h` wire form.
    pub fn parse(s: &str) -> LightboxResult<Self> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(LightboxError::validation(format!(
                "crop must be 'x,y,w,h', got '{s}'"
            )));
        }

        let mut vals = [0u32; 4];
        for (slot, part) in vals.iter_mut().zip(&parts) {
            *slot = part.trim().parse::<u32>().map_err(|_| {
                LightboxError::validation(format!(
                    "crop component '{part}' is not a non-negative integer"
                ))
            })?;
        }

        Ok(Self::new(vals[0], vals[1], vals[2], vals[3]))
    }

    /// Clamp the rectangle to an `image_w` x `image_h` image.
    ///
    /// The clamped region never reaches outside `[0,image_w] x [0,image_h]`.
    /// Returns `None` when the result has zero area; callers treat that the
    /// same as a source that cannot be decoded yet.
    pub fn clamp_to(&self, image_w: u32, image_h: u32) -> Option<CropRect> {
        let x = self.x.min(image_w);
        let y = self.y.min(image_h);
        let w = self.w.min(image_w - x);
        let h = self.h.min(image_h - y);
        if w == 0 || h == 0 {
            return None;
        }
        Some(CropRect::new(x, y, w, h))
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
