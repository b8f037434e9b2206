//! Read-only settings and tuning knobs with spec'd defaults.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{LightboxError, LightboxResult};

/// Default thumbnail width when neither the address nor settings specify one.
pub const DEFAULT_THUMB_WIDTH: u32 = 250;

/// Fixed JPEG re-encode quality for cached thumbnails.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Read-only user settings consumed by the pipeline.
///
/// The settings store itself lives outside this crate; only the keys the
/// pipeline reads are modeled here, and unknown keys are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preferred thumbnail width in pixels.
    pub thumb_width: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thumb_width: DEFAULT_THUMB_WIDTH,
        }
    }
}

impl Settings {
    /// Parse a settings JSON document.
    pub fn from_str(s: &str) -> LightboxResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| LightboxError::validation(format!("invalid settings document: {e}")))
    }

    /// Load a settings JSON document from `path`.
    pub fn from_path(path: &Path) -> LightboxResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_str(&text)
    }
}

/// Retry pacing for one asset-age class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryCadence {
    /// Maximum number of re-attempts before the element goes terminally broken.
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds.
    pub interval_ms: u64,
}

/// Tuning for the per-element viewport lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleOpts {
    /// Ceiling between admission and a success signal before the load is
    /// declared stuck and its slot reclaimed.
    pub render_timeout_ms: u64,
    /// Assets younger than this use the `fresh` cadence. Capture devices
    /// write files incrementally during the first seconds of their life, so
    /// repeated decode failures are expected there.
    pub fresh_window_ms: u64,
    /// Cadence for freshly written assets.
    pub fresh: RetryCadence,
    /// Cadence for older assets, presumed stable (likely deleted or corrupt).
    pub stale: RetryCadence,
}

impl Default for LifecycleOpts {
    fn default() -> Self {
        Self {
            render_timeout_ms: 15_000,
            fresh_window_ms: 10_000,
            fresh: RetryCadence {
                max_attempts: 20,
                interval_ms: 500,
            },
            stale: RetryCadence {
                max_attempts: 3,
                interval_ms: 2_000,
            },
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
