use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{LightboxError, LightboxResult};
use crate::foundation::geom::CropRect;

/// Parameters of a derived-thumbnail request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSpec {
    /// Source image path.
    pub source: PathBuf,
    /// Requested output width; `None` falls back to the configured default.
    pub width: Option<u32>,
    /// Optional crop applied before resizing.
    pub crop: Option<CropRect>,
}

/// Typed asset address: the original file contents or a derived thumbnail.
///
/// Addresses are parsed and validated once at the boundary. Handlers never
/// see raw query strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetAddress {
    /// Pass-through: the original file, streamed with no transformation.
    Original {
        /// Source file path.
        source: PathBuf,
    },
    /// Derived thumbnail with optional width and crop parameters.
    Thumbnail(ThumbnailSpec),
}

impl AssetAddress {
    /// Parse the textual wire form.
    ///
    /// `original:<path>` names the untransformed file. `thumb:<path>` names a
    /// derived thumbnail and optionally carries `?size=W` and `?crop=x,y,w,h`
    /// query parameters.
    pub fn parse(s: &str) -> LightboxResult<Self> {
        if let Some(rest) = s.strip_prefix("original:") {
            if rest.is_empty() {
                return Err(LightboxError::validation("original address is missing a path"));
            }
            return Ok(Self::Original {
                source: PathBuf::from(rest),
            });
        }

        let Some(rest) = s.strip_prefix("thumb:") else {
            return Err(LightboxError::validation(format!(
                "unknown address scheme in '{s}'"
            )));
        };

        let (path_part, query) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (rest, None),
        };
        if path_part.is_empty() {
            return Err(LightboxError::validation("thumb address is missing a path"));
        }

        let mut width = None;
        let mut crop = None;
        if let Some(query) = query {
            for pair in query.split('&') {
                let (key, value) = pair.split_once('=').ok_or_else(|| {
                    LightboxError::validation(format!("malformed query parameter '{pair}'"))
                })?;
                match key {
                    "size" => {
                        let w = value.parse::<u32>().map_err(|_| {
                            LightboxError::validation(format!("size '{value}' is not an integer"))
                        })?;
                        if w == 0 {
                            return Err(LightboxError::validation("size must be >= 1"));
                        }
                        width = Some(w);
                    }
                    "crop" => crop = Some(CropRect::parse(value)?),
                    other => {
                        return Err(LightboxError::validation(format!(
                            "unknown query parameter '{other}'"
                        )));
                    }
                }
            }
        }

        Ok(Self::Thumbnail(ThumbnailSpec {
            source: PathBuf::from(path_part),
            width,
            crop,
        }))
    }
}

impl fmt::Display for AssetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original { source } => write!(f, "original:{}", source.display()),
            Self::Thumbnail(spec) => {
                write!(f, "thumb:{}", spec.source.display())?;
                let mut sep = '?';
                if let Some(w) = spec.width {
                    write!(f, "{sep}size={w}")?;
                    sep = '&';
                }
                if let Some(c) = &spec.crop {
                    write!(f, "{sep}crop={c}")?;
                }
                Ok(())
            }
        }
    }
}

/// Normalize a source path into the stable textual form used for
/// fingerprinting and missing-file lookups.
///
/// Windows verbatim prefixes (`\\?\`, emitted when paths exceed legacy length
/// limits) are stripped, separators unify to `/`, and non-UTF-8 bytes are
/// lossy-decoded so locale-specific names still produce a stable key.
pub fn normalize_source_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let stripped = raw.strip_prefix(r"\\?\").unwrap_or(&raw);
    stripped.replace('\\', "/")
}

#[cfg(test)]
#[path = "../../tests/unit/service/address.rs"]
mod tests;
