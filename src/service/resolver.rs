use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::fingerprint::derive_fingerprint;
use crate::cache::store::ThumbCache;
use crate::config::{DEFAULT_JPEG_QUALITY, DEFAULT_THUMB_WIDTH};
use crate::service::address::{AssetAddress, ThumbnailSpec, normalize_source_path};
use crate::service::generate::{GenerateFailure, render_thumbnail};
use crate::service::notify::MissingSourceNotice;

/// Outcome of serving an asset address.
///
/// `NotFound` and `Locked` are expected, distinguishable response variants,
/// not errors. Protocol bridges map them with [`ServeOutcome::status`]; the
/// retry decision belongs to the viewport lifecycle, never to the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServeOutcome {
    /// Encoded bytes ready to render.
    Ready(Vec<u8>),
    /// The source file does not exist; callers should prune the reference.
    NotFound,
    /// The source exists but cannot be decoded right now (zero-length, still
    /// being written, or corrupt). Worth retrying shortly.
    Locked,
}

impl ServeOutcome {
    /// HTTP-style status for protocol bridges: 200, 404 or 503.
    pub fn status(&self) -> u16 {
        match self {
            Self::Ready(_) => 200,
            Self::NotFound => 404,
            Self::Locked => 503,
        }
    }
}

/// Options for [`ThumbnailService`].
#[derive(Clone, Debug)]
pub struct ServiceOpts {
    /// Width used when an address does not request one.
    pub default_width: u32,
    /// Fixed JPEG re-encode quality.
    pub jpeg_quality: u8,
    /// Missing-source notices are sent here when a source is confirmed absent.
    pub missing_notices: Option<Sender<MissingSourceNotice>>,
}

impl Default for ServiceOpts {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_THUMB_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            missing_notices: None,
        }
    }
}

/// Resolves asset addresses into encoded bytes, write-through over the cache.
///
/// The service is stateless with respect to retries and holds no per-request
/// state; two concurrent calls for the same fingerprint may both generate,
/// which is wasted work but not a correctness issue.
#[derive(Debug)]
pub struct ThumbnailService {
    cache: ThumbCache,
    opts: ServiceOpts,
}

impl ThumbnailService {
    /// Create a service over `cache`.
    pub fn new(cache: ThumbCache, opts: ServiceOpts) -> Self {
        Self { cache, opts }
    }

    /// The underlying cache store (shutdown flushing, tests).
    pub fn cache(&self) -> &ThumbCache {
        &self.cache
    }

    /// Serve `addr`, consulting the cache before generating.
    #[tracing::instrument(skip(self))]
    pub fn serve(&self, addr: &AssetAddress) -> ServeOutcome {
        match addr {
            AssetAddress::Original { source } => self.serve_original(source),
            AssetAddress::Thumbnail(spec) => self.serve_thumbnail(spec),
        }
    }

    fn serve_original(&self, source: &Path) -> ServeOutcome {
        match fs::read(source) {
            Ok(bytes) => ServeOutcome::Ready(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.notify_missing(source);
                ServeOutcome::NotFound
            }
            Err(e) => {
                tracing::warn!(path = %source.display(), error = %e, "pass-through read failed");
                ServeOutcome::NotFound
            }
        }
    }

    fn serve_thumbnail(&self, spec: &ThumbnailSpec) -> ServeOutcome {
        let normalized = normalize_source_path(&spec.source);

        // Stat first: a missing source is a distinct, non-retried condition
        // and must never reach the generation path.
        let mtime_ms = match source_mtime_ms(&spec.source) {
            Ok(ms) => ms,
            Err(e) => {
                tracing::debug!(path = %spec.source.display(), error = %e, "source stat failed");
                self.notify_missing(&spec.source);
                return ServeOutcome::NotFound;
            }
        };

        let width = spec.width.unwrap_or(self.opts.default_width);
        let fp = derive_fingerprint(&normalized, mtime_ms, width, spec.crop.as_ref());

        if let Some(bytes) = self.cache.get(&fp) {
            tracing::debug!(key = %fp, "cache hit");
            return ServeOutcome::Ready(bytes);
        }

        let source_bytes = match fs::read(&spec.source) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between the stat and the read.
                self.notify_missing(&spec.source);
                return ServeOutcome::NotFound;
            }
            Err(e) => {
                tracing::warn!(path = %spec.source.display(), error = %e, "source read failed");
                return ServeOutcome::Locked;
            }
        };

        match render_thumbnail(&source_bytes, width, spec.crop.as_ref(), self.opts.jpeg_quality) {
            Ok(bytes) => {
                self.cache.put_detached(&fp, bytes.clone());
                tracing::debug!(key = %fp, len = bytes.len(), "generated thumbnail");
                ServeOutcome::Ready(bytes)
            }
            Err(GenerateFailure::Undecodable) => {
                tracing::debug!(path = %spec.source.display(), "source not decodable yet");
                ServeOutcome::Locked
            }
            Err(GenerateFailure::EmptyRegion) => {
                tracing::debug!(path = %spec.source.display(), "degenerate crop region");
                ServeOutcome::Locked
            }
        }
    }

    fn notify_missing(&self, source: &Path) {
        let Some(tx) = self.opts.missing_notices.as_ref() else {
            return;
        };
        let notice = MissingSourceNotice {
            raw: source.to_path_buf(),
            normalized: normalize_source_path(source),
        };
        if tx.send(notice).is_err() {
            tracing::debug!("missing-source listener disconnected");
        }
    }
}

fn source_mtime_ms(path: &Path) -> std::io::Result<i64> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(system_time_ms(modified))
}

fn system_time_ms(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}
