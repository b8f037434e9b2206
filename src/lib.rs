//! Lightbox is an on-demand thumbnail generation and caching pipeline for
//! photo grids.
//!
//! An unbounded, randomly-ordered stream of "render this image" requests is
//! turned into a bounded, prioritized, cancelable pipeline:
//!
//! 1. **Address**: a typed [`AssetAddress`] names either the original bytes or
//!    a derived thumbnail (optional width and crop), parsed once at the
//!    boundary.
//! 2. **Fingerprint**: [`derive_fingerprint`] keys each source/mtime/width/crop
//!    combination; any input change is a new key, which is the cache's only
//!    invalidation path.
//! 3. **Serve**: [`ThumbnailService`] answers from the flat [`ThumbCache`] or
//!    decodes, crops, resizes and re-encodes, persisting write-through.
//! 4. **Admit**: a [`Scheduler`] bounds how many loads are in flight and lets
//!    lower-value work wait behind higher-value work.
//! 5. **Observe**: one [`TileLifecycle`] per grid element decides when to
//!    request, cancel, time out, and retry.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic keys**: identical inputs always derive identical
//!   fingerprints; cached bytes for a key never change in place.
//! - **Expected conditions are data**: a missing or still-being-written source
//!   is a [`ServeOutcome`] variant, never an error or a panic.
//! - **No hidden globals**: the scheduler is constructed at the composition
//!   root and injected by reference.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cache;
mod config;
mod foundation;
mod sched;
mod service;
mod viewport;

pub use cache::fingerprint::{Fingerprint, derive_fingerprint};
pub use cache::store::{KeepForever, RetentionPolicy, ThumbCache};
pub use config::{
    DEFAULT_JPEG_QUALITY, DEFAULT_THUMB_WIDTH, LifecycleOpts, RetryCadence, Settings,
};
pub use foundation::error::{LightboxError, LightboxResult};
pub use foundation::geom::CropRect;
pub use sched::admission::{AdmissionTicket, DEFAULT_SLOTS, RequestId, Scheduler};
pub use service::address::{AssetAddress, ThumbnailSpec, normalize_source_path};
pub use service::generate::{GenerateFailure, render_thumbnail};
pub use service::notify::{DiscoveredFile, MissingSourceNotice};
pub use service::resolver::{ServeOutcome, ServiceOpts, ThumbnailService};
pub use viewport::lifecycle::{RenderState, TileLifecycle};
