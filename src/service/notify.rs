use std::path::PathBuf;

/// Notice that a source file was confirmed missing while serving a request.
///
/// Sent from the service toward UI state so *every* view holding the stale
/// reference can prune it, not just the one that issued the current request.
/// Both forms of the path are carried because lookup keys differ by platform
/// (case and separator normalization).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingSourceNotice {
    /// The path exactly as addressed.
    pub raw: PathBuf,
    /// Normalized form; see [`normalize_source_path`](crate::normalize_source_path).
    pub normalized: String,
}

/// A file discovered by the folder watcher.
///
/// The pipeline never subscribes to the watcher directly; the UI layer
/// forwards discovered paths into thumbnail requests. This struct is the
/// contract for those events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path of the discovered file.
    pub path: PathBuf,
    /// Bare file name.
    pub name: String,
    /// Modification/creation timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Label of the watched source (e.g. a card reader or tether target).
    pub source_label: String,
}
