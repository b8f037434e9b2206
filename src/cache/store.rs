use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::cache::fingerprint::Fingerprint;
use crate::foundation::error::{LightboxError, LightboxResult};

/// Decides what happens to previously written blobs after each new write.
///
/// The store itself never deletes entries; whether (and how) to bound growth
/// is an injection point rather than a built-in guess. The hook runs on the
/// writer thread, after the new blob has landed.
pub trait RetentionPolicy: Send + Sync + 'static {
    /// Called after `written` has been persisted under `root`.
    fn after_write(&self, root: &Path, written: &Path);
}

/// Default policy: keep every entry forever.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepForever;

impl RetentionPolicy for KeepForever {
    fn after_write(&self, _root: &Path, _written: &Path) {}
}

const WRITE_QUEUE_CAP: usize = 64;

enum WriterMsg {
    Write { path: PathBuf, bytes: Vec<u8> },
    Flush(SyncSender<()>),
}

/// Flat fingerprint -> blob store on persistent storage.
///
/// One file per fingerprint, no secondary indices, no eviction. Reads answer
/// from whatever is present now and treat every failure as a miss. Writes go
/// through a dedicated writer thread and are never awaited by callers; a
/// duplicate write for the same fingerprint is harmless because the bytes for
/// a given key are deterministic.
#[derive(Debug)]
pub struct ThumbCache {
    root: PathBuf,
    writer_tx: Option<SyncSender<WriterMsg>>,
    writer: Option<JoinHandle<()>>,
}

impl ThumbCache {
    /// Open (creating if needed) a store rooted at `root`, keeping every entry.
    pub fn open(root: impl Into<PathBuf>) -> LightboxResult<Self> {
        Self::open_with_policy(root, KeepForever)
    }

    /// Open with an explicit [`RetentionPolicy`].
    pub fn open_with_policy(
        root: impl Into<PathBuf>,
        policy: impl RetentionPolicy,
    ) -> LightboxResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("create cache root '{}'", root.display()))?;

        let (tx, rx) = mpsc::sync_channel::<WriterMsg>(WRITE_QUEUE_CAP);
        let writer_root = root.clone();
        let writer = std::thread::Builder::new()
            .name("thumb-cache-writer".to_string())
            .spawn(move || run_writer(writer_root, rx, policy))
            .map_err(|e| LightboxError::cache(format!("failed to spawn cache writer: {e}")))?;

        Ok(Self {
            root,
            writer_tx: Some(tx),
            writer: Some(writer),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Blob path for `fp`: a flat directory of `<hex>.jpg` files.
    pub fn blob_path(&self, fp: &Fingerprint) -> PathBuf {
        self.root.join(format!("{}.jpg", fp.to_hex()))
    }

    /// Read the blob for `fp`. Absent entries and read failures are both
    /// misses; a non-absent failure is logged and falls through to generation.
    pub fn get(&self, fp: &Fingerprint) -> Option<Vec<u8>> {
        let path = self.blob_path(fp);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cache read failed; treating as miss");
                None
            }
        }
    }

    /// Queue `bytes` for persistence under `fp` without blocking the caller.
    ///
    /// Persistence failures are logged, never reported. A saturated queue
    /// drops the write; the entry simply stays a miss until regenerated.
    pub fn put_detached(&self, fp: &Fingerprint, bytes: Vec<u8>) {
        let Some(tx) = self.writer_tx.as_ref() else {
            return;
        };
        let msg = WriterMsg::Write {
            path: self.blob_path(fp),
            bytes,
        };
        match tx.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(WriterMsg::Write { path, .. })) => {
                tracing::warn!(path = %path.display(), "cache write queue full; dropping write");
            }
            Err(TrySendError::Disconnected(WriterMsg::Write { path, .. })) => {
                tracing::warn!(path = %path.display(), "cache writer gone; dropping write");
            }
            Err(_) => {}
        }
    }

    /// Block until every previously queued write has been attempted.
    ///
    /// Used at shutdown and by tests; regular serving never waits on this.
    pub fn flush(&self) {
        let Some(tx) = self.writer_tx.as_ref() else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::sync_channel::<()>(1);
        if tx.send(WriterMsg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for ThumbCache {
    fn drop(&mut self) {
        // Disconnecting lets the writer drain the remaining queue and exit.
        drop(self.writer_tx.take());
        if let Some(handle) = self.writer.take() {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for WriterMsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write { path, bytes } => f
                .debug_struct("Write")
                .field("path", path)
                .field("len", &bytes.len())
                .finish(),
            Self::Flush(_) => f.debug_tuple("Flush").finish(),
        }
    }
}

fn run_writer(root: PathBuf, rx: mpsc::Receiver<WriterMsg>, policy: impl RetentionPolicy) {
    while let Ok(msg) = rx.recv() {
        match msg {
            WriterMsg::Write { path, bytes } => match fs::write(&path, &bytes) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), len = bytes.len(), "cached thumbnail");
                    policy.after_write(&root, &path);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cache write failed");
                }
            },
            WriterMsg::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
