use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::*;

fn temp_root(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "lightbox_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn fp(n: u64) -> Fingerprint {
    Fingerprint { hi: n, lo: !n }
}

#[test]
fn open_creates_root_and_misses_cleanly() {
    let root = temp_root("open");
    let cache = ThumbCache::open(&root).unwrap();
    assert!(root.is_dir());
    assert_eq!(cache.get(&fp(1)), None);
    drop(cache);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn put_then_get_returns_identical_bytes() {
    let root = temp_root("roundtrip");
    let cache = ThumbCache::open(&root).unwrap();

    let bytes = vec![0xde, 0xad, 0xbe, 0xef];
    cache.put_detached(&fp(7), bytes.clone());
    cache.flush();

    assert_eq!(cache.get(&fp(7)), Some(bytes));
    assert_eq!(cache.get(&fp(8)), None);

    drop(cache);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn blob_layout_is_flat_hex_jpg() {
    let root = temp_root("layout");
    let cache = ThumbCache::open(&root).unwrap();

    let key = fp(0xabc);
    let path = cache.blob_path(&key);
    assert_eq!(path.parent(), Some(root.as_path()));
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("{}.jpg", key.to_hex())
    );

    drop(cache);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn duplicate_writes_for_one_key_are_harmless() {
    let root = temp_root("dup");
    let cache = ThumbCache::open(&root).unwrap();

    let bytes = vec![1, 2, 3];
    cache.put_detached(&fp(9), bytes.clone());
    cache.put_detached(&fp(9), bytes.clone());
    cache.flush();
    assert_eq!(cache.get(&fp(9)), Some(bytes));

    drop(cache);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn drop_drains_queued_writes() {
    let root = temp_root("drain");
    let cache = ThumbCache::open(&root).unwrap();
    let path = cache.blob_path(&fp(5));
    cache.put_detached(&fp(5), vec![42]);
    drop(cache);

    assert_eq!(std::fs::read(&path).unwrap(), vec![42]);
    std::fs::remove_dir_all(&root).ok();
}

#[derive(Clone, Default)]
struct RecordingPolicy {
    seen: Arc<Mutex<Vec<PathBuf>>>,
}

impl RetentionPolicy for RecordingPolicy {
    fn after_write(&self, _root: &Path, written: &Path) {
        self.seen.lock().unwrap().push(written.to_path_buf());
    }
}

#[test]
fn retention_policy_runs_after_each_write() {
    let root = temp_root("policy");
    let policy = RecordingPolicy::default();
    let cache = ThumbCache::open_with_policy(&root, policy.clone()).unwrap();

    cache.put_detached(&fp(1), vec![1]);
    cache.put_detached(&fp(2), vec![2]);
    cache.flush();

    let seen = policy.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], cache.blob_path(&fp(1)));
    assert_eq!(seen[1], cache.blob_path(&fp(2)));
    drop(seen);

    drop(cache);
    std::fs::remove_dir_all(&root).ok();
}
