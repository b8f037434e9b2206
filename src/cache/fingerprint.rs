use std::fmt;

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::geom::CropRect;

const XXH3_SEED: u64 = 0x4c69_6768_7462_6f78;

/// Stable 128-bit cache key derived from a thumbnail request's identity.
///
/// Identical inputs always derive the identical fingerprint; any change to the
/// source's modification time, the target width, or the crop rectangle derives
/// a different one, which is the only invalidation path the cache has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// High 64 bits of the digest.
    pub hi: u64,
    /// Low 64 bits of the digest.
    pub lo: u64,
}

impl Fingerprint {
    /// Render as the fixed-length 32-character lowercase hex string used for
    /// blob file names.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn finish(self) -> Fingerprint {
        let v = self.inner.digest128();
        Fingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Derive the cache fingerprint for a thumbnail request.
///
/// `norm_path` must already be in the normalized form produced by
/// [`crate::normalize_source_path`]. The crop field is
/// tagged explicitly so an uncropped request never collides with any cropped
/// request for the same source and size.
pub fn derive_fingerprint(
    norm_path: &str,
    mtime_ms: i64,
    target_width: u32,
    crop: Option<&CropRect>,
) -> Fingerprint {
    let mut h = StableHasher::new();
    h.write_u32(norm_path.len() as u32);
    h.write_bytes(norm_path.as_bytes());
    h.write_i64(mtime_ms);
    h.write_u32(target_width);
    match crop {
        None => h.write_u8(0),
        Some(c) => {
            h.write_u8(1);
            h.write_u32(c.x);
            h.write_u32(c.y);
            h.write_u32(c.w);
            h.write_u32(c.h);
        }
    }
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/cache/fingerprint.rs"]
mod tests;
