//! Raw Sample Image.
//!
//! Serializes the ring, plus the ingestion cursor needed to keep computing
//! deltas, into a little-endian byte image:
//!
//! ```text
//! magic "IEC1" | capacity u32 | total u64 | last_t u64 | last_x i16 | last_y i16
//! time[capacity] u32 | coord[capacity] u32 | blake3(preceding bytes) [32]
//! ```
//!
//! The core never interprets the image; it only guarantees that importing it
//! reproduces the same estimate.

use alloc::vec::Vec;

use super::{SampleStore, StoreError};

/// Leading bytes of every image.
pub const MAGIC: [u8; 4] = *b"IEC1";

const HEADER_LEN: usize = 4 + 4 + 8 + 8 + 2 + 2;
const DIGEST_LEN: usize = 32;

/// Position of the ingestion path between two events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Timestamp of the last event.
    pub last_timestamp: u64,
    /// Coordinates of the last event carrying coordinates.
    pub last_coords: (i16, i16),
}

/// Size in bytes of an image for `capacity` samples.
pub fn image_len(capacity: usize) -> usize {
    HEADER_LEN + 8 * capacity + DIGEST_LEN
}

/// Encodes `store` and `cursor` into a byte image.
pub fn encode(store: &SampleStore, cursor: &Cursor) -> Vec<u8> {
    let capacity = store.capacity();
    let mut out = Vec::with_capacity(image_len(capacity));

    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&(capacity as u32).to_le_bytes());
    out.extend_from_slice(&store.total_pushed().to_le_bytes());
    out.extend_from_slice(&cursor.last_timestamp.to_le_bytes());
    out.extend_from_slice(&cursor.last_coords.0.to_le_bytes());
    out.extend_from_slice(&cursor.last_coords.1.to_le_bytes());
    for t in store.raw_time() {
        out.extend_from_slice(&t.to_le_bytes());
    }
    for c in store.raw_coord() {
        out.extend_from_slice(&c.to_le_bytes());
    }

    let digest = blake3::hash(&out);
    out.extend_from_slice(digest.as_bytes());
    out
}

/// Decodes an image produced by [`encode`].
///
/// # Errors
/// * `StoreError::Truncated` if the image is shorter than its declared size.
/// * `StoreError::BadMagic` if the magic does not match.
/// * `StoreError::CapacityMismatch` if it was taken with another capacity.
/// * `StoreError::Corruption` if the digest does not match.
pub fn decode(bytes: &[u8], expected_capacity: usize) -> Result<(SampleStore, Cursor), StoreError> {
    if bytes.len() < HEADER_LEN + DIGEST_LEN {
        return Err(StoreError::Truncated);
    }
    if bytes[0..4] != MAGIC {
        return Err(StoreError::BadMagic);
    }

    let capacity = read_u32(bytes, 4) as usize;
    if capacity != expected_capacity {
        return Err(StoreError::CapacityMismatch);
    }
    if bytes.len() != image_len(capacity) {
        return Err(StoreError::Truncated);
    }

    let body_len = bytes.len() - DIGEST_LEN;
    let digest = blake3::hash(&bytes[..body_len]);
    // blake3::Hash equality is constant-time.
    if digest != blake3::Hash::from(read_digest(&bytes[body_len..])) {
        return Err(StoreError::Corruption);
    }

    let total_pushed = read_u64(bytes, 8);
    let cursor = Cursor {
        last_timestamp: read_u64(bytes, 16),
        last_coords: (read_i16(bytes, 24), read_i16(bytes, 26)),
    };

    let time_at = HEADER_LEN;
    let coord_at = HEADER_LEN + 4 * capacity;
    let time = (0..capacity).map(|i| read_u32(bytes, time_at + 4 * i)).collect();
    let coord = (0..capacity).map(|i| read_u32(bytes, coord_at + 4 * i)).collect();

    Ok((SampleStore::from_parts(time, coord, total_pushed), cursor))
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(buf)
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[at..at + 8]);
    u64::from_le_bytes(buf)
}

fn read_i16(bytes: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_digest(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    let mut buf = [0u8; DIGEST_LEN];
    buf.copy_from_slice(&bytes[..DIGEST_LEN]);
    buf
}
