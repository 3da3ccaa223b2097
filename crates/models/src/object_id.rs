//! 12-byte record identifiers rendered as 24 lowercase hex characters.
//!
//! Layout: 4-byte big-endian unix seconds, 5 random bytes chosen once per
//! process, 3-byte counter seeded randomly and incremented per id. Ids from
//! one process are strictly increasing within a second and never repeat.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use once_cell::sync::Lazy;
use rand::Rng;

pub const ID_LEN: usize = 24;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| rand::thread_rng().gen());
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x00ff_ffff)));

pub fn generate() -> String {
    let secs = Utc::now().timestamp() as u32;
    let count = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00ff_ffff;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// True when `id` has the canonical shape: exactly 24 hex digits.
pub fn is_valid(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}
