//! The default scalar hash over [`Value`](crate::value::Value).
//!
//! Grounded in the FNV-1a hash the teacher's own `hash_index.rs` and
//! `hash_join.rs` modules use for `serde_json::Value` (`hash_json`,
//! `hash_value`) — same mix, applied to our closed `Value` enum's actual
//! payload bytes instead of a `to_string()` round-trip, which is both
//! cheaper and avoids collapsing `Int(1)` and `Text("1")` onto the same
//! string representation before hashing (they must never compare equal, so
//! they must not coincidentally share a hash derivation path either).

use crate::value::Value;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// The default `Value -> u64` hasher used by [`HashTable::with_default_hasher`](super::table::HashTable::with_default_hasher).
///
/// Null always hashes to the fixed sentinel `0`, per spec. Floats are
/// canonicalised (`-0.0 -> 0.0`) before hashing so that `Value` equality and
/// hash agree.
pub fn default_hash(value: &Value) -> u64 {
    match value {
        Value::Null => 0,
        Value::Int(i) => fnv1a(&i.to_le_bytes()),
        Value::Float(f) => {
            let canonical = if *f == 0.0 { 0.0 } else { *f };
            fnv1a(&canonical.to_bits().to_le_bytes())
        }
        Value::Text(s) => fnv1a(s.as_bytes()),
    }
}
