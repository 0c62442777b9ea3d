//! Polynomial string hashing and the double-hash probe sequence.
//!
//! Two rolling hashes with different odd-prime multipliers are combined
//! into a per-key sequence of candidate bucket indices. Insert, search
//! and removal all walk the exact same sequence for a given key, which
//! is what keeps the table consistent.

/// Multiplier of the primary hash, which picks the starting bucket.
pub(crate) const PRIME_A: u64 = 151;

/// Multiplier of the secondary hash, which sets the probe step size.
pub(crate) const PRIME_B: u64 = 163;

/// Rolling polynomial hash of `key` under `multiplier`, reduced modulo
/// `modulus` after every step so the accumulator never overflows.
///
/// Identical `(key, multiplier, modulus)` always produces the same index.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn polynomial_hash(key: &str, multiplier: u64, modulus: usize) -> usize {
    debug_assert!(modulus > 0, "modulus must be a positive bucket count");
    let modulus = modulus as u64;
    let mut hash = 0_u64;
    for byte in key.bytes() {
        hash = (hash * multiplier + u64::from(byte)) % modulus;
    }
    // the accumulator stays below `modulus`, which itself fits a `usize`
    hash as usize
}

/// Candidate bucket index for `key` on the given probe `attempt`.
///
/// Computed as `(h1 + attempt * (h2 + 1)) mod capacity`. The `+ 1` keeps
/// the integer step nonzero so consecutive attempts do not collapse onto
/// the starting bucket. With a prime capacity the walk reaches every
/// bucket unless the step happens to be a multiple of the capacity.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn probe_slot(key: &str, capacity: usize, attempt: usize) -> usize {
    let hash_a = polynomial_hash(key, PRIME_A, capacity) as u64;
    let hash_b = polynomial_hash(key, PRIME_B, capacity) as u64;
    // both hashes and the attempt counter are below `capacity`, so the
    // widened product cannot overflow for any realistic bucket count
    ((hash_a + (attempt as u64) * (hash_b + 1)) % (capacity as u64)) as usize
}
