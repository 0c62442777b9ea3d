//! Capacity selection helpers for the fixed bucket array.
//!
//! The probe formula wants a prime bucket count, so a requested capacity
//! is rounded up to the next prime before the array is allocated.

/// Returns true if `n` is prime.
///
/// Trial division is plenty here: capacities are picked once, at table
/// construction, and stay small.
#[allow(clippy::arithmetic_side_effects)]
pub(crate) fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut divisor = 3;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Returns the smallest prime greater than or equal to `n`.
pub(crate) fn next_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(1);
    }
    candidate
}
