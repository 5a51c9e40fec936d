//! Process-global randomness for message IDs and privacy salts.
//!
//! Message IDs (request-id, msgID) only need to be non-sequential; privacy
//! salts are a monotonic counter combined with engineBoots, which is
//! sufficient without cryptographic-quality randomness.

use rand::Rng;
use std::sync::atomic::{AtomicU32, Ordering};

/// Choose a uniform random request-id / msgID in `[1, 2^31)`.
pub fn random_request_id() -> i32 {
    rand::thread_rng().gen_range(1..i32::MAX)
}

static SALT_COUNTER: AtomicU32 = AtomicU32::new(0);

/// The next value of the process-wide monotonic salt counter used to build
/// USM privacy parameters. Wraps at `u32::MAX`.
pub fn next_salt() -> u32 {
    SALT_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_is_in_range() {
        for _ in 0..1000 {
            let id = random_request_id();
            assert!(id >= 1 && id < i32::MAX);
        }
    }

    #[test]
    fn salt_counter_is_monotonic() {
        let a = next_salt();
        let b = next_salt();
        assert!(b > a);
    }
}
