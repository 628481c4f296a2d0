use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide request counter, initialized at 0 on first use.
static GLOBAL_REQUEST_ID_COUNTER: Lazy<AtomicU64> = Lazy::new(|| AtomicU64::new(0));

/// Returns the next request id. Ids are never reused and never reset for the
/// lifetime of the process.
#[inline]
pub fn increment_u64_id() -> u64 {
    GLOBAL_REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}
