//! Per-thread identity used by the context affinity tracking
//!
//! [`std::thread::ThreadId`] is opaque and cannot be stored in an atomic, so
//! the platform core mints its own dense thread identifiers: each OS thread
//! receives a nonzero `u64` the first time it asks for one, and keeps that
//! identifier for its lifetime.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sentinel meaning "no thread"; real thread identifiers start at 1.
pub const NO_THREAD: u64 = 0;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Identifier of the calling thread
///
/// Stable for the lifetime of the thread and never equal to [`NO_THREAD`].
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_id_is_nonzero_and_stable() {
        let first = current_thread_id();
        let second = current_thread_id();
        assert_ne!(first, NO_THREAD);
        assert_eq!(first, second);
    }

    #[test]
    fn thread_ids_differ_across_threads() {
        let main_id = current_thread_id();
        let worker_id = std::thread::spawn(current_thread_id)
            .join()
            .expect("worker thread panicked");
        assert_ne!(main_id, worker_id);
        assert_ne!(worker_id, NO_THREAD);
    }
}
