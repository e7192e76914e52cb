//! GPU rendering context record and its thread-affinity state
//!
//! A [`Context`] is a handle to GPU driver state that is only valid for
//! manipulation on one OS thread at a time. The owning thread is tracked in an
//! atomic field on the context itself; the claim/release protocol lives in
//! [`crate::ContextAffinity`], which is the single authority allowed to
//! mutate it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::foundation::thread::NO_THREAD;
use crate::platform::{NativeId, PlatformError, PlatformResult};

/// One GPU rendering context owned by a [`crate::System`]
///
/// Contexts are created through [`crate::System::create_window`] (attached to
/// the new window for its lifetime) or [`crate::System::create_context`]
/// (offscreen, attached to nothing). Once disposed a context can never be
/// made current again.
pub struct Context {
    native: NativeId,
    /// Identifier of the thread this context is current on; `NO_THREAD` when
    /// unbound. Bound implies not disposed.
    active_thread: AtomicU64,
    disposed: AtomicBool,
}

impl Context {
    pub(crate) fn new(native: NativeId) -> Self {
        Self {
            native,
            active_thread: AtomicU64::new(NO_THREAD),
            disposed: AtomicBool::new(false),
        }
    }

    /// Opaque native handle minted by the platform backend
    pub fn native(&self) -> NativeId {
        self.native
    }

    /// Identifier of the thread this context is current on, if any
    pub fn bound_thread(&self) -> Option<u64> {
        match self.active_thread.load(Ordering::Acquire) {
            NO_THREAD => None,
            thread => Some(thread),
        }
    }

    /// Whether the context has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Claim this context for `thread`
    ///
    /// Succeeds when the context is unbound or already bound to `thread`.
    /// Fails fast when the context is disposed or current on another thread;
    /// contention is a caller-side bug, so there is no waiting.
    pub(crate) fn claim(&self, thread: u64) -> PlatformResult<()> {
        if self.is_disposed() {
            return Err(PlatformError::ObjectDisposed("context"));
        }
        match self.active_thread.compare_exchange(
            NO_THREAD,
            thread,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                // Disposal may have raced the claim; a disposed context must
                // never end up bound.
                if self.is_disposed() {
                    self.active_thread.store(NO_THREAD, Ordering::Release);
                    return Err(PlatformError::ObjectDisposed("context"));
                }
                Ok(())
            }
            Err(owner) if owner == thread => Ok(()),
            Err(owner) => Err(PlatformError::AlreadyBound {
                owner,
                caller: thread,
            }),
        }
    }

    /// Release this context if `thread` owns it; a no-op otherwise
    pub(crate) fn release(&self, thread: u64) {
        let _ = self.active_thread.compare_exchange(
            thread,
            NO_THREAD,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }

    /// Mark the context disposed; the caller has already ensured it is unbound
    pub(crate) fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("native", &self.native)
            .field("bound_thread", &self.bound_thread())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_idempotent_for_the_owner() {
        let context = Context::new(NativeId(1));
        context.claim(7).expect("first claim");
        context.claim(7).expect("second claim by the same thread");
        assert_eq!(context.bound_thread(), Some(7));
    }

    #[test]
    fn claim_fails_fast_for_other_threads() {
        let context = Context::new(NativeId(1));
        context.claim(7).expect("first claim");
        let result = context.claim(8);
        assert!(matches!(
            result,
            Err(PlatformError::AlreadyBound { owner: 7, caller: 8 })
        ));
        assert_eq!(context.bound_thread(), Some(7));
    }

    #[test]
    fn release_by_non_owner_changes_nothing() {
        let context = Context::new(NativeId(1));
        context.claim(7).expect("claim");
        context.release(8);
        assert_eq!(context.bound_thread(), Some(7));
        context.release(7);
        assert_eq!(context.bound_thread(), None);
    }

    #[test]
    fn disposed_context_rejects_claims() {
        let context = Context::new(NativeId(1));
        context.dispose();
        assert!(matches!(
            context.claim(7),
            Err(PlatformError::ObjectDisposed("context"))
        ));
        assert_eq!(context.bound_thread(), None);
    }
}
