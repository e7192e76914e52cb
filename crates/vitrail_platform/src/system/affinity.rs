//! Context thread-affinity manager
//!
//! GPU driver state behind a rendering context is only valid for manipulation
//! on one OS thread at a time. This module is the single authority that
//! enforces it: a context is current on at most one thread, and a thread has
//! at most one current context. Binding replaces the calling thread's
//! previous binding; it never touches other threads' bindings. Contention is
//! a caller-side bug, so a claim against a context owned by another thread
//! fails immediately instead of blocking.

use std::sync::{Arc, PoisonError, RwLock};

use crate::context::Context;
use crate::foundation::thread::current_thread_id;
use crate::graphics::ContextObserver;
use crate::platform::{PlatformBackend, PlatformResult};

type ContextList = Arc<RwLock<Vec<Arc<Context>>>>;
type ObserverSlot = Arc<RwLock<Option<Arc<dyn ContextObserver>>>>;

/// Shareable handle to the affinity state of one [`crate::System`]
///
/// The system embeds one manager and hands out clones via
/// [`crate::System::affinity`]; worker threads use their clone to claim
/// contexts for background GPU work while the main thread keeps its own
/// binding. The context list is behind a single-writer/multi-reader lock so
/// scans stay safe while the main thread appends newly created contexts.
#[derive(Clone)]
pub struct ContextAffinity {
    contexts: ContextList,
    backend: Arc<dyn PlatformBackend>,
    observer: ObserverSlot,
}

impl ContextAffinity {
    pub(crate) fn new(backend: Arc<dyn PlatformBackend>) -> Self {
        Self {
            contexts: Arc::new(RwLock::new(Vec::new())),
            backend,
            observer: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) fn add_context(&self, context: Arc<Context>) {
        self.contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(context);
    }

    pub(crate) fn remove_context(&self, context: &Arc<Context>) {
        self.contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|candidate| !Arc::ptr_eq(candidate, context));
    }

    pub(crate) fn set_observer(&self, observer: Arc<dyn ContextObserver>) {
        *self
            .observer
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(observer);
    }

    /// Snapshot of the contexts owned by the system, in creation order
    pub fn contexts(&self) -> Vec<Arc<Context>> {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The context current on the calling thread, if any
    ///
    /// Scans all owned contexts for the one bound to the calling thread. Safe
    /// to call from any thread while other threads bind their own contexts
    /// and the main thread appends new ones.
    pub fn current_context(&self) -> Option<Arc<Context>> {
        let thread = current_thread_id();
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|context| context.bound_thread() == Some(thread))
            .cloned()
    }

    /// Make `context` current for GPU calls on the calling thread
    ///
    /// Binding is destructive of the calling thread's previous binding, not
    /// of other threads': the thread's current context (if any) is released
    /// first, then the new one is claimed. Passing `None` clears the calling
    /// thread's native current-context state.
    ///
    /// # Errors
    ///
    /// [`crate::platform::PlatformError::ObjectDisposed`] when `context` has
    /// been disposed, [`crate::platform::PlatformError::AlreadyBound`] when
    /// it is current on another thread. Both are reported immediately; there
    /// is no waiting or retry.
    pub fn make_current(&self, context: Option<&Arc<Context>>) -> PlatformResult<()> {
        let thread = current_thread_id();

        if let Some(context) = context {
            if context.bound_thread() == Some(thread) {
                return Ok(());
            }
        }

        self.release_current(thread);

        match context {
            None => self.backend.make_current(None),
            Some(context) => {
                context.claim(thread)?;
                if let Err(error) = self.backend.make_current(Some(context.native())) {
                    // native call refused, the claim must not survive it
                    context.release(thread);
                    return Err(error);
                }
                log::trace!(
                    "context {:?} made current on thread {thread}",
                    context.native()
                );
                self.notify(context);
                Ok(())
            }
        }
    }

    /// Release whatever context `thread` currently holds
    fn release_current(&self, thread: u64) {
        let contexts = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for context in contexts.iter() {
            context.release(thread);
        }
    }

    fn notify(&self, context: &Arc<Context>) {
        let observer = self
            .observer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(observer) = observer {
            observer.context_changed(context);
        }
    }
}
