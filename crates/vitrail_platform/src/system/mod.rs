//! Process-wide system facade
//!
//! One [`System`] exists per running application. It owns the collections of
//! windows, monitors, and rendering contexts, orchestrates the startup /
//! per-frame / shutdown lifecycle, and delegates all native work to the
//! platform backend selected at startup. The owned collections are mutated
//! only through the backend layer (window and context construction and
//! destruction); callers get read-only views.
//!
//! # Threading
//!
//! Window and context creation and the frame loop belong to the thread that
//! created the system (the platform's main/UI thread), a documented
//! precondition the core cannot enforce portably. Context binding is the
//! exception: [`System::make_current`] and [`System::current_context`] are
//! designed to be called from arbitrary threads, via the [`ContextAffinity`]
//! handle returned by [`System::affinity`].

use std::ffi::c_void;
use std::sync::Arc;

use crate::context::Context;
use crate::foundation::thread::current_thread_id;
use crate::graphics::{ContextObserver, GraphicsDevice};
use crate::input::InputTracker;
use crate::monitor::Monitor;
use crate::platform::{
    NativeId, PlatformBackend, PlatformError, PlatformEvent, PlatformResult, WindowFlags,
};
use crate::window::Window;

mod affinity;
mod affinity_tests;

pub use affinity::ContextAffinity;

/// Process-wide facade over the platform backend
pub struct System {
    backend: Arc<dyn PlatformBackend>,
    affinity: ContextAffinity,
    windows: Vec<Window>,
    monitors: Vec<Monitor>,
    input: InputTracker,
}

impl System {
    /// Create a system running on the given backend
    pub fn new(backend: Arc<dyn PlatformBackend>) -> Self {
        let affinity = ContextAffinity::new(Arc::clone(&backend));
        Self {
            backend,
            affinity,
            windows: Vec::new(),
            monitors: Vec::new(),
            input: InputTracker::new(),
        }
    }

    /// Log identification info and take the initial monitor snapshot
    pub fn startup(&mut self) {
        log::info!(
            "{} {} starting (backend: {})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.backend.name()
        );
        self.refresh_monitors();
    }

    /// Per-frame hook invoked before the backend pumps events
    ///
    /// Delegates to the input tracker's per-frame reset.
    pub fn before_update(&mut self) {
        self.input.begin_frame();
    }

    /// Pump the backend's event queue and settle window lifecycle
    ///
    /// Drains pending platform events, feeds them to the input tracker,
    /// refreshes monitor records on hotplug, and removes windows whose
    /// closure the backend confirmed, firing each window's close callback
    /// exactly once.
    pub fn update(&mut self) {
        let events = self.backend.poll_events();
        let mut closed = Vec::new();
        let mut monitors_changed = false;

        for event in &events {
            self.input.handle_event(event);
            match event {
                PlatformEvent::CloseRequested { window } => closed.push(*window),
                PlatformEvent::MonitorsChanged => monitors_changed = true,
                _ => {}
            }
        }

        if monitors_changed {
            self.refresh_monitors();
        }
        for native in closed {
            self.remove_window(native);
        }
    }

    /// Render and present every owned window, in creation order
    pub fn render_all(&mut self) {
        for window in &mut self.windows {
            window.render();
            window.present();
        }
    }

    /// Log teardown info and destroy all remaining native objects
    ///
    /// Close callbacks do not fire at shutdown; they are reserved for windows
    /// that close while the system is running.
    pub fn shutdown(&mut self) {
        log::info!("platform system shutting down");
        if self.affinity.current_context().is_some() {
            if let Err(error) = self.affinity.make_current(None) {
                log::warn!("failed to clear current context at shutdown: {error}");
            }
        }
        while let Some(mut window) = self.windows.pop() {
            drop(window.take_on_close());
            let context = Arc::clone(window.context());
            self.backend.destroy_window(window.native());
            if let Err(error) = self.retire_context(&context) {
                log::warn!("context still bound at shutdown: {error}");
            }
        }
        for context in self.affinity.contexts() {
            if let Err(error) = self.retire_context(&context) {
                log::warn!("context still bound at shutdown: {error}");
            }
        }
        log::info!("platform system shut down");
    }

    /// Create a native window with its rendering context and render target
    ///
    /// Must be invoked from the main thread (see the module docs). The new
    /// window is appended to the owned collection; the returned reference is
    /// valid until the next lifecycle pass.
    ///
    /// # Errors
    ///
    /// [`PlatformError::Unsupported`] when a window already exists and the
    /// backend reports no multi-window support; backend creation failures are
    /// surfaced unchanged.
    pub fn create_window(
        &mut self,
        graphics: &Arc<dyn GraphicsDevice>,
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> PlatformResult<&mut Window> {
        if !self.windows.is_empty() && !self.backend.supports_multiple_windows() {
            return Err(PlatformError::Unsupported(
                "this backend hosts a single window",
            ));
        }

        let native = self.backend.create_window(title, width, height, flags)?;
        let context = Arc::new(Context::new(native.context));
        self.affinity.add_context(Arc::clone(&context));

        let target = graphics.create_window_target(native.window, &context);
        let window = Window::new(
            native.window,
            context,
            target,
            Arc::clone(&self.backend),
            Arc::clone(graphics),
            flags,
        );
        log::info!("created window '{title}' ({width}x{height})");

        self.windows.push(window);
        let index = self.windows.len() - 1;
        Ok(&mut self.windows[index])
    }

    /// Create a rendering context not attached to any window
    ///
    /// Offscreen contexts serve background work such as asynchronous resource
    /// uploads; workers claim them through [`System::affinity`].
    pub fn create_context(&mut self) -> PlatformResult<Arc<Context>> {
        let native = self.backend.create_context()?;
        let context = Arc::new(Context::new(native));
        self.affinity.add_context(Arc::clone(&context));
        log::debug!("created offscreen context {native:?}");
        Ok(context)
    }

    /// Explicitly destroy a rendering context
    ///
    /// If the context is current on the calling thread it is released first.
    ///
    /// # Errors
    ///
    /// [`PlatformError::AlreadyBound`] when the context is current on another
    /// thread; that thread must release it before it can be destroyed.
    pub fn destroy_context(&mut self, context: &Arc<Context>) -> PlatformResult<()> {
        self.retire_context(context)
    }

    /// Make `context` current for the calling thread; see [`ContextAffinity::make_current`]
    ///
    /// # Errors
    ///
    /// [`PlatformError::ObjectDisposed`] or [`PlatformError::AlreadyBound`],
    /// reported immediately.
    pub fn make_current(&self, context: Option<&Arc<Context>>) -> PlatformResult<()> {
        self.affinity.make_current(context)
    }

    /// The context current on the calling thread, if any
    pub fn current_context(&self) -> Option<Arc<Context>> {
        self.affinity.current_context()
    }

    /// Shareable affinity handle for worker threads
    pub fn affinity(&self) -> ContextAffinity {
        self.affinity.clone()
    }

    /// Register the single-slot observer notified on context changes
    pub fn set_context_observer(&self, observer: Arc<dyn ContextObserver>) {
        self.affinity.set_observer(observer);
    }

    /// Resolve a graphics entry point by name; null when unresolved
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.backend.proc_address(name)
    }

    /// Read-only view of the owned windows, in creation order
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Mutable access to one owned window
    pub fn window_mut(&mut self, index: usize) -> Option<&mut Window> {
        self.windows.get_mut(index)
    }

    /// Read-only view of the attached monitors
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Snapshot of the owned contexts, in creation order
    pub fn contexts(&self) -> Vec<Arc<Context>> {
        self.affinity.contexts()
    }

    /// Read-only view of the tracked input state
    pub fn input(&self) -> &InputTracker {
        &self.input
    }

    fn refresh_monitors(&mut self) {
        self.monitors = self
            .backend
            .monitors()
            .into_iter()
            .map(Monitor::new)
            .collect();
        log::debug!("{} monitor(s) attached", self.monitors.len());
    }

    fn remove_window(&mut self, native: NativeId) {
        let Some(index) = self.windows.iter().position(|w| w.native() == native) else {
            return;
        };
        let mut window = self.windows.remove(index);
        let context = Arc::clone(window.context());
        self.backend.destroy_window(native);
        if let Err(error) = self.retire_context(&context) {
            log::warn!("window context left alive at close: {error}");
        }
        if let Some(callback) = window.take_on_close() {
            callback();
        }
        log::debug!("window {native:?} closed");
    }

    /// Dispose a context and destroy its native object
    ///
    /// A context bound to the calling thread is released first; a context
    /// bound to another thread cannot be retired from here.
    fn retire_context(&self, context: &Arc<Context>) -> PlatformResult<()> {
        let caller = current_thread_id();
        match context.bound_thread() {
            Some(owner) if owner != caller => {
                return Err(PlatformError::AlreadyBound { owner, caller });
            }
            Some(_) => self.affinity.make_current(None)?,
            None => {}
        }
        context.dispose();
        self.affinity.remove_context(context);
        self.backend.destroy_context(context.native());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::NullGraphics;
    use crate::platform::{BackendCall, HeadlessBackend};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    fn null_graphics() -> Arc<dyn GraphicsDevice> {
        Arc::new(NullGraphics)
    }

    #[test]
    fn created_window_lands_in_the_collection_with_its_size() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let graphics = null_graphics();
        assert!(system.windows().is_empty());

        let window = system
            .create_window(&graphics, "A", 800, 600, WindowFlags::empty())
            .expect("window creation");
        assert_eq!(window.width(), 800);
        assert_eq!(window.height(), 600);
        assert_eq!(system.windows().len(), 1);
        assert_eq!(system.contexts().len(), 1);
    }

    #[test]
    fn single_window_backend_rejects_a_second_window() {
        let mut system = System::new(Arc::new(HeadlessBackend::new().single_window()));
        let graphics = null_graphics();
        system
            .create_window(&graphics, "first", 800, 600, WindowFlags::empty())
            .expect("first window");

        let second = system.create_window(&graphics, "second", 640, 480, WindowFlags::empty());
        assert!(matches!(second, Err(PlatformError::Unsupported(_))));
        assert_eq!(system.windows().len(), 1);
    }

    #[test]
    fn closing_a_window_removes_it_and_fires_on_close_once() {
        let backend = Arc::new(HeadlessBackend::new());
        let mut system = System::new(backend.clone());
        let graphics = null_graphics();

        let close_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&close_count);
        let window = system
            .create_window(&graphics, "closing", 800, 600, WindowFlags::empty())
            .expect("window creation");
        window.set_on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let native = window.native();
        let context = Arc::clone(window.context());

        window.close();
        system.update();

        assert!(system.windows().is_empty());
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
        assert!(context.is_disposed());
        assert!(backend.calls().contains(&BackendCall::DestroyWindow(native)));

        // a second frame pass must not fire the callback again
        system.update();
        assert_eq!(close_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn startup_takes_a_monitor_snapshot() {
        let mut system = System::new(Arc::new(HeadlessBackend::new().with_content_scale(2.0)));
        assert!(system.monitors().is_empty());
        system.startup();
        assert_eq!(system.monitors().len(), 1);
        let monitor = &system.monitors()[0];
        assert!(monitor.is_primary());
        assert_eq!(monitor.content_scale(), 2.0);
    }

    #[test]
    fn shutdown_destroys_remaining_contexts_without_firing_close() {
        let backend = Arc::new(HeadlessBackend::new());
        let mut system = System::new(backend.clone());
        let graphics = null_graphics();

        let close_count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&close_count);
        let window = system
            .create_window(&graphics, "short-lived", 800, 600, WindowFlags::empty())
            .expect("window creation");
        window.set_on_close(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let offscreen = system.create_context().expect("offscreen context");

        system.shutdown();

        assert!(system.windows().is_empty());
        assert!(system.contexts().is_empty());
        assert_eq!(close_count.load(Ordering::SeqCst), 0);
        assert!(backend
            .calls()
            .contains(&BackendCall::DestroyContext(offscreen.native())));
    }

    #[test]
    fn destroying_a_context_bound_to_the_calling_thread_releases_it_first() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let context = system.create_context().expect("context creation");
        system.make_current(Some(&context)).expect("bind");

        system.destroy_context(&context).expect("destroy");
        assert!(context.is_disposed());
        assert!(system.current_context().is_none());
        assert!(system.contexts().is_empty());
    }

    #[test]
    fn a_context_bound_on_another_thread_cannot_be_destroyed() {
        let mut system = System::new(Arc::new(HeadlessBackend::new()));
        let context = system.create_context().expect("context creation");
        let affinity = system.affinity();

        let (bound_tx, bound_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let worker_context = Arc::clone(&context);
        let worker = std::thread::spawn(move || {
            affinity
                .make_current(Some(&worker_context))
                .expect("worker bind");
            bound_tx.send(()).expect("signal bound");
            release_rx.recv().expect("wait for main");
            affinity.make_current(None).expect("worker release");
        });

        bound_rx.recv().expect("worker bound");
        let result = system.destroy_context(&context);
        assert!(matches!(result, Err(PlatformError::AlreadyBound { .. })));
        assert!(!context.is_disposed());

        release_tx.send(()).expect("release worker");
        worker.join().expect("worker thread");
    }

    #[test]
    fn update_feeds_platform_events_to_the_input_tracker() {
        let backend = Arc::new(HeadlessBackend::new());
        let mut system = System::new(backend.clone());
        let graphics = null_graphics();
        let native = system
            .create_window(&graphics, "input", 800, 600, WindowFlags::empty())
            .expect("window creation")
            .native();

        backend.move_mouse(native, 120.0, 80.0);
        system.before_update();
        system.update();

        let position = system.input().mouse_position();
        assert_eq!((position.x, position.y), (120.0, 80.0));
    }
}
