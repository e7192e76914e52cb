//! In-process backend with no operating-system dependencies
//!
//! The headless backend implements the full [`PlatformBackend`] contract
//! against plain in-memory tables. It exists for tests, CI, and server-side
//! runs where no display is available, and doubles as the reference
//! implementation of the backend contract. Windows and contexts live in
//! [`slotmap`] tables whose keys are exported as the opaque native ids the
//! core passes around; a configurable content scale simulates high-DPI
//! drawables; every native call that matters to the affinity protocol is
//! recorded so tests can assert on it.

use slotmap::{DefaultKey, Key, KeyData, SlotMap};
use std::ffi::c_void;
use std::sync::{Mutex, PoisonError};

use super::backend::{
    MonitorInfo, NativeId, NativeWindow, PlatformBackend, PlatformEvent, WindowFlags,
};
use super::{PlatformError, PlatformResult};
use crate::foundation::math::Point2;

/// One recorded native call, kept for test assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// A make-current (or clear-current, for `None`) call
    MakeCurrent(Option<NativeId>),
    /// A buffer swap
    SwapBuffers(NativeId),
    /// Native window destruction
    DestroyWindow(NativeId),
    /// Native context destruction
    DestroyContext(NativeId),
}

struct WindowRecord {
    title: String,
    size: (u32, u32),
    position: (i32, i32),
    focused: bool,
    visible: bool,
    mouse: Point2,
    context: DefaultKey,
}

struct ContextRecord {
    pixel_size: (u32, u32),
}

struct HeadlessState {
    windows: SlotMap<DefaultKey, WindowRecord>,
    contexts: SlotMap<DefaultKey, ContextRecord>,
    pending: Vec<PlatformEvent>,
    calls: Vec<BackendCall>,
}

/// Backend implementation backed by in-memory tables
pub struct HeadlessBackend {
    state: Mutex<HeadlessState>,
    multi_window: bool,
    content_scale: f32,
}

impl HeadlessBackend {
    /// Create a backend with multi-window support and a 1:1 content scale
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HeadlessState {
                windows: SlotMap::new(),
                contexts: SlotMap::new(),
                pending: Vec::new(),
                calls: Vec::new(),
            }),
            multi_window: true,
            content_scale: 1.0,
        }
    }

    /// Simulate a high-DPI display with the given pixels-per-screen-unit ratio
    #[must_use]
    pub fn with_content_scale(mut self, scale: f32) -> Self {
        self.content_scale = scale;
        self
    }

    /// Report no multi-window support, like a console or mobile target
    #[must_use]
    pub fn single_window(mut self) -> Self {
        self.multi_window = false;
        self
    }

    /// Snapshot of every native call recorded so far
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    /// Queue an event to be drained by the next poll
    pub fn push_event(&self, event: PlatformEvent) {
        self.lock().pending.push(event);
    }

    /// Move the simulated mouse cursor inside a window
    pub fn move_mouse(&self, window: NativeId, x: f32, y: f32) {
        let mut state = self.lock();
        if let Some(record) = state.windows.get_mut(slot_key(window)) {
            record.mouse = Point2::new(x, y);
            state.pending.push(PlatformEvent::MouseMoved { window, x, y });
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pixel_size_for(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |units: u32| (units as f32 * self.content_scale) as u32;
        (scale(width), scale(height))
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn slot_key(id: NativeId) -> DefaultKey {
    DefaultKey::from(KeyData::from_ffi(id.0))
}

fn native_id(key: DefaultKey) -> NativeId {
    NativeId(key.data().as_ffi())
}

impl PlatformBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn supports_multiple_windows(&self) -> bool {
        self.multi_window
    }

    fn create_window(
        &self,
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> PlatformResult<NativeWindow> {
        let mut state = self.lock();
        if !self.multi_window && !state.windows.is_empty() {
            return Err(PlatformError::Unsupported(
                "multiple windows on a single-window backend",
            ));
        }

        let context = state.contexts.insert(ContextRecord {
            pixel_size: self.pixel_size_for(width, height),
        });

        // A newly created window takes input focus from its siblings.
        for record in state.windows.values_mut() {
            record.focused = false;
        }
        let window = state.windows.insert(WindowRecord {
            title: title.to_owned(),
            size: (width, height),
            position: (0, 0),
            focused: true,
            visible: !flags.contains(WindowFlags::HIDDEN),
            mouse: Point2::origin(),
            context,
        });

        Ok(NativeWindow {
            window: native_id(window),
            context: native_id(context),
        })
    }

    fn create_context(&self) -> PlatformResult<NativeId> {
        let mut state = self.lock();
        let context = state.contexts.insert(ContextRecord { pixel_size: (0, 0) });
        Ok(native_id(context))
    }

    fn destroy_window(&self, window: NativeId) {
        let mut state = self.lock();
        state.windows.remove(slot_key(window));
        state.calls.push(BackendCall::DestroyWindow(window));
    }

    fn destroy_context(&self, context: NativeId) {
        let mut state = self.lock();
        state.contexts.remove(slot_key(context));
        state.calls.push(BackendCall::DestroyContext(context));
    }

    fn make_current(&self, context: Option<NativeId>) -> PlatformResult<()> {
        let mut state = self.lock();
        if let Some(id) = context {
            if !state.contexts.contains_key(slot_key(id)) {
                return Err(PlatformError::Backend(format!(
                    "make_current on unknown context {id:?}"
                )));
            }
        }
        state.calls.push(BackendCall::MakeCurrent(context));
        Ok(())
    }

    fn swap_buffers(&self, window: NativeId) {
        self.lock().calls.push(BackendCall::SwapBuffers(window));
    }

    fn proc_address(&self, _name: &str) -> *const c_void {
        // No GPU API lives behind this backend.
        std::ptr::null()
    }

    fn poll_events(&self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.lock().pending)
    }

    fn request_close(&self, window: NativeId) {
        let mut state = self.lock();
        if state.windows.contains_key(slot_key(window)) {
            state.pending.push(PlatformEvent::CloseRequested { window });
        }
    }

    fn window_size(&self, window: NativeId) -> (u32, u32) {
        self.lock()
            .windows
            .get(slot_key(window))
            .map_or((0, 0), |record| record.size)
    }

    fn set_window_size(&self, window: NativeId, width: u32, height: u32) {
        let pixel_size = self.pixel_size_for(width, height);
        let mut state = self.lock();
        let Some(record) = state.windows.get_mut(slot_key(window)) else {
            return;
        };
        record.size = (width, height);
        let context = record.context;
        if let Some(context_record) = state.contexts.get_mut(context) {
            context_record.pixel_size = pixel_size;
        }
        state
            .pending
            .push(PlatformEvent::Resized { window, width, height });
    }

    fn window_position(&self, window: NativeId) -> (i32, i32) {
        self.lock()
            .windows
            .get(slot_key(window))
            .map_or((0, 0), |record| record.position)
    }

    fn set_window_position(&self, window: NativeId, x: i32, y: i32) {
        if let Some(record) = self.lock().windows.get_mut(slot_key(window)) {
            record.position = (x, y);
        }
    }

    fn window_title(&self, window: NativeId) -> String {
        self.lock()
            .windows
            .get(slot_key(window))
            .map_or_else(String::new, |record| record.title.clone())
    }

    fn set_window_title(&self, window: NativeId, title: &str) {
        if let Some(record) = self.lock().windows.get_mut(slot_key(window)) {
            record.title = title.to_owned();
        }
    }

    fn window_focused(&self, window: NativeId) -> bool {
        self.lock()
            .windows
            .get(slot_key(window))
            .is_some_and(|record| record.focused)
    }

    fn window_visible(&self, window: NativeId) -> bool {
        self.lock()
            .windows
            .get(slot_key(window))
            .is_some_and(|record| record.visible)
    }

    fn set_window_visible(&self, window: NativeId, visible: bool) {
        if let Some(record) = self.lock().windows.get_mut(slot_key(window)) {
            record.visible = visible;
        }
    }

    fn mouse_position(&self, window: NativeId) -> Point2 {
        self.lock()
            .windows
            .get(slot_key(window))
            .map_or_else(Point2::origin, |record| record.mouse)
    }

    fn mouse_screen_position(&self, window: NativeId) -> Point2 {
        self.lock()
            .windows
            .get(slot_key(window))
            .map_or_else(Point2::origin, |record| {
                Point2::new(
                    record.mouse.x + record.position.0 as f32,
                    record.mouse.y + record.position.1 as f32,
                )
            })
    }

    fn context_pixel_size(&self, context: NativeId) -> (u32, u32) {
        self.lock()
            .contexts
            .get(slot_key(context))
            .map_or((0, 0), |record| record.pixel_size)
    }

    fn monitors(&self) -> Vec<MonitorInfo> {
        vec![MonitorInfo {
            name: "Headless Display".to_owned(),
            position: (0, 0),
            size: (1920, 1080),
            refresh_rate: 60,
            content_scale: self.content_scale,
            primary: true,
        }]
    }
}
