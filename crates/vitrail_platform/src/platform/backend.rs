//! Backend-agnostic platform trait
//!
//! This module defines the contract every platform backend must implement.
//! The [`crate::System`] facade delegates all native work here: window and
//! context construction, the make-current protocol, buffer swaps, event
//! pumping, and monitor enumeration. Concrete operating-system backends live
//! out of tree; the in-crate [`super::HeadlessBackend`] implements the full
//! contract without touching the OS.

use bitflags::bitflags;
use std::ffi::c_void;

use super::PlatformResult;
use crate::foundation::math::Point2;

/// Opaque identifier of a native object minted by a backend
///
/// Window and context identifiers occupy separate namespaces; a backend only
/// ever receives a window id where it handed one out, and likewise for
/// contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeId(pub u64);

bitflags! {
    /// Window creation options passed through to the backend
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowFlags: u32 {
        /// Create the window without a border or title bar
        const BORDERLESS = 1 << 0;
        /// Allow the user to resize the window
        const RESIZABLE = 1 << 1;
        /// Start the window in fullscreen mode
        const FULLSCREEN = 1 << 2;
        /// Create the window initially hidden
        const HIDDEN = 1 << 3;
        /// Synchronize buffer swaps with the display refresh
        const VSYNC = 1 << 4;
    }
}

/// Result of native window creation
///
/// A native window always arrives together with the rendering context the
/// backend created for it.
#[derive(Debug, Clone, Copy)]
pub struct NativeWindow {
    /// Identifier of the new native window
    pub window: NativeId,
    /// Identifier of the rendering context bound to the window for its lifetime
    pub context: NativeId,
}

/// Events drained from the backend once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The user or the application requested that a window close
    CloseRequested {
        /// The window being closed
        window: NativeId,
    },
    /// A window's client area changed size (screen units)
    Resized {
        /// The resized window
        window: NativeId,
        /// New width in screen units
        width: u32,
        /// New height in screen units
        height: u32,
    },
    /// A window gained or lost input focus
    FocusChanged {
        /// The affected window
        window: NativeId,
        /// Whether the window now has focus
        focused: bool,
    },
    /// The mouse moved inside a window (window-relative coordinates)
    MouseMoved {
        /// The window the cursor is over
        window: NativeId,
        /// Cursor x position in screen units
        x: f32,
        /// Cursor y position in screen units
        y: f32,
    },
    /// The set of attached monitors changed
    MonitorsChanged,
}

/// Description of one physical display
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorInfo {
    /// Human-readable monitor name
    pub name: String,
    /// Position of the monitor in the virtual screen space
    pub position: (i32, i32),
    /// Resolution in screen units
    pub size: (u32, u32),
    /// Refresh rate in hertz
    pub refresh_rate: u32,
    /// Ratio of physical pixels to screen units on this display
    pub content_scale: f32,
    /// Whether this is the primary monitor
    pub primary: bool,
}

/// Contract implemented by every platform backend
///
/// Backends are shared across threads (`Send + Sync`, interior mutability in
/// implementations) because [`make_current`](Self::make_current) is invoked
/// from arbitrary worker threads. All other operations are a documented
/// main-thread contract: window and context construction, destruction, and
/// event pumping must happen on the thread that created the [`crate::System`].
/// The core cannot enforce that portably; violating it is backend-defined
/// behavior.
pub trait PlatformBackend: Send + Sync {
    /// Backend name for startup logging
    fn name(&self) -> &str;

    /// Whether this backend can host more than one window per process
    fn supports_multiple_windows(&self) -> bool;

    /// Create a native window and its rendering context
    fn create_window(
        &self,
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> PlatformResult<NativeWindow>;

    /// Create a rendering context not attached to any window
    fn create_context(&self) -> PlatformResult<NativeId>;

    /// Destroy a native window (its context is destroyed separately)
    fn destroy_window(&self, window: NativeId);

    /// Destroy a native rendering context
    fn destroy_context(&self, context: NativeId);

    /// Make a context current for GPU calls on the calling thread
    ///
    /// `None` clears the calling thread's current-context state. This is the
    /// one entry point backends must accept from any thread; the core has
    /// already enforced the single-owner invariant before calling it.
    fn make_current(&self, context: Option<NativeId>) -> PlatformResult<()>;

    /// Swap the window's front and back buffers
    fn swap_buffers(&self, window: NativeId);

    /// Resolve a graphics entry point by name
    ///
    /// Returns a null pointer when the name cannot be resolved.
    fn proc_address(&self, name: &str) -> *const c_void;

    /// Drain all pending platform events
    fn poll_events(&self) -> Vec<PlatformEvent>;

    /// Request that a window close; confirmation arrives as a
    /// [`PlatformEvent::CloseRequested`] on a later poll
    fn request_close(&self, window: NativeId);

    /// Client area size of a window in screen units
    fn window_size(&self, window: NativeId) -> (u32, u32);

    /// Resize a window's client area
    fn set_window_size(&self, window: NativeId, width: u32, height: u32);

    /// Position of a window's top-left corner in virtual screen space
    fn window_position(&self, window: NativeId) -> (i32, i32);

    /// Move a window
    fn set_window_position(&self, window: NativeId, x: i32, y: i32);

    /// Current window title
    fn window_title(&self, window: NativeId) -> String;

    /// Change the window title
    fn set_window_title(&self, window: NativeId, title: &str);

    /// Whether the window currently has input focus
    fn window_focused(&self, window: NativeId) -> bool;

    /// Whether the window is currently visible
    fn window_visible(&self, window: NativeId) -> bool;

    /// Show or hide a window
    fn set_window_visible(&self, window: NativeId, visible: bool);

    /// Mouse position relative to the window's client area, in screen units
    fn mouse_position(&self, window: NativeId) -> Point2;

    /// Mouse position in virtual screen space, in screen units
    fn mouse_screen_position(&self, window: NativeId) -> Point2;

    /// Drawable size of a context in physical pixels
    ///
    /// For a window-attached context this is the framebuffer size, which
    /// exceeds the window's screen-unit size on high-DPI displays.
    fn context_pixel_size(&self, context: NativeId) -> (u32, u32);

    /// Enumerate the attached monitors
    fn monitors(&self) -> Vec<MonitorInfo>;
}
