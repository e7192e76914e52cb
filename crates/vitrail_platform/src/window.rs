//! OS window coupled to one rendering context and one render target
//!
//! A [`Window`] wraps one native window handle, the rendering context assigned
//! to it at construction (immutable for the window's lifetime), and the render
//! target the graphics layer created from that context. Geometry and state
//! accessors are backed by the platform backend; the per-frame render sequence
//! is driven from [`Window::render`].

use std::sync::Arc;

use crate::foundation::math::{Point2, Vec2};
use crate::graphics::{GraphicsDevice, RenderTarget};
use crate::platform::{NativeId, PlatformBackend, WindowFlags};
use crate::Context;

/// Single-slot render callback, invoked with the window's render target
pub type RenderCallback = Box<dyn FnMut(&mut dyn RenderTarget)>;

/// Single-slot close callback, invoked when the window leaves the system
pub type CloseCallback = Box<dyn FnOnce()>;

/// Drawable region of a window in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawableBounds {
    /// Left edge, always 0 for a window-attached drawable
    pub x: u32,
    /// Top edge, always 0 for a window-attached drawable
    pub y: u32,
    /// Width in physical pixels
    pub width: u32,
    /// Height in physical pixels
    pub height: u32,
}

/// One OS-level window owned by a [`crate::System`]
///
/// Created through [`crate::System::create_window`] on the main thread.
/// Closing goes through [`Window::close`]; the system removes the window from
/// its collection and fires the close callback once the backend confirms.
pub struct Window {
    native: NativeId,
    context: Arc<Context>,
    target: Box<dyn RenderTarget>,
    backend: Arc<dyn PlatformBackend>,
    graphics: Arc<dyn GraphicsDevice>,
    flags: WindowFlags,
    on_render: Option<RenderCallback>,
    on_close: Option<CloseCallback>,
}

impl Window {
    pub(crate) fn new(
        native: NativeId,
        context: Arc<Context>,
        target: Box<dyn RenderTarget>,
        backend: Arc<dyn PlatformBackend>,
        graphics: Arc<dyn GraphicsDevice>,
        flags: WindowFlags,
    ) -> Self {
        Self {
            native,
            context,
            target,
            backend,
            graphics,
            flags,
            on_render: None,
            on_close: None,
        }
    }

    /// Opaque native window handle
    pub fn native(&self) -> NativeId {
        self.native
    }

    /// The rendering context permanently assigned to this window
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// The render target created from this window's context
    pub fn target(&self) -> &dyn RenderTarget {
        self.target.as_ref()
    }

    /// Flags the window was created with
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Register the render callback invoked once per frame
    pub fn set_on_render(&mut self, callback: impl FnMut(&mut dyn RenderTarget) + 'static) {
        self.on_render = Some(Box::new(callback));
    }

    /// Register the callback fired when the window is removed from the system
    pub fn set_on_close(&mut self, callback: impl FnOnce() + 'static) {
        self.on_close = Some(Box::new(callback));
    }

    pub(crate) fn take_on_close(&mut self) -> Option<CloseCallback> {
        self.on_close.take()
    }

    /// Drive one render pass for this window
    ///
    /// The ordering is fixed: the target's frame begins, the framework-wide
    /// before-render hook runs, the window's own render callback runs (if
    /// registered), the after-render hook runs, and the frame ends. The hooks
    /// bracket the callback even when no callback is registered.
    pub fn render(&mut self) {
        self.target.begin_frame();
        self.graphics.before_render();
        if let Some(callback) = self.on_render.as_mut() {
            callback(self.target.as_mut());
        }
        self.graphics.after_render();
        self.target.end_frame();
    }

    /// Swap the window's front and back buffers
    pub fn present(&self) {
        self.backend.swap_buffers(self.native);
    }

    /// Request native destruction of this window
    ///
    /// Removal is asynchronous: the backend confirms closure through the event
    /// pump, at which point [`crate::System::update`] drops the window from
    /// the owned collection and fires the close callback.
    pub fn close(&self) {
        self.backend.request_close(self.native);
    }

    /// Client area size in screen units
    pub fn size(&self) -> (u32, u32) {
        self.backend.window_size(self.native)
    }

    /// Width of the client area in screen units
    pub fn width(&self) -> u32 {
        self.size().0
    }

    /// Height of the client area in screen units
    pub fn height(&self) -> u32 {
        self.size().1
    }

    /// Resize the client area
    pub fn set_size(&self, width: u32, height: u32) {
        self.backend.set_window_size(self.native, width, height);
    }

    /// Position of the top-left corner in virtual screen space
    pub fn position(&self) -> (i32, i32) {
        self.backend.window_position(self.native)
    }

    /// Move the window
    pub fn set_position(&self, x: i32, y: i32) {
        self.backend.set_window_position(self.native, x, y);
    }

    /// Current window title
    pub fn title(&self) -> String {
        self.backend.window_title(self.native)
    }

    /// Change the window title
    pub fn set_title(&self, title: &str) {
        self.backend.set_window_title(self.native, title);
    }

    /// Whether the window currently has input focus
    pub fn focused(&self) -> bool {
        self.backend.window_focused(self.native)
    }

    /// Whether the window is currently visible
    pub fn visible(&self) -> bool {
        self.backend.window_visible(self.native)
    }

    /// Show or hide the window
    pub fn set_visible(&self, visible: bool) {
        self.backend.set_window_visible(self.native, visible);
    }

    /// Whether the window was created fullscreen
    pub fn fullscreen(&self) -> bool {
        self.flags.contains(WindowFlags::FULLSCREEN)
    }

    /// Whether buffer swaps are synchronized with the display refresh
    pub fn vsync(&self) -> bool {
        self.flags.contains(WindowFlags::VSYNC)
    }

    /// Mouse position relative to this window, in screen units
    pub fn mouse_position(&self) -> Point2 {
        self.backend.mouse_position(self.native)
    }

    /// Mouse position in virtual screen space, in screen units
    pub fn mouse_screen_position(&self) -> Point2 {
        self.backend.mouse_screen_position(self.native)
    }

    /// Drawable size in physical pixels, as reported by the context
    pub fn drawable_size(&self) -> (u32, u32) {
        self.backend.context_pixel_size(self.context.native())
    }

    /// Drawable region in physical pixels
    pub fn drawable_bounds(&self) -> DrawableBounds {
        let (width, height) = self.drawable_size();
        DrawableBounds {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Ratio of drawable pixels to screen units on each axis
    ///
    /// Greater than 1 on high-density displays, 1 elsewhere. `None` while the
    /// window has no valid size; a zero-sized window leaves the scale
    /// undefined rather than faulting the caller.
    pub fn drawable_scale(&self) -> Option<Vec2> {
        let (width, height) = self.size();
        if width == 0 || height == 0 {
            return None;
        }
        let (pixel_width, pixel_height) = self.drawable_size();
        Some(Vec2::new(
            pixel_width as f32 / width as f32,
            pixel_height as f32 / height as f32,
        ))
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("native", &self.native)
            .field("title", &self.title())
            .field("size", &self.size())
            .field("flags", &self.flags)
            .finish()
    }
}
