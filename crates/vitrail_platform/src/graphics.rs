//! Graphics layer contract
//!
//! The platform core does not encode rendering commands; it talks to the
//! graphics layer through the small traits in this module. The graphics layer
//! supplies a render-target factory for new windows, framework-wide hooks
//! bracketing every window's render pass, and an observer that is told when
//! the current context changes so it can drop cached GPU state.

use std::sync::Arc;

use crate::platform::NativeId;
use crate::Context;

/// Drawable surface associated with one window
///
/// Created from the window's context by the graphics layer; the window drives
/// its frame lifecycle from [`crate::Window::render`].
pub trait RenderTarget {
    /// Begin recording a frame into this target
    fn begin_frame(&mut self);

    /// Finish the frame started by [`begin_frame`](Self::begin_frame)
    fn end_frame(&mut self);

    /// Target size in physical pixels
    fn pixel_size(&self) -> (u32, u32);
}

/// Factory and frame hooks supplied by the graphics layer
pub trait GraphicsDevice: Send + Sync {
    /// Create the render target for a newly created window
    fn create_window_target(
        &self,
        window: NativeId,
        context: &Arc<Context>,
    ) -> Box<dyn RenderTarget>;

    /// Framework-wide hook invoked before every window's render callback
    fn before_render(&self);

    /// Framework-wide hook invoked after every window's render callback
    fn after_render(&self);
}

/// Collaborator notified when a thread's current context changes
///
/// Registered on the [`crate::System`] as a single-slot handler; the
/// notification is synchronous and arrives on the thread that performed the
/// bind.
pub trait ContextObserver: Send + Sync {
    /// The calling thread made `context` current
    fn context_changed(&self, context: &Arc<Context>);
}

/// Graphics device that renders nothing
///
/// Pairs with the headless backend for tests and server-side runs.
pub struct NullGraphics;

struct NullTarget;

impl RenderTarget for NullTarget {
    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}

    fn pixel_size(&self) -> (u32, u32) {
        (0, 0)
    }
}

impl GraphicsDevice for NullGraphics {
    fn create_window_target(
        &self,
        _window: NativeId,
        _context: &Arc<Context>,
    ) -> Box<dyn RenderTarget> {
        Box::new(NullTarget)
    }

    fn before_render(&self) {}

    fn after_render(&self) {}
}

impl ContextObserver for NullGraphics {
    fn context_changed(&self, _context: &Arc<Context>) {}
}
