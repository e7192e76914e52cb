//! Input state tracking
//!
//! Input device enumeration and event decoding are backend concerns; this
//! module only keeps the per-frame mouse state the core needs.
//! [`crate::System::before_update`] resets the transient portion once per
//! frame, before the backend pumps events.

use crate::foundation::math::{Point2, Vec2};
use crate::platform::PlatformEvent;

/// Per-frame input state fed by platform events
pub struct InputTracker {
    mouse_position: Point2,
    mouse_delta: Vec2,
}

impl InputTracker {
    /// Create a tracker with the cursor at the origin
    pub fn new() -> Self {
        Self {
            mouse_position: Point2::origin(),
            mouse_delta: Vec2::zeros(),
        }
    }

    /// Per-frame reset; clears deltas accumulated last frame
    pub fn begin_frame(&mut self) {
        self.mouse_delta = Vec2::zeros();
    }

    /// Fold one platform event into the tracked state
    pub fn handle_event(&mut self, event: &PlatformEvent) {
        if let PlatformEvent::MouseMoved { x, y, .. } = event {
            let next = Point2::new(*x, *y);
            self.mouse_delta += next - self.mouse_position;
            self.mouse_position = next;
        }
    }

    /// Last known cursor position, window-relative
    pub fn mouse_position(&self) -> Point2 {
        self.mouse_position
    }

    /// Cursor movement accumulated since the last frame reset
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::NativeId;

    #[test]
    fn mouse_movement_accumulates_within_a_frame() {
        let mut input = InputTracker::new();
        let window = NativeId(1);
        input.handle_event(&PlatformEvent::MouseMoved { window, x: 10.0, y: 5.0 });
        input.handle_event(&PlatformEvent::MouseMoved { window, x: 15.0, y: 9.0 });
        assert_eq!(input.mouse_position(), Point2::new(15.0, 9.0));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, 9.0));
    }

    #[test]
    fn frame_reset_clears_the_delta_but_keeps_the_position() {
        let mut input = InputTracker::new();
        let window = NativeId(1);
        input.handle_event(&PlatformEvent::MouseMoved { window, x: 10.0, y: 5.0 });
        input.begin_frame();
        assert_eq!(input.mouse_delta(), Vec2::zeros());
        assert_eq!(input.mouse_position(), Point2::new(10.0, 5.0));
    }
}
