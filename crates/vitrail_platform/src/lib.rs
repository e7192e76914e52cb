//! # Vitrail Platform
//!
//! Platform abstraction core for the Vitrail windowing and rendering framework.
//!
//! ## Features
//!
//! - **System Facade**: One process-wide [`System`] owning windows, monitors,
//!   and rendering contexts
//! - **Context Thread Affinity**: A rendering context is current on at most
//!   one thread at a time, enforced with atomics and fail-fast errors
//! - **Backend Abstraction**: Native windowing lives behind the
//!   [`platform::PlatformBackend`] trait; a headless backend ships in-crate
//! - **Frame Loop Integration**: Per-frame update, render, and present hooks
//!   driven by the hosting application
//! - **Cross-Platform**: No OS-specific code in the core; backends are
//!   selected at startup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitrail_platform::prelude::*;
//!
//! fn main() -> Result<(), PlatformError> {
//!     let backend = Arc::new(HeadlessBackend::new());
//!     let graphics: Arc<dyn GraphicsDevice> = Arc::new(NullGraphics);
//!
//!     let mut system = System::new(backend);
//!     system.startup();
//!
//!     let window = system.create_window(&graphics, "Demo", 1280, 720, WindowFlags::RESIZABLE)?;
//!     window.set_on_render(|_target| {
//!         // issue draw calls here
//!     });
//!
//!     for _ in 0..3 {
//!         system.before_update();
//!         system.update();
//!         system.render_all();
//!     }
//!
//!     system.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod graphics;
pub mod input;
pub mod platform;
pub mod system;

mod context;
mod monitor;
mod window;

pub use context::Context;
pub use monitor::Monitor;
pub use system::{ContextAffinity, System};
pub use window::{CloseCallback, DrawableBounds, RenderCallback, Window};

/// Common imports for framework users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SystemConfig, WindowConfig},
        foundation::math::{Point2, Vec2},
        graphics::{ContextObserver, GraphicsDevice, NullGraphics, RenderTarget},
        input::InputTracker,
        platform::{
            HeadlessBackend, MonitorInfo, NativeId, PlatformBackend, PlatformError,
            PlatformEvent, PlatformResult, WindowFlags,
        },
        Context, ContextAffinity, DrawableBounds, Monitor, System, Window,
    };
}
