//! # Platform Module
//!
//! This module contains the platform backend abstraction and its in-crate
//! implementations. Native windowing, context creation, and event pumping are
//! backend concerns; the rest of the core only ever talks to the
//! [`PlatformBackend`] trait.
//!
//! ## Organization
//!
//! - **Backend**: The trait every platform backend implements, plus the
//!   opaque identifier, flag, and event types that cross the boundary
//! - **Headless**: An in-process backend with no OS dependencies, used for
//!   tests, CI, and server-side runs
//!
//! ## Design Principles
//!
//! - **Abstraction**: Backends implement traits defined here; the core never
//!   names a concrete windowing API
//! - **Isolation**: Backend-specific state is isolated behind opaque ids
//! - **Fail-fast**: Contention and disposal errors surface immediately to the
//!   caller, never silently

use thiserror::Error;

pub mod backend;
pub mod headless;

pub use backend::{
    MonitorInfo, NativeId, NativeWindow, PlatformBackend, PlatformEvent, WindowFlags,
};
pub use headless::{BackendCall, HeadlessBackend};

/// Errors surfaced by platform operations
#[derive(Error, Debug)]
pub enum PlatformError {
    /// A context or window was used after it was disposed
    #[error("{0} used after disposal")]
    ObjectDisposed(&'static str),

    /// A context current on one thread was claimed from another
    #[error("context is current on thread {owner}, cannot claim it from thread {caller}")]
    AlreadyBound {
        /// Identifier of the thread that holds the context
        owner: u64,
        /// Identifier of the thread that attempted the claim
        caller: u64,
    },

    /// The backend does not support the requested operation
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A native failure reported by the platform backend, surfaced unchanged
    #[error("platform backend error: {0}")]
    Backend(String),
}

/// Result alias for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;
