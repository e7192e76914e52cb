//! Math utilities and types
//!
//! Provides the small set of geometric types the platform core needs for
//! mouse coordinates and drawable scale factors.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;
