//! Foundation module - Core utilities and types
//!
//! - Math types and the quaternion convention boundary
//! - Logging utilities

pub mod math;
pub mod logging;
