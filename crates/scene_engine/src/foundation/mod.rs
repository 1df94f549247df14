//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and interpolation helpers
//! - Arena keys and collections
//! - Frame clock and timing
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
