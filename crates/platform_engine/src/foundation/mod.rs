//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - 2D math types and transforms
//! - Fixed-step time keeping
//! - Logging utilities
//! - Dynamic downcasting support

pub mod any;
pub mod logging;
pub mod math;
pub mod time;
