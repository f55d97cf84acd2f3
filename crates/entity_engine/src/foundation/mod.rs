//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Live object registry (replaces a process-wide object counter)
//! - Logging utilities

pub mod math;
pub mod memory;
pub mod logging;
