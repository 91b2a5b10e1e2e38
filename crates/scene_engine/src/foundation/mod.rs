//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and the node [`math::Transform`]
//! - Typed handles for arena-stored objects
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
