//! # Mythica Common
//!
//! Common types, utilities, and shared abstractions for Project Mythica.
//!
//! This crate provides foundational types used across all Mythica subsystems:
//! - Monotonic timestamps and clocks for cooldown gating
//! - ID types (EntityId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod clock;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
