//! # Mythica Gameplay
//!
//! Real-time simulation core for Project Mythica.
//!
//! This crate provides:
//! - Axis-separated movement with swept rectangle collision
//! - Cooldown gating for every timed behavior
//! - Player controller, enemy AI and combat resolution
//! - Spell effects (heal, flame)
//! - Experience-for-stats progression and the upgrade menu
//! - Event sinks for renderers, audio and tooling
//! - The level orchestrator that runs one tick at a time

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod combat;
pub mod cooldown;
pub mod enemy;
pub mod events;
pub mod geometry;
pub mod input;
pub mod level;
pub mod magic;
pub mod movement;
pub mod player;
pub mod progression;
pub mod tuning;
pub mod upgrade_menu;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::combat::*;
    pub use crate::cooldown::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::geometry::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::movement::*;
    pub use crate::player::*;
    pub use crate::progression::*;
    pub use crate::tuning::*;
    pub use crate::upgrade_menu::*;
}

pub use prelude::*;
