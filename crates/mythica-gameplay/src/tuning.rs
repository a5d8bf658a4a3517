//! Tuning constants for the simulation.
//!
//! Every duration is in milliseconds of the simulation clock. The defaults
//! are the shipped game balance; a TOML `[tuning]` table may override any
//! subset of them.

use serde::{Deserialize, Serialize};

/// Size of one map tile in world units.
pub const TILE_SIZE: f32 = 64.0;

/// Timing and balance constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Base attack lock, added to the equipped weapon's own cooldown
    pub attack_cooldown_ms: u64,
    /// Lock after switching weapon or spell
    pub switch_cooldown_ms: u64,
    /// Player invulnerability after being hit
    pub player_invulnerability_ms: u64,
    /// Enemy invincibility after being hit
    pub enemy_invincibility_ms: u64,
    /// Enemy attack cooldown
    pub enemy_attack_cooldown_ms: u64,
    /// Upgrade menu input repeat guard
    pub menu_repeat_guard_ms: u64,
    /// Stat multiplier applied by an upgrade
    pub stat_growth: f32,
    /// Upgrade cost multiplier applied by an upgrade
    pub cost_escalation: f32,
    /// Energy regained per tick per point of magic
    pub energy_regen_per_magic: f32,
    /// Tile size used to space flame bursts
    pub tile_size: f32,
    /// Number of flame bursts per cast
    pub flame_bursts: u32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            attack_cooldown_ms: 400,
            switch_cooldown_ms: 200,
            player_invulnerability_ms: 500,
            enemy_invincibility_ms: 300,
            enemy_attack_cooldown_ms: 600,
            menu_repeat_guard_ms: 300,
            stat_growth: 1.2,
            cost_escalation: 1.4,
            energy_regen_per_magic: 0.01,
            tile_size: TILE_SIZE,
            flame_bursts: 5,
        }
    }
}
