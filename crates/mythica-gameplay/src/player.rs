//! Player controller.
//!
//! The controller is a flat gating layer over held input. It owns the
//! player's stats, resources and timed locks, and reports accepted attacks
//! and casts to the level, which turns them into attack regions.

use glam::Vec2;
use mythica_common::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::GameCatalog;
use crate::cooldown::Cooldown;
use crate::input::PlayerIntent;
use crate::movement::{Body, HitboxInset, ObstacleSet};
use crate::progression::StatSheet;
use crate::tuning::SimTuning;

/// Sprite size of the player in world units.
pub const PLAYER_SIZE: Vec2 = Vec2::splat(64.0);

/// Direction the player is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Facing up
    Up,
    /// Facing down (default)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Facing {
    /// Convert facing to a unit vector (y grows downwards).
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::NEG_Y,
            Facing::Down => Vec2::Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }

    /// Animation name prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// What the player is doing, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    /// Walking
    Moving,
    /// Standing still
    Idle,
    /// Swinging or casting
    Attacking,
}

/// Facing plus activity, e.g. `left_attack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStatus {
    /// Facing direction
    pub facing: Facing,
    /// Current activity
    pub activity: Activity,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.activity {
            Activity::Moving => write!(f, "{}", self.facing.name()),
            Activity::Idle => write!(f, "{}_idle", self.facing.name()),
            Activity::Attacking => write!(f, "{}_attack", self.facing.name()),
        }
    }
}

/// An offensive action the controller accepted this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Swing the weapon at this catalog index
    Attack {
        /// Equipped weapon index
        weapon: usize,
    },
    /// Cast the spell at this catalog index
    Cast {
        /// Equipped spell index
        spell: usize,
    },
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    /// Position, bounds and direction
    pub body: Body,
    /// Upgradable stats
    pub stats: StatSheet,
    /// Current health, in `[0, stats.health.value]`
    pub health: f32,
    /// Current energy, in `[0, stats.energy.value]`
    pub energy: f32,
    /// Unspent experience
    pub experience: f32,
    weapon_index: usize,
    magic_index: usize,
    facing: Facing,
    attacking: Cooldown,
    weapon_switch: Cooldown,
    magic_switch: Cooldown,
    vulnerability: Cooldown,
}

impl Player {
    /// Creates a player whose sprite starts at `top_left`.
    #[must_use]
    pub fn new(top_left: Vec2, tuning: &SimTuning) -> Self {
        let stats = StatSheet::default();
        Self {
            body: Body::at(top_left, PLAYER_SIZE, HitboxInset::PLAYER),
            health: stats.health.value,
            energy: stats.energy.value,
            stats,
            experience: 0.0,
            weapon_index: 0,
            magic_index: 0,
            facing: Facing::Down,
            attacking: Cooldown::new(tuning.attack_cooldown_ms),
            weapon_switch: Cooldown::new(tuning.switch_cooldown_ms),
            magic_switch: Cooldown::new(tuning.switch_cooldown_ms),
            vulnerability: Cooldown::new(tuning.player_invulnerability_ms),
        }
    }

    /// Equipped weapon index.
    #[must_use]
    pub const fn weapon_index(&self) -> usize {
        self.weapon_index
    }

    /// Equipped spell index.
    #[must_use]
    pub const fn magic_index(&self) -> usize {
        self.magic_index
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// True while an attack or cast holds the attack lock.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attacking.is_locked()
    }

    /// True when the player can take damage.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.vulnerability.is_ready()
    }

    /// True when a weapon switch would be accepted.
    #[must_use]
    pub const fn can_switch_weapon(&self) -> bool {
        self.weapon_switch.is_ready()
    }

    /// True when a spell switch would be accepted.
    #[must_use]
    pub const fn can_switch_magic(&self) -> bool {
        self.magic_switch.is_ready()
    }

    /// Center of the player.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Renderer-facing status.
    #[must_use]
    pub fn status(&self) -> PlayerStatus {
        let activity = if self.is_attacking() {
            Activity::Attacking
        } else if self.body.direction == Vec2::ZERO {
            Activity::Idle
        } else {
            Activity::Moving
        };
        PlayerStatus {
            facing: self.facing,
            activity,
        }
    }

    /// Applies one tick of input.
    ///
    /// Input is only read while no attack is in progress, and the movement
    /// direction is forced to zero for as long as one is.
    pub fn control(
        &mut self,
        intent: &PlayerIntent,
        now: Timestamp,
        catalog: &GameCatalog,
        tuning: &SimTuning,
    ) -> Option<PlayerAction> {
        let mut action = None;

        if !self.is_attacking() {
            self.read_movement(intent);

            let lock = tuning.attack_cooldown_ms + catalog.weapon(self.weapon_index).cooldown;

            if intent.attack {
                self.attacking.lock_for(now, lock);
                action = Some(PlayerAction::Attack {
                    weapon: self.weapon_index,
                });
            }

            // Shares the attack lock; energy is checked by the spell itself.
            if intent.magic && !self.is_attacking() {
                self.attacking.lock_for(now, lock);
                action = Some(PlayerAction::Cast {
                    spell: self.magic_index,
                });
            }

            if intent.switch_weapon && self.weapon_switch.is_ready() {
                self.weapon_switch.lock(now);
                self.weapon_index = (self.weapon_index + 1) % catalog.weapons.len();
                trace!(weapon = %catalog.weapon(self.weapon_index).name, "Switched weapon");
            }

            if intent.switch_magic && self.magic_switch.is_ready() {
                self.magic_switch.lock(now);
                self.magic_index = (self.magic_index + 1) % catalog.spells.len();
                trace!(spell = %catalog.spell(self.magic_index).name, "Switched spell");
            }
        }

        if self.is_attacking() {
            self.body.direction = Vec2::ZERO;
        }
        action
    }

    fn read_movement(&mut self, intent: &PlayerIntent) {
        let mut direction = Vec2::ZERO;
        if intent.up {
            direction.y = -1.0;
            self.facing = Facing::Up;
        } else if intent.down {
            direction.y = 1.0;
            self.facing = Facing::Down;
        }

        if intent.left {
            direction.x = -1.0;
            self.facing = Facing::Left;
        } else if intent.right {
            direction.x = 1.0;
            self.facing = Facing::Right;
        }
        self.body.direction = direction;
    }

    /// Moves the player at its speed stat.
    pub fn step<O: ObstacleSet + ?Sized>(&mut self, obstacles: &O) {
        self.body.step(self.stats.speed.value, obstacles);
    }

    /// Clears elapsed locks. Returns true when the attack lock cleared this
    /// tick, at which point every attack region must be destroyed.
    pub fn poll_cooldowns(&mut self, now: Timestamp) -> bool {
        self.weapon_switch.poll(now);
        self.magic_switch.poll(now);
        self.vulnerability.poll(now);
        self.attacking.poll(now)
    }

    /// Applies enemy damage if vulnerable. Returns true if it landed.
    ///
    /// Health clamps at zero; there is no death transition.
    pub fn receive_damage(&mut self, amount: f32, now: Timestamp) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.vulnerability.lock(now);
        true
    }

    /// Attack stat plus the equipped weapon's damage.
    #[must_use]
    pub fn full_weapon_damage(&self, catalog: &GameCatalog) -> f32 {
        self.stats.attack.value + catalog.weapon(self.weapon_index).damage
    }

    /// Magic stat plus the equipped spell's strength.
    #[must_use]
    pub fn full_magic_damage(&self, catalog: &GameCatalog) -> f32 {
        self.stats.magic.value + catalog.spell(self.magic_index).strength
    }

    /// Restores health, clamped to the health stat.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.stats.health.value);
    }

    /// Spends energy if enough is available. Returns false otherwise.
    pub fn spend_energy(&mut self, cost: f32) -> bool {
        if self.energy < cost {
            return false;
        }
        self.energy = (self.energy - cost).max(0.0);
        true
    }

    /// Passive energy regeneration, proportional to the magic stat.
    pub fn regenerate_energy(&mut self, tuning: &SimTuning) {
        let cap = self.stats.energy.value;
        if self.energy < cap {
            self.energy =
                (self.energy + tuning.energy_regen_per_magic * self.stats.magic.value).min(cap);
        } else {
            self.energy = cap;
        }
    }
}
