//! Enemy perception and behavior.
//!
//! Every tick an enemy measures the distance to the player and picks one of
//! three states:
//!
//! - within the attack radius with its attack ready: `Attacking`
//! - within the notice radius: `Pursuing` (straight line, no pathfinding)
//! - otherwise: `Idle`
//!
//! While invincible after a hit, its heading is flipped and scaled by its
//! knockback resistance before it moves.

use glam::Vec2;
use mythica_common::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::catalog::MonsterSpec;
use crate::cooldown::Cooldown;
use crate::movement::{Body, HitboxInset, ObstacleSet};
use crate::tuning::SimTuning;

/// Sprite size of an enemy in world units.
pub const ENEMY_SIZE: Vec2 = Vec2::splat(64.0);

/// Behavior state of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Standing still
    #[default]
    Idle,
    /// Walking toward the player
    Pursuing,
    /// Striking the player
    Attacking,
}

impl EnemyState {
    /// Animation name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pursuing => "move",
            Self::Attacking => "attack",
        }
    }
}

/// A strike the enemy launched this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyStrike {
    /// Attacking enemy
    pub source: EntityId,
    /// Damage to apply
    pub damage: f32,
    /// Attack kind
    pub attack_type: String,
}

/// A hostile actor.
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    spec: MonsterSpec,
    /// Position, bounds and direction
    pub body: Body,
    /// Remaining health
    pub health: f32,
    state: EnemyState,
    attack: Cooldown,
    invincibility: Cooldown,
    frame_reset: bool,
}

impl Enemy {
    /// Spawns an enemy whose sprite starts at `top_left`.
    #[must_use]
    pub fn new(spec: MonsterSpec, top_left: Vec2, tuning: &SimTuning) -> Self {
        Self {
            id: EntityId::new(),
            body: Body::at(top_left, ENEMY_SIZE, HitboxInset::ENEMY),
            health: spec.health,
            spec,
            state: EnemyState::Idle,
            attack: Cooldown::new(tuning.enemy_attack_cooldown_ms),
            invincibility: Cooldown::new(tuning.enemy_invincibility_ms),
            frame_reset: false,
        }
    }

    /// Unique id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Monster type stats.
    #[must_use]
    pub const fn spec(&self) -> &MonsterSpec {
        &self.spec
    }

    /// Current behavior state.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// True when the enemy can take damage.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.invincibility.is_ready()
    }

    /// True when the attack cooldown is clear.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.attack.is_ready()
    }

    /// True on the tick the enemy entered `Attacking`, so renderers can
    /// restart the attack animation.
    #[must_use]
    pub const fn frame_reset(&self) -> bool {
        self.frame_reset
    }

    /// True once health has dropped to zero or below.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Center of the enemy.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Distance to `target` and the unit vector toward it (zero if coincident).
    #[must_use]
    pub fn distance_and_direction(&self, target: Vec2) -> (f32, Vec2) {
        let offset = target - self.center();
        (offset.length(), offset.normalize_or_zero())
    }

    /// Picks a state from the distance to the player and acts on it.
    ///
    /// Returns a strike when the enemy attacks; the attack cooldown locks
    /// whether or not the strike lands.
    pub fn think(&mut self, player_center: Vec2, now: Timestamp) -> Option<EnemyStrike> {
        let (distance, toward) = self.distance_and_direction(player_center);

        let next = if distance <= self.spec.attack_radius && self.can_attack() {
            EnemyState::Attacking
        } else if distance <= self.spec.notice_radius {
            EnemyState::Pursuing
        } else {
            EnemyState::Idle
        };
        self.frame_reset = next == EnemyState::Attacking && self.state != EnemyState::Attacking;
        if next != self.state {
            trace!(enemy = %self.id, monster = %self.spec.name, from = ?self.state, to = ?next, "Enemy state change");
        }
        self.state = next;

        match self.state {
            EnemyState::Attacking => {
                self.attack.lock(now);
                Some(EnemyStrike {
                    source: self.id,
                    damage: self.spec.damage,
                    attack_type: self.spec.attack_type.clone(),
                })
            },
            EnemyState::Pursuing => {
                self.body.direction = toward;
                None
            },
            EnemyState::Idle => {
                self.body.direction = Vec2::ZERO;
                None
            },
        }
    }

    /// Knockback while invincible: heading is scaled by `-resistance`.
    pub fn hit_reaction(&mut self) {
        if !self.is_vulnerable() {
            self.body.direction *= -self.spec.resistance;
        }
    }

    /// Moves the enemy at its speed.
    pub fn step<O: ObstacleSet + ?Sized>(&mut self, obstacles: &O) {
        self.body.step(self.spec.speed, obstacles);
    }

    /// Applies player damage if vulnerable. Returns true if it landed.
    ///
    /// A landed hit turns the enemy toward the player (so the knockback
    /// pushes it away) and starts the invincibility window. Hits during the
    /// window do nothing and never extend it.
    pub fn take_hit(&mut self, damage: f32, player_center: Vec2, now: Timestamp) -> bool {
        if !self.is_vulnerable() {
            return false;
        }
        self.body.direction = self.distance_and_direction(player_center).1;
        self.health -= damage;
        self.invincibility.lock(now);
        true
    }

    /// Clears elapsed attack and invincibility locks.
    pub fn poll_cooldowns(&mut self, now: Timestamp) {
        self.attack.poll(now);
        self.invincibility.poll(now);
    }
}
