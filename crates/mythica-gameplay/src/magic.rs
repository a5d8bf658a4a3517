//! Spell effects.
//!
//! A cast is accepted by the player controller without looking at energy.
//! The effect checks energy itself, so an unaffordable cast does nothing
//! beyond holding the attack lock.

use glam::Vec2;
use tracing::debug;

use crate::catalog::{SpellEffect, SpellSpec};
use crate::combat::AttackRegion;
use crate::events::{EventSink, MagicParticle};
use crate::player::Player;
use crate::tuning::SimTuning;

/// Heal particles float this far above the player's center.
const HEAL_PARTICLE_OFFSET: Vec2 = Vec2::new(0.0, -30.0);

/// Resolves a spell and returns the attack regions it spawned.
///
/// `strength` is the spell's strength plus the player's magic stat.
pub fn cast(
    spell: &SpellSpec,
    strength: f32,
    player: &mut Player,
    tuning: &SimTuning,
    rng: &mut fastrand::Rng,
    sink: &mut dyn EventSink,
) -> Vec<AttackRegion> {
    match spell.effect {
        SpellEffect::Heal => {
            heal(player, strength, spell.cost, sink);
            Vec::new()
        },
        SpellEffect::Flame => flame(player, spell.cost, tuning, rng, sink),
    }
}

/// Restores `strength` health if the player is hurt and can pay `cost`.
pub fn heal(player: &mut Player, strength: f32, cost: f32, sink: &mut dyn EventSink) -> bool {
    if player.energy < cost || player.health >= player.stats.health.value {
        return false;
    }
    player.spend_energy(cost);
    player.heal(strength);
    debug!(health = player.health, energy = player.energy, "Heal cast");

    let center = player.body.rect.center();
    sink.on_magic_particles(MagicParticle::Heal, center + HEAL_PARTICLE_OFFSET);
    sink.on_magic_particles(MagicParticle::Aura, center);
    true
}

/// Throws a line of flame bursts in the facing direction.
///
/// Burst `i` (1-based) is centered `i` tiles away with up to a third of a
/// tile of random jitter on each axis. Each burst is a magic attack region.
pub fn flame(
    player: &mut Player,
    cost: f32,
    tuning: &SimTuning,
    rng: &mut fastrand::Rng,
    sink: &mut dyn EventSink,
) -> Vec<AttackRegion> {
    if !player.spend_energy(cost) {
        return Vec::new();
    }

    let tile = tuning.tile_size;
    let jitter = (tile / 3.0) as i32;
    let direction = player.facing().to_vec2();
    let center = player.body.rect.center();

    let regions: Vec<AttackRegion> = (1..=tuning.flame_bursts)
        .map(|i| {
            let offset = Vec2::new(
                rng.i32(-jitter..=jitter) as f32,
                rng.i32(-jitter..=jitter) as f32,
            );
            let position = center + direction * (i as f32 * tile) + offset;
            sink.on_magic_particles(MagicParticle::Flame, position);
            AttackRegion::magic(position, tile)
        })
        .collect();
    debug!(bursts = regions.len(), energy = player.energy, "Flame cast");
    regions
}
