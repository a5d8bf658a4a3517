//! Combat resolution.
//!
//! Two independent damage pathways:
//! - attack regions spawned by the player against enemies and grass
//! - enemy strikes against the player
//!
//! Each target's vulnerability window is the only thing that limits damage,
//! so a region lingering over an enemy for many ticks hits it once per
//! window no matter how many regions overlap it.

use glam::Vec2;
use mythica_common::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{GameCatalog, WeaponSpec};
use crate::enemy::{Enemy, EnemyStrike};
use crate::events::EventSink;
use crate::geometry::AABB;
use crate::level::{Obstacle, ObstacleKind};
use crate::player::{Facing, Player};

/// Which player stat a region's damage is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamagePathway {
    /// Attack stat plus weapon damage
    Weapon,
    /// Magic stat plus spell strength
    Magic,
}

/// A short-lived hitbox representing a swing or spell effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackRegion {
    /// Damage area
    pub hitbox: AABB,
    /// Damage pathway
    pub pathway: DamagePathway,
}

impl AttackRegion {
    /// Creates a weapon swing placed beside the player.
    #[must_use]
    pub fn weapon(player_rect: &AABB, facing: Facing, weapon: &WeaponSpec) -> Self {
        Self {
            hitbox: weapon_region(player_rect, facing, weapon),
            pathway: DamagePathway::Weapon,
        }
    }

    /// Creates a square spell region centered at `center`.
    #[must_use]
    pub fn magic(center: Vec2, size: f32) -> Self {
        Self {
            hitbox: AABB::from_center(center, size / 2.0, size / 2.0),
            pathway: DamagePathway::Magic,
        }
    }
}

/// Places a weapon swing against the side of the player sprite it faces.
///
/// Horizontal swings sit 16 units below the sprite's vertical center,
/// vertical swings 10 units left of its horizontal center.
#[must_use]
pub fn weapon_region(player_rect: &AABB, facing: Facing, weapon: &WeaponSpec) -> AABB {
    let (reach, width) = (weapon.reach, weapon.width);
    match facing {
        Facing::Right => {
            AABB::from_mid_left(player_rect.mid_right() + Vec2::new(0.0, 16.0), reach, width)
        },
        Facing::Left => {
            AABB::from_mid_right(player_rect.mid_left() + Vec2::new(0.0, 16.0), reach, width)
        },
        Facing::Down => {
            AABB::from_mid_top(player_rect.mid_bottom() + Vec2::new(-10.0, 0.0), width, reach)
        },
        Facing::Up => {
            AABB::from_mid_bottom(player_rect.mid_top() + Vec2::new(-10.0, 0.0), width, reach)
        },
    }
}

/// Damage a region deals given the player's current stats and equipment.
#[must_use]
pub fn pathway_damage(player: &Player, pathway: DamagePathway, catalog: &GameCatalog) -> f32 {
    match pathway {
        DamagePathway::Weapon => player.full_weapon_damage(catalog),
        DamagePathway::Magic => player.full_magic_damage(catalog),
    }
}

/// What the player's attack regions hit this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackReport {
    /// Enemies that took damage, with the amount
    pub enemies_hit: Vec<(EntityId, f32)>,
    /// Indices into the obstacle list of grass tiles that were cut
    pub grass_cut: Vec<usize>,
}

/// Resolves every active region against enemies and grass.
///
/// Nothing is removed here; dead enemies and cut grass are reported so the
/// caller can remove them once iteration is over.
pub fn resolve_player_attacks<'a>(
    regions: &[AttackRegion],
    player: &Player,
    catalog: &GameCatalog,
    enemies: impl IntoIterator<Item = &'a mut Enemy>,
    obstacles: &[Obstacle],
    now: Timestamp,
) -> AttackReport {
    let mut report = AttackReport::default();
    if regions.is_empty() {
        return report;
    }

    let player_center = player.center();
    for enemy in enemies {
        for region in regions {
            if !region.hitbox.overlaps(&enemy.body.hitbox) {
                continue;
            }
            let damage = pathway_damage(player, region.pathway, catalog);
            if enemy.take_hit(damage, player_center, now) {
                debug!(enemy = %enemy.id(), damage, health = enemy.health, "Enemy hit");
                report.enemies_hit.push((enemy.id(), damage));
            }
        }
    }

    report.grass_cut = obstacles
        .iter()
        .enumerate()
        .filter(|(_, obstacle)| obstacle.kind == ObstacleKind::Grass)
        .filter(|(_, obstacle)| regions.iter().any(|r| r.hitbox.overlaps(&obstacle.hitbox)))
        .map(|(index, _)| index)
        .collect();
    report
}

/// Applies an enemy strike to the player.
///
/// The strike is consumed either way; only a vulnerable player takes damage
/// and fires `on_player_damaged`.
pub fn strike_player(
    player: &mut Player,
    strike: &EnemyStrike,
    now: Timestamp,
    sink: &mut dyn EventSink,
) -> bool {
    if !player.receive_damage(strike.damage, now) {
        return false;
    }
    debug!(
        source = %strike.source,
        damage = strike.damage,
        health = player.health,
        "Player hit"
    );
    sink.on_player_damaged(strike.damage, &strike.attack_type);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::tuning::SimTuning;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn fixture() -> (Player, Enemy, GameCatalog) {
        let tuning = SimTuning::default();
        let catalog = GameCatalog::default();
        let player = Player::new(Vec2::ZERO, &tuning);
        let spec = catalog.monster("squid").cloned().unwrap();
        let enemy = Enemy::new(spec, Vec2::new(80.0, 0.0), &tuning);
        (player, enemy, catalog)
    }

    #[test]
    fn test_weapon_region_placement() {
        let rect = AABB::from_top_left(Vec2::ZERO, 64.0, 64.0);
        let sword = WeaponSpec::new("sword", 15.0, 100);

        let right = weapon_region(&rect, Facing::Right, &sword);
        assert_eq!(right.min_x, 64.0);
        assert_eq!(right.center().y, 48.0);
        assert_eq!(right.width(), sword.reach);

        let left = weapon_region(&rect, Facing::Left, &sword);
        assert_eq!(left.max_x, 0.0);

        let down = weapon_region(&rect, Facing::Down, &sword);
        assert_eq!(down.min_y, 64.0);
        assert_eq!(down.center().x, 22.0);
        assert_eq!(down.height(), sword.reach);

        let up = weapon_region(&rect, Facing::Up, &sword);
        assert_eq!(up.max_y, 0.0);
    }

    #[test]
    fn test_weapon_hit_deals_attack_plus_weapon() {
        let (player, mut enemy, catalog) = fixture();
        let region = AttackRegion {
            hitbox: enemy.body.hitbox,
            pathway: DamagePathway::Weapon,
        };
        let report = resolve_player_attacks(
            &[region],
            &player,
            &catalog,
            std::iter::once(&mut enemy),
            &[],
            at(0),
        );
        assert_eq!(report.enemies_hit, vec![(enemy.id(), 25.0)]);
        assert_eq!(enemy.health, 75.0);
        assert!(!enemy.is_vulnerable());
    }

    #[test]
    fn test_overlapping_regions_hit_once() {
        let (player, mut enemy, catalog) = fixture();
        let region = AttackRegion::magic(enemy.center(), 64.0);
        let regions = [region; 5];

        let mut total = 0.0;
        for tick in 0..50u64 {
            enemy.poll_cooldowns(at(tick));
            let report = resolve_player_attacks(
                &regions,
                &player,
                &catalog,
                std::iter::once(&mut enemy),
                &[],
                at(tick),
            );
            total += report.enemies_hit.iter().map(|(_, d)| d).sum::<f32>();
        }
        assert_eq!(total, 9.0);
        assert_eq!(enemy.health, 91.0);
    }

    #[test]
    fn test_grass_is_cut_other_obstacles_are_not() {
        let (player, _, catalog) = fixture();
        let obstacles = vec![
            Obstacle::new(ObstacleKind::Grass, Vec2::new(64.0, 0.0)),
            Obstacle::new(ObstacleKind::Object, Vec2::new(64.0, 64.0)),
            Obstacle::new(ObstacleKind::Grass, Vec2::new(640.0, 0.0)),
        ];
        let region = AttackRegion::magic(Vec2::new(96.0, 64.0), 64.0);
        let report = resolve_player_attacks(
            &[region],
            &player,
            &catalog,
            std::iter::empty::<&mut Enemy>(),
            &obstacles,
            at(0),
        );
        assert_eq!(report.grass_cut, vec![0]);
    }

    #[test]
    fn test_strike_respects_invulnerability() {
        let (mut player, _, _) = fixture();
        let strike = EnemyStrike {
            source: EntityId::new(),
            damage: 40.0,
            attack_type: "claw".to_string(),
        };
        let mut log = EventLog::new();
        assert!(strike_player(&mut player, &strike, at(0), &mut log));
        assert!(!strike_player(&mut player, &strike, at(10), &mut log));
        assert_eq!(player.health, 60.0);
        assert_eq!(log.player_hits(), vec![40.0]);
    }
}
