//! Level orchestrator.
//!
//! The level owns the world for one play session and runs the tick:
//!
//! 1. player control (may spawn attack regions)
//! 2. enemy perception and strikes on the player
//! 3. knockback, then movement for every actor
//! 4. attack regions against enemies and grass
//! 5. removal of dead enemies and cut grass
//! 6. cooldowns (regions vanish when the attack lock clears)
//! 7. energy regeneration
//!
//! Collections only change between phases. While paused only the upgrade
//! menu runs.

use std::collections::BTreeMap;

use glam::Vec2;
use mythica_common::{DataError, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::GameCatalog;
use crate::combat::{self, AttackRegion};
use crate::enemy::Enemy;
use crate::events::EventSink;
use crate::geometry::AABB;
use crate::input::InputManager;
use crate::magic;
use crate::movement::{HitboxInset, ObstacleSet};
use crate::player::{Player, PlayerAction};
use crate::tuning::SimTuning;
use crate::upgrade_menu::UpgradeMenu;

/// Kind of static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Invisible map boundary
    Boundary,
    /// Large scenery object (trees, rocks, statues)
    Object,
    /// Grass tile, destroyed by any attack
    Grass,
}

impl ObstacleKind {
    /// Hitbox inset for this kind.
    #[must_use]
    pub const fn inset(self) -> HitboxInset {
        match self {
            Self::Boundary => HitboxInset::NONE,
            Self::Object => HitboxInset::OBJECT,
            Self::Grass => HitboxInset::GRASS,
        }
    }
}

/// A static obstacle tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Obstacle kind
    pub kind: ObstacleKind,
    /// Visual bounds
    pub rect: AABB,
    /// Collision hitbox
    pub hitbox: AABB,
}

impl Obstacle {
    /// Creates a one-tile obstacle at `top_left`.
    #[must_use]
    pub fn new(kind: ObstacleKind, top_left: Vec2) -> Self {
        Self::with_size(kind, top_left, Vec2::splat(crate::tuning::TILE_SIZE))
    }

    /// Creates an obstacle with explicit visual size.
    #[must_use]
    pub fn with_size(kind: ObstacleKind, top_left: Vec2, size: Vec2) -> Self {
        let rect = AABB::from_top_left(top_left, size.x, size.y);
        Self {
            kind,
            rect,
            hitbox: kind.inset().apply(&rect),
        }
    }
}

impl ObstacleSet for [Obstacle] {
    fn hitboxes(&self) -> impl Iterator<Item = &AABB> {
        self.iter().map(|obstacle| &obstacle.hitbox)
    }
}

/// One play session: obstacles, player, enemies and active attacks.
#[derive(Debug)]
pub struct Level {
    catalog: GameCatalog,
    tuning: SimTuning,
    obstacles: Vec<Obstacle>,
    player: Player,
    enemies: BTreeMap<EntityId, Enemy>,
    regions: Vec<AttackRegion>,
    menu: UpgradeMenu,
    rng: fastrand::Rng,
    paused: bool,
}

impl Level {
    /// Creates a level with the player's sprite at `player_top_left`.
    ///
    /// The catalog is validated first; the tick indexes weapons and spells
    /// without further checks.
    pub fn new(
        catalog: GameCatalog,
        tuning: SimTuning,
        player_top_left: Vec2,
        seed: u64,
    ) -> Result<Self, DataError> {
        catalog.validate()?;
        info!(
            weapons = catalog.weapons.len(),
            spells = catalog.spells.len(),
            monsters = catalog.monsters.len(),
            seed,
            "Creating level"
        );
        Ok(Self {
            player: Player::new(player_top_left, &tuning),
            menu: UpgradeMenu::new(&tuning),
            catalog,
            tuning,
            obstacles: Vec::new(),
            enemies: BTreeMap::new(),
            regions: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
            paused: false,
        })
    }

    /// Adds a static obstacle.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Spawns a monster by catalog name.
    pub fn spawn_enemy(&mut self, monster: &str, top_left: Vec2) -> Result<EntityId, DataError> {
        let spec = self.catalog.monster(monster)?.clone();
        let enemy = Enemy::new(spec, top_left, &self.tuning);
        let id = enemy.id();
        debug!(enemy = %id, monster, x = top_left.x, y = top_left.y, "Spawned enemy");
        self.enemies.insert(id, enemy);
        Ok(id)
    }

    /// The data catalog.
    #[must_use]
    pub const fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// The tuning constants.
    #[must_use]
    pub const fn tuning(&self) -> &SimTuning {
        &self.tuning
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Looks up a live enemy.
    #[must_use]
    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    /// Looks up a live enemy mutably.
    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Live enemies in id order.
    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    /// Static obstacles.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Active attack regions.
    #[must_use]
    pub fn regions(&self) -> &[AttackRegion] {
        &self.regions
    }

    /// The upgrade menu.
    #[must_use]
    pub const fn menu(&self) -> &UpgradeMenu {
        &self.menu
    }

    /// True while the upgrade menu is open.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Opens or closes the upgrade menu.
    pub fn toggle_menu(&mut self) {
        self.paused = !self.paused;
        debug!(paused = self.paused, "Toggled upgrade menu");
    }

    /// Advances the simulation by one tick.
    pub fn tick(&mut self, now: Timestamp, input: &InputManager, sink: &mut dyn EventSink) {
        if input.menu_toggled() {
            self.toggle_menu();
        }
        if self.paused {
            self.menu.update(
                &input.menu_intent(),
                now,
                &mut self.player.stats,
                &mut self.player.experience,
                &self.tuning,
            );
            return;
        }

        self.control_player(now, input, sink);
        self.think_enemies(now, sink);
        self.move_actors();
        self.resolve_attacks(now, sink);
        self.poll_cooldowns(now);
        self.player.regenerate_energy(&self.tuning);
    }

    fn control_player(&mut self, now: Timestamp, input: &InputManager, sink: &mut dyn EventSink) {
        let intent = input.player_intent();
        let Some(action) = self.player.control(&intent, now, &self.catalog, &self.tuning) else {
            return;
        };

        match action {
            PlayerAction::Attack { weapon } => {
                let weapon = self.catalog.weapon(weapon);
                let region =
                    AttackRegion::weapon(&self.player.body.rect, self.player.facing(), weapon);
                self.regions.push(region);
            },
            PlayerAction::Cast { spell } => {
                let spell = self.catalog.spell(spell);
                let strength = spell.strength + self.player.stats.magic.value;
                let spawned = magic::cast(
                    spell,
                    strength,
                    &mut self.player,
                    &self.tuning,
                    &mut self.rng,
                    sink,
                );
                self.regions.extend(spawned);
            },
        }
    }

    fn think_enemies(&mut self, now: Timestamp, sink: &mut dyn EventSink) {
        let player_center = self.player.center();
        for enemy in self.enemies.values_mut() {
            if let Some(strike) = enemy.think(player_center, now) {
                combat::strike_player(&mut self.player, &strike, now, sink);
            }
        }
    }

    fn move_actors(&mut self) {
        let obstacles = self.obstacles.as_slice();
        self.player.step(obstacles);
        for enemy in self.enemies.values_mut() {
            enemy.hit_reaction();
            enemy.step(obstacles);
        }
    }

    fn resolve_attacks(&mut self, now: Timestamp, sink: &mut dyn EventSink) {
        let report = combat::resolve_player_attacks(
            &self.regions,
            &self.player,
            &self.catalog,
            self.enemies.values_mut(),
            &self.obstacles,
            now,
        );

        // Indices ascend; remove back to front.
        for index in report.grass_cut.into_iter().rev() {
            let grass = self.obstacles.remove(index);
            sink.on_grass_cut(grass.rect.center());
        }

        let dead: Vec<EntityId> = self
            .enemies
            .values()
            .filter(|enemy| enemy.is_dead())
            .map(Enemy::id)
            .collect();
        for id in dead {
            if let Some(enemy) = self.enemies.remove(&id) {
                let spec = enemy.spec();
                info!(enemy = %id, monster = %spec.name, exp = spec.exp, "Enemy died");
                sink.on_death_particles(enemy.body.rect.center(), &spec.name);
                sink.on_experience_granted(spec.exp);
                self.player.experience += spec.exp;
            }
        }
    }

    fn poll_cooldowns(&mut self, now: Timestamp) {
        if self.player.poll_cooldowns(now) {
            self.regions.clear();
        }
        for enemy in self.enemies.values_mut() {
            enemy.poll_cooldowns(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventLog, GameEvent};
    use crate::input::KeyCode;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn level() -> Level {
        Level::new(
            GameCatalog::default(),
            SimTuning::default(),
            Vec2::new(0.0, 0.0),
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_weapon_or_spell_catalog() {
        let mut catalog = GameCatalog::default();
        catalog.weapons.clear();
        assert!(matches!(
            Level::new(catalog, SimTuning::default(), Vec2::ZERO, 1),
            Err(DataError::EmptyCatalog { catalog: "weapon" })
        ));

        let mut catalog = GameCatalog::default();
        catalog.spells.clear();
        assert!(matches!(
            Level::new(catalog, SimTuning::default(), Vec2::ZERO, 1),
            Err(DataError::EmptyCatalog { catalog: "spell" })
        ));
    }

    #[test]
    fn test_obstacle_insets() {
        let object = Obstacle::new(ObstacleKind::Object, Vec2::ZERO);
        assert_eq!(object.hitbox, AABB::new(0.0, 20.0, 64.0, 44.0));
        let boundary = Obstacle::new(ObstacleKind::Boundary, Vec2::ZERO);
        assert_eq!(boundary.hitbox, boundary.rect);
    }

    #[test]
    fn test_spawn_unknown_monster() {
        let mut level = level();
        assert!(matches!(
            level.spawn_enemy("dragon", Vec2::ZERO),
            Err(DataError::Unknown { .. })
        ));
        assert!(level.spawn_enemy("bamboo", Vec2::ZERO).is_ok());
        assert_eq!(level.enemies().count(), 1);
    }

    #[test]
    fn test_player_blocked_by_boundary() {
        let mut level = level();
        level.add_obstacle(Obstacle::new(ObstacleKind::Boundary, Vec2::new(64.0, 0.0)));
        let mut input = InputManager::new();
        input.update_key(KeyCode::Right, true);

        for tick in 0..20 {
            level.tick(at(tick * 16), &input, &mut EventLog::new());
            input.end_frame();
        }
        // 64x64 sprite with a 58-wide hitbox: the hitbox stops at x = 64.
        assert_eq!(level.player().body.hitbox.max_x, 64.0);
        assert!(level
            .obstacles()
            .iter()
            .all(|o| !o.hitbox.overlaps(&level.player().body.hitbox)));
    }

    #[test]
    fn test_attack_cuts_grass_and_regions_expire() {
        let mut level = level();
        level.add_obstacle(Obstacle::new(ObstacleKind::Grass, Vec2::new(0.0, 64.0)));
        let mut input = InputManager::new();
        let mut log = EventLog::new();

        input.update_key(KeyCode::Space, true);
        level.tick(at(0), &input, &mut log);
        input.update_key(KeyCode::Space, false);
        input.end_frame();

        assert_eq!(level.regions().len(), 1);
        assert!(level.obstacles().is_empty());
        assert_eq!(
            log.events,
            vec![GameEvent::GrassCut {
                position: Vec2::new(32.0, 96.0)
            }]
        );

        level.tick(at(499), &input, &mut log);
        assert_eq!(level.regions().len(), 1);
        level.tick(at(500), &input, &mut log);
        assert!(level.regions().is_empty());
        assert!(!level.player().is_attacking());
    }

    #[test]
    fn test_paused_level_only_runs_menu() {
        let mut level = level();
        level.player_mut().experience = 100.0;
        let mut input = InputManager::new();
        let mut log = EventLog::new();

        input.update_key(KeyCode::M, true);
        level.tick(at(0), &input, &mut log);
        input.update_key(KeyCode::M, false);
        input.end_frame();
        assert!(level.is_paused());

        // Space buys health instead of attacking.
        input.update_key(KeyCode::Space, true);
        level.tick(at(16), &input, &mut log);
        assert!(!level.player().is_attacking());
        assert!(level.regions().is_empty());
        assert!((level.player().stats.health.value - 120.0).abs() < 1e-3);
        assert!(level.player().experience.abs() < 1e-3);
    }

    #[test]
    fn test_cast_flame_spawns_regions() {
        let mut level = level();
        let mut input = InputManager::new();
        let mut log = EventLog::new();
        input.update_key(KeyCode::LCtrl, true);
        level.tick(at(0), &input, &mut log);

        assert_eq!(level.regions().len(), 5);
        assert!((level.player().energy - 40.04).abs() < 1e-4);
        assert_eq!(log.events.len(), 5);
    }
}
