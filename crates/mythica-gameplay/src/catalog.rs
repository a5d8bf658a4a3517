//! Weapon, spell, and monster catalogs.
//!
//! This module provides:
//! - Ordered weapon and spell catalogs (the player cycles through them)
//! - Monster stat records keyed by name
//! - TOML loading with validation
//!
//! `GameCatalog::default()` carries the shipped game data.

use mythica_common::{DataError, MythicaResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// Weapons
// ============================================================================

/// A melee weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Identifier, also the sprite folder name
    pub name: String,
    /// Damage added to the player's attack stat
    pub damage: f32,
    /// Extra attack lock in milliseconds on top of the base attack cooldown
    pub cooldown: u64,
    /// Length of the swing region along the facing direction
    #[serde(default = "default_weapon_reach")]
    pub reach: f32,
    /// Width of the swing region across the facing direction
    #[serde(default = "default_weapon_width")]
    pub width: f32,
}

fn default_weapon_reach() -> f32 {
    40.0
}

fn default_weapon_width() -> f32 {
    20.0
}

impl WeaponSpec {
    /// Creates a weapon with default swing dimensions.
    #[must_use]
    pub fn new(name: &str, damage: f32, cooldown: u64) -> Self {
        Self {
            name: name.to_string(),
            damage,
            cooldown,
            reach: default_weapon_reach(),
            width: default_weapon_width(),
        }
    }

    /// Sets the swing region dimensions.
    #[must_use]
    pub fn with_swing(mut self, reach: f32, width: f32) -> Self {
        self.reach = reach;
        self.width = width;
        self
    }
}

// ============================================================================
// Spells
// ============================================================================

/// What a spell does when cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellEffect {
    /// Restores health
    Heal,
    /// Throws a line of fire bursts in the facing direction
    Flame,
}

/// A spell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellSpec {
    /// Identifier
    pub name: String,
    /// Effect kind
    pub effect: SpellEffect,
    /// Strength added to the player's magic stat
    pub strength: f32,
    /// Energy cost
    pub cost: f32,
}

impl SpellSpec {
    /// Creates a spell.
    #[must_use]
    pub fn new(name: &str, effect: SpellEffect, strength: f32, cost: f32) -> Self {
        Self {
            name: name.to_string(),
            effect,
            strength,
            cost,
        }
    }
}

// ============================================================================
// Monsters
// ============================================================================

/// Immutable stats of a monster type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpec {
    /// Monster type name
    pub name: String,
    /// Starting health
    pub health: f32,
    /// Experience granted on death
    pub exp: f32,
    /// Damage dealt per landed attack
    pub damage: f32,
    /// Attack kind, used by renderers to pick hit particles
    pub attack_type: String,
    /// Movement speed per tick
    pub speed: f32,
    /// Knockback resistance factor
    pub resistance: f32,
    /// Distance at which the monster attacks
    pub attack_radius: f32,
    /// Distance at which the monster starts pursuing
    pub notice_radius: f32,
}

impl MonsterSpec {
    fn validate(&self) -> Result<(), DataError> {
        let fields = [
            ("health", self.health),
            ("exp", self.exp),
            ("damage", self.damage),
            ("speed", self.speed),
            ("resistance", self.resistance),
            ("attack_radius", self.attack_radius),
            ("notice_radius", self.notice_radius),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DataError::InvalidField {
                    catalog: "monster",
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// All data tables the simulation reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCatalog {
    /// Weapons in cycling order
    pub weapons: Vec<WeaponSpec>,
    /// Spells in cycling order
    pub spells: Vec<SpellSpec>,
    /// Monster types
    pub monsters: Vec<MonsterSpec>,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self {
            weapons: vec![
                WeaponSpec::new("sword", 15.0, 100),
                WeaponSpec::new("lance", 30.0, 400).with_swing(56.0, 16.0),
                WeaponSpec::new("axe", 20.0, 300).with_swing(36.0, 28.0),
                WeaponSpec::new("rapier", 8.0, 50).with_swing(48.0, 12.0),
                WeaponSpec::new("sai", 10.0, 80).with_swing(28.0, 16.0),
            ],
            spells: vec![
                SpellSpec::new("flame", SpellEffect::Flame, 5.0, 20.0),
                SpellSpec::new("heal", SpellEffect::Heal, 20.0, 10.0),
            ],
            monsters: vec![
                monster("squid", 100.0, 100.0, 10.0, "slash", 3.0, 80.0, 360.0),
                monster("raccoon", 300.0, 250.0, 40.0, "claw", 2.0, 120.0, 400.0),
                monster("spirit", 100.0, 110.0, 8.0, "thunder", 4.0, 60.0, 350.0),
                monster("bamboo", 70.0, 120.0, 6.0, "leaf_attack", 3.0, 50.0, 300.0),
            ],
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn monster(
    name: &str,
    health: f32,
    exp: f32,
    damage: f32,
    attack_type: &str,
    speed: f32,
    attack_radius: f32,
    notice_radius: f32,
) -> MonsterSpec {
    MonsterSpec {
        name: name.to_string(),
        health,
        exp,
        damage,
        attack_type: attack_type.to_string(),
        speed,
        resistance: 3.0,
        attack_radius,
        notice_radius,
    }
}

impl GameCatalog {
    /// Parses and validates a catalog from TOML.
    pub fn from_toml_str(source: &str) -> MythicaResult<Self> {
        let catalog: Self = toml::from_str(source)?;
        catalog.validate()?;
        info!(
            weapons = catalog.weapons.len(),
            spells = catalog.spells.len(),
            monsters = catalog.monsters.len(),
            "Loaded game catalog"
        );
        Ok(catalog)
    }

    /// Reads, parses and validates a catalog file.
    pub fn load_from<P: AsRef<std::path::Path>>(path: P) -> MythicaResult<Self> {
        let path = path.as_ref();
        debug!("Reading catalog from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks catalog invariants: non-empty cycling catalogs, unique names,
    /// non-negative monster stats.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.weapons.is_empty() {
            return Err(DataError::EmptyCatalog { catalog: "weapon" });
        }
        if self.spells.is_empty() {
            return Err(DataError::EmptyCatalog { catalog: "spell" });
        }
        check_unique("weapon", self.weapons.iter().map(|w| w.name.as_str()))?;
        check_unique("spell", self.spells.iter().map(|s| s.name.as_str()))?;
        check_unique("monster", self.monsters.iter().map(|m| m.name.as_str()))?;

        for weapon in &self.weapons {
            if weapon.damage < 0.0 || weapon.reach <= 0.0 || weapon.width <= 0.0 {
                return Err(DataError::InvalidField {
                    catalog: "weapon",
                    name: weapon.name.clone(),
                    field: "damage/reach/width",
                    value: weapon.damage.min(weapon.reach).min(weapon.width),
                });
            }
        }
        for spell in &self.spells {
            if spell.cost < 0.0 {
                return Err(DataError::InvalidField {
                    catalog: "spell",
                    name: spell.name.clone(),
                    field: "cost",
                    value: spell.cost,
                });
            }
        }
        self.monsters.iter().try_for_each(MonsterSpec::validate)
    }

    /// Looks up a monster type by name.
    pub fn monster(&self, name: &str) -> Result<&MonsterSpec, DataError> {
        self.monsters
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| DataError::Unknown {
                catalog: "monster",
                name: name.to_string(),
            })
    }

    /// Weapon at a cycling index (wraps).
    #[must_use]
    pub fn weapon(&self, index: usize) -> &WeaponSpec {
        &self.weapons[index % self.weapons.len()]
    }

    /// Spell at a cycling index (wraps).
    #[must_use]
    pub fn spell(&self, index: usize) -> &SpellSpec {
        &self.spells[index % self.spells.len()]
    }
}

fn check_unique<'a>(
    catalog: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), DataError> {
    let mut seen = ahash::AHashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DataError::Duplicate {
                catalog,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
