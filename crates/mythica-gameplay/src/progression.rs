//! Experience-for-stats upgrade economy.
//!
//! Each of the five player stats carries a current value, a hard maximum and
//! the experience cost of its next upgrade. An upgrade multiplies the value
//! by the growth factor and the cost by the escalation factor, then clamps
//! the value to the maximum.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tuning::SimTuning;

/// Upgradable player stats, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Maximum health
    Health,
    /// Maximum energy
    Energy,
    /// Melee attack power
    Attack,
    /// Spell power and energy regeneration
    Magic,
    /// Movement speed
    Speed,
}

impl StatKind {
    /// All stats in menu order.
    pub const ALL: [Self; 5] = [
        Self::Health,
        Self::Energy,
        Self::Attack,
        Self::Magic,
        Self::Speed,
    ];

    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Energy => "energy",
            Self::Attack => "attack",
            Self::Magic => "magic",
            Self::Speed => "speed",
        }
    }
}

/// Value, maximum and next upgrade cost of one stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    /// Current value
    pub value: f32,
    /// Upper bound for `value`
    pub max: f32,
    /// Experience needed for the next upgrade
    pub cost: f32,
}

impl StatLine {
    /// Creates a stat line.
    #[must_use]
    pub const fn new(value: f32, max: f32, cost: f32) -> Self {
        Self { value, max, cost }
    }

    /// True once the value has reached its maximum.
    #[must_use]
    pub fn is_maxed(&self) -> bool {
        self.value >= self.max
    }
}

/// Result of an upgrade attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// Experience was spent and the stat grew
    Upgraded,
    /// Not enough experience for the current cost
    InsufficientExperience,
    /// The stat is already at its maximum
    AtMaximum,
}

/// The player's five upgradable stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSheet {
    /// Health stat (health ceiling)
    pub health: StatLine,
    /// Energy stat (energy ceiling)
    pub energy: StatLine,
    /// Attack stat
    pub attack: StatLine,
    /// Magic stat
    pub magic: StatLine,
    /// Speed stat
    pub speed: StatLine,
}

impl Default for StatSheet {
    fn default() -> Self {
        Self {
            health: StatLine::new(100.0, 300.0, 100.0),
            energy: StatLine::new(60.0, 140.0, 100.0),
            attack: StatLine::new(10.0, 20.0, 100.0),
            magic: StatLine::new(4.0, 10.0, 100.0),
            speed: StatLine::new(6.0, 10.0, 100.0),
        }
    }
}

impl StatSheet {
    /// Returns one stat line.
    #[must_use]
    pub fn line(&self, kind: StatKind) -> &StatLine {
        match kind {
            StatKind::Health => &self.health,
            StatKind::Energy => &self.energy,
            StatKind::Attack => &self.attack,
            StatKind::Magic => &self.magic,
            StatKind::Speed => &self.speed,
        }
    }

    /// Returns one stat line mutably.
    pub fn line_mut(&mut self, kind: StatKind) -> &mut StatLine {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::Energy => &mut self.energy,
            StatKind::Attack => &mut self.attack,
            StatKind::Magic => &mut self.magic,
            StatKind::Speed => &mut self.speed,
        }
    }

    /// Current value of a stat.
    #[must_use]
    pub fn value(&self, kind: StatKind) -> f32 {
        self.line(kind).value
    }

    /// Spends experience to grow a stat.
    ///
    /// Does nothing unless `experience >= cost` and the stat is below its
    /// maximum. The value is clamped to the maximum after every attempt.
    pub fn upgrade(
        &mut self,
        kind: StatKind,
        experience: &mut f32,
        tuning: &SimTuning,
    ) -> UpgradeOutcome {
        let line = self.line_mut(kind);
        let outcome = if line.is_maxed() {
            UpgradeOutcome::AtMaximum
        } else if *experience < line.cost {
            UpgradeOutcome::InsufficientExperience
        } else {
            *experience -= line.cost;
            line.value *= tuning.stat_growth;
            line.cost *= tuning.cost_escalation;
            UpgradeOutcome::Upgraded
        };
        line.value = line.value.min(line.max);

        if outcome == UpgradeOutcome::Upgraded {
            debug!(
                stat = kind.name(),
                value = line.value,
                next_cost = line.cost,
                "Stat upgraded"
            );
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_single_upgrade() {
        let mut stats = StatSheet::default();
        let mut experience = 100.0;
        let outcome = stats.upgrade(StatKind::Health, &mut experience, &SimTuning::default());
        assert_eq!(outcome, UpgradeOutcome::Upgraded);
        assert!(approx(experience, 0.0));
        assert!(approx(stats.health.value, 120.0));
        assert!(approx(stats.health.cost, 140.0));
    }

    #[test]
    fn test_insufficient_experience() {
        let mut stats = StatSheet::default();
        let mut experience = 99.0;
        let outcome = stats.upgrade(StatKind::Attack, &mut experience, &SimTuning::default());
        assert_eq!(outcome, UpgradeOutcome::InsufficientExperience);
        assert_eq!(experience, 99.0);
        assert_eq!(stats.attack, StatLine::new(10.0, 20.0, 100.0));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let mut stats = StatSheet::default();
        stats.speed.value = 9.5;
        let mut experience = 1_000.0;
        stats.upgrade(StatKind::Speed, &mut experience, &SimTuning::default());
        assert_eq!(stats.speed.value, 10.0);
        assert!(stats.speed.is_maxed());
    }

    #[test]
    fn test_upgrade_cap_is_stable() {
        let tuning = SimTuning::default();
        let mut stats = StatSheet::default();
        let mut experience = 1_000_000.0;
        while stats.upgrade(StatKind::Magic, &mut experience, &tuning) == UpgradeOutcome::Upgraded {}

        let frozen = stats.magic;
        let frozen_experience = experience;
        for _ in 0..20 {
            assert_eq!(
                stats.upgrade(StatKind::Magic, &mut experience, &tuning),
                UpgradeOutcome::AtMaximum
            );
        }
        assert_eq!(stats.magic, frozen);
        assert_eq!(experience, frozen_experience);
    }

    #[test]
    fn test_stat_order() {
        let names: Vec<_> = StatKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["health", "energy", "attack", "magic", "speed"]);
    }
}
