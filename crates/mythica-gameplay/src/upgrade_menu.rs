//! Upgrade menu shown while the level is paused.
//!
//! The selection walks the five stats without wrapping. Any accepted input
//! locks a short repeat guard so a held key does not race across the menu.

use mythica_common::Timestamp;
use tracing::info;

use crate::cooldown::Cooldown;
use crate::input::MenuIntent;
use crate::progression::{StatKind, StatSheet, UpgradeOutcome};
use crate::tuning::SimTuning;

/// Selection state of the upgrade menu.
#[derive(Debug, Clone)]
pub struct UpgradeMenu {
    selection: usize,
    guard: Cooldown,
}

impl UpgradeMenu {
    /// Creates a menu with the first stat selected.
    #[must_use]
    pub fn new(tuning: &SimTuning) -> Self {
        Self {
            selection: 0,
            guard: Cooldown::new(tuning.menu_repeat_guard_ms),
        }
    }

    /// Index of the selected stat.
    #[must_use]
    pub const fn selection(&self) -> usize {
        self.selection
    }

    /// Selected stat.
    #[must_use]
    pub fn selected(&self) -> StatKind {
        StatKind::ALL[self.selection]
    }

    /// True while the repeat guard blocks input.
    #[must_use]
    pub const fn is_guarded(&self) -> bool {
        self.guard.is_locked()
    }

    /// Handles one tick of menu input. Returns the outcome when an upgrade
    /// was attempted.
    pub fn update(
        &mut self,
        intent: &MenuIntent,
        now: Timestamp,
        stats: &mut StatSheet,
        experience: &mut f32,
        tuning: &SimTuning,
    ) -> Option<(StatKind, UpgradeOutcome)> {
        self.guard.poll(now);
        if self.guard.is_locked() {
            return None;
        }

        if intent.right && self.selection + 1 < StatKind::ALL.len() {
            self.selection += 1;
            self.guard.lock(now);
        } else if intent.left && self.selection > 0 {
            self.selection -= 1;
            self.guard.lock(now);
        }

        if intent.confirm {
            self.guard.lock(now);
            let kind = self.selected();
            let outcome = stats.upgrade(kind, experience, tuning);
            info!(stat = kind.name(), ?outcome, experience = *experience, "Upgrade requested");
            return Some((kind, outcome));
        }
        None
    }
}
