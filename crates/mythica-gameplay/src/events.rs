//! Outbound notifications from the simulation.
//!
//! The simulation never renders, plays sounds or spawns particles itself.
//! It calls into an [`EventSink`] and collaborators decide what to do. A
//! sink can be anything: [`EventBus`] forwards into a bounded channel,
//! [`EventLog`] keeps everything in memory.

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Particle effects requested by spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagicParticle {
    /// Healing sparkle above the player
    Heal,
    /// Aura around the player
    Aura,
    /// One flame burst
    Flame,
}

impl MagicParticle {
    /// Particle asset name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Heal => "heal",
            Self::Aura => "aura",
            Self::Flame => "flame",
        }
    }
}

/// Receiver of simulation side effects. Every method defaults to a no-op.
pub trait EventSink {
    /// An enemy died at `position`.
    fn on_death_particles(&mut self, _position: Vec2, _monster: &str) {}

    /// The player earned experience.
    fn on_experience_granted(&mut self, _amount: f32) {}

    /// An enemy attack landed on the player.
    fn on_player_damaged(&mut self, _amount: f32, _attack_type: &str) {}

    /// A spell produced a visual effect.
    fn on_magic_particles(&mut self, _kind: MagicParticle, _position: Vec2) {}

    /// An attack cut a grass tile.
    fn on_grass_cut(&mut self, _position: Vec2) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Simulation events as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Enemy died
    DeathParticles {
        /// Enemy center
        position: Vec2,
        /// Monster type
        monster: String,
    },
    /// Experience credited to the player
    ExperienceGranted {
        /// Amount
        amount: f32,
    },
    /// Player took damage
    PlayerDamaged {
        /// Damage dealt
        amount: f32,
        /// Attack kind of the enemy
        attack_type: String,
    },
    /// Spell visual effect
    MagicParticles {
        /// Effect kind
        kind: MagicParticle,
        /// Effect position
        position: Vec2,
    },
    /// Grass tile destroyed
    GrassCut {
        /// Tile center
        position: Vec2,
    },
}

impl GameEvent {
    /// Dispatches this event to a sink.
    pub fn dispatch(&self, sink: &mut dyn EventSink) {
        match self {
            Self::DeathParticles { position, monster } => {
                sink.on_death_particles(*position, monster);
            },
            Self::ExperienceGranted { amount } => sink.on_experience_granted(*amount),
            Self::PlayerDamaged {
                amount,
                attack_type,
            } => sink.on_player_damaged(*amount, attack_type),
            Self::MagicParticles { kind, position } => sink.on_magic_particles(*kind, *position),
            Self::GrassCut { position } => sink.on_grass_cut(*position),
        }
    }
}

/// Event bus for handing simulation events to other threads or systems.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus. Never blocks; returns false when the
    /// channel is full and the event was dropped.
    pub fn publish(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    capacity = self.capacity,
                    event = ?e.into_inner(),
                    "Event bus full, dropping event"
                );
                false
            },
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl EventSink for EventBus {
    fn on_death_particles(&mut self, position: Vec2, monster: &str) {
        self.publish(GameEvent::DeathParticles {
            position,
            monster: monster.to_string(),
        });
    }

    fn on_experience_granted(&mut self, amount: f32) {
        self.publish(GameEvent::ExperienceGranted { amount });
    }

    fn on_player_damaged(&mut self, amount: f32, attack_type: &str) {
        self.publish(GameEvent::PlayerDamaged {
            amount,
            attack_type: attack_type.to_string(),
        });
    }

    fn on_magic_particles(&mut self, kind: MagicParticle, position: Vec2) {
        self.publish(GameEvent::MagicParticles { kind, position });
    }

    fn on_grass_cut(&mut self, position: Vec2) {
        self.publish(GameEvent::GrassCut { position });
    }
}

/// In-memory event recorder.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Recorded events in emission order
    pub events: Vec<GameEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of death events recorded.
    #[must_use]
    pub fn deaths(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::DeathParticles { .. }))
            .count()
    }

    /// Total experience granted.
    #[must_use]
    pub fn experience(&self) -> f32 {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ExperienceGranted { amount } => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Damage amounts the player received, in order.
    #[must_use]
    pub fn player_hits(&self) -> Vec<f32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PlayerDamaged { amount, .. } => Some(*amount),
                _ => None,
            })
            .collect()
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for EventLog {
    fn on_death_particles(&mut self, position: Vec2, monster: &str) {
        self.events.push(GameEvent::DeathParticles {
            position,
            monster: monster.to_string(),
        });
    }

    fn on_experience_granted(&mut self, amount: f32) {
        self.events.push(GameEvent::ExperienceGranted { amount });
    }

    fn on_player_damaged(&mut self, amount: f32, attack_type: &str) {
        self.events.push(GameEvent::PlayerDamaged {
            amount,
            attack_type: attack_type.to_string(),
        });
    }

    fn on_magic_particles(&mut self, kind: MagicParticle, position: Vec2) {
        self.events.push(GameEvent::MagicParticles { kind, position });
    }

    fn on_grass_cut(&mut self, position: Vec2) {
        self.events.push(GameEvent::GrassCut { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_publish_and_drain() {
        let mut bus = EventBus::new(8);
        bus.on_experience_granted(100.0);
        bus.on_grass_cut(Vec2::new(1.0, 2.0));
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], GameEvent::ExperienceGranted { amount: 100.0 });
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_bus_drops_when_full() {
        let bus = EventBus::new(1);
        assert!(bus.publish(GameEvent::ExperienceGranted { amount: 1.0 }));
        assert!(!bus.publish(GameEvent::ExperienceGranted { amount: 2.0 }));
        assert_eq!(
            bus.drain(),
            vec![GameEvent::ExperienceGranted { amount: 1.0 }]
        );
        assert!(bus.publish(GameEvent::ExperienceGranted { amount: 3.0 }));
        assert_eq!(bus.capacity(), 1);
    }

    #[test]
    fn test_dispatch_replays_into_log() {
        let event = GameEvent::PlayerDamaged {
            amount: 8.0,
            attack_type: "thunder".to_string(),
        };
        let mut log = EventLog::new();
        event.dispatch(&mut log);
        assert_eq!(log.events, vec![event]);
        assert_eq!(log.player_hits(), vec![8.0]);
    }

    #[test]
    fn test_log_summaries() {
        let mut log = EventLog::new();
        log.on_death_particles(Vec2::ZERO, "squid");
        log.on_experience_granted(100.0);
        log.on_experience_granted(20.0);
        assert_eq!(log.deaths(), 1);
        assert_eq!(log.experience(), 120.0);
        log.clear();
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.on_magic_particles(MagicParticle::Flame, Vec2::ONE);
        sink.on_player_damaged(1.0, "claw");
    }
}
