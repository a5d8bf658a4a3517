//! Event consumers for headless runs.

use anyhow::Result;
use glam::Vec2;
use mythica_gameplay::{EventSink, GameEvent, MagicParticle};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

/// Logs every game event and keeps running totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TracingSink {
    /// Enemies killed
    pub kills: u32,
    /// Experience granted
    pub experience: f32,
    /// Damage the player received
    pub damage_taken: f32,
    /// Grass tiles cut
    pub grass_cut: u32,
    /// Spell particles spawned
    pub particles: u32,
}

impl TracingSink {
    /// Creates a sink with zeroed totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for TracingSink {
    fn on_death_particles(&mut self, position: Vec2, monster: &str) {
        self.kills += 1;
        info!(monster, x = position.x, y = position.y, "Enemy died");
    }

    fn on_experience_granted(&mut self, amount: f32) {
        self.experience += amount;
        info!(amount, total = self.experience, "Experience granted");
    }

    fn on_player_damaged(&mut self, amount: f32, attack_type: &str) {
        self.damage_taken += amount;
        info!(amount, attack_type, "Player damaged");
    }

    fn on_magic_particles(&mut self, kind: MagicParticle, position: Vec2) {
        self.particles += 1;
        debug!(kind = kind.name(), x = position.x, y = position.y, "Magic particles");
    }

    fn on_grass_cut(&mut self, position: Vec2) {
        self.grass_cut += 1;
        debug!(x = position.x, y = position.y, "Grass cut");
    }
}

/// Writes events as JSON lines.
#[derive(Debug)]
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesWriter<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Appends one event.
    pub fn write(&mut self, event: &GameEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Number of events written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_totals() {
        let mut sink = TracingSink::new();
        let events = [
            GameEvent::PlayerDamaged {
                amount: 10.0,
                attack_type: "bite".into(),
            },
            GameEvent::DeathParticles {
                position: Vec2::new(1.0, 2.0),
                monster: "squid".into(),
            },
            GameEvent::ExperienceGranted { amount: 100.0 },
            GameEvent::GrassCut {
                position: Vec2::ZERO,
            },
        ];
        for event in &events {
            event.dispatch(&mut sink);
        }
        assert_eq!(sink.kills, 1);
        assert_eq!(sink.experience, 100.0);
        assert_eq!(sink.damage_taken, 10.0);
        assert_eq!(sink.grass_cut, 1);
        assert_eq!(sink.particles, 0);
    }

    #[test]
    fn test_json_lines_round_trip() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer
            .write(&GameEvent::ExperienceGranted { amount: 120.0 })
            .unwrap();
        writer
            .write(&GameEvent::MagicParticles {
                kind: MagicParticle::Flame,
                position: Vec2::new(96.0, 32.0),
            })
            .unwrap();
        assert_eq!(writer.written(), 2);

        let bytes = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"event\":\"experience_granted\""));

        let parsed: GameEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(
            parsed,
            GameEvent::MagicParticles {
                kind: MagicParticle::Flame,
                position: Vec2::new(96.0, 32.0),
            }
        );
    }
}
