//! Fixed-step headless loop.
//!
//! Each tick reads the clock once, feeds the scripted keys into the input
//! manager, advances the level and drains the event bus into the sinks.

use anyhow::{Context, Result};
use mythica_common::{Clock, ManualClock, MonotonicClock, Timestamp};
use mythica_gameplay::{EventBus, GameCatalog, InputManager, Level};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::time::Duration;
use tracing::{debug, info};

use crate::arena::ArenaLayout;
use crate::config::EngineConfig;
use crate::script::InputScript;
use crate::sink::{JsonLinesWriter, TracingSink};

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulation clock at the last tick
    pub last_tick_ms: u64,
    /// Event totals
    pub totals: TracingSink,
    /// Player health at the end
    pub player_health: f32,
    /// Unspent experience at the end
    pub player_experience: f32,
    /// Enemies still alive
    pub enemies_left: usize,
    /// Events written to the event log
    pub events_logged: usize,
}

/// A level wired to scripted input and event sinks.
pub struct Session {
    level: Level,
    input: InputManager,
    script: InputScript,
    bus: EventBus,
    sink: TracingSink,
    writer: Option<JsonLinesWriter<BufWriter<File>>>,
    ticks: u64,
    last_tick: Timestamp,
}

impl Session {
    /// Load data files and build the level described by `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let catalog = match &config.catalog {
            Some(path) => GameCatalog::load_from(path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?,
            None => GameCatalog::default(),
        };
        let layout = match &config.map {
            Some(dir) => ArenaLayout::load_dir(dir)?,
            None => ArenaLayout::demo(),
        };
        let script = match &config.script {
            Some(path) => InputScript::load_from(path)?,
            None => InputScript::demo(),
        };
        let writer = match &config.event_log {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create event log {}", path.display()))?;
                Some(JsonLinesWriter::new(BufWriter::new(file)))
            },
            None => None,
        };

        let level = layout.build(catalog, config.tuning.clone(), config.seed)?;
        Ok(Self::with_level(level, script, writer))
    }

    /// Wrap an already built level.
    #[must_use]
    pub fn with_level(
        level: Level,
        script: InputScript,
        writer: Option<JsonLinesWriter<BufWriter<File>>>,
    ) -> Self {
        Self {
            level,
            input: InputManager::new(),
            script,
            bus: EventBus::default(),
            sink: TracingSink::new(),
            writer,
            ticks: 0,
            last_tick: Timestamp::ZERO,
        }
    }

    /// The simulated level.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Event totals so far.
    #[must_use]
    pub const fn totals(&self) -> &TracingSink {
        &self.sink
    }

    /// Advance one tick at `now`.
    pub fn step(&mut self, now: Timestamp) -> Result<()> {
        self.script.apply(now.millis(), &mut self.input);
        self.level.tick(now, &self.input, &mut self.bus);
        self.input.end_frame();

        for event in self.bus.drain() {
            event.dispatch(&mut self.sink);
            if let Some(writer) = &mut self.writer {
                writer.write(&event)?;
            }
        }

        self.ticks += 1;
        self.last_tick = now;
        if self.ticks % 60 == 0 {
            let player = self.level.player();
            debug!(
                tick = self.ticks,
                status = %player.status(),
                health = player.health,
                energy = player.energy,
                "Tick"
            );
        }
        Ok(())
    }

    /// Flush outputs and summarize the run.
    pub fn finish(self) -> Result<RunSummary> {
        let events_logged = match self.writer {
            Some(writer) => {
                let written = writer.written();
                writer.finish()?;
                written
            },
            None => 0,
        };
        let player = self.level.player();
        Ok(RunSummary {
            ticks: self.ticks,
            last_tick_ms: self.last_tick.millis(),
            totals: self.sink,
            player_health: player.health,
            player_experience: player.experience,
            enemies_left: self.level.enemies().count(),
            events_logged,
        })
    }
}

/// Run the configured number of ticks.
///
/// Fixed-step runs advance a manual clock by `tick_ms` per tick. Realtime
/// runs read the monotonic clock and sleep between ticks.
pub fn run(config: &EngineConfig) -> Result<RunSummary> {
    let mut session = Session::new(config)?;
    info!(
        ticks = config.ticks,
        tick_ms = config.tick_ms,
        realtime = config.realtime,
        duration_ms = config.duration_ms(),
        enemies = session.level().enemies().count(),
        "Starting run"
    );

    if config.realtime {
        let clock = MonotonicClock::start();
        let pause = Duration::from_millis(config.tick_ms);
        for _ in 0..config.ticks {
            session.step(clock.now())?;
            std::thread::sleep(pause);
        }
    } else {
        let clock = ManualClock::new();
        for _ in 0..config.ticks {
            session.step(clock.now())?;
            clock.advance(config.tick_ms);
        }
    }

    debug!(events = ?session.totals(), "Loop done");
    let summary = session.finish()?;
    info!(
        ticks = summary.ticks,
        kills = summary.totals.kills,
        experience = summary.totals.experience,
        health = summary.player_health,
        "Run finished"
    );
    Ok(summary)
}
