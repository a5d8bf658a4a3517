//! Scripted input for headless runs.
//!
//! A script is a list of steps played back on the simulation clock. Each
//! step holds a set of keys for a duration; keys not held by the current
//! step are released. Scripts can be loaded from JSON files or built in
//! code.

use anyhow::{Context, Result};
use mythica_gameplay::{InputManager, KeyCode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Every key a script may drive.
const SCRIPTABLE_KEYS: [KeyCode; 14] = [
    KeyCode::Up,
    KeyCode::Down,
    KeyCode::Left,
    KeyCode::Right,
    KeyCode::Space,
    KeyCode::LCtrl,
    KeyCode::Q,
    KeyCode::E,
    KeyCode::M,
    KeyCode::W,
    KeyCode::A,
    KeyCode::S,
    KeyCode::D,
    KeyCode::Escape,
];

/// A single scripted input step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Release everything for a while
    Wait {
        /// Duration in milliseconds
        duration_ms: u64,
    },
    /// Hold a set of keys
    Hold {
        /// Keys held down for the whole step
        keys: Vec<KeyCode>,
        /// Duration in milliseconds
        duration_ms: u64,
    },
}

impl ScriptStep {
    /// Length of the step.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        match self {
            Self::Wait { duration_ms } | Self::Hold { duration_ms, .. } => *duration_ms,
        }
    }

    fn keys(&self) -> &[KeyCode] {
        match self {
            Self::Wait { .. } => &[],
            Self::Hold { keys, .. } => keys,
        }
    }
}

/// Input track replayed against the simulation clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    /// Steps in playback order
    pub steps: Vec<ScriptStep>,
}

impl InputScript {
    /// Parse a script from JSON.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("invalid input script")
    }

    /// Load a script from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let script = Self::from_json(&source)?;
        info!(steps = script.steps.len(), "Loaded input script from {}", path.display());
        Ok(script)
    }

    /// The demo walk through the arena: fight, cast, switch, then spend
    /// the experience in the upgrade menu.
    #[must_use]
    pub fn demo() -> Self {
        use KeyCode::{Down, Left, Right, Space, Up, E, LCtrl, M, Q};

        let hold = |keys: &[KeyCode], duration_ms| ScriptStep::Hold {
            keys: keys.to_vec(),
            duration_ms,
        };
        Self {
            steps: vec![
                ScriptStep::Wait { duration_ms: 200 },
                hold(&[Right], 1_200),
                hold(&[Space], 2_000),
                hold(&[Right, Space], 1_500),
                hold(&[Q], 100),
                ScriptStep::Wait { duration_ms: 300 },
                hold(&[Down], 900),
                hold(&[LCtrl], 200),
                ScriptStep::Wait { duration_ms: 500 },
                hold(&[E], 100),
                ScriptStep::Wait { duration_ms: 300 },
                hold(&[Up, Space], 1_500),
                hold(&[Left], 800),
                hold(&[Space], 1_500),
                hold(&[M], 50),
                ScriptStep::Wait { duration_ms: 300 },
                hold(&[Right], 50),
                ScriptStep::Wait { duration_ms: 300 },
                hold(&[Space], 50),
                ScriptStep::Wait { duration_ms: 300 },
                hold(&[M], 50),
                ScriptStep::Wait { duration_ms: 500 },
            ],
        }
    }

    /// Total length of the script.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.steps.iter().map(ScriptStep::duration_ms).sum()
    }

    /// Keys held `elapsed_ms` into the script. Past the end nothing is held.
    #[must_use]
    pub fn keys_at(&self, elapsed_ms: u64) -> &[KeyCode] {
        let mut start = 0;
        for step in &self.steps {
            let end = start + step.duration_ms();
            if elapsed_ms < end {
                return step.keys();
            }
            start = end;
        }
        &[]
    }

    /// Feed the keys held at `elapsed_ms` into the input manager.
    pub fn apply(&self, elapsed_ms: u64, input: &mut InputManager) {
        let held = self.keys_at(elapsed_ms);
        for key in SCRIPTABLE_KEYS {
            input.update_key(key, held.contains(&key));
        }
    }
}
