//! Input handling for player controls.
//!
//! Raw key states are tracked per key, mapped to rebindable actions, and
//! condensed into a per-tick [`PlayerIntent`] (or [`MenuIntent`] while the
//! upgrade menu is open).

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Key codes the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space bar
    Space,
    /// Left Control
    LCtrl,
    /// Q key
    Q,
    /// E key
    E,
    /// M key
    M,
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Escape
    Escape,
}

/// State of a button (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just pressed this frame
    pub just_pressed: bool,
    /// Whether the button was just released this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: false,
            just_pressed: false,
            just_released: false,
        }
    }

    /// Update the button state based on whether it's currently pressed.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Clear the frame-specific state (just_pressed, just_released).
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Game actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move up
    MoveUp,
    /// Move down
    MoveDown,
    /// Move left
    MoveLeft,
    /// Move right
    MoveRight,
    /// Swing the equipped weapon
    Attack,
    /// Cast the equipped spell
    Magic,
    /// Cycle to the next weapon
    SwitchWeapon,
    /// Cycle to the next spell
    SwitchMagic,
    /// Open or close the upgrade menu
    ToggleMenu,
    /// Move the menu selection left
    MenuLeft,
    /// Move the menu selection right
    MenuRight,
    /// Buy the selected upgrade
    MenuConfirm,
}

/// Key binding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Primary key for this action
    pub primary: KeyCode,
    /// Optional secondary key
    pub secondary: Option<KeyCode>,
}

impl KeyBinding {
    /// Create a new key binding with only a primary key.
    #[must_use]
    pub const fn new(primary: KeyCode) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Create a new key binding with primary and secondary keys.
    #[must_use]
    pub const fn with_secondary(primary: KeyCode, secondary: KeyCode) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Check if a key matches this binding.
    #[must_use]
    pub fn matches(&self, key: KeyCode) -> bool {
        self.primary == key || self.secondary == Some(key)
    }
}

/// Held-key snapshot relevant to the player controller.
///
/// Opposite directions are both reported; the controller decides which wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerIntent {
    /// Up held
    pub up: bool,
    /// Down held
    pub down: bool,
    /// Left held
    pub left: bool,
    /// Right held
    pub right: bool,
    /// Attack held
    pub attack: bool,
    /// Magic held
    pub magic: bool,
    /// Switch weapon held
    pub switch_weapon: bool,
    /// Switch magic held
    pub switch_magic: bool,
}

/// Held-key snapshot relevant to the upgrade menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuIntent {
    /// Move selection left
    pub left: bool,
    /// Move selection right
    pub right: bool,
    /// Buy the selected upgrade
    pub confirm: bool,
}

/// Input manager that handles raw input and converts to game actions.
#[derive(Debug)]
pub struct InputManager {
    /// Current key states
    key_states: AHashMap<KeyCode, ButtonState>,
    /// Action to key bindings
    bindings: AHashMap<Action, KeyBinding>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Create a new input manager with default bindings.
    #[must_use]
    pub fn new() -> Self {
        let mut manager = Self {
            key_states: AHashMap::new(),
            bindings: AHashMap::new(),
        };
        manager.set_default_bindings();
        manager
    }

    /// Set default key bindings.
    pub fn set_default_bindings(&mut self) {
        self.bindings.clear();
        self.bindings.insert(Action::MoveUp, KeyBinding::new(KeyCode::Up));
        self.bindings
            .insert(Action::MoveDown, KeyBinding::new(KeyCode::Down));
        self.bindings
            .insert(Action::MoveLeft, KeyBinding::new(KeyCode::Left));
        self.bindings
            .insert(Action::MoveRight, KeyBinding::new(KeyCode::Right));
        self.bindings
            .insert(Action::Attack, KeyBinding::new(KeyCode::Space));
        self.bindings
            .insert(Action::Magic, KeyBinding::new(KeyCode::LCtrl));
        self.bindings
            .insert(Action::SwitchWeapon, KeyBinding::new(KeyCode::Q));
        self.bindings
            .insert(Action::SwitchMagic, KeyBinding::new(KeyCode::E));
        self.bindings
            .insert(Action::ToggleMenu, KeyBinding::new(KeyCode::M));
        self.bindings
            .insert(Action::MenuLeft, KeyBinding::new(KeyCode::Left));
        self.bindings
            .insert(Action::MenuRight, KeyBinding::new(KeyCode::Right));
        self.bindings
            .insert(Action::MenuConfirm, KeyBinding::new(KeyCode::Space));
    }

    /// Rebind an action to a new key.
    pub fn rebind(&mut self, action: Action, binding: KeyBinding) {
        self.bindings.insert(action, binding);
    }

    /// Get the current binding for an action.
    #[must_use]
    pub fn get_binding(&self, action: Action) -> Option<&KeyBinding> {
        self.bindings.get(&action)
    }

    /// Update a key state.
    pub fn update_key(&mut self, key: KeyCode, is_pressed: bool) {
        self.key_states.entry(key).or_default().update(is_pressed);
    }

    /// Releases every held key.
    pub fn release_all(&mut self) {
        for state in self.key_states.values_mut() {
            state.update(false);
        }
    }

    /// Clear frame-specific state. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        for state in self.key_states.values_mut() {
            state.clear_frame();
        }
    }

    /// Check if a key is currently pressed.
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.key_states.get(&key).is_some_and(|state| state.pressed)
    }

    /// Check if a key was just pressed this frame.
    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.just_pressed)
    }

    /// Check if an action is currently active.
    #[must_use]
    pub fn is_action_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_pressed(key))
        })
    }

    /// Check if an action was just pressed this frame.
    #[must_use]
    pub fn is_action_just_pressed(&self, action: Action) -> bool {
        self.bindings.get(&action).is_some_and(|binding| {
            self.is_key_just_pressed(binding.primary)
                || binding
                    .secondary
                    .is_some_and(|key| self.is_key_just_pressed(key))
        })
    }

    /// Snapshot of the player controls.
    #[must_use]
    pub fn player_intent(&self) -> PlayerIntent {
        PlayerIntent {
            up: self.is_action_pressed(Action::MoveUp),
            down: self.is_action_pressed(Action::MoveDown),
            left: self.is_action_pressed(Action::MoveLeft),
            right: self.is_action_pressed(Action::MoveRight),
            attack: self.is_action_pressed(Action::Attack),
            magic: self.is_action_pressed(Action::Magic),
            switch_weapon: self.is_action_pressed(Action::SwitchWeapon),
            switch_magic: self.is_action_pressed(Action::SwitchMagic),
        }
    }

    /// Snapshot of the upgrade menu controls.
    #[must_use]
    pub fn menu_intent(&self) -> MenuIntent {
        MenuIntent {
            left: self.is_action_pressed(Action::MenuLeft),
            right: self.is_action_pressed(Action::MenuRight),
            confirm: self.is_action_pressed(Action::MenuConfirm),
        }
    }

    /// True on the frame the menu toggle key goes down.
    #[must_use]
    pub fn menu_toggled(&self) -> bool {
        self.is_action_just_pressed(Action::ToggleMenu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state() {
        let mut state = ButtonState::new();
        assert!(!state.pressed);
        assert!(!state.just_pressed);

        // Press the button
        state.update(true);
        assert!(state.pressed);
        assert!(state.just_pressed);
        assert!(!state.just_released);

        // Hold the button
        state.clear_frame();
        state.update(true);
        assert!(state.pressed);
        assert!(!state.just_pressed);

        // Release the button
        state.clear_frame();
        state.update(false);
        assert!(!state.pressed);
        assert!(state.just_released);
    }

    #[test]
    fn test_default_bindings() {
        let manager = InputManager::new();
        assert_eq!(
            manager.get_binding(Action::Magic).map(|b| b.primary),
            Some(KeyCode::LCtrl)
        );
        assert!(manager
            .get_binding(Action::ToggleMenu)
            .is_some_and(|b| b.matches(KeyCode::M)));
    }

    #[test]
    fn test_player_intent() {
        let mut manager = InputManager::new();
        manager.update_key(KeyCode::Up, true);
        manager.update_key(KeyCode::Down, true);
        manager.update_key(KeyCode::Space, true);

        let intent = manager.player_intent();
        assert!(intent.up && intent.down);
        assert!(intent.attack);
        assert!(!intent.magic);
    }

    #[test]
    fn test_rebind_with_secondary() {
        let mut manager = InputManager::new();
        manager.rebind(
            Action::MoveUp,
            KeyBinding::with_secondary(KeyCode::Up, KeyCode::W),
        );
        manager.update_key(KeyCode::W, true);
        assert!(manager.player_intent().up);
    }

    #[test]
    fn test_menu_toggle_is_edge_triggered() {
        let mut manager = InputManager::new();
        manager.update_key(KeyCode::M, true);
        assert!(manager.menu_toggled());

        manager.end_frame();
        manager.update_key(KeyCode::M, true);
        assert!(!manager.menu_toggled());
    }

    #[test]
    fn test_menu_intent_shares_keys() {
        let mut manager = InputManager::new();
        manager.update_key(KeyCode::Right, true);
        manager.update_key(KeyCode::Space, true);
        let intent = manager.menu_intent();
        assert!(intent.right && intent.confirm && !intent.left);
    }

    #[test]
    fn test_release_all() {
        let mut manager = InputManager::new();
        manager.update_key(KeyCode::Left, true);
        manager.release_all();
        assert!(!manager.is_key_pressed(KeyCode::Left));
    }
}
