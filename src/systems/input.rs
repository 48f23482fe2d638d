use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Keyboard snapshot handed to gameplay code for one tick
#[derive(Clone, Debug, Default)]
pub struct Input {
    held: HashSet<KeyCode>,
    pressed: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key is currently down
    pub fn held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Key went down since the last `end_frame`
    pub fn pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    pub fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.held(*key))
    }

    pub fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.pressed(*key))
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Forget edge-triggered presses once a tick has consumed them
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }
}

/// InputSystem translates raw winit events into the gameplay snapshot and
/// application commands
pub struct InputSystem {
    pub modifiers: ModifiersState,
    pub state: Input,
}

impl InputSystem {
    pub fn new() -> Self {
        Self {
            modifiers: ModifiersState::empty(),
            state: Input::new(),
        }
    }

    pub fn update_modifiers(&mut self, modifiers: ModifiersState) {
        self.modifiers = modifiers;
    }

    /// Records the key and returns an application command if it maps to one
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<InputCommand> {
        let PhysicalKey::Code(keycode) = event.physical_key else {
            return None;
        };

        match event.state {
            ElementState::Pressed => {
                if event.repeat {
                    return None;
                }
                self.state.press(keycode);
                self.handle_key(keycode)
            }
            ElementState::Released => {
                self.state.release(keycode);
                None
            }
        }
    }

    pub fn handle_key(&self, keycode: KeyCode) -> Option<InputCommand> {
        match keycode {
            KeyCode::KeyP => Some(InputCommand::TogglePause),
            KeyCode::F3 => Some(InputCommand::ToggleStats),
            KeyCode::KeyQ if self.modifiers.control_key() => Some(InputCommand::Exit),
            _ => None,
        }
    }

    /// Window lost focus: release everything so no key stays stuck down
    pub fn focus_lost(&mut self) {
        self.state.clear();
    }

    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }
}

/// Commands that the input system can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Exit,
    TogglePause,
    ToggleStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_edge_triggered() {
        let mut input = Input::new();

        input.press(KeyCode::KeyW);
        assert!(input.held(KeyCode::KeyW));
        assert!(input.pressed(KeyCode::KeyW));

        input.end_frame();
        assert!(input.held(KeyCode::KeyW));
        assert!(!input.pressed(KeyCode::KeyW));

        // still held, no new edge
        input.press(KeyCode::KeyW);
        assert!(!input.pressed(KeyCode::KeyW));

        input.release(KeyCode::KeyW);
        assert!(!input.held(KeyCode::KeyW));
    }

    #[test]
    fn any_helpers() {
        let mut input = Input::new();
        input.press(KeyCode::ArrowUp);

        assert!(input.any_held(&[KeyCode::KeyW, KeyCode::ArrowUp]));
        assert!(input.any_pressed(&[KeyCode::ArrowUp]));
        assert!(!input.any_held(&[KeyCode::KeyS]));
    }

    #[test]
    fn commands() {
        let mut system = InputSystem::new();
        assert_eq!(system.handle_key(KeyCode::KeyP), Some(InputCommand::TogglePause));
        assert_eq!(system.handle_key(KeyCode::F3), Some(InputCommand::ToggleStats));
        assert_eq!(system.handle_key(KeyCode::KeyQ), None);

        system.update_modifiers(ModifiersState::CONTROL);
        assert_eq!(system.handle_key(KeyCode::KeyQ), Some(InputCommand::Exit));
    }
}
