use std::collections::HashSet;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys currently held down.
pub struct InputState {
    pressed_keys: HashSet<PhysicalKey>,
    movement_step: i32,
}

impl InputState {
    #[must_use]
    pub fn new(movement_step: i32) -> Self {
        Self {
            pressed_keys: HashSet::new(),
            movement_step,
        }
    }

    pub fn key_pressed(&mut self, key: PhysicalKey) {
        self.pressed_keys.insert(key);
    }

    pub fn key_released(&mut self, key: PhysicalKey) {
        self.pressed_keys.remove(&key);
    }

    /// Forgets every held key, for when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    #[must_use]
    pub fn is_key_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    fn is_code_pressed(&self, code: KeyCode) -> bool {
        self.is_key_pressed(PhysicalKey::Code(code))
    }

    /// Offset for the held WASD keys. Each axis is summed on its own, so
    /// opposite keys cancel and diagonals combine.
    #[must_use]
    pub fn movement(&self) -> (i32, i32) {
        let step = self.movement_step;
        let mut dx = 0;
        let mut dy = 0;

        if self.is_code_pressed(KeyCode::KeyA) {
            dx -= step;
        }
        if self.is_code_pressed(KeyCode::KeyD) {
            dx += step;
        }
        if self.is_code_pressed(KeyCode::KeyW) {
            dy -= step;
        }
        if self.is_code_pressed(KeyCode::KeyS) {
            dy += step;
        }

        (dx, dy)
    }

    /// Escape and the platform back key end the game.
    #[must_use]
    pub fn is_quit_key(key: PhysicalKey) -> bool {
        matches!(
            key,
            PhysicalKey::Code(KeyCode::Escape | KeyCode::BrowserBack)
        )
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_no_keys_no_movement() {
        assert_eq!(InputState::default().movement(), (0, 0));
    }

    #[test]
    fn test_clear_releases_held_keys() {
        let mut input = InputState::default();
        input.key_pressed(key(KeyCode::KeyA));
        input.key_pressed(key(KeyCode::KeyS));
        assert_eq!(input.movement(), (-2, 2));

        input.clear();
        assert!(!input.is_key_pressed(key(KeyCode::KeyA)));
        assert_eq!(input.movement(), (0, 0));
    }

    #[test]
    fn test_single_axis() {
        let mut input = InputState::default();
        input.key_pressed(key(KeyCode::KeyD));
        assert_eq!(input.movement(), (2, 0));

        input.key_released(key(KeyCode::KeyD));
        input.key_pressed(key(KeyCode::KeyW));
        assert_eq!(input.movement(), (0, -2));
    }

    #[test]
    fn test_diagonal_is_sum_of_axes() {
        let mut input = InputState::default();
        input.key_pressed(key(KeyCode::KeyA));
        input.key_pressed(key(KeyCode::KeyS));
        assert_eq!(input.movement(), (-2, 2));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::default();
        input.key_pressed(key(KeyCode::KeyA));
        input.key_pressed(key(KeyCode::KeyD));
        assert_eq!(input.movement(), (0, 0));
    }

    #[test]
    fn test_quit_keys() {
        assert!(InputState::is_quit_key(key(KeyCode::Escape)));
        assert!(InputState::is_quit_key(key(KeyCode::BrowserBack)));
        assert!(!InputState::is_quit_key(key(KeyCode::KeyQ)));
    }
}
