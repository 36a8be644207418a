//! Keyboard state: held keys and fresh presses

use std::collections::HashSet;

use glam::Vec2;

/// Keys the game listens to, named after DOM `KeyboardEvent.code` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Tag
    Space,
    /// Boost
    ShiftLeft,
    ShiftRight,
    /// Teleport
    KeyZ,
    /// Back to menu
    KeyA,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "Space" => Some(Key::Space),
            "ShiftLeft" => Some(Key::ShiftLeft),
            "ShiftRight" => Some(Key::ShiftRight),
            "KeyZ" => Some(Key::KeyZ),
            "KeyA" => Some(Key::KeyA),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl KeyboardState {
    /// A fresh press is an up-to-down transition. Auto-repeat and duplicate
    /// keydowns for a held key only keep it held.
    pub fn key_down(&mut self, key: Key, repeat: bool) {
        if self.pressed.insert(key) && !repeat {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn was_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Forget fresh presses once a frame has consumed them
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }

    /// Arrow keys as a direction; diagonals are normalized to unit length
    pub fn arrow_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.is_down(Key::ArrowLeft) {
            axis.x -= 1.0;
        }
        if self.is_down(Key::ArrowRight) {
            axis.x += 1.0;
        }
        if self.is_down(Key::ArrowUp) {
            axis.y -= 1.0;
        }
        if self.is_down(Key::ArrowDown) {
            axis.y += 1.0;
        }
        axis.normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Key::from_code("Space"), Some(Key::Space));
        assert_eq!(Key::from_code("ShiftRight"), Some(Key::ShiftRight));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_repeat_is_not_a_fresh_press() {
        let mut kb = KeyboardState::default();
        kb.key_down(Key::Space, false);
        assert!(kb.was_just_pressed(Key::Space));
        kb.end_frame();

        kb.key_down(Key::Space, true);
        assert!(kb.is_down(Key::Space));
        assert!(!kb.was_just_pressed(Key::Space));

        kb.key_up(Key::Space);
        assert!(!kb.is_down(Key::Space));
    }

    #[test]
    fn test_duplicate_keydown_while_held() {
        let mut kb = KeyboardState::default();
        kb.key_down(Key::Space, false);
        kb.end_frame();

        // Host sends a second non-repeat keydown without a keyup
        kb.key_down(Key::Space, false);
        assert!(kb.is_down(Key::Space));
        assert!(!kb.was_just_pressed(Key::Space));

        kb.key_up(Key::Space);
        kb.key_down(Key::Space, false);
        assert!(kb.was_just_pressed(Key::Space));
    }

    #[test]
    fn test_arrow_axis_diagonal_is_unit() {
        let mut kb = KeyboardState::default();
        kb.key_down(Key::ArrowRight, false);
        kb.key_down(Key::ArrowUp, false);
        let axis = kb.arrow_axis();
        assert!((axis.length() - 1.0).abs() < 1e-6);
        assert!(axis.x > 0.0 && axis.y < 0.0);

        // Opposing keys cancel
        kb.key_down(Key::ArrowLeft, false);
        assert_eq!(kb.arrow_axis(), Vec2::new(0.0, -1.0));
    }
}
