//! Keyboard throttle and pointer steering state

use glam::Vec3;

use crate::{ndc_to_direction, screen_to_ndc};

/// Throttle keys the car listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Backward,
}

impl Key {
    /// Map a printable key name (as delivered by the browser) to a throttle key
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" => Some(Key::Forward),
            "s" | "S" => Some(Key::Backward),
            _ => None,
        }
    }
}

/// Current input snapshot, mutated by raw event callbacks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    /// Unit length or zero, always in the z = 0 plane
    pointer_direction: Vec3,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.forward = pressed,
            Key::Backward => self.backward = pressed,
        }
    }

    /// Returns false for keys the car doesn't care about
    pub fn set_key_name(&mut self, name: &str, pressed: bool) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.set_key(key, pressed);
                true
            }
            None => false,
        }
    }

    /// Steer toward a screen position
    pub fn set_pointer(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        match screen_to_ndc(x, y, viewport_width, viewport_height) {
            Some(ndc) => self.pointer_direction = ndc_to_direction(ndc),
            None => log::debug!(
                "Ignoring pointer move on {}x{} viewport",
                viewport_width,
                viewport_height
            ),
        }
    }

    pub fn pointer_direction(&self) -> Vec3 {
        self.pointer_direction
    }

    /// Release every key and recenter steering (focus loss, restart)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_key_touches_one_field() {
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        assert!(input.forward);
        assert!(!input.backward);

        input.set_key(Key::Backward, true);
        input.set_key(Key::Forward, false);
        assert!(!input.forward);
        assert!(input.backward);
        assert_eq!(input.pointer_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_key_names() {
        let mut input = InputState::new();
        assert!(input.set_key_name("w", true));
        assert!(input.set_key_name("S", true));
        assert!(!input.set_key_name("a", true));
        assert!(!input.set_key_name("Escape", true));
        assert!(input.forward && input.backward);
    }

    #[test]
    fn test_pointer_at_center_is_zero() {
        let mut input = InputState::new();
        input.set_pointer(400.0, 300.0, 800.0, 600.0);
        assert_eq!(input.pointer_direction(), Vec3::ZERO);
    }

    #[test]
    fn test_pointer_right_edge() {
        let mut input = InputState::new();
        input.set_pointer(800.0, 300.0, 800.0, 600.0);
        assert_eq!(input.pointer_direction(), Vec3::X);

        input.set_pointer(400.0, 0.0, 800.0, 600.0);
        assert_eq!(input.pointer_direction(), Vec3::Y);
    }

    #[test]
    fn test_far_off_screen_pointer_still_steers() {
        let mut input = InputState::new();
        input.set_pointer(1.0e30, 0.0, 800.0, 600.0);
        let dir = input.pointer_direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.99);
    }

    #[test]
    fn test_degenerate_viewport_keeps_direction() {
        let mut input = InputState::new();
        input.set_pointer(800.0, 300.0, 800.0, 600.0);
        input.set_pointer(10.0, 10.0, 0.0, 0.0);
        assert_eq!(input.pointer_direction(), Vec3::X);
    }

    #[test]
    fn test_clear() {
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        input.set_pointer(0.0, 0.0, 800.0, 600.0);
        input.clear();
        assert_eq!(input, InputState::default());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn finite() -> impl Strategy<Value = f32> {
            prop::num::f32::POSITIVE
                | prop::num::f32::NEGATIVE
                | prop::num::f32::NORMAL
                | prop::num::f32::SUBNORMAL
                | prop::num::f32::ZERO
        }

        fn extent() -> impl Strategy<Value = f32> {
            prop::num::f32::POSITIVE | prop::num::f32::NORMAL
        }

        proptest! {
            #[test]
            fn pointer_direction_is_unit_or_zero(
                x in finite(),
                y in finite(),
                w in extent(),
                h in extent(),
            ) {
                let mut input = InputState::new();
                input.set_pointer(x, y, w, h);
                let dir = input.pointer_direction();
                prop_assert!(dir.is_finite());
                prop_assert_eq!(dir.z, 0.0);

                let ndc = screen_to_ndc(x, y, w, h).unwrap();
                if ndc == glam::Vec2::ZERO {
                    prop_assert_eq!(dir.length(), 0.0);
                } else {
                    prop_assert!((dir.length() - 1.0).abs() < 1e-4);
                }
            }
        }
    }
}
