//! Kinematic car motion: keyboard throttle along the pointer direction

use glam::Vec3;

use super::input::InputState;
use super::world::{EntityId, PhysicsWorld, WorldError};
use crate::consts::MOVE_SPEED;

/// Moves the controlled body once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionController {
    /// Distance per tick at full throttle (K)
    speed: f32,
}

impl Default for MotionController {
    fn default() -> Self {
        Self { speed: MOVE_SPEED }
    }
}

impl MotionController {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Signed speed for the current keys. Both keys held cancel out.
    pub fn throttle(&self, input: &InputState) -> f32 {
        match (input.forward, input.backward) {
            (true, false) => self.speed,
            (false, true) => -self.speed,
            _ => 0.0,
        }
    }

    /// Position after one tick, no clamping
    pub fn advance(&self, position: Vec3, input: &InputState) -> Vec3 {
        position + input.pointer_direction() * self.throttle(input)
    }

    /// Advance `body` inside `world`
    ///
    /// A body that isn't attached yet (no handle, or unknown to the world) is
    /// skipped and yields `Ok(None)`.
    pub fn tick<W: PhysicsWorld + ?Sized>(
        &self,
        input: &InputState,
        world: &mut W,
        body: Option<EntityId>,
    ) -> Result<Option<Vec3>, WorldError> {
        let Some(id) = body else {
            return Ok(None);
        };
        let Some(current) = world.position(id) else {
            return Ok(None);
        };

        let next = self.advance(current, input);
        world.set_position(id, next)?;
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CAR_HALF_EXTENTS;
    use crate::sim::collision::collision_channel;
    use crate::sim::input::Key;
    use crate::sim::world::KinematicWorld;

    fn steering_right(forward: bool, backward: bool) -> InputState {
        let mut input = InputState::new();
        input.set_key(Key::Forward, forward);
        input.set_key(Key::Backward, backward);
        // Right edge, vertical center -> (1, 0, 0)
        input.set_pointer(800.0, 300.0, 800.0, 600.0);
        input
    }

    #[test]
    fn test_throttle_table() {
        let motion = MotionController::new(0.05);
        assert_eq!(motion.throttle(&steering_right(true, false)), 0.05);
        assert_eq!(motion.throttle(&steering_right(false, true)), -0.05);
        assert_eq!(motion.throttle(&steering_right(false, false)), 0.0);
        assert_eq!(motion.throttle(&steering_right(true, true)), 0.0);
    }

    #[test]
    fn test_single_tick_forward() {
        let motion = MotionController::new(0.05);
        let input = steering_right(true, false);
        let next = motion.advance(Vec3::new(0.0, 1.0, 0.0), &input);
        assert_eq!(next, Vec3::new(0.05, 1.0, 0.0));
    }

    #[test]
    fn test_reverse_moves_against_pointer() {
        let motion = MotionController::default();
        let input = steering_right(false, true);
        let next = motion.advance(Vec3::ZERO, &input);
        assert_eq!(next, Vec3::new(-MOVE_SPEED, 0.0, 0.0));
    }

    #[test]
    fn test_centered_pointer_does_not_move() {
        let motion = MotionController::default();
        let mut input = InputState::new();
        input.set_key(Key::Forward, true);
        input.set_pointer(400.0, 300.0, 800.0, 600.0);
        assert_eq!(motion.advance(Vec3::ONE, &input), Vec3::ONE);
    }

    #[test]
    fn test_tick_writes_world() {
        let (tx, _rx) = collision_channel();
        let mut world = KinematicWorld::new(tx);
        let car = EntityId(1);
        world.add_car(car, Vec3::new(0.0, 1.0, 0.0), CAR_HALF_EXTENTS).unwrap();

        let motion = MotionController::new(0.05);
        let moved = motion
            .tick(&steering_right(true, false), &mut world, Some(car))
            .unwrap();

        assert_eq!(moved, Some(Vec3::new(0.05, 1.0, 0.0)));
        assert_eq!(world.position(car), Some(Vec3::new(0.05, 1.0, 0.0)));
    }

    #[test]
    fn test_tick_unready_body_is_noop() {
        let (tx, _rx) = collision_channel();
        let mut world = KinematicWorld::new(tx);
        let motion = MotionController::default();
        let input = steering_right(true, false);

        assert_eq!(motion.tick(&input, &mut world, None), Ok(None));
        assert_eq!(motion.tick(&input, &mut world, Some(EntityId(42))), Ok(None));
        assert!(world.is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn throttle_is_total_and_symmetric(forward: bool, backward: bool, k in 0.001f32..10.0) {
                let motion = MotionController::new(k);
                let mut input = InputState::new();
                input.set_key(Key::Forward, forward);
                input.set_key(Key::Backward, backward);
                let mut mirrored = InputState::new();
                mirrored.set_key(Key::Forward, backward);
                mirrored.set_key(Key::Backward, forward);

                let speed = motion.throttle(&input);
                prop_assert_eq!(speed, -motion.throttle(&mirrored));

                let expected = if forward && !backward {
                    k
                } else if backward && !forward {
                    -k
                } else {
                    0.0
                };
                prop_assert_eq!(speed, expected);
            }
        }
    }
}
