//! Car rig: the body box plus three wheels, laid out around the controlled body
//!
//! Only the body is simulated. Wheels are visual parts that follow it at fixed
//! offsets.

use glam::Vec3;

use crate::consts::{CAR_HALF_EXTENTS, WHEEL_RADIUS, WHEEL_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartRole {
    Body,
    FrontWheel,
    RearLeftWheel,
    RearRightWheel,
}

/// Geometry of a single part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarPart {
    pub role: PartRole,
    pub shape: PartShape,
    /// Offset from the body's center
    pub offset: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarRig {
    pub parts: Vec<CarPart>,
}

impl Default for CarRig {
    /// 2x1x4 body with a single front ball wheel and two rear cylinder wheels,
    /// wheel centers half a unit below the body center
    fn default() -> Self {
        let wheel_drop = -CAR_HALF_EXTENTS.y;
        let axle = CAR_HALF_EXTENTS.z;
        let track = CAR_HALF_EXTENTS.x;
        let rear_wheel = PartShape::Cylinder {
            radius: WHEEL_RADIUS,
            height: WHEEL_WIDTH,
        };

        Self {
            parts: vec![
                CarPart {
                    role: PartRole::Body,
                    shape: PartShape::Box {
                        half_extents: CAR_HALF_EXTENTS,
                    },
                    offset: Vec3::ZERO,
                },
                CarPart {
                    role: PartRole::FrontWheel,
                    shape: PartShape::Sphere {
                        radius: WHEEL_RADIUS,
                    },
                    offset: Vec3::new(0.0, wheel_drop, -axle),
                },
                CarPart {
                    role: PartRole::RearLeftWheel,
                    shape: rear_wheel,
                    offset: Vec3::new(-track, wheel_drop, axle),
                },
                CarPart {
                    role: PartRole::RearRightWheel,
                    shape: rear_wheel,
                    offset: Vec3::new(track, wheel_drop, axle),
                },
            ],
        }
    }
}

impl CarRig {
    /// Half extents of the collision box (the body part)
    pub fn body_half_extents(&self) -> Vec3 {
        self.parts
            .iter()
            .find_map(|part| match (part.role, part.shape) {
                (PartRole::Body, PartShape::Box { half_extents }) => Some(half_extents),
                _ => None,
            })
            .unwrap_or(CAR_HALF_EXTENTS)
    }

    /// World-space placement of every part for a body at `body_pos`
    pub fn placed(&self, body_pos: Vec3) -> impl Iterator<Item = (&CarPart, Vec3)> {
        self.parts.iter().map(move |part| (part, body_pos + part.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CAR_START;

    #[test]
    fn test_default_layout_at_start() {
        let rig = CarRig::default();
        let placed: Vec<(PartRole, Vec3)> = rig
            .placed(CAR_START)
            .map(|(part, pos)| (part.role, pos))
            .collect();

        assert_eq!(
            placed,
            vec![
                (PartRole::Body, Vec3::new(0.0, 1.0, 0.0)),
                (PartRole::FrontWheel, Vec3::new(0.0, 0.5, -2.0)),
                (PartRole::RearLeftWheel, Vec3::new(-1.0, 0.5, 2.0)),
                (PartRole::RearRightWheel, Vec3::new(1.0, 0.5, 2.0)),
            ]
        );
    }

    #[test]
    fn test_wheels_follow_body() {
        let rig = CarRig::default();
        let moved = Vec3::new(3.0, 1.0, -4.0);
        for (part, pos) in rig.placed(moved) {
            assert_eq!(pos - moved, part.offset);
        }
        assert_eq!(rig.body_half_extents(), CAR_HALF_EXTENTS);
    }
}
