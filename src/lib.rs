//! Drive Dodge - steer a car across the arena while shapes rain down
//!
//! Core modules:
//! - `sim`: Simulation core (input, motion, collision gate, shape spawner)
//! - `platform`: Raw input events and scoped listener/timer ownership
//! - `settings`: Data-driven game configuration

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Nominal frame timestep (the host drives ticks from its animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Distance the car travels per tick at full throttle
    pub const MOVE_SPEED: f32 = 0.05;

    /// Car body spawn position
    pub const CAR_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    /// Car body box half extents (full size 2 x 1 x 4)
    pub const CAR_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.5, 2.0);
    /// Wheel radius (front sphere and rear cylinders)
    pub const WHEEL_RADIUS: f32 = 0.5;
    /// Rear wheel cylinder height
    pub const WHEEL_WIDTH: f32 = 1.0;

    /// Time between falling shapes
    pub const SPAWN_INTERVAL_MS: u32 = 1000;
    /// Shapes appear this high above the play area
    pub const SPAWN_HEIGHT: f32 = 10.0;
    /// Spawn x/z are drawn from [-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT)
    pub const SPAWN_HALF_EXTENT: f32 = 5.0;
    /// Shape size range [min, max)
    pub const SHAPE_SIZE_MIN: f32 = 0.5;
    pub const SHAPE_SIZE_MAX: f32 = 2.5;

    /// Default live shape cap
    pub const MAX_LIVE_SHAPES: usize = 64;
    /// Shapes below this height are removed
    pub const FLOOR_Y: f32 = -20.0;
    /// Shapes further than this from the origin (x or z) are removed
    pub const PLAY_HALF_EXTENT: f32 = 50.0;
    /// Half size of the ground slab in the kinematic world
    pub const GROUND_HALF_EXTENT: f32 = 20.0;
    /// Gravity applied to falling shapes (units/s²)
    pub const GRAVITY: f32 = 9.81;
}

/// Map a screen position to normalized device coordinates in [-1, 1]
///
/// Screen Y grows downward, NDC Y grows upward. Returns `None` for a
/// degenerate viewport.
#[inline]
pub fn screen_to_ndc(x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> Option<Vec2> {
    let valid = |d: f32| d.is_finite() && d > 0.0;
    if !valid(viewport_width) || !valid(viewport_height) {
        return None;
    }
    Some(Vec2::new(
        (x / viewport_width) * 2.0 - 1.0,
        -(y / viewport_height) * 2.0 + 1.0,
    ))
}

/// Lift an NDC point into a planar steering direction (z = 0), unit length or zero
///
/// Far off-screen pointers still steer: the point is rescaled before
/// normalizing so its squared length can't overflow, and an infinite
/// component dominates the direction.
#[inline]
pub fn ndc_to_direction(ndc: Vec2) -> Vec3 {
    let scaled = if ndc.is_finite() {
        let m = ndc.abs().max_element();
        if m > 0.0 { ndc / m } else { ndc }
    } else {
        let limit = |v: f32| if v.is_infinite() { v.signum() } else { 0.0 };
        Vec2::new(limit(ndc.x), limit(ndc.y))
    };
    scaled.extend(0.0).normalize_or_zero()
}
