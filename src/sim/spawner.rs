//! Timed spawner of falling decorative shapes

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Shape families dropped into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cone,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Cone];
}

/// A shape waiting for the renderer/physics to pick it up. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDescriptor {
    pub kind: ShapeKind,
    /// Box edge length, or sphere/cone base radius
    pub size: f32,
    pub spawn_position: Vec3,
}

impl ShapeDescriptor {
    /// Radius of a sphere enclosing the shape's footprint (used for contacts)
    pub fn bounding_radius(&self) -> f32 {
        match self.kind {
            ShapeKind::Box => self.size * 0.5,
            ShapeKind::Sphere | ShapeKind::Cone => self.size,
        }
    }
}

/// Random draws the spawner needs. Injectable so tests can script them.
pub trait ShapeRandom {
    /// Uniform over `ShapeKind::ALL`
    fn kind(&mut self) -> ShapeKind;
    /// Uniform in `[SHAPE_SIZE_MIN, SHAPE_SIZE_MAX)`
    fn size(&mut self) -> f32;
    /// Spawn (x, z), each uniform in `[-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT)`
    fn horizontal(&mut self) -> (f32, f32);
}

impl ShapeRandom for Pcg32 {
    fn kind(&mut self) -> ShapeKind {
        ShapeKind::ALL[self.random_range(0..ShapeKind::ALL.len())]
    }

    fn size(&mut self) -> f32 {
        self.random_range(SHAPE_SIZE_MIN..SHAPE_SIZE_MAX)
    }

    fn horizontal(&mut self) -> (f32, f32) {
        let x = self.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        let z = self.random_range(-SPAWN_HALF_EXTENT..SPAWN_HALF_EXTENT);
        (x, z)
    }
}

/// Fraction of an interval that still counts as reaching the boundary
const BOUNDARY_SLACK: f32 = 1e-4;

/// Emits one shape per interval of accumulated time
#[derive(Debug, Clone)]
pub struct ShapeSpawner {
    /// Seconds between shapes
    interval: f32,
    /// Seconds accumulated toward the next shape
    accumulator: f32,
    /// Total shapes emitted
    spawned: u64,
}

impl Default for ShapeSpawner {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL_MS)
    }
}

impl ShapeSpawner {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval: interval_ms.max(1) as f32 / 1000.0,
            accumulator: 0.0,
            spawned: 0,
        }
    }

    pub fn interval_secs(&self) -> f32 {
        self.interval
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Account for `elapsed` seconds; returns a shape when an interval boundary
    /// is crossed
    ///
    /// At most one shape per call. If several intervals elapsed at once (a
    /// backgrounded tab, a long frame) the extras are dropped rather than
    /// released as a burst.
    pub fn on_tick<R: ShapeRandom + ?Sized>(
        &mut self,
        elapsed: f32,
        rng: &mut R,
    ) -> Option<ShapeDescriptor> {
        if !elapsed.is_finite() || elapsed <= 0.0 {
            return None;
        }

        // A run of frame steps summing to one interval lands a hair short of it
        self.accumulator += elapsed;
        if self.accumulator < self.interval * (1.0 - BOUNDARY_SLACK) {
            return None;
        }

        self.accumulator = (self.accumulator - self.interval).max(0.0);
        if self.accumulator >= self.interval {
            let missed = (self.accumulator / self.interval).floor();
            log::debug!("Spawner dropped {} missed intervals", missed);
            self.accumulator %= self.interval;
        }

        self.spawned += 1;
        Some(Self::build(rng))
    }

    fn build<R: ShapeRandom + ?Sized>(rng: &mut R) -> ShapeDescriptor {
        let kind = rng.kind();
        let size = rng.size();
        let (x, z) = rng.horizontal();
        ShapeDescriptor {
            kind,
            size,
            spawn_position: Vec3::new(x, SPAWN_HEIGHT, z),
        }
    }
}
