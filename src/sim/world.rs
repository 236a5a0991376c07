//! Physics world boundary
//!
//! Rigid body transforms and contact detection belong to the host's physics
//! engine. The simulation only needs to read and write positions by entity id,
//! hand new shapes over, and hear about contacts through a collision channel.
//! `KinematicWorld` is a minimal engine that honors this contract for headless
//! runs, the web demo and tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use glam::Vec3;
use thiserror::Error;

use super::collision::{CollisionEvent, CollisionSender};
use super::spawner::ShapeDescriptor;
use crate::consts::{GRAVITY, GROUND_HALF_EXTENT};

/// Handle shared by the physics world and the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failures reported by a physics world
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),
    #[error("non-finite position {pos} for entity {id}")]
    NonFinite { id: EntityId, pos: Vec3 },
}

/// What the simulation needs from a physics engine
pub trait PhysicsWorld {
    /// Current position, `None` if the body is not (yet) known
    fn position(&self, id: EntityId) -> Option<Vec3>;

    /// Teleport a body
    fn set_position(&mut self, id: EntityId, pos: Vec3) -> Result<(), WorldError>;

    /// Create a dynamic body for a freshly spawned shape
    fn spawn_shape(&mut self, id: EntityId, shape: &ShapeDescriptor) -> Result<(), WorldError>;

    /// Remove a body; unknown ids are ignored
    fn despawn(&mut self, id: EntityId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BodyKind {
    /// Kinematic box driven by the motion controller
    Car { half_extents: Vec3 },
    /// Dynamic shape approximated by a bounding sphere
    Shape { radius: f32 },
}

#[derive(Debug, Clone)]
struct Body {
    kind: BodyKind,
    pos: Vec3,
    vel: Vec3,
    resting: bool,
}

/// Tiny stand-in physics engine
///
/// Shapes fall under gravity and come to rest on a square ground slab; shapes
/// that miss the slab keep falling. Car/shape overlaps publish one
/// `CollisionEvent` when contact begins (enter semantics).
pub struct KinematicWorld {
    bodies: BTreeMap<EntityId, Body>,
    contacts: BTreeSet<(EntityId, EntityId)>,
    collisions: CollisionSender,
    ground_half_extent: f32,
    gravity: f32,
}

impl KinematicWorld {
    pub fn new(collisions: CollisionSender) -> Self {
        Self {
            bodies: BTreeMap::new(),
            contacts: BTreeSet::new(),
            collisions,
            ground_half_extent: GROUND_HALF_EXTENT,
            gravity: GRAVITY,
        }
    }

    /// Register the player's car body
    pub fn add_car(&mut self, id: EntityId, pos: Vec3, half_extents: Vec3) -> Result<(), WorldError> {
        check_finite(id, pos)?;
        self.insert(
            id,
            Body {
                kind: BodyKind::Car { half_extents },
                pos,
                vel: Vec3::ZERO,
                resting: true,
            },
        )
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Integrate falling shapes and publish new contacts
    pub fn step(&mut self, dt: f32) {
        let half = self.ground_half_extent;
        for body in self.bodies.values_mut() {
            let BodyKind::Shape { radius } = body.kind else {
                continue;
            };
            if body.resting {
                continue;
            }
            let prev_y = body.pos.y;
            body.vel.y -= self.gravity * dt;
            body.pos += body.vel * dt;

            let over_ground = body.pos.x.abs() <= half && body.pos.z.abs() <= half;
            if over_ground && prev_y >= radius && body.pos.y <= radius {
                body.pos.y = radius;
                body.vel = Vec3::ZERO;
                body.resting = true;
            }
        }

        self.detect_contacts();
    }

    fn detect_contacts(&mut self) {
        let mut touching = BTreeSet::new();
        for (&car_id, car) in &self.bodies {
            let BodyKind::Car { half_extents } = car.kind else {
                continue;
            };
            let min = car.pos - half_extents;
            let max = car.pos + half_extents;
            for (&shape_id, shape) in &self.bodies {
                let BodyKind::Shape { radius } = shape.kind else {
                    continue;
                };
                let closest = shape.pos.clamp(min, max);
                if closest.distance_squared(shape.pos) <= radius * radius {
                    touching.insert((car_id, shape_id));
                }
            }
        }

        for pair in touching.difference(&self.contacts) {
            log::debug!("Contact begins: {} <-> {}", pair.0, pair.1);
            self.collisions.send(CollisionEvent::new(pair.0, pair.1));
        }
        self.contacts = touching;
    }

    fn insert(&mut self, id: EntityId, body: Body) -> Result<(), WorldError> {
        if self.bodies.contains_key(&id) {
            return Err(WorldError::DuplicateEntity(id));
        }
        self.bodies.insert(id, body);
        Ok(())
    }
}

impl PhysicsWorld for KinematicWorld {
    fn position(&self, id: EntityId) -> Option<Vec3> {
        self.bodies.get(&id).map(|b| b.pos)
    }

    fn set_position(&mut self, id: EntityId, pos: Vec3) -> Result<(), WorldError> {
        check_finite(id, pos)?;
        let body = self.bodies.get_mut(&id).ok_or(WorldError::UnknownEntity(id))?;
        body.pos = pos;
        Ok(())
    }

    fn spawn_shape(&mut self, id: EntityId, shape: &ShapeDescriptor) -> Result<(), WorldError> {
        check_finite(id, shape.spawn_position)?;
        self.insert(
            id,
            Body {
                kind: BodyKind::Shape {
                    radius: shape.bounding_radius(),
                },
                pos: shape.spawn_position,
                vel: Vec3::ZERO,
                resting: false,
            },
        )
    }

    fn despawn(&mut self, id: EntityId) {
        if self.bodies.remove(&id).is_some() {
            self.contacts.retain(|&(a, b)| a != id && b != id);
        }
    }
}

fn check_finite(id: EntityId, pos: Vec3) -> Result<(), WorldError> {
    if pos.is_finite() {
        Ok(())
    } else {
        Err(WorldError::NonFinite { id, pos })
    }
}
