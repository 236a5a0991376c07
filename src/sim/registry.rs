//! Live shape registry
//!
//! Arena keyed by entity id. Ids are allocated monotonically, so id order is
//! spawn order and render keys stay stable as entries come and go.

use std::collections::BTreeMap;

use glam::Vec3;

use super::spawner::ShapeDescriptor;
use super::world::{EntityId, PhysicsWorld};
use crate::consts::{FLOOR_Y, PLAY_HALF_EXTENT};

/// Region a shape must stay inside to remain live
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayBounds {
    /// Anything below this height has fallen out of the world
    pub floor_y: f32,
    /// Maximum |x| and |z|
    pub half_extent: f32,
}

impl Default for PlayBounds {
    fn default() -> Self {
        Self {
            floor_y: FLOOR_Y,
            half_extent: PLAY_HALF_EXTENT,
        }
    }
}

impl PlayBounds {
    pub fn contains(&self, pos: Vec3) -> bool {
        pos.y >= self.floor_y && pos.x.abs() <= self.half_extent && pos.z.abs() <= self.half_extent
    }
}

#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    shapes: BTreeMap<EntityId, ShapeDescriptor>,
    /// `None` grows without limit
    max_live: Option<usize>,
}

impl ShapeRegistry {
    pub fn new(max_live: Option<usize>) -> Self {
        Self {
            shapes: BTreeMap::new(),
            max_live,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn max_live(&self) -> Option<usize> {
        self.max_live
    }

    /// Append a shape. When the cap is reached the oldest entry is evicted and
    /// its id returned so the caller can detach the body.
    pub fn insert(&mut self, id: EntityId, shape: ShapeDescriptor) -> Option<EntityId> {
        let evicted = match self.max_live {
            Some(cap) if self.shapes.len() >= cap => self.shapes.pop_first().map(|(old, _)| old),
            _ => None,
        };
        if let Some(old) = evicted {
            log::debug!("Shape cap reached, evicting {}", old);
        }
        self.shapes.insert(id, shape);
        evicted
    }

    pub fn remove(&mut self, id: EntityId) -> Option<ShapeDescriptor> {
        self.shapes.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&ShapeDescriptor> {
        self.shapes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Live shapes in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &ShapeDescriptor)> {
        self.shapes.iter().map(|(&id, shape)| (id, shape))
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Drop shapes whose body has left `bounds`
    ///
    /// Shapes the world doesn't know about yet are kept. Returns removed ids in
    /// spawn order.
    pub fn cull<W: PhysicsWorld + ?Sized>(&mut self, world: &W, bounds: &PlayBounds) -> Vec<EntityId> {
        let gone: Vec<EntityId> = self
            .shapes
            .keys()
            .copied()
            .filter(|&id| world.position(id).is_some_and(|pos| !bounds.contains(pos)))
            .collect();

        for id in &gone {
            self.shapes.remove(id);
        }
        if !gone.is_empty() {
            log::debug!("Culled {} shapes out of bounds", gone.len());
        }
        gone
    }
}
