//! Physics world membership
//!
//! The world records which bodies and constraints are attached to it. It does
//! not integrate anything; a solver reads and writes body placement through
//! [`PhysicsObject`](super::PhysicsObject).

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;

use crate::foundation::memory::ActorId;
use super::shape::ShapeKind;

slotmap::new_key_type! {
    /// Handle of a body attached to a world
    pub struct BodyKey;

    /// Handle of a constraint attached to a world
    pub struct ConstraintKey;
}

/// World shared between a scene and the bodies attached to it
pub type SharedWorld = Rc<RefCell<PhysicsWorld>>;

/// What the world knows about an attached body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRecord {
    /// Actor the body belongs to, if any
    pub actor: Option<ActorId>,
    /// Shape the body was built from
    pub shape: ShapeKind,
    /// Body mass; zero means static
    pub mass: f32,
}

/// What the world knows about an attached constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintRecord {
    /// Joint name
    pub name: String,
}

/// A collection of bodies and constraints that interact with each other
#[derive(Debug)]
pub struct PhysicsWorld {
    name: String,
    collision_response: bool,
    bodies: SlotMap<BodyKey, BodyRecord>,
    constraints: SlotMap<ConstraintKey, ConstraintRecord>,
}

impl PhysicsWorld {
    /// Create a simulated world
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            collision_response: true,
            bodies: SlotMap::with_key(),
            constraints: SlotMap::with_key(),
        }
    }

    /// Create a world used only for debug visualization (no collision response)
    pub fn new_debug(name: &str) -> Self {
        Self {
            collision_response: false,
            ..Self::new(name)
        }
    }

    /// Wrap the world for sharing
    pub fn shared(self) -> SharedWorld {
        Rc::new(RefCell::new(self))
    }

    /// World name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether contacts produce collision response
    pub fn has_collision_response(&self) -> bool {
        self.collision_response
    }

    /// Attach a body
    pub fn insert_body(&mut self, record: BodyRecord) -> BodyKey {
        log::trace!("World '{}': attach {:?} body (mass {})", self.name, record.shape, record.mass);
        self.bodies.insert(record)
    }

    /// Detach a body
    pub fn remove_body(&mut self, key: BodyKey) -> Option<BodyRecord> {
        self.bodies.remove(key)
    }

    /// Look up an attached body
    pub fn body(&self, key: BodyKey) -> Option<&BodyRecord> {
        self.bodies.get(key)
    }

    /// Whether a body is attached
    pub fn contains_body(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    /// Number of attached bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Attach a constraint
    pub fn insert_constraint(&mut self, record: ConstraintRecord) -> ConstraintKey {
        log::trace!("World '{}': attach constraint '{}'", self.name, record.name);
        self.constraints.insert(record)
    }

    /// Detach a constraint
    pub fn remove_constraint(&mut self, key: ConstraintKey) -> Option<ConstraintRecord> {
        self.constraints.remove(key)
    }

    /// Whether a constraint is attached
    pub fn contains_constraint(&self, key: ConstraintKey) -> bool {
        self.constraints.contains_key(key)
    }

    /// Number of attached constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_world_has_no_response() {
        assert!(PhysicsWorld::new("sim").has_collision_response());
        assert!(!PhysicsWorld::new_debug("debug").has_collision_response());
    }

    #[test]
    fn test_body_membership() {
        let mut world = PhysicsWorld::new("sim");
        let key = world.insert_body(BodyRecord {
            actor: None,
            shape: ShapeKind::Box,
            mass: 1.0,
        });
        assert!(world.contains_body(key));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.remove_body(key).map(|b| b.shape), Some(ShapeKind::Box));
        assert!(!world.contains_body(key));
    }
}
