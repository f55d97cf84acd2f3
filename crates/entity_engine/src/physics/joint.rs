//! Constraints between two bodies
//!
//! A joint is shared by the two entities it connects. Whenever either side
//! replaces its body, the joint is re-attached so the constraint refers to the
//! current bodies.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::math::Vec3;
use crate::foundation::memory::{ActorId, ObjectKind, ObjectRegistry, ObjectTicket};
use super::world::{ConstraintKey, ConstraintRecord, PhysicsWorld, SharedWorld};

/// Joint shared between the two connected entities
pub type SharedJoint = Rc<RefCell<Joint>>;

/// Constraint type and its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// Rotation around a single axis
    Hinge {
        /// Pivot in the first body's space
        pivot: Vec3,
        /// Rotation axis
        axis: Vec3,
    },
    /// Free rotation around a point
    BallSocket {
        /// Pivot in the first body's space
        pivot: Vec3,
    },
    /// Rotation limited to a cone around an axis
    ConeTwist {
        /// Pivot in the first body's space
        pivot: Vec3,
        /// Cone axis
        axis: Vec3,
    },
}

#[derive(Debug)]
struct WorldLink {
    world: Weak<RefCell<PhysicsWorld>>,
    key: ConstraintKey,
}

/// A named constraint between two actors
#[derive(Debug)]
pub struct Joint {
    name: String,
    kind: JointKind,
    actor_a: ActorId,
    actor_b: ActorId,
    link: Option<WorldLink>,
    _ticket: ObjectTicket,
}

impl Joint {
    /// Create a detached joint between two actors
    pub fn new(
        name: &str,
        kind: JointKind,
        actor_a: ActorId,
        actor_b: ActorId,
        registry: &ObjectRegistry,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            actor_a,
            actor_b,
            link: None,
            _ticket: registry.register(ObjectKind::Joint),
        }
    }

    /// Joint name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constraint type
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// The two connected actors
    pub fn actors(&self) -> (ActorId, ActorId) {
        (self.actor_a, self.actor_b)
    }

    /// Whether `actor` is one side of this joint
    pub fn connects(&self, actor: ActorId) -> bool {
        self.actor_a == actor || self.actor_b == actor
    }

    /// Actor on the other side from `actor`
    pub fn other(&self, actor: ActorId) -> Option<ActorId> {
        if self.actor_a == actor {
            Some(self.actor_b)
        } else if self.actor_b == actor {
            Some(self.actor_a)
        } else {
            None
        }
    }

    /// Attach the constraint to `world`, or detach when `None`
    ///
    /// Attaching always rebuilds the constraint, so it picks up bodies that
    /// were replaced since the last call.
    pub fn set_world(&mut self, world: Option<&SharedWorld>) {
        self.detach();

        if let Some(world) = world {
            let key = world.borrow_mut().insert_constraint(ConstraintRecord {
                name: self.name.clone(),
            });
            self.link = Some(WorldLink {
                world: Rc::downgrade(world),
                key,
            });
        }
    }

    /// World the constraint is attached to
    pub fn world(&self) -> Option<SharedWorld> {
        self.link.as_ref().and_then(|link| link.world.upgrade())
    }

    /// Key of the constraint inside its world
    pub fn constraint_key(&self) -> Option<ConstraintKey> {
        self.link.as_ref().map(|link| link.key)
    }

    fn detach(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        if let Some(world) = link.world.upgrade() {
            match world.try_borrow_mut() {
                Ok(mut world) => {
                    world.remove_constraint(link.key);
                }
                Err(_) => log::warn!("Physics world busy, joint '{}' left attached", self.name),
            };
        }
    }
}

impl Drop for Joint {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joint(registry: &ObjectRegistry) -> Joint {
        let a = registry.register(ObjectKind::Entity);
        let b = registry.register(ObjectKind::Entity);
        Joint::new("hinge", JointKind::BallSocket { pivot: Vec3::zeros() }, a.id(), b.id(), registry)
    }

    #[test]
    fn test_reattach_replaces_constraint() {
        let registry = ObjectRegistry::new();
        let world = PhysicsWorld::new("sim").shared();
        let mut joint = joint(&registry);

        joint.set_world(Some(&world));
        let first = joint.constraint_key();
        joint.set_world(None);
        joint.set_world(Some(&world));

        assert_eq!(world.borrow().constraint_count(), 1);
        assert_ne!(joint.constraint_key(), first);
    }

    #[test]
    fn test_joint_registers_and_detaches_on_drop() {
        let registry = ObjectRegistry::new();
        let world = PhysicsWorld::new("sim").shared();
        let mut joint = joint(&registry);
        joint.set_world(Some(&world));
        assert_eq!(registry.live_count_of(ObjectKind::Joint), 1);

        drop(joint);
        assert_eq!(registry.live_count_of(ObjectKind::Joint), 0);
        assert_eq!(world.borrow().constraint_count(), 0);
    }

    #[test]
    fn test_other_side() {
        let registry = ObjectRegistry::new();
        let a = registry.register(ObjectKind::Entity);
        let b = registry.register(ObjectKind::Entity);
        let c = registry.register(ObjectKind::Entity);
        let joint = Joint::new("j", JointKind::BallSocket { pivot: Vec3::zeros() }, a.id(), b.id(), &registry);
        assert_eq!(joint.other(a.id()), Some(b.id()));
        assert_eq!(joint.other(c.id()), None);
        assert!(!joint.connects(c.id()));
    }
}
