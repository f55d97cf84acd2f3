//! Physics bodies
//!
//! A [`PhysicsObject`] owns its collision shape and placement. It can be
//! attached to at most one world at a time and detaches itself when dropped.

use std::rc::{Rc, Weak};
use std::cell::RefCell;

use crate::foundation::math::{Quat, Vec3};
use crate::foundation::memory::ActorId;
use super::shape::{CollisionShape, ShapeKind};
use super::world::{BodyKey, BodyRecord, PhysicsWorld, SharedWorld};

#[derive(Debug)]
struct WorldLink {
    world: Weak<RefCell<PhysicsWorld>>,
    key: BodyKey,
}

/// A rigid body
#[derive(Debug)]
pub struct PhysicsObject {
    shape: CollisionShape,
    mass: f32,
    linear_damping: f32,
    angular_damping: f32,
    position: Vec3,
    orientation: Quat,
    scale: Vec3,
    actor: Option<ActorId>,
    link: Option<WorldLink>,
}

impl PhysicsObject {
    /// Create a detached body
    pub fn new(shape: CollisionShape, mass: f32) -> Self {
        Self {
            shape,
            mass,
            linear_damping: 0.0,
            angular_damping: 0.0,
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            actor: None,
            link: None,
        }
    }

    /// Collision shape
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// Kind of the collision shape
    pub fn shape_kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Mass; zero means static
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Link the body back to the actor that owns it
    pub fn set_actor(&mut self, actor: Option<ActorId>) {
        self.actor = actor;
    }

    /// Actor that owns the body
    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    /// Set linear and angular damping
    pub fn set_damping(&mut self, linear: f32, angular: f32) {
        self.linear_damping = linear;
        self.angular_damping = angular;
    }

    /// Linear damping
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// Angular damping
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// Set world position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// World position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set world orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// World orientation
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Set shape scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Shape scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Attach to `world`, or detach when `None`
    ///
    /// A body already attached elsewhere is detached first.
    pub fn set_world(&mut self, world: Option<&SharedWorld>) {
        self.detach();

        if let Some(world) = world {
            let key = world.borrow_mut().insert_body(BodyRecord {
                actor: self.actor,
                shape: self.shape.kind(),
                mass: self.mass,
            });
            self.link = Some(WorldLink {
                world: Rc::downgrade(world),
                key,
            });
        }
    }

    /// World the body is attached to, if it is still alive
    pub fn world(&self) -> Option<SharedWorld> {
        self.link.as_ref().and_then(|link| link.world.upgrade())
    }

    /// Whether the body is attached to a live world
    pub fn is_in_world(&self) -> bool {
        self.world().is_some()
    }

    /// Key of the body inside its world
    pub fn body_key(&self) -> Option<BodyKey> {
        self.link.as_ref().map(|link| link.key)
    }

    fn detach(&mut self) {
        let Some(link) = self.link.take() else {
            return;
        };
        let Some(world) = link.world.upgrade() else {
            return;
        };
        match world.try_borrow_mut() {
            Ok(mut world) => {
                world.remove_body(link.key);
            }
            Err(_) => log::warn!("Physics world busy, body {:?} left attached", link.key),
        };
    }
}

impl Drop for PhysicsObject {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> CollisionShape {
        CollisionShape::fitted_box(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_attach_and_move_between_worlds() {
        let a = PhysicsWorld::new("a").shared();
        let b = PhysicsWorld::new("b").shared();
        let mut body = PhysicsObject::new(unit_box(), 2.0);

        body.set_world(Some(&a));
        assert_eq!(a.borrow().body_count(), 1);

        body.set_world(Some(&b));
        assert_eq!(a.borrow().body_count(), 0);
        assert_eq!(b.borrow().body_count(), 1);

        body.set_world(None);
        assert_eq!(b.borrow().body_count(), 0);
        assert!(!body.is_in_world());
    }

    #[test]
    fn test_drop_detaches() {
        let world = PhysicsWorld::new("sim").shared();
        {
            let mut body = PhysicsObject::new(unit_box(), 0.0);
            body.set_world(Some(&world));
            assert_eq!(world.borrow().body_count(), 1);
        }
        assert_eq!(world.borrow().body_count(), 0);
    }

    #[test]
    fn test_body_does_not_keep_world_alive() {
        let world = PhysicsWorld::new("sim").shared();
        let mut body = PhysicsObject::new(unit_box(), 1.0);
        body.set_world(Some(&world));
        drop(world);
        assert!(!body.is_in_world());
    }
}
