//! Physics module
//!
//! Rigid bodies, collision shapes, joints and world membership. Integration is
//! left to an external solver; this module keeps bodies, constraints and their
//! world associations consistent.

pub mod joint;
pub mod mesh;
pub mod object;
pub mod shape;
pub mod world;

pub use joint::{Joint, JointKind, SharedJoint};
pub use mesh::{Triangle, TriangleMesh};
pub use object::PhysicsObject;
pub use shape::{CollisionShape, ShapeKind};
pub use world::{BodyKey, BodyRecord, ConstraintKey, PhysicsWorld, SharedWorld};
