//! Actor base shared by scene objects
//!
//! Holds identity, placement, damping, the scene link and the joints an object
//! takes part in. Entities build on it; it knows nothing about models.

use std::io::{self, Read, Write};
use std::rc::{Rc, Weak};

use crate::assets::pak;
use crate::foundation::math::{euler, Quat, Transform, Vec3};
use crate::foundation::memory::{ActorId, ObjectKind, ObjectRegistry, ObjectTicket};
use crate::physics::SharedJoint;
use super::Scene;

/// Scene object base
#[derive(Debug)]
pub struct Actor {
    ticket: ObjectTicket,
    name: Option<String>,
    parent_name: Option<String>,
    transform: Transform,
    linear_damping: f32,
    angular_damping: f32,
    scene: Weak<Scene>,
    joints: Vec<SharedJoint>,
    moved: bool,
    selected: bool,
}

impl Actor {
    /// Create an actor and register it as a live object
    pub fn new(name: Option<&str>, kind: ObjectKind, registry: &ObjectRegistry) -> Self {
        Self {
            ticket: registry.register(kind),
            name: name.map(str::to_string),
            parent_name: None,
            transform: Transform::identity(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            scene: Weak::new(),
            joints: Vec::new(),
            moved: true,
            selected: false,
        }
    }

    /// Registry id, also used to link physics bodies back to the actor
    pub fn id(&self) -> ActorId {
        self.ticket.id()
    }

    /// Actor name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the actor
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    /// Name of the parent object in the scene file
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Set the parent name
    pub fn set_parent_name(&mut self, parent_name: Option<&str>) {
        self.parent_name = parent_name.map(str::to_string);
    }

    /// Placement
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable placement; callers are responsible for marking the actor moved
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
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

    /// Owning scene, if it is still alive
    pub fn scene(&self) -> Option<Rc<Scene>> {
        self.scene.upgrade()
    }

    /// Point the actor at a scene (or none)
    pub fn set_scene_link(&mut self, scene: Option<&Rc<Scene>>) {
        self.scene = scene.map_or_else(Weak::new, Rc::downgrade);
    }

    /// Joints this actor takes part in
    pub fn joints(&self) -> &[SharedJoint] {
        &self.joints
    }

    /// Remember a joint
    pub fn add_joint(&mut self, joint: SharedJoint) {
        self.joints.push(joint);
    }

    /// Forget a joint by name
    pub fn take_joint(&mut self, name: &str) -> Option<SharedJoint> {
        let index = self.joints.iter().position(|j| j.borrow().name() == name)?;
        Some(self.joints.remove(index))
    }

    /// Whether cached placement is out of date
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Mark cached placement as out of date
    pub fn mark_moved(&mut self) {
        self.moved = true;
    }

    /// Mark cached placement as current
    pub fn clear_moved(&mut self) {
        self.moved = false;
    }

    /// Whether the actor is selected in an editor
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Select or deselect the actor
    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Apply a header read from a record
    pub fn apply_header(&mut self, header: &ActorHeader) {
        self.name = header.name.clone();
        self.parent_name = header.parent_name.clone();
        self.transform.position = header.position;
        self.transform.rotation = euler::to_quat(header.rotation);
        self.moved = true;
    }
}

/// Actor fields stored at the start of every object record
#[derive(Debug, Clone, PartialEq)]
pub struct ActorHeader {
    /// Object name; empty on disk means none
    pub name: Option<String>,
    /// Parent name; empty on disk means none
    pub parent_name: Option<String>,
    /// Position
    pub position: Vec3,
    /// Euler rotation in degrees (XYZ)
    pub rotation: Vec3,
}

impl Default for ActorHeader {
    fn default() -> Self {
        Self {
            name: None,
            parent_name: None,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
        }
    }
}

impl ActorHeader {
    /// Header for an actor at `position` with rotation `orientation`
    pub fn new(name: Option<&str>, position: Vec3, orientation: Quat) -> Self {
        Self {
            name: name.map(str::to_string),
            parent_name: None,
            position,
            rotation: euler::from_quat(&orientation),
        }
    }

    /// Read a header
    pub fn read(reader: &mut impl Read) -> io::Result<Self> {
        let name = pak::read_name(reader)?;
        let parent_name = pak::read_name(reader)?;
        let position = pak::read_vec3(reader)?;
        let rotation = pak::read_vec3(reader)?;
        Ok(Self {
            name: (!name.is_empty()).then_some(name),
            parent_name: (!parent_name.is_empty()).then_some(parent_name),
            position,
            rotation,
        })
    }

    /// Write a header
    pub fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        pak::write_name(writer, self.name.as_deref().unwrap_or(""))?;
        pak::write_name(writer, self.parent_name.as_deref().unwrap_or(""))?;
        pak::write_vec3(writer, &self.position)?;
        pak::write_vec3(writer, &self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    #[test]
    fn test_header_empty_names_are_none() {
        let header = ActorHeader {
            name: Some("crate".to_string()),
            parent_name: None,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
        };
        let mut bytes = Vec::new();
        header.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), pak::NAME_LENGTH * 2 + 24);

        let read = ActorHeader::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read.name.as_deref(), Some("crate"));
        assert!(read.parent_name.is_none());
    }

    #[test]
    fn test_apply_header_sets_rotation_from_degrees() {
        let registry = ObjectRegistry::new();
        let mut actor = Actor::new(None, ObjectKind::Entity, &registry);
        actor.apply_header(&ActorHeader {
            rotation: Vec3::new(0.0, 0.0, 90.0),
            ..ActorHeader::default()
        });
        let turned = actor.transform().rotation * Vec3::x();
        assert_relative_eq!(turned, Vec3::y(), epsilon = 1e-5);
    }

    #[test]
    fn test_actor_holds_registry_ticket() {
        let registry = ObjectRegistry::new();
        let actor = Actor::new(Some("a"), ObjectKind::Entity, &registry);
        assert!(registry.contains(actor.id()));
        drop(actor);
        assert_eq!(registry.live_count(), 0);
    }
}
