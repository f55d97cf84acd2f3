//! Live object accounting
//!
//! Every entity and joint registers itself in an [`ObjectRegistry`] and keeps
//! the returned [`ObjectTicket`] for as long as it lives. Dropping the ticket
//! removes the entry, so the registry always reports the number of live
//! objects without any global state.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use slotmap::{SlotMap, Key};

slotmap::new_key_type! {
    /// Stable identifier of a registered object
    pub struct ObjectId;
}

/// Identifier physics bodies use to point back at the owning actor
pub type ActorId = ObjectId;

/// What kind of object holds a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A scene entity
    Entity,
    /// A physics joint between two entities
    Joint,
}

type Slots = RefCell<SlotMap<ObjectId, ObjectKind>>;

/// Shared registry of live objects
///
/// Cloning the registry clones the handle, not the contents.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    slots: Rc<Slots>,
}

impl ObjectRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new live object
    pub fn register(&self, kind: ObjectKind) -> ObjectTicket {
        let id = self.slots.borrow_mut().insert(kind);
        log::trace!("Registered {:?} {:?}", kind, id);
        ObjectTicket {
            id,
            registry: Rc::downgrade(&self.slots),
        }
    }

    /// Number of live objects of any kind
    pub fn live_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Number of live objects of one kind
    pub fn live_count_of(&self, kind: ObjectKind) -> usize {
        self.slots.borrow().values().filter(|k| **k == kind).count()
    }

    /// Whether an id still refers to a live object
    pub fn contains(&self, id: ObjectId) -> bool {
        self.slots.borrow().contains_key(id)
    }
}

/// Membership of one object in a registry; unregisters on drop
#[derive(Debug)]
pub struct ObjectTicket {
    id: ObjectId,
    registry: Weak<Slots>,
}

impl ObjectTicket {
    /// Identifier assigned at registration
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Drop for ObjectTicket {
    fn drop(&mut self) {
        if let Some(slots) = self.registry.upgrade() {
            if let Ok(mut slots) = slots.try_borrow_mut() {
                slots.remove(self.id);
            } else {
                log::warn!("Object registry busy while releasing {:?}", self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_track_live_objects() {
        let registry = ObjectRegistry::new();
        let a = registry.register(ObjectKind::Entity);
        let b = registry.register(ObjectKind::Joint);
        assert_eq!(registry.live_count(), 2);
        assert_eq!(registry.live_count_of(ObjectKind::Entity), 1);
        assert!(registry.contains(a.id()));

        drop(a);
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.live_count_of(ObjectKind::Entity), 0);

        drop(b);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_ticket_outliving_registry_is_harmless() {
        let registry = ObjectRegistry::new();
        let ticket = registry.register(ObjectKind::Entity);
        drop(registry);
        drop(ticket);
    }

    #[test]
    fn test_clones_share_contents() {
        let registry = ObjectRegistry::new();
        let other = registry.clone();
        let _ticket = other.register(ObjectKind::Entity);
        assert_eq!(registry.live_count(), 1);
    }
}
