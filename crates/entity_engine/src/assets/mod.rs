//! Asset management system
//!
//! Models, armatures and materials are shared through `Rc`. The [`AssetCache`]
//! hands out the cached instance for a name and falls back to an optional
//! [`AssetSource`] the first time a name is requested.

pub mod armature;
pub mod material;
pub mod model;
pub mod pak;

pub use armature::{Armature, Bone, BonePose, Pose};
pub use material::{Material, Texture, TextureRole, TextureSlot, MAX_TEXTURES};
pub use model::{MeshData, Model, ModelArea, VertexData, VertexWeights};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Asset errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Geometry arrays disagree or index past the vertex data
    #[error("Invalid mesh '{name}': {reason}")]
    InvalidMesh {
        /// Asset name
        name: String,
        /// What is wrong
        reason: String,
    },

    /// Bone hierarchy or keyframes are inconsistent
    #[error("Invalid armature '{name}': {reason}")]
    InvalidArmature {
        /// Asset name
        name: String,
        /// What is wrong
        reason: String,
    },
}

/// Loader consulted on cache misses
pub trait AssetSource {
    /// Load a model by name
    fn load_model(&self, _name: &str) -> Option<Rc<Model>> {
        None
    }

    /// Load an armature by name
    fn load_armature(&self, _name: &str) -> Option<Rc<Armature>> {
        None
    }

    /// Load a material by name
    fn load_material(&self, _name: &str) -> Option<Rc<Material>> {
        None
    }
}

/// Name-keyed get-or-load cache for shared assets
#[derive(Default)]
pub struct AssetCache {
    models: RefCell<HashMap<String, Rc<Model>>>,
    armatures: RefCell<HashMap<String, Rc<Armature>>>,
    materials: RefCell<HashMap<String, Rc<Material>>>,
    source: Option<Box<dyn AssetSource>>,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("models", &self.models.borrow().len())
            .field("armatures", &self.armatures.borrow().len())
            .field("materials", &self.materials.borrow().len())
            .field("has_source", &self.source.is_some())
            .finish()
    }
}

impl AssetCache {
    /// Create an empty cache without a loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that loads misses from `source`
    pub fn with_source(source: Box<dyn AssetSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Register a model under its own name
    pub fn insert_model(&self, model: Rc<Model>) {
        self.models.borrow_mut().insert(model.name().to_string(), model);
    }

    /// Register an armature under its own name
    pub fn insert_armature(&self, armature: Rc<Armature>) {
        self.armatures.borrow_mut().insert(armature.name().to_string(), armature);
    }

    /// Register a material under its own name
    pub fn insert_material(&self, material: Rc<Material>) {
        self.materials.borrow_mut().insert(material.name().to_string(), material);
    }

    /// Cached model, loading it on first request
    pub fn get_or_load_model(&self, name: &str) -> Option<Rc<Model>> {
        get_or_load(&self.models, name, |n| {
            self.source.as_ref().and_then(|s| s.load_model(n))
        })
    }

    /// Cached armature, loading it on first request
    pub fn get_or_load_armature(&self, name: &str) -> Option<Rc<Armature>> {
        get_or_load(&self.armatures, name, |n| {
            self.source.as_ref().and_then(|s| s.load_armature(n))
        })
    }

    /// Cached material, loading it on first request
    pub fn get_or_load_material(&self, name: &str) -> Option<Rc<Material>> {
        get_or_load(&self.materials, name, |n| {
            self.source.as_ref().and_then(|s| s.load_material(n))
        })
    }
}

fn get_or_load<T>(
    cache: &RefCell<HashMap<String, Rc<T>>>,
    name: &str,
    load: impl FnOnce(&str) -> Option<Rc<T>>,
) -> Option<Rc<T>> {
    if name.is_empty() {
        return None;
    }
    if let Some(asset) = cache.borrow().get(name) {
        return Some(Rc::clone(asset));
    }

    let asset = load(name)?;
    log::debug!("Loaded asset '{}'", name);
    cache.borrow_mut().insert(name.to_string(), Rc::clone(&asset));
    Some(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        loads: Rc<Cell<usize>>,
    }

    impl AssetSource for CountingSource {
        fn load_material(&self, name: &str) -> Option<Rc<Material>> {
            self.loads.set(self.loads.get() + 1);
            (name == "steel").then(|| Rc::new(Material::new(name)))
        }
    }

    #[test]
    fn test_cache_hit_after_first_load() {
        let loads = Rc::new(Cell::new(0));
        let cache = AssetCache::with_source(Box::new(CountingSource { loads: loads.clone() }));

        let a = cache.get_or_load_material("steel").unwrap();
        let b = cache.get_or_load_material("steel").unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_missing_and_empty_names() {
        let cache = AssetCache::new();
        assert!(cache.get_or_load_model("").is_none());
        assert!(cache.get_or_load_armature("nope").is_none());
    }

    #[test]
    fn test_inserted_assets_resolve_by_name() {
        let cache = AssetCache::new();
        cache.insert_material(Rc::new(Material::new("paint")));
        assert_eq!(cache.get_or_load_material("paint").unwrap().name(), "paint");
    }
}
