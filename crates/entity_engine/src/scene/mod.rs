//! Scene ownership
//!
//! A scene owns the simulation world, a debug-only world without collision
//! response, the asset cache, the live object registry and its entities.
//! Entities point back at the scene weakly.

pub mod actor;

pub use actor::{Actor, ActorHeader};

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

use crate::assets::AssetCache;
use crate::config::SceneConfig;
use crate::entity::{Entity, SharedEntity};
use crate::foundation::memory::{ActorId, ObjectRegistry};
use crate::physics::{PhysicsWorld, SharedWorld};
use crate::render::{Camera, Renderer, ShaderParams};

/// Per-frame draw statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities drawn
    pub drawn: usize,
    /// Entities skipped by culling
    pub culled: usize,
}

/// Container for entities and the worlds they live in
#[derive(Debug)]
pub struct Scene {
    name: String,
    file_path: String,
    config: SceneConfig,
    world: SharedWorld,
    debug_world: SharedWorld,
    assets: AssetCache,
    registry: ObjectRegistry,
    entities: RefCell<Vec<SharedEntity>>,
}

impl Scene {
    /// Create an empty scene with an empty asset cache
    pub fn new(name: &str, config: SceneConfig) -> Rc<Self> {
        Self::with_assets(name, "", config, AssetCache::new())
    }

    /// Create an empty scene loaded from `file_path`, resolving assets through `assets`
    pub fn with_assets(name: &str, file_path: &str, config: SceneConfig, assets: AssetCache) -> Rc<Self> {
        log::info!("Creating scene '{}'", name);
        Rc::new(Self {
            name: name.to_string(),
            file_path: file_path.to_string(),
            config,
            world: PhysicsWorld::new(name).shared(),
            debug_world: PhysicsWorld::new_debug(&format!("{}_debug", name)).shared(),
            assets,
            registry: ObjectRegistry::new(),
            entities: RefCell::new(Vec::new()),
        })
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the file the scene was loaded from
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Scene behaviour switches
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Simulation world
    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    /// Debug visualization world
    pub fn debug_world(&self) -> &SharedWorld {
        &self.debug_world
    }

    /// Asset cache
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Live object registry
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Create an entity and add it to the scene
    pub fn create_entity(self: &Rc<Self>, name: &str) -> SharedEntity {
        let entity = Rc::new(RefCell::new(Entity::new(Some(name), &self.registry)));
        self.add_entity(Rc::clone(&entity));
        entity
    }

    /// Add an entity, attaching its bodies and joints to the scene worlds
    pub fn add_entity(self: &Rc<Self>, entity: SharedEntity) {
        entity.borrow_mut().set_scene(Some(self));
        self.entities.borrow_mut().push(entity);
    }

    /// Remove an entity by name, detaching it from the scene worlds
    pub fn remove_entity(&self, name: &str) -> Option<SharedEntity> {
        let mut entities = self.entities.borrow_mut();
        let index = entities
            .iter()
            .position(|e| e.try_borrow().is_ok_and(|e| e.name() == Some(name)))?;
        let entity = entities.remove(index);
        entity.borrow_mut().set_scene(None);
        Some(entity)
    }

    /// Find an entity by name
    pub fn entity_by_name(&self, name: &str) -> Option<SharedEntity> {
        self.entities
            .borrow()
            .iter()
            .find(|e| e.try_borrow().is_ok_and(|e| e.name() == Some(name)))
            .cloned()
    }

    /// Find an entity by registry id
    ///
    /// Entities that are currently mutably borrowed are skipped.
    pub fn entity_by_id(&self, id: ActorId) -> Option<SharedEntity> {
        self.entities
            .borrow()
            .iter()
            .find(|e| e.try_borrow().is_ok_and(|e| e.id() == id))
            .cloned()
    }

    /// Number of entities in the scene
    pub fn entity_count(&self) -> usize {
        self.entities.borrow().len()
    }

    /// Read one entity record and add the entity
    ///
    /// Rejected records are logged and skipped so the rest of the scene can
    /// still load.
    pub fn load_entity(self: &Rc<Self>, reader: &mut impl Read, name: &str) -> Option<SharedEntity> {
        match Entity::from_pak(reader, name, self) {
            Ok(entity) => {
                let entity = Rc::new(RefCell::new(entity));
                self.add_entity(Rc::clone(&entity));
                Some(entity)
            }
            Err(e) => {
                log::debug!("Skipping entity '{}' in scene '{}': {}", name, self.name, e);
                None
            }
        }
    }

    /// Advance every entity by one tick
    pub fn update(&self) {
        for entity in self.entities.borrow().iter() {
            entity.borrow_mut().update();
        }
    }

    /// Draw every visible entity through `camera`
    pub fn draw(&self, renderer: &mut dyn Renderer, camera: &Camera) -> FrameStats {
        let params = ShaderParams::from_camera(camera);
        let mut stats = FrameStats::default();

        for entity in self.entities.borrow().iter() {
            let mut entity = entity.borrow_mut();
            entity.pre_draw();

            let culled = if self.config.frustum_culling {
                entity.cull(camera)
            } else {
                !entity.is_visible() || entity.model().is_none()
            };

            if culled {
                stats.culled += 1;
            } else {
                entity.draw(renderer, &params);
                if self.config.debug_draw {
                    entity.draw_debug(renderer, &params);
                }
                stats.drawn += 1;
            }

            entity.clear_changed();
        }

        log::trace!("Scene '{}': drew {}, culled {}", self.name, stats.drawn, stats.culled);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::foundation::memory::ObjectKind;
    use crate::physics::ShapeKind;
    use crate::render::CommandRecorder;
    use crate::test_support;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0)
    }

    #[test]
    fn test_create_find_remove() {
        let scene = Scene::new("level", SceneConfig::default());
        scene.create_entity("a");
        scene.create_entity("b");
        assert_eq!(scene.entity_count(), 2);
        assert!(scene.entity_by_name("b").is_some());

        let removed = scene.remove_entity("a").unwrap();
        assert!(removed.borrow().scene().is_none());
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.remove_entity("a").is_none());
    }

    #[test]
    fn test_added_entity_bodies_join_scene_worlds() {
        let scene = Scene::new("level", SceneConfig::default());
        let entity = scene.create_entity("crate");
        entity.borrow_mut().set_model(Some(Rc::new(test_support::cube_model())));
        entity.borrow_mut().set_physics(ShapeKind::Box, 1.0);

        assert_eq!(scene.world().borrow().body_count(), 1);
        assert_eq!(scene.debug_world().borrow().body_count(), 1);

        drop(scene.remove_entity("crate"));
        drop(entity);
        assert_eq!(scene.world().borrow().body_count(), 0);
        assert_eq!(scene.debug_world().borrow().body_count(), 0);
        assert_eq!(scene.registry().live_count_of(ObjectKind::Entity), 0);
    }

    #[test]
    fn test_draw_counts_drawn_and_culled() {
        let scene = Scene::new("level", SceneConfig::default());
        let model = Rc::new(test_support::cube_model());

        let visible = scene.create_entity("visible");
        visible.borrow_mut().set_model(Some(Rc::clone(&model)));

        let behind = scene.create_entity("behind");
        behind.borrow_mut().set_model(Some(model));
        behind.borrow_mut().set_position(Vec3::new(0.0, 0.0, 50.0));

        scene.create_entity("empty");

        let mut recorder = CommandRecorder::new();
        let stats = scene.draw(&mut recorder, &camera());
        assert_eq!(stats, FrameStats { drawn: 1, culled: 2 });
        assert!(!visible.borrow().changed());
    }

    #[test]
    fn test_debug_draw_follows_config() {
        let config = SceneConfig {
            debug_draw: true,
            frustum_culling: false,
        };
        let scene = Scene::new("level", config);
        let entity = scene.create_entity("crate");
        entity.borrow_mut().set_model(Some(Rc::new(test_support::cube_model())));

        let mut recorder = CommandRecorder::new();
        scene.draw(&mut recorder, &camera());
        assert!(recorder
            .commands()
            .iter()
            .any(|c| matches!(c, crate::render::RenderCommand::Lines(points) if points.len() == 24)));
    }
}
