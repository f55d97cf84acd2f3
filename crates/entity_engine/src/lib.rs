//! # Entity Engine
//!
//! Scene entities for a small 3D engine. An entity ties an actor in a scene
//! to a shared model, its materials, an optional skeletal armature and a pair
//! of physics bodies, and keeps all of them consistent as any one changes.
//!
//! ## Features
//!
//! - **Physics bodies**: box, sphere or triangle-mesh shapes fitted to the model
//! - **Armature playback**: frame players driving linear-blend skinning
//! - **Culling and drawing**: frustum tests and a renderer-agnostic draw seam
//! - **Binary records**: entity loading from packed scene files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use entity_engine::prelude::*;
//! use std::rc::Rc;
//!
//! let scene = Scene::new("level", SceneConfig::default());
//! let entity = scene.create_entity("crate");
//! # let model: Rc<Model> = unimplemented!();
//! entity.borrow_mut().set_model(Some(model));
//! entity.borrow_mut().set_physics(ShapeKind::Box, 1.0);
//!
//! let camera = Camera::perspective(Vec3::new(0.0, 2.0, 10.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
//! let mut recorder = CommandRecorder::new();
//! scene.update();
//! let stats = scene.draw(&mut recorder, &camera);
//! println!("drawn {}, culled {}", stats.drawn, stats.culled);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod config;
pub mod entity;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

#[cfg(test)]
mod test_support;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::FramePlayer,
        assets::{Armature, AssetCache, AssetSource, Material, Model},
        config::{Config, EngineConfig, SceneConfig},
        entity::{Entity, EntityLoadError, EntityRecord, SharedEntity},
        foundation::math::{Quat, Transform, Vec3},
        physics::{JointKind, ShapeKind},
        render::{Camera, CommandRecorder, Renderer, ShaderParams},
        scene::{FrameStats, Scene},
    };
}
