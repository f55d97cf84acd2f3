//! Entity records
//!
//! Layout (little-endian):
//!
//! ```text
//! i32          magic
//! actor header (name, parent name, position, rotation)
//! f32[3]       scale
//! char[64]     model name
//! char[64]     armature name
//! u8           physics shape (1 box, 2 sphere, 3 mesh, anything else none)
//! f32          mass
//! f32          linear damping
//! f32          angular damping
//! u32          material count
//! char[64]     material names
//! ```

use std::io::{self, Read, Write};
use std::rc::Rc;

use thiserror::Error;

use crate::assets::pak;
use crate::foundation::math::Vec3;
use crate::physics::ShapeKind;
use crate::scene::{ActorHeader, Scene};
use super::Entity;

/// Value every entity record starts with
pub const MAGIC: i32 = 179_532_112;

/// Errors while reading an entity record
#[derive(Error, Debug)]
pub enum EntityLoadError {
    /// The record does not start with [`MAGIC`]
    #[error("invalid entity \"{scene}//{name}\", wrong magic number {found}")]
    InvalidMagic {
        /// Path of the scene file
        scene: String,
        /// Requested entity name
        name: String,
        /// Value found instead
        found: i32,
    },

    /// The record ended early or could not be read
    #[error("failed to read entity record: {0}")]
    Io(#[from] io::Error),
}

/// Decoded entity record
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Actor header
    pub header: ActorHeader,
    /// Scale applied after the model
    pub scale: Vec3,
    /// Model name; empty for none
    pub model: String,
    /// Armature name; empty for none
    pub armature: String,
    /// Physics shape, if physics is enabled
    pub shape: Option<ShapeKind>,
    /// Body mass
    pub mass: f32,
    /// Linear damping
    pub linear_damping: f32,
    /// Angular damping
    pub angular_damping: f32,
    /// Material names in slot order
    pub materials: Vec<String>,
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self {
            header: ActorHeader::default(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            model: String::new(),
            armature: String::new(),
            shape: None,
            mass: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            materials: Vec::new(),
        }
    }
}

impl EntityRecord {
    /// Read a record; `scene` and `name` only label errors
    pub fn read(reader: &mut impl Read, scene: &str, name: &str) -> Result<Self, EntityLoadError> {
        let magic = pak::read_i32(reader)?;
        if magic != MAGIC {
            return Err(EntityLoadError::InvalidMagic {
                scene: scene.to_string(),
                name: name.to_string(),
                found: magic,
            });
        }

        let header = ActorHeader::read(reader)?;
        let scale = pak::read_vec3(reader)?;
        let model = pak::read_name(reader)?;
        let armature = pak::read_name(reader)?;
        let shape = ShapeKind::from_code(pak::read_u8(reader)?);
        let mass = pak::read_f32(reader)?;
        let linear_damping = pak::read_f32(reader)?;
        let angular_damping = pak::read_f32(reader)?;

        let material_count = pak::read_u32(reader)?;
        let materials = (0..material_count)
            .map(|_| pak::read_name(&mut *reader))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            header,
            scale,
            model,
            armature,
            shape,
            mass,
            linear_damping,
            angular_damping,
            materials,
        })
    }

    /// Write the record, magic included
    pub fn write(&self, writer: &mut impl Write) -> io::Result<()> {
        pak::write_i32(writer, MAGIC)?;
        self.header.write(writer)?;
        pak::write_vec3(writer, &self.scale)?;
        pak::write_name(writer, &self.model)?;
        pak::write_name(writer, &self.armature)?;
        pak::write_u8(writer, self.shape.map_or(0, ShapeKind::code))?;
        pak::write_f32(writer, self.mass)?;
        pak::write_f32(writer, self.linear_damping)?;
        pak::write_f32(writer, self.angular_damping)?;

        let count = u32::try_from(self.materials.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many materials"))?;
        pak::write_u32(writer, count)?;
        for material in &self.materials {
            pak::write_name(writer, material)?;
        }
        Ok(())
    }
}

impl Entity {
    /// Read an entity record and build the entity, resolving assets through `scene`
    ///
    /// The magic number is checked before anything is created. Assets that
    /// cannot be resolved are skipped. The entity is not added to the scene.
    pub fn from_pak(reader: &mut impl Read, name: &str, scene: &Rc<Scene>) -> Result<Self, EntityLoadError> {
        let record = EntityRecord::read(reader, scene.file_path(), name).map_err(|e| {
            log::error!("{}", e);
            e
        })?;

        let mut entity = Self::new(None, scene.registry());
        entity.actor.apply_header(&record.header);
        // bodies and the cull cache follow the header placement even without a model
        let placement = entity.actor.transform().clone();
        entity.set_position(placement.position);
        entity.set_orientation(placement.rotation);
        let assets = scene.assets();

        if !record.model.is_empty() {
            let model = assets.get_or_load_model(&record.model);
            if model.is_none() {
                log::debug!("Entity '{}': model '{}' not found", name, record.model);
            }
            entity.set_model(model);
        }

        if !record.armature.is_empty() {
            match assets.get_or_load_armature(&record.armature) {
                Some(armature) => entity.set_armature(Some(armature)),
                None => log::debug!("Entity '{}': armature '{}' not found", name, record.armature),
            }
        }

        // the model resets scale, so it goes after
        entity.set_scale(record.scale);

        if let Some(shape) = record.shape {
            entity.set_physics(shape, record.mass);
            entity.set_damping(record.linear_damping, record.angular_damping);
        }

        let mut slot = 0;
        for material_name in &record.materials {
            let Some(material) = assets.get_or_load_material(material_name) else {
                log::debug!("Entity '{}': material '{}' not found", name, material_name);
                continue;
            };
            if entity.material_count() > slot {
                entity.set_material(slot, material);
            } else {
                entity.add_material(material);
            }
            slot += 1;
        }

        entity.generate_tangent_vectors();

        log::debug!("Loaded entity '{}' from scene '{}'", name, scene.name());
        Ok(entity)
    }
}
