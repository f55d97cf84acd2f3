//! Surface materials
//!
//! A material carries colors and up to [`MAX_TEXTURES`] texture slots. Entities
//! hold materials through `Rc`, so one material can be shared by many entities.

use std::rc::Rc;

use crate::foundation::math::Vec4;

/// Maximum number of texture slots per material
pub const MAX_TEXTURES: usize = 4;

/// How a texture is used by the shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Base color
    Color,
    /// Tangent-space normal map
    Normal,
    /// Height map for parallax
    Height,
    /// Specular intensity
    Specular,
    /// Tiled detail color
    Detail,
    /// Pre-baked lighting
    LightMap,
}

/// Texture asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Asset name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture {
    /// Create a texture description
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// A bound texture and the role it plays
#[derive(Debug, Clone)]
pub struct TextureSlot {
    /// Shared texture
    pub texture: Rc<Texture>,
    /// Role in shading
    pub role: TextureRole,
}

/// Material resource
#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    diffuse: Vec4,
    ambient: Vec4,
    specular: Vec4,
    shininess: f32,
    lighting: bool,
    textures: Vec<TextureSlot>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("")
    }
}

impl Material {
    /// Create a white, lit material without textures
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            diffuse: Vec4::new(1.0, 1.0, 1.0, 1.0),
            ambient: Vec4::new(0.0, 0.0, 0.0, 1.0),
            specular: Vec4::new(0.25, 0.25, 0.25, 1.0),
            shininess: 32.0,
            lighting: true,
            textures: Vec::new(),
        }
    }

    /// Set the diffuse color
    pub fn with_diffuse(mut self, color: Vec4) -> Self {
        self.diffuse = color;
        self
    }

    /// Set the ambient color
    pub fn with_ambient(mut self, color: Vec4) -> Self {
        self.ambient = color;
        self
    }

    /// Set the specular color and exponent
    pub fn with_specular(mut self, color: Vec4, shininess: f32) -> Self {
        self.specular = color;
        self.shininess = shininess;
        self
    }

    /// Enable or disable lighting
    pub fn with_lighting(mut self, lighting: bool) -> Self {
        self.lighting = lighting;
        self
    }

    /// Bind a texture; slots beyond [`MAX_TEXTURES`] are ignored
    pub fn with_texture(mut self, texture: Rc<Texture>, role: TextureRole) -> Self {
        if self.textures.len() < MAX_TEXTURES {
            self.textures.push(TextureSlot { texture, role });
        } else {
            log::warn!(
                "Material '{}' already has {} textures, ignoring '{}'",
                self.name,
                MAX_TEXTURES,
                texture.name
            );
        }
        self
    }

    /// Material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diffuse color
    pub fn diffuse(&self) -> Vec4 {
        self.diffuse
    }

    /// Ambient color
    pub fn ambient(&self) -> Vec4 {
        self.ambient
    }

    /// Specular color
    pub fn specular(&self) -> Vec4 {
        self.specular
    }

    /// Specular exponent
    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    /// Whether lighting affects this material
    pub fn is_lit(&self) -> bool {
        self.lighting
    }

    /// Bound textures in slot order
    pub fn textures(&self) -> &[TextureSlot] {
        &self.textures
    }

    /// Whether any slot holds a normal map
    pub fn has_normal_map(&self) -> bool {
        self.textures.iter().any(|slot| slot.role == TextureRole::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_slots_are_capped() {
        let texture = Rc::new(Texture::new("brick", 64, 64));
        let mut material = Material::new("wall");
        for _ in 0..MAX_TEXTURES + 2 {
            material = material.with_texture(texture.clone(), TextureRole::Color);
        }
        assert_eq!(material.textures().len(), MAX_TEXTURES);
    }

    #[test]
    fn test_normal_map_detection() {
        let texture = Rc::new(Texture::new("brick_n", 64, 64));
        let plain = Material::new("plain");
        let bumpy = Material::new("bumpy").with_texture(texture, TextureRole::Normal);
        assert!(!plain.has_normal_map());
        assert!(bumpy.has_normal_map());
    }
}
