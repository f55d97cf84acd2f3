//! Skeletal armatures
//!
//! Bones form a hierarchy with parents listed before their children. Each bone
//! carries one pose per keyframe, relative to its parent. Deformation is plain
//! linear-blend skinning against the bind positions.

use crate::foundation::math::{Mat4, Quat, Vec3, Vec4};
use crate::render::{Renderer, ShaderParams};
use super::model::Model;
use super::AssetError;

/// Bone placement relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    /// Offset from the parent bone (or model origin for roots)
    pub position: Vec3,
    /// Rotation relative to the parent bone
    pub rotation: Quat,
}

impl BonePose {
    /// Pose with a position and no rotation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
        }
    }

    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            rotation: self
                .rotation
                .try_slerp(&other.rotation, t, 1.0e-6)
                .unwrap_or(if t < 0.5 { self.rotation } else { other.rotation }),
        }
    }
}

/// One bone of an armature
#[derive(Debug, Clone)]
pub struct Bone {
    /// Bone name
    pub name: String,
    /// Index of the parent bone
    pub parent: Option<usize>,
    /// Model-space position of the bone in the bind pose
    pub bind_position: Vec3,
    /// One pose per keyframe
    pub frames: Vec<BonePose>,
}

/// Model-space placement of every bone at some frame
#[derive(Debug, Clone)]
pub struct Pose {
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
}

impl Pose {
    /// Model-space position of bone `index`
    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// Model-space rotation of bone `index`
    pub fn rotation(&self, index: usize) -> Option<Quat> {
        self.rotations.get(index).copied()
    }
}

/// Shared armature asset
#[derive(Debug)]
pub struct Armature {
    name: String,
    bones: Vec<Bone>,
    frame_count: usize,
    bb_min: Vec3,
    bb_max: Vec3,
}

impl Armature {
    /// Build an armature, checking the hierarchy and keyframe counts
    pub fn new(name: &str, bones: Vec<Bone>) -> Result<Self, AssetError> {
        let invalid = |reason: String| AssetError::InvalidArmature {
            name: name.to_string(),
            reason,
        };

        if bones.is_empty() {
            return Err(invalid("no bones".to_string()));
        }
        let frame_count = bones[0].frames.len();
        for (index, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= index {
                    return Err(invalid(format!(
                        "bone '{}' lists parent {} that does not precede it",
                        bone.name, parent
                    )));
                }
            }
            if bone.frames.len() != frame_count {
                return Err(invalid(format!(
                    "bone '{}' has {} frames, expected {}",
                    bone.name,
                    bone.frames.len(),
                    frame_count
                )));
            }
        }

        let mut armature = Self {
            name: name.to_string(),
            bones,
            frame_count,
            bb_min: Vec3::zeros(),
            bb_max: Vec3::zeros(),
        };
        armature.calc_bounds();
        Ok(armature)
    }

    fn calc_bounds(&mut self) {
        let mut points: Vec<Vec3> = self.bones.iter().map(|b| b.bind_position).collect();
        for frame in 0..self.frame_count {
            points.extend(self.pose_at(frame as f32).positions);
        }

        let first = points[0];
        let (bb_min, bb_max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        self.bb_min = bb_min;
        self.bb_max = bb_max;
    }

    /// Asset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones in hierarchy order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Number of keyframes
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Minimum corner of the box around every bone in every frame
    pub fn bb_min(&self) -> Vec3 {
        self.bb_min
    }

    /// Maximum corner of the box around every bone in every frame
    pub fn bb_max(&self) -> Vec3 {
        self.bb_max
    }

    /// Model-space pose at a (possibly fractional) frame
    ///
    /// Frames are clamped to the keyframe range. An armature without keyframes
    /// stays in its bind pose.
    pub fn pose_at(&self, frame: f32) -> Pose {
        let mut positions = Vec::with_capacity(self.bones.len());
        let mut rotations: Vec<Quat> = Vec::with_capacity(self.bones.len());

        for bone in &self.bones {
            let local = self.local_pose(bone, frame);
            let (position, rotation) = match bone.parent {
                Some(parent) => {
                    let parent_rotation = rotations[parent];
                    (
                        positions[parent] + parent_rotation * local.position,
                        parent_rotation * local.rotation,
                    )
                }
                None => (local.position, local.rotation),
            };
            positions.push(position);
            rotations.push(rotation);
        }

        Pose { positions, rotations }
    }

    fn local_pose(&self, bone: &Bone, frame: f32) -> BonePose {
        if self.frame_count == 0 {
            let offset = bone
                .parent
                .map_or(bone.bind_position, |p| bone.bind_position - self.bones[p].bind_position);
            return BonePose::at(offset);
        }

        let last = (self.frame_count - 1) as f32;
        let frame = frame.clamp(0.0, last);
        let index = frame.floor() as usize;
        let next = (index + 1).min(self.frame_count - 1);
        bone.frames[index].interpolate(&bone.frames[next], frame - index as f32)
    }

    fn skinning_matrices(&self, frame: f32) -> Vec<Mat4> {
        let pose = self.pose_at(frame);
        self.bones
            .iter()
            .enumerate()
            .map(|(i, bone)| {
                Mat4::new_translation(&pose.positions[i])
                    * pose.rotations[i].to_homogeneous()
                    * Mat4::new_translation(&-bone.bind_position)
            })
            .collect()
    }

    /// Deform the model's vertices and normals to the pose at `frame`
    ///
    /// Returns `None` when the model has no skinning weights.
    pub fn deform(&self, model: &Model, frame: f32) -> Option<(Vec<Vec3>, Vec<Vec3>)> {
        if model.weights().len() != model.vertex_count() {
            log::debug!("Model '{}' has no skinning weights for '{}'", model.name(), self.name);
            return None;
        }

        let matrices = self.skinning_matrices(frame);
        let mut vertices = Vec::with_capacity(model.vertex_count());
        let mut normals = Vec::with_capacity(model.vertex_count());

        for ((vertex, normal), influence) in model
            .vertices()
            .iter()
            .zip(model.normals())
            .zip(model.weights())
        {
            let mut skinned = Vec3::zeros();
            let mut skinned_normal = Vec3::zeros();
            let mut total = 0.0;

            for (bone, weight) in influence.bones.iter().zip(influence.weights) {
                let Some(matrix) = matrices.get(usize::from(*bone)) else {
                    continue;
                };
                if weight <= 0.0 {
                    continue;
                }
                skinned += weight * matrix.transform_point(&(*vertex).into()).coords;
                skinned_normal += weight * matrix.transform_vector(normal);
                total += weight;
            }

            if total > 0.0 {
                vertices.push(skinned / total);
                normals.push(skinned_normal.try_normalize(1.0e-6).unwrap_or(*normal));
            } else {
                vertices.push(*vertex);
                normals.push(*normal);
            }
        }

        Some((vertices, normals))
    }

    /// Draw a line from every bone to its parent
    pub fn draw_debug(&self, renderer: &mut dyn Renderer, params: &ShaderParams, frame: f32) {
        let pose = self.pose_at(frame);
        let mut lines = Vec::with_capacity(self.bones.len() * 2);
        for (i, bone) in self.bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                lines.push(pose.positions[parent]);
                lines.push(pose.positions[i]);
            }
        }
        if lines.is_empty() {
            return;
        }

        let mut bone_params = params.clone();
        bone_params.color = Vec4::new(0.8, 0.6, 0.2, 1.0);
        renderer.set_shader_params(&bone_params);
        renderer.draw_lines(&lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::model::{MeshData, VertexWeights};
    use crate::render::commands::{CommandRecorder, RenderCommand};
    use approx::assert_relative_eq;

    fn two_bone_arm() -> Armature {
        let root = Bone {
            name: "root".to_string(),
            parent: None,
            bind_position: Vec3::zeros(),
            frames: vec![BonePose::at(Vec3::zeros()), BonePose::at(Vec3::new(0.0, 0.0, 2.0))],
        };
        let tip = Bone {
            name: "tip".to_string(),
            parent: Some(0),
            bind_position: Vec3::new(1.0, 0.0, 0.0),
            frames: vec![BonePose::at(Vec3::new(1.0, 0.0, 0.0)); 2],
        };
        Armature::new("arm", vec![root, tip]).unwrap()
    }

    #[test]
    fn test_rejects_parent_after_child() {
        let bone = Bone {
            name: "loop".to_string(),
            parent: Some(0),
            bind_position: Vec3::zeros(),
            frames: Vec::new(),
        };
        assert!(Armature::new("bad", vec![bone]).is_err());
    }

    #[test]
    fn test_bounds_cover_all_frames() {
        let armature = two_bone_arm();
        assert_relative_eq!(armature.bb_min(), Vec3::zeros());
        assert_relative_eq!(armature.bb_max(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_pose_interpolates_between_keyframes() {
        let armature = two_bone_arm();
        let pose = armature.pose_at(0.5);
        assert_relative_eq!(pose.position(1).unwrap(), Vec3::new(1.0, 0.0, 1.0));
        let clamped = armature.pose_at(10.0);
        assert_relative_eq!(clamped.position(0).unwrap(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_deform_moves_weighted_vertices() {
        let armature = two_bone_arm();
        let data = MeshData {
            vertices: vec![Vec3::new(1.0, 0.0, 0.0)],
            normals: vec![Vec3::x()],
            weights: vec![VertexWeights {
                bones: [1, 0, 0, 0],
                weights: [1.0, 0.0, 0.0, 0.0],
            }],
            ..Default::default()
        };
        let model = Model::from_mesh_data("point", data).unwrap();

        let (vertices, normals) = armature.deform(&model, 1.0).unwrap();
        assert_relative_eq!(vertices[0], Vec3::new(1.0, 0.0, 2.0), epsilon = 1e-5);
        assert_relative_eq!(normals[0], Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_debug_draw_emits_bone_lines() {
        let armature = two_bone_arm();
        let mut recorder = CommandRecorder::new();
        armature.draw_debug(&mut recorder, &ShaderParams::default(), 0.0);
        let lines: Vec<_> = recorder
            .commands()
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Lines(points) => Some(points.len()),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![2]);
    }
}
