//! Shared fixtures for unit tests

use std::rc::Rc;

use crate::assets::{Armature, Bone, BonePose, Material, MeshData, Model, ModelArea, Texture, TextureRole, VertexWeights};
use crate::foundation::math::{Vec2, Vec3};

/// Indexed cube spanning `min..max`, one area, fully weighted to bone 0
pub fn box_model(name: &str, min: Vec3, max: Vec3) -> Model {
    let corners: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        })
        .collect();
    let center = (min + max) * 0.5;
    let normals = corners
        .iter()
        .map(|c| (c - center).try_normalize(1.0e-6).unwrap_or_else(Vec3::z))
        .collect();
    let tex_coords = (0..8)
        .map(|i| Vec2::new((i & 1) as f32, ((i >> 1) & 1) as f32))
        .collect();
    let indices = vec![
        0, 2, 1, 1, 2, 3, // -z
        4, 5, 6, 5, 7, 6, // +z
        0, 1, 4, 1, 5, 4, // -y
        2, 6, 3, 3, 6, 7, // +y
        0, 4, 2, 2, 4, 6, // -x
        1, 3, 5, 3, 7, 5, // +x
    ];
    let weights = vec![
        VertexWeights {
            bones: [0, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        };
        8
    ];

    Model::from_mesh_data(
        name,
        MeshData {
            vertices: corners,
            normals,
            tex_coords,
            indices,
            weights,
            ..Default::default()
        },
    )
    .unwrap()
}

/// Unit cube centered on the origin (half extent 1)
pub fn cube_model() -> Model {
    box_model("cube", Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0))
}

/// Cube with the same geometry split into three material areas
pub fn three_area_model() -> Model {
    let cube = cube_model();
    Model::from_mesh_data(
        "three_areas",
        MeshData {
            vertices: cube.vertices().to_vec(),
            normals: cube.normals().to_vec(),
            indices: cube.indices().to_vec(),
            areas: vec![
                ModelArea { first_index: 0, index_count: 12 },
                ModelArea { first_index: 12, index_count: 12 },
                ModelArea { first_index: 24, index_count: 12 },
            ],
            ..Default::default()
        },
    )
    .unwrap()
}

/// Triangle soup without indices
pub fn soup_model() -> Model {
    Model::from_mesh_data(
        "soup",
        MeshData {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            ..Default::default()
        },
    )
    .unwrap()
}

/// Single bone that slides from the origin to `z = 4` over five keyframes
pub fn sliding_armature() -> Armature {
    let frames = (0..5).map(|i| BonePose::at(Vec3::new(0.0, 0.0, i as f32))).collect();
    Armature::new(
        "slide",
        vec![Bone {
            name: "root".to_string(),
            parent: None,
            bind_position: Vec3::zeros(),
            frames,
        }],
    )
    .unwrap()
}

/// Material with a normal map bound
pub fn normal_mapped_material(name: &str) -> Rc<Material> {
    let texture = Rc::new(Texture::new("normals", 16, 16));
    Rc::new(Material::new(name).with_texture(texture, TextureRole::Normal))
}
