//! Entity demo
//!
//! Builds a small scene in memory: a crate loaded from a packed entity
//! record, a swinging skinned pendulum and a static floor. Runs a number of
//! ticks through a recording renderer and logs what was drawn and culled.
//!
//! Usage: `entity_demo [config.toml|config.ron]`

use std::io::Cursor;
use std::rc::Rc;

use entity_engine::assets::{AssetError, Bone, BonePose, MeshData, ModelArea, Texture, TextureRole, VertexWeights};
use entity_engine::foundation::logging;
use entity_engine::foundation::math::{euler, Vec2, Vec4};
use entity_engine::prelude::*;
use entity_engine::scene::ActorHeader;

const FRAME_COUNT: usize = 120;
const DEFAULT_CONFIG: &str = "entity_demo.toml";

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("failed to write entity record: {0}")]
    Record(#[from] std::io::Error),

    #[error("entity '{0}' was not loaded")]
    NotLoaded(String),
}

fn box_mesh(min: Vec3, max: Vec3, areas: usize) -> MeshData {
    let vertices: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { min.x } else { max.x },
                if i & 2 == 0 { min.y } else { max.y },
                if i & 4 == 0 { min.z } else { max.z },
            )
        })
        .collect();
    let center = (min + max) * 0.5;
    let normals = vertices
        .iter()
        .map(|v| (v - center).try_normalize(1.0e-6).unwrap_or_else(Vec3::y))
        .collect();
    let tex_coords = (0..8)
        .map(|i| Vec2::new((i & 1) as f32, ((i >> 1) & 1) as f32))
        .collect();
    let indices: Vec<u32> = vec![
        0, 2, 1, 1, 2, 3, 4, 5, 6, 5, 7, 6, 0, 1, 4, 1, 5, 4,
        2, 6, 3, 3, 6, 7, 0, 4, 2, 2, 4, 6, 1, 3, 5, 3, 7, 5,
    ];

    let per_area = indices.len() / areas.max(1);
    let areas = (0..areas)
        .map(|a| ModelArea {
            first_index: a * per_area,
            index_count: per_area,
        })
        .collect();

    // lower half follows the root bone, upper half the tip
    let weights = vertices
        .iter()
        .map(|v| VertexWeights {
            bones: [if v.y > center.y { 1 } else { 0 }, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        })
        .collect();

    MeshData {
        vertices,
        normals,
        tex_coords,
        indices,
        areas,
        weights,
    }
}

fn pendulum_armature() -> Result<Armature, AssetError> {
    let swing = |frame: usize| {
        let angle = (frame as f32 / 10.0 * std::f32::consts::TAU).sin() * 30.0;
        BonePose {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: euler::to_quat(Vec3::new(0.0, 0.0, angle)),
        }
    };

    Armature::new(
        "pendulum",
        vec![
            Bone {
                name: "root".to_string(),
                parent: None,
                bind_position: Vec3::zeros(),
                frames: vec![BonePose::at(Vec3::zeros()); 11],
            },
            Bone {
                name: "tip".to_string(),
                parent: Some(0),
                bind_position: Vec3::new(0.0, 1.0, 0.0),
                frames: (0..11).map(swing).collect(),
            },
        ],
    )
}

fn build_assets() -> Result<AssetCache, AssetError> {
    let assets = AssetCache::new();

    assets.insert_model(Rc::new(Model::from_mesh_data(
        "crate",
        box_mesh(Vec3::repeat(-0.5), Vec3::repeat(0.5), 2),
    )?));
    assets.insert_model(Rc::new(Model::from_mesh_data(
        "pendulum",
        box_mesh(Vec3::new(-0.1, 0.0, -0.1), Vec3::new(0.1, 2.0, 0.1), 1),
    )?));
    assets.insert_model(Rc::new(Model::from_mesh_data(
        "floor",
        box_mesh(Vec3::new(-10.0, -0.1, -10.0), Vec3::new(10.0, 0.0, 10.0), 1),
    )?));
    assets.insert_armature(Rc::new(pendulum_armature()?));

    let bricks = Rc::new(Texture::new("bricks_normal", 256, 256));
    assets.insert_material(Rc::new(
        Material::new("wood").with_diffuse(Vec4::new(0.6, 0.4, 0.2, 1.0)),
    ));
    assets.insert_material(Rc::new(
        Material::new("bricks")
            .with_diffuse(Vec4::new(0.7, 0.3, 0.3, 1.0))
            .with_texture(bricks, TextureRole::Normal),
    ));
    assets.insert_material(Rc::new(Material::new("glow").with_lighting(false)));

    Ok(assets)
}

fn crate_record() -> EntityRecord {
    EntityRecord {
        header: ActorHeader::new(
            Some("crate"),
            Vec3::new(0.0, 3.0, 0.0),
            euler::to_quat(Vec3::new(0.0, 30.0, 0.0)),
        ),
        model: "crate".to_string(),
        shape: Some(ShapeKind::Box),
        mass: 2.0,
        linear_damping: 0.05,
        angular_damping: 0.1,
        materials: vec!["wood".to_string(), "bricks".to_string()],
        ..EntityRecord::default()
    }
}

fn populate(scene: &Rc<Scene>) -> Result<(), DemoError> {
    let mut bytes = Vec::new();
    crate_record().write(&mut bytes)?;
    scene
        .load_entity(&mut Cursor::new(bytes), "crate")
        .ok_or_else(|| DemoError::NotLoaded("crate".to_string()))?;

    let floor = scene.create_entity("floor");
    {
        let mut floor = floor.borrow_mut();
        floor.set_model(scene.assets().get_or_load_model("floor"));
        floor.set_physics(ShapeKind::Mesh, 0.0);
    }

    let pendulum = scene.create_entity("pendulum");
    {
        let mut pendulum = pendulum.borrow_mut();
        pendulum.set_model(scene.assets().get_or_load_model("pendulum"));
        if let Some(glow) = scene.assets().get_or_load_material("glow") {
            pendulum.set_material(0, glow);
        }
        pendulum.set_armature(scene.assets().get_or_load_armature("pendulum"));
        pendulum.set_position(Vec3::new(3.0, 0.0, 0.0));
        pendulum.set_physics(ShapeKind::Sphere, 0.0);
        pendulum.loop_armature(0.0, 10.0, 0.25);
    }

    let crate_entity = scene
        .entity_by_name("crate")
        .ok_or_else(|| DemoError::NotLoaded("crate".to_string()))?;
    let joint = crate_entity.borrow_mut().create_joint(
        &mut pendulum.borrow_mut(),
        "tether",
        JointKind::BallSocket {
            pivot: Vec3::new(1.5, 2.0, 0.0),
        },
    );
    if joint.is_none() {
        log::warn!("Could not tether crate to pendulum");
    }

    Ok(())
}

fn run() -> Result<(), DemoError> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let config = EngineConfig::load_or_default(&config_path);
    logging::init_with_level(&config.logging.level);

    log::info!("Starting entity demo with {:?}", config.scene);

    let scene = Scene::with_assets("demo", "memory://demo", config.scene, build_assets()?);
    populate(&scene)?;

    let mut camera = Camera::perspective(Vec3::new(0.0, 4.0, 12.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
    let mut recorder = CommandRecorder::new();
    let mut totals = FrameStats::default();

    for frame in 0..FRAME_COUNT {
        // orbit so entities drift in and out of view
        let angle = frame as f32 / FRAME_COUNT as f32 * std::f32::consts::TAU;
        camera.set_position(Vec3::new(angle.sin() * 12.0, 4.0, angle.cos() * 12.0));

        recorder.clear();
        scene.update();
        let stats = scene.draw(&mut recorder, &camera);
        totals.drawn += stats.drawn;
        totals.culled += stats.culled;

        log::debug!(
            "Frame {}: drawn {}, culled {}, {} area draws",
            frame,
            stats.drawn,
            stats.culled,
            recorder.area_draw_count()
        );
    }

    if let Some(pendulum) = scene.entity_by_name("pendulum") {
        let pendulum = pendulum.borrow();
        log::info!(
            "Pendulum at frame {:.2}, unlit pass needed: {}",
            pendulum.armature_frame(),
            pendulum.is_non_lit()
        );
    }

    log::info!(
        "Finished {} frames: {} drawn, {} culled",
        FRAME_COUNT,
        totals.drawn,
        totals.culled
    );
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("Entity demo failed: {}", e);
        std::process::exit(1);
    }
}
