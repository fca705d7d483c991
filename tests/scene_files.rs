use glam::{Vec2, Vec3};
use kestrel_scene::assets::{AssetKind, AssetLoader, AssetManager};
use kestrel_scene::config::ProjectConfig;
use kestrel_scene::ecs::components::{AssetRef, CsgBrush, CsgFace, CsgModel, MeshRenderer};
use kestrel_scene::ecs::{EcsWorld, EntityState, StaticFlags, Transform};
use kestrel_scene::geometry::{csg_geometry_dir, csg_geometry_path, static_geometry_path, DerivedGeometry};
use kestrel_scene::scene::{load_scene, open_scene, save_scene};
use kestrel_scene::schema::assets::{SubMeshData, VertexData};
use kestrel_scene::schema::{MaterialData, MeshData, SceneData, Vec3Data};
use kestrel_scene::serialization;
use std::fs;
use std::path::Path;

const SCENE: &str = "Scenes/Level.scene";

fn write_tile_mesh(assets: &Path, height: f32) {
    let vertex = |x: f32, z: f32| VertexData { position: Vec3Data::new(x, height, z), ..Default::default() };
    let mut mesh = MeshData {
        sub_meshes: vec![SubMeshData {
            vertex_buffer: vec![vertex(0.0, 0.0), vertex(0.0, 1.0), vertex(1.0, 0.0)],
            index_buffer: vec![0, 1, 2],
            ..Default::default()
        }],
        ..Default::default()
    };
    serialization::save_to_path(assets.join("Models/tile.mesh"), &mut mesh, MeshData::FORMAT).expect("write mesh");
}

fn write_assets(assets: &Path) {
    write_tile_mesh(assets, 0.0);
    let mut material = MaterialData { shader_name: "Standard".into(), ..Default::default() };
    serialization::save_to_path(assets.join("Materials/stone.material"), &mut material, MaterialData::FORMAT)
        .expect("write material");
}

fn build_level(ecs: &mut EcsWorld, assets: &mut AssetManager) {
    for x in 0..3 {
        let tile = ecs.spawn_entity("Tile", None);
        ecs.set_transform(tile, Transform { position: Vec3::new(x as f32, 0.0, 0.0), ..Default::default() });
        ecs.set_state(tile, EntityState { static_flags: StaticFlags::BATCHING, ..Default::default() });
        ecs.add_component(
            tile,
            MeshRenderer {
                mesh: AssetRef::load(assets, AssetKind::Mesh, "Models/tile.mesh"),
                materials: vec![AssetRef::load(assets, AssetKind::Material, "Materials/stone.material")],
                ..Default::default()
            },
        );
    }

    let model = ecs.spawn_entity("Walls", None);
    ecs.add_component(model, CsgModel);
    let brush = ecs.spawn_entity("Wall", None);
    ecs.set_parent(brush, Some(model));
    ecs.add_component(
        brush,
        CsgBrush {
            vertices: vec![Vec3::ZERO, Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::X],
            faces: vec![CsgFace {
                indices: vec![0, 1, 2, 3],
                tex_coords: vec![Vec2::ZERO, Vec2::Y, Vec2::ONE, Vec2::X],
                tex_coords_scale: Vec2::ONE,
                tex_coords_offset: Vec2::ZERO,
                tex_coords_rotation: 0.0,
                material: AssetRef::load(assets, AssetKind::Material, "Materials/stone.material"),
                smooth_normals: false,
            }],
            ..Default::default()
        },
    );
}

fn saved_project() -> (tempfile::TempDir, ProjectConfig, String) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ProjectConfig::for_root(dir.path());
    write_assets(&config.paths.assets);

    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();
    build_level(&mut ecs, &mut assets);
    save_scene(&mut ecs, &config, SCENE).expect("save scene");
    let model_guid = ecs.find_by_name("Walls").and_then(|model| ecs.guid(model)).expect("model guid").to_string();
    (dir, config, model_guid)
}

#[test]
fn save_writes_scene_and_geometry_caches() {
    let (_dir, config, model_guid) = saved_project();
    assert!(config.paths.assets.join(SCENE).is_file());
    assert!(static_geometry_path(&config.paths.library, SCENE).is_file());
    assert!(csg_geometry_path(&config.paths.library, SCENE, &model_guid).is_file());
}

#[test]
fn load_uses_fresh_caches() {
    let (_dir, config, model_guid) = saved_project();
    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();
    let report = load_scene(&mut ecs, &mut assets, &config, SCENE, None).expect("load scene");

    assert!(report.static_from_cache);
    assert_eq!(report.csg_from_cache, 1);
    assert_eq!(report.csg_rebuilt, 0);
    assert_eq!(ecs.entity_count(), 5);

    let derived = ecs.world.resource::<DerivedGeometry>();
    assert_eq!(derived.batches.len(), 1);
    assert_eq!(derived.batches[0].vertices.len(), 9);
    let csg = derived.csg_models.get(&model_guid).expect("csg mesh");
    assert_eq!(csg.sub_meshes[0].indices.len(), 6);
}

#[test]
fn corrupt_cache_is_rebuilt_and_written_back() {
    let (_dir, config, _) = saved_project();
    let cache = static_geometry_path(&config.paths.library, SCENE);
    fs::write(&cache, b"not a mesh").expect("corrupt cache");

    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();
    let report = load_scene(&mut ecs, &mut assets, &config, SCENE, None).expect("load scene");
    assert!(!report.static_from_cache);
    assert_eq!(ecs.world.resource::<DerivedGeometry>().batches.len(), 1);

    let mut again = EcsWorld::new();
    let report = load_scene(&mut again, &mut assets, &config, SCENE, None).expect("reload scene");
    assert!(report.static_from_cache);
}

#[test]
fn moved_geometry_makes_cache_stale() {
    let (_dir, config, _) = saved_project();
    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();
    load_scene(&mut ecs, &mut assets, &config, SCENE, None).expect("load scene");

    let tile = ecs.find_by_name("Tile").expect("tile");
    ecs.set_transform(tile, Transform { position: Vec3::new(0.0, 5.0, 0.0), ..Default::default() });
    let mut scene = kestrel_scene::scene::capture_scene(&ecs);
    serialization::save_to_path(config.paths.assets.join(SCENE), &mut scene, SceneData::FORMAT).expect("rewrite scene only");

    let mut reloaded = EcsWorld::new();
    let report = load_scene(&mut reloaded, &mut assets, &config, SCENE, None).expect("reload");
    assert!(!report.static_from_cache);
    assert_eq!(report.csg_from_cache, 1);
}

#[test]
fn edited_mesh_content_makes_cache_stale() {
    let (_dir, config, _) = saved_project();
    write_tile_mesh(&config.paths.assets, 7.0);

    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();
    let report = load_scene(&mut ecs, &mut assets, &config, SCENE, None).expect("load scene");
    assert!(!report.static_from_cache);
    assert_eq!(report.csg_from_cache, 1);
    let derived = ecs.world.resource::<DerivedGeometry>();
    assert!(derived.batches[0].vertices.iter().all(|vertex| vertex.position.y == 7.0));
}

#[test]
fn saving_without_static_geometry_removes_the_cache() {
    let (_dir, config, _) = saved_project();
    let cache = static_geometry_path(&config.paths.library, SCENE);
    assert!(cache.is_file());
    fs::create_dir_all(csg_geometry_dir(&config.paths.library, SCENE).join("stale")).expect("stale dir");

    let mut empty = EcsWorld::new();
    save_scene(&mut empty, &config, SCENE).expect("save empty scene");
    assert!(!cache.exists());
    assert!(!csg_geometry_dir(&config.paths.library, SCENE).exists());
}

#[test]
fn open_scene_reports_failures() {
    let (_dir, config, _) = saved_project();
    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();

    assert!(open_scene(&mut ecs, &mut assets, &config, SCENE, None));
    assert!(!open_scene(&mut ecs, &mut assets, &config, "Scenes/Missing.scene", None));

    let broken = "Scenes/Broken.scene";
    fs::write(config.paths.assets.join(broken), b"garbage").expect("write broken scene");
    assert!(!open_scene(&mut ecs, &mut assets, &config, broken, None));
    assert_eq!(ecs.entity_count(), 0);
    assert!(assets.load(AssetKind::Mesh, "Models/tile.mesh").is_some());
}

#[test]
fn failed_open_drops_previous_derived_geometry() {
    let (_dir, config, _) = saved_project();
    let mut assets = AssetManager::new(&config.paths);
    let mut ecs = EcsWorld::new();

    assert!(open_scene(&mut ecs, &mut assets, &config, SCENE, None));
    assert_eq!(ecs.world.resource::<DerivedGeometry>().batches.len(), 1);

    assert!(!open_scene(&mut ecs, &mut assets, &config, "Scenes/Missing.scene", None));
    let derived = ecs.world.resource::<DerivedGeometry>();
    assert_eq!(ecs.entity_count(), 0);
    assert!(derived.batches.is_empty());
    assert!(derived.csg_models.is_empty());
}
