use kestrel_scene::schema::component::ComponentHeader;
use kestrel_scene::schema::csg::{CsgBrushData, CsgFaceData};
use kestrel_scene::schema::particles::{ColorModifierData, ParticleEmitterData, ParticleSystemData};
use kestrel_scene::schema::physics::{HingeJointData, RigidBodyData};
use kestrel_scene::schema::rendering::MeshRendererData;
use kestrel_scene::schema::scripting::{ScriptData, ScriptFieldData};
use kestrel_scene::schema::terrain::TerrainSplatTextureData;
use kestrel_scene::schema::{
    ColorData, GameObjectData, QuatData, SceneData, TerrainAssetData, Vec2Data, Vec3Data,
};
use kestrel_scene::serialization::{BinarySerializer, Endianness};

fn populated_scene() -> SceneData {
    let body = GameObjectData {
        name: "Door".into(),
        guid: "door-guid".into(),
        position: Vec3Data::new(1.0, 2.0, 3.0),
        rotation: QuatData::from(glam::Quat::from_rotation_y(1.25)),
        batching_static: true,
        layer: 4,
        rigid_bodies: vec![RigidBodyData {
            component: ComponentHeader::new(true, 0),
            mass: 12.5,
            freeze_rotation_y: true,
            ..Default::default()
        }],
        mesh_renderers: vec![MeshRendererData {
            component: ComponentHeader::new(false, 1),
            mesh: "Models/door.fbx/door".into(),
            materials: vec!["Materials/wood.material".into(), "Materials/metal.material".into()],
            lightmap_size: 512,
            ..Default::default()
        }],
        ..Default::default()
    };
    let frame = GameObjectData {
        name: "Frame".into(),
        guid: "frame-guid".into(),
        parent_guid: "door-guid".into(),
        hinge_joints: vec![HingeJointData {
            connected_object_guid: "door-guid".into(),
            limit_min: -90.0,
            limit_max: 90.0,
            ..Default::default()
        }],
        scripts: vec![ScriptData {
            component: ComponentHeader::new(true, 1),
            class_name: "DoorController".into(),
            fields: vec![ScriptFieldData {
                field_name: "target".into(),
                field_type: "GameObject".into(),
                object_value: "door-guid".into(),
                string_array_value: vec!["open".into(), "closed".into()],
                ..Default::default()
            }],
            ..Default::default()
        }],
        particle_systems: vec![ParticleSystemData {
            emitters: vec![ParticleEmitterData {
                material: "Materials/smoke.material".into(),
                color_modifiers: vec![ColorModifierData {
                    times: vec![0.0, 1.0],
                    colors: vec![ColorData::new(1.0, 1.0, 1.0, 1.0), ColorData::new(0.0, 0.0, 0.0, 0.0)],
                    ..Default::default()
                }],
                animation_grid_size: Vec2Data::new(4.0, 4.0),
                ..Default::default()
            }],
            ..Default::default()
        }],
        csg_brushes: vec![CsgBrushData {
            vertices: vec![Vec3Data::new(0.0, 0.0, 0.0), Vec3Data::new(1.0, 0.0, 0.0), Vec3Data::new(0.0, 0.0, 1.0)],
            faces: vec![CsgFaceData {
                indices: vec![0, 2, 1],
                material: "Materials/floor.material".into(),
                smooth_normals: false,
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    SceneData {
        skybox_material: "Materials/sky.material".into(),
        fog_enabled: true,
        fog_density: 0.5,
        game_objects: vec![body, frame],
        ..Default::default()
    }
}

#[test]
fn populated_scene_round_trips_in_both_byte_orders() {
    for order in [Endianness::Little, Endianness::Big] {
        let mut scene = populated_scene();
        let bytes = BinarySerializer::with_endianness(order).to_bytes(&mut scene, SceneData::FORMAT).expect("serialize");
        let loaded: SceneData = BinarySerializer::new().from_bytes(&bytes, SceneData::FORMAT).expect("deserialize");
        assert_eq!(loaded, scene, "{order:?}");
    }
}

#[test]
fn loaded_records_carry_stream_versions() {
    let mut scene = populated_scene();
    let bytes = BinarySerializer::new().to_bytes(&mut scene, SceneData::FORMAT).expect("serialize");
    let loaded: SceneData = BinarySerializer::new().from_bytes(&bytes, SceneData::FORMAT).expect("deserialize");
    assert_eq!(loaded.version, 2);
    assert_eq!(loaded.game_objects[0].version, 3);
    assert_eq!(loaded.game_objects[1].csg_brushes[0].faces[0].version, 1);
    assert_eq!(loaded.game_objects[1].particle_systems[0].emitters[0].version, 3);
}

#[test]
fn object_references_skip_empty_slots() {
    let scene = populated_scene();
    let frame = scene.find("frame-guid").expect("frame");
    assert_eq!(frame.object_references(), vec!["door-guid", "door-guid"]);
    assert!(scene.find("door-guid").expect("door").object_references().is_empty());
    assert_eq!(frame.component_count(), 4);
}

#[test]
fn subtree_copies_descendants_and_detaches_root() {
    let scene = populated_scene();
    let subtree = scene.subtree("door-guid").expect("subtree");
    assert_eq!(subtree.len(), 2);
    let frame = scene.subtree("frame-guid").expect("frame subtree");
    assert_eq!(frame.len(), 1);
    assert!(!frame[0].has_parent());
    assert!(scene.subtree("missing").is_none());
}

#[test]
fn terrain_asset_keeps_bulk_payloads() {
    let size = 4;
    let mut terrain = TerrainAssetData {
        size,
        height_map: (0..size * size).map(|i| i as f32 * 0.25).collect(),
        splat_textures: vec![TerrainSplatTextureData { pixels: vec![255, 0, 0, 0].repeat(16), ..Default::default() }],
        ..Default::default()
    };
    let bytes =
        BinarySerializer::with_endianness(Endianness::Big).to_bytes(&mut terrain, TerrainAssetData::FORMAT).expect("serialize");
    let loaded: TerrainAssetData =
        BinarySerializer::new().from_bytes(&bytes, TerrainAssetData::FORMAT).expect("deserialize");
    assert_eq!(loaded, terrain);
    assert_eq!(loaded.height_at(3, 1), Some(1.75));
    assert_eq!(loaded.height_at(4, 0), None);
}
