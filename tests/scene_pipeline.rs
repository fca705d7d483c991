use glam::{Quat, Vec3};
use kestrel_scene::assets::{AssetKind, AssetManager};
use kestrel_scene::config::{DuplicateGuidPolicy, LoadConfig};
use kestrel_scene::ecs::components::{BoxCollider, HingeJoint, JointLink, MeshRenderer, RigidBody, Script, ScriptField};
use kestrel_scene::ecs::{ComponentType, EcsWorld, NoAssets, ObjectRef};
use kestrel_scene::scene::{capture_scene, export_prefab, instantiate_prefab, restore_scene};
use kestrel_scene::schema::physics::{BoxColliderData, HingeJointData, RigidBodyData};
use kestrel_scene::schema::rendering::MeshRendererData;
use kestrel_scene::schema::{GameObjectData, SceneData};
use kestrel_scene::serialization::BinarySerializer;

fn reload(scene: &SceneData) -> SceneData {
    let mut scene = scene.clone();
    let bytes = BinarySerializer::new().to_bytes(&mut scene, SceneData::FORMAT).expect("serialize scene");
    BinarySerializer::new().from_bytes(&bytes, SceneData::FORMAT).expect("deserialize scene")
}

fn load(scene: &SceneData) -> EcsWorld {
    let mut ecs = EcsWorld::new();
    restore_scene(&mut ecs, scene, &mut NoAssets, &LoadConfig::default(), None).expect("restore scene");
    ecs
}

/// `A` carries a body and a box; `B` is its child with a hinge pointing at `A`.
fn hinge_scene() -> SceneData {
    let a = GameObjectData {
        name: "A".into(),
        guid: "guid-a".into(),
        rigid_bodies: vec![RigidBodyData { mass: 3.0, ..Default::default() }],
        box_colliders: vec![BoxColliderData { ..Default::default() }],
        ..Default::default()
    };
    let b = GameObjectData {
        name: "B".into(),
        guid: "guid-b".into(),
        parent_guid: "guid-a".into(),
        hinge_joints: vec![HingeJointData { connected_object_guid: "guid-a".into(), ..Default::default() }],
        ..Default::default()
    };
    SceneData { game_objects: vec![a, b], ..Default::default() }
}

#[test]
fn hinge_target_and_parent_survive_save_and_load() {
    let ecs = load(&reload(&hinge_scene()));
    let a = ecs.find_by_guid("guid-a").expect("A");
    let b = ecs.find_by_guid("guid-b").expect("B");

    assert_eq!(ecs.parent(b), Some(a));
    let hinge = ecs.component::<HingeJoint>(b).expect("hinge");
    assert_eq!(hinge.link.connected_object.entity, Some(a));
    assert_eq!(ecs.component::<RigidBody>(a).map(|body| body.mass), Some(3.0));

    let again = load(&reload(&capture_scene(&ecs)));
    let a2 = again.find_by_guid("guid-a").expect("A reloaded");
    let b2 = again.find_by_guid("guid-b").expect("B reloaded");
    assert_eq!(again.parent(b2), Some(a2));
    assert_eq!(again.component::<HingeJoint>(b2).and_then(|hinge| hinge.link.connected_object.entity), Some(a2));
}

#[test]
fn component_order_round_trips() {
    let mut ecs = EcsWorld::new();
    let entity = ecs.spawn_entity("ordered", None);
    ecs.add_component(entity, Script { class_name: "Mover".into(), fields: Vec::new() });
    ecs.add_component(entity, RigidBody::default());
    ecs.add_component(entity, BoxCollider::default());
    ecs.add_component(entity, Script { class_name: "Logger".into(), fields: Vec::new() });

    let loaded = load(&reload(&capture_scene(&ecs)));
    let guid = ecs.guid(entity).expect("guid");
    let restored = loaded.find_by_guid(guid).expect("restored entity");
    let order: Vec<ComponentType> =
        loaded.components(restored).iter().map(|slot| slot.component.component_type()).collect();
    assert_eq!(
        order,
        vec![ComponentType::Script, ComponentType::RigidBody, ComponentType::BoxCollider, ComponentType::Script]
    );
}

#[test]
fn prefab_instances_rebind_to_their_own_entities() {
    let mut ecs = EcsWorld::new();
    let door = ecs.spawn_entity("Door", None);
    let frame = ecs.spawn_entity("Frame", None);
    ecs.set_parent(frame, Some(door));
    ecs.add_component(door, RigidBody::default());
    let door_guid = ecs.guid(door).expect("door guid").to_string();
    ecs.add_component(
        frame,
        HingeJoint {
            link: JointLink { connected_object: ObjectRef::to(&door_guid, door), ..JointLink::default() },
            ..HingeJoint::default()
        },
    );
    ecs.add_component(
        frame,
        Script {
            class_name: "DoorController".into(),
            fields: vec![ScriptField {
                name: "door".into(),
                field_type: "GameObject".into(),
                object: ObjectRef::to(&door_guid, door),
                ..ScriptField::default()
            }],
        },
    );
    let prefab = reload(&export_prefab(&ecs, door).expect("prefab"));

    let mut world = EcsWorld::new();
    let config = LoadConfig::default();
    let first = instantiate_prefab(&mut world, &prefab, &mut NoAssets, &config, Vec3::X, Quat::IDENTITY)
        .expect("first instance");
    let second = instantiate_prefab(&mut world, &prefab, &mut NoAssets, &config, Vec3::Y, Quat::IDENTITY)
        .expect("second instance");
    assert_ne!(world.guid(first), world.guid(second));
    assert_ne!(world.guid(first), Some(door_guid.as_str()));
    assert_eq!(world.entity_count(), 4);

    for root in [first, second] {
        let child = world.children(root)[0];
        let hinge = world.component::<HingeJoint>(child).expect("hinge");
        assert_eq!(hinge.link.connected_object.entity, Some(root));
        assert_eq!(Some(hinge.link.connected_object.guid.as_str()), world.guid(root));
        let script = world.component::<Script>(child).expect("script");
        assert_eq!(script.field("door").and_then(|field| field.object.entity), Some(root));
    }
    assert_eq!(world.transform(first).map(|t| t.position), Some(Vec3::X));
    assert_eq!(world.transform(second).map(|t| t.position), Some(Vec3::Y));
}

#[test]
fn missing_parent_leaves_a_root() {
    let orphan = GameObjectData {
        name: "Orphan".into(),
        guid: "orphan".into(),
        parent_guid: "nowhere".into(),
        ..Default::default()
    };
    let ecs = load(&SceneData { game_objects: vec![orphan], ..Default::default() });
    let entity = ecs.find_by_guid("orphan").expect("orphan");
    assert_eq!(ecs.parent(entity), None);
    assert_eq!(ecs.roots(), vec![entity]);
}

#[test]
fn enabled_flags_apply_after_parenting() {
    let parent = GameObjectData { name: "P".into(), guid: "p".into(), enabled: false, ..Default::default() };
    // Listed before its parent so parenting happens after the child exists.
    let child = GameObjectData { name: "C".into(), guid: "c".into(), parent_guid: "p".into(), ..Default::default() };
    let ecs = load(&SceneData { game_objects: vec![child, parent], ..Default::default() });
    let c = ecs.find_by_guid("c").expect("child");
    assert!(ecs.is_enabled(c));
    assert!(!ecs.is_active_in_hierarchy(c));
}

#[test]
fn duplicate_guids_reject_before_creating_entities() {
    let twin = GameObjectData { name: "Twin".into(), guid: "same".into(), ..Default::default() };
    let scene = SceneData { game_objects: vec![twin.clone(), twin], ..Default::default() };

    let mut ecs = EcsWorld::new();
    let err = restore_scene(&mut ecs, &scene, &mut NoAssets, &LoadConfig::default(), None)
        .expect_err("duplicates are rejected");
    assert!(err.to_string().contains("same"));
    assert_eq!(ecs.entity_count(), 0);

    let config = LoadConfig { duplicate_guids: DuplicateGuidPolicy::LastWins, ..LoadConfig::default() };
    let created = restore_scene(&mut ecs, &scene, &mut NoAssets, &config, None).expect("last wins");
    assert_eq!(ecs.find_by_guid("same"), Some(created[1]));
}

#[test]
fn missing_mesh_loads_as_empty_reference() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut assets = AssetManager::with_roots(vec![dir.path().to_path_buf()]);
    let object = GameObjectData {
        name: "Ghost".into(),
        guid: "ghost".into(),
        mesh_renderers: vec![MeshRendererData {
            mesh: "Models/ghost.mesh".into(),
            materials: vec!["Materials/ghost.material".into()],
            ..Default::default()
        }],
        ..Default::default()
    };
    let mut ecs = EcsWorld::new();
    restore_scene(
        &mut ecs,
        &SceneData { game_objects: vec![object], ..Default::default() },
        &mut assets,
        &LoadConfig::default(),
        None,
    )
    .expect("load tolerates missing assets");

    let entity = ecs.find_by_guid("ghost").expect("ghost");
    let renderer = ecs.component::<MeshRenderer>(entity).expect("renderer");
    assert!(!renderer.mesh.is_loaded());
    assert_eq!(renderer.mesh.name, "Models/ghost.mesh");
    assert!(renderer.materials[0].get().is_some_and(|material| material.placeholder));
    assert!(assets.is_missing(AssetKind::Mesh, "Models/ghost.mesh"));
}
