//! Scene and prefab files: save, load, and the graph relinking phases that
//! follow per-entity restore.

use crate::assets::{AssetKind, AssetLoader};
use crate::config::{DuplicateGuidPolicy, LoadConfig, ProjectConfig};
use crate::ecs::EcsWorld;
use crate::environment::SceneEnvironment;
use crate::geometry::{self, GeometryReport};
use crate::schema::SceneData;
use crate::serialization;
use anyhow::{bail, Context, Result};
use bevy_ecs::entity::Entity;
use glam::{Quat, Vec3};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Progress callback: fraction done and the name of the entity being loaded.
pub type Progress<'a> = &'a mut dyn FnMut(f32, &str);

/// Snapshot of the environment and every serializable entity, parents
/// before children.
pub fn capture_scene(ecs: &EcsWorld) -> SceneData {
    let mut scene = SceneData::default();
    ecs.environment().write_to(&mut scene);
    scene.game_objects = ecs.entities_in_order().into_iter().filter_map(|entity| ecs.save_object(entity)).collect();
    scene
}

/// Records for `root` and its subtree; the root is stored without a parent.
pub fn export_prefab(ecs: &EcsWorld, root: Entity) -> Option<SceneData> {
    let mut objects: Vec<_> = ecs.subtree(root).into_iter().filter_map(|entity| ecs.save_object(entity)).collect();
    let first = objects.first_mut()?;
    first.parent_guid.clear();
    Some(SceneData { game_objects: objects, ..Default::default() })
}

/// Fails on a repeated GUID under [`DuplicateGuidPolicy::Reject`]; otherwise
/// logs each repeat and lets the later entity win.
fn check_duplicate_guids(scene: &SceneData, policy: DuplicateGuidPolicy) -> Result<()> {
    let mut seen = HashSet::with_capacity(scene.game_objects.len());
    for object in &scene.game_objects {
        if seen.insert(object.guid.as_str()) {
            continue;
        }
        match policy {
            DuplicateGuidPolicy::Reject => bail!("Duplicate entity GUID '{}' ({})", object.guid, object.name),
            DuplicateGuidPolicy::LastWins => {
                log::warn!("Duplicate entity GUID '{}' ({}); the later entity wins", object.guid, object.name)
            }
        }
    }
    Ok(())
}

/// Creates the entities of `scene` with their saved GUIDs and runs the
/// parent, enabled and post-load phases. The environment is applied first.
pub fn restore_scene(
    ecs: &mut EcsWorld,
    scene: &SceneData,
    assets: &mut dyn AssetLoader,
    config: &LoadConfig,
    mut progress: Option<Progress<'_>>,
) -> Result<Vec<Entity>> {
    check_duplicate_guids(scene, config.duplicate_guids)?;

    let skybox = if scene.skybox_material.is_empty() {
        None
    } else {
        assets.load(AssetKind::Material, &scene.skybox_material)
    };
    ecs.world.insert_resource(SceneEnvironment::from_scene(scene, skybox));

    let total = scene.game_objects.len().max(1) as f32;
    let mut created = Vec::with_capacity(scene.game_objects.len());
    let mut by_guid: HashMap<&str, Entity> = HashMap::with_capacity(scene.game_objects.len());
    for (i, object) in scene.game_objects.iter().enumerate() {
        if let Some(progress) = progress.as_mut() {
            progress(i as f32 / total, &object.name);
        }
        let entity = ecs.spawn_entity(&object.name, Some(&object.guid));
        ecs.load_object(object, entity, assets);
        by_guid.insert(object.guid.as_str(), entity);
        created.push(entity);
    }

    link_parents(ecs, scene, &created, &by_guid);
    apply_enabled(ecs, scene, &created);
    for &entity in &created {
        ecs.run_hooks(entity, |component, ctx| component.on_scene_loaded(ctx));
    }
    ecs.update();
    if let Some(progress) = progress.as_mut() {
        progress(1.0, "");
    }
    Ok(created)
}

/// Parents resolve only against the entities created by this load. A
/// missing parent leaves the entity as a root.
fn link_parents(ecs: &mut EcsWorld, scene: &SceneData, created: &[Entity], by_guid: &HashMap<&str, Entity>) {
    for (object, &entity) in scene.game_objects.iter().zip(created) {
        if !object.has_parent() {
            continue;
        }
        match by_guid.get(object.parent_guid.as_str()) {
            Some(&parent) => {
                ecs.set_parent(entity, Some(parent));
            }
            None => log::debug!("Parent '{}' of '{}' not found; keeping it as a root", object.parent_guid, object.name),
        }
    }
}

fn apply_enabled(ecs: &mut EcsWorld, scene: &SceneData, created: &[Entity]) {
    for (object, &entity) in scene.game_objects.iter().zip(created) {
        ecs.set_enabled(entity, object.enabled);
    }
}

/// Instantiates a prefab under fresh GUIDs. References between entities of
/// the prefab are rebound to the new GUIDs. Returns the first root.
pub fn instantiate_prefab(
    ecs: &mut EcsWorld,
    prefab: &SceneData,
    assets: &mut dyn AssetLoader,
    config: &LoadConfig,
    position: Vec3,
    rotation: Quat,
) -> Result<Entity> {
    if prefab.game_objects.is_empty() {
        bail!("Prefab has no entities");
    }
    check_duplicate_guids(prefab, config.duplicate_guids)?;

    let mut created = Vec::with_capacity(prefab.game_objects.len());
    let mut by_guid: HashMap<&str, Entity> = HashMap::with_capacity(prefab.game_objects.len());
    let mut remap: HashMap<String, String> = HashMap::with_capacity(prefab.game_objects.len());
    for object in &prefab.game_objects {
        let entity = ecs.spawn_entity(&object.name, None);
        ecs.load_object(object, entity, assets);
        if let Some(guid) = ecs.guid(entity) {
            remap.insert(object.guid.clone(), guid.to_string());
        }
        by_guid.insert(object.guid.as_str(), entity);
        created.push(entity);
    }

    link_parents(ecs, prefab, &created, &by_guid);
    apply_enabled(ecs, prefab, &created);
    for &entity in &created {
        ecs.rebind_objects(entity, &remap);
    }

    let root = prefab
        .game_objects
        .iter()
        .zip(&created)
        .find(|(object, _)| !by_guid.contains_key(object.parent_guid.as_str()))
        .map(|(_, &entity)| entity)
        .unwrap_or(created[0]);
    let mut transform = ecs.transform(root).unwrap_or_default();
    transform.position = position;
    transform.rotation = rotation;
    ecs.set_transform(root, transform);

    for &entity in &created {
        ecs.run_hooks(entity, |component, ctx| component.on_scene_loaded(ctx));
    }
    ecs.update();
    Ok(root)
}

/// Writes the scene to `<assets>/<name>` and refreshes its geometry caches.
pub fn save_scene(ecs: &mut EcsWorld, config: &ProjectConfig, name: &str) -> Result<()> {
    let path = config.paths.assets.join(name);
    let mut scene = capture_scene(ecs);
    serialization::save_to_path(&path, &mut scene, SceneData::FORMAT)
        .with_context(|| format!("Saving scene '{name}'"))?;
    geometry::save_geometry(ecs, &config.paths.library, name)
        .with_context(|| format!("Saving derived geometry for '{name}'"))?;
    log::info!("Saved scene '{}' ({} entities)", name, scene.game_objects.len());
    Ok(())
}

/// Clears the world and loads `<assets>/<name>`, then restores or rebuilds
/// its derived geometry. Entities created before a failure are kept.
pub fn load_scene(
    ecs: &mut EcsWorld,
    assets: &mut dyn AssetLoader,
    config: &ProjectConfig,
    name: &str,
    progress: Option<Progress<'_>>,
) -> Result<GeometryReport> {
    ecs.clear();
    let path = config.paths.assets.join(name);
    if !path.is_file() {
        bail!("Scene file {} does not exist", path.display());
    }
    let scene: SceneData = serialization::load_from_path(&path, SceneData::FORMAT)?;
    let created = restore_scene(ecs, &scene, assets, &config.load, progress)?;
    let report =
        geometry::restore_geometry(ecs, &config.paths.library, name, config.load.use_geometry_cache);
    log::info!("Loaded scene '{}' ({} entities)", name, created.len());
    Ok(report)
}

/// [`load_scene`] for callers that only need to know whether anything was
/// loaded. Failures are logged with the scene name.
pub fn open_scene(
    ecs: &mut EcsWorld,
    assets: &mut dyn AssetLoader,
    config: &ProjectConfig,
    name: &str,
    progress: Option<Progress<'_>>,
) -> bool {
    match load_scene(ecs, assets, config, name, progress) {
        Ok(_) => true,
        Err(err) => {
            log::error!("[{name}] Error loading scene: {err:#}");
            false
        }
    }
}

pub fn save_prefab(ecs: &EcsWorld, root: Entity, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let Some(mut prefab) = export_prefab(ecs, root) else {
        bail!("Entity {root:?} has nothing to save as a prefab");
    };
    serialization::save_to_path(path, &mut prefab, SceneData::PREFAB_FORMAT)
}

pub fn load_prefab(path: impl AsRef<Path>) -> Result<SceneData> {
    serialization::load_from_path(path, SceneData::PREFAB_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GameObjectData;

    fn object(guid: &str, parent: &str) -> GameObjectData {
        GameObjectData {
            name: guid.to_uppercase(),
            guid: guid.into(),
            parent_guid: parent.into(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_guid_policy() {
        let scene = SceneData { game_objects: vec![object("a", ""), object("a", "")], ..Default::default() };
        assert!(check_duplicate_guids(&scene, DuplicateGuidPolicy::Reject).is_err());
        assert!(check_duplicate_guids(&scene, DuplicateGuidPolicy::LastWins).is_ok());
    }

    #[test]
    fn export_prefab_detaches_the_root() {
        let mut ecs = EcsWorld::new();
        let outer = ecs.spawn_entity("outer", None);
        let root = ecs.spawn_entity("root", None);
        let child = ecs.spawn_entity("child", None);
        ecs.set_parent(root, Some(outer));
        ecs.set_parent(child, Some(root));

        let prefab = export_prefab(&ecs, root).expect("prefab");
        assert_eq!(prefab.game_objects.len(), 2);
        assert!(!prefab.game_objects[0].has_parent());
        assert_eq!(prefab.game_objects[1].parent_guid, ecs.guid(root).unwrap_or_default());
    }

    #[test]
    fn progress_reaches_completion() {
        let mut ecs = EcsWorld::new();
        let scene = SceneData { game_objects: vec![object("a", ""), object("b", "a")], ..Default::default() };
        let mut seen = Vec::new();
        let mut record = |fraction: f32, name: &str| seen.push((fraction, name.to_string()));
        let progress: Progress<'_> = &mut record;
        restore_scene(&mut ecs, &scene, &mut crate::ecs::NoAssets, &LoadConfig::default(), Some(progress))
            .expect("restore");
        assert_eq!(seen.first().map(|(_, name)| name.as_str()), Some("A"));
        assert_eq!(seen.last().map(|(fraction, _)| *fraction), Some(1.0));
    }
}
