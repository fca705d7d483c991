use super::data::ColorData;
use super::game_object::GameObjectData;
use super::navigation::NavMeshSettingsData;
use crate::archive;
use std::collections::HashSet;

archive! {
    /// A whole scene or prefab: environment settings plus a flat entity list.
    pub struct SceneData: 2 {
        archive ambient_color: ColorData = ColorData::new(0.7, 0.7, 0.7, 1.0),
        archive nav_mesh_settings: NavMeshSettingsData = NavMeshSettingsData::default(),
        data skybox_material: String = String::new(),
        data lightmap_size: i32 = 256,
        data sky_model: i32 = 0,
        archives game_objects: Vec<GameObjectData> = Vec::new(),
        @since(1) data gi_enabled: bool = true,
        @since(1) data gi_intensity: f32 = 1.0,
        @since(2) data fog_enabled: bool = false,
        @since(2) data fog_include_skybox: bool = false,
        @since(2) data fog_start_distance: f32 = 10.0,
        @since(2) data fog_end_distance: f32 = 100.0,
        @since(2) data fog_density: f32 = 0.25,
        @since(2) archive fog_color: ColorData = ColorData::default(),
        @since(2) data fog_type: i32 = 0,
    }
}

impl SceneData {
    pub const FORMAT: &'static str = "Scene";
    pub const PREFAB_FORMAT: &'static str = "Prefab";

    pub fn find(&self, guid: &str) -> Option<&GameObjectData> {
        self.game_objects.iter().find(|object| object.guid == guid)
    }

    /// Copies the entity `guid` and all its descendants, preserving order.
    pub fn subtree(&self, guid: &str) -> Option<Vec<GameObjectData>> {
        self.find(guid)?;
        let mut included: HashSet<&str> = HashSet::from([guid]);
        let mut changed = true;
        while changed {
            changed = false;
            for object in &self.game_objects {
                if object.has_parent()
                    && included.contains(object.parent_guid.as_str())
                    && included.insert(object.guid.as_str())
                {
                    changed = true;
                }
            }
        }
        let mut objects: Vec<GameObjectData> = self
            .game_objects
            .iter()
            .filter(|object| included.contains(object.guid.as_str()))
            .cloned()
            .collect();
        if let Some(root) = objects.iter_mut().find(|object| object.guid == guid) {
            root.parent_guid.clear();
        }
        Some(objects)
    }
}
