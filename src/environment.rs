//! Scene-wide lighting, fog and navigation settings.

use crate::assets::AssetHandle;
use crate::schema::navigation::NavMeshSettingsData;
use crate::schema::SceneData;
use bevy_ecs::prelude::Resource;
use glam::Vec4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkyModel {
    #[default]
    Box,
    Procedural,
}

impl SkyModel {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => SkyModel::Procedural,
            _ => SkyModel::Box,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            SkyModel::Box => 0,
            SkyModel::Procedural => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FogType {
    #[default]
    Linear,
    Exponential,
    ExponentialSquared,
}

impl FogType {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => FogType::Exponential,
            2 => FogType::ExponentialSquared,
            _ => FogType::Linear,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            FogType::Linear => 0,
            FogType::Exponential => 1,
            FogType::ExponentialSquared => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FogSettings {
    pub enabled: bool,
    pub include_skybox: bool,
    pub start_distance: f32,
    pub end_distance: f32,
    pub density: f32,
    pub color: Vec4,
    pub fog_type: FogType,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            include_skybox: false,
            start_distance: 10.0,
            end_distance: 100.0,
            density: 0.25,
            color: Vec4::ONE,
            fog_type: FogType::Linear,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavMeshSettings {
    pub walkable_slope_angle: f32,
    pub walkable_height: f32,
    pub walkable_climb: f32,
    pub walkable_radius: f32,
    pub max_edge_len: f32,
    pub max_simplification_error: f32,
    pub min_region_area: f32,
    pub merge_region_area: f32,
    pub cell_size: f32,
    pub cell_height: f32,
}

impl Default for NavMeshSettings {
    fn default() -> Self {
        Self::from(&NavMeshSettingsData::default())
    }
}

impl From<&NavMeshSettingsData> for NavMeshSettings {
    fn from(data: &NavMeshSettingsData) -> Self {
        Self {
            walkable_slope_angle: data.walkable_slope_angle,
            walkable_height: data.walkable_height,
            walkable_climb: data.walkable_climb,
            walkable_radius: data.walkable_radius,
            max_edge_len: data.max_edge_len,
            max_simplification_error: data.max_simplification_error,
            min_region_area: data.min_region_area,
            merge_region_area: data.merge_region_area,
            cell_size: data.cell_size,
            cell_height: data.cell_height,
        }
    }
}

impl From<&NavMeshSettings> for NavMeshSettingsData {
    fn from(settings: &NavMeshSettings) -> Self {
        Self {
            walkable_slope_angle: settings.walkable_slope_angle,
            walkable_height: settings.walkable_height,
            walkable_climb: settings.walkable_climb,
            walkable_radius: settings.walkable_radius,
            max_edge_len: settings.max_edge_len,
            max_simplification_error: settings.max_simplification_error,
            min_region_area: settings.min_region_area,
            merge_region_area: settings.merge_region_area,
            cell_size: settings.cell_size,
            cell_height: settings.cell_height,
            ..Default::default()
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct SceneEnvironment {
    pub ambient_color: Vec4,
    pub sky_model: SkyModel,
    pub skybox_material: Option<AssetHandle>,
    pub lightmap_size: i32,
    pub gi_enabled: bool,
    pub gi_intensity: f32,
    pub fog: FogSettings,
    pub navigation: NavMeshSettings,
}

impl Default for SceneEnvironment {
    fn default() -> Self {
        Self {
            ambient_color: Vec4::new(0.4, 0.4, 0.4, 1.0),
            sky_model: SkyModel::Box,
            skybox_material: None,
            lightmap_size: 256,
            gi_enabled: true,
            gi_intensity: 1.0,
            fog: FogSettings::default(),
            navigation: NavMeshSettings::default(),
        }
    }
}

impl SceneEnvironment {
    /// Copies environment fields into a scene record. Entities are untouched.
    pub fn write_to(&self, scene: &mut SceneData) {
        scene.ambient_color = self.ambient_color.into();
        scene.nav_mesh_settings = (&self.navigation).into();
        scene.skybox_material =
            self.skybox_material.as_ref().map(|material| material.name.clone()).unwrap_or_default();
        scene.lightmap_size = self.lightmap_size;
        scene.sky_model = self.sky_model.index();
        scene.gi_enabled = self.gi_enabled;
        scene.gi_intensity = self.gi_intensity;
        scene.fog_enabled = self.fog.enabled;
        scene.fog_include_skybox = self.fog.include_skybox;
        scene.fog_start_distance = self.fog.start_distance;
        scene.fog_end_distance = self.fog.end_distance;
        scene.fog_density = self.fog.density;
        scene.fog_color = self.fog.color.into();
        scene.fog_type = self.fog.fog_type.index();
    }

    /// Builds the environment stored in `scene`; the skybox is resolved by
    /// the caller.
    pub fn from_scene(scene: &SceneData, skybox_material: Option<AssetHandle>) -> Self {
        Self {
            ambient_color: (&scene.ambient_color).into(),
            sky_model: SkyModel::from_index(scene.sky_model),
            skybox_material,
            lightmap_size: scene.lightmap_size,
            gi_enabled: scene.gi_enabled,
            gi_intensity: scene.gi_intensity,
            fog: FogSettings {
                enabled: scene.fog_enabled,
                include_skybox: scene.fog_include_skybox,
                start_distance: scene.fog_start_distance,
                end_distance: scene.fog_end_distance,
                density: scene.fog_density,
                color: (&scene.fog_color).into(),
                fog_type: FogType::from_index(scene.fog_type),
            },
            navigation: NavMeshSettings::from(&scene.nav_mesh_settings),
        }
    }
}
