use super::component::ComponentHeader;
use super::data::Vec3Data;
use crate::archive;

archive! {
    pub struct NavMeshAgentData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data radius: f32 = 0.6,
        data height: f32 = 2.0,
        data speed: f32 = 3.5,
        data acceleration: f32 = 8.0,
        data rotation_speed: f32 = 10.0,
    }
}

archive! {
    pub struct NavMeshObstacleData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        archive size: Vec3Data = Vec3Data::new(1.0, 1.0, 1.0),
        archive offset: Vec3Data = Vec3Data::default(),
    }
}

archive! {
    /// Parameters for navigation mesh generation, stored per scene.
    pub struct NavMeshSettingsData: 0 {
        data walkable_slope_angle: f32 = 45.0,
        data walkable_height: f32 = 2.0,
        data walkable_climb: f32 = 0.9,
        data walkable_radius: f32 = 0.6,
        data max_edge_len: f32 = 12.0,
        data max_simplification_error: f32 = 1.3,
        data min_region_area: f32 = 8.0,
        data merge_region_area: f32 = 20.0,
        data cell_size: f32 = 0.3,
        data cell_height: f32 = 0.2,
    }
}
