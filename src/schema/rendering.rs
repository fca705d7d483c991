use super::assets::MaterialData;
use super::component::{ComponentHeader, NO_OBJECT};
use super::data::{ColorData, Vec3Data};
use crate::archive;

archive! {
    pub struct MeshRendererData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data mesh: String = String::new(),
        data mesh_source_file: String = String::new(),
        /// GUID of the skeleton root for skinned meshes.
        data root_object_guid: String = NO_OBJECT.to_string(),
        list materials: Vec<String> = Vec::new(),
        data cast_shadows: bool = true,
        data lightmap_size: i32 = 0,
        data lod_max_distance: f32 = 1000.0,
        data cull_over_max_distance: bool = false,
    }
}

archive! {
    pub struct DecalRendererData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data material: String = String::new(),
    }
}

archive! {
    pub struct LightData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        archive color: ColorData = ColorData::default(),
        data intensity: f32 = 1.0,
        data light_type: i32 = 0,
        data render_mode: i32 = 0,
        data radius: f32 = 10.0,
        data inner_radius: f32 = 30.0,
        data outer_radius: f32 = 60.0,
        data bias: f32 = 0.0005,
        data cast_shadows: bool = true,
    }
}

archive! {
    pub struct CameraData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data fov_y: f32 = 75.0,
        data z_near: f32 = 0.1,
        data z_far: f32 = 1000.0,
        data viewport_left: f32 = 0.0,
        data viewport_top: f32 = 0.0,
        data viewport_width: f32 = 1.0,
        data viewport_height: f32 = 1.0,
        data depth: i32 = 0,
        archive clear_color: ColorData = ColorData::default(),
        data clear_flags: i32 = 0,
        data projection_type: i32 = 0,
        data orthographic_size: f32 = 5.0,
        data occlusion_culling: bool = false,
        /// One entry per layer, non-zero when the layer is rendered.
        bulk culling_mask: Vec<i32> = Vec::new(),
    }
}

archive! {
    pub struct AnimationClipInfoData: 0 {
        data clip_path: String = String::new(),
        data name: String = String::new(),
        data speed: f32 = 1.0,
        data start_frame: i32 = 0,
        data end_frame: i32 = 1000,
        data looped: bool = false,
    }
}

archive! {
    pub struct AnimationData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        archives clips: Vec<AnimationClipInfoData> = Vec::new(),
    }
}

archive! {
    pub struct WaterData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data size: f32 = 10.0,
        data reflections: bool = true,
        data reflect_skybox: bool = true,
        data reflect_objects: bool = true,
        data reflections_distance: f32 = 100.0,
        data reflections_quality: i32 = 1,
        /// Stored inline rather than by name.
        archive material: MaterialData = MaterialData::default(),
    }
}

archive! {
    pub struct SplineData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        archives points: Vec<Vec3Data> = Vec::new(),
        data closed: bool = false,
    }
}
