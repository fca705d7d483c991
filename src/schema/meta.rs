use crate::archive;

archive! {
    /// Import options stored beside a source model file.
    pub struct Model3DMetaData: 0 {
        data calculate_normals: bool = false,
        data max_smoothing_angle: f32 = 80.0,
        data scale: f32 = 1.0,
        data optimize_meshes: bool = false,
        data generate_lightmap_uvs: bool = false,
        data generate_lod: bool = false,
        data lod_levels: i32 = 2,
        data lod_error: f32 = 0.25,
        data lod_preserve_mesh_topology: bool = false,
    }
}

impl Model3DMetaData {
    pub const FORMAT: &'static str = "3D Model Meta";
    pub const EXTENSION: &'static str = "meta";
}
