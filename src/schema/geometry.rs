//! Derived geometry caches written next to a scene.

use super::data::{ColorData, Vec2Data, Vec3Data};
use crate::archive;

archive! {
    pub struct GeometryVertexData: 0 {
        archive position: Vec3Data = Vec3Data::default(),
        archive normal: Vec3Data = Vec3Data::default(),
        archive tangent: Vec3Data = Vec3Data::default(),
        archive bitangent: Vec3Data = Vec3Data::default(),
        archive texcoord0: Vec2Data = Vec2Data::default(),
        archive texcoord1: Vec2Data = Vec2Data::default(),
        archive color: ColorData = ColorData::default(),
    }
}

archive! {
    pub struct BatchData: 0 {
        data material: String = String::new(),
        data guid: String = String::new(),
        data transparent: bool = false,
        data lighting_static: bool = false,
        data use_lightmap_uvs: bool = false,
        data cast_shadows: bool = true,
        data lightmap_size: u8 = 0,
        data layer: i32 = 0,
        data index: i32 = 0,
        archives vertex_buffer: Vec<GeometryVertexData> = Vec::new(),
        bulk index_buffer: Vec<u32> = Vec::new(),
    }
}

archive! {
    pub struct BatchedGeometryData: 1 {
        archives batches: Vec<BatchData> = Vec::new(),
        /// Digest of the inputs the batches were built from.
        @since(1) data fingerprint: String = String::new(),
    }
}

impl BatchedGeometryData {
    pub const FORMAT: &'static str = "Batched Geometry";
}

archive! {
    pub struct CsgSubMeshData: 0 {
        data material: String = String::new(),
        data guid: String = String::new(),
        data cast_shadows: bool = true,
        data layer: i32 = 0,
        archives vertex_buffer: Vec<GeometryVertexData> = Vec::new(),
        bulk index_buffer: Vec<u32> = Vec::new(),
        /// Per-vertex id of the brush that produced it.
        bulk id_buffer: Vec<u64> = Vec::new(),
    }
}

archive! {
    pub struct CsgGeometryData: 1 {
        archives sub_meshes: Vec<CsgSubMeshData> = Vec::new(),
        @since(1) data fingerprint: String = String::new(),
    }
}

impl CsgGeometryData {
    pub const FORMAT: &'static str = "CSG Geometry";
}
