//! Standalone asset files referenced by name from scene records.

use super::data::{ColorData, Mat4Data, QuatData, Vec2Data, Vec3Data, Vec4Data};
use crate::archive;

archive! {
    pub struct VertexData: 0 {
        archive position: Vec3Data = Vec3Data::default(),
        archive normal: Vec3Data = Vec3Data::default(),
        archive tangent: Vec3Data = Vec3Data::default(),
        archive bitangent: Vec3Data = Vec3Data::default(),
        archive texcoord0: Vec2Data = Vec2Data::default(),
        archive texcoord1: Vec2Data = Vec2Data::default(),
        archive blend_weights: Vec4Data = Vec4Data::default(),
        archive blend_indices: Vec4Data = Vec4Data::default(),
        archive color: ColorData = ColorData::default(),
    }
}

archive! {
    pub struct BoneInfoData: 0 {
        data name: String = String::new(),
        archive offset_matrix: Mat4Data = Mat4Data::default(),
    }
}

archive! {
    pub struct LodInfoData: 0 {
        bulk index_buffer: Vec<u32> = Vec::new(),
    }
}

archive! {
    pub struct SubMeshData: 0 {
        data material_name: String = String::new(),
        data use_lightmap_uvs: bool = false,
        archives vertex_buffer: Vec<VertexData> = Vec::new(),
        bulk index_buffer: Vec<u32> = Vec::new(),
        archives bones: Vec<BoneInfoData> = Vec::new(),
        archives lods: Vec<LodInfoData> = Vec::new(),
    }
}

archive! {
    pub struct MeshData: 0 {
        data alias: String = String::new(),
        data source_file: String = String::new(),
        archives sub_meshes: Vec<SubMeshData> = Vec::new(),
    }
}

impl MeshData {
    pub const FORMAT: &'static str = "Mesh";
}

archive! {
    pub struct Sampler2DData: 0 {
        data register: i32 = 0,
        data texture_name: String = String::new(),
    }
}

archive! {
    pub struct SamplerCubeData: 0 {
        data register: i32 = 0,
        data cubemap_name: String = String::new(),
    }
}

archive! {
    /// A shader uniform. `uniform_type` selects which value slot is live.
    pub struct UniformData: 0 {
        data name: String = String::new(),
        data uniform_type: i32 = 0,
        data int_value: i32 = 0,
        data float_value: f32 = 0.0,
        data bool_value: bool = false,
        archive vec2_value: Vec2Data = Vec2Data::default(),
        archive vec3_value: Vec3Data = Vec3Data::default(),
        archive vec4_value: Vec4Data = Vec4Data::default(),
        archive color_value: ColorData = ColorData::default(),
        archive sampler_2d_value: Sampler2DData = Sampler2DData::default(),
        archive sampler_cube_value: SamplerCubeData = SamplerCubeData::default(),
    }
}

archive! {
    pub struct MaterialData: 0 {
        data shader_name: String = String::new(),
        archives uniforms: Vec<UniformData> = Vec::new(),
    }
}

impl MaterialData {
    pub const FORMAT: &'static str = "Material";

    pub fn uniform(&self, name: &str) -> Option<&UniformData> {
        self.uniforms.iter().find(|uniform| uniform.name == name)
    }
}

archive! {
    pub struct TimeVec3Data: 0 {
        data time: f64 = 0.0,
        archive value: Vec3Data = Vec3Data::default(),
    }
}

archive! {
    pub struct TimeQuatData: 0 {
        data time: f64 = 0.0,
        archive value: QuatData = QuatData::default(),
    }
}

archive! {
    /// Keyframes for one named node of the animated hierarchy.
    pub struct AnimationNodeData: 0 {
        data name: String = String::new(),
        archives position_keys: Vec<TimeVec3Data> = Vec::new(),
        archives scaling_keys: Vec<TimeVec3Data> = Vec::new(),
        archives rotation_keys: Vec<TimeQuatData> = Vec::new(),
    }
}

archive! {
    pub struct AnimationClipData: 0 {
        data duration: f32 = 0.0,
        data frames_per_second: f32 = 0.0,
        archives nodes: Vec<AnimationNodeData> = Vec::new(),
    }
}

impl AnimationClipData {
    pub const FORMAT: &'static str = "Animation Clip";
}
