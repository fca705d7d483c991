//! Terrain component record and the terrain asset it points at.

use super::component::ComponentHeader;
use super::data::{Mat4Data, Vec2Data, Vec3Data};
use crate::archive;

archive! {
    pub struct TerrainData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        /// Path of the terrain asset, relative to the assets root.
        data file_path: String = String::new(),
    }
}

archive! {
    /// RGBA8 paint weights, one texel per height sample.
    pub struct TerrainSplatTextureData: 0 {
        bulk pixels: Vec<u8> = Vec::new(),
    }
}

archive! {
    pub struct TerrainModelMeshData: 0 {
        data mesh: String = String::new(),
        archive transform: Mat4Data = Mat4Data::default(),
        list materials: Vec<String> = Vec::new(),
    }
}

archive! {
    pub struct TerrainTextureData: 0 {
        data diffuse_texture: String = String::new(),
        data normal_texture: String = String::new(),
        data world_size: f32 = 100.0,
    }
}

archive! {
    pub struct TerrainTreeMeshData: 0 {
        archive position: Vec3Data = Vec3Data::default(),
        data scale: f32 = 1.0,
        data rotation: f32 = 0.0,
    }
}

archive! {
    pub struct TerrainTreeData: 0 {
        data name: String = String::new(),
        data min_scale: f32 = 1.0,
        data max_scale: f32 = 1.5,
        archives meshes: Vec<TerrainTreeMeshData> = Vec::new(),
        archives mesh_models: Vec<TerrainModelMeshData> = Vec::new(),
    }
}

archive! {
    pub struct TerrainDetailMeshInfoData: 0 {
        archive position: Vec3Data = Vec3Data::default(),
        data scale: f32 = 1.0,
        data rotation: f32 = 0.0,
    }
}

archive! {
    pub struct TerrainDetailMeshData: 0 {
        data name: String = String::new(),
        data min_scale: f32 = 1.0,
        data max_scale: f32 = 1.5,
        archives meshes: Vec<TerrainDetailMeshInfoData> = Vec::new(),
        archives mesh_models: Vec<TerrainModelMeshData> = Vec::new(),
    }
}

archive! {
    pub struct TerrainGrassMeshData: 0 {
        archive position: Vec3Data = Vec3Data::default(),
        data rotation: f32 = 0.0,
        data width: f32 = 0.0,
        data height: f32 = 0.0,
    }
}

archive! {
    pub struct TerrainGrassData: 0 {
        data name: String = String::new(),
        archive min_size: Vec2Data = Vec2Data::new(1.0, 1.0),
        archive max_size: Vec2Data = Vec2Data::new(2.0, 2.0),
        archives meshes: Vec<TerrainGrassMeshData> = Vec::new(),
    }
}

archive! {
    pub struct TerrainAssetData: 0 {
        data material: String = String::new(),
        /// Height samples per side.
        data size: i32 = 128,
        data world_size: i32 = 256,
        data tree_impostor_start_distance: f32 = 90.0,
        data tree_draw_distance: f32 = 250.0,
        data detail_meshes_draw_distance: f32 = 40.0,
        data grass_draw_distance: f32 = 50.0,
        data draw_grass: bool = true,
        data draw_trees: bool = true,
        data draw_detail_meshes: bool = true,
        data grass_cast_shadows: bool = true,
        data trees_cast_shadows: bool = true,
        data detail_meshes_cast_shadows: bool = true,
        data terrain_cast_shadows: bool = true,
        archives splat_textures: Vec<TerrainSplatTextureData> = Vec::new(),
        archives textures: Vec<TerrainTextureData> = Vec::new(),
        archives trees: Vec<TerrainTreeData> = Vec::new(),
        archives detail_meshes: Vec<TerrainDetailMeshData> = Vec::new(),
        archives grass: Vec<TerrainGrassData> = Vec::new(),
        bulk height_map: Vec<f32> = Vec::new(),
    }
}

impl TerrainAssetData {
    pub const FORMAT: &'static str = "Terrain Data";

    /// Height at grid coordinates, or `None` outside the map.
    pub fn height_at(&self, x: usize, z: usize) -> Option<f32> {
        let size = usize::try_from(self.size).ok()?;
        if x >= size || z >= size {
            return None;
        }
        self.height_map.get(z * size + x).copied()
    }
}
