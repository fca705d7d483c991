use super::component::ComponentHeader;
use super::data::{Vec2Data, Vec3Data};
use crate::archive;

archive! {
    /// A planar brush face: a polygon over the brush vertex list.
    pub struct CsgFaceData: 1 {
        bulk indices: Vec<u32> = Vec::new(),
        archives tex_coords: Vec<Vec2Data> = Vec::new(),
        archive tex_coords_scale: Vec2Data = Vec2Data::new(1.0, 1.0),
        archive tex_coords_offset: Vec2Data = Vec2Data::default(),
        data tex_coords_rotation: f32 = 0.0,
        data material: String = String::new(),
        @since(1) data smooth_normals: bool = true,
    }
}

archive! {
    pub struct CsgBrushData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data brush_type: i32 = 0,
        data brush_operation: i32 = 0,
        data cast_shadows: bool = true,
        data segments: i32 = 16,
        data stacks: i32 = 16,
        archives vertices: Vec<Vec3Data> = Vec::new(),
        archives faces: Vec<CsgFaceData> = Vec::new(),
    }
}

archive! {
    /// Marks the root under which brushes are combined.
    pub struct CsgModelData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
    }
}
