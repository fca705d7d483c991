use super::component::{ComponentHeader, NO_OBJECT};
use super::data::{Vec2Data, Vec3Data, Vec4Data};
use crate::archive;

archive! {
    /// One exposed script field. Only the value slot matching `field_type`
    /// is meaningful.
    pub struct ScriptFieldData: 0 {
        data field_name: String = String::new(),
        data field_type: String = String::new(),
        data string_value: String = String::new(),
        data bool_value: bool = false,
        data int_value: i32 = 0,
        data float_value: f32 = 0.0,
        /// GUID of the referenced entity for object-typed fields.
        data object_value: String = NO_OBJECT.to_string(),
        archive vec2_value: Vec2Data = Vec2Data::default(),
        archive vec3_value: Vec3Data = Vec3Data::default(),
        archive vec4_value: Vec4Data = Vec4Data::default(),
        list string_array_value: Vec<String> = Vec::new(),
    }
}

archive! {
    pub struct ScriptData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data class_name: String = String::new(),
        archives fields: Vec<ScriptFieldData> = Vec::new(),
    }
}
