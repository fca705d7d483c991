use super::component::{ComponentHeader, UiElementHeader};
use super::data::{ColorData, Vec4Data};
use crate::archive;

archive! {
    pub struct CanvasData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data ref_screen_width: i32 = 1920,
        data ref_screen_height: i32 = 1080,
        /// Blend between matching width (0) and height (1).
        data screen_match_side: f32 = 0.5,
        data mode: i32 = 0,
    }
}

archive! {
    pub struct ImageData: 0 {
        inline ui: UiElementHeader = UiElementHeader::default(),
        data texture_path: String = String::new(),
        data image_type: i32 = 0,
    }
}

archive! {
    pub struct TextData: 0 {
        inline ui: UiElementHeader = UiElementHeader::default(),
        data font_path: String = String::new(),
        data text: String = String::new(),
        data font_size: f32 = 14.0,
        data font_resolution: i32 = 32,
        data line_spacing: f32 = 0.0,
        data horizontal_text_alignment: i32 = 0,
        data vertical_text_alignment: i32 = 0,
        data word_wrap: i32 = 1,
    }
}

archive! {
    pub struct ButtonData: 0 {
        inline ui: UiElementHeader = UiElementHeader::default(),
        data tex_normal_path: String = String::new(),
        data tex_hover_path: String = String::new(),
        data tex_active_path: String = String::new(),
        data tex_disabled_path: String = String::new(),
        archive col_hover: ColorData = ColorData::default(),
        archive col_active: ColorData = ColorData::default(),
        archive col_disabled: ColorData = ColorData::default(),
        data image_type: i32 = 0,
        data interactable: bool = true,
    }
}

archive! {
    pub struct MaskData: 0 {
        inline ui: UiElementHeader = UiElementHeader::default(),
    }
}

archive! {
    pub struct TextInputData: 0 {
        inline ui: UiElementHeader = UiElementHeader::default(),
        data font_path: String = String::new(),
        data tex_normal_path: String = String::new(),
        data tex_hover_path: String = String::new(),
        data tex_active_path: String = String::new(),
        data tex_disabled_path: String = String::new(),
        archive col_hover: ColorData = ColorData::default(),
        archive col_active: ColorData = ColorData::default(),
        archive col_disabled: ColorData = ColorData::default(),
        archive col_text: ColorData = ColorData::default(),
        archive col_placeholder: ColorData = ColorData::default(),
        data image_type: i32 = 0,
        data text: String = String::new(),
        data placeholder: String = String::new(),
        data multiline: bool = false,
        data font_size: f32 = 14.0,
        data font_resolution: i32 = 32,
        data line_spacing: f32 = 0.0,
        archive padding: Vec4Data = Vec4Data::new(5.0, 5.0, 5.0, 5.0),
        data horizontal_text_alignment: i32 = 0,
        data vertical_text_alignment: i32 = 0,
        data word_wrap: i32 = 1,
        data interactable: bool = true,
    }
}
