use super::component::ComponentHeader;
use crate::archive;

archive! {
    pub struct AudioListenerData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data volume: f32 = 1.0,
    }
}

archive! {
    pub struct AudioSourceData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data file_name: String = String::new(),
        data play_on_start: bool = true,
        data looped: bool = false,
        data volume: f32 = 1.0,
        data pitch: f32 = 1.0,
        data min_distance: f32 = 10.0,
        data max_distance: f32 = 500.0,
        data is_2d: bool = false,
    }
}

archive! {
    pub struct VideoPlayerData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data video_clip: String = String::new(),
        data play_on_start: bool = true,
        data looped: bool = false,
    }
}
