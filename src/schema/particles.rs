use super::component::ComponentHeader;
use super::data::{ColorData, Vec2Data, Vec3Data};
use crate::archive;

archive! {
    pub struct GravityModifierData: 0 {
        data start_time: f32 = 0.0,
        archive gravity: Vec3Data = Vec3Data::new(0.0, -1.0, 0.0),
        data damping: f32 = 0.07,
    }
}

archive! {
    /// Color gradient keyed by normalized particle age.
    pub struct ColorModifierData: 0 {
        data start_time: f32 = 0.0,
        bulk times: Vec<f32> = Vec::new(),
        archives colors: Vec<ColorData> = Vec::new(),
    }
}

archive! {
    pub struct SizeModifierData: 0 {
        data start_time: f32 = 0.0,
        bulk times: Vec<f32> = Vec::new(),
        bulk sizes: Vec<f32> = Vec::new(),
    }
}

archive! {
    pub struct DirectionModifierData: 0 {
        data start_time: f32 = 0.0,
        archive random_direction_min: Vec3Data = Vec3Data::new(-1.0, -1.0, -1.0),
        archive random_direction_max: Vec3Data = Vec3Data::new(1.0, 1.0, 1.0),
        archive constant_direction: Vec3Data = Vec3Data::new(1.0, 0.0, 0.0),
        data change_interval: f32 = 0.1,
        data direction_type: i32 = 0,
    }
}

archive! {
    pub struct RotationModifierData: 0 {
        data start_time: f32 = 0.0,
        archive random_rotation_min: Vec3Data = Vec3Data::new(-180.0, -180.0, -180.0),
        archive random_rotation_max: Vec3Data = Vec3Data::new(180.0, 180.0, 180.0),
        archive constant_rotation: Vec3Data = Vec3Data::default(),
        archive offset: Vec3Data = Vec3Data::default(),
        data change_interval: f32 = 0.1,
        data rotation_type: i32 = 0,
    }
}

archive! {
    pub struct SpeedModifierData: 0 {
        data start_time: f32 = 0.0,
        data constant_speed: f32 = 0.1,
        data random_speed_min: f32 = 0.1,
        data random_speed_max: f32 = 0.5,
        data change_interval: f32 = 0.1,
        data speed_type: i32 = 0,
    }
}

archive! {
    pub struct ParticleEmitterData: 3 {
        data material: String = String::new(),
        data simulation_space: i32 = 0,
        data render_type: i32 = 0,
        data origin: i32 = 0,
        data shape: i32 = 0,
        data radius: f32 = 1.0,
        archive size: Vec3Data = Vec3Data::new(1.0, 1.0, 1.0),
        data time_scale: f32 = 1.0,
        data emission_rate: f32 = 0.02,
        data emission_count: u32 = 2,
        data duration: f32 = 2.0,
        data max_particles: u32 = 100,
        data start_size_min: f32 = 0.5,
        data start_size_max: f32 = 1.0,
        data life_time_min: f32 = 0.7,
        data life_time_max: f32 = 1.0,
        data start_speed: f32 = 2.0,
        archive start_direction: Vec3Data = Vec3Data::new(0.0, -1.0, 0.0),
        data looped: bool = true,
        @since(1) data enable_physics: bool = false,
        @since(1) data bounciness: f32 = 0.25,
        @since(2) data friction: f32 = 0.85,
        @since(2) archives gravity_modifiers: Vec<GravityModifierData> = Vec::new(),
        @since(2) archives color_modifiers: Vec<ColorModifierData> = Vec::new(),
        @since(2) archives size_modifiers: Vec<SizeModifierData> = Vec::new(),
        @since(2) archives direction_modifiers: Vec<DirectionModifierData> = Vec::new(),
        @since(2) archives rotation_modifiers: Vec<RotationModifierData> = Vec::new(),
        @since(2) archives speed_modifiers: Vec<SpeedModifierData> = Vec::new(),
        @since(3) data animated: bool = false,
        @since(3) archive animation_grid_size: Vec2Data = Vec2Data::new(1.0, 1.0),
        @since(3) data animation_time_mode: i32 = 0,
        @since(3) data animation_fps: i32 = 28,
    }
}

archive! {
    pub struct ParticleSystemData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data cast_shadows: bool = false,
        data play_at_start: bool = true,
        archives emitters: Vec<ParticleEmitterData> = Vec::new(),
    }
}
