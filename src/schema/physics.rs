use super::component::{ComponentHeader, NO_OBJECT};
use super::data::{QuatData, Vec3Data};
use crate::archive;

archive! {
    pub struct RigidBodyData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data mass: f32 = 0.0,
        data freeze_position_x: bool = false,
        data freeze_position_y: bool = false,
        data freeze_position_z: bool = false,
        data freeze_rotation_x: bool = false,
        data freeze_rotation_y: bool = false,
        data freeze_rotation_z: bool = false,
        data is_kinematic: bool = false,
        data is_static: bool = false,
        data use_own_gravity: bool = false,
        archive gravity: Vec3Data = Vec3Data::new(0.0, -9.81, 0.0),
        data friction: f32 = 0.85,
        data bounciness: f32 = 0.25,
        data linear_damping: f32 = 0.0,
        data angular_damping: f32 = 0.0,
    }
}

archive! {
    pub struct BoxColliderData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        archive box_size: Vec3Data = Vec3Data::new(1.0, 1.0, 1.0),
        archive offset: Vec3Data = Vec3Data::default(),
        archive rotation: QuatData = QuatData::default(),
        data is_trigger: bool = false,
    }
}

archive! {
    pub struct CapsuleColliderData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data radius: f32 = 0.5,
        data height: f32 = 2.0,
        archive offset: Vec3Data = Vec3Data::default(),
        archive rotation: QuatData = QuatData::default(),
        data is_trigger: bool = false,
    }
}

archive! {
    pub struct SphereColliderData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data radius: f32 = 0.5,
        archive offset: Vec3Data = Vec3Data::default(),
        data is_trigger: bool = false,
    }
}

archive! {
    pub struct MeshColliderData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data convex: bool = false,
        data is_trigger: bool = false,
    }
}

archive! {
    pub struct TerrainColliderData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data is_trigger: bool = false,
    }
}

archive! {
    pub struct WheelInfoData: 0 {
        data connected_object_guid: String = NO_OBJECT.to_string(),
        data radius: f32 = 0.5,
        data width: f32 = 0.4,
        data suspension_stiffness: f32 = 20.0,
        data suspension_damping: f32 = 2.3,
        data suspension_compression: f32 = 4.4,
        data suspension_rest_length: f32 = 0.6,
        data friction: f32 = 1000.0,
        data roll_influence: f32 = 0.1,
        archive direction: Vec3Data = Vec3Data::new(0.0, -1.0, 0.0),
        archive axle: Vec3Data = Vec3Data::new(-1.0, 0.0, 0.0),
        archive connection_point: Vec3Data = Vec3Data::default(),
        data is_front_wheel: bool = false,
    }
}

archive! {
    pub struct VehicleData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        /// Right, up and forward axis indices.
        archive vehicle_axis: Vec3Data = Vec3Data::new(0.0, 1.0, 2.0),
        data invert_forward: bool = false,
        archives wheels: Vec<WheelInfoData> = Vec::new(),
    }
}

archive! {
    pub struct FixedJointData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data connected_object_guid: String = NO_OBJECT.to_string(),
        archive anchor: Vec3Data = Vec3Data::default(),
        archive connected_anchor: Vec3Data = Vec3Data::default(),
        data linked_bodies_collision: bool = true,
    }
}

archive! {
    pub struct FreeJointData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data connected_object_guid: String = NO_OBJECT.to_string(),
        archive anchor: Vec3Data = Vec3Data::default(),
        archive connected_anchor: Vec3Data = Vec3Data::default(),
        data linked_bodies_collision: bool = true,
        archive limit_min: Vec3Data = Vec3Data::default(),
        archive limit_max: Vec3Data = Vec3Data::default(),
    }
}

archive! {
    pub struct HingeJointData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data connected_object_guid: String = NO_OBJECT.to_string(),
        archive anchor: Vec3Data = Vec3Data::default(),
        archive connected_anchor: Vec3Data = Vec3Data::default(),
        data linked_bodies_collision: bool = true,
        data limit_min: f32 = 0.0,
        data limit_max: f32 = 0.0,
        archive axis: Vec3Data = Vec3Data::new(0.0, 1.0, 0.0),
    }
}

archive! {
    pub struct ConeTwistJointData: 0 {
        inline component: ComponentHeader = ComponentHeader::default(),
        data connected_object_guid: String = NO_OBJECT.to_string(),
        archive anchor: Vec3Data = Vec3Data::default(),
        archive connected_anchor: Vec3Data = Vec3Data::default(),
        data linked_bodies_collision: bool = true,
        archive limits: Vec3Data = Vec3Data::new(45.0, 45.0, 45.0),
    }
}
