//! Small value records shared by every other schema type.

use crate::archive;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

archive! {
    pub struct Vec2Data: 0 {
        data x: f32 = 0.0,
        data y: f32 = 0.0,
    }
}

archive! {
    pub struct Vec3Data: 0 {
        data x: f32 = 0.0,
        data y: f32 = 0.0,
        data z: f32 = 0.0,
    }
}

archive! {
    pub struct Vec4Data: 0 {
        data x: f32 = 0.0,
        data y: f32 = 0.0,
        data z: f32 = 0.0,
        data w: f32 = 0.0,
    }
}

archive! {
    pub struct QuatData: 0 {
        data x: f32 = 0.0,
        data y: f32 = 0.0,
        data z: f32 = 0.0,
        data w: f32 = 1.0,
    }
}

archive! {
    pub struct ColorData: 0 {
        data r: f32 = 1.0,
        data g: f32 = 1.0,
        data b: f32 = 1.0,
        data a: f32 = 1.0,
    }
}

archive! {
    /// Column-major 4x4 matrix.
    pub struct Mat4Data: 0 {
        archive x_axis: Vec4Data = Vec4Data::new(1.0, 0.0, 0.0, 0.0),
        archive y_axis: Vec4Data = Vec4Data::new(0.0, 1.0, 0.0, 0.0),
        archive z_axis: Vec4Data = Vec4Data::new(0.0, 0.0, 1.0, 0.0),
        archive w_axis: Vec4Data = Vec4Data::new(0.0, 0.0, 0.0, 1.0),
    }
}

impl Vec2Data {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, ..Self::default() }
    }
}

impl Vec3Data {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, ..Self::default() }
    }
}

impl Vec4Data {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w, ..Self::default() }
    }
}

impl ColorData {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a, ..Self::default() }
    }
}

impl From<Vec2> for Vec2Data {
    fn from(value: Vec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<&Vec2Data> for Vec2 {
    fn from(value: &Vec2Data) -> Self {
        Vec2::new(value.x, value.y)
    }
}

impl From<Vec3> for Vec3Data {
    fn from(value: Vec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<&Vec3Data> for Vec3 {
    fn from(value: &Vec3Data) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

impl From<Vec4> for Vec4Data {
    fn from(value: Vec4) -> Self {
        Self::new(value.x, value.y, value.z, value.w)
    }
}

impl From<&Vec4Data> for Vec4 {
    fn from(value: &Vec4Data) -> Self {
        Vec4::new(value.x, value.y, value.z, value.w)
    }
}

impl From<Quat> for QuatData {
    fn from(value: Quat) -> Self {
        Self { x: value.x, y: value.y, z: value.z, w: value.w, ..Self::default() }
    }
}

impl From<&QuatData> for Quat {
    fn from(value: &QuatData) -> Self {
        let quat = Quat::from_xyzw(value.x, value.y, value.z, value.w);
        if quat.length_squared() > f32::EPSILON {
            quat.normalize()
        } else {
            Quat::IDENTITY
        }
    }
}

/// Colors travel as RGBA in a `Vec4` on the live side.
impl From<Vec4> for ColorData {
    fn from(value: Vec4) -> Self {
        Self::new(value.x, value.y, value.z, value.w)
    }
}

impl From<&ColorData> for Vec4 {
    fn from(value: &ColorData) -> Self {
        Vec4::new(value.r, value.g, value.b, value.a)
    }
}

impl From<Mat4> for Mat4Data {
    fn from(value: Mat4) -> Self {
        Self {
            x_axis: value.x_axis.into(),
            y_axis: value.y_axis.into(),
            z_axis: value.z_axis.into(),
            w_axis: value.w_axis.into(),
            ..Self::default()
        }
    }
}

impl From<&Mat4Data> for Mat4 {
    fn from(value: &Mat4Data) -> Self {
        Mat4::from_cols(
            Vec4::from(&value.x_axis),
            Vec4::from(&value.y_axis),
            Vec4::from(&value.z_axis),
            Vec4::from(&value.w_axis),
        )
    }
}
