//! Records to live graph, one entity at a time.

use super::components::*;
use super::types::{ComponentSlot, StaticFlags};
use super::world::EcsWorld;
use crate::assets::{Asset, AssetHandle, AssetKind, AssetLoader, AssetPayload};
use crate::schema::csg::{CsgBrushData, CsgModelData};
use crate::schema::media::{AudioListenerData, AudioSourceData, VideoPlayerData};
use crate::schema::navigation::{NavMeshAgentData, NavMeshObstacleData};
use crate::schema::particles::{ParticleEmitterData, ParticleSystemData};
use crate::schema::physics::*;
use crate::schema::rendering::*;
use crate::schema::scripting::ScriptData;
use crate::schema::terrain::TerrainData;
use crate::schema::ui::*;
use crate::schema::{ComponentHeader, GameObjectData, UiElementHeader};
use bevy_ecs::prelude::Entity;
use glam::{BVec3, Vec3, Vec4};
use std::sync::Arc;

/// Construction of a live component from its record.
pub(crate) trait Restore: Sized {
    type Data;

    fn restore(data: &Self::Data, assets: &mut dyn AssetLoader) -> Self;
}

trait HasHeader {
    fn header(&self) -> &ComponentHeader;
}

macro_rules! component_headers {
    ($($data:ty),* $(,)?) => {
        $(impl HasHeader for $data {
            fn header(&self) -> &ComponentHeader {
                &self.component
            }
        })*
    };
}

macro_rules! widget_headers {
    ($($data:ty),* $(,)?) => {
        $(impl HasHeader for $data {
            fn header(&self) -> &ComponentHeader {
                &self.ui.component
            }
        })*
    };
}

component_headers!(
    MeshRendererData,
    LightData,
    CameraData,
    AnimationData,
    RigidBodyData,
    BoxColliderData,
    CapsuleColliderData,
    MeshColliderData,
    SphereColliderData,
    VehicleData,
    FixedJointData,
    FreeJointData,
    HingeJointData,
    AudioListenerData,
    AudioSourceData,
    NavMeshAgentData,
    NavMeshObstacleData,
    ScriptData,
    CanvasData,
    TerrainData,
    ParticleSystemData,
    TerrainColliderData,
    ConeTwistJointData,
    WaterData,
    SplineData,
    VideoPlayerData,
    CsgBrushData,
    CsgModelData,
    DecalRendererData,
);
widget_headers!(ImageData, TextData, ButtonData, MaskData, TextInputData);

/// Resolves nothing. Used to build components with record defaults.
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load(&mut self, _: AssetKind, _: &str) -> Option<AssetHandle> {
        None
    }
}

macro_rules! define_restore_dispatch {
    ($($variant:ident: $data:ty => $field:ident),* $(,)?) => {
        /// Attaches in record-list order and remembers each saved index.
        fn restore_components(
            data: &GameObjectData,
            assets: &mut dyn AssetLoader,
            out: &mut Vec<(i32, ComponentSlot)>,
        ) {
            $(
                for record in &data.$field {
                    let header = record.header();
                    let component = <$variant as Restore>::restore(record, assets);
                    out.push((
                        header.index,
                        ComponentSlot { enabled: header.enabled, component: SceneComponent::$variant(component) },
                    ));
                }
            )*
        }

        $(
            impl Default for $variant {
                fn default() -> Self {
                    <$variant as Restore>::restore(&<$data>::default(), &mut NoAssets)
                }
            }
        )*
    };
}
with_component_table!(define_restore_dispatch);

impl EcsWorld {
    /// Copies the record's scalar state onto `entity` and attaches its
    /// components in saved order. Parent links, the enabled flag and hooks
    /// are applied by the caller once the whole graph exists.
    pub fn load_object(&mut self, data: &GameObjectData, entity: Entity, assets: &mut dyn AssetLoader) {
        self.set_name(entity, &data.name);
        self.set_transform(
            entity,
            super::types::Transform {
                position: (&data.position).into(),
                rotation: (&data.rotation).into(),
                scale: (&data.scale).into(),
            },
        );
        if let Some(mut state) = self.world.get_mut::<super::types::EntityState>(entity) {
            let mut flags = StaticFlags::empty();
            flags.set(StaticFlags::NAVIGATION, data.navigation_static);
            flags.set(StaticFlags::LIGHTING, data.lighting_static);
            flags.set(StaticFlags::BATCHING, data.batching_static);
            flags.set(StaticFlags::OCCLUSION, data.occlusion_static);
            state.static_flags = flags;
            state.tag = data.tag;
            state.layer = data.layer;
        }

        let mut attached = Vec::with_capacity(data.component_count());
        restore_components(data, assets, &mut attached);
        attached.sort_by_key(|(index, _)| *index);
        self.set_components(entity, attached.into_iter().map(|(_, slot)| slot).collect());
    }
}

fn layout(ui: &UiElementHeader) -> UiLayout {
    UiLayout {
        anchor: (&ui.anchor).into(),
        color: (&ui.color).into(),
        size: (&ui.size).into(),
        horizontal_alignment: ui.horizontal_alignment,
        vertical_alignment: ui.vertical_alignment,
        raycast_target: ui.raycast_target,
    }
}

fn textures(assets: &mut dyn AssetLoader, normal: &str, hover: &str, active: &str, disabled: &str) -> ButtonTextures {
    ButtonTextures {
        normal: AssetRef::load(assets, AssetKind::Texture, normal),
        hover: AssetRef::load(assets, AssetKind::Texture, hover),
        active: AssetRef::load(assets, AssetKind::Texture, active),
        disabled: AssetRef::load(assets, AssetKind::Texture, disabled),
    }
}

fn link(connected_object_guid: &str, anchor: Vec3, connected_anchor: Vec3, linked_bodies_collision: bool) -> JointLink {
    JointLink {
        connected_object: ObjectRef::from_guid(connected_object_guid),
        anchor,
        connected_anchor,
        linked_bodies_collision,
    }
}

impl Restore for MeshRenderer {
    type Data = MeshRendererData;

    fn restore(data: &MeshRendererData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            mesh: AssetRef::load(assets, AssetKind::Mesh, &data.mesh),
            mesh_source_file: data.mesh_source_file.clone(),
            root_object: ObjectRef::from_guid(&data.root_object_guid),
            materials: data.materials.iter().map(|name| AssetRef::load(assets, AssetKind::Material, name)).collect(),
            cast_shadows: data.cast_shadows,
            lightmap_size: data.lightmap_size,
            lod_max_distance: data.lod_max_distance,
            cull_over_max_distance: data.cull_over_max_distance,
        }
    }
}

impl Restore for DecalRenderer {
    type Data = DecalRendererData;

    fn restore(data: &DecalRendererData, assets: &mut dyn AssetLoader) -> Self {
        Self { material: AssetRef::load(assets, AssetKind::Material, &data.material) }
    }
}

impl Restore for Light {
    type Data = LightData;

    fn restore(data: &LightData, _: &mut dyn AssetLoader) -> Self {
        Self {
            color: (&data.color).into(),
            intensity: data.intensity,
            light_type: data.light_type,
            render_mode: data.render_mode,
            radius: data.radius,
            inner_radius: data.inner_radius,
            outer_radius: data.outer_radius,
            bias: data.bias,
            cast_shadows: data.cast_shadows,
        }
    }
}

impl Restore for Camera {
    type Data = CameraData;

    fn restore(data: &CameraData, _: &mut dyn AssetLoader) -> Self {
        // An empty list predates per-layer masks and renders everything.
        let culling_mask = if data.culling_mask.is_empty() {
            u32::MAX
        } else {
            data.culling_mask
                .iter()
                .take(32)
                .enumerate()
                .filter(|(_, enabled)| **enabled != 0)
                .fold(0u32, |mask, (layer, _)| mask | (1 << layer))
        };
        Self {
            fov_y: data.fov_y,
            z_near: data.z_near,
            z_far: data.z_far,
            viewport: Vec4::new(data.viewport_left, data.viewport_top, data.viewport_width, data.viewport_height),
            depth: data.depth,
            clear_color: (&data.clear_color).into(),
            clear_flags: data.clear_flags,
            projection_type: data.projection_type,
            orthographic_size: data.orthographic_size,
            occlusion_culling: data.occlusion_culling,
            culling_mask,
        }
    }
}

impl Restore for Animation {
    type Data = AnimationData;

    fn restore(data: &AnimationData, assets: &mut dyn AssetLoader) -> Self {
        let clips = data
            .clips
            .iter()
            .map(|clip| AnimationClipSlot {
                clip: AssetRef::load(assets, AssetKind::AnimationClip, &clip.clip_path),
                name: clip.name.clone(),
                speed: clip.speed,
                start_frame: clip.start_frame,
                end_frame: clip.end_frame,
                looped: clip.looped,
            })
            .collect();
        Self { clips, node_bindings: Default::default() }
    }
}

impl Restore for RigidBody {
    type Data = RigidBodyData;

    fn restore(data: &RigidBodyData, _: &mut dyn AssetLoader) -> Self {
        Self {
            mass: data.mass,
            freeze_position: BVec3::new(data.freeze_position_x, data.freeze_position_y, data.freeze_position_z),
            freeze_rotation: BVec3::new(data.freeze_rotation_x, data.freeze_rotation_y, data.freeze_rotation_z),
            is_kinematic: data.is_kinematic,
            is_static: data.is_static,
            use_own_gravity: data.use_own_gravity,
            gravity: (&data.gravity).into(),
            friction: data.friction,
            bounciness: data.bounciness,
            linear_damping: data.linear_damping,
            angular_damping: data.angular_damping,
        }
    }
}

impl Restore for BoxCollider {
    type Data = BoxColliderData;

    fn restore(data: &BoxColliderData, _: &mut dyn AssetLoader) -> Self {
        Self {
            size: (&data.box_size).into(),
            offset: (&data.offset).into(),
            rotation: (&data.rotation).into(),
            is_trigger: data.is_trigger,
        }
    }
}

impl Restore for CapsuleCollider {
    type Data = CapsuleColliderData;

    fn restore(data: &CapsuleColliderData, _: &mut dyn AssetLoader) -> Self {
        Self {
            radius: data.radius,
            height: data.height,
            offset: (&data.offset).into(),
            rotation: (&data.rotation).into(),
            is_trigger: data.is_trigger,
        }
    }
}

impl Restore for SphereCollider {
    type Data = SphereColliderData;

    fn restore(data: &SphereColliderData, _: &mut dyn AssetLoader) -> Self {
        Self { radius: data.radius, offset: (&data.offset).into(), is_trigger: data.is_trigger }
    }
}

impl Restore for MeshCollider {
    type Data = MeshColliderData;

    fn restore(data: &MeshColliderData, _: &mut dyn AssetLoader) -> Self {
        Self { convex: data.convex, is_trigger: data.is_trigger, collision_mesh: None }
    }
}

impl Restore for TerrainCollider {
    type Data = TerrainColliderData;

    fn restore(data: &TerrainColliderData, _: &mut dyn AssetLoader) -> Self {
        Self { is_trigger: data.is_trigger, heightfield: None }
    }
}

impl Restore for Vehicle {
    type Data = VehicleData;

    fn restore(data: &VehicleData, _: &mut dyn AssetLoader) -> Self {
        let wheels = data
            .wheels
            .iter()
            .map(|wheel| Wheel {
                connected_object: ObjectRef::from_guid(&wheel.connected_object_guid),
                radius: wheel.radius,
                width: wheel.width,
                suspension_stiffness: wheel.suspension_stiffness,
                suspension_damping: wheel.suspension_damping,
                suspension_compression: wheel.suspension_compression,
                suspension_rest_length: wheel.suspension_rest_length,
                friction: wheel.friction,
                roll_influence: wheel.roll_influence,
                direction: (&wheel.direction).into(),
                axle: (&wheel.axle).into(),
                connection_point: (&wheel.connection_point).into(),
                is_front_wheel: wheel.is_front_wheel,
            })
            .collect();
        Self { axis: (&data.vehicle_axis).into(), invert_forward: data.invert_forward, wheels }
    }
}

impl Restore for FixedJoint {
    type Data = FixedJointData;

    fn restore(data: &FixedJointData, _: &mut dyn AssetLoader) -> Self {
        Self {
            link: link(
                &data.connected_object_guid,
                (&data.anchor).into(),
                (&data.connected_anchor).into(),
                data.linked_bodies_collision,
            ),
        }
    }
}

impl Restore for FreeJoint {
    type Data = FreeJointData;

    fn restore(data: &FreeJointData, _: &mut dyn AssetLoader) -> Self {
        Self {
            link: link(
                &data.connected_object_guid,
                (&data.anchor).into(),
                (&data.connected_anchor).into(),
                data.linked_bodies_collision,
            ),
            limit_min: (&data.limit_min).into(),
            limit_max: (&data.limit_max).into(),
        }
    }
}

impl Restore for HingeJoint {
    type Data = HingeJointData;

    fn restore(data: &HingeJointData, _: &mut dyn AssetLoader) -> Self {
        Self {
            link: link(
                &data.connected_object_guid,
                (&data.anchor).into(),
                (&data.connected_anchor).into(),
                data.linked_bodies_collision,
            ),
            limit_min: data.limit_min,
            limit_max: data.limit_max,
            axis: (&data.axis).into(),
        }
    }
}

impl Restore for ConeTwistJoint {
    type Data = ConeTwistJointData;

    fn restore(data: &ConeTwistJointData, _: &mut dyn AssetLoader) -> Self {
        Self {
            link: link(
                &data.connected_object_guid,
                (&data.anchor).into(),
                (&data.connected_anchor).into(),
                data.linked_bodies_collision,
            ),
            limits: (&data.limits).into(),
        }
    }
}

impl Restore for AudioListener {
    type Data = AudioListenerData;

    fn restore(data: &AudioListenerData, _: &mut dyn AssetLoader) -> Self {
        Self { volume: data.volume }
    }
}

impl Restore for AudioSource {
    type Data = AudioSourceData;

    fn restore(data: &AudioSourceData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            clip: AssetRef::load(assets, AssetKind::AudioClip, &data.file_name),
            play_on_start: data.play_on_start,
            looped: data.looped,
            volume: data.volume,
            pitch: data.pitch,
            min_distance: data.min_distance,
            max_distance: data.max_distance,
            is_2d: data.is_2d,
        }
    }
}

impl Restore for VideoPlayer {
    type Data = VideoPlayerData;

    fn restore(data: &VideoPlayerData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            clip: AssetRef::load(assets, AssetKind::VideoClip, &data.video_clip),
            play_on_start: data.play_on_start,
            looped: data.looped,
        }
    }
}

impl Restore for NavMeshAgent {
    type Data = NavMeshAgentData;

    fn restore(data: &NavMeshAgentData, _: &mut dyn AssetLoader) -> Self {
        Self {
            radius: data.radius,
            height: data.height,
            speed: data.speed,
            acceleration: data.acceleration,
            rotation_speed: data.rotation_speed,
        }
    }
}

impl Restore for NavMeshObstacle {
    type Data = NavMeshObstacleData;

    fn restore(data: &NavMeshObstacleData, _: &mut dyn AssetLoader) -> Self {
        Self { size: (&data.size).into(), offset: (&data.offset).into() }
    }
}

impl Restore for Script {
    type Data = ScriptData;

    fn restore(data: &ScriptData, _: &mut dyn AssetLoader) -> Self {
        let fields = data
            .fields
            .iter()
            .map(|field| ScriptField {
                name: field.field_name.clone(),
                field_type: field.field_type.clone(),
                string_value: field.string_value.clone(),
                bool_value: field.bool_value,
                int_value: field.int_value,
                float_value: field.float_value,
                object: ObjectRef::from_guid(&field.object_value),
                vec2_value: (&field.vec2_value).into(),
                vec3_value: (&field.vec3_value).into(),
                vec4_value: (&field.vec4_value).into(),
                string_array_value: field.string_array_value.clone(),
            })
            .collect();
        Self { class_name: data.class_name.clone(), fields }
    }
}

impl Restore for Canvas {
    type Data = CanvasData;

    fn restore(data: &CanvasData, _: &mut dyn AssetLoader) -> Self {
        Self {
            ref_screen_width: data.ref_screen_width,
            ref_screen_height: data.ref_screen_height,
            screen_match_side: data.screen_match_side,
            mode: data.mode,
        }
    }
}

impl Restore for Image {
    type Data = ImageData;

    fn restore(data: &ImageData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            layout: layout(&data.ui),
            texture: AssetRef::load(assets, AssetKind::Texture, &data.texture_path),
            image_type: data.image_type,
        }
    }
}

impl Restore for Text {
    type Data = TextData;

    fn restore(data: &TextData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            layout: layout(&data.ui),
            font: AssetRef::load(assets, AssetKind::Font, &data.font_path),
            text: data.text.clone(),
            font_size: data.font_size,
            font_resolution: data.font_resolution,
            line_spacing: data.line_spacing,
            horizontal_text_alignment: data.horizontal_text_alignment,
            vertical_text_alignment: data.vertical_text_alignment,
            word_wrap: data.word_wrap,
        }
    }
}

impl Restore for Button {
    type Data = ButtonData;

    fn restore(data: &ButtonData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            layout: layout(&data.ui),
            textures: textures(
                assets,
                &data.tex_normal_path,
                &data.tex_hover_path,
                &data.tex_active_path,
                &data.tex_disabled_path,
            ),
            col_hover: (&data.col_hover).into(),
            col_active: (&data.col_active).into(),
            col_disabled: (&data.col_disabled).into(),
            image_type: data.image_type,
            interactable: data.interactable,
        }
    }
}

impl Restore for Mask {
    type Data = MaskData;

    fn restore(data: &MaskData, _: &mut dyn AssetLoader) -> Self {
        Self { layout: layout(&data.ui) }
    }
}

impl Restore for TextInput {
    type Data = TextInputData;

    fn restore(data: &TextInputData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            layout: layout(&data.ui),
            font: AssetRef::load(assets, AssetKind::Font, &data.font_path),
            textures: textures(
                assets,
                &data.tex_normal_path,
                &data.tex_hover_path,
                &data.tex_active_path,
                &data.tex_disabled_path,
            ),
            col_hover: (&data.col_hover).into(),
            col_active: (&data.col_active).into(),
            col_disabled: (&data.col_disabled).into(),
            col_text: (&data.col_text).into(),
            col_placeholder: (&data.col_placeholder).into(),
            image_type: data.image_type,
            text: data.text.clone(),
            placeholder: data.placeholder.clone(),
            multiline: data.multiline,
            font_size: data.font_size,
            font_resolution: data.font_resolution,
            line_spacing: data.line_spacing,
            padding: (&data.padding).into(),
            horizontal_text_alignment: data.horizontal_text_alignment,
            vertical_text_alignment: data.vertical_text_alignment,
            word_wrap: data.word_wrap,
            interactable: data.interactable,
        }
    }
}

impl Restore for Terrain {
    type Data = TerrainData;

    fn restore(data: &TerrainData, assets: &mut dyn AssetLoader) -> Self {
        Self { data: AssetRef::load(assets, AssetKind::TerrainData, &data.file_path) }
    }
}

impl ParticleEmitter {
    fn from_data(data: &ParticleEmitterData, assets: &mut dyn AssetLoader) -> Self {
        let mut modifiers = Vec::new();
        modifiers.extend(data.gravity_modifiers.iter().map(|m| ParticleModifier::Gravity {
            start_time: m.start_time,
            gravity: (&m.gravity).into(),
            damping: m.damping,
        }));
        modifiers.extend(data.color_modifiers.iter().map(|m| ParticleModifier::Color {
            start_time: m.start_time,
            keys: m.times.iter().zip(&m.colors).map(|(time, color)| (*time, color.into())).collect(),
        }));
        modifiers.extend(data.size_modifiers.iter().map(|m| ParticleModifier::Size {
            start_time: m.start_time,
            keys: m.times.iter().copied().zip(m.sizes.iter().copied()).collect(),
        }));
        modifiers.extend(data.direction_modifiers.iter().map(|m| ParticleModifier::Direction {
            start_time: m.start_time,
            random_min: (&m.random_direction_min).into(),
            random_max: (&m.random_direction_max).into(),
            constant: (&m.constant_direction).into(),
            change_interval: m.change_interval,
            direction_type: m.direction_type,
        }));
        modifiers.extend(data.rotation_modifiers.iter().map(|m| ParticleModifier::Rotation {
            start_time: m.start_time,
            random_min: (&m.random_rotation_min).into(),
            random_max: (&m.random_rotation_max).into(),
            constant: (&m.constant_rotation).into(),
            offset: (&m.offset).into(),
            change_interval: m.change_interval,
            rotation_type: m.rotation_type,
        }));
        modifiers.extend(data.speed_modifiers.iter().map(|m| ParticleModifier::Speed {
            start_time: m.start_time,
            constant: m.constant_speed,
            random_min: m.random_speed_min,
            random_max: m.random_speed_max,
            change_interval: m.change_interval,
            speed_type: m.speed_type,
        }));
        Self {
            material: AssetRef::load(assets, AssetKind::Material, &data.material),
            simulation_space: data.simulation_space,
            render_type: data.render_type,
            origin: data.origin,
            shape: data.shape,
            radius: data.radius,
            size: (&data.size).into(),
            time_scale: data.time_scale,
            emission_rate: data.emission_rate,
            emission_count: data.emission_count,
            duration: data.duration,
            max_particles: data.max_particles,
            start_size_min: data.start_size_min,
            start_size_max: data.start_size_max,
            life_time_min: data.life_time_min,
            life_time_max: data.life_time_max,
            start_speed: data.start_speed,
            start_direction: (&data.start_direction).into(),
            looped: data.looped,
            enable_physics: data.enable_physics,
            bounciness: data.bounciness,
            friction: data.friction,
            modifiers,
            animated: data.animated,
            animation_grid_size: (&data.animation_grid_size).into(),
            animation_time_mode: data.animation_time_mode,
            animation_fps: data.animation_fps,
        }
    }
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self::from_data(&ParticleEmitterData::default(), &mut NoAssets)
    }
}

impl Restore for ParticleSystem {
    type Data = ParticleSystemData;

    fn restore(data: &ParticleSystemData, assets: &mut dyn AssetLoader) -> Self {
        Self {
            cast_shadows: data.cast_shadows,
            play_at_start: data.play_at_start,
            emitters: data.emitters.iter().map(|emitter| ParticleEmitter::from_data(emitter, assets)).collect(),
        }
    }
}

impl Restore for Water {
    type Data = WaterData;

    fn restore(data: &WaterData, _: &mut dyn AssetLoader) -> Self {
        let material = Asset::in_memory(AssetKind::Material, "", AssetPayload::Material(data.material.clone()));
        Self {
            size: data.size,
            reflections: data.reflections,
            reflect_skybox: data.reflect_skybox,
            reflect_objects: data.reflect_objects,
            reflections_distance: data.reflections_distance,
            reflections_quality: data.reflections_quality,
            material: Arc::new(material),
        }
    }
}

impl Restore for Spline {
    type Data = SplineData;

    fn restore(data: &SplineData, _: &mut dyn AssetLoader) -> Self {
        Self { points: data.points.iter().map(Vec3::from).collect(), closed: data.closed }
    }
}

impl Restore for CsgBrush {
    type Data = CsgBrushData;

    fn restore(data: &CsgBrushData, assets: &mut dyn AssetLoader) -> Self {
        let faces = data
            .faces
            .iter()
            .map(|face| CsgFace {
                indices: face.indices.clone(),
                tex_coords: face.tex_coords.iter().map(Into::into).collect(),
                tex_coords_scale: (&face.tex_coords_scale).into(),
                tex_coords_offset: (&face.tex_coords_offset).into(),
                tex_coords_rotation: face.tex_coords_rotation,
                material: AssetRef::load(assets, AssetKind::Material, &face.material),
                smooth_normals: face.smooth_normals,
            })
            .collect();
        Self {
            brush_type: data.brush_type,
            operation: CsgOperation::from_index(data.brush_operation),
            cast_shadows: data.cast_shadows,
            segments: data.segments,
            stacks: data.stacks,
            vertices: data.vertices.iter().map(Vec3::from).collect(),
            faces,
        }
    }
}

impl Restore for CsgModel {
    type Data = CsgModelData;

    fn restore(_: &CsgModelData, _: &mut dyn AssetLoader) -> Self {
        CsgModel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::scripting::ScriptFieldData;

    struct CountingLoader(usize);

    impl AssetLoader for CountingLoader {
        fn load(&mut self, _: AssetKind, _: &str) -> Option<AssetHandle> {
            self.0 += 1;
            None
        }
    }

    #[test]
    fn components_are_reordered_by_saved_index() {
        let mut data = GameObjectData { name: "player".into(), guid: "p".into(), ..Default::default() };
        data.scripts.push(ScriptData {
            component: ComponentHeader::new(true, 2),
            class_name: "Controller".into(),
            ..Default::default()
        });
        data.rigid_bodies.push(RigidBodyData { component: ComponentHeader::new(true, 0), ..Default::default() });
        data.box_colliders.push(BoxColliderData { component: ComponentHeader::new(false, 1), ..Default::default() });

        let mut ecs = EcsWorld::new();
        let entity = ecs.spawn_entity("", Some("p"));
        ecs.load_object(&data, entity, &mut NoAssets);

        let kinds: Vec<_> = ecs.components(entity).iter().map(|slot| slot.component.component_type()).collect();
        assert_eq!(kinds, vec![ComponentType::RigidBody, ComponentType::BoxCollider, ComponentType::Script]);
        assert!(!ecs.components(entity)[1].enabled);
        assert_eq!(ecs.name(entity), Some("player"));
    }

    #[test]
    fn object_fields_keep_their_guid() {
        let mut script = ScriptData::default();
        script.fields.push(ScriptFieldData {
            field_name: "target".into(),
            field_type: "GameObject".into(),
            object_value: "enemy".into(),
            ..Default::default()
        });
        let restored = Script::restore(&script, &mut NoAssets);
        assert_eq!(restored.field("target").map(|field| field.object.guid.as_str()), Some("enemy"));
    }

    #[test]
    fn empty_asset_names_are_still_offered_to_the_loader() {
        let mut loader = CountingLoader(0);
        let renderer = MeshRenderer::restore(&MeshRendererData::default(), &mut loader);
        assert_eq!(loader.0, 1);
        assert!(!renderer.mesh.is_loaded());
    }

    #[test]
    fn camera_mask_round_trips_through_layer_list() {
        let camera = Camera { culling_mask: 0b101, ..Default::default() };
        let data = super::super::capture::Capture::capture(&camera, ComponentHeader::default());
        assert_eq!(&data.culling_mask[..3], &[1, 0, 1]);
        let restored = Camera::restore(&data, &mut NoAssets);
        assert_eq!(restored.culling_mask, 0b101);
    }

    #[test]
    fn defaults_follow_record_defaults() {
        let body = RigidBody::default();
        assert_eq!(body.gravity, Vec3::new(0.0, -9.81, 0.0));
        let camera = Camera::default();
        assert_eq!(camera.culling_mask, u32::MAX);
    }
}
