//! Live graph to records, one entity at a time.

use super::components::*;
use super::types::StaticFlags;
use super::world::EcsWorld;
use crate::schema::csg::{CsgBrushData, CsgFaceData, CsgModelData};
use crate::schema::media::{AudioListenerData, AudioSourceData, VideoPlayerData};
use crate::schema::navigation::{NavMeshAgentData, NavMeshObstacleData};
use crate::schema::particles::*;
use crate::schema::physics::*;
use crate::schema::rendering::*;
use crate::schema::scripting::{ScriptData, ScriptFieldData};
use crate::schema::settings::MAX_LAYERS;
use crate::schema::terrain::TerrainData;
use crate::schema::ui::*;
use crate::schema::{ComponentHeader, GameObjectData, UiElementHeader};
use bevy_ecs::prelude::Entity;

/// Conversion of a live component into its record.
pub(crate) trait Capture {
    type Data;

    fn capture(&self, component: ComponentHeader) -> Self::Data;
}

macro_rules! define_capture_dispatch {
    ($($variant:ident: $data:ty => $field:ident),* $(,)?) => {
        fn capture_component(component: &SceneComponent, header: ComponentHeader, data: &mut GameObjectData) {
            match component {
                $(SceneComponent::$variant(inner) => {
                    let record: $data = inner.capture(header);
                    data.$field.push(record);
                })*
            }
        }
    };
}
with_component_table!(define_capture_dispatch);

impl EcsWorld {
    /// Builds the record of one entity. Entities marked non-serializable
    /// yield `None`.
    pub fn save_object(&self, entity: Entity) -> Option<GameObjectData> {
        if !self.is_serializable(entity) {
            return None;
        }
        let guid = self.guid(entity)?.to_string();
        let transform = self.transform(entity).unwrap_or_default();
        let state = self.state(entity).unwrap_or_default();
        let parent_guid = self.parent(entity).and_then(|parent| self.guid(parent)).unwrap_or_default().to_string();

        let mut data = GameObjectData {
            enabled: state.enabled,
            name: self.name(entity).unwrap_or_default().to_string(),
            guid,
            parent_guid,
            position: transform.position.into(),
            rotation: transform.rotation.into(),
            scale: transform.scale.into(),
            navigation_static: state.static_flags.contains(StaticFlags::NAVIGATION),
            lighting_static: state.static_flags.contains(StaticFlags::LIGHTING),
            batching_static: state.static_flags.contains(StaticFlags::BATCHING),
            tag: state.tag,
            layer: state.layer,
            occlusion_static: state.static_flags.contains(StaticFlags::OCCLUSION),
            ..Default::default()
        };
        for (index, slot) in self.components(entity).iter().enumerate() {
            capture_component(&slot.component, ComponentHeader::new(slot.enabled, index), &mut data);
        }
        Some(data)
    }
}

fn ui_header(layout: &UiLayout, component: ComponentHeader) -> UiElementHeader {
    UiElementHeader {
        component,
        anchor: layout.anchor.into(),
        color: layout.color.into(),
        size: layout.size.into(),
        horizontal_alignment: layout.horizontal_alignment,
        vertical_alignment: layout.vertical_alignment,
        raycast_target: layout.raycast_target,
    }
}

fn names(assets: &[AssetRef]) -> Vec<String> {
    assets.iter().map(|asset| asset.name.clone()).collect()
}

impl Capture for MeshRenderer {
    type Data = MeshRendererData;

    fn capture(&self, component: ComponentHeader) -> MeshRendererData {
        MeshRendererData {
            component,
            mesh: self.mesh.name.clone(),
            mesh_source_file: self.mesh_source_file.clone(),
            root_object_guid: self.root_object.guid.clone(),
            materials: names(&self.materials),
            cast_shadows: self.cast_shadows,
            lightmap_size: self.lightmap_size,
            lod_max_distance: self.lod_max_distance,
            cull_over_max_distance: self.cull_over_max_distance,
            ..Default::default()
        }
    }
}

impl Capture for DecalRenderer {
    type Data = DecalRendererData;

    fn capture(&self, component: ComponentHeader) -> DecalRendererData {
        DecalRendererData { component, material: self.material.name.clone(), ..Default::default() }
    }
}

impl Capture for Light {
    type Data = LightData;

    fn capture(&self, component: ComponentHeader) -> LightData {
        LightData {
            component,
            color: self.color.into(),
            intensity: self.intensity,
            light_type: self.light_type,
            render_mode: self.render_mode,
            radius: self.radius,
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            bias: self.bias,
            cast_shadows: self.cast_shadows,
            ..Default::default()
        }
    }
}

impl Capture for Camera {
    type Data = CameraData;

    fn capture(&self, component: ComponentHeader) -> CameraData {
        CameraData {
            component,
            fov_y: self.fov_y,
            z_near: self.z_near,
            z_far: self.z_far,
            viewport_left: self.viewport.x,
            viewport_top: self.viewport.y,
            viewport_width: self.viewport.z,
            viewport_height: self.viewport.w,
            depth: self.depth,
            clear_color: self.clear_color.into(),
            clear_flags: self.clear_flags,
            projection_type: self.projection_type,
            orthographic_size: self.orthographic_size,
            occlusion_culling: self.occlusion_culling,
            culling_mask: (0..MAX_LAYERS).map(|layer| i32::from(self.culling_mask & (1 << layer) != 0)).collect(),
            ..Default::default()
        }
    }
}

impl Capture for Animation {
    type Data = AnimationData;

    fn capture(&self, component: ComponentHeader) -> AnimationData {
        let clips = self
            .clips
            .iter()
            .map(|slot| AnimationClipInfoData {
                clip_path: slot.clip.name.clone(),
                name: slot.name.clone(),
                speed: slot.speed,
                start_frame: slot.start_frame,
                end_frame: slot.end_frame,
                looped: slot.looped,
                ..Default::default()
            })
            .collect();
        AnimationData { component, clips, ..Default::default() }
    }
}

impl Capture for RigidBody {
    type Data = RigidBodyData;

    fn capture(&self, component: ComponentHeader) -> RigidBodyData {
        RigidBodyData {
            component,
            mass: self.mass,
            freeze_position_x: self.freeze_position.x,
            freeze_position_y: self.freeze_position.y,
            freeze_position_z: self.freeze_position.z,
            freeze_rotation_x: self.freeze_rotation.x,
            freeze_rotation_y: self.freeze_rotation.y,
            freeze_rotation_z: self.freeze_rotation.z,
            is_kinematic: self.is_kinematic,
            is_static: self.is_static,
            use_own_gravity: self.use_own_gravity,
            gravity: self.gravity.into(),
            friction: self.friction,
            bounciness: self.bounciness,
            linear_damping: self.linear_damping,
            angular_damping: self.angular_damping,
            ..Default::default()
        }
    }
}

impl Capture for BoxCollider {
    type Data = BoxColliderData;

    fn capture(&self, component: ComponentHeader) -> BoxColliderData {
        BoxColliderData {
            component,
            box_size: self.size.into(),
            offset: self.offset.into(),
            rotation: self.rotation.into(),
            is_trigger: self.is_trigger,
            ..Default::default()
        }
    }
}

impl Capture for CapsuleCollider {
    type Data = CapsuleColliderData;

    fn capture(&self, component: ComponentHeader) -> CapsuleColliderData {
        CapsuleColliderData {
            component,
            radius: self.radius,
            height: self.height,
            offset: self.offset.into(),
            rotation: self.rotation.into(),
            is_trigger: self.is_trigger,
            ..Default::default()
        }
    }
}

impl Capture for SphereCollider {
    type Data = SphereColliderData;

    fn capture(&self, component: ComponentHeader) -> SphereColliderData {
        SphereColliderData {
            component,
            radius: self.radius,
            offset: self.offset.into(),
            is_trigger: self.is_trigger,
            ..Default::default()
        }
    }
}

impl Capture for MeshCollider {
    type Data = MeshColliderData;

    fn capture(&self, component: ComponentHeader) -> MeshColliderData {
        MeshColliderData { component, convex: self.convex, is_trigger: self.is_trigger, ..Default::default() }
    }
}

impl Capture for TerrainCollider {
    type Data = TerrainColliderData;

    fn capture(&self, component: ComponentHeader) -> TerrainColliderData {
        TerrainColliderData { component, is_trigger: self.is_trigger, ..Default::default() }
    }
}

impl Capture for Vehicle {
    type Data = VehicleData;

    fn capture(&self, component: ComponentHeader) -> VehicleData {
        let wheels = self
            .wheels
            .iter()
            .map(|wheel| WheelInfoData {
                connected_object_guid: wheel.connected_object.guid.clone(),
                radius: wheel.radius,
                width: wheel.width,
                suspension_stiffness: wheel.suspension_stiffness,
                suspension_damping: wheel.suspension_damping,
                suspension_compression: wheel.suspension_compression,
                suspension_rest_length: wheel.suspension_rest_length,
                friction: wheel.friction,
                roll_influence: wheel.roll_influence,
                direction: wheel.direction.into(),
                axle: wheel.axle.into(),
                connection_point: wheel.connection_point.into(),
                is_front_wheel: wheel.is_front_wheel,
                ..Default::default()
            })
            .collect();
        VehicleData {
            component,
            vehicle_axis: self.axis.into(),
            invert_forward: self.invert_forward,
            wheels,
            ..Default::default()
        }
    }
}

impl Capture for FixedJoint {
    type Data = FixedJointData;

    fn capture(&self, component: ComponentHeader) -> FixedJointData {
        FixedJointData {
            component,
            connected_object_guid: self.link.connected_object.guid.clone(),
            anchor: self.link.anchor.into(),
            connected_anchor: self.link.connected_anchor.into(),
            linked_bodies_collision: self.link.linked_bodies_collision,
            ..Default::default()
        }
    }
}

impl Capture for FreeJoint {
    type Data = FreeJointData;

    fn capture(&self, component: ComponentHeader) -> FreeJointData {
        FreeJointData {
            component,
            connected_object_guid: self.link.connected_object.guid.clone(),
            anchor: self.link.anchor.into(),
            connected_anchor: self.link.connected_anchor.into(),
            linked_bodies_collision: self.link.linked_bodies_collision,
            limit_min: self.limit_min.into(),
            limit_max: self.limit_max.into(),
            ..Default::default()
        }
    }
}

impl Capture for HingeJoint {
    type Data = HingeJointData;

    fn capture(&self, component: ComponentHeader) -> HingeJointData {
        HingeJointData {
            component,
            connected_object_guid: self.link.connected_object.guid.clone(),
            anchor: self.link.anchor.into(),
            connected_anchor: self.link.connected_anchor.into(),
            linked_bodies_collision: self.link.linked_bodies_collision,
            limit_min: self.limit_min,
            limit_max: self.limit_max,
            axis: self.axis.into(),
            ..Default::default()
        }
    }
}

impl Capture for ConeTwistJoint {
    type Data = ConeTwistJointData;

    fn capture(&self, component: ComponentHeader) -> ConeTwistJointData {
        ConeTwistJointData {
            component,
            connected_object_guid: self.link.connected_object.guid.clone(),
            anchor: self.link.anchor.into(),
            connected_anchor: self.link.connected_anchor.into(),
            linked_bodies_collision: self.link.linked_bodies_collision,
            limits: self.limits.into(),
            ..Default::default()
        }
    }
}

impl Capture for AudioListener {
    type Data = AudioListenerData;

    fn capture(&self, component: ComponentHeader) -> AudioListenerData {
        AudioListenerData { component, volume: self.volume, ..Default::default() }
    }
}

impl Capture for AudioSource {
    type Data = AudioSourceData;

    fn capture(&self, component: ComponentHeader) -> AudioSourceData {
        AudioSourceData {
            component,
            file_name: self.clip.name.clone(),
            play_on_start: self.play_on_start,
            looped: self.looped,
            volume: self.volume,
            pitch: self.pitch,
            min_distance: self.min_distance,
            max_distance: self.max_distance,
            is_2d: self.is_2d,
            ..Default::default()
        }
    }
}

impl Capture for VideoPlayer {
    type Data = VideoPlayerData;

    fn capture(&self, component: ComponentHeader) -> VideoPlayerData {
        VideoPlayerData {
            component,
            video_clip: self.clip.name.clone(),
            play_on_start: self.play_on_start,
            looped: self.looped,
            ..Default::default()
        }
    }
}

impl Capture for NavMeshAgent {
    type Data = NavMeshAgentData;

    fn capture(&self, component: ComponentHeader) -> NavMeshAgentData {
        NavMeshAgentData {
            component,
            radius: self.radius,
            height: self.height,
            speed: self.speed,
            acceleration: self.acceleration,
            rotation_speed: self.rotation_speed,
            ..Default::default()
        }
    }
}

impl Capture for NavMeshObstacle {
    type Data = NavMeshObstacleData;

    fn capture(&self, component: ComponentHeader) -> NavMeshObstacleData {
        NavMeshObstacleData { component, size: self.size.into(), offset: self.offset.into(), ..Default::default() }
    }
}

impl Capture for Script {
    type Data = ScriptData;

    fn capture(&self, component: ComponentHeader) -> ScriptData {
        let fields = self
            .fields
            .iter()
            .map(|field| ScriptFieldData {
                field_name: field.name.clone(),
                field_type: field.field_type.clone(),
                string_value: field.string_value.clone(),
                bool_value: field.bool_value,
                int_value: field.int_value,
                float_value: field.float_value,
                object_value: field.object.guid.clone(),
                vec2_value: field.vec2_value.into(),
                vec3_value: field.vec3_value.into(),
                vec4_value: field.vec4_value.into(),
                string_array_value: field.string_array_value.clone(),
                ..Default::default()
            })
            .collect();
        ScriptData { component, class_name: self.class_name.clone(), fields, ..Default::default() }
    }
}

impl Capture for Canvas {
    type Data = CanvasData;

    fn capture(&self, component: ComponentHeader) -> CanvasData {
        CanvasData {
            component,
            ref_screen_width: self.ref_screen_width,
            ref_screen_height: self.ref_screen_height,
            screen_match_side: self.screen_match_side,
            mode: self.mode,
            ..Default::default()
        }
    }
}

impl Capture for Image {
    type Data = ImageData;

    fn capture(&self, component: ComponentHeader) -> ImageData {
        ImageData {
            ui: ui_header(&self.layout, component),
            texture_path: self.texture.name.clone(),
            image_type: self.image_type,
            ..Default::default()
        }
    }
}

impl Capture for Text {
    type Data = TextData;

    fn capture(&self, component: ComponentHeader) -> TextData {
        TextData {
            ui: ui_header(&self.layout, component),
            font_path: self.font.name.clone(),
            text: self.text.clone(),
            font_size: self.font_size,
            font_resolution: self.font_resolution,
            line_spacing: self.line_spacing,
            horizontal_text_alignment: self.horizontal_text_alignment,
            vertical_text_alignment: self.vertical_text_alignment,
            word_wrap: self.word_wrap,
            ..Default::default()
        }
    }
}

impl Capture for Button {
    type Data = ButtonData;

    fn capture(&self, component: ComponentHeader) -> ButtonData {
        ButtonData {
            ui: ui_header(&self.layout, component),
            tex_normal_path: self.textures.normal.name.clone(),
            tex_hover_path: self.textures.hover.name.clone(),
            tex_active_path: self.textures.active.name.clone(),
            tex_disabled_path: self.textures.disabled.name.clone(),
            col_hover: self.col_hover.into(),
            col_active: self.col_active.into(),
            col_disabled: self.col_disabled.into(),
            image_type: self.image_type,
            interactable: self.interactable,
            ..Default::default()
        }
    }
}

impl Capture for Mask {
    type Data = MaskData;

    fn capture(&self, component: ComponentHeader) -> MaskData {
        MaskData { ui: ui_header(&self.layout, component), ..Default::default() }
    }
}

impl Capture for TextInput {
    type Data = TextInputData;

    fn capture(&self, component: ComponentHeader) -> TextInputData {
        TextInputData {
            ui: ui_header(&self.layout, component),
            font_path: self.font.name.clone(),
            tex_normal_path: self.textures.normal.name.clone(),
            tex_hover_path: self.textures.hover.name.clone(),
            tex_active_path: self.textures.active.name.clone(),
            tex_disabled_path: self.textures.disabled.name.clone(),
            col_hover: self.col_hover.into(),
            col_active: self.col_active.into(),
            col_disabled: self.col_disabled.into(),
            col_text: self.col_text.into(),
            col_placeholder: self.col_placeholder.into(),
            image_type: self.image_type,
            text: self.text.clone(),
            placeholder: self.placeholder.clone(),
            multiline: self.multiline,
            font_size: self.font_size,
            font_resolution: self.font_resolution,
            line_spacing: self.line_spacing,
            padding: self.padding.into(),
            horizontal_text_alignment: self.horizontal_text_alignment,
            vertical_text_alignment: self.vertical_text_alignment,
            word_wrap: self.word_wrap,
            interactable: self.interactable,
            ..Default::default()
        }
    }
}

impl Capture for Terrain {
    type Data = TerrainData;

    fn capture(&self, component: ComponentHeader) -> TerrainData {
        TerrainData { component, file_path: self.data.name.clone(), ..Default::default() }
    }
}

impl ParticleEmitter {
    fn to_data(&self) -> ParticleEmitterData {
        let mut data = ParticleEmitterData {
            material: self.material.name.clone(),
            simulation_space: self.simulation_space,
            render_type: self.render_type,
            origin: self.origin,
            shape: self.shape,
            radius: self.radius,
            size: self.size.into(),
            time_scale: self.time_scale,
            emission_rate: self.emission_rate,
            emission_count: self.emission_count,
            duration: self.duration,
            max_particles: self.max_particles,
            start_size_min: self.start_size_min,
            start_size_max: self.start_size_max,
            life_time_min: self.life_time_min,
            life_time_max: self.life_time_max,
            start_speed: self.start_speed,
            start_direction: self.start_direction.into(),
            looped: self.looped,
            enable_physics: self.enable_physics,
            bounciness: self.bounciness,
            friction: self.friction,
            animated: self.animated,
            animation_grid_size: self.animation_grid_size.into(),
            animation_time_mode: self.animation_time_mode,
            animation_fps: self.animation_fps,
            ..Default::default()
        };
        for modifier in &self.modifiers {
            match modifier {
                ParticleModifier::Gravity { start_time, gravity, damping } => {
                    data.gravity_modifiers.push(GravityModifierData {
                        start_time: *start_time,
                        gravity: (*gravity).into(),
                        damping: *damping,
                        ..Default::default()
                    });
                }
                ParticleModifier::Color { start_time, keys } => {
                    data.color_modifiers.push(ColorModifierData {
                        start_time: *start_time,
                        times: keys.iter().map(|(time, _)| *time).collect(),
                        colors: keys.iter().map(|(_, color)| (*color).into()).collect(),
                        ..Default::default()
                    });
                }
                ParticleModifier::Size { start_time, keys } => {
                    data.size_modifiers.push(SizeModifierData {
                        start_time: *start_time,
                        times: keys.iter().map(|(time, _)| *time).collect(),
                        sizes: keys.iter().map(|(_, size)| *size).collect(),
                        ..Default::default()
                    });
                }
                ParticleModifier::Direction {
                    start_time,
                    random_min,
                    random_max,
                    constant,
                    change_interval,
                    direction_type,
                } => {
                    data.direction_modifiers.push(DirectionModifierData {
                        start_time: *start_time,
                        random_direction_min: (*random_min).into(),
                        random_direction_max: (*random_max).into(),
                        constant_direction: (*constant).into(),
                        change_interval: *change_interval,
                        direction_type: *direction_type,
                        ..Default::default()
                    });
                }
                ParticleModifier::Rotation {
                    start_time,
                    random_min,
                    random_max,
                    constant,
                    offset,
                    change_interval,
                    rotation_type,
                } => {
                    data.rotation_modifiers.push(RotationModifierData {
                        start_time: *start_time,
                        random_rotation_min: (*random_min).into(),
                        random_rotation_max: (*random_max).into(),
                        constant_rotation: (*constant).into(),
                        offset: (*offset).into(),
                        change_interval: *change_interval,
                        rotation_type: *rotation_type,
                        ..Default::default()
                    });
                }
                ParticleModifier::Speed { start_time, constant, random_min, random_max, change_interval, speed_type } => {
                    data.speed_modifiers.push(SpeedModifierData {
                        start_time: *start_time,
                        constant_speed: *constant,
                        random_speed_min: *random_min,
                        random_speed_max: *random_max,
                        change_interval: *change_interval,
                        speed_type: *speed_type,
                        ..Default::default()
                    });
                }
            }
        }
        data
    }
}

impl Capture for ParticleSystem {
    type Data = ParticleSystemData;

    fn capture(&self, component: ComponentHeader) -> ParticleSystemData {
        ParticleSystemData {
            component,
            cast_shadows: self.cast_shadows,
            play_at_start: self.play_at_start,
            emitters: self.emitters.iter().map(ParticleEmitter::to_data).collect(),
            ..Default::default()
        }
    }
}

impl Capture for Water {
    type Data = WaterData;

    fn capture(&self, component: ComponentHeader) -> WaterData {
        WaterData {
            component,
            size: self.size,
            reflections: self.reflections,
            reflect_skybox: self.reflect_skybox,
            reflect_objects: self.reflect_objects,
            reflections_distance: self.reflections_distance,
            reflections_quality: self.reflections_quality,
            material: self.material.material().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }
}

impl Capture for Spline {
    type Data = SplineData;

    fn capture(&self, component: ComponentHeader) -> SplineData {
        SplineData {
            component,
            points: self.points.iter().map(|point| (*point).into()).collect(),
            closed: self.closed,
            ..Default::default()
        }
    }
}

impl Capture for CsgBrush {
    type Data = CsgBrushData;

    fn capture(&self, component: ComponentHeader) -> CsgBrushData {
        let faces = self
            .faces
            .iter()
            .map(|face| CsgFaceData {
                indices: face.indices.clone(),
                tex_coords: face.tex_coords.iter().map(|uv| (*uv).into()).collect(),
                tex_coords_scale: face.tex_coords_scale.into(),
                tex_coords_offset: face.tex_coords_offset.into(),
                tex_coords_rotation: face.tex_coords_rotation,
                material: face.material.name.clone(),
                smooth_normals: face.smooth_normals,
                ..Default::default()
            })
            .collect();
        CsgBrushData {
            component,
            brush_type: self.brush_type,
            brush_operation: self.operation.index(),
            cast_shadows: self.cast_shadows,
            segments: self.segments,
            stacks: self.stacks,
            vertices: self.vertices.iter().map(|vertex| (*vertex).into()).collect(),
            faces,
            ..Default::default()
        }
    }
}

impl Capture for CsgModel {
    type Data = CsgModelData;

    fn capture(&self, component: ComponentHeader) -> CsgModelData {
        CsgModelData { component, ..Default::default() }
    }
}
