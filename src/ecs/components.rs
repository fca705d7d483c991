//! Live component kinds and the lifecycle hooks the scene pipeline drives.

use super::types::{Children, EntityGuid, EntityName, GuidIndex};
use crate::assets::{Asset, AssetHandle, AssetKind, AssetLoader};
use crate::schema::NO_OBJECT;
use bevy_ecs::prelude::*;
use glam::{BVec3, Quat, Vec2, Vec3, Vec4};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Invokes `$callback!` with every component kind as
/// `Variant: RecordType => record_list_field`, in the order the game object
/// record declares its lists.
macro_rules! with_component_table {
    ($callback:ident) => {
        $callback! {
            MeshRenderer: $crate::schema::rendering::MeshRendererData => mesh_renderers,
            Light: $crate::schema::rendering::LightData => lights,
            Camera: $crate::schema::rendering::CameraData => cameras,
            Animation: $crate::schema::rendering::AnimationData => animations,
            RigidBody: $crate::schema::physics::RigidBodyData => rigid_bodies,
            BoxCollider: $crate::schema::physics::BoxColliderData => box_colliders,
            CapsuleCollider: $crate::schema::physics::CapsuleColliderData => capsule_colliders,
            MeshCollider: $crate::schema::physics::MeshColliderData => mesh_colliders,
            SphereCollider: $crate::schema::physics::SphereColliderData => sphere_colliders,
            Vehicle: $crate::schema::physics::VehicleData => vehicles,
            FixedJoint: $crate::schema::physics::FixedJointData => fixed_joints,
            FreeJoint: $crate::schema::physics::FreeJointData => free_joints,
            HingeJoint: $crate::schema::physics::HingeJointData => hinge_joints,
            AudioListener: $crate::schema::media::AudioListenerData => audio_listeners,
            AudioSource: $crate::schema::media::AudioSourceData => audio_sources,
            NavMeshAgent: $crate::schema::navigation::NavMeshAgentData => nav_mesh_agents,
            NavMeshObstacle: $crate::schema::navigation::NavMeshObstacleData => nav_mesh_obstacles,
            Script: $crate::schema::scripting::ScriptData => scripts,
            Canvas: $crate::schema::ui::CanvasData => canvases,
            Image: $crate::schema::ui::ImageData => images,
            Text: $crate::schema::ui::TextData => texts,
            Button: $crate::schema::ui::ButtonData => buttons,
            Terrain: $crate::schema::terrain::TerrainData => terrains,
            ParticleSystem: $crate::schema::particles::ParticleSystemData => particle_systems,
            TerrainCollider: $crate::schema::physics::TerrainColliderData => terrain_colliders,
            ConeTwistJoint: $crate::schema::physics::ConeTwistJointData => cone_twist_joints,
            Water: $crate::schema::rendering::WaterData => waters,
            Mask: $crate::schema::ui::MaskData => masks,
            Spline: $crate::schema::rendering::SplineData => splines,
            VideoPlayer: $crate::schema::media::VideoPlayerData => video_players,
            CsgBrush: $crate::schema::csg::CsgBrushData => csg_brushes,
            TextInput: $crate::schema::ui::TextInputData => text_inputs,
            CsgModel: $crate::schema::csg::CsgModelData => csg_models,
            DecalRenderer: $crate::schema::rendering::DecalRendererData => decals,
        }
    };
}
pub(crate) use with_component_table;

macro_rules! define_components {
    ($($variant:ident: $data:ty => $field:ident),* $(,)?) => {
        /// A live component of any kind the scene format knows about.
        #[derive(Debug, Clone, PartialEq)]
        pub enum SceneComponent {
            $($variant($variant),)*
        }

        /// Runtime type tag of a [`SceneComponent`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComponentType {
            $($variant,)*
        }

        impl ComponentType {
            pub const ALL: &'static [ComponentType] = &[$(ComponentType::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(ComponentType::$variant => stringify!($variant),)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $(stringify!($variant) => Some(ComponentType::$variant),)*
                    _ => None,
                }
            }
        }

        impl SceneComponent {
            pub fn component_type(&self) -> ComponentType {
                match self {
                    $(SceneComponent::$variant(_) => ComponentType::$variant,)*
                }
            }
        }

        $(
            impl From<$variant> for SceneComponent {
                fn from(component: $variant) -> Self {
                    SceneComponent::$variant(component)
                }
            }

            impl ComponentKind for $variant {
                const TYPE: ComponentType = ComponentType::$variant;

                fn of(component: &SceneComponent) -> Option<&Self> {
                    match component {
                        SceneComponent::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn of_mut(component: &mut SceneComponent) -> Option<&mut Self> {
                    match component {
                        SceneComponent::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}
with_component_table!(define_components);

/// Typed access to one variant of [`SceneComponent`].
pub trait ComponentKind: Into<SceneComponent> {
    const TYPE: ComponentType;

    fn of(component: &SceneComponent) -> Option<&Self>;

    fn of_mut(component: &mut SceneComponent) -> Option<&mut Self>;
}

/// Script fields of these types hold a GUID instead of a plain value.
pub fn is_object_field_type(field_type: &str) -> bool {
    field_type == "GameObject" || ComponentType::from_name(field_type).is_some()
}

/// A reference to another entity, stored by GUID and resolved after the
/// whole graph exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub guid: String,
    pub entity: Option<Entity>,
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self { guid: NO_OBJECT.to_string(), entity: None }
    }
}

impl ObjectRef {
    pub fn from_guid(guid: &str) -> Self {
        if guid.is_empty() {
            return Self::default();
        }
        Self { guid: guid.to_string(), entity: None }
    }

    pub fn to(guid: &str, entity: Entity) -> Self {
        Self { guid: guid.to_string(), entity: Some(entity) }
    }

    pub fn is_none(&self) -> bool {
        self.guid.is_empty() || self.guid == NO_OBJECT
    }

    /// Points the reference at `new_guid` if it named `old_guid`. The live
    /// entity is dropped until the next resolve.
    pub fn rebind(&mut self, old_guid: &str, new_guid: &str) {
        if !self.is_none() && self.guid == old_guid {
            self.guid = new_guid.to_string();
            self.entity = None;
        }
    }

    pub fn resolve(&mut self, index: &GuidIndex) {
        self.entity = if self.is_none() { None } else { index.get(&self.guid) };
    }
}

/// A named asset reference. The name survives even when the asset is
/// missing so the reference is written back on the next save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetRef {
    pub name: String,
    pub handle: Option<AssetHandle>,
}

impl AssetRef {
    pub fn load(assets: &mut dyn AssetLoader, kind: AssetKind, name: &str) -> Self {
        Self { name: name.to_string(), handle: assets.load(kind, name) }
    }

    pub fn loaded(handle: AssetHandle) -> Self {
        Self { name: handle.name.clone(), handle: Some(handle) }
    }

    pub fn get(&self) -> Option<&Asset> {
        self.handle.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }
}

/// Read access to the graph while a hook runs on one entity's components.
pub struct HookContext<'w> {
    world: &'w World,
    pub entity: Entity,
    /// Mesh of a sibling mesh renderer, if any.
    pub sibling_mesh: Option<AssetHandle>,
    /// Terrain asset of a sibling terrain, if any.
    pub sibling_terrain: Option<AssetHandle>,
}

impl<'w> HookContext<'w> {
    pub(crate) fn new(world: &'w World, entity: Entity, siblings: &[super::types::ComponentSlot]) -> Self {
        let mut sibling_mesh = None;
        let mut sibling_terrain = None;
        for slot in siblings {
            match &slot.component {
                SceneComponent::MeshRenderer(renderer) if sibling_mesh.is_none() => {
                    sibling_mesh = renderer.mesh.handle.clone();
                }
                SceneComponent::Terrain(terrain) if sibling_terrain.is_none() => {
                    sibling_terrain = terrain.data.handle.clone();
                }
                _ => {}
            }
        }
        Self { world, entity, sibling_mesh, sibling_terrain }
    }

    pub fn guid_index(&self) -> Option<&GuidIndex> {
        self.world.get_resource::<GuidIndex>()
    }

    /// Depth-first search of the entity's subtree, itself included.
    pub fn find_named(&self, name: &str) -> Option<Entity> {
        let mut stack: SmallVec<[Entity; 32]> = SmallVec::new();
        stack.push(self.entity);
        while let Some(entity) = stack.pop() {
            if self.world.get::<EntityName>(entity).is_some_and(|n| n.0 == name) {
                return Some(entity);
            }
            if let Some(children) = self.world.get::<Children>(entity) {
                stack.extend(children.0.iter().rev().copied());
            }
        }
        None
    }

    pub fn guid_of(&self, entity: Entity) -> Option<&str> {
        self.world.get::<EntityGuid>(entity).map(EntityGuid::as_str)
    }
}

impl SceneComponent {
    /// Every cross-entity reference held by this component.
    pub fn object_refs_mut(&mut self) -> Vec<&mut ObjectRef> {
        match self {
            SceneComponent::MeshRenderer(c) => vec![&mut c.root_object],
            SceneComponent::Animation(c) => c.node_bindings.values_mut().collect(),
            SceneComponent::Vehicle(c) => c.wheels.iter_mut().map(|wheel| &mut wheel.connected_object).collect(),
            SceneComponent::FixedJoint(c) => vec![&mut c.link.connected_object],
            SceneComponent::FreeJoint(c) => vec![&mut c.link.connected_object],
            SceneComponent::HingeJoint(c) => vec![&mut c.link.connected_object],
            SceneComponent::ConeTwistJoint(c) => vec![&mut c.link.connected_object],
            SceneComponent::Script(c) => c
                .fields
                .iter_mut()
                .filter(|field| is_object_field_type(&field.field_type))
                .map(|field| &mut field.object)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Runs once the whole loaded graph is attached and parented.
    pub fn on_scene_loaded(&mut self, ctx: &HookContext<'_>) {
        if let SceneComponent::Animation(animation) = self {
            animation.bind_nodes(ctx);
        }
        self.on_refresh(ctx);
    }

    /// Rewrites stored references after GUIDs were regenerated.
    pub fn on_rebind_object(&mut self, old_guid: &str, new_guid: &str) {
        for object in self.object_refs_mut() {
            object.rebind(old_guid, new_guid);
        }
    }

    /// Re-resolves references and rebuilds data derived from siblings.
    pub fn on_refresh(&mut self, ctx: &HookContext<'_>) {
        if let Some(index) = ctx.guid_index() {
            for object in self.object_refs_mut() {
                object.resolve(index);
            }
        }
        match self {
            SceneComponent::MeshCollider(collider) => collider.collision_mesh = ctx.sibling_mesh.clone(),
            SceneComponent::TerrainCollider(collider) => collider.heightfield = ctx.sibling_terrain.clone(),
            _ => {}
        }
    }

    /// Copy for a duplicated entity. Live entity links and derived data are
    /// left for the refresh that follows.
    pub fn on_clone(&self) -> Self {
        let mut copy = self.clone();
        for object in copy.object_refs_mut() {
            object.entity = None;
        }
        match &mut copy {
            SceneComponent::MeshCollider(collider) => collider.collision_mesh = None,
            SceneComponent::TerrainCollider(collider) => collider.heightfield = None,
            _ => {}
        }
        copy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshRenderer {
    pub mesh: AssetRef,
    pub mesh_source_file: String,
    /// Skeleton root for skinned meshes.
    pub root_object: ObjectRef,
    pub materials: Vec<AssetRef>,
    pub cast_shadows: bool,
    pub lightmap_size: i32,
    pub lod_max_distance: f32,
    pub cull_over_max_distance: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecalRenderer {
    pub material: AssetRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub color: Vec4,
    pub intensity: f32,
    pub light_type: i32,
    pub render_mode: i32,
    pub radius: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub bias: f32,
    pub cast_shadows: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Left, top, width, height in normalized screen units.
    pub viewport: Vec4,
    pub depth: i32,
    pub clear_color: Vec4,
    pub clear_flags: i32,
    pub projection_type: i32,
    pub orthographic_size: f32,
    pub occlusion_culling: bool,
    /// Bit `n` set when layer `n` is rendered.
    pub culling_mask: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClipSlot {
    pub clip: AssetRef,
    pub name: String,
    pub speed: f32,
    pub start_frame: i32,
    pub end_frame: i32,
    pub looped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub clips: Vec<AnimationClipSlot>,
    /// Animated node name to the entity it drives.
    pub node_bindings: HashMap<String, ObjectRef>,
}

impl Animation {
    fn bind_nodes(&mut self, ctx: &HookContext<'_>) {
        self.node_bindings.clear();
        for slot in &self.clips {
            let Some(clip) = slot.clip.get().and_then(Asset::animation_clip) else {
                continue;
            };
            for node in &clip.nodes {
                if self.node_bindings.contains_key(&node.name) {
                    continue;
                }
                let target = ctx.find_named(&node.name).and_then(|entity| {
                    ctx.guid_of(entity).map(|guid| ObjectRef::to(guid, entity))
                });
                if let Some(target) = target {
                    self.node_bindings.insert(node.name.clone(), target);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    pub mass: f32,
    pub freeze_position: BVec3,
    pub freeze_rotation: BVec3,
    pub is_kinematic: bool,
    pub is_static: bool,
    pub use_own_gravity: bool,
    pub gravity: Vec3,
    pub friction: f32,
    pub bounciness: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxCollider {
    pub size: Vec3,
    pub offset: Vec3,
    pub rotation: Quat,
    pub is_trigger: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CapsuleCollider {
    pub radius: f32,
    pub height: f32,
    pub offset: Vec3,
    pub rotation: Quat,
    pub is_trigger: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SphereCollider {
    pub radius: f32,
    pub offset: Vec3,
    pub is_trigger: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshCollider {
    pub convex: bool,
    pub is_trigger: bool,
    /// Taken from the sibling mesh renderer after load.
    pub collision_mesh: Option<AssetHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainCollider {
    pub is_trigger: bool,
    /// Taken from the sibling terrain after load.
    pub heightfield: Option<AssetHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    pub connected_object: ObjectRef,
    pub radius: f32,
    pub width: f32,
    pub suspension_stiffness: f32,
    pub suspension_damping: f32,
    pub suspension_compression: f32,
    pub suspension_rest_length: f32,
    pub friction: f32,
    pub roll_influence: f32,
    pub direction: Vec3,
    pub axle: Vec3,
    pub connection_point: Vec3,
    pub is_front_wheel: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub axis: Vec3,
    pub invert_forward: bool,
    pub wheels: Vec<Wheel>,
}

/// Fields shared by every joint kind.
#[derive(Debug, Clone, PartialEq)]
pub struct JointLink {
    pub connected_object: ObjectRef,
    pub anchor: Vec3,
    pub connected_anchor: Vec3,
    pub linked_bodies_collision: bool,
}

impl Default for JointLink {
    fn default() -> Self {
        Self {
            connected_object: ObjectRef::default(),
            anchor: Vec3::ZERO,
            connected_anchor: Vec3::ZERO,
            linked_bodies_collision: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedJoint {
    pub link: JointLink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeJoint {
    pub link: JointLink,
    pub limit_min: Vec3,
    pub limit_max: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HingeJoint {
    pub link: JointLink,
    pub limit_min: f32,
    pub limit_max: f32,
    pub axis: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConeTwistJoint {
    pub link: JointLink,
    pub limits: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioListener {
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub clip: AssetRef,
    pub play_on_start: bool,
    pub looped: bool,
    pub volume: f32,
    pub pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub is_2d: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPlayer {
    pub clip: AssetRef,
    pub play_on_start: bool,
    pub looped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavMeshAgent {
    pub radius: f32,
    pub height: f32,
    pub speed: f32,
    pub acceleration: f32,
    pub rotation_speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavMeshObstacle {
    pub size: Vec3,
    pub offset: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptField {
    pub name: String,
    pub field_type: String,
    pub string_value: String,
    pub bool_value: bool,
    pub int_value: i32,
    pub float_value: f32,
    pub object: ObjectRef,
    pub vec2_value: Vec2,
    pub vec3_value: Vec3,
    pub vec4_value: Vec4,
    pub string_array_value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub class_name: String,
    pub fields: Vec<ScriptField>,
}

impl Script {
    pub fn field(&self, name: &str) -> Option<&ScriptField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub ref_screen_width: i32,
    pub ref_screen_height: i32,
    pub screen_match_side: f32,
    pub mode: i32,
}

/// Placement shared by canvas widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct UiLayout {
    pub anchor: Vec2,
    pub color: Vec4,
    pub size: Vec2,
    pub horizontal_alignment: i32,
    pub vertical_alignment: i32,
    pub raycast_target: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonTextures {
    pub normal: AssetRef,
    pub hover: AssetRef,
    pub active: AssetRef,
    pub disabled: AssetRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub layout: UiLayout,
    pub texture: AssetRef,
    pub image_type: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub layout: UiLayout,
    pub font: AssetRef,
    pub text: String,
    pub font_size: f32,
    pub font_resolution: i32,
    pub line_spacing: f32,
    pub horizontal_text_alignment: i32,
    pub vertical_text_alignment: i32,
    pub word_wrap: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub layout: UiLayout,
    pub textures: ButtonTextures,
    pub col_hover: Vec4,
    pub col_active: Vec4,
    pub col_disabled: Vec4,
    pub image_type: i32,
    pub interactable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub layout: UiLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    pub layout: UiLayout,
    pub font: AssetRef,
    pub textures: ButtonTextures,
    pub col_hover: Vec4,
    pub col_active: Vec4,
    pub col_disabled: Vec4,
    pub col_text: Vec4,
    pub col_placeholder: Vec4,
    pub image_type: i32,
    pub text: String,
    pub placeholder: String,
    pub multiline: bool,
    pub font_size: f32,
    pub font_resolution: i32,
    pub line_spacing: f32,
    pub padding: Vec4,
    pub horizontal_text_alignment: i32,
    pub vertical_text_alignment: i32,
    pub word_wrap: i32,
    pub interactable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub data: AssetRef,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParticleModifier {
    Gravity { start_time: f32, gravity: Vec3, damping: f32 },
    /// Keys are `(normalized age, color)`.
    Color { start_time: f32, keys: Vec<(f32, Vec4)> },
    Size { start_time: f32, keys: Vec<(f32, f32)> },
    Direction {
        start_time: f32,
        random_min: Vec3,
        random_max: Vec3,
        constant: Vec3,
        change_interval: f32,
        direction_type: i32,
    },
    Rotation {
        start_time: f32,
        random_min: Vec3,
        random_max: Vec3,
        constant: Vec3,
        offset: Vec3,
        change_interval: f32,
        rotation_type: i32,
    },
    Speed {
        start_time: f32,
        constant: f32,
        random_min: f32,
        random_max: f32,
        change_interval: f32,
        speed_type: i32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleEmitter {
    pub material: AssetRef,
    pub simulation_space: i32,
    pub render_type: i32,
    pub origin: i32,
    pub shape: i32,
    pub radius: f32,
    pub size: Vec3,
    pub time_scale: f32,
    pub emission_rate: f32,
    pub emission_count: u32,
    pub duration: f32,
    pub max_particles: u32,
    pub start_size_min: f32,
    pub start_size_max: f32,
    pub life_time_min: f32,
    pub life_time_max: f32,
    pub start_speed: f32,
    pub start_direction: Vec3,
    pub looped: bool,
    pub enable_physics: bool,
    pub bounciness: f32,
    pub friction: f32,
    pub modifiers: Vec<ParticleModifier>,
    pub animated: bool,
    pub animation_grid_size: Vec2,
    pub animation_time_mode: i32,
    pub animation_fps: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    pub cast_shadows: bool,
    pub play_at_start: bool,
    pub emitters: Vec<ParticleEmitter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Water {
    pub size: f32,
    pub reflections: bool,
    pub reflect_skybox: bool,
    pub reflect_objects: bool,
    pub reflections_distance: f32,
    pub reflections_quality: i32,
    /// Owned by the component; it has no file of its own.
    pub material: AssetHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    pub points: Vec<Vec3>,
    pub closed: bool,
}

impl Spline {
    pub fn length(&self) -> f32 {
        let open: f32 = self.points.windows(2).map(|pair| pair[0].distance(pair[1])).sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) if self.points.len() > 2 => open + last.distance(*first),
            _ => open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsgOperation {
    #[default]
    Add,
    Subtract,
    Intersect,
}

impl CsgOperation {
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => CsgOperation::Subtract,
            2 => CsgOperation::Intersect,
            _ => CsgOperation::Add,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            CsgOperation::Add => 0,
            CsgOperation::Subtract => 1,
            CsgOperation::Intersect => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsgFace {
    /// Polygon over the brush vertex list.
    pub indices: Vec<u32>,
    pub tex_coords: Vec<Vec2>,
    pub tex_coords_scale: Vec2,
    pub tex_coords_offset: Vec2,
    pub tex_coords_rotation: f32,
    pub material: AssetRef,
    pub smooth_normals: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsgBrush {
    pub brush_type: i32,
    pub operation: CsgOperation,
    pub cast_shadows: bool,
    pub segments: i32,
    pub stacks: i32,
    pub vertices: Vec<Vec3>,
    pub faces: Vec<CsgFace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CsgModel;
