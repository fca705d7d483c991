use super::csg::{CsgBrushData, CsgModelData};
use super::data::{QuatData, Vec3Data};
use super::media::{AudioListenerData, AudioSourceData, VideoPlayerData};
use super::navigation::{NavMeshAgentData, NavMeshObstacleData};
use super::particles::ParticleSystemData;
use super::physics::{
    BoxColliderData, CapsuleColliderData, ConeTwistJointData, FixedJointData, FreeJointData, HingeJointData,
    MeshColliderData, RigidBodyData, SphereColliderData, TerrainColliderData, VehicleData,
};
use super::rendering::{
    AnimationData, CameraData, DecalRendererData, LightData, MeshRendererData, SplineData, WaterData,
};
use super::scripting::ScriptData;
use super::terrain::TerrainData;
use super::ui::{ButtonData, CanvasData, ImageData, MaskData, TextData, TextInputData};
use crate::archive;

archive! {
    /// One entity with its components grouped into a list per kind.
    pub struct GameObjectData: 3 {
        data enabled: bool = true,
        data name: String = String::new(),
        data guid: String = String::new(),
        /// Empty when the entity is a root.
        data parent_guid: String = String::new(),
        archive position: Vec3Data = Vec3Data::default(),
        archive rotation: QuatData = QuatData::default(),
        archive scale: Vec3Data = Vec3Data::new(1.0, 1.0, 1.0),
        data navigation_static: bool = false,
        data lighting_static: bool = false,
        data batching_static: bool = false,
        data tag: i32 = 0,
        data layer: i32 = 0,
        data occlusion_static: bool = false,
        archives mesh_renderers: Vec<MeshRendererData> = Vec::new(),
        archives lights: Vec<LightData> = Vec::new(),
        archives cameras: Vec<CameraData> = Vec::new(),
        archives animations: Vec<AnimationData> = Vec::new(),
        archives rigid_bodies: Vec<RigidBodyData> = Vec::new(),
        archives box_colliders: Vec<BoxColliderData> = Vec::new(),
        archives capsule_colliders: Vec<CapsuleColliderData> = Vec::new(),
        archives mesh_colliders: Vec<MeshColliderData> = Vec::new(),
        archives sphere_colliders: Vec<SphereColliderData> = Vec::new(),
        archives vehicles: Vec<VehicleData> = Vec::new(),
        archives fixed_joints: Vec<FixedJointData> = Vec::new(),
        archives free_joints: Vec<FreeJointData> = Vec::new(),
        archives hinge_joints: Vec<HingeJointData> = Vec::new(),
        archives audio_listeners: Vec<AudioListenerData> = Vec::new(),
        archives audio_sources: Vec<AudioSourceData> = Vec::new(),
        archives nav_mesh_agents: Vec<NavMeshAgentData> = Vec::new(),
        archives nav_mesh_obstacles: Vec<NavMeshObstacleData> = Vec::new(),
        archives scripts: Vec<ScriptData> = Vec::new(),
        archives canvases: Vec<CanvasData> = Vec::new(),
        archives images: Vec<ImageData> = Vec::new(),
        archives texts: Vec<TextData> = Vec::new(),
        archives buttons: Vec<ButtonData> = Vec::new(),
        archives terrains: Vec<TerrainData> = Vec::new(),
        archives particle_systems: Vec<ParticleSystemData> = Vec::new(),
        archives terrain_colliders: Vec<TerrainColliderData> = Vec::new(),
        archives cone_twist_joints: Vec<ConeTwistJointData> = Vec::new(),
        archives waters: Vec<WaterData> = Vec::new(),
        archives masks: Vec<MaskData> = Vec::new(),
        archives splines: Vec<SplineData> = Vec::new(),
        archives video_players: Vec<VideoPlayerData> = Vec::new(),
        archives csg_brushes: Vec<CsgBrushData> = Vec::new(),
        @since(1) archives text_inputs: Vec<TextInputData> = Vec::new(),
        @since(2) archives csg_models: Vec<CsgModelData> = Vec::new(),
        @since(3) archives decals: Vec<DecalRendererData> = Vec::new(),
    }
}

impl GameObjectData {
    pub fn has_parent(&self) -> bool {
        !self.parent_guid.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.mesh_renderers.len()
            + self.lights.len()
            + self.cameras.len()
            + self.animations.len()
            + self.rigid_bodies.len()
            + self.box_colliders.len()
            + self.capsule_colliders.len()
            + self.mesh_colliders.len()
            + self.sphere_colliders.len()
            + self.vehicles.len()
            + self.fixed_joints.len()
            + self.free_joints.len()
            + self.hinge_joints.len()
            + self.audio_listeners.len()
            + self.audio_sources.len()
            + self.nav_mesh_agents.len()
            + self.nav_mesh_obstacles.len()
            + self.scripts.len()
            + self.canvases.len()
            + self.images.len()
            + self.texts.len()
            + self.buttons.len()
            + self.terrains.len()
            + self.particle_systems.len()
            + self.terrain_colliders.len()
            + self.cone_twist_joints.len()
            + self.waters.len()
            + self.masks.len()
            + self.splines.len()
            + self.video_players.len()
            + self.csg_brushes.len()
            + self.text_inputs.len()
            + self.csg_models.len()
            + self.decals.len()
    }

    /// GUIDs of other entities referenced by this entity's components.
    pub fn object_references(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = Vec::new();
        refs.extend(self.mesh_renderers.iter().map(|c| c.root_object_guid.as_str()));
        refs.extend(self.fixed_joints.iter().map(|c| c.connected_object_guid.as_str()));
        refs.extend(self.free_joints.iter().map(|c| c.connected_object_guid.as_str()));
        refs.extend(self.hinge_joints.iter().map(|c| c.connected_object_guid.as_str()));
        refs.extend(self.cone_twist_joints.iter().map(|c| c.connected_object_guid.as_str()));
        for vehicle in &self.vehicles {
            refs.extend(vehicle.wheels.iter().map(|wheel| wheel.connected_object_guid.as_str()));
        }
        for script in &self.scripts {
            refs.extend(
                script
                    .fields
                    .iter()
                    .filter(|field| crate::ecs::is_object_field_type(&field.field_type))
                    .map(|field| field.object_value.as_str()),
            );
        }
        refs.retain(|guid| !guid.is_empty() && *guid != super::component::NO_OBJECT);
        refs
    }
}
