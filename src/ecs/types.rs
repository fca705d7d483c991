use super::components::SceneComponent;
use bevy_ecs::prelude::*;
use bitflags::bitflags;
use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;

/// Process-unique identifier that survives save and load.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityGuid(pub String);

impl EntityGuid {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct EntityName(pub String);

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Parent(pub Entity);

#[derive(Component, Clone, Debug, Default)]
pub struct Children(pub Vec<Entity>);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StaticFlags: u8 {
        const NAVIGATION = 1;
        const LIGHTING = 1 << 1;
        const BATCHING = 1 << 2;
        const OCCLUSION = 1 << 3;
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct EntityState {
    /// The entity's own flag.
    pub enabled: bool,
    /// Enabled and every ancestor enabled.
    pub active_in_hierarchy: bool,
    pub static_flags: StaticFlags,
    pub tag: i32,
    pub layer: i32,
}

impl Default for EntityState {
    fn default() -> Self {
        Self { enabled: true, active_in_hierarchy: true, static_flags: StaticFlags::empty(), tag: 0, layer: 0 }
    }
}

/// Editor-only helpers and other runtime entities that scene files skip.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct NonSerializable;

/// Creation order, used to keep saved entity lists stable.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSlot {
    pub enabled: bool,
    pub component: SceneComponent,
}

impl ComponentSlot {
    pub fn new(component: SceneComponent) -> Self {
        Self { enabled: true, component }
    }
}

/// The ordered component list of an entity.
#[derive(Component, Clone, Debug, Default)]
pub struct ComponentList(pub Vec<ComponentSlot>);

#[derive(Resource, Default)]
pub struct GuidIndex {
    entities: HashMap<String, Entity>,
}

impl GuidIndex {
    pub fn get(&self, guid: &str) -> Option<Entity> {
        self.entities.get(guid).copied()
    }

    pub fn insert(&mut self, guid: String, entity: Entity) -> Option<Entity> {
        self.entities.insert(guid, entity)
    }

    /// Removes `guid` only while it still points at `entity`.
    pub fn remove(&mut self, guid: &str, entity: Entity) {
        if self.entities.get(guid) == Some(&entity) {
            self.entities.remove(guid);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Resource, Default)]
pub(crate) struct SpawnCounter(pub u64);
