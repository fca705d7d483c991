//! Live scene graph: entities, their ordered component lists, and the
//! save/load conversions for a single entity.

mod capture;
pub mod components;
mod restore;
pub mod types;
pub mod world;

pub use components::{
    is_object_field_type, AssetRef, ComponentKind, ComponentType, HookContext, ObjectRef, SceneComponent,
};
pub use types::{
    Children, ComponentList, ComponentSlot, EntityGuid, EntityName, EntityState, GuidIndex, NonSerializable, Parent,
    SpawnOrder, StaticFlags, Transform,
};
pub use restore::NoAssets;
pub use world::{EcsWorld, WorldTransform};
