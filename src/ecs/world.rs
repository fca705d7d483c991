use super::components::{ComponentKind, HookContext, SceneComponent};
use super::types::*;
use crate::environment::SceneEnvironment;
use crate::geometry::DerivedGeometry;
use bevy_ecs::prelude::*;
use glam::Mat4;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct WorldTransform(pub Mat4);

pub struct EcsWorld {
    pub world: World,
    schedule: Schedule,
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl EcsWorld {
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(GuidIndex::default());
        world.insert_resource(SpawnCounter::default());
        world.insert_resource(SceneEnvironment::default());
        world.insert_resource(DerivedGeometry::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(sys_propagate_transforms);
        Self { world, schedule }
    }

    /// Refreshes every [`WorldTransform`] from the local transforms.
    pub fn update(&mut self) {
        self.schedule.run(&mut self.world);
    }

    /// Creates an entity with no components. A `None` guid generates a
    /// fresh one. An existing index entry for the same GUID is replaced.
    pub fn spawn_entity(&mut self, name: &str, guid: Option<&str>) -> Entity {
        let guid = guid.map(|guid| EntityGuid(guid.to_string())).unwrap_or_else(EntityGuid::generate);
        let order = {
            let mut counter = self.world.resource_mut::<SpawnCounter>();
            counter.0 += 1;
            counter.0
        };
        let key = guid.0.clone();
        let entity = self
            .world
            .spawn((
                guid,
                EntityName(name.to_string()),
                Transform::default(),
                WorldTransform::default(),
                EntityState::default(),
                ComponentList::default(),
                SpawnOrder(order),
            ))
            .id();
        self.world.resource_mut::<GuidIndex>().insert(key, entity);
        entity
    }

    pub fn despawn_recursive(&mut self, entity: Entity) {
        let doomed = self.subtree(entity);
        self.detach(entity);
        for entity in doomed {
            if let Some(guid) = self.world.get::<EntityGuid>(entity).cloned() {
                self.world.resource_mut::<GuidIndex>().remove(&guid.0, entity);
            }
            self.world.despawn(entity);
        }
    }

    /// Removes every scene entity and resets the environment and the
    /// derived geometry built from them.
    pub fn clear(&mut self) {
        for root in self.roots() {
            self.despawn_recursive(root);
        }
        self.world.insert_resource(SceneEnvironment::default());
        self.world.insert_resource(DerivedGeometry::default());
    }

    pub fn entity_count(&self) -> usize {
        self.world.resource::<GuidIndex>().len()
    }

    pub fn find_by_guid(&self, guid: &str) -> Option<Entity> {
        self.world.resource::<GuidIndex>().get(guid)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.entities_in_order().into_iter().find(|entity| self.name(*entity) == Some(name))
    }

    pub fn guid(&self, entity: Entity) -> Option<&str> {
        self.world.get::<EntityGuid>(entity).map(EntityGuid::as_str)
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.world.get::<EntityName>(entity).map(|name| name.0.as_str())
    }

    pub fn set_name(&mut self, entity: Entity, name: &str) {
        if let Some(mut current) = self.world.get_mut::<EntityName>(entity) {
            current.0 = name.to_string();
        }
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<Transform>(entity).copied()
    }

    pub fn set_transform(&mut self, entity: Entity, transform: Transform) {
        if let Some(mut current) = self.world.get_mut::<Transform>(entity) {
            *current = transform;
        }
    }

    pub fn state(&self, entity: Entity) -> Option<EntityState> {
        self.world.get::<EntityState>(entity).copied()
    }

    /// Updates flags, tag and layer. The enabled flag goes through
    /// [`EcsWorld::set_enabled`] so the cascade stays consistent.
    pub fn set_state(&mut self, entity: Entity, state: EntityState) {
        if let Some(mut current) = self.world.get_mut::<EntityState>(entity) {
            current.static_flags = state.static_flags;
            current.tag = state.tag;
            current.layer = state.layer;
        }
        self.set_enabled(entity, state.enabled);
    }

    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.world.get::<EntityState>(entity).is_some_and(|state| state.enabled)
    }

    pub fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        self.world.get::<EntityState>(entity).is_some_and(|state| state.active_in_hierarchy)
    }

    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) {
        if let Some(mut state) = self.world.get_mut::<EntityState>(entity) {
            state.enabled = enabled;
        }
        self.refresh_active(entity);
    }

    pub fn set_non_serializable(&mut self, entity: Entity) {
        self.world.entity_mut(entity).insert(NonSerializable);
    }

    pub fn is_serializable(&self, entity: Entity) -> bool {
        self.world.get::<NonSerializable>(entity).is_none()
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<Parent>(entity).map(|parent| parent.0)
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.world.get::<Children>(entity).map(|children| children.0.as_slice()).unwrap_or(&[])
    }

    /// Reparents `child`, or makes it a root when `parent` is `None`.
    /// Returns false when the link would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> bool {
        if let Some(parent) = parent {
            if self.is_ancestor_or_self(child, parent) {
                log::warn!("Refusing to parent {:?} under its own descendant {:?}", child, parent);
                return false;
            }
        }
        self.detach(child);
        if let Some(parent) = parent {
            self.world.entity_mut(child).insert(Parent(parent));
            if let Some(mut children) = self.world.get_mut::<Children>(parent) {
                if !children.0.contains(&child) {
                    children.0.push(child);
                }
            } else {
                self.world.entity_mut(parent).insert(Children(vec![child]));
            }
        }
        self.refresh_active(child);
        true
    }

    fn detach(&mut self, child: Entity) {
        let Some(old) = self.parent(child) else {
            return;
        };
        if let Some(mut children) = self.world.get_mut::<Children>(old) {
            children.0.retain(|entity| *entity != child);
        }
        self.world.entity_mut(child).remove::<Parent>();
    }

    fn is_ancestor_or_self(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Recomputes `active_in_hierarchy` for `entity` and its descendants.
    pub fn refresh_active(&mut self, entity: Entity) {
        let inherited = self.parent(entity).map_or(true, |parent| self.is_active_in_hierarchy(parent));
        let mut stack: SmallVec<[(Entity, bool); 32]> = SmallVec::new();
        stack.push((entity, inherited));
        while let Some((node, parent_active)) = stack.pop() {
            let active = match self.world.get_mut::<EntityState>(node) {
                Some(mut state) => {
                    state.active_in_hierarchy = parent_active && state.enabled;
                    state.active_in_hierarchy
                }
                None => continue,
            };
            stack.extend(self.children(node).iter().map(|child| (*child, active)));
        }
    }

    /// Root entities in creation order.
    pub fn roots(&self) -> Vec<Entity> {
        let mut roots: Vec<(SpawnOrder, Entity)> = self
            .world
            .iter_entities()
            .filter(|entity| !entity.contains::<Parent>())
            .filter_map(|entity| entity.get::<SpawnOrder>().map(|order| (*order, entity.id())))
            .collect();
        roots.sort_unstable_by_key(|(order, _)| *order);
        roots.into_iter().map(|(_, entity)| entity).collect()
    }

    /// `root` and its descendants, parents before children.
    pub fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[Entity; 32]> = SmallVec::new();
        stack.push(root);
        while let Some(entity) = stack.pop() {
            if !self.world.entities().contains(entity) {
                continue;
            }
            out.push(entity);
            stack.extend(self.children(entity).iter().rev().copied());
        }
        out
    }

    /// Every scene entity, parents before children.
    pub fn entities_in_order(&self) -> Vec<Entity> {
        self.roots().into_iter().flat_map(|root| self.subtree(root)).collect()
    }

    /// Product of the local matrices from the root down to `entity`.
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(entity);
        while let Some(node) = current {
            if let Some(transform) = self.world.get::<Transform>(node) {
                matrix = transform.matrix() * matrix;
            }
            current = self.parent(node);
        }
        matrix
    }

    pub fn add_component(&mut self, entity: Entity, component: impl Into<SceneComponent>) {
        if let Some(mut list) = self.world.get_mut::<ComponentList>(entity) {
            list.0.push(ComponentSlot::new(component.into()));
        }
    }

    pub fn components(&self, entity: Entity) -> &[ComponentSlot] {
        self.world.get::<ComponentList>(entity).map(|list| list.0.as_slice()).unwrap_or(&[])
    }

    /// First component of kind `T` on the entity.
    pub fn component<T: ComponentKind>(&self, entity: Entity) -> Option<&T> {
        self.components(entity).iter().find_map(|slot| T::of(&slot.component))
    }

    pub fn component_mut<T: ComponentKind>(&mut self, entity: Entity) -> Option<&mut T> {
        let list = self.world.get_mut::<ComponentList>(entity)?.into_inner();
        list.0.iter_mut().find_map(|slot| T::of_mut(&mut slot.component))
    }

    pub(crate) fn set_components(&mut self, entity: Entity, slots: Vec<ComponentSlot>) {
        if let Some(mut list) = self.world.get_mut::<ComponentList>(entity) {
            list.0 = slots;
        }
    }

    pub fn environment(&self) -> &SceneEnvironment {
        self.world.resource::<SceneEnvironment>()
    }

    pub fn environment_mut(&mut self) -> Mut<'_, SceneEnvironment> {
        self.world.resource_mut::<SceneEnvironment>()
    }

    /// Runs `hook` on each component of `entity`. The list is detached while
    /// the hook runs so the hook can read the rest of the graph.
    pub(crate) fn run_hooks<F>(&mut self, entity: Entity, mut hook: F)
    where
        F: FnMut(&mut SceneComponent, &HookContext<'_>),
    {
        let Some(mut list) = self.world.get_mut::<ComponentList>(entity) else {
            return;
        };
        let mut slots = std::mem::take(&mut list.0);
        {
            let ctx = HookContext::new(&self.world, entity, &slots);
            for slot in &mut slots {
                hook(&mut slot.component, &ctx);
            }
        }
        self.set_components(entity, slots);
    }

    /// Applies an old-to-new GUID map to every reference held by `entity`.
    pub(crate) fn rebind_objects(&mut self, entity: Entity, remap: &HashMap<String, String>) {
        let Some(mut list) = self.world.get_mut::<ComponentList>(entity) else {
            return;
        };
        for slot in &mut list.0 {
            let hits: Vec<(String, String)> = slot
                .component
                .object_refs_mut()
                .into_iter()
                .filter_map(|object| remap.get(&object.guid).map(|new| (object.guid.clone(), new.clone())))
                .collect();
            for (old, new) in hits {
                slot.component.on_rebind_object(&old, &new);
            }
        }
    }

    /// Deep-copies `root` and its subtree next to the original. Every copy
    /// gets a fresh GUID and references inside the copy follow it.
    pub fn duplicate(&mut self, root: Entity) -> Option<Entity> {
        let source = self.subtree(root);
        if source.is_empty() {
            return None;
        }
        let mut copies: HashMap<Entity, Entity> = HashMap::with_capacity(source.len());
        let mut remap: HashMap<String, String> = HashMap::with_capacity(source.len());
        for &original in &source {
            let name = self.name(original).unwrap_or_default().to_string();
            let transform = self.transform(original).unwrap_or_default();
            let state = self.state(original).unwrap_or_default();
            let slots: Vec<ComponentSlot> = self
                .components(original)
                .iter()
                .map(|slot| ComponentSlot { enabled: slot.enabled, component: slot.component.on_clone() })
                .collect();
            let copy = self.spawn_entity(&name, None);
            self.set_transform(copy, transform);
            if let Some(mut current) = self.world.get_mut::<EntityState>(copy) {
                *current = state;
            }
            self.set_components(copy, slots);
            if let (Some(old), Some(new)) = (self.guid(original), self.guid(copy)) {
                remap.insert(old.to_string(), new.to_string());
            }
            copies.insert(original, copy);
        }
        for &original in &source {
            let parent = if original == root {
                self.parent(root)
            } else {
                self.parent(original).and_then(|parent| copies.get(&parent).copied())
            };
            if let (Some(copy), Some(parent)) = (copies.get(&original).copied(), parent) {
                self.set_parent(copy, Some(parent));
            }
        }
        let duplicated = copies.get(&root).copied()?;
        self.refresh_active(duplicated);
        for &original in &source {
            if let Some(copy) = copies.get(&original).copied() {
                self.rebind_objects(copy, &remap);
            }
        }
        for &original in &source {
            if let Some(copy) = copies.get(&original).copied() {
                self.run_hooks(copy, |component, ctx| component.on_refresh(ctx));
            }
        }
        Some(duplicated)
    }
}

fn sys_propagate_transforms(
    roots: Query<Entity, (With<Transform>, Without<Parent>)>,
    locals: Query<(&Transform, Option<&Children>)>,
    mut worlds: Query<&mut WorldTransform>,
) {
    let mut stack: SmallVec<[(Entity, Mat4); 128]> = SmallVec::new();
    stack.extend(roots.iter().map(|root| (root, Mat4::IDENTITY)));
    while let Some((entity, parent_matrix)) = stack.pop() {
        let Ok((transform, children)) = locals.get(entity) else {
            continue;
        };
        let matrix = parent_matrix * transform.matrix();
        if let Ok(mut world) = worlds.get_mut(entity) {
            world.0 = matrix;
        }
        if let Some(children) = children {
            stack.extend(children.0.iter().map(|child| (*child, matrix)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{BoxCollider, RigidBody};
    use glam::Vec3;

    #[test]
    fn disabling_a_parent_deactivates_the_subtree() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("root", None);
        let child = ecs.spawn_entity("child", None);
        let grandchild = ecs.spawn_entity("grandchild", None);
        ecs.set_parent(child, Some(root));
        ecs.set_parent(grandchild, Some(child));

        ecs.set_enabled(root, false);
        assert!(!ecs.is_active_in_hierarchy(grandchild));
        assert!(ecs.is_enabled(grandchild));

        ecs.set_enabled(root, true);
        assert!(ecs.is_active_in_hierarchy(grandchild));
    }

    #[test]
    fn parenting_under_a_descendant_is_refused() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("root", None);
        let child = ecs.spawn_entity("child", None);
        assert!(ecs.set_parent(child, Some(root)));
        assert!(!ecs.set_parent(root, Some(child)));
        assert_eq!(ecs.parent(root), None);
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("root", None);
        let child = ecs.spawn_entity("child", None);
        ecs.set_parent(child, Some(root));
        ecs.set_transform(root, Transform { position: Vec3::new(1.0, 0.0, 0.0), scale: Vec3::splat(2.0), ..Default::default() });
        ecs.set_transform(child, Transform { position: Vec3::new(0.0, 1.0, 0.0), ..Default::default() });

        let world = ecs.world_matrix(child).transform_point3(Vec3::ZERO);
        assert!(world.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-5));

        ecs.update();
        let propagated = ecs.world.get::<WorldTransform>(child).expect("world transform").0;
        assert!(propagated.abs_diff_eq(ecs.world_matrix(child), 1e-5));
    }

    #[test]
    fn duplicate_gets_fresh_guids_and_keeps_component_order() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("crate", Some("crate-guid"));
        ecs.add_component(root, RigidBody::default());
        ecs.add_component(root, BoxCollider::default());

        let copy = ecs.duplicate(root).expect("duplicate");
        assert_ne!(ecs.guid(copy), ecs.guid(root));
        assert_eq!(ecs.find_by_guid("crate-guid"), Some(root));
        let kinds: Vec<_> = ecs.components(copy).iter().map(|slot| slot.component.component_type()).collect();
        let original: Vec<_> = ecs.components(root).iter().map(|slot| slot.component.component_type()).collect();
        assert_eq!(kinds, original);
        assert_eq!(ecs.entity_count(), 2);
    }

    #[test]
    fn roots_follow_creation_order() {
        let mut ecs = EcsWorld::new();
        let first = ecs.spawn_entity("first", None);
        let nested = ecs.spawn_entity("nested", None);
        let second = ecs.spawn_entity("second", None);
        ecs.set_parent(nested, Some(second));
        assert_eq!(ecs.roots(), vec![first, second]);
        assert_eq!(ecs.entities_in_order(), vec![first, second, nested]);
    }

    #[test]
    fn clear_drops_entities_and_derived_geometry() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("root", None);
        let child = ecs.spawn_entity("child", None);
        ecs.set_parent(child, Some(root));
        ecs.world.resource_mut::<DerivedGeometry>().batches_fingerprint = "stale".into();

        ecs.clear();
        assert_eq!(ecs.entity_count(), 0);
        assert!(ecs.roots().is_empty());
        assert!(ecs.world.resource::<DerivedGeometry>().batches_fingerprint.is_empty());
    }

    #[test]
    fn despawn_clears_guid_index() {
        let mut ecs = EcsWorld::new();
        let root = ecs.spawn_entity("root", Some("a"));
        let child = ecs.spawn_entity("child", Some("b"));
        ecs.set_parent(child, Some(root));
        ecs.despawn_recursive(root);
        assert_eq!(ecs.entity_count(), 0);
        assert!(ecs.find_by_guid("b").is_none());
    }
}
