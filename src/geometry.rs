//! Derived geometry: static batches and CSG meshes rebuilt from the scene
//! graph and cached in the library folder next to the scene.

use crate::assets::Asset;
use crate::ecs::components::{AssetRef, CsgBrush, CsgModel, CsgOperation, MeshRenderer};
use crate::ecs::{ComponentKind, EcsWorld, SceneComponent, StaticFlags};
use crate::schema::assets::{MeshData, SubMeshData, VertexData};
use crate::schema::geometry::{BatchData, CsgSubMeshData, GeometryVertexData};
use crate::schema::{BatchedGeometryData, CsgGeometryData};
use crate::serialization;
use anyhow::{Context, Result};
use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Meshes merged into one batch before a new batch is started.
const MAX_MESHES_PER_BATCH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometryVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub uv0: Vec2,
    pub uv1: Vec2,
    pub color: Vec4,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryBatch {
    pub material: String,
    /// Digest of the entities and submeshes merged into the batch.
    pub guid: String,
    pub transparent: bool,
    pub lighting_static: bool,
    pub use_lightmap_uvs: bool,
    pub cast_shadows: bool,
    pub lightmap_size: u8,
    pub layer: i32,
    pub index: i32,
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsgSubMesh {
    pub material: String,
    pub guid: String,
    pub cast_shadows: bool,
    pub layer: i32,
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
    /// Per-vertex id of the producing brush.
    pub brush_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CsgMesh {
    pub sub_meshes: Vec<CsgSubMesh>,
    pub fingerprint: String,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DerivedGeometry {
    pub batches: Vec<GeometryBatch>,
    pub batches_fingerprint: String,
    /// Keyed by the GUID of the CSG model entity.
    pub csg_models: HashMap<String, CsgMesh>,
}

/// Where the derived geometry of the last load came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryReport {
    pub static_from_cache: bool,
    pub csg_from_cache: usize,
    pub csg_rebuilt: usize,
}

fn scene_folder(library: &Path, scene: &str) -> PathBuf {
    let scene = Path::new(scene);
    let stem = scene.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
    let parent = scene.parent().unwrap_or(Path::new(""));
    library.join(parent).join(stem)
}

fn scene_stem(scene: &str) -> String {
    Path::new(scene).file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}

pub fn static_geometry_path(library: &Path, scene: &str) -> PathBuf {
    let digest = blake3::hash(scene_stem(scene).as_bytes()).to_hex();
    scene_folder(library, scene).join("Static Geometry").join(format!("{digest}.mesh"))
}

pub fn csg_geometry_dir(library: &Path, scene: &str) -> PathBuf {
    scene_folder(library, scene).join("CSG Geometry")
}

pub fn csg_geometry_path(library: &Path, scene: &str, model_guid: &str) -> PathBuf {
    let key = format!("{}_{}_csg", scene_stem(scene), model_guid);
    csg_geometry_dir(library, scene).join(format!("{}.mesh", blake3::hash(key.as_bytes()).to_hex()))
}

struct StaticSource<'a> {
    guid: &'a str,
    matrix: Mat4,
    rotation: Quat,
    layer: i32,
    lighting_static: bool,
    renderer: &'a MeshRenderer,
    mesh: &'a MeshData,
}

/// Active, batching-static entities with an enabled mesh renderer whose
/// mesh is loaded.
fn static_sources(ecs: &EcsWorld) -> Vec<StaticSource<'_>> {
    let mut sources = Vec::new();
    for entity in ecs.entities_in_order() {
        let Some(state) = ecs.state(entity) else {
            continue;
        };
        if !state.active_in_hierarchy || !state.static_flags.contains(StaticFlags::BATCHING) {
            continue;
        }
        let Some(renderer) = ecs
            .components(entity)
            .iter()
            .filter(|slot| slot.enabled)
            .find_map(|slot| MeshRenderer::of(&slot.component))
        else {
            continue;
        };
        let Some(mesh) = renderer.mesh.get().and_then(Asset::mesh) else {
            continue;
        };
        let matrix = ecs.world_matrix(entity);
        let (_, rotation, _) = matrix.to_scale_rotation_translation();
        sources.push(StaticSource {
            guid: ecs.guid(entity).unwrap_or_default(),
            matrix,
            rotation,
            layer: state.layer,
            lighting_static: state.static_flags.contains(StaticFlags::LIGHTING),
            renderer,
            mesh,
        });
    }
    sources
}

fn hash_matrix(hasher: &mut blake3::Hasher, matrix: &Mat4) {
    hasher.update(bytemuck::cast_slice(&matrix.to_cols_array()));
}

fn hash_sub_mesh(hasher: &mut blake3::Hasher, sub_mesh: &SubMeshData) {
    hasher.update(&[sub_mesh.use_lightmap_uvs as u8]);
    hasher.update(&(sub_mesh.vertex_buffer.len() as u64).to_le_bytes());
    let mut floats = Vec::with_capacity(sub_mesh.vertex_buffer.len() * 22);
    for vertex in &sub_mesh.vertex_buffer {
        let local = world_vertex(vertex, &Mat4::IDENTITY, Quat::IDENTITY);
        floats.extend(local.position.to_array());
        floats.extend(local.normal.to_array());
        floats.extend(local.tangent.to_array());
        floats.extend(local.bitangent.to_array());
        floats.extend(local.uv0.to_array());
        floats.extend(local.uv1.to_array());
        floats.extend(local.color.to_array());
    }
    hasher.update(bytemuck::cast_slice(&floats));
    hasher.update(&(sub_mesh.index_buffer.len() as u64).to_le_bytes());
    hasher.update(bytemuck::cast_slice(&sub_mesh.index_buffer));
}

/// Digest of everything the static batches are built from.
pub fn static_fingerprint(ecs: &EcsWorld) -> String {
    let mut hasher = blake3::Hasher::new();
    for source in static_sources(ecs) {
        hasher.update(source.guid.as_bytes());
        hash_matrix(&mut hasher, &source.matrix);
        hasher.update(source.renderer.mesh.name.as_bytes());
        for sub_mesh in &source.mesh.sub_meshes {
            hash_sub_mesh(&mut hasher, sub_mesh);
        }
        for material in &source.renderer.materials {
            hasher.update(material.name.as_bytes());
            let asset = material.get().filter(|asset| !asset.placeholder);
            hasher.update(&[asset.is_some() as u8]);
            let shader = asset.and_then(Asset::material).map(|data| data.shader_name.as_str()).unwrap_or_default();
            hasher.update(shader.as_bytes());
        }
        hasher.update(&source.layer.to_le_bytes());
        hasher.update(&source.renderer.lightmap_size.to_le_bytes());
        hasher.update(&[source.renderer.cast_shadows as u8, source.lighting_static as u8]);
    }
    hasher.finalize().to_hex().to_string()
}

fn is_transparent(material: &Asset) -> bool {
    material.material().is_some_and(|data| data.shader_name.to_ascii_lowercase().contains("transparent"))
}

/// Merges static geometry into as few batches as the grouping key allows.
/// Submeshes whose material is missing or a placeholder are skipped.
pub fn build_static_batches(ecs: &EcsWorld) -> Vec<GeometryBatch> {
    let mut batches: Vec<GeometryBatch> = Vec::new();
    let mut mesh_counts: Vec<usize> = Vec::new();
    for source in static_sources(ecs) {
        let renderer = source.renderer;
        let lightmap_size = u8::try_from(renderer.lightmap_size.clamp(0, i32::from(u8::MAX))).unwrap_or(u8::MAX);
        for (index, sub_mesh) in source.mesh.sub_meshes.iter().enumerate() {
            let Some(material) =
                renderer.materials.get(index).and_then(AssetRef::get).filter(|material| !material.placeholder)
            else {
                continue;
            };
            let position = batches.iter().zip(&mesh_counts).position(|(batch, count)| {
                batch.material == material.name
                    && batch.layer == source.layer
                    && batch.cast_shadows == renderer.cast_shadows
                    && batch.lighting_static == source.lighting_static
                    && batch.use_lightmap_uvs == sub_mesh.use_lightmap_uvs
                    && batch.lightmap_size == lightmap_size
                    && *count < MAX_MESHES_PER_BATCH
            });
            let slot = match position {
                Some(slot) => slot,
                None => {
                    batches.push(GeometryBatch {
                        material: material.name.clone(),
                        transparent: is_transparent(material),
                        lighting_static: source.lighting_static,
                        use_lightmap_uvs: sub_mesh.use_lightmap_uvs,
                        cast_shadows: renderer.cast_shadows,
                        lightmap_size,
                        layer: source.layer,
                        index: i32::try_from(batches.len()).unwrap_or(i32::MAX),
                        ..Default::default()
                    });
                    mesh_counts.push(0);
                    batches.len() - 1
                }
            };
            let batch = &mut batches[slot];
            mesh_counts[slot] += 1;
            let chained = format!("{}{}_{}", batch.guid, source.guid, index);
            batch.guid = blake3::hash(chained.as_bytes()).to_hex().to_string();

            let base = u32::try_from(batch.vertices.len()).unwrap_or(u32::MAX);
            if sub_mesh.index_buffer.is_empty() {
                let count = u32::try_from(sub_mesh.vertex_buffer.len()).unwrap_or(u32::MAX);
                batch.indices.extend((0..count).map(|i| base + i));
            } else {
                batch.indices.extend(sub_mesh.index_buffer.iter().map(|i| base + i));
            }
            batch.vertices.extend(
                sub_mesh.vertex_buffer.iter().map(|vertex| world_vertex(vertex, &source.matrix, source.rotation)),
            );
        }
    }
    batches
}

fn world_vertex(vertex: &VertexData, matrix: &Mat4, rotation: Quat) -> GeometryVertex {
    GeometryVertex {
        position: matrix.transform_point3((&vertex.position).into()),
        normal: rotation * Vec3::from(&vertex.normal),
        tangent: rotation * Vec3::from(&vertex.tangent),
        bitangent: rotation * Vec3::from(&vertex.bitangent),
        uv0: (&vertex.texcoord0).into(),
        uv1: (&vertex.texcoord1).into(),
        color: (&vertex.color).into(),
    }
}

/// Entities carrying a CSG model component.
pub fn csg_models(ecs: &EcsWorld) -> Vec<Entity> {
    ecs.entities_in_order().into_iter().filter(|entity| ecs.component::<CsgModel>(*entity).is_some()).collect()
}

struct BrushSource<'a> {
    guid: &'a str,
    matrix: Mat4,
    layer: i32,
    brush: &'a CsgBrush,
}

/// Active brushes under `model`, stopping at nested models.
fn brush_sources(ecs: &EcsWorld, model: Entity) -> Vec<BrushSource<'_>> {
    let mut sources = Vec::new();
    let mut queue: Vec<Entity> = ecs.children(model).to_vec();
    queue.reverse();
    while let Some(entity) = queue.pop() {
        if !ecs.is_active_in_hierarchy(entity) || ecs.component::<CsgModel>(entity).is_some() {
            continue;
        }
        let brush = ecs.components(entity).iter().filter(|slot| slot.enabled).find_map(|slot| match &slot.component {
            SceneComponent::CsgBrush(brush) => Some(brush),
            _ => None,
        });
        if let Some(brush) = brush {
            sources.push(BrushSource {
                guid: ecs.guid(entity).unwrap_or_default(),
                matrix: ecs.world_matrix(entity),
                layer: ecs.state(entity).map(|state| state.layer).unwrap_or_default(),
                brush,
            });
        }
        queue.extend(ecs.children(entity).iter().rev().copied());
    }
    sources
}

pub fn csg_fingerprint(ecs: &EcsWorld, model: Entity) -> String {
    let mut hasher = blake3::Hasher::new();
    for source in brush_sources(ecs, model) {
        hasher.update(source.guid.as_bytes());
        hash_matrix(&mut hasher, &source.matrix);
        hasher.update(&source.layer.to_le_bytes());
        hasher.update(&source.brush.operation.index().to_le_bytes());
        hasher.update(&[source.brush.cast_shadows as u8]);
        for vertex in &source.brush.vertices {
            hasher.update(bytemuck::cast_slice(&vertex.to_array()));
        }
        for face in &source.brush.faces {
            hasher.update(bytemuck::cast_slice(&face.indices));
            hasher.update(face.material.name.as_bytes());
            hasher.update(&[face.smooth_normals as u8]);
            for uv in &face.tex_coords {
                hasher.update(bytemuck::cast_slice(&uv.to_array()));
            }
            hasher.update(bytemuck::cast_slice(&face.tex_coords_scale.to_array()));
            hasher.update(bytemuck::cast_slice(&face.tex_coords_offset.to_array()));
            hasher.update(&face.tex_coords_rotation.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Stable per-brush id written next to every vertex a brush produces.
pub fn brush_id(guid: &str) -> u64 {
    let digest = blake3::hash(guid.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn face_uv(uv: Vec2, scale: Vec2, offset: Vec2, rotation_degrees: f32) -> Vec2 {
    Vec2::from_angle(rotation_degrees.to_radians()).rotate(uv * scale) + offset
}

/// Triangulates the faces of every additive brush under `model` into one
/// submesh per material, layer and shadow setting.
pub fn build_csg_mesh(ecs: &EcsWorld, model: Entity) -> CsgMesh {
    let model_guid = ecs.guid(model).unwrap_or_default();
    let mut sub_meshes: Vec<CsgSubMesh> = Vec::new();
    for source in brush_sources(ecs, model) {
        if source.brush.operation != CsgOperation::Add {
            // TODO: carve subtractive and intersecting brushes out of the additive volume.
            log::debug!("Skipping {:?} brush {} in CSG model {}", source.brush.operation, source.guid, model_guid);
            continue;
        }
        let brush = source.brush;
        let (_, rotation, _) = source.matrix.to_scale_rotation_translation();
        let id = brush_id(source.guid);
        let face_normals: Vec<Vec3> = brush.faces.iter().map(|face| face_normal(brush, &face.indices)).collect();

        for (face, flat_normal) in brush.faces.iter().zip(&face_normals) {
            if face.indices.len() < 3 {
                continue;
            }
            let material = face.material.name.clone();
            let slot = match sub_meshes.iter().position(|sub| {
                sub.material == material && sub.layer == source.layer && sub.cast_shadows == brush.cast_shadows
            }) {
                Some(slot) => slot,
                None => {
                    sub_meshes.push(CsgSubMesh {
                        guid: blake3::hash(format!("{model_guid}_{material}_{}", sub_meshes.len()).as_bytes())
                            .to_hex()
                            .to_string(),
                        material,
                        cast_shadows: brush.cast_shadows,
                        layer: source.layer,
                        ..Default::default()
                    });
                    sub_meshes.len() - 1
                }
            };
            let sub = &mut sub_meshes[slot];
            let base = u32::try_from(sub.vertices.len()).unwrap_or(u32::MAX);
            for (corner, vertex_index) in face.indices.iter().enumerate() {
                let local = brush.vertices.get(*vertex_index as usize).copied().unwrap_or(Vec3::ZERO);
                let normal = if face.smooth_normals {
                    smooth_normal(brush, &face_normals, *vertex_index)
                } else {
                    *flat_normal
                };
                let uv = face.tex_coords.get(corner).copied().unwrap_or(Vec2::ZERO);
                sub.vertices.push(GeometryVertex {
                    position: source.matrix.transform_point3(local),
                    normal: rotation * normal,
                    uv0: face_uv(uv, face.tex_coords_scale, face.tex_coords_offset, face.tex_coords_rotation),
                    color: Vec4::ONE,
                    ..Default::default()
                });
                sub.brush_ids.push(id);
            }
            let corners = u32::try_from(face.indices.len()).unwrap_or(u32::MAX);
            for i in 1..corners - 1 {
                sub.indices.extend([base, base + i, base + i + 1]);
            }
        }
    }
    CsgMesh { sub_meshes, fingerprint: csg_fingerprint(ecs, model) }
}

fn face_normal(brush: &CsgBrush, indices: &[u32]) -> Vec3 {
    let corner = |i: usize| {
        indices.get(i).and_then(|index| brush.vertices.get(*index as usize)).copied().unwrap_or(Vec3::ZERO)
    };
    (corner(1) - corner(0)).cross(corner(2) - corner(0)).normalize_or_zero()
}

fn smooth_normal(brush: &CsgBrush, face_normals: &[Vec3], vertex_index: u32) -> Vec3 {
    brush
        .faces
        .iter()
        .zip(face_normals)
        .filter(|(face, _)| face.smooth_normals && face.indices.contains(&vertex_index))
        .map(|(_, normal)| *normal)
        .sum::<Vec3>()
        .normalize_or_zero()
}

fn vertex_to_data(vertex: &GeometryVertex) -> GeometryVertexData {
    GeometryVertexData {
        position: vertex.position.into(),
        normal: vertex.normal.into(),
        tangent: vertex.tangent.into(),
        bitangent: vertex.bitangent.into(),
        texcoord0: vertex.uv0.into(),
        texcoord1: vertex.uv1.into(),
        color: vertex.color.into(),
        ..Default::default()
    }
}

fn vertex_from_data(data: &GeometryVertexData) -> GeometryVertex {
    GeometryVertex {
        position: (&data.position).into(),
        normal: (&data.normal).into(),
        tangent: (&data.tangent).into(),
        bitangent: (&data.bitangent).into(),
        uv0: (&data.texcoord0).into(),
        uv1: (&data.texcoord1).into(),
        color: (&data.color).into(),
    }
}

fn batches_to_data(batches: &[GeometryBatch], fingerprint: &str) -> BatchedGeometryData {
    let batches = batches
        .iter()
        .map(|batch| BatchData {
            material: batch.material.clone(),
            guid: batch.guid.clone(),
            transparent: batch.transparent,
            lighting_static: batch.lighting_static,
            use_lightmap_uvs: batch.use_lightmap_uvs,
            cast_shadows: batch.cast_shadows,
            lightmap_size: batch.lightmap_size,
            layer: batch.layer,
            index: batch.index,
            vertex_buffer: batch.vertices.iter().map(vertex_to_data).collect(),
            index_buffer: batch.indices.clone(),
            ..Default::default()
        })
        .collect();
    BatchedGeometryData { batches, fingerprint: fingerprint.to_string(), ..Default::default() }
}

fn batches_from_data(data: &BatchedGeometryData) -> Vec<GeometryBatch> {
    data.batches
        .iter()
        .map(|batch| GeometryBatch {
            material: batch.material.clone(),
            guid: batch.guid.clone(),
            transparent: batch.transparent,
            lighting_static: batch.lighting_static,
            use_lightmap_uvs: batch.use_lightmap_uvs,
            cast_shadows: batch.cast_shadows,
            lightmap_size: batch.lightmap_size,
            layer: batch.layer,
            index: batch.index,
            vertices: batch.vertex_buffer.iter().map(vertex_from_data).collect(),
            indices: batch.index_buffer.clone(),
        })
        .collect()
}

fn csg_to_data(mesh: &CsgMesh) -> CsgGeometryData {
    let sub_meshes = mesh
        .sub_meshes
        .iter()
        .map(|sub| CsgSubMeshData {
            material: sub.material.clone(),
            guid: sub.guid.clone(),
            cast_shadows: sub.cast_shadows,
            layer: sub.layer,
            vertex_buffer: sub.vertices.iter().map(vertex_to_data).collect(),
            index_buffer: sub.indices.clone(),
            id_buffer: sub.brush_ids.clone(),
            ..Default::default()
        })
        .collect();
    CsgGeometryData { sub_meshes, fingerprint: mesh.fingerprint.clone(), ..Default::default() }
}

fn csg_from_data(data: &CsgGeometryData) -> CsgMesh {
    let sub_meshes = data
        .sub_meshes
        .iter()
        .map(|sub| CsgSubMesh {
            material: sub.material.clone(),
            guid: sub.guid.clone(),
            cast_shadows: sub.cast_shadows,
            layer: sub.layer,
            vertices: sub.vertex_buffer.iter().map(vertex_from_data).collect(),
            indices: sub.index_buffer.clone(),
            brush_ids: sub.id_buffer.clone(),
        })
        .collect();
    CsgMesh { sub_meshes, fingerprint: data.fingerprint.clone() }
}

/// Reads a cache file, or `None` when it is missing or unusable.
fn read_cache<A, F>(path: &Path, format: &str, fingerprint: F) -> Option<A>
where
    A: serialization::Archive + Default,
    F: Fn(&A) -> &str,
{
    if !path.is_file() {
        log::info!("No geometry cache at {}", path.display());
        return None;
    }
    match serialization::load_from_path::<A>(path, format) {
        Ok(data) => Some(data).filter(|data| !fingerprint(data).is_empty()).or_else(|| {
            log::info!("Geometry cache {} has no fingerprint", path.display());
            None
        }),
        Err(err) => {
            log::info!("Geometry cache {} is unreadable: {err:#}", path.display());
            None
        }
    }
}

fn write_batches(path: &Path, batches: &[GeometryBatch], fingerprint: &str) -> Result<()> {
    if batches.is_empty() {
        if path.is_file() {
            fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        return Ok(());
    }
    let mut data = batches_to_data(batches, fingerprint);
    serialization::save_to_path(path, &mut data, BatchedGeometryData::FORMAT)
}

/// Loads the scene's derived geometry from the cache, rebuilding whatever is
/// missing or stale and writing the rebuilt data back.
pub fn restore_geometry(ecs: &mut EcsWorld, library: &Path, scene: &str, use_cache: bool) -> GeometryReport {
    let mut report = GeometryReport::default();
    let mut derived = DerivedGeometry::default();

    let path = static_geometry_path(library, scene);
    let fingerprint = static_fingerprint(ecs);
    let cached = if use_cache {
        read_cache::<BatchedGeometryData, _>(&path, BatchedGeometryData::FORMAT, |data| &data.fingerprint)
    } else {
        None
    };
    match cached {
        Some(data) if data.fingerprint == fingerprint => {
            derived.batches = batches_from_data(&data);
            report.static_from_cache = true;
        }
        stale => {
            if stale.is_some() {
                log::info!("Static geometry cache for '{scene}' is stale");
            }
            log::debug!("Rebuilding static batches for '{scene}'");
            derived.batches = build_static_batches(ecs);
            if let Err(err) = write_batches(&path, &derived.batches, &fingerprint) {
                log::warn!("Failed to write static geometry cache: {err:#}");
            }
        }
    }
    derived.batches_fingerprint = fingerprint;

    for model in csg_models(ecs) {
        let Some(guid) = ecs.guid(model).map(str::to_string) else {
            continue;
        };
        let path = csg_geometry_path(library, scene, &guid);
        let fingerprint = csg_fingerprint(ecs, model);
        let cached = if use_cache {
            read_cache::<CsgGeometryData, _>(&path, CsgGeometryData::FORMAT, |data| &data.fingerprint)
        } else {
            None
        };
        let mesh = match cached {
            Some(data) if data.fingerprint == fingerprint => {
                report.csg_from_cache += 1;
                csg_from_data(&data)
            }
            _ => {
                log::debug!("Rebuilding CSG model {guid} for '{scene}'");
                report.csg_rebuilt += 1;
                let mesh = build_csg_mesh(ecs, model);
                let mut data = csg_to_data(&mesh);
                if let Err(err) = serialization::save_to_path(&path, &mut data, CsgGeometryData::FORMAT) {
                    log::warn!("Failed to write CSG geometry cache: {err:#}");
                }
                mesh
            }
        };
        derived.csg_models.insert(guid, mesh);
    }

    ecs.world.insert_resource(derived);
    report
}

/// Rebuilds all derived geometry from the live graph and rewrites the
/// caches. An empty static result removes the static cache file.
pub fn save_geometry(ecs: &mut EcsWorld, library: &Path, scene: &str) -> Result<()> {
    let mut derived = DerivedGeometry {
        batches: build_static_batches(ecs),
        batches_fingerprint: static_fingerprint(ecs),
        ..Default::default()
    };
    write_batches(&static_geometry_path(library, scene), &derived.batches, &derived.batches_fingerprint)?;

    let csg_dir = csg_geometry_dir(library, scene);
    if csg_dir.is_dir() {
        fs::remove_dir_all(&csg_dir).with_context(|| format!("Failed to clear {}", csg_dir.display()))?;
    }
    for model in csg_models(ecs) {
        let Some(guid) = ecs.guid(model).map(str::to_string) else {
            continue;
        };
        let mesh = build_csg_mesh(ecs, model);
        let mut data = csg_to_data(&mesh);
        serialization::save_to_path(csg_geometry_path(library, scene, &guid), &mut data, CsgGeometryData::FORMAT)?;
        derived.csg_models.insert(guid, mesh);
    }

    ecs.world.insert_resource(derived);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetKind, AssetPayload};
    use crate::ecs::components::CsgFace;
    use crate::ecs::{EntityState, Transform};
    use crate::schema::assets::SubMeshData;
    use crate::schema::{MaterialData, Vec3Data};
    use std::sync::Arc;

    fn triangle_mesh() -> Arc<Asset> {
        let vertex = |x: f32| VertexData { position: Vec3Data::new(x, 0.0, 0.0), ..Default::default() };
        let sub_mesh = SubMeshData {
            vertex_buffer: vec![vertex(0.0), vertex(1.0), vertex(2.0)],
            index_buffer: vec![0, 1, 2],
            ..Default::default()
        };
        let mesh = MeshData { sub_meshes: vec![sub_mesh], ..Default::default() };
        Arc::new(Asset::in_memory(AssetKind::Mesh, "tri.mesh", AssetPayload::Mesh(mesh)))
    }

    fn material(name: &str) -> Arc<Asset> {
        Arc::new(Asset::in_memory(AssetKind::Material, name, AssetPayload::Material(MaterialData::default())))
    }

    fn static_object(ecs: &mut EcsWorld, x: f32, material_name: &str) -> Entity {
        let entity = ecs.spawn_entity("rock", None);
        ecs.set_transform(entity, Transform { position: Vec3::new(x, 0.0, 0.0), ..Default::default() });
        ecs.set_state(entity, EntityState { static_flags: StaticFlags::BATCHING, ..Default::default() });
        ecs.add_component(
            entity,
            MeshRenderer {
                mesh: AssetRef::loaded(triangle_mesh()),
                materials: vec![AssetRef::loaded(material(material_name))],
                ..Default::default()
            },
        );
        entity
    }

    #[test]
    fn static_meshes_sharing_a_material_merge_in_world_space() {
        let mut ecs = EcsWorld::new();
        static_object(&mut ecs, 0.0, "stone.material");
        static_object(&mut ecs, 10.0, "stone.material");
        static_object(&mut ecs, 0.0, "moss.material");

        let batches = build_static_batches(&ecs);
        assert_eq!(batches.len(), 2);
        let stone = &batches[0];
        assert_eq!(stone.vertices.len(), 6);
        assert_eq!(stone.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(stone.vertices[3].position.abs_diff_eq(Vec3::new(10.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn disabled_and_non_static_entities_are_not_batched() {
        let mut ecs = EcsWorld::new();
        let hidden = static_object(&mut ecs, 0.0, "stone.material");
        ecs.set_enabled(hidden, false);
        let dynamic = static_object(&mut ecs, 0.0, "stone.material");
        ecs.set_state(dynamic, EntityState::default());
        assert!(build_static_batches(&ecs).is_empty());
    }

    #[test]
    fn fingerprint_tracks_transforms() {
        let mut ecs = EcsWorld::new();
        let rock = static_object(&mut ecs, 0.0, "stone.material");
        let before = static_fingerprint(&ecs);
        ecs.set_transform(rock, Transform { position: Vec3::Y, ..Default::default() });
        assert_ne!(before, static_fingerprint(&ecs));
    }

    #[test]
    fn additive_quad_is_fanned_into_two_triangles() {
        let mut ecs = EcsWorld::new();
        let model = ecs.spawn_entity("model", Some("model-guid"));
        ecs.add_component(model, CsgModel);
        let brush_entity = ecs.spawn_entity("floor", Some("brush-guid"));
        ecs.set_parent(brush_entity, Some(model));
        let face = CsgFace {
            indices: vec![0, 1, 2, 3],
            tex_coords: Vec::new(),
            tex_coords_scale: Vec2::ONE,
            tex_coords_offset: Vec2::ZERO,
            tex_coords_rotation: 0.0,
            material: AssetRef { name: "floor.material".into(), handle: None },
            smooth_normals: false,
        };
        ecs.add_component(
            brush_entity,
            CsgBrush {
                vertices: vec![Vec3::ZERO, Vec3::Z, Vec3::new(1.0, 0.0, 1.0), Vec3::X],
                faces: vec![face],
                ..Default::default()
            },
        );

        let mesh = build_csg_mesh(&ecs, model);
        assert_eq!(mesh.sub_meshes.len(), 1);
        let sub = &mesh.sub_meshes[0];
        assert_eq!(sub.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(sub.brush_ids, vec![brush_id("brush-guid"); 4]);
        assert!(sub.vertices[0].normal.abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn cache_paths_follow_scene_folder_layout() {
        let library = Path::new("/lib");
        let path = static_geometry_path(library, "Scenes/Level1.scene");
        assert!(path.starts_with("/lib/Scenes/Level1/Static Geometry"));
        let csg = csg_geometry_path(library, "Scenes/Level1.scene", "abc");
        assert!(csg.starts_with("/lib/Scenes/Level1/CSG Geometry"));
        assert_ne!(csg, csg_geometry_path(library, "Scenes/Level1.scene", "abd"));
    }
}
