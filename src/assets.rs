//! Name-based asset resolution for scene loading.

use crate::config::PathsConfig;
use crate::schema::{AnimationClipData, MaterialData, MeshData, TerrainAssetData};
use crate::serialization;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Mesh,
    Material,
    Texture,
    Cubemap,
    Font,
    AudioClip,
    VideoClip,
    AnimationClip,
    TerrainData,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Mesh => "mesh",
            AssetKind::Material => "material",
            AssetKind::Texture => "texture",
            AssetKind::Cubemap => "cubemap",
            AssetKind::Font => "font",
            AssetKind::AudioClip => "audio clip",
            AssetKind::VideoClip => "video clip",
            AssetKind::AnimationClip => "animation clip",
            AssetKind::TerrainData => "terrain data",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetPayload {
    /// The file exists but its contents are opaque to the scene layer.
    Opaque,
    Mesh(MeshData),
    Material(MaterialData),
    AnimationClip(AnimationClipData),
    Terrain(TerrainAssetData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub kind: AssetKind,
    pub name: String,
    pub path: Option<PathBuf>,
    /// Stand-in created because the referenced file is missing.
    pub placeholder: bool,
    pub payload: AssetPayload,
}

pub type AssetHandle = Arc<Asset>;

impl Asset {
    pub fn in_memory(kind: AssetKind, name: impl Into<String>, payload: AssetPayload) -> Self {
        Self { kind, name: name.into(), path: None, placeholder: false, payload }
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.payload {
            AssetPayload::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&MaterialData> {
        match &self.payload {
            AssetPayload::Material(material) => Some(material),
            _ => None,
        }
    }

    pub fn animation_clip(&self) -> Option<&AnimationClipData> {
        match &self.payload {
            AssetPayload::AnimationClip(clip) => Some(clip),
            _ => None,
        }
    }

    pub fn terrain(&self) -> Option<&TerrainAssetData> {
        match &self.payload {
            AssetPayload::Terrain(terrain) => Some(terrain),
            _ => None,
        }
    }
}

/// Resolves asset names referenced by scene records.
///
/// Loading is idempotent: the same `(kind, name)` always yields the same
/// handle. A missing file is never an error; the loader returns `None` (or a
/// placeholder, for materials) and the caller carries on.
pub trait AssetLoader {
    fn load(&mut self, kind: AssetKind, name: &str) -> Option<AssetHandle>;
}

type AssetKey = (AssetKind, String);

pub struct AssetManager {
    roots: Vec<PathBuf>,
    loaded: HashMap<AssetKey, AssetHandle>,
    missing: HashSet<AssetKey>,
}

impl AssetManager {
    /// Searches built-in resources first, then project assets, then the
    /// derived-data library.
    pub fn new(paths: &PathsConfig) -> Self {
        Self::with_roots(vec![paths.builtin.clone(), paths.assets.clone(), paths.library.clone()])
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots, loaded: HashMap::new(), missing: HashSet::new() }
    }

    /// Registers an asset that has no backing file.
    pub fn insert(&mut self, asset: Asset) -> AssetHandle {
        let key = (asset.kind, asset.name.clone());
        self.missing.remove(&key);
        let handle = Arc::new(asset);
        self.loaded.insert(key, Arc::clone(&handle));
        handle
    }

    pub fn get(&self, kind: AssetKind, name: &str) -> Option<AssetHandle> {
        self.loaded.get(&(kind, name.to_string())).cloned()
    }

    pub fn is_missing(&self, kind: AssetKind, name: &str) -> bool {
        self.missing.contains(&(kind, name.to_string()))
    }

    pub fn missing(&self) -> impl Iterator<Item = (AssetKind, &str)> {
        self.missing.iter().map(|(kind, name)| (*kind, name.as_str()))
    }

    pub fn resolve_path(&self, name: &str) -> Option<PathBuf> {
        let candidate = Path::new(name);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }
        self.roots.iter().map(|root| root.join(candidate)).find(|path| path.is_file())
    }

    fn placeholder(&mut self, kind: AssetKind, name: &str) -> AssetHandle {
        let handle = Arc::new(Asset {
            kind,
            name: name.to_string(),
            path: None,
            placeholder: true,
            payload: AssetPayload::Material(MaterialData::default()),
        });
        self.loaded.insert((kind, name.to_string()), Arc::clone(&handle));
        handle
    }
}

impl AssetLoader for AssetManager {
    fn load(&mut self, kind: AssetKind, name: &str) -> Option<AssetHandle> {
        if name.is_empty() {
            return None;
        }
        if let Some(handle) = self.get(kind, name) {
            return Some(handle);
        }
        let key = (kind, name.to_string());
        let Some(path) = self.resolve_path(name) else {
            if self.missing.insert(key) {
                log::warn!("{} '{}' not found", kind.label(), name);
            }
            return match kind {
                AssetKind::Material => Some(self.placeholder(kind, name)),
                _ => None,
            };
        };
        let payload = read_payload(kind, &path);
        let handle = Arc::new(Asset { kind, name: name.to_string(), path: Some(path), placeholder: false, payload });
        self.missing.remove(&key);
        self.loaded.insert(key, Arc::clone(&handle));
        Some(handle)
    }
}

fn read_payload(kind: AssetKind, path: &Path) -> AssetPayload {
    let payload = match kind {
        AssetKind::Mesh => serialization::load_from_path(path, MeshData::FORMAT).map(AssetPayload::Mesh),
        AssetKind::Material => {
            serialization::load_from_path(path, MaterialData::FORMAT).map(AssetPayload::Material)
        }
        AssetKind::AnimationClip => {
            serialization::load_from_path(path, AnimationClipData::FORMAT).map(AssetPayload::AnimationClip)
        }
        AssetKind::TerrainData => {
            serialization::load_from_path(path, TerrainAssetData::FORMAT).map(AssetPayload::Terrain)
        }
        _ => return AssetPayload::Opaque,
    };
    payload.unwrap_or_else(|err| {
        log::warn!("{} '{}' could not be read: {err:#}", kind.label(), path.display());
        AssetPayload::Opaque
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::assets::SubMeshData;

    #[test]
    fn repeated_loads_share_one_handle() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut mesh = MeshData { alias: "crate".into(), ..Default::default() };
        mesh.sub_meshes.push(SubMeshData { material_name: "wood".into(), ..Default::default() });
        serialization::save_to_path(dir.path().join("crate.mesh"), &mut mesh, MeshData::FORMAT).expect("save mesh");

        let mut assets = AssetManager::with_roots(vec![dir.path().to_path_buf()]);
        let first = assets.load(AssetKind::Mesh, "crate.mesh").expect("first load");
        let second = assets.load(AssetKind::Mesh, "crate.mesh").expect("second load");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.mesh().map(|mesh| mesh.alias.as_str()), Some("crate"));
    }

    #[test]
    fn missing_mesh_is_none_and_missing_material_is_placeholder() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut assets = AssetManager::with_roots(vec![dir.path().to_path_buf()]);

        assert!(assets.load(AssetKind::Mesh, "ghost.mesh").is_none());
        assert!(assets.is_missing(AssetKind::Mesh, "ghost.mesh"));

        let material = assets.load(AssetKind::Material, "ghost.material").expect("placeholder");
        assert!(material.placeholder);
        let again = assets.load(AssetKind::Material, "ghost.material").expect("placeholder");
        assert!(Arc::ptr_eq(&material, &again));
    }

    #[test]
    fn unreadable_payload_still_resolves() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("broken.material"), b"not a material").expect("write");
        let mut assets = AssetManager::with_roots(vec![dir.path().to_path_buf()]);
        let handle = assets.load(AssetKind::Material, "broken.material").expect("handle");
        assert!(!handle.placeholder);
        assert_eq!(handle.payload, AssetPayload::Opaque);
    }

    #[test]
    fn builtin_resources_shadow_project_assets() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths = PathsConfig::default().relative_to(dir.path());
        for (root, alias) in [(&paths.assets, "project"), (&paths.builtin, "builtin")] {
            let mut mesh = MeshData { alias: alias.into(), ..Default::default() };
            serialization::save_to_path(root.join("Models/cube.mesh"), &mut mesh, MeshData::FORMAT).expect("save mesh");
        }

        let mut assets = AssetManager::new(&paths);
        let cube = assets.load(AssetKind::Mesh, "Models/cube.mesh").expect("cube");
        assert_eq!(cube.mesh().map(|mesh| mesh.alias.as_str()), Some("builtin"));
    }

    #[test]
    fn inserted_asset_resolves_a_missing_name() {
        let mut assets = AssetManager::with_roots(Vec::new());
        assert!(assets.load(AssetKind::Texture, "ui/button.png").is_none());
        assert_eq!(assets.missing().collect::<Vec<_>>(), vec![(AssetKind::Texture, "ui/button.png")]);

        let inserted = assets.insert(Asset::in_memory(AssetKind::Texture, "ui/button.png", AssetPayload::Opaque));
        let loaded = assets.load(AssetKind::Texture, "ui/button.png").expect("inserted asset");
        assert!(Arc::ptr_eq(&inserted, &loaded));
        assert!(!assets.is_missing(AssetKind::Texture, "ui/button.png"));
        assert_eq!(assets.missing().count(), 0);
    }
}
