use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "PathsConfig::default_assets")]
    pub assets: PathBuf,
    #[serde(default = "PathsConfig::default_library")]
    pub library: PathBuf,
    #[serde(default = "PathsConfig::default_builtin")]
    pub builtin: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateGuidPolicy {
    /// Fail the load before any entity is created.
    #[default]
    Reject,
    /// Keep every entity; the later one owns the GUID lookup.
    LastWins,
}

impl DuplicateGuidPolicy {
    pub fn label(self) -> &'static str {
        match self {
            DuplicateGuidPolicy::Reject => "Reject",
            DuplicateGuidPolicy::LastWins => "Last Wins",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    #[serde(default)]
    pub duplicate_guids: DuplicateGuidPolicy,
    #[serde(default = "LoadConfig::default_use_geometry_cache")]
    pub use_geometry_cache: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

impl PathsConfig {
    fn default_assets() -> PathBuf {
        PathBuf::from("assets")
    }

    fn default_library() -> PathBuf {
        PathBuf::from("library")
    }

    fn default_builtin() -> PathBuf {
        PathBuf::from("builtin")
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets: Self::default_assets(),
            library: Self::default_library(),
            builtin: Self::default_builtin(),
        }
    }
}

impl LoadConfig {
    const fn default_use_geometry_cache() -> bool {
        true
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            duplicate_guids: DuplicateGuidPolicy::default(),
            use_geometry_cache: Self::default_use_geometry_cache(),
        }
    }
}

impl ProjectConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut cfg: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if let Some(root) = path.parent() {
            cfg.paths = cfg.paths.relative_to(root);
        }
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    /// Default layout rooted at `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self { paths: PathsConfig::default().relative_to(root.as_ref()), load: LoadConfig::default() }
    }
}

impl PathsConfig {
    /// Resolves relative entries against `root`; absolute entries are kept.
    pub fn relative_to(&self, root: &Path) -> Self {
        let join = |path: &Path| if path.is_absolute() { path.to_path_buf() } else { root.join(path) };
        Self { assets: join(&self.assets), library: join(&self.library), builtin: join(&self.builtin) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: ProjectConfig = serde_json::from_str(r#"{ "load": { "duplicate_guids": "last_wins" } }"#)
            .expect("parse config");
        assert_eq!(cfg.load.duplicate_guids, DuplicateGuidPolicy::LastWins);
        assert!(cfg.load.use_geometry_cache);
        assert_eq!(cfg.paths.library, PathBuf::from("library"));
    }

    #[test]
    fn paths_resolve_against_config_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("project.json");
        fs::write(&path, r#"{ "paths": { "assets": "content" }, "load": { "use_geometry_cache": false } }"#)
            .expect("write config");

        let cfg = ProjectConfig::load(&path).expect("load config");
        assert_eq!(cfg.paths.assets, dir.path().join("content"));
        assert_eq!(cfg.paths.library, dir.path().join("library"));
        assert!(!cfg.load.use_geometry_cache);
    }

    #[test]
    fn unreadable_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write config");
        assert!(ProjectConfig::load(&path).is_err());
        let cfg = ProjectConfig::load_or_default(&path);
        assert_eq!(cfg.load.duplicate_guids, DuplicateGuidPolicy::Reject);
    }
}
