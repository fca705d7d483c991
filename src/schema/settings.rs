use crate::archive;
use crate::serialization;
use anyhow::Result;
use std::path::Path;

pub const MAX_LAYERS: usize = 32;

archive! {
    pub struct ProjectSettingsData: 0 {
        data startup_scene: String = String::new(),
        data screen_width: i32 = 1280,
        data screen_height: i32 = 800,
        data use_native_resolution: bool = true,
        data fullscreen: bool = true,
        data exclusive_mode: bool = false,
        data vsync: bool = true,
        data fxaa: bool = false,
        data use_dynamic_resolution: bool = false,
        data auto_dynamic_resolution: bool = false,
        data auto_dynamic_resolution_target_fps: i32 = 60,
        data dynamic_resolution: f32 = 1.0,
        data directional_shadow_resolution: i32 = 2048,
        data spot_shadow_resolution: i32 = 1024,
        data point_shadow_resolution: i32 = 2048,
        data shadow_cascades_count: i32 = 4,
        data shadow_samples_count: i32 = 2,
        data shadow_cascades_blending: bool = true,
        data shadows_enabled: bool = true,
        data shadow_distance: f32 = 100.0,
        data texture_compression: i32 = 2,
        data texture_compression_quality: i32 = 1,
        data texture_max_resolution: i32 = 4096,
        data enable_steam_api: bool = false,
        data steam_app_id: i32 = 0,
        list tags: Vec<String> = Vec::new(),
        list layers: Vec<String> = Vec::new(),
        list scenes: Vec<String> = Vec::new(),
        /// Row-major layer-vs-layer collision flags.
        bulk collision_matrix: Vec<u8> = vec![1; MAX_LAYERS * MAX_LAYERS],
    }
}

impl ProjectSettingsData {
    pub const FORMAT: &'static str = "Project Settings";

    pub fn layers_collide(&self, a: usize, b: usize) -> bool {
        if a >= MAX_LAYERS || b >= MAX_LAYERS {
            return false;
        }
        self.collision_matrix.get(a * MAX_LAYERS + b).is_some_and(|flag| *flag != 0)
    }

    /// Sets the flag symmetrically for both layer orders.
    pub fn set_layers_collide(&mut self, a: usize, b: usize, collide: bool) {
        if a >= MAX_LAYERS || b >= MAX_LAYERS {
            return;
        }
        self.collision_matrix.resize(MAX_LAYERS * MAX_LAYERS, 1);
        self.collision_matrix[a * MAX_LAYERS + b] = u8::from(collide);
        self.collision_matrix[b * MAX_LAYERS + a] = u8::from(collide);
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        serialization::load_from_path(path, Self::FORMAT)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        serialization::save_to_path(path, self, Self::FORMAT)
    }
}

archive! {
    pub struct PlayerPrefEntryData: 0 {
        data key: String = String::new(),
        data string_value: String = String::new(),
        data int_value: i32 = 0,
        data float_value: f32 = 0.0,
    }
}

archive! {
    /// Small persistent key/value store. Each key owns one slot per value
    /// type; setting one slot leaves the others untouched.
    pub struct PlayerPrefsData: 0 {
        archives entries: Vec<PlayerPrefEntryData> = Vec::new(),
    }
}

impl PlayerPrefsData {
    pub const FORMAT: &'static str = "Player Prefs";

    /// Loads prefs from `path`; a missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        serialization::load_from_path(path, Self::FORMAT)
    }

    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        serialization::save_to_path(path, self, Self::FORMAT)
    }

    fn entry(&self, key: &str) -> Option<&PlayerPrefEntryData> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    fn entry_mut(&mut self, key: &str) -> &mut PlayerPrefEntryData {
        let position = match self.entries.iter().position(|entry| entry.key == key) {
            Some(position) => position,
            None => {
                self.entries.push(PlayerPrefEntryData { key: key.to_string(), ..Default::default() });
                self.entries.len() - 1
            }
        };
        &mut self.entries[position]
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.entry_mut(key).int_value = value;
    }

    pub fn int(&self, key: &str, default: i32) -> i32 {
        self.entry(key).map_or(default, |entry| entry.int_value)
    }

    pub fn set_float(&mut self, key: &str, value: f32) {
        self.entry_mut(key).float_value = value;
    }

    pub fn float(&self, key: &str, default: f32) -> f32 {
        self.entry(key).map_or(default, |entry| entry.float_value)
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.entry_mut(key).string_value = value.into();
    }

    pub fn string(&self, key: &str, default: &str) -> String {
        self.entry(key).map_or_else(|| default.to_string(), |entry| entry.string_value.clone())
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    pub fn delete_key(&mut self, key: &str) {
        self.entries.retain(|entry| entry.key != key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefs_keep_typed_slots_per_key() {
        let mut prefs = PlayerPrefsData::default();
        prefs.set_int("volume", 7);
        prefs.set_string("volume", "loud");
        prefs.set_float("sensitivity", 0.5);

        assert_eq!(prefs.int("volume", 0), 7);
        assert_eq!(prefs.string("volume", ""), "loud");
        assert_eq!(prefs.float("sensitivity", 1.0), 0.5);
        assert_eq!(prefs.int("missing", 42), 42);
        assert_eq!(prefs.entries.len(), 2);

        prefs.delete_key("volume");
        assert!(!prefs.has_key("volume"));
        assert!(prefs.has_key("sensitivity"));
        prefs.clear();
        assert!(prefs.entries.is_empty());
    }

    #[test]
    fn prefs_persist_and_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("prefs.bin");
        assert!(PlayerPrefsData::load(&path).expect("load missing").entries.is_empty());

        let mut prefs = PlayerPrefsData::default();
        prefs.set_string("player", "kestrel");
        prefs.set_int("level", 3);
        prefs.save(&path).expect("save prefs");

        let loaded = PlayerPrefsData::load(&path).expect("load prefs");
        assert_eq!(loaded, prefs);
        assert_eq!(loaded.string("player", ""), "kestrel");
    }

    #[test]
    fn collision_matrix_is_symmetric() {
        let mut settings = ProjectSettingsData::default();
        assert!(settings.layers_collide(3, 5));
        settings.set_layers_collide(3, 5, false);
        assert!(!settings.layers_collide(5, 3));
        assert!(!settings.layers_collide(40, 1));
    }
}
