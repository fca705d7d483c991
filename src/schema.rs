//! Versioned records mirroring the live scene graph. They exist only for
//! the duration of one save or load.

pub mod assets;
pub mod component;
pub mod csg;
pub mod data;
pub mod game_object;
pub mod geometry;
pub mod media;
pub mod meta;
pub mod navigation;
pub mod particles;
pub mod physics;
pub mod rendering;
pub mod scene;
pub mod scripting;
pub mod settings;
pub mod terrain;
pub mod ui;

pub use assets::{AnimationClipData, MaterialData, MeshData};
pub use component::{ComponentHeader, UiElementHeader, NO_OBJECT};
pub use data::{ColorData, Mat4Data, QuatData, Vec2Data, Vec3Data, Vec4Data};
pub use game_object::GameObjectData;
pub use geometry::{BatchedGeometryData, CsgGeometryData};
pub use meta::Model3DMetaData;
pub use scene::SceneData;
pub use settings::{PlayerPrefsData, ProjectSettingsData};
pub use terrain::TerrainAssetData;
