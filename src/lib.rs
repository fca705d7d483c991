pub mod assets;
pub mod config;
pub mod ecs;
pub mod environment;
pub mod geometry;
pub mod scene;
pub mod schema;
pub mod serialization;

pub use config::ProjectConfig;
pub use ecs::EcsWorld;
pub use scene::{instantiate_prefab, load_scene, open_scene, save_scene};
