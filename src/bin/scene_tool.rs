use anyhow::{anyhow, Context, Result};
use kestrel_scene::schema::{
    AnimationClipData, BatchedGeometryData, CsgGeometryData, MaterialData, MeshData, Model3DMetaData, PlayerPrefsData,
    ProjectSettingsData, SceneData, TerrainAssetData,
};
use kestrel_scene::serialization::{self, Envelope};
use std::collections::HashSet;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process;

const KNOWN_FORMATS: &[&str] = &[
    SceneData::FORMAT,
    SceneData::PREFAB_FORMAT,
    MeshData::FORMAT,
    MaterialData::FORMAT,
    AnimationClipData::FORMAT,
    TerrainAssetData::FORMAT,
    BatchedGeometryData::FORMAT,
    CsgGeometryData::FORMAT,
    Model3DMetaData::FORMAT,
    ProjectSettingsData::FORMAT,
    PlayerPrefsData::FORMAT,
];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        log::error!("{err:?}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "info" => {
            let path = args.next().ok_or_else(|| anyhow!("info requires a path: scene_tool info <file>"))?;
            cmd_info(&path)
        }
        "validate" => {
            let scene_path = args
                .next()
                .ok_or_else(|| anyhow!("validate requires a path: scene_tool validate <scene>"))?;
            cmd_validate(&scene_path)
        }
        "list" => {
            let scene_path =
                args.next().ok_or_else(|| anyhow!("list requires a path: scene_tool list <scene>"))?;
            cmd_list(&scene_path)
        }
        "dump" => {
            let scene_path =
                args.next().ok_or_else(|| anyhow!("dump requires a path: scene_tool dump <scene>"))?;
            cmd_dump(&scene_path)
        }
        "extract" => {
            let scene_path = args
                .next()
                .ok_or_else(|| anyhow!("extract requires arguments: scene_tool extract <scene> <guid> <output>"))?;
            let guid = args.next().ok_or_else(|| anyhow!("extract missing entity guid argument"))?;
            let output_path = args.next().ok_or_else(|| anyhow!("extract missing output path argument"))?;
            cmd_extract(&scene_path, &guid, &output_path)
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => Err(anyhow!("unknown command '{other}'")),
    }
}

fn print_usage() {
    eprintln!(
        "Scene Tool

Usage:
  scene_tool info <file>                  Show the envelope of any engine file
  scene_tool validate <scene_path>        Check GUIDs, parents and cross-references
  scene_tool list <scene_path>            List entity GUIDs, parents, names and component counts
  scene_tool dump <scene_path>            Print the scene records as JSON
  scene_tool extract <scene> <guid> <out> Write the subtree rooted at <guid> as a prefab
  scene_tool help                         Show this message
"
    );
}

fn read_envelope(path: &str) -> Result<Envelope> {
    let file = File::open(path).with_context(|| format!("opening '{path}'"))?;
    let mut reader = BufReader::new(file);
    Envelope::read(&mut reader).with_context(|| format!("reading envelope of '{path}'"))
}

fn cmd_info(path: &str) -> Result<()> {
    let envelope = read_envelope(path)?;
    let format = KNOWN_FORMATS.iter().find(|label| envelope.matches_format(label)).copied().unwrap_or("unknown");
    println!("File:       {path}");
    println!("Endianness: {}", envelope.endianness.label());
    println!("Format:     {format}");
    println!("Version:    {}", envelope.version);
    Ok(())
}

/// Loads a scene or prefab file, whichever label the envelope carries.
fn load_scene(path: &str) -> Result<SceneData> {
    let envelope = read_envelope(path)?;
    let label = if envelope.matches_format(SceneData::PREFAB_FORMAT) {
        SceneData::PREFAB_FORMAT
    } else {
        SceneData::FORMAT
    };
    serialization::load_from_path(path, label).with_context(|| format!("loading scene '{path}'"))
}

fn cmd_validate(scene_path: &str) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let mut guids = HashSet::with_capacity(scene.game_objects.len());
    let mut issues = Vec::new();

    for object in &scene.game_objects {
        if !guids.insert(object.guid.as_str()) {
            issues.push(format!("duplicate entity guid '{}'", object.guid));
        }
    }

    for object in &scene.game_objects {
        if object.has_parent() && !guids.contains(object.parent_guid.as_str()) {
            issues.push(format!("entity '{}' references missing parent '{}'", object.guid, object.parent_guid));
        }
        for target in object.object_references() {
            if !guids.contains(target) {
                issues.push(format!("entity '{}' references missing object '{}'", object.guid, target));
            }
        }
    }

    if issues.is_empty() {
        println!(
            "Scene '{}' is valid. Entities: {}  Components: {}",
            scene_path,
            scene.game_objects.len(),
            scene.game_objects.iter().map(|object| object.component_count()).sum::<usize>(),
        );
        Ok(())
    } else {
        Err(anyhow!(format!("scene '{}' has issues:\n  - {}", scene_path, issues.join("\n  - "))))
    }
}

fn cmd_list(scene_path: &str) -> Result<()> {
    let scene = load_scene(scene_path)?;
    println!("{:<5} {:<38} {:<38} {:<6} {}", "Idx", "GUID", "Parent GUID", "Comps", "Name");
    println!("{}", "-".repeat(128));
    for (index, object) in scene.game_objects.iter().enumerate() {
        let parent = if object.has_parent() { object.parent_guid.as_str() } else { "-" };
        println!(
            "{:<5} {:<38} {:<38} {:<6} {}",
            index,
            object.guid,
            parent,
            object.component_count(),
            object.name
        );
    }
    Ok(())
}

fn cmd_dump(scene_path: &str) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let json = serde_json::to_string_pretty(&scene).context("encoding scene as JSON")?;
    println!("{json}");
    Ok(())
}

fn cmd_extract(scene_path: &str, guid: &str, output_path: &str) -> Result<()> {
    let scene = load_scene(scene_path)?;
    let Some(objects) = scene.subtree(guid) else {
        return Err(anyhow!(format!("entity '{}' not found in scene '{}'", guid, scene_path)));
    };
    let mut prefab = SceneData { game_objects: objects, ..Default::default() };
    serialization::save_to_path(output_path, &mut prefab, SceneData::PREFAB_FORMAT)?;
    println!("Extracted {} entities rooted at '{}' into '{}'", prefab.game_objects.len(), guid, output_path);
    Ok(())
}
