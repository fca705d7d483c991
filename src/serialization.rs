//! Binary serialization: primitive codec, versioned archives and the file
//! envelope that wraps every payload.

mod archive;
mod codec;
mod error;
mod serializer;

pub use archive::{Archive, Fields};
pub use codec::{BulkPrimitive, Endianness, Primitive};
pub use error::{Result, SerializeError};
pub use serializer::{format_digest, header_digest, BinarySerializer, Envelope, Operation, Serializer, HEADER};

use anyhow::Context;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Writes `archive` to `path`, creating parent directories as needed.
pub fn save_to_path<A: Archive>(path: impl AsRef<Path>, archive: &mut A, format: &str) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory '{}'", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);
    BinarySerializer::new()
        .serialize(&mut writer, archive, format)
        .with_context(|| format!("writing {format} '{}'", path.display()))
}

pub fn load_from_path<A: Archive + Default>(path: impl AsRef<Path>, format: &str) -> anyhow::Result<A> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening '{}'", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut archive = A::default();
    BinarySerializer::new()
        .deserialize(&mut reader, &mut archive, format)
        .with_context(|| format!("reading {format} '{}'", path.display()))?;
    Ok(archive)
}
