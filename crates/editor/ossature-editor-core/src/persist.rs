//! JSON persistence for skeletons and documents.
//!
//! Saving writes to a temporary file next to the destination and renames it
//! over the target, so a crash never leaves a half-written document.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use ossature_animation_core::Animation;
use ossature_skeleton_core::Skeleton;

use crate::error::{ReadError, SaveError};

/// A rig together with the animations authored against it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub skeleton: Skeleton,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

impl Document {
    pub fn new(skeleton: Skeleton) -> Self {
        Self {
            skeleton,
            animations: Vec::new(),
        }
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Skeleton, ReadError> {
    read_json(path.as_ref())
}

pub fn save(skeleton: &Skeleton, path: impl AsRef<Path>) -> Result<(), SaveError> {
    write_json(skeleton, path.as_ref())
}

pub fn load_document(path: impl AsRef<Path>) -> Result<Document, ReadError> {
    read_json(path.as_ref())
}

pub fn save_document(document: &Document, path: impl AsRef<Path>) -> Result<(), SaveError> {
    write_json(document, path.as_ref())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReadError> {
    let result = File::open(path)
        .map_err(ReadError::from)
        .and_then(|file| Ok(serde_json::from_reader(BufReader::new(file))?));
    match &result {
        Ok(_) => log::debug!("loaded {}", path.display()),
        Err(err) => log::warn!("failed to load {}: {err}", path.display()),
    }
    result
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<(), SaveError> {
    if path.file_name().is_none() {
        return Err(SaveError::InvalidPath(path.to_path_buf()));
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    let mut writer = BufWriter::new(temp_file.as_file_mut());
    serde_json::to_writer_pretty(&mut writer, value).map_err(SaveError::Serialize)?;
    writer.flush()?;
    writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    temp_file.persist(path)?;
    log::debug!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_without_a_file_name_are_rejected() {
        let skeleton = Skeleton::new();
        assert!(matches!(
            save(&skeleton, Path::new("/")),
            Err(SaveError::InvalidPath(_))
        ));
        assert!(matches!(
            save(&skeleton, Path::new("rig/..")),
            Err(SaveError::InvalidPath(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(dir.path().join("absent.json")),
            Err(ReadError::Io(_))
        ));
    }
}
