//! Named file persistence for buffer sets.
//!
//! A set with one buffer is written as its raw content. A set with several
//! buffers is written as a JSON array of contents. Reading tries the array
//! form first and treats anything else as the content of a single buffer,
//! so plain text files and older saves always open.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app::domain::buffer::BufferSet;
use crate::app::infrastructure::error::{AppError, Result};

/// Every saved file is stored as `<dir>/file_<name>`.
pub const FILE_PREFIX: &str = "file_";

pub fn encode(set: &BufferSet) -> Result<String> {
    if set.len() == 1 {
        return Ok(set.buffers()[0].content.clone());
    }
    Ok(serde_json::to_string(&set.contents())?)
}

pub fn decode(raw: &str) -> BufferSet {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(contents) if !contents.is_empty() => BufferSet::from_contents(contents),
        _ => BufferSet::from_contents([raw]),
    }
}

/// Trimmed name, or `InvalidFileName` if it is empty or could escape the
/// store directory.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let escapes = trimmed.contains(|c| c == '/' || c == '\\') || trimmed == "." || trimmed == "..";
    if trimmed.is_empty() || escapes {
        return Err(AppError::InvalidFileName(name.to_string()));
    }
    Ok(trimmed)
}

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `set` under `name`, replacing any file of that name.
    pub fn save(&self, name: &str, set: &BufferSet) -> Result<()> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, encode(set)?)?;
        tracing::debug!("Wrote {} buffer(s) to {}", set.len(), path.display());
        Ok(())
    }

    pub fn open(&self, name: &str) -> Result<BufferSet> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(decode(&raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::FileNotFound(name.trim().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::FileNotFound(name.trim().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Saved names in alphabetical order. A store directory that does not
    /// exist yet simply has no files.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                file_name.strip_prefix(FILE_PREFIX).map(|s| s.to_string())
            })
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = validate_name(name)?;
        Ok(self.dir.join(format!("{}{}", FILE_PREFIX, name)))
    }
}
