//! Local cache of downloaded Figma files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{RemoteError, RemoteResult};

/// A directory of `<key>.json` files, each with an optional `<key>.meta`
/// sidecar written by asset tooling.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached JSON for `key`.
    pub fn path(&self, key: &str) -> RemoteResult<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path(key).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Store `body` for `key`, creating the directory if needed.
    pub fn write(&self, key: &str, body: &str) -> RemoteResult<PathBuf> {
        let path = self.path(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| RemoteError::io(&self.dir, e))?;
        std::fs::write(&path, body).map_err(|e| RemoteError::io(&path, e))?;
        log::debug!("Cached {} ({} bytes)", path.display(), body.len());
        Ok(path)
    }

    pub fn read(&self, key: &str) -> RemoteResult<String> {
        let path = self.path(key)?;
        std::fs::read_to_string(&path).map_err(|e| RemoteError::io(&path, e))
    }

    /// Keys of every cached file, sorted. A missing directory is an empty cache.
    pub fn list(&self) -> RemoteResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RemoteError::io(&self.dir, e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| RemoteError::io(&self.dir, e))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Remove the JSON and its `.meta` sidecar. Returns whether anything was
    /// removed.
    pub fn delete(&self, key: &str) -> RemoteResult<bool> {
        let json = self.path(key)?;
        let meta = self.dir.join(format!("{key}.meta"));

        let mut removed = false;
        for path in [meta, json] {
            match std::fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(RemoteError::io(&path, e)),
            }
        }

        if removed {
            log::info!("Deleted cached file {}", key);
        }
        Ok(removed)
    }
}

/// Keys become file names, so they must not leave the cache directory.
fn check_key(key: &str) -> RemoteResult<()> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\']);
    if bad {
        return Err(RemoteError::InvalidKey(key.to_string()));
    }
    Ok(())
}
