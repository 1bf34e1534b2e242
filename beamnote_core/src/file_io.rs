//! # File I/O Module
//!
//! Output and configuration files:
//! - **Atomic writes**: Write to `.tmp`, sync, rename, so a failed run never
//!   leaves a truncated PDF or markup source behind
//! - **Config files**: `NoteConfig` as JSON; missing keys take defaults
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamnote_core::file_io::{load_config, write_atomic};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("beamnote.json"))?;
//! write_atomic(&config.source_path(), b"= Note")?;
//! # Ok::<(), beamnote_core::errors::NoteError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::NoteConfig;
use crate::errors::{NoteError, NoteResult};

/// Write `contents` to `path` atomically.
///
/// The data goes to `<path>.tmp` first, is synced to disk and then renamed
/// over `path`. Missing parent directories are created.
///
/// # Returns
///
/// * `Ok(())` - File written
/// * `Err(NoteError::FileError)` - Any I/O step failed; the temp file is removed
pub fn write_atomic(path: &Path, contents: &[u8]) -> NoteResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            NoteError::file_error("create directory", parent.display().to_string(), e.to_string())
        })?;
    }

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        NoteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(contents).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        NoteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    // Sync to disk
    tmp_file.sync_all().map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        NoteError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    drop(tmp_file);

    // Atomic rename
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        NoteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// `<path>.tmp`, keeping the original extension visible
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load a note configuration from a JSON file.
///
/// # Returns
///
/// * `Ok(NoteConfig)` - Parsed config, unspecified fields at their defaults
/// * `Err(NoteError::SerializationError)` - Invalid JSON or wrong field types
/// * `Err(NoteError::FileError)` - I/O error
pub fn load_config(path: &Path) -> NoteResult<NoteConfig> {
    let mut file = File::open(path).map_err(|e| {
        NoteError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        NoteError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| NoteError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a note configuration as pretty-printed JSON.
pub fn save_config(config: &NoteConfig, path: &Path) -> NoteResult<()> {
    let json = serde_json::to_string_pretty(config).map_err(|e| NoteError::SerializationError {
        reason: e.to_string(),
    })?;
    write_atomic(path, json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Engine;

    #[test]
    fn test_tmp_path_generation() {
        let tmp = tmp_path_for(Path::new("/out/note.pdf"));
        assert_eq!(tmp, Path::new("/out/note.pdf.tmp"));
    }

    #[test]
    fn test_atomic_write_creates_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("note.typ");

        write_atomic(&path, b"= Note").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "= Note");
        assert!(!tmp_path_for(&path).exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.tex");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("beamnote.json");

        let mut config = NoteConfig::default();
        config.engine = Engine::Latex;
        config.meta.author = "Test Engineer".to_string();
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ \"stride\": \"two\" }").unwrap();

        let err = load_config(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
