//! On-disk JSON documents: the favourites list and the offline response cache.
//!
//! Both documents are small, pretty-printed and rewritten in full on every
//! mutation. Reads never fail: a missing, unreadable or malformed document
//! is treated as empty. Write failures are logged and otherwise ignored.

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub mod cache;
pub mod favourites;

pub use cache::{CacheEntry, CacheMap, CapturedAt, ResponseCache, load_cache, save_cache};
pub use favourites::{AddOutcome, Favourites, load_favourites, save_favourites};

pub const FAVOURITES_FILE: &str = "favourites.json";
pub const CACHE_FILE: &str = "cache.json";

/// Both documents, rooted in one data directory.
#[derive(Debug)]
pub struct Store {
    pub favourites: Favourites,
    pub cache: ResponseCache,
}

impl Store {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            favourites: Favourites::load(data_dir.join(FAVOURITES_FILE)),
            cache: ResponseCache::load(data_dir.join(CACHE_FILE)),
        }
    }
}

/// Read and decode a document, or `None` if it is absent or unusable.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read document: {err}");
            return None;
        }
    };

    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), "discarding malformed document: {err}");
            None
        }
    }
}

/// Replace a document with `value`, via a sibling temp file and a rename.
pub(crate) fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize document")?;

    let tmp = temp_path(path);
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_document_treats_missing_and_garbage_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        assert_eq!(read_document::<Vec<String>>(&path), None);

        fs::write(&path, "not json").unwrap();
        assert_eq!(read_document::<Vec<String>>(&path), None);
    }

    #[test]
    fn write_document_creates_parent_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");

        write_document(&path, &vec!["Delhi"]).unwrap();

        assert_eq!(read_document::<Vec<String>>(&path), Some(vec!["Delhi".to_string()]));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn open_reads_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FAVOURITES_FILE), r#"["London"]"#).unwrap();

        let store = Store::open(dir.path());
        assert_eq!(store.favourites.names(), ["London".to_string()]);
        assert!(store.cache.is_empty());
    }
}
