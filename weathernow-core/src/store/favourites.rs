use std::path::{Path, PathBuf};

use super::{read_document, write_document};
use crate::model::normalize_place;

/// Read the favourites document; anything other than a JSON array of strings
/// yields an empty list.
pub fn load_favourites(path: &Path) -> Vec<String> {
    read_document(path).unwrap_or_default()
}

/// Rewrite the favourites document. Failures are logged, not returned.
pub fn save_favourites(path: &Path, names: &[String]) {
    if let Err(err) = write_document(path, names) {
        tracing::warn!("failed to save favourites: {err:#}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered, duplicate-free list of normalized place names.
#[derive(Debug)]
pub struct Favourites {
    path: PathBuf,
    names: Vec<String>,
}

impl Favourites {
    pub fn load(path: PathBuf) -> Self {
        let names = load_favourites(&path);
        Self { path, names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_place(name);
        self.names.contains(&name)
    }

    pub fn add(&mut self, name: &str) -> AddOutcome {
        let name = normalize_place(name);
        if self.names.contains(&name) {
            return AddOutcome::AlreadyPresent;
        }

        tracing::debug!(%name, "adding favourite");
        self.names.push(name);
        save_favourites(&self.path, &self.names);
        AddOutcome::Added
    }

    /// Returns whether anything was removed; nothing is written otherwise.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = normalize_place(name);
        let Some(pos) = self.names.iter().position(|n| *n == name) else {
            return false;
        };

        tracing::debug!(%name, "removing favourite");
        self.names.remove(pos);
        save_favourites(&self.path, &self.names);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn favourites_in(dir: &tempfile::TempDir) -> Favourites {
        Favourites::load(dir.path().join("favourites.json"))
    }

    #[test]
    fn add_is_idempotent_across_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = favourites_in(&dir);

        assert_eq!(favs.add("dehradun"), AddOutcome::Added);
        assert_eq!(favs.add("DEHRADUN"), AddOutcome::AlreadyPresent);

        assert_eq!(favs.names(), ["Dehradun".to_string()]);
        assert_eq!(load_favourites(&dir.path().join("favourites.json")), ["Dehradun"]);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = favourites_in(&dir);

        favs.add("london");
        favs.add("amritsar");
        favs.add("new york");

        let reloaded = favourites_in(&dir);
        assert_eq!(reloaded.names(), ["London", "Amritsar", "New York"]);
    }

    #[test]
    fn remove_absent_name_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.json");
        let mut favs = Favourites::load(path.clone());

        assert!(!favs.remove("Paris"));
        assert!(favs.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn remove_normalizes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut favs = favourites_in(&dir);
        favs.add("Delhi");
        favs.add("Mumbai");

        assert!(favs.remove("delhi"));
        assert!(!favs.contains("Delhi"));
        assert_eq!(favourites_in(&dir).names(), ["Mumbai"]);
    }

    #[test]
    fn wrong_shape_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.json");

        fs::write(&path, r#"{"Delhi": true}"#).unwrap();
        assert!(load_favourites(&path).is_empty());

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(load_favourites(&path).is_empty());
    }

    #[test]
    fn document_is_pretty_printed_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.json");

        save_favourites(&path, &["देहरादून".to_string()]);

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[\n  \"देहरादून\"\n]");
    }
}
