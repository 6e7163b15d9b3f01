use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use super::{read_document, write_document};

/// Capture time exactly as it appears in the document.
///
/// The text is kept verbatim so loading and saving an untouched cache does
/// not rewrite it. Values without an offset are read as UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapturedAt(String);

impl CapturedAt {
    pub fn now() -> Self {
        Self(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if let Ok(stamp) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(stamp.with_timezone(&Utc));
        }
        self.0.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }
}

impl From<&str> for CapturedAt {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Last known provider payload for a key, stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: CapturedAt,
    pub data: serde_json::Value,
}

pub type CacheMap = BTreeMap<String, CacheEntry>;

/// Read the cache document; a malformed document is discarded, not repaired.
pub fn load_cache(path: &Path) -> CacheMap {
    read_document(path).unwrap_or_default()
}

/// Rewrite the cache document. Failures are logged, not returned.
pub fn save_cache(path: &Path, entries: &CacheMap) {
    if let Err(err) = write_document(path, entries) {
        tracing::warn!("failed to save response cache: {err:#}");
    }
}

/// Offline fallback store: one entry per key, last write wins, never expired.
#[derive(Debug)]
pub struct ResponseCache {
    path: PathBuf,
    entries: CacheMap,
}

impl ResponseCache {
    pub fn load(path: PathBuf) -> Self {
        let entries = load_cache(&path);
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: &str, data: serde_json::Value) {
        let entry = CacheEntry { timestamp: CapturedAt::now(), data };
        self.entries.insert(key.to_string(), entry);
        save_cache(&self.path, &self.entries);
    }

    pub fn entries(&self) -> &CacheMap {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn put_overwrites_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut cache = ResponseCache::load(path.clone());

        cache.put("Delhi", json!({"main": {"temp": 31.0}}));
        let first = cache.get("Delhi").unwrap().timestamp.to_utc().unwrap();
        cache.put("Delhi", json!({"main": {"temp": 33.5}}));

        let reloaded = ResponseCache::load(path);
        assert_eq!(reloaded.entries().len(), 1);
        let entry = reloaded.get("Delhi").unwrap();
        assert_eq!(entry.data["main"]["temp"], 33.5);
        assert!(entry.timestamp.to_utc().unwrap() >= first);
    }

    #[test]
    fn save_of_unmodified_load_is_a_fixed_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let document = r#"{
  "30.3165,78.0322": {
    "timestamp": "2024-05-01T06:30:00.123456Z",
    "data": {"current": {"uvi": 7.2}, "daily": []}
  },
  "Dehradun": {
    "timestamp": "2024-05-01T06:29:59Z",
    "data": {"cod": 200, "name": "Dehradun", "main": {"temp": 28.0, "humidity": 40}}
  }
}"#;
        fs::write(&path, document).unwrap();

        save_cache(&path, &load_cache(&path));

        let before: serde_json::Value = serde_json::from_str(document).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn offsetless_and_offset_timestamps_survive_a_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let document = r#"{
  "Agra": {"timestamp": "2024-05-01T06:30:00.123456", "data": {"cod": 200}},
  "Delhi": {"timestamp": "2024-05-01T06:30:00+00:00", "data": {"cod": 200}},
  "Pune": {"timestamp": "2024-05-01T06:30:00Z", "data": {"cod": 200}}
}"#;
        fs::write(&path, document).unwrap();

        let entries = load_cache(&path);
        assert_eq!(entries.len(), 3);
        save_cache(&path, &entries);

        let before: serde_json::Value = serde_json::from_str(document).unwrap();
        let after: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(before, after);
        assert_eq!(after["Delhi"]["timestamp"], "2024-05-01T06:30:00+00:00");
    }

    #[test]
    fn captured_at_reads_naive_values_as_utc() {
        let expected = DateTime::parse_from_rfc3339("2024-05-01T06:30:00.123456Z")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(CapturedAt::from("2024-05-01T06:30:00.123456").to_utc(), Some(expected));
        assert_eq!(CapturedAt::from("2024-05-01T12:00:00.123456+05:30").to_utc(), Some(expected));
        assert_eq!(CapturedAt::from("yesterday").to_utc(), None);
    }

    #[test]
    fn fresh_stamps_parse_back() {
        let stamp = CapturedAt::now();
        assert!(stamp.as_str().ends_with('Z'));
        assert!(stamp.to_utc().is_some());
    }

    #[test]
    fn malformed_cache_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        fs::write(&path, r#"["not", "a", "map"]"#).unwrap();
        assert!(load_cache(&path).is_empty());

        fs::write(&path, r#"{"Delhi": {"data": {}}}"#).unwrap();
        assert!(load_cache(&path).is_empty());
    }
}
