//! The config file the server persists the [`ConfigStore`] in.
//!
//! The file holds whatever JSON object was last saved, pretty-printed with a
//! four-space indent. A missing or corrupt file reads as `{}`.

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::path::Path;
use tracing::warn;

use super::ConfigStore;
use crate::error::StampError;

/// Create the file with `{}` if it does not exist yet.
pub fn ensure_exists(path: &Path) -> Result<(), StampError> {
    if !path.exists() {
        write_value(path, &Value::Object(Map::new()))?;
    }
    Ok(())
}

/// Read the raw stored JSON.
pub fn read_value(path: &Path) -> Result<Value, StampError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Value::Object(Map::new())),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config file is not valid JSON, treating as empty");
            Ok(Value::Object(Map::new()))
        }
    }
}

/// Read the stored configuration as a [`ConfigStore`].
pub fn load_store(path: &Path) -> Result<ConfigStore, StampError> {
    let value = read_value(path)?;
    match serde_json::from_value(value) {
        Ok(store) => Ok(store),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config file is not a stamp mapping, treating as empty");
            Ok(ConfigStore::new())
        }
    }
}

/// Replace the file contents with `value`.
pub fn write_value(path: &Path, value: &Value) -> Result<(), StampError> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamp_config.json");
        assert_eq!(read_value(&path).unwrap(), json!({}));
        assert!(load_store(&path).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_exists_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stamp_config.json");
        ensure_exists(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");

        write_value(&path, &json!({"a.png": {"x": 1}})).unwrap();
        ensure_exists(&path).unwrap();
        assert_eq!(read_value(&path).unwrap(), json!({"a.png": {"x": 1}}));
    }

    #[test]
    fn test_write_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        write_value(&path, &json!({"a.png": {"x": 1}})).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"a.png\": {\n        \"x\": 1"), "got {}", text);
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(read_value(&path).unwrap(), json!({}));
    }

    #[test]
    fn test_non_mapping_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(load_store(&path).unwrap().is_empty());
    }
}
