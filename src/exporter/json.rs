// file: src/exporter/json.rs
// description: json artifact reading and writing (chunks, metadata, manifest, reports)
// reference: https://docs.rs/serde_json

use crate::error::{AdvisorError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

pub struct JsonExporter;

impl JsonExporter {
    pub fn write<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AdvisorError::file(parent, e))?;
        }

        let content = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        fs::write(path, content).map_err(|e| AdvisorError::file(path, e))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    pub fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = fs::read_to_string(path).map_err(|e| AdvisorError::file(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// `None` when the file does not exist.
    pub fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::read(path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentChunk, SourceDocument};
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vector_store/metadata.json");
        let doc = SourceDocument {
            city: None,
            source: "brief.txt".to_string(),
            text: "Metro phase two".to_string(),
        };
        let chunks = vec![DocumentChunk::new(&doc, 0, doc.text.clone())];

        JsonExporter::write(&path, &chunks, true).unwrap();
        let loaded: Vec<DocumentChunk> = JsonExporter::read(&path).unwrap();
        assert_eq!(loaded, chunks);
    }

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempdir().unwrap();
        let loaded: Option<Vec<DocumentChunk>> =
            JsonExporter::read_optional(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }
}
