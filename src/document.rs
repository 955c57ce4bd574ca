use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// A JSON configuration file loaded as a key/value mapping.
pub type Document = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}

/// Read `path` as a JSON object, reporting exactly why it could not be used.
pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocumentError::Missing(path.to_path_buf()))
        }
        Err(source) => {
            return Err(DocumentError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let value: Value = serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DocumentError::NotAnObject(path.to_path_buf())),
    }
}

/// Load a document, treating a missing or unreadable file as empty.
///
/// Configuration problems never block startup: the error is logged and an
/// empty mapping is returned so callers fall back to their defaults.
pub fn load_document(path: &Path) -> Document {
    match read_document(path) {
        Ok(doc) => doc,
        Err(DocumentError::Missing(p)) => {
            tracing::debug!(path = %p.display(), "document missing; using empty");
            Document::new()
        }
        Err(e) => {
            tracing::warn!("{e}; using empty document");
            Document::new()
        }
    }
}

/// Overwrite `path` with the pretty printed document.
pub fn save_document(path: &Path, doc: &Document) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Overlay `user` onto `default`. Nested objects are replaced, not merged.
pub fn merge(default: &Document, user: &Document) -> Document {
    let mut merged = default.clone();
    for (k, v) in user {
        merged.insert(k.clone(), v.clone());
    }
    merged
}
