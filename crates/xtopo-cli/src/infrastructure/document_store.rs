//! TOML persistence for configuration documents.
//!
//! The engine in `xtopo-core` works on an in-memory [`ConfigDocument`]; this
//! module reads and writes its on-disk TOML form.  Example:
//!
//! ```toml
//! [[screens]]
//! identifier = "Screen0"
//! device = "Device0"
//! monitor = "Monitor0"
//! default_depth = 24
//!
//! [[devices]]
//! identifier = "Device0"
//! bus_id = "PCI:1:0:0"
//!
//! [layout]
//! identifier = "Layout0"
//! ```
//!
//! The `serde` derives on the document types generate all the mapping code;
//! fields absent from the file fall back to their `#[serde(default)]` values,
//! so hand-written or older documents load cleanly.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use xtopo_core::ConfigDocument;

/// Error type for document file operations.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing document at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse document TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The document could not be serialized to TOML.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads a [`ConfigDocument`] from `path`.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Io`] for file-system errors (including a
/// missing file) and [`DocumentStoreError::Parse`] if the TOML is malformed.
pub fn load(path: &Path) -> Result<ConfigDocument, DocumentStoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ConfigDocument = toml::from_str(&content)?;
    debug!(path = %path.display(), screens = document.screens.len(), "loaded document");
    Ok(document)
}

/// Loads a [`ConfigDocument`] from `path`, returning an empty document if the
/// file does not yet exist.
///
/// This is the entry point the apply-topology use case runs through: a first
/// invocation against a fresh path starts from an empty document and the
/// populate operation fills it in.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Io`] for file-system errors other than
/// "not found", and [`DocumentStoreError::Parse`] if the TOML is malformed.
pub fn load_or_default(path: &Path) -> Result<ConfigDocument, DocumentStoreError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let document: ConfigDocument = toml::from_str(&content)?;
            Ok(document)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "document absent, starting from empty");
            Ok(ConfigDocument::new())
        }
        Err(source) => Err(DocumentStoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `document` to `path`.
///
/// Creates the parent directory if it does not exist.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Io`] for file-system failures or
/// [`DocumentStoreError::Serialize`] if serialization fails.
pub fn save(path: &Path, document: &ConfigDocument) -> Result<(), DocumentStoreError> {
    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|source| DocumentStoreError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
    }

    let content = toml::to_string_pretty(document)?;
    std::fs::write(path, content).map_err(|source| DocumentStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), screens = document.screens.len(), "saved document");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use xtopo_core::{Device, Monitor, Screen};

    /// Creates a unique scratch directory under the system temp dir.
    fn make_temp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("xtopo_store_{tag}_{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn make_document() -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        let mut device = Device::new("Device0");
        device.bus_id = Some("PCI:1:0:0".to_string());
        doc.devices.push(device);
        doc.monitors.push(Monitor::new("Monitor0"));
        let mut screen = Screen::new("Screen0", "Device0");
        screen.monitor = Some("Monitor0".to_string());
        doc.screens.push(screen);
        doc.set_boolean_flag("Xinerama", true);
        doc
    }

    #[test]
    fn test_save_and_load_round_trips_document() {
        // Arrange
        let dir = make_temp_dir("round_trip");
        let path = dir.join("topology.toml");
        let doc = make_document();

        // Act
        save(&path, &doc).expect("save");
        let loaded = load(&path).expect("load");

        // Assert
        assert_eq!(loaded, doc);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_is_an_io_error() {
        let dir = make_temp_dir("missing");
        let path = dir.join("absent.toml");

        let err = load(&path).expect_err("load must fail");

        assert!(matches!(err, DocumentStoreError::Io { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_or_default_returns_empty_document_when_file_absent() {
        let dir = make_temp_dir("default");
        let path = dir.join("absent.toml");

        let doc = load_or_default(&path).expect("absent file is not an error");

        assert_eq!(doc, ConfigDocument::new());
        assert!(doc.screens.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = make_temp_dir("existing");
        let path = dir.join("topology.toml");
        let doc = make_document();
        save(&path, &doc).expect("save");

        let loaded = load_or_default(&path).expect("load");

        assert_eq!(loaded, doc);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_invalid_toml_is_a_parse_error() {
        let dir = make_temp_dir("invalid");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[[[ not valid toml").expect("write");

        let err = load(&path).expect_err("load must fail");

        assert!(matches!(err, DocumentStoreError::Parse(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_creates_missing_parent_directories() {
        let dir = make_temp_dir("parents");
        let path = dir.join("nested").join("deeper").join("topology.toml");

        save(&path, &make_document()).expect("save must create parents");

        assert!(path.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_partial_document_fills_defaults() {
        // A minimal hand-written document: one screen, nothing else.
        let dir = make_temp_dir("partial");
        let path = dir.join("partial.toml");
        std::fs::write(
            &path,
            r#"
[[screens]]
identifier = "Screen0"
device = "Device0"
"#,
        )
        .expect("write");

        let doc = load(&path).expect("load");

        assert_eq!(doc.screens.len(), 1);
        assert_eq!(doc.screens.get(0).unwrap().default_depth, 24);
        assert!(doc.flags.is_none());
        assert_eq!(doc.layout.identifier, "Layout0");
        std::fs::remove_dir_all(&dir).ok();
    }
}
