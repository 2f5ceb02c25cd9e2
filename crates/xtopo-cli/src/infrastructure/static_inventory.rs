//! File-backed GPU inventory.
//!
//! Reads GPU descriptors from a TOML file instead of probing hardware.  This
//! is how topologies are reconciled for a machine other than the one running
//! the tool (build servers, support tickets) and how the end-to-end tests
//! drive the pipeline without a GPU.
//!
//! The file holds one `[[gpu]]` table per adapter:
//!
//! ```toml
//! [[gpu]]
//! bus = 1
//! slot = 0
//! product_name = "NVIDIA GeForce RTX 4070"
//! display_mask = 3
//! primary = true
//!
//! [[gpu]]
//! bus = 2
//! slot = 0
//! product_name = "NVIDIA GeForce RTX 4070"
//! ```
//!
//! `output_pipelines`, `display_mask` and `primary` carry the descriptor
//! defaults when omitted.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;
use xtopo_core::inventory::{DeviceInventory, GpuDescriptor, InventoryError};

/// GPU inventory read from a `[[gpu]]` TOML file.
pub struct FileInventory {
    path: PathBuf,
}

#[derive(Deserialize)]
struct InventoryFile {
    #[serde(default)]
    gpu: Vec<GpuDescriptor>,
}

impl FileInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DeviceInventory for FileInventory {
    /// Re-reads the file on every call, so edits between calls are observed
    /// just like hardware changes would be.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unavailable`] when the file cannot be read
    /// or does not parse as an inventory.
    fn enumerate(&self) -> Result<Vec<GpuDescriptor>, InventoryError> {
        let text =
            std::fs::read_to_string(&self.path).map_err(|e| InventoryError::Unavailable {
                reason: format!("cannot read {}: {e}", self.path.display()),
            })?;
        let file: InventoryFile =
            toml::from_str(&text).map_err(|e| InventoryError::Unavailable {
                reason: format!("invalid inventory file {}: {e}", self.path.display()),
            })?;
        debug!(
            path = %self.path.display(),
            gpus = file.gpu.len(),
            "loaded static inventory"
        );
        Ok(file.gpu)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
