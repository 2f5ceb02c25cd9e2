//! Device inventory port.
//!
//! The reconciliation engine never talks to hardware. It sees GPUs through the
//! [`DeviceInventory`] trait: one call, one snapshot of the machine's display
//! adapters in stable discovery order. The CLI provides live implementations
//! (a sysfs scanner, a file-backed inventory); tests use [`mock::MockInventory`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::busid::BusId;

pub mod mock;

/// One display adapter as reported by an inventory source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuDescriptor {
    /// PCI bus number.
    pub bus: u32,
    /// PCI slot (device) number.
    pub slot: u32,
    /// How many independent output pipelines the GPU can drive.
    #[serde(default = "default_output_pipelines")]
    pub output_pipelines: u32,
    /// Marketing name, e.g. `"NVIDIA GeForce RTX 4070"`.
    pub product_name: String,
    /// Bitmask of connected displays; bit N set means output N has a monitor
    /// attached.
    #[serde(default)]
    pub display_mask: u32,
    /// `true` if the firmware booted on this adapter.
    #[serde(default)]
    pub primary: bool,
}

fn default_output_pipelines() -> u32 {
    2
}

impl GpuDescriptor {
    /// Number of displays currently connected to this GPU.
    pub fn connected_displays(&self) -> u32 {
        self.display_mask.count_ones()
    }

    /// The bus location written into Device sections (function 0).
    pub fn bus_id(&self) -> BusId {
        BusId::for_slot(self.bus, self.slot)
    }
}

/// Error type for inventory access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The inventory source could not be queried at all.
    #[error("device inventory unavailable: {reason}")]
    Unavailable { reason: String },

    /// The source was queried but reported no display adapters.
    #[error("no display devices found")]
    NoDevices,
}

/// Source of GPU descriptors.
///
/// Implementations report the adapters present at the time of the call; there
/// is no caching contract, so repeated calls may observe hardware changes.
pub trait DeviceInventory {
    /// Enumerates the display adapters, in the source's discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unavailable`] when the source itself cannot
    /// be read. An empty list is *not* an error here; callers that need
    /// devices use [`ordered_inventory`].
    fn enumerate(&self) -> Result<Vec<GpuDescriptor>, InventoryError>;
}

/// Fetches the inventory once and normalizes its order for topology use.
///
/// The primary adapter (the one the firmware booted on) must come first so
/// that positional assignment maps it to the first screen. If a descriptor
/// other than the first is flagged primary, it is rotated to the front; the
/// relative order of all other descriptors is preserved. When several are
/// flagged, the first one in discovery order wins.
///
/// # Errors
///
/// Returns [`InventoryError::NoDevices`] when the source reports an empty
/// list, and propagates [`InventoryError::Unavailable`] from the source.
pub fn ordered_inventory(
    inventory: &dyn DeviceInventory,
) -> Result<Vec<GpuDescriptor>, InventoryError> {
    let mut descriptors = inventory.enumerate()?;
    if descriptors.is_empty() {
        return Err(InventoryError::NoDevices);
    }

    if let Some(index) = descriptors.iter().position(|d| d.primary) {
        if index > 0 {
            descriptors[..=index].rotate_right(1);
        }
    }

    Ok(descriptors)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
