//! Linux GPU enumeration via sysfs.
//!
//! Walks `/sys/bus/pci/devices` and builds a [`GpuDescriptor`] for every PCI
//! display controller (class `0x03xxxx`).  No driver library is needed: the
//! kernel exports everything this scanner reads as plain files.
//!
//! | sysfs source                        | descriptor field                  |
//! |-------------------------------------|-----------------------------------|
//! | directory name `0000:BB:SS.F` (hex) | `bus`, `slot`                     |
//! | `class`                             | selects display controllers       |
//! | `vendor` + `device`                 | `product_name`                    |
//! | `boot_vga`                          | `primary`                         |
//! | `/sys/class/drm/card*-*/status`     | `display_mask` (when available)   |
//!
//! sysfs does not expose CRTC counts, so `output_pipelines` keeps the
//! descriptor default of 2.
//!
//! The sysfs root is injectable so tests can point the scanner at a fixture
//! directory instead of the live `/sys`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use xtopo_core::inventory::{DeviceInventory, GpuDescriptor, InventoryError};

/// PCI class code for display controllers (VGA, XGA, 3D).
const DISPLAY_CLASS: u32 = 0x03;

/// Live GPU inventory backed by the kernel's sysfs PCI tree.
pub struct SysfsInventory {
    sysfs_root: PathBuf,
}

impl SysfsInventory {
    /// Scanner over the live `/sys` tree.
    pub fn new() -> Self {
        Self::with_root("/sys")
    }

    /// Scanner over an alternative sysfs root, for tests.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: root.into(),
        }
    }
}

impl Default for SysfsInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceInventory for SysfsInventory {
    /// Scans the PCI tree for display controllers.
    ///
    /// Descriptors are ordered by PCI address, with at most one per physical
    /// bus/slot (a multi-function card is reported once).  An empty result is
    /// returned as `Ok` — a machine without GPUs is not a scan failure.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Unavailable`] when the PCI device directory
    /// cannot be walked.
    fn enumerate(&self) -> Result<Vec<GpuDescriptor>, InventoryError> {
        let devices_dir = self.sysfs_root.join("bus/pci/devices");
        let entries = std::fs::read_dir(&devices_dir).map_err(|e| InventoryError::Unavailable {
            reason: format!("cannot read {}: {e}", devices_dir.display()),
        })?;

        let masks = display_masks(&self.sysfs_root.join("class/drm"));

        // (bus, slot, function) keys give a deterministic order and let the
        // dedup below keep the lowest function of a multi-function card.
        let mut found: Vec<(u32, u32, u32, GpuDescriptor)> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InventoryError::Unavailable {
                reason: format!("cannot walk {}: {e}", devices_dir.display()),
            })?;
            let address = entry.file_name().to_string_lossy().into_owned();

            let (bus, slot, function) = match parse_pci_address(&address) {
                Some(parsed) => parsed,
                None => continue,
            };
            let class = match read_hex(&entry.path().join("class")) {
                Some(class) => class,
                None => continue,
            };
            if class >> 16 != DISPLAY_CLASS {
                continue;
            }

            let vendor = read_hex(&entry.path().join("vendor"));
            let device = read_hex(&entry.path().join("device"));
            let primary = std::fs::read_to_string(entry.path().join("boot_vga"))
                .map(|text| text.trim() == "1")
                .unwrap_or(false);

            let descriptor = GpuDescriptor {
                bus,
                slot,
                output_pipelines: 2,
                product_name: product_name(vendor, device),
                display_mask: masks.get(&address).copied().unwrap_or(0),
                primary,
            };
            debug!(%address, product = %descriptor.product_name, "found display controller");
            found.push((bus, slot, function, descriptor));
        }

        found.sort_by_key(|(bus, slot, function, _)| (*bus, *slot, *function));
        found.dedup_by_key(|(bus, slot, _, _)| (*bus, *slot));

        Ok(found.into_iter().map(|(_, _, _, d)| d).collect())
    }
}

/// Splits a sysfs PCI address (`0000:01:00.0`, hex fields) into
/// (bus, slot, function).
fn parse_pci_address(address: &str) -> Option<(u32, u32, u32)> {
    let (rest, function) = address.rsplit_once('.')?;
    let mut fields = rest.split(':');
    let _domain = fields.next()?;
    let bus = u32::from_str_radix(fields.next()?, 16).ok()?;
    let slot = u32::from_str_radix(fields.next()?, 16).ok()?;
    if fields.next().is_some() {
        return None;
    }
    let function = u32::from_str_radix(function, 16).ok()?;
    Some((bus, slot, function))
}

/// Reads a sysfs value file containing a hex number like `0x10de`.
fn read_hex(path: &Path) -> Option<u32> {
    let text = std::fs::read_to_string(path).ok()?;
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}

/// Builds a product name from the PCI vendor and device ids.
///
/// sysfs has no marketing names, so this is the best label available without
/// shipping a pci.ids database.
fn product_name(vendor: Option<u32>, device: Option<u32>) -> String {
    let label = match vendor {
        Some(0x10de) => "NVIDIA".to_string(),
        Some(0x1002) => "AMD".to_string(),
        Some(0x8086) => "Intel".to_string(),
        Some(other) => format!("0x{other:04x}"),
        None => return "Unknown display controller".to_string(),
    };
    match device {
        Some(device) => format!("{label} device 0x{device:04x}"),
        None => format!("{label} display controller"),
    }
}

/// Maps each PCI address to a connected-display bitmask read from the DRM
/// connector tree, bit N set when the card's Nth connector (in name order)
/// reports `connected`.  Returns an empty map when DRM info is unavailable.
fn display_masks(drm_dir: &Path) -> HashMap<String, u32> {
    let mut masks = HashMap::new();
    let entries = match std::fs::read_dir(drm_dir) {
        Ok(entries) => entries,
        Err(_) => return masks,
    };

    // Card directories are named `card<N>`; their connectors `card<N>-<name>`.
    let names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    let cards = names.iter().filter(|name| {
        name.strip_prefix("card")
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    });

    for card in cards {
        // `card<N>/device` links back to the PCI device directory.
        let address = match std::fs::read_link(drm_dir.join(card).join("device")) {
            Ok(target) => match target.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            },
            Err(_) => continue,
        };

        let prefix = format!("{card}-");
        let mut connectors: Vec<&String> =
            names.iter().filter(|name| name.starts_with(&prefix)).collect();
        connectors.sort();

        let mut mask = 0u32;
        for (bit, connector) in connectors.iter().enumerate() {
            let connected = std::fs::read_to_string(drm_dir.join(connector).join("status"))
                .map(|text| text.trim() == "connected")
                .unwrap_or(false);
            if connected {
                mask |= 1 << bit;
            }
        }
        masks.insert(address, mask);
    }

    masks
}

// ── Tests ─────────────────────────────────────────────────────────────────────
