//! Populate-from-inventory: one screen per detected GPU.

use tracing::debug;

use crate::document::{ConfigDocument, Device, Display, Monitor, Screen, DEFAULT_DEPTH};
use crate::inventory::{ordered_inventory, DeviceInventory};
use crate::reconcile::{rebuild_adjacencies, ReconcileError};

/// Replaces the whole topology with one screen/device/monitor triple per GPU
/// the inventory reports, in inventory order (primary GPU first).
///
/// Each new device takes the descriptor's bus location and product name; each
/// new screen gets the default depth and a single bare display subsection.
/// The adjacency list is rebuilt so screen N sits at layout position N.
///
/// # Errors
///
/// Returns [`ReconcileError::InventoryUnavailable`] when the inventory cannot
/// be queried or reports no GPUs. The existing topology is only discarded
/// after the inventory has been fetched, so a failure leaves the document
/// untouched.
pub fn enable_all_gpus(
    document: &mut ConfigDocument,
    inventory: &dyn DeviceInventory,
) -> Result<(), ReconcileError> {
    let descriptors = ordered_inventory(inventory)?;

    document.screens.clear();
    document.devices.clear();
    document.monitors.clear();
    document.layout.adjacencies.clear();

    for (index, descriptor) in descriptors.iter().enumerate() {
        let device_name = format!("Device{index}");
        let monitor_name = format!("Monitor{index}");

        let mut device = Device::new(&device_name);
        device.bus_id = Some(descriptor.bus_id().to_string());
        device.board = Some(descriptor.product_name.clone());
        document.devices.push(device);

        document.monitors.push(Monitor::new(&monitor_name));

        let mut screen = Screen::new(format!("Screen{index}"), device_name);
        screen.monitor = Some(monitor_name);
        screen.displays.push(Display::at_depth(DEFAULT_DEPTH));
        document.screens.push(screen);
    }

    rebuild_adjacencies(document);

    debug!(gpus = descriptors.len(), "rebuilt topology from device inventory");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
