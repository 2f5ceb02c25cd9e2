//! Split-per-GPU: give each physical GPU's second output its own screen.
//!
//! Splitting works by cloning: an eligible screen gets a duplicate spliced in
//! right after it, sharing the same GPU (bus id) and monitor but carrying its
//! own device section marked as output 1. Eligibility is resolved for every
//! candidate before the first clone is made.

use tracing::{debug, warn};

use crate::document::ConfigDocument;
use crate::inventory::{ordered_inventory, DeviceInventory};
use crate::reconcile::{candidate_screens, device_bus_id, rebuild_adjacencies, ReconcileError};

/// Identifier suffix for the cloned screen and device sections.
pub const CLONE_SUFFIX: &str = " (2nd)";

/// Splits each candidate screen into two screens on the same GPU.
///
/// Candidates are the named `target` screen, or every screen in the adjacency
/// list. If any candidate's device lacks a bus id, the inventory is fetched
/// once and bus ids are assigned to *all* candidates positionally (candidate
/// N takes descriptor N's location and product name); candidates beyond the
/// descriptor count are dropped unmodified.
///
/// A candidate is then eligible only if its bus id parses and no other screen
/// anywhere in the document already uses the same bus/slot — a screen that
/// has been split before fails that test and is skipped, which is what makes
/// repeated invocations safe. Ineligible candidates are dropped silently;
/// they never fail the operation.
///
/// Ends by rebuilding the adjacency list from the lengthened screen sequence.
///
/// # Errors
///
/// Returns [`ReconcileError::ScreenNotFound`] when `target` names a missing
/// screen, [`ReconcileError::NoScreens`] when there are no candidates at all,
/// and [`ReconcileError::InventoryUnavailable`] when bus ids were needed but
/// the inventory could not supply them. All of these are detected before any
/// structural change.
pub fn enable_separate_screens(
    document: &mut ConfigDocument,
    inventory: &dyn DeviceInventory,
    target: Option<&str>,
) -> Result<(), ReconcileError> {
    let mut candidates = candidate_screens(document, target)?;
    if candidates.is_empty() {
        return Err(ReconcileError::NoScreens);
    }

    let have_bus_ids = candidates.iter().all(|name| {
        document
            .screens
            .find(name)
            .and_then(|screen| document.devices.find(&screen.device))
            .map_or(false, |device| device.bus_id.is_some())
    });

    if !have_bus_ids {
        candidates = assign_bus_ids(document, inventory, candidates)?;
    }

    // Resolve eligibility for the whole list before cloning anything.
    let mut eligible = Vec::with_capacity(candidates.len());
    for name in candidates {
        let screen = match document.screens.find(&name) {
            Some(screen) => screen,
            None => continue,
        };
        let bus_id = match device_bus_id(&document.devices, screen) {
            Some(bus_id) => bus_id,
            None => {
                warn!(screen = %name, "missing or unparseable bus id, not splitting");
                continue;
            }
        };
        let shared = document.screens.iter().any(|other| {
            other.identifier != name
                && device_bus_id(&document.devices, other)
                    .map_or(false, |other_id| other_id.same_device(&bus_id))
        });
        if shared {
            warn!(screen = %name, "GPU already drives another screen, not splitting");
            continue;
        }
        eligible.push(name);
    }

    for name in &eligible {
        clone_screen(document, name);
    }

    rebuild_adjacencies(document);

    debug!(cloned = eligible.len(), "separated per-GPU screens");
    Ok(())
}

/// Fetches the inventory and reassigns bus id and board name to every
/// candidate by position. Candidates past the end of the descriptor list are
/// dropped from the returned list without being touched.
fn assign_bus_ids(
    document: &mut ConfigDocument,
    inventory: &dyn DeviceInventory,
    candidates: Vec<String>,
) -> Result<Vec<String>, ReconcileError> {
    let descriptors = ordered_inventory(inventory)?;

    let mut kept = Vec::with_capacity(candidates.len());
    for (index, name) in candidates.into_iter().enumerate() {
        match descriptors.get(index) {
            Some(descriptor) => {
                let device_name = document.screens.find(&name).map(|s| s.device.clone());
                if let Some(device_name) = device_name {
                    if let Some(device) = document.devices.find_mut(&device_name) {
                        device.bus_id = Some(descriptor.bus_id().to_string());
                        device.board = Some(descriptor.product_name.clone());
                    }
                }
                kept.push(name);
            }
            None => {
                warn!(screen = %name, "more candidate screens than GPUs, dropping");
            }
        }
    }

    Ok(kept)
}

/// Clones `name`'s screen and device, wiring the clone as the GPU's second
/// output and splicing both copies immediately after their originals. The
/// monitor reference stays shared; displays and option bags are deep-copied
/// as part of the screen clone.
fn clone_screen(document: &mut ConfigDocument, name: &str) {
    let screen_position = match document.screens.position(name) {
        Some(position) => position,
        None => return,
    };
    let mut screen_clone = match document.screens.get(screen_position) {
        Some(original) => original.clone(),
        None => return,
    };
    screen_clone.identifier.push_str(CLONE_SUFFIX);

    if let Some(device_position) = document.devices.position(&screen_clone.device) {
        let device_clone = document.devices.get_mut(device_position).map(|original| {
            original.screen_index = Some(0);
            let mut clone = original.clone();
            clone.identifier.push_str(CLONE_SUFFIX);
            clone.screen_index = Some(1);
            // Probe results describe the original card only.
            clone.chip_id = None;
            clone.chip_rev = None;
            clone.irq = None;
            clone
        });
        if let Some(clone) = device_clone {
            screen_clone.device = clone.identifier.clone();
            document.devices.insert_after(device_position, clone);
        }
    }

    document.screens.insert_after(screen_position, screen_clone);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
