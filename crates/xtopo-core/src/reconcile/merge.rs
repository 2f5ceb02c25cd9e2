//! Merge-per-GPU: collapse screens that share a physical GPU back into one.

use tracing::{debug, warn};

use crate::busid::BusId;
use crate::document::ConfigDocument;
use crate::reconcile::{
    candidate_screens, collect_orphans, device_bus_id, rebuild_adjacencies, ReconcileError,
};

/// Merges every screen sharing a candidate's GPU into that candidate.
///
/// Candidates are the named `target` screen, or every screen in the adjacency
/// list. The list is narrowed to screens with a parseable bus id and then
/// de-duplicated by bus/slot (first occurrence wins); an empty result is not
/// an error — the operation still rebuilds the adjacency list and sweeps
/// orphans, which repairs a stale layout.
///
/// For each surviving candidate, every *other* screen in the document whose
/// device sits on the same bus/slot is removed, and the candidate's device is
/// no longer marked as one output of a split pair. Devices and monitors left
/// without a referring screen are collected afterwards.
///
/// # Errors
///
/// Returns [`ReconcileError::ScreenNotFound`] when `target` names a missing
/// screen. Nothing else fails; the inventory is never consulted.
pub fn disable_separate_screens(
    document: &mut ConfigDocument,
    target: Option<&str>,
) -> Result<(), ReconcileError> {
    let candidates = candidate_screens(document, target)?;

    let mut narrowed: Vec<(String, BusId)> = Vec::with_capacity(candidates.len());
    for name in candidates {
        let screen = match document.screens.find(&name) {
            Some(screen) => screen,
            None => continue,
        };
        match device_bus_id(&document.devices, screen) {
            Some(bus_id) => narrowed.push((name, bus_id)),
            None => {
                warn!(screen = %name, "missing or unparseable bus id, not merging");
            }
        }
    }

    let mut survivors: Vec<(String, BusId)> = Vec::with_capacity(narrowed.len());
    for (name, bus_id) in narrowed {
        if survivors.iter().any(|(_, kept)| kept.same_device(&bus_id)) {
            continue;
        }
        survivors.push((name, bus_id));
    }

    let mut removed = 0;
    for (name, bus_id) in &survivors {
        let devices = &document.devices;
        let before = document.screens.len();
        document.screens.retain(|other| {
            other.identifier == *name
                || !device_bus_id(devices, other)
                    .map_or(false, |other_id| other_id.same_device(bus_id))
        });
        removed += before - document.screens.len();

        let device_name = document.screens.find(name).map(|s| s.device.clone());
        if let Some(device_name) = device_name {
            if let Some(device) = document.devices.find_mut(&device_name) {
                device.screen_index = None;
            }
        }
    }

    rebuild_adjacencies(document);
    collect_orphans(document);

    debug!(merged = survivors.len(), removed, "merged per-GPU screens");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
