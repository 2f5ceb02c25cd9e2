//! Orphaned-section collection.
//!
//! Merging and restricting remove screens; the device and monitor sections
//! those screens pointed at may be left with no referrer. This pass deletes
//! them so the document never carries dangling hardware sections.

use tracing::debug;

use crate::document::ConfigDocument;

/// Removes every device and monitor section no surviving screen references.
///
/// Devices are swept first, then monitors; survivors keep their relative
/// order. A section referenced by even one screen stays, which is what keeps
/// a shared monitor alive while any of its screens survives.
pub fn collect_orphans(document: &mut ConfigDocument) {
    let before = document.devices.len() + document.monitors.len();

    let screens = &document.screens;
    document
        .devices
        .retain(|device| screens.iter().any(|screen| screen.device == device.identifier));

    let screens = &document.screens;
    document.monitors.retain(|monitor| {
        screens
            .iter()
            .any(|screen| screen.monitor.as_deref() == Some(monitor.identifier.as_str()))
    });

    let removed = before - (document.devices.len() + document.monitors.len());
    if removed > 0 {
        debug!(removed, "collected orphaned sections");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
