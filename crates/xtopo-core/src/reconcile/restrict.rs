//! Restrict-to-one: keep only the first screen in the sequence.

use tracing::debug;

use crate::document::ConfigDocument;
use crate::reconcile::{collect_orphans, rebuild_adjacencies, ReconcileError};

/// Deletes every screen after the first, rebuilds the (now single-entry)
/// adjacency list, and collects the devices and monitors that lost their last
/// referrer.
///
/// # Errors
///
/// Returns [`ReconcileError::NoScreens`] when the document has no screens at
/// all; the document is not modified in that case.
pub fn only_one_screen(document: &mut ConfigDocument) -> Result<(), ReconcileError> {
    if document.screens.is_empty() {
        return Err(ReconcileError::NoScreens);
    }

    let dropped = document.screens.len() - 1;
    document.screens.truncate(1);

    rebuild_adjacencies(document);
    collect_orphans(document);

    debug!(dropped, "restricted layout to its first screen");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AdjacencyPosition, Device, Monitor, Screen};

    fn make_document(count: usize) -> ConfigDocument {
        let mut doc = ConfigDocument::new();
        for i in 0..count {
            let mut device = Device::new(format!("Device{i}"));
            device.bus_id = Some(format!("PCI:{}:0:0", i + 1));
            doc.devices.push(device);
            doc.monitors.push(Monitor::new(format!("Monitor{i}")));
            let mut screen = Screen::new(format!("Screen{i}"), format!("Device{i}"));
            screen.monitor = Some(format!("Monitor{i}"));
            doc.screens.push(screen);
        }
        rebuild_adjacencies(&mut doc);
        doc
    }

    #[test]
    fn test_restrict_keeps_only_the_first_screen() {
        let mut doc = make_document(3);

        only_one_screen(&mut doc).unwrap();

        assert_eq!(doc.screens.len(), 1);
        assert_eq!(doc.screens.get(0).unwrap().identifier, "Screen0");
    }

    #[test]
    fn test_restrict_leaves_a_single_origin_adjacency() {
        let mut doc = make_document(3);

        only_one_screen(&mut doc).unwrap();

        assert_eq!(doc.layout.adjacencies.len(), 1);
        assert_eq!(doc.layout.adjacencies[0].number, 0);
        assert_eq!(doc.layout.adjacencies[0].screen, "Screen0");
        assert_eq!(
            doc.layout.adjacencies[0].position,
            AdjacencyPosition::Absolute { x: 0, y: 0 }
        );
    }

    #[test]
    fn test_restrict_collects_devices_and_monitors_of_dropped_screens() {
        let mut doc = make_document(3);

        only_one_screen(&mut doc).unwrap();

        assert_eq!(doc.devices.len(), 1);
        assert_eq!(doc.monitors.len(), 1);
        assert!(doc.devices.find("Device0").is_some());
        assert!(doc.monitors.find("Monitor0").is_some());
    }

    #[test]
    fn test_restrict_keeps_monitor_shared_with_the_first_screen() {
        let mut doc = make_document(2);
        doc.screens.find_mut("Screen1").unwrap().monitor = Some("Monitor0".to_string());

        only_one_screen(&mut doc).unwrap();

        assert!(doc.monitors.find("Monitor0").is_some());
        assert!(doc.monitors.find("Monitor1").is_none());
    }

    #[test]
    fn test_restrict_on_single_screen_document_keeps_it() {
        let mut doc = make_document(1);

        only_one_screen(&mut doc).unwrap();

        assert_eq!(doc.screens.len(), 1);
        assert_eq!(doc.layout.adjacencies.len(), 1);
    }

    #[test]
    fn test_restrict_on_empty_document_fails_with_no_screens() {
        let mut doc = ConfigDocument::new();
        let before = doc.clone();

        let err = only_one_screen(&mut doc).unwrap_err();

        assert_eq!(err, ReconcileError::NoScreens);
        assert_eq!(doc, before);
    }
}
