//! End-to-end topology scenarios.
//!
//! These tests drive the public reconciliation API the way the `xtopo` binary
//! does: build a document, apply a `TopologyRequest`, inspect the result.

use xtopo_core::inventory::mock::{descriptor, MockInventory};
use xtopo_core::reconcile::{self, ReconcileError, TopologyRequest};
use xtopo_core::{ConfigDocument, Device, Display, Monitor, Screen};

/// Document with `count` screens, one per GPU, bus ids assigned, adjacency
/// list in sync — the state a freshly generated config would be in.
fn make_document(count: usize) -> ConfigDocument {
    let mut doc = ConfigDocument::new();
    for i in 0..count {
        let mut device = Device::new(format!("Device{i}"));
        device.bus_id = Some(format!("PCI:{}:0:0", i + 1));
        doc.devices.push(device);
        doc.monitors.push(Monitor::new(format!("Monitor{i}")));
        let mut screen = Screen::new(format!("Screen{i}"), format!("Device{i}"));
        screen.monitor = Some(format!("Monitor{i}"));
        screen.displays.push(Display::at_depth(24));
        doc.screens.push(screen);
    }
    reconcile::rebuild_adjacencies(&mut doc);
    doc
}

fn no_inventory() -> MockInventory {
    MockInventory::with_gpus(vec![])
}

/// Adjacency invariant: one entry per screen, numbered 0..n-1 in sequence
/// order.
fn assert_adjacencies_match_screens(doc: &ConfigDocument) {
    assert_eq!(doc.layout.adjacencies.len(), doc.screens.len());
    for (index, (adjacency, screen)) in doc
        .layout
        .adjacencies
        .iter()
        .zip(doc.screens.iter())
        .enumerate()
    {
        assert_eq!(adjacency.number, index);
        assert_eq!(adjacency.screen, screen.identifier);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_split_then_merge_round_trips_the_topology() {
    let mut doc = make_document(2);
    let inventory = no_inventory();

    reconcile::apply(
        &mut doc,
        &inventory,
        &TopologyRequest { separate_screens: Some(true), ..Default::default() },
    )
    .expect("split");
    assert_eq!(doc.screens.len(), 4);

    reconcile::apply(
        &mut doc,
        &inventory,
        &TopologyRequest { separate_screens: Some(false), ..Default::default() },
    )
    .expect("merge");

    assert_eq!(doc.screens.len(), 2);
    assert_eq!(doc.devices.len(), 2);
    assert_eq!(doc.monitors.len(), 2);
    let screens: Vec<_> = doc.screens.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(screens, ["Screen0", "Screen1"]);
    let bus_ids: Vec<_> = doc.devices.iter().map(|d| d.bus_id.as_deref()).collect();
    assert_eq!(bus_ids, [Some("PCI:1:0:0"), Some("PCI:2:0:0")]);
    assert_adjacencies_match_screens(&doc);
}

#[test]
fn test_second_split_invocation_is_a_no_op() {
    let mut doc = make_document(1);
    let inventory = no_inventory();
    let request = TopologyRequest { separate_screens: Some(true), ..Default::default() };

    reconcile::apply(&mut doc, &inventory, &request).expect("first split");
    let after_first = doc.clone();
    reconcile::apply(&mut doc, &inventory, &request).expect("second split");

    assert_eq!(doc, after_first, "split screens are no longer eligible");
}

#[test]
fn test_failed_populate_leaves_document_byte_equal() {
    let mut doc = make_document(3);
    let before = doc.clone();
    let inventory = MockInventory::unavailable("nvidia-cfg missing");

    let err = reconcile::apply(
        &mut doc,
        &inventory,
        &TopologyRequest { enable_all_gpus: true, ..Default::default() },
    )
    .unwrap_err();

    assert!(matches!(err, ReconcileError::InventoryUnavailable(_)));
    assert_eq!(doc, before);
}

#[test]
fn test_restrict_on_three_screen_document() {
    let mut doc = make_document(3);

    reconcile::apply(
        &mut doc,
        &no_inventory(),
        &TopologyRequest { only_one_screen: true, ..Default::default() },
    )
    .expect("restrict");

    assert_eq!(doc.screens.len(), 1);
    assert_eq!(doc.devices.len(), 1);
    assert_eq!(doc.monitors.len(), 1);
    assert_adjacencies_match_screens(&doc);
}

#[test]
fn test_full_pipeline_populate_split_flag_restrict() {
    // All four operations in one request: populate two GPUs, split them,
    // enable the spanning flag, then collapse to one screen. The surviving
    // screen must be the primary GPU's first output and the flag must stick.
    let mut doc = make_document(1);
    let mut primary = descriptor(4, 0, "Primary GPU");
    primary.primary = true;
    let inventory = MockInventory::with_gpus(vec![descriptor(3, 0, "Secondary GPU"), primary]);

    reconcile::apply(
        &mut doc,
        &inventory,
        &TopologyRequest {
            enable_all_gpus: true,
            separate_screens: Some(true),
            xinerama: Some(true),
            only_one_screen: true,
            ..Default::default()
        },
    )
    .expect("full pipeline");

    assert_eq!(doc.screens.len(), 1);
    let device = doc.devices.find("Device0").expect("primary device survives");
    assert_eq!(device.bus_id.as_deref(), Some("PCI:4:0:0"));
    assert_eq!(device.board.as_deref(), Some("Primary GPU"));
    let flags = doc.flags.as_ref().expect("flags section created");
    assert_eq!(flags.options.get("Xinerama").unwrap().value.as_deref(), Some("1"));
    assert_adjacencies_match_screens(&doc);
}

#[test]
fn test_late_step_failure_keeps_earlier_steps_applied() {
    // On an empty document the flag step succeeds and the restrict step then
    // fails; the flag write is not rolled back.
    let mut doc = ConfigDocument::new();

    let err = reconcile::apply(
        &mut doc,
        &no_inventory(),
        &TopologyRequest {
            xinerama: Some(true),
            only_one_screen: true,
            ..Default::default()
        },
    )
    .unwrap_err();

    assert_eq!(err, ReconcileError::NoScreens);
    let flags = doc.flags.as_ref().expect("flag step ran before the failure");
    assert_eq!(flags.options.get("Xinerama").unwrap().value.as_deref(), Some("1"));
}

#[test]
fn test_positional_assignment_drops_excess_screens_but_splits_the_rest() {
    // Three screens, none with bus ids, but only two GPUs: the third screen
    // is dropped from the split unmodified while the first two are assigned
    // and cloned.
    let mut doc = make_document(3);
    for i in 0..3 {
        doc.devices.find_mut(&format!("Device{i}")).unwrap().bus_id = None;
    }
    let inventory =
        MockInventory::with_gpus(vec![descriptor(1, 0, "GPU A"), descriptor(2, 0, "GPU B")]);

    reconcile::apply(
        &mut doc,
        &inventory,
        &TopologyRequest { separate_screens: Some(true), ..Default::default() },
    )
    .expect("split");

    assert_eq!(doc.screens.len(), 5, "two clones added, third screen untouched");
    assert!(doc.screens.find("Screen2 (2nd)").is_none());
    assert_eq!(doc.devices.find("Device2").unwrap().bus_id, None);
    assert_eq!(inventory.enumerate_calls(), 1, "one fetch covers all candidates");
    assert_adjacencies_match_screens(&doc);
}
